use anyhow::Result;
use regex::Regex;

use crate::model::{AgencyType, CapabilityRating, GapTag, Misalignment, OfficerRecord};
use crate::normalize::alignment::tag_alignment;
use crate::normalize::config::{NormalizeConfig, OfficerField};
use crate::normalize::grading::{classify_grade, first_number};
use crate::normalize::headers::FieldResolution;
use crate::normalize::ratings::{
    RatingColumn, average_score, collect_ratings, extract_rating_columns,
};
use crate::normalize::sources::{Cell, RawRow};

/// Header resolution and rating columns for one officer import, reused for
/// every row in that import.
#[derive(Debug, Clone)]
pub struct OfficerImport {
    agency_type: AgencyType,
    resolution: FieldResolution<OfficerField>,
    rating_columns: Vec<RatingColumn>,
}

impl OfficerImport {
    pub fn new(
        headers: &[String],
        config: &NormalizeConfig,
        agency_type: AgencyType,
    ) -> Result<Self> {
        let pattern = config.rating_code_regex()?;
        Ok(Self::with_pattern(headers, config, &pattern, agency_type))
    }

    fn with_pattern(
        headers: &[String],
        config: &NormalizeConfig,
        pattern: &Regex,
        agency_type: AgencyType,
    ) -> Self {
        let resolution = FieldResolution::resolve(headers, &OfficerField::ALL, |field| {
            config.officer_synonyms(field)
        });
        let rating_columns = extract_rating_columns(headers, pattern);

        Self {
            agency_type,
            resolution,
            rating_columns,
        }
    }

    pub fn resolution(&self) -> &FieldResolution<OfficerField> {
        &self.resolution
    }

    pub fn rating_columns(&self) -> &[RatingColumn] {
        &self.rating_columns
    }

    fn field(&self, row: &RawRow, field: OfficerField) -> String {
        row.text(self.resolution.header(field))
    }

    fn cell<'r>(&self, row: &'r RawRow, field: OfficerField) -> Option<&'r Cell> {
        self.resolution.header(field).map(|header| row.get(header))
    }

    pub fn build(&self, row: &RawRow) -> OfficerRecord {
        let capability_ratings = collect_ratings(row, &self.rating_columns);
        let performance_rating = self
            .cell(row, OfficerField::PerformanceRating)
            .and_then(parse_performance_rating);
        let misalignment = detect_misalignment(performance_rating, &capability_ratings);
        let grade = self.field(row, OfficerField::Grade);

        let mut record = OfficerRecord {
            email: self.field(row, OfficerField::Email),
            name: self.field(row, OfficerField::Name),
            position: self.field(row, OfficerField::Position),
            division: self.field(row, OfficerField::Division),
            grading_group: classify_grade(&grade, self.agency_type),
            grade,
            position_number: self.field(row, OfficerField::PositionNumber),
            gender: self.field(row, OfficerField::Gender),
            qualification: self.field(row, OfficerField::Qualification),
            employment_status: self.field(row, OfficerField::EmploymentStatus),
            commencement_date: self.field(row, OfficerField::CommencementDate),
            date_of_birth: self.field(row, OfficerField::DateOfBirth),
            performance_rating,
            technical_capability_gaps: split_gap_list(
                &self.field(row, OfficerField::TechnicalGaps),
            ),
            capability_ratings,
            misalignment,
            gap_tag: GapTag::Aligned,
            gap_reason: String::new(),
        };

        let (gap_tag, gap_reason) = tag_alignment(&record);
        record.gap_tag = gap_tag;
        record.gap_reason = gap_reason;
        record
    }

    pub fn build_all(&self, rows: Vec<RawRow>) -> Vec<OfficerRecord> {
        rows.into_iter().map(|row| self.build(&row)).collect()
    }
}

pub fn parse_performance_rating(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Blank => None,
        Cell::Number(value) if value.is_finite() => Some(*value),
        Cell::Number(_) => None,
        Cell::Text(text) => {
            let trimmed = text.trim();
            if let Ok(value) = trimmed.parse::<f64>() {
                return value.is_finite().then_some(value);
            }
            first_number(trimmed).map(f64::from)
        }
    }
}

/// Flags officers whose performance rating disagrees with their self-assessment.
/// Rows without any capability ratings are never flagged.
pub fn detect_misalignment(
    performance_rating: Option<f64>,
    ratings: &[CapabilityRating],
) -> Option<Misalignment> {
    let performance = performance_rating?;
    let average = average_score(ratings)?;

    if (4.0..=5.0).contains(&performance) && average < 5.0 {
        Some(Misalignment::HighPerformerLowCapability)
    } else if (1.0..=2.0).contains(&performance) && average > 7.0 {
        Some(Misalignment::SkilledUnderperforming)
    } else {
        None
    }
}

pub fn split_gap_list(text: &str) -> Vec<String> {
    text.split([',', ';', '\n'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .filter(|item| {
            !matches!(
                item.to_ascii_lowercase().as_str(),
                "none" | "n/a" | "na" | "nil" | "-"
            )
        })
        .map(ToOwned::to_owned)
        .collect()
}
