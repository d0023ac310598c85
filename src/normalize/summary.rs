use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{EstablishmentRecord, OfficerRecord};
use crate::normalize::establishment::VACANT_OCCUPANT;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkforceSummary {
    pub officer_count: usize,
    pub rating_count: usize,
    pub unrated_officer_count: usize,
    pub average_score_by_code: BTreeMap<String, f64>,
    pub gap_tags: BTreeMap<String, usize>,
    pub grading_groups: BTreeMap<String, usize>,
    pub gap_categories: BTreeMap<String, usize>,
    pub misalignments: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DivisionVacancy {
    pub positions: usize,
    pub vacant: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstablishmentSummary {
    pub position_count: usize,
    pub vacant_count: usize,
    pub filled_count: usize,
    pub vacancy_rate: f64,
    pub divisions: BTreeMap<String, DivisionVacancy>,
}

pub fn summarize_officers(records: &[OfficerRecord]) -> WorkforceSummary {
    let mut summary = WorkforceSummary {
        officer_count: records.len(),
        ..WorkforceSummary::default()
    };
    let mut score_totals = BTreeMap::<String, (f64, usize)>::new();

    for record in records {
        if record.capability_ratings.is_empty() {
            summary.unrated_officer_count += 1;
        }

        for rating in &record.capability_ratings {
            summary.rating_count += 1;
            let entry = score_totals
                .entry(rating.question_code.clone())
                .or_insert((0.0, 0));
            entry.0 += rating.current_score;
            entry.1 += 1;
            *summary
                .gap_categories
                .entry(rating.gap_category.as_str().to_string())
                .or_default() += 1;
        }

        *summary
            .gap_tags
            .entry(record.gap_tag.as_str().to_string())
            .or_default() += 1;
        *summary
            .grading_groups
            .entry(record.grading_group.label().to_string())
            .or_default() += 1;
        if let Some(misalignment) = record.misalignment {
            *summary
                .misalignments
                .entry(misalignment.as_str().to_string())
                .or_default() += 1;
        }
    }

    summary.average_score_by_code = score_totals
        .into_iter()
        .map(|(code, (total, count))| (code, total / count as f64))
        .collect();

    summary
}

pub fn summarize_establishment(records: &[EstablishmentRecord]) -> EstablishmentSummary {
    let mut summary = EstablishmentSummary {
        position_count: records.len(),
        ..EstablishmentSummary::default()
    };

    for record in records {
        let vacant = record.occupant == VACANT_OCCUPANT;
        if vacant {
            summary.vacant_count += 1;
        } else {
            summary.filled_count += 1;
        }

        let division = match record.division.trim() {
            "" => "Unassigned".to_string(),
            value => value.to_string(),
        };
        let entry = summary.divisions.entry(division).or_default();
        entry.positions += 1;
        if vacant {
            entry.vacant += 1;
        }
    }

    if summary.position_count > 0 {
        summary.vacancy_rate = summary.vacant_count as f64 / summary.position_count as f64;
    }

    summary
}
