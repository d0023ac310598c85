use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_RATING_CODE_PATTERN: &str = r"(?i)^([A-G][0-9]{1,2}|H[256])\b";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfficerField {
    Email,
    Name,
    Position,
    Division,
    Grade,
    PositionNumber,
    Gender,
    Qualification,
    EmploymentStatus,
    CommencementDate,
    DateOfBirth,
    PerformanceRating,
    TechnicalGaps,
}

impl OfficerField {
    pub const ALL: [OfficerField; 13] = [
        Self::Email,
        Self::Name,
        Self::Position,
        Self::Division,
        Self::Grade,
        Self::PositionNumber,
        Self::Gender,
        Self::Qualification,
        Self::EmploymentStatus,
        Self::CommencementDate,
        Self::DateOfBirth,
        Self::PerformanceRating,
        Self::TechnicalGaps,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Name => "name",
            Self::Position => "position",
            Self::Division => "division",
            Self::Grade => "grade",
            Self::PositionNumber => "position_number",
            Self::Gender => "gender",
            Self::Qualification => "qualification",
            Self::EmploymentStatus => "employment_status",
            Self::CommencementDate => "commencement_date",
            Self::DateOfBirth => "date_of_birth",
            Self::PerformanceRating => "performance_rating",
            Self::TechnicalGaps => "technical_gaps",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstablishmentField {
    PositionNumber,
    Division,
    Grade,
    Designation,
    Occupant,
    Status,
    Gender,
}

impl EstablishmentField {
    pub const ALL: [EstablishmentField; 7] = [
        Self::PositionNumber,
        Self::Division,
        Self::Grade,
        Self::Designation,
        Self::Occupant,
        Self::Status,
        Self::Gender,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PositionNumber => "position_number",
            Self::Division => "division",
            Self::Grade => "grade",
            Self::Designation => "designation",
            Self::Occupant => "occupant",
            Self::Status => "status",
            Self::Gender => "gender",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymEntry<F> {
    pub field: F,
    pub synonyms: Vec<String>,
}

impl<F> SynonymEntry<F> {
    fn new(field: F, synonyms: &[&str]) -> Self {
        Self {
            field,
            synonyms: synonyms.iter().map(|value| value.to_string()).collect(),
        }
    }
}

/// Header synonym tables and the rating-code pattern for one import.
///
/// Entries are consulted in declaration order and each synonym list is in
/// priority order. Fields missing from a loaded file keep the built-in table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub officer: Vec<SynonymEntry<OfficerField>>,
    pub establishment: Vec<SynonymEntry<EstablishmentField>>,
    pub rating_code_pattern: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            officer: default_officer_synonyms(),
            establishment: default_establishment_synonyms(),
            rating_code_pattern: DEFAULT_RATING_CODE_PATTERN.to_string(),
        }
    }
}

impl NormalizeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let config: NormalizeConfig = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.rating_code_regex()?;
        Ok(config)
    }

    pub fn rating_code_regex(&self) -> Result<Regex> {
        Regex::new(&self.rating_code_pattern).with_context(|| {
            format!(
                "failed to compile rating code pattern: {}",
                self.rating_code_pattern
            )
        })
    }

    pub fn officer_synonyms(&self, field: OfficerField) -> &[String] {
        self.officer
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.synonyms.as_slice())
            .unwrap_or(&[])
    }

    pub fn establishment_synonyms(&self, field: EstablishmentField) -> &[String] {
        self.establishment
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.synonyms.as_slice())
            .unwrap_or(&[])
    }
}

fn default_officer_synonyms() -> Vec<SynonymEntry<OfficerField>> {
    vec![
        SynonymEntry::new(
            OfficerField::Email,
            &["email address", "email", "e-mail", "work email"],
        ),
        SynonymEntry::new(
            OfficerField::Name,
            &["full name", "officer name", "employee name", "name"],
        ),
        SynonymEntry::new(
            OfficerField::Position,
            &["position title", "job title", "designation", "position"],
        ),
        SynonymEntry::new(
            OfficerField::Division,
            &["division", "branch", "section", "department", "unit"],
        ),
        SynonymEntry::new(
            OfficerField::Grade,
            &["grade level", "grade", "level", "classification"],
        ),
        SynonymEntry::new(
            OfficerField::PositionNumber,
            &["position number", "position no", "pos no", "position #"],
        ),
        SynonymEntry::new(OfficerField::Gender, &["gender", "sex"]),
        SynonymEntry::new(
            OfficerField::Qualification,
            &[
                "highest qualification",
                "qualification attained",
                "qualification",
                "education",
            ],
        ),
        SynonymEntry::new(
            OfficerField::EmploymentStatus,
            &["employment status", "employment type", "status"],
        ),
        SynonymEntry::new(
            OfficerField::CommencementDate,
            &[
                "date of commencement",
                "commencement date",
                "date of appointment",
                "start date",
                "date joined",
            ],
        ),
        SynonymEntry::new(
            OfficerField::DateOfBirth,
            &["date of birth", "dob", "birth date"],
        ),
        SynonymEntry::new(
            OfficerField::PerformanceRating,
            &[
                "performance rating",
                "appraisal rating",
                "performance score",
                "performance",
            ],
        ),
        SynonymEntry::new(
            OfficerField::TechnicalGaps,
            &[
                "technical capability gaps",
                "technical gaps",
                "capability gaps",
                "training needs",
            ],
        ),
    ]
}

fn default_establishment_synonyms() -> Vec<SynonymEntry<EstablishmentField>> {
    vec![
        SynonymEntry::new(
            EstablishmentField::PositionNumber,
            &["position number", "position no", "pos no", "position #"],
        ),
        SynonymEntry::new(
            EstablishmentField::Division,
            &["division", "branch", "section", "department", "unit"],
        ),
        SynonymEntry::new(
            EstablishmentField::Grade,
            &["grade level", "grade", "level", "classification"],
        ),
        SynonymEntry::new(
            EstablishmentField::Designation,
            &["designation", "position title", "job title", "position"],
        ),
        SynonymEntry::new(
            EstablishmentField::Occupant,
            &["occupant", "incumbent", "officer name", "name"],
        ),
        SynonymEntry::new(
            EstablishmentField::Status,
            &["occupancy status", "employment status", "status"],
        ),
        SynonymEntry::new(EstablishmentField::Gender, &["gender", "sex"]),
    ]
}
