use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::normalize::{EstablishmentSummary, RatingColumn, WorkforceSummary};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgencyType {
    NationalDepartment,
    NationalAgency,
    ProvincialAdministration,
    ProvincialHealthAuthority,
    LocalLevelGovernment,
    Other,
}

impl AgencyType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NationalDepartment => "national_department",
            Self::NationalAgency => "national_agency",
            Self::ProvincialAdministration => "provincial_administration",
            Self::ProvincialHealthAuthority => "provincial_health_authority",
            Self::LocalLevelGovernment => "local_level_government",
            Self::Other => "other",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GradingGroup {
    JuniorOfficer,
    SeniorOfficer,
    Manager,
    SeniorManagement,
    Other,
}

impl GradingGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JuniorOfficer => "JuniorOfficer",
            Self::SeniorOfficer => "SeniorOfficer",
            Self::Manager => "Manager",
            Self::SeniorManagement => "SeniorManagement",
            Self::Other => "Other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::JuniorOfficer => "Junior Officer",
            Self::SeniorOfficer => "Senior Officer",
            Self::Manager => "Manager",
            Self::SeniorManagement => "Senior Management",
            Self::Other => "Other",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GapTag {
    QualGap,
    SkillGap,
    CriticalGap,
    Aligned,
}

impl GapTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::QualGap => "QUAL_GAP",
            Self::SkillGap => "SKILL_GAP",
            Self::CriticalGap => "CRITICAL_GAP",
            Self::Aligned => "ALIGNED",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GapCategory {
    NoGap,
    MinorGap,
    ModerateGap,
    CriticalGap,
}

impl GapCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoGap => "NoGap",
            Self::MinorGap => "MinorGap",
            Self::ModerateGap => "ModerateGap",
            Self::CriticalGap => "CriticalGap",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ScoreCategory {
    Low,
    Moderate,
    High,
}

impl ScoreCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Misalignment {
    HighPerformerLowCapability,
    SkilledUnderperforming,
}

impl Misalignment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HighPerformerLowCapability => "high_performer_low_capability",
            Self::SkilledUnderperforming => "skilled_underperforming",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::HighPerformerLowCapability => "high performer, low self-assessed capability",
            Self::SkilledUnderperforming => "skilled staff underperforming",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityRating {
    pub question_code: String,
    pub current_score: f64,
    pub realistic_score: f64,
    pub gap_score: f64,
    pub gap_category: GapCategory,
    pub current_score_category: ScoreCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficerRecord {
    pub email: String,
    pub name: String,
    pub position: String,
    pub division: String,
    pub grade: String,
    pub position_number: String,
    pub gender: String,
    pub qualification: String,
    pub employment_status: String,
    pub commencement_date: String,
    pub date_of_birth: String,
    pub performance_rating: Option<f64>,
    pub technical_capability_gaps: Vec<String>,
    pub capability_ratings: Vec<CapabilityRating>,
    pub grading_group: GradingGroup,
    pub misalignment: Option<Misalignment>,
    pub gap_tag: GapTag,
    pub gap_reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstablishmentRecord {
    pub position_number: String,
    pub division: String,
    pub grade: String,
    pub designation: String,
    pub occupant: String,
    pub status: String,
    pub gender: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    pub path: String,
    pub kind: String,
    pub sha256: String,
    pub byte_len: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPaths {
    pub cache_root: String,
    pub manifest_dir: String,
    pub db_path: String,
    pub records_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportCounts {
    pub records_built: usize,
    pub records_kept: usize,
    pub duplicates_collapsed: usize,
    pub unkeyed_records: usize,
    pub rating_columns: usize,
    pub ratings_emitted: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportSummary {
    Officers(WorkforceSummary),
    Establishment(EstablishmentSummary),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRunManifest {
    pub manifest_version: u32,
    pub import_id: String,
    pub import_kind: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub agency_type: AgencyType,
    pub source: SourceEntry,
    pub paths: ImportPaths,
    pub headers: Vec<String>,
    pub resolved_fields: Vec<ResolvedField>,
    pub unresolved_fields: Vec<String>,
    pub rating_columns: Vec<RatingColumn>,
    pub counts: ImportCounts,
    pub summary: ImportSummary,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedField {
    pub field: String,
    pub header: String,
}
