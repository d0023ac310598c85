use crate::model::{GapTag, OfficerRecord};
use crate::normalize::grading::first_number;
use crate::normalize::ratings::{REALISTIC_SCORE, average_score};

pub const DEGREE_GRADE_THRESHOLD: u32 = 14;
pub const MASTERS_GRADE_THRESHOLD: u32 = 18;
pub const SKILL_GAP_AVERAGE_THRESHOLD: f64 = 6.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualificationNeeds {
    pub needs_degree: bool,
    pub needs_masters: bool,
}

impl QualificationNeeds {
    pub fn has_gap(self) -> bool {
        self.needs_degree || self.needs_masters
    }
}

pub fn qualification_needs(grade_number: u32, qualification: &str) -> QualificationNeeds {
    let lowered = qualification.to_lowercase();
    let has_degree = lowered.contains("degree") || lowered.contains("bachelor");
    let has_masters = lowered.contains("masters") || lowered.contains("post");

    QualificationNeeds {
        needs_degree: grade_number >= DEGREE_GRADE_THRESHOLD && !has_degree,
        needs_masters: grade_number >= MASTERS_GRADE_THRESHOLD && !has_masters,
    }
}

/// Mean current score, or the full target score when nothing was rated.
pub fn alignment_average(record: &OfficerRecord) -> f64 {
    average_score(&record.capability_ratings).unwrap_or(REALISTIC_SCORE)
}

pub fn decide_tag(has_qual_gap: bool, has_skill_gap: bool) -> GapTag {
    match (has_qual_gap, has_skill_gap) {
        (true, true) => GapTag::CriticalGap,
        (true, false) => GapTag::QualGap,
        (false, true) => GapTag::SkillGap,
        (false, false) => GapTag::Aligned,
    }
}

pub fn tag_reason(tag: GapTag, qualification: &str, grade: &str) -> String {
    let qualification = match qualification.trim() {
        "" => "no recorded qualification",
        value => value,
    };
    let grade = match grade.trim() {
        "" => "unknown",
        value => value,
    };

    match tag {
        GapTag::CriticalGap => format!(
            "Holds {qualification} at grade {grade}: below the formal qualification expected for the grade and self-assessed capability shows a skill shortfall."
        ),
        GapTag::QualGap => format!(
            "Holds {qualification} at grade {grade}: capability is adequate but the formal qualification is below what the grade expects."
        ),
        GapTag::SkillGap => format!(
            "Holds {qualification} at grade {grade}: qualification meets the grade but capability scores or reported technical gaps show a skill shortfall."
        ),
        GapTag::Aligned => format!(
            "Holds {qualification} at grade {grade}: qualification and capability are aligned with the grade."
        ),
    }
}

/// Gap tag and reason for a fully assembled record.
pub fn tag_alignment(record: &OfficerRecord) -> (GapTag, String) {
    let grade_number = first_number(&record.grade).unwrap_or(0);
    let needs = qualification_needs(grade_number, &record.qualification);
    let has_skill_gap = alignment_average(record) < SKILL_GAP_AVERAGE_THRESHOLD
        || !record.technical_capability_gaps.is_empty();

    let tag = decide_tag(needs.has_gap(), has_skill_gap);
    (tag, tag_reason(tag, &record.qualification, &record.grade))
}
