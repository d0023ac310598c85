use std::num::IntErrorKind;

use crate::model::{AgencyType, GradingGroup};

struct GradeBands {
    junior: (u32, u32),
    senior: (u32, u32),
    manager: (u32, u32),
    senior_management: (u32, u32),
}

const NATIONAL_BANDS: GradeBands = GradeBands {
    junior: (7, 12),
    senior: (13, 15),
    manager: (16, 17),
    senior_management: (18, 20),
};

const PROVINCIAL_BANDS: GradeBands = GradeBands {
    junior: (7, 11),
    senior: (12, 14),
    manager: (15, 16),
    senior_management: (17, 20),
};

const FALLBACK_BANDS: GradeBands = GradeBands {
    junior: (0, 12),
    senior: (13, 15),
    manager: (16, 17),
    senior_management: (18, u32::MAX),
};

fn bands_for(agency_type: AgencyType) -> &'static GradeBands {
    match agency_type {
        AgencyType::NationalDepartment | AgencyType::NationalAgency => &NATIONAL_BANDS,
        AgencyType::ProvincialAdministration => &PROVINCIAL_BANDS,
        AgencyType::ProvincialHealthAuthority
        | AgencyType::LocalLevelGovernment
        | AgencyType::Other => &FALLBACK_BANDS,
    }
}

/// First run of ASCII digits in `text`. Runs too long for a `u32` saturate.
pub fn first_number(text: &str) -> Option<u32> {
    let start = text.find(|character: char| character.is_ascii_digit())?;
    let digits = text[start..]
        .chars()
        .take_while(|character| character.is_ascii_digit())
        .collect::<String>();
    match digits.parse::<u32>() {
        Ok(number) => Some(number),
        Err(error) if *error.kind() == IntErrorKind::PosOverflow => Some(u32::MAX),
        Err(_) => None,
    }
}

pub fn classify_grade(grade: &str, agency_type: AgencyType) -> GradingGroup {
    let Some(number) = first_number(grade) else {
        return GradingGroup::Other;
    };

    let bands = bands_for(agency_type);
    let within = |(low, high): (u32, u32)| (low..=high).contains(&number);

    if within(bands.junior) {
        GradingGroup::JuniorOfficer
    } else if within(bands.senior) {
        GradingGroup::SeniorOfficer
    } else if within(bands.manager) {
        GradingGroup::Manager
    } else if within(bands.senior_management) {
        GradingGroup::SeniorManagement
    } else {
        GradingGroup::Other
    }
}
