use crate::model::EstablishmentRecord;
use crate::normalize::config::{EstablishmentField, NormalizeConfig};
use crate::normalize::headers::FieldResolution;
use crate::normalize::sources::RawRow;

pub const VACANT_OCCUPANT: &str = "VACANT";
pub const VACANT_STATUS: &str = "Vacant";

#[derive(Debug, Clone)]
pub struct EstablishmentImport {
    resolution: FieldResolution<EstablishmentField>,
}

impl EstablishmentImport {
    pub fn new(headers: &[String], config: &NormalizeConfig) -> Self {
        let resolution = FieldResolution::resolve(headers, &EstablishmentField::ALL, |field| {
            config.establishment_synonyms(field)
        });
        Self { resolution }
    }

    pub fn resolution(&self) -> &FieldResolution<EstablishmentField> {
        &self.resolution
    }

    fn field(&self, row: &RawRow, field: EstablishmentField) -> String {
        row.text(self.resolution.header(field))
    }

    pub fn build(&self, row: &RawRow) -> EstablishmentRecord {
        let occupant = self.field(row, EstablishmentField::Occupant);
        let (occupant, status) = if is_vacant_occupant(&occupant) {
            (VACANT_OCCUPANT.to_string(), VACANT_STATUS.to_string())
        } else {
            (occupant, self.field(row, EstablishmentField::Status))
        };

        EstablishmentRecord {
            position_number: self.field(row, EstablishmentField::PositionNumber),
            division: self.field(row, EstablishmentField::Division),
            grade: self.field(row, EstablishmentField::Grade),
            designation: self.field(row, EstablishmentField::Designation),
            occupant,
            status,
            gender: self.field(row, EstablishmentField::Gender),
        }
    }

    pub fn build_all(&self, rows: Vec<RawRow>) -> Vec<EstablishmentRecord> {
        rows.into_iter().map(|row| self.build(&row)).collect()
    }
}

/// Blank occupants, any mention of "vacant", and asterisk placeholders all
/// mean the position is unfilled, whatever the status column says. A lone
/// trailing `*` on a name is a footnote marker, not a placeholder.
pub fn is_vacant_occupant(occupant: &str) -> bool {
    let trimmed = occupant.trim();
    trimmed.is_empty()
        || trimmed.to_lowercase().contains("vacant")
        || trimmed.contains("**")
        || trimmed.chars().all(|character| character == '*')
}
