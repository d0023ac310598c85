//! Ingestion and normalization of workforce survey and establishment tables.
//!
//! Every entry point runs one import as a single batch: the header row is
//! resolved once, each row becomes a canonical record, and nothing is returned
//! unless the whole batch succeeded.

use anyhow::Result;
use serde_json::{Map, Value};

use crate::model::{AgencyType, EstablishmentRecord, OfficerRecord, ResolvedField};
use headers::FieldResolution;

mod alignment;
mod config;
mod dedupe;
mod establishment;
mod grading;
mod headers;
mod officer;
mod ratings;
mod sources;
mod summary;

pub use config::{EstablishmentField, NormalizeConfig, OfficerField};
pub use dedupe::{dedupe_officers, identity_key};
pub use establishment::EstablishmentImport;
pub use officer::OfficerImport;
pub use ratings::RatingColumn;
pub use sources::{Cell, SheetGrid, TableRows};
pub use summary::{
    EstablishmentSummary, WorkforceSummary, summarize_establishment, summarize_officers,
};

use sources::{rows_from_pasted, rows_from_remote, rows_from_sheets};

#[derive(Debug, Clone)]
pub struct ParsedOfficers {
    pub headers: Vec<String>,
    pub records: Vec<OfficerRecord>,
    pub resolved_fields: Vec<ResolvedField>,
    pub unresolved_fields: Vec<String>,
    pub rating_columns: Vec<RatingColumn>,
}

#[derive(Debug, Clone)]
pub struct ParsedEstablishment {
    pub headers: Vec<String>,
    pub records: Vec<EstablishmentRecord>,
    pub resolved_fields: Vec<ResolvedField>,
    pub unresolved_fields: Vec<String>,
}

pub fn parse_workbook_rows(
    sheets: &[SheetGrid],
    agency_type: AgencyType,
    config: &NormalizeConfig,
) -> Result<ParsedOfficers> {
    build_officers(rows_from_sheets(sheets)?, agency_type, config)
}

pub fn parse_pasted_table(
    text: &str,
    agency_type: AgencyType,
    config: &NormalizeConfig,
) -> Result<ParsedOfficers> {
    build_officers(rows_from_pasted(text)?, agency_type, config)
}

pub fn parse_remote_rows(
    rows: &[Map<String, Value>],
    agency_type: AgencyType,
    config: &NormalizeConfig,
) -> Result<ParsedOfficers> {
    build_officers(rows_from_remote(rows)?, agency_type, config)
}

/// Establishment rows carry no ratings and no grade classification, so no
/// agency type is involved.
pub fn parse_establishment_grid(
    sheets: &[SheetGrid],
    config: &NormalizeConfig,
) -> Result<ParsedEstablishment> {
    Ok(build_establishment(rows_from_sheets(sheets)?, config))
}

pub fn parse_pasted_establishment(
    text: &str,
    config: &NormalizeConfig,
) -> Result<ParsedEstablishment> {
    Ok(build_establishment(rows_from_pasted(text)?, config))
}

fn build_officers(
    table: TableRows,
    agency_type: AgencyType,
    config: &NormalizeConfig,
) -> Result<ParsedOfficers> {
    let import = OfficerImport::new(&table.headers, config, agency_type)?;
    let (resolved_fields, unresolved_fields) =
        describe_resolution(import.resolution(), OfficerField::as_str);
    let rating_columns = import.rating_columns().to_vec();
    let records = import.build_all(table.rows);

    Ok(ParsedOfficers {
        headers: table.headers,
        records,
        resolved_fields,
        unresolved_fields,
        rating_columns,
    })
}

fn build_establishment(table: TableRows, config: &NormalizeConfig) -> ParsedEstablishment {
    let import = EstablishmentImport::new(&table.headers, config);
    let (resolved_fields, unresolved_fields) =
        describe_resolution(import.resolution(), EstablishmentField::as_str);
    let records = import.build_all(table.rows);

    ParsedEstablishment {
        headers: table.headers,
        records,
        resolved_fields,
        unresolved_fields,
    }
}

fn describe_resolution<F: Ord + Copy>(
    resolution: &FieldResolution<F>,
    name: fn(F) -> &'static str,
) -> (Vec<ResolvedField>, Vec<String>) {
    let resolved = resolution
        .resolved()
        .map(|(field, header)| ResolvedField {
            field: name(field).to_string(),
            header: header.to_string(),
        })
        .collect();
    let unresolved = resolution
        .unresolved()
        .iter()
        .map(|field| name(*field).to_string())
        .collect();
    (resolved, unresolved)
}
