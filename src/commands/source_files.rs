use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto};
use chrono::NaiveTime;
use serde_json::{Map, Value};
use tracing::info;

use crate::cli::SourceKind;
use crate::model::SourceEntry;
use crate::normalize::{Cell, SheetGrid};
use crate::util::{read_file_bytes, sha256_bytes};

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];
const PASTED_EXTENSIONS: [&str; 3] = ["tsv", "tab", "txt"];

#[derive(Debug, Clone)]
pub enum LoadedSource {
    Workbook(Vec<SheetGrid>),
    Pasted(String),
    Remote(Vec<Map<String, Value>>),
}

pub fn detect_source_kind(path: &Path, requested: SourceKind) -> Result<SourceKind> {
    if requested != SourceKind::Auto {
        return Ok(requested);
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        Ok(SourceKind::Workbook)
    } else if PASTED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(SourceKind::Pasted)
    } else if extension == "json" {
        Ok(SourceKind::Remote)
    } else {
        bail!(
            "cannot infer source kind from {}; pass --source-kind",
            path.display()
        )
    }
}

pub fn load_source(path: &Path, requested: SourceKind) -> Result<(LoadedSource, SourceEntry)> {
    let kind = detect_source_kind(path, requested)?;
    let bytes = read_file_bytes(path)?;
    let entry = SourceEntry {
        path: path.display().to_string(),
        kind: kind.as_str().to_string(),
        sha256: sha256_bytes(&bytes),
        byte_len: bytes.len() as u64,
    };

    let source = match kind {
        SourceKind::Workbook => LoadedSource::Workbook(read_workbook(path)?),
        SourceKind::Pasted => LoadedSource::Pasted(
            String::from_utf8(bytes)
                .with_context(|| format!("pasted table is not valid UTF-8: {}", path.display()))?,
        ),
        SourceKind::Remote => LoadedSource::Remote(
            serde_json::from_slice(&bytes)
                .with_context(|| format!("failed to parse remote rows {}", path.display()))?,
        ),
        SourceKind::Auto => bail!("source kind was not resolved for {}", path.display()),
    };

    info!(
        path = %entry.path,
        kind = %entry.kind,
        bytes = entry.byte_len,
        "loaded import source"
    );

    Ok((source, entry))
}

fn read_workbook(path: &Path) -> Result<Vec<SheetGrid>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open workbook {}", path.display()))?;
    let sheet_names = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        bail!("workbook contains no sheets: {}", path.display());
    }

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("failed to read sheet '{sheet_name}' in {}", path.display()))?;
        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_from_data).collect::<Vec<Cell>>())
            .collect::<Vec<Vec<Cell>>>();
        sheets.push(SheetGrid::new(sheet_name, rows));
    }

    Ok(sheets)
}

pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Blank,
        Data::String(text) => Cell::Text(text.clone()),
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Bool(flag) => Cell::Text(if *flag { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(value) => match value.as_datetime() {
            Some(moment) if moment.time() == NaiveTime::MIN => {
                Cell::Text(moment.format("%Y-%m-%d").to_string())
            }
            Some(moment) => Cell::Text(moment.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => Cell::Number(value.as_f64()),
        },
        other => Cell::Text(other.to_string()),
    }
}
