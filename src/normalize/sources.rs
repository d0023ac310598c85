use anyhow::{Result, bail};
use serde_json::{Map, Value};

use crate::util::normalize_whitespace;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Blank,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Blank => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Self::Blank => String::new(),
            Self::Text(text) => text.trim().to_string(),
            Self::Number(value) => format_number(*value),
        }
    }

    fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Blank,
            Value::String(text) => Self::Text(text.clone()),
            Value::Number(number) => number.as_f64().map(Self::Number).unwrap_or(Self::Blank),
            Value::Bool(flag) => Self::Text(flag.to_string()),
            other => Self::Text(other.to_string()),
        }
    }
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

static BLANK: Cell = Cell::Blank;

/// One imported line as (header, cell) pairs in column order. Headers may
/// repeat. Dropped once its record is built.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    cells: Vec<(String, Cell)>,
}

impl RawRow {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, Cell)>) -> Self {
        Self {
            cells: pairs.into_iter().collect(),
        }
    }

    /// First non-blank cell under `header`, so a blank repeated column never
    /// hides an earlier value.
    pub fn get(&self, header: &str) -> &Cell {
        self.cells
            .iter()
            .filter(|(name, _)| name == header)
            .map(|(_, cell)| cell)
            .find(|cell| !cell.is_blank())
            .unwrap_or(&BLANK)
    }

    pub fn text(&self, header: Option<&str>) -> String {
        header
            .map(|header| self.get(header).as_text())
            .unwrap_or_default()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(header, cell)| (header.as_str(), cell))
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, cell)| cell.is_blank())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetGrid {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// Header row plus keyed data rows for one import batch.
#[derive(Debug, Clone, Default)]
pub struct TableRows {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

fn header_row(cells: &[Cell]) -> Vec<Option<String>> {
    cells
        .iter()
        .map(|cell| {
            let header = normalize_whitespace(&cell.as_text());
            if header.is_empty() { None } else { Some(header) }
        })
        .collect()
}

fn keyed_rows(headers: &[Option<String>], data: &[Vec<Cell>]) -> Vec<RawRow> {
    data.iter()
        .map(|cells| {
            RawRow::from_pairs(headers.iter().zip(cells.iter()).filter_map(
                |(header, cell)| header.as_ref().map(|header| (header.clone(), cell.clone())),
            ))
        })
        .filter(|row| !row.is_blank())
        .collect()
}

/// Concatenates every sheet into one row set. Each sheet is keyed by its own
/// first row; the declared headers come from the first sheet.
pub fn rows_from_sheets(sheets: &[SheetGrid]) -> Result<TableRows> {
    let mut table = TableRows::default();

    for (index, sheet) in sheets.iter().enumerate() {
        let Some((first, data)) = sheet.rows.split_first() else {
            continue;
        };
        let headers = header_row(first);
        if index == 0 {
            table.headers = headers.iter().flatten().cloned().collect();
        }
        table.rows.extend(keyed_rows(&headers, data));
    }

    if table.rows.is_empty() {
        bail!("workbook contains no data rows below the header row");
    }

    Ok(table)
}

pub fn rows_from_pasted(text: &str) -> Result<TableRows> {
    let lines = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<&str>>();

    if lines.len() < 2 {
        bail!(
            "pasted table needs a header line and at least one data line (found {} line(s))",
            lines.len()
        );
    }

    let grid = lines
        .iter()
        .map(|line| line.split('\t').map(Cell::text).collect::<Vec<Cell>>())
        .collect::<Vec<Vec<Cell>>>();

    let headers = header_row(&grid[0]);
    let rows = keyed_rows(&headers, &grid[1..]);
    if rows.is_empty() {
        bail!("pasted table contains no data rows below the header line");
    }

    Ok(TableRows {
        headers: headers.into_iter().flatten().collect(),
        rows,
    })
}

pub fn rows_from_remote(records: &[Map<String, Value>]) -> Result<TableRows> {
    let Some(first) = records.first() else {
        bail!("remote source returned no rows");
    };

    let headers = first
        .keys()
        .map(|key| normalize_whitespace(key))
        .filter(|key| !key.is_empty())
        .collect::<Vec<String>>();

    let rows = records
        .iter()
        .map(|record| {
            RawRow::from_pairs(
                record
                    .iter()
                    .map(|(key, value)| (normalize_whitespace(key), Cell::from_json(value))),
            )
        })
        .filter(|row| !row.is_blank())
        .collect::<Vec<RawRow>>();

    if rows.is_empty() {
        bail!("remote source returned only blank rows");
    }

    Ok(TableRows { headers, rows })
}
