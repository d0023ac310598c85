use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use crate::model::{EstablishmentRecord, ImportRunManifest, OfficerRecord};
use crate::util::now_utc_string;

pub const DB_SCHEMA_VERSION: &str = "0.1.0";

#[derive(Debug, Clone)]
pub struct ImportRow {
    pub import_id: String,
    pub import_kind: String,
    pub agency_type: String,
    pub source_path: String,
    pub record_count: i64,
    pub manifest_path: String,
    pub completed_at: String,
}

pub fn default_db_path(cache_root: &Path) -> PathBuf {
    cache_root.join("workforce.sqlite")
}

pub fn open_store(db_path: &Path) -> Result<Connection> {
    let connection = Connection::open(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    configure_connection(&connection)?;
    ensure_schema(&connection)?;
    Ok(connection)
}

pub fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    connection
        .pragma_update(None, "foreign_keys", "ON")
        .context("failed to enable foreign_keys")?;
    Ok(())
}

pub fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
        CREATE TABLE IF NOT EXISTS metadata (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS imports (
          import_id TEXT PRIMARY KEY,
          import_kind TEXT NOT NULL,
          agency_type TEXT NOT NULL,
          source_path TEXT NOT NULL,
          source_sha256 TEXT NOT NULL,
          record_count INTEGER NOT NULL,
          manifest_path TEXT NOT NULL,
          completed_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS officers (
          officer_idx INTEGER PRIMARY KEY,
          import_id TEXT NOT NULL,
          email TEXT,
          name TEXT,
          position TEXT,
          division TEXT,
          grade TEXT,
          position_number TEXT,
          gender TEXT,
          qualification TEXT,
          employment_status TEXT,
          commencement_date TEXT,
          date_of_birth TEXT,
          performance_rating REAL,
          technical_capability_gaps TEXT,
          grading_group TEXT NOT NULL,
          misalignment TEXT,
          misalignment_note TEXT,
          gap_tag TEXT NOT NULL,
          gap_reason TEXT
        );

        CREATE TABLE IF NOT EXISTS capability_ratings (
          officer_idx INTEGER NOT NULL,
          question_code TEXT NOT NULL,
          current_score REAL NOT NULL,
          realistic_score REAL NOT NULL,
          gap_score REAL NOT NULL,
          gap_category TEXT NOT NULL,
          current_score_category TEXT NOT NULL,
          PRIMARY KEY(officer_idx, question_code),
          FOREIGN KEY(officer_idx) REFERENCES officers(officer_idx)
        );

        CREATE TABLE IF NOT EXISTS establishment_positions (
          position_idx INTEGER PRIMARY KEY,
          import_id TEXT NOT NULL,
          position_number TEXT,
          division TEXT,
          grade TEXT,
          designation TEXT,
          occupant TEXT NOT NULL,
          status TEXT,
          gender TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_officers_gap_tag ON officers(gap_tag);
        CREATE INDEX IF NOT EXISTS idx_officers_division ON officers(division);
        CREATE INDEX IF NOT EXISTS idx_ratings_code ON capability_ratings(question_code);
        CREATE INDEX IF NOT EXISTS idx_positions_division ON establishment_positions(division);
        ",
        )
        .context("failed to initialize store schema")?;

    let now = now_utc_string();
    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('db_schema_version', ?1)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![DB_SCHEMA_VERSION],
    )?;
    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('schema_checked_at', ?1)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![now],
    )?;

    Ok(())
}

/// Drops the previous officer set and writes `records` in one transaction.
pub fn replace_officers(
    connection: &mut Connection,
    import_id: &str,
    records: &[OfficerRecord],
) -> Result<usize> {
    let tx = connection.transaction()?;
    tx.execute("DELETE FROM capability_ratings", [])?;
    tx.execute("DELETE FROM officers", [])?;

    let mut ratings_inserted = 0usize;
    {
        let mut officer_stmt = tx.prepare(
            "INSERT INTO officers(
               officer_idx, import_id, email, name, position, division, grade, position_number,
               gender, qualification, employment_status, commencement_date, date_of_birth,
               performance_rating, technical_capability_gaps, grading_group, misalignment,
               misalignment_note, gap_tag, gap_reason
             ) VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
        )?;
        let mut rating_stmt = tx.prepare(
            "INSERT INTO capability_ratings(
               officer_idx, question_code, current_score, realistic_score, gap_score,
               gap_category, current_score_category
             ) VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;

        for (index, record) in records.iter().enumerate() {
            let officer_idx = index as i64;
            let gaps = serde_json::to_string(&record.technical_capability_gaps)
                .context("failed to serialize technical capability gaps")?;

            officer_stmt.execute(params![
                officer_idx,
                import_id,
                record.email,
                record.name,
                record.position,
                record.division,
                record.grade,
                record.position_number,
                record.gender,
                record.qualification,
                record.employment_status,
                record.commencement_date,
                record.date_of_birth,
                record.performance_rating,
                gaps,
                record.grading_group.as_str(),
                record.misalignment.map(|value| value.as_str()),
                record.misalignment.map(|value| value.description()),
                record.gap_tag.as_str(),
                record.gap_reason,
            ])?;

            for rating in &record.capability_ratings {
                rating_stmt.execute(params![
                    officer_idx,
                    rating.question_code,
                    rating.current_score,
                    rating.realistic_score,
                    rating.gap_score,
                    rating.gap_category.as_str(),
                    rating.current_score_category.as_str(),
                ])?;
                ratings_inserted += 1;
            }
        }
    }

    tx.commit().context("failed to commit officer import")?;
    Ok(ratings_inserted)
}

/// Drops the previous establishment and writes `records` in one transaction.
pub fn replace_establishment(
    connection: &mut Connection,
    import_id: &str,
    records: &[EstablishmentRecord],
) -> Result<usize> {
    let tx = connection.transaction()?;
    tx.execute("DELETE FROM establishment_positions", [])?;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO establishment_positions(
               position_idx, import_id, position_number, division, grade, designation,
               occupant, status, gender
             ) VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;

        for (index, record) in records.iter().enumerate() {
            stmt.execute(params![
                index as i64,
                import_id,
                record.position_number,
                record.division,
                record.grade,
                record.designation,
                record.occupant,
                record.status,
                record.gender,
            ])?;
        }
    }

    tx.commit()
        .context("failed to commit establishment import")?;
    Ok(records.len())
}

pub fn record_import(
    connection: &Connection,
    manifest: &ImportRunManifest,
    manifest_path: &Path,
) -> Result<()> {
    connection
        .execute(
            "INSERT INTO imports(
               import_id, import_kind, agency_type, source_path, source_sha256,
               record_count, manifest_path, completed_at
             ) VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(import_id) DO UPDATE SET
               record_count = excluded.record_count,
               manifest_path = excluded.manifest_path,
               completed_at = excluded.completed_at",
            params![
                manifest.import_id,
                manifest.import_kind,
                manifest.agency_type.as_str(),
                manifest.source.path,
                manifest.source.sha256,
                manifest.counts.records_kept as i64,
                manifest_path.display().to_string(),
                manifest.updated_at,
            ],
        )
        .with_context(|| format!("failed to record import {}", manifest.import_id))?;
    Ok(())
}

pub fn latest_import(connection: &Connection, import_kind: &str) -> Result<Option<ImportRow>> {
    let row = connection
        .query_row(
            "SELECT import_id, import_kind, agency_type, source_path, record_count,
                    manifest_path, completed_at
             FROM imports
             WHERE import_kind = ?1
             ORDER BY completed_at DESC, import_id DESC
             LIMIT 1",
            params![import_kind],
            |row| {
                Ok(ImportRow {
                    import_id: row.get(0)?,
                    import_kind: row.get(1)?,
                    agency_type: row.get(2)?,
                    source_path: row.get(3)?,
                    record_count: row.get(4)?,
                    manifest_path: row.get(5)?,
                    completed_at: row.get(6)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

pub fn count_rows(connection: &Connection, sql: &str) -> Result<i64> {
    let count = connection.query_row(sql, [], |row| row.get(0))?;
    Ok(count)
}
