use std::path::{Path, PathBuf};

use calamine::{Data, ExcelDateTime, ExcelDateTimeType};
use rusqlite::Connection;

use super::load_config;
use super::source_files::{LoadedSource, cell_from_data, detect_source_kind, load_source};
use super::store::{
    count_rows, ensure_schema, latest_import, record_import, replace_establishment,
    replace_officers,
};
use crate::cli::SourceKind;
use crate::model::{
    AgencyType, EstablishmentRecord, ImportCounts, ImportPaths, ImportRunManifest, ImportSummary,
    SourceEntry,
};
use crate::normalize::{
    Cell, NormalizeConfig, WorkforceSummary, parse_pasted_table, summarize_officers,
};

fn memory_store() -> Connection {
    let connection = Connection::open_in_memory().expect("in-memory sqlite should open");
    ensure_schema(&connection).expect("schema should initialize");
    connection
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("workforce_ingest_{}_{name}", std::process::id()))
}

fn sample_manifest(import_id: &str, updated_at: &str) -> ImportRunManifest {
    ImportRunManifest {
        manifest_version: 1,
        import_id: import_id.to_string(),
        import_kind: "officers".to_string(),
        status: "completed".to_string(),
        started_at: updated_at.to_string(),
        updated_at: updated_at.to_string(),
        command: "workforce-ingest import".to_string(),
        agency_type: AgencyType::NationalDepartment,
        source: SourceEntry {
            path: "survey.tsv".to_string(),
            kind: "pasted".to_string(),
            sha256: "00".to_string(),
            byte_len: 2,
        },
        paths: ImportPaths {
            cache_root: ".cache/workforce".to_string(),
            manifest_dir: ".cache/workforce/manifests".to_string(),
            db_path: ".cache/workforce/workforce.sqlite".to_string(),
            records_path: ".cache/workforce/records/officers.json".to_string(),
        },
        headers: Vec::new(),
        resolved_fields: Vec::new(),
        unresolved_fields: Vec::new(),
        rating_columns: Vec::new(),
        counts: ImportCounts {
            records_kept: 3,
            ..ImportCounts::default()
        },
        summary: ImportSummary::Officers(WorkforceSummary::default()),
        warnings: Vec::new(),
    }
}

const SURVEY: &str = "Email\tName\tPosition\tGrade\tA1 Strategy\tB2 Finance\n\
                      a@example.com\tA\tClerk\tGrade 9\t4\t6\n\
                      b@example.com\tB\tManager\tGrade 16\t9\t\n";

#[test]
fn detect_source_kind_uses_extension_unless_forced() {
    assert_eq!(
        detect_source_kind(Path::new("survey.XLSX"), SourceKind::Auto).expect("xlsx"),
        SourceKind::Workbook
    );
    assert_eq!(
        detect_source_kind(Path::new("paste.tsv"), SourceKind::Auto).expect("tsv"),
        SourceKind::Pasted
    );
    assert_eq!(
        detect_source_kind(Path::new("rows.json"), SourceKind::Auto).expect("json"),
        SourceKind::Remote
    );
    assert_eq!(
        detect_source_kind(Path::new("rows.dat"), SourceKind::Pasted).expect("forced"),
        SourceKind::Pasted
    );
    assert!(detect_source_kind(Path::new("rows.dat"), SourceKind::Auto).is_err());
}

#[test]
fn load_source_reads_and_hashes_pasted_table() {
    let path = temp_path("survey.tsv");
    std::fs::write(&path, SURVEY).expect("survey should be written");

    let (source, entry) = load_source(&path, SourceKind::Auto).expect("source should load");
    let _ = std::fs::remove_file(&path);

    assert_eq!(entry.kind, "pasted");
    assert_eq!(entry.byte_len, SURVEY.len() as u64);
    assert_eq!(entry.sha256.len(), 64);
    match source {
        LoadedSource::Pasted(text) => assert_eq!(text, SURVEY),
        other => panic!("unexpected source: {other:?}"),
    }
}

#[test]
fn load_source_parses_remote_rows_json() {
    let path = temp_path("rows.json");
    std::fs::write(&path, r#"[{"Email": "a@example.com", "A1": "7"}]"#)
        .expect("rows should be written");

    let (source, entry) = load_source(&path, SourceKind::Auto).expect("source should load");
    let _ = std::fs::remove_file(&path);

    assert_eq!(entry.kind, "remote");
    match source {
        LoadedSource::Remote(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0]["A1"], "7");
        }
        other => panic!("unexpected source: {other:?}"),
    }
}

#[test]
fn cell_from_data_maps_workbook_cells() {
    assert_eq!(cell_from_data(&Data::Empty), Cell::Blank);
    assert_eq!(cell_from_data(&Data::Float(7.5)), Cell::Number(7.5));
    assert_eq!(cell_from_data(&Data::Int(12)), Cell::Number(12.0));
    assert_eq!(
        cell_from_data(&Data::String("Grade 12".to_string())),
        Cell::text("Grade 12")
    );
    assert_eq!(cell_from_data(&Data::Bool(true)), Cell::text("TRUE"));
}

#[test]
fn workbook_date_cells_become_iso_dates() {
    let date = Data::DateTime(ExcelDateTime::new(45123.0, ExcelDateTimeType::DateTime, false));
    assert_eq!(cell_from_data(&date), Cell::text("2023-07-16"));

    let moment = Data::DateTime(ExcelDateTime::new(45123.5, ExcelDateTimeType::DateTime, false));
    assert_eq!(cell_from_data(&moment), Cell::text("2023-07-16T12:00:00"));
}

#[test]
fn load_config_defaults_without_path() {
    let config = load_config(None).expect("default config");
    assert_eq!(config, NormalizeConfig::default());
}

#[test]
fn replace_officers_swaps_previous_import_wholesale() {
    let mut connection = memory_store();
    let parsed = parse_pasted_table(
        SURVEY,
        AgencyType::NationalDepartment,
        &NormalizeConfig::default(),
    )
    .expect("survey should parse");

    let ratings = replace_officers(&mut connection, "officers-1", &parsed.records)
        .expect("first import should store");
    assert_eq!(ratings, 3);
    assert_eq!(
        count_rows(&connection, "SELECT COUNT(*) FROM officers").expect("count"),
        2
    );

    let ratings = replace_officers(&mut connection, "officers-2", &parsed.records[..1])
        .expect("second import should store");
    assert_eq!(ratings, 2);
    assert_eq!(
        count_rows(&connection, "SELECT COUNT(*) FROM officers").expect("count"),
        1
    );
    assert_eq!(
        count_rows(
            &connection,
            "SELECT COUNT(*) FROM officers WHERE import_id = 'officers-1'"
        )
        .expect("count"),
        0
    );
    assert_eq!(
        count_rows(&connection, "SELECT COUNT(*) FROM capability_ratings").expect("count"),
        2
    );

    let tag: String = connection
        .query_row("SELECT gap_tag FROM officers WHERE officer_idx = 0", [], |row| {
            row.get(0)
        })
        .expect("gap tag");
    assert_eq!(tag, "SKILL_GAP");
}

#[test]
fn replace_establishment_stores_positions() {
    let mut connection = memory_store();
    let records = vec![
        EstablishmentRecord {
            position_number: "1001".to_string(),
            division: "Finance".to_string(),
            grade: "12".to_string(),
            designation: "Accountant".to_string(),
            occupant: "VACANT".to_string(),
            status: "Vacant".to_string(),
            gender: String::new(),
        };
        3
    ];

    let stored = replace_establishment(&mut connection, "establishment-1", &records)
        .expect("positions should store");

    assert_eq!(stored, 3);
    assert_eq!(
        count_rows(
            &connection,
            "SELECT COUNT(*) FROM establishment_positions WHERE occupant = 'VACANT'"
        )
        .expect("count"),
        3
    );
}

#[test]
fn latest_import_returns_most_recent_completed_import() {
    let connection = memory_store();
    assert!(
        latest_import(&connection, "officers")
            .expect("query")
            .is_none()
    );

    record_import(
        &connection,
        &sample_manifest("officers-a", "2026-01-01T00:00:00Z"),
        Path::new("a.json"),
    )
    .expect("first import recorded");
    record_import(
        &connection,
        &sample_manifest("officers-b", "2026-02-01T00:00:00Z"),
        Path::new("b.json"),
    )
    .expect("second import recorded");

    let latest = latest_import(&connection, "officers")
        .expect("query")
        .expect("an import should exist");
    assert_eq!(latest.import_id, "officers-b");
    assert_eq!(latest.manifest_path, "b.json");
    assert_eq!(latest.record_count, 3);
    assert_eq!(latest.agency_type, "national_department");
    assert!(
        latest_import(&connection, "establishment")
            .expect("query")
            .is_none()
    );
}

#[test]
fn import_manifest_round_trips_through_json() {
    let mut manifest = sample_manifest("officers-c", "2026-03-01T00:00:00Z");
    let parsed = parse_pasted_table(SURVEY, AgencyType::Other, &NormalizeConfig::default())
        .expect("survey should parse");
    manifest.summary = ImportSummary::Officers(summarize_officers(&parsed.records));

    let raw = serde_json::to_string(&manifest).expect("manifest should serialize");
    assert!(raw.contains("\"kind\":\"officers\""));
    let restored: ImportRunManifest = serde_json::from_str(&raw).expect("manifest should parse");

    match restored.summary {
        ImportSummary::Officers(summary) => {
            assert_eq!(summary.officer_count, 2);
            assert_eq!(summary.rating_count, 3);
        }
        ImportSummary::Establishment(_) => panic!("expected officer summary"),
    }
}
