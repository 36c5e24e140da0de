//! End-to-end import runs through the public API

use flight_importer::app::services::flight_store::{create_schema, open_database, table_row_count};
use flight_importer::{CsvImporter, ImportConfig, SchemaMode};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = "FL_DATE,AIRLINE,AIRLINE_DOT,AIRLINE_CODE,DOT_CODE,FL_NUMBER,ORIGIN,ORIGIN_CITY,DEST,DEST_CITY,CRS_DEP_TIME,DEP_TIME,DEP_DELAY,CRS_ARR_TIME,ARR_TIME,ARR_DELAY,CANCELLED,CANCELLATION_CODE,DIVERTED,DELAY_DUE_CARRIER,DELAY_DUE_WEATHER,DELAY_DUE_NAS,DELAY_DUE_SECURITY,DELAY_DUE_LATE_AIRCRAFT";

const ROWS: &[&str] = &[
    "2023-01-15,Delta Air Lines Inc.,Delta Air Lines Inc.: DL,DL,19790,1234,ATL,\"Atlanta, GA\",JFK,\"New York, NY\",0900,0925,25.0,1130,1150,20.0,0.0,,0.0,20.0,0.0,0.0,0.0,0.0",
    "2023-01-16,American Airlines Inc.,American Airlines Inc.: AA,AA,19805,100,JFK,\"New York, NY\",LAX,\"Los Angeles, CA\",0800,,,1120,,,1.0,B,0.0,,,,,",
    "2023-01-17,Southwest Airlines Co.,Southwest Airlines Co.: WN,WN,19393,2210,LAS,\"Las Vegas, NV\",PHX,\"Phoenix, AZ\",1415.0,1448.0,33.0,1535.0,1601.0,26.0,0.0,,0.0,,,,,",
    "2023-01-18,United Air Lines Inc.,United Air Lines Inc.: UA,UA,19977,55,ORD,\"Chicago, IL\",DEN,\"Denver, CO\",0700,0702,2.0,0845,,,0.0,,1.0,,,,,",
    "",
    "not-a-date,Delta Air Lines Inc.,Delta Air Lines Inc.: DL,DL,19790,1,ATL,\"Atlanta, GA\",JFK,\"New York, NY\",0900,0900,0.0,1130,1130,0.0,0.0,,0.0,,,,,",
];

fn write_csv(dir: &Path, lines: &[&str]) -> PathBuf {
    let path = dir.join("flights.csv");
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content).unwrap();
    path
}

fn config_for(temp_dir: &TempDir) -> ImportConfig {
    ImportConfig::default()
        .with_database_path(temp_dir.path().join("flights.db"))
        .with_log_dir(temp_dir.path().join("logs"))
        .with_batch_size(2)
        .without_progress()
}

fn run(config: &ImportConfig, csv: &Path) -> flight_importer::ImportReport {
    let conn = open_database(&config.database_path).unwrap();
    create_schema(&conn, config.schema_mode).unwrap();
    CsvImporter::new(&conn, config.clone()).import(csv).unwrap()
}

#[test]
fn test_full_import_into_database_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut lines = vec![HEADER];
    lines.extend_from_slice(ROWS);
    let csv = write_csv(temp_dir.path(), &lines);
    let config = config_for(&temp_dir);

    let report = run(&config, &csv);

    assert_eq!(report.total_rows(), 6);
    assert_eq!(report.attempted_rows(), 6);
    assert_eq!(report.processed_rows(), 4);
    assert_eq!(report.skipped_rows(), 2);
    assert_eq!(report.cancelled_flights(), 1);
    assert_eq!(report.diverted_flights(), 1);
    assert_eq!(report.unique_airlines(), 4);
    assert_eq!(report.unique_airports(), 7);
    assert_eq!(
        report.top_skip_reasons(10),
        vec![("EmptyLine".to_string(), 1), ("InvalidDate".to_string(), 1)]
    );

    // Data is committed and visible to a fresh connection
    let conn = open_database(&config.database_path).unwrap();
    assert_eq!(table_row_count(&conn, "Flight").unwrap(), 4);
    assert_eq!(table_row_count(&conn, "Airline").unwrap(), 4);
    assert_eq!(table_row_count(&conn, "Airport").unwrap(), 7);
    assert_eq!(table_row_count(&conn, "DelayReason").unwrap(), 2);

    let (departure, arrival): (i64, i64) = conn
        .query_row(
            "SELECT actual_departure, actual_arrival FROM Flight WHERE airline_code = 'WN'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!((departure, arrival), (1448, 1601));

    let unspecified: i64 = conn
        .query_row(
            "SELECT delay_minutes FROM DelayReason WHERE reason = 'UNSPECIFIED'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(unspecified, 26);

    let log = fs::read_to_string(report.log_path()).unwrap();
    assert!(report.log_path().starts_with(temp_dir.path().join("logs")));
    assert!(log.contains("Line 6: Skipped - Empty line"));
    assert!(log.contains("Line 7: Skipped - Invalid or missing date: 'not-a-date'"));
    assert!(log.contains("Success rate: 66.67%"));
}

#[test]
fn test_recreate_and_preserve_modes() {
    let temp_dir = TempDir::new().unwrap();
    let csv = write_csv(temp_dir.path(), &[HEADER, ROWS[0], ROWS[1]]);

    let config = config_for(&temp_dir);
    run(&config, &csv);
    run(&config, &csv);

    let conn = open_database(&config.database_path).unwrap();
    assert_eq!(table_row_count(&conn, "Flight").unwrap(), 2);
    drop(conn);

    let preserve = config.with_schema_mode(SchemaMode::Preserve);
    let report = run(&preserve, &csv);
    assert_eq!(report.processed_rows(), 2);

    let conn = open_database(&preserve.database_path).unwrap();
    assert_eq!(table_row_count(&conn, "Flight").unwrap(), 4);
    assert_eq!(table_row_count(&conn, "Airport").unwrap(), 3);
}
