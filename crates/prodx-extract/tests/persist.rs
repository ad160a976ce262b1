//! Persistence of assembled records to disk.

use chrono::{TimeZone, Utc};

use prodx_extract::persist::{default_file_name, read_record, write_record, write_record_to};
use prodx_extract::{assemble_at, Document, PersistError};

const PRODUCT_PAGE: &str = include_str!("fixtures/product_page.html");
const POLISH_PAGE: &str = include_str!("fixtures/polish_page.html");

#[test]
fn extracted_record_round_trips_through_disk() {
    let at = Utc.with_ymd_and_hms(2025, 7, 18, 9, 30, 0).unwrap();
    let record = assemble_at(
        &Document::parse(PRODUCT_PAGE),
        "https://www.aliexpress.com/item/1005006722922099.html",
        at,
    )
    .record;

    let dir = tempfile::tempdir().unwrap();
    let path = write_record(&record, dir.path()).unwrap();

    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("product_1005006722922099_20250718_093000.json")
    );
    assert_eq!(read_record(&path).unwrap(), record);
}

#[test]
fn written_json_is_indented_and_keeps_non_ascii() {
    let at = Utc.with_ymd_and_hms(2025, 7, 18, 9, 30, 0).unwrap();
    let record = assemble_at(&Document::parse(POLISH_PAGE), "file:///tmp/p.html", at).record;
    assert_eq!(default_file_name(&record), "product_unknown_20250718_093000.json");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    write_record_to(&record, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("{\n  \"url\": \"file:///tmp/p.html\""));
    assert!(text.contains("Darmowa dostawa powyżej 30 zł"));
    assert!(text.ends_with("}\n"));
}

#[test]
fn writing_into_a_file_path_fails_with_io_error() {
    let at = Utc.with_ymd_and_hms(2025, 7, 18, 9, 30, 0).unwrap();
    let record = assemble_at(&Document::parse(""), "u", at).record;

    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "x").unwrap();

    let err = write_record(&record, &blocker).unwrap_err();
    assert!(matches!(err, PersistError::Io { .. }));
}
