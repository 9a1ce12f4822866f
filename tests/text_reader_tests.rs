use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use scope_rs::ScopeError;
use scope_rs::source::{DataSource, FieldFormat, SourceOptions, TextReader};
use tempfile::TempDir;

fn append(path: &Path, text: &str) {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .expect("open for append");
    file.write_all(text.as_bytes()).expect("append");
}

fn reader(path: &Path, format: FieldFormat) -> TextReader {
    TextReader::open(path, format, &SourceOptions::new()).expect("open reader")
}

#[test]
fn header_names_columns_and_metadata_is_kept() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("scan.txt");
    append(
        &path,
        "# device: lockin\n# columns: [locked, adc]\n0 0.5\n1 0.25\n",
    );

    let mut source = reader(&path, FieldFormat::Decimal);
    let table = source.init().expect("init");
    assert_eq!(table.column_names().collect::<Vec<_>>(), ["locked", "adc"]);
    assert_eq!(table.column("adc"), Some(&[0.5, 0.25][..]));
    assert_eq!(source.header().get("device").map(String::as_str), Some("lockin"));
}

#[test]
fn unnamed_columns_fall_back_to_positional_names() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("raw.txt");
    append(&path, "1 2 3\n4 5 6\n");

    let table = reader(&path, FieldFormat::Decimal).init().expect("init");
    assert_eq!(
        table.column_names().collect::<Vec<_>>(),
        ["col0", "col1", "col2"]
    );
    assert_eq!(table.row_count(), 2);
}

#[test]
fn update_only_consumes_complete_appended_lines() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("tail.txt");
    append(&path, "# columns: [t, v]\n0 1\n");

    let mut source = reader(&path, FieldFormat::Decimal);
    assert_eq!(source.init().expect("init").row_count(), 1);

    append(&path, "1 2\n2 ");
    let table = source.update().expect("partial line");
    assert_eq!(table.column("v"), Some(&[1.0, 2.0][..]));

    append(&path, "3\n");
    let table = source.update().expect("completed line");
    assert_eq!(table.column("t"), Some(&[0.0, 1.0, 2.0][..]));
    assert_eq!(table.column("v"), Some(&[1.0, 2.0, 3.0][..]));
}

#[test]
fn hex_fields_are_decoded() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("hex.txt");
    append(&path, "0x10 ff\n0X0a 01\n");

    let table = reader(&path, FieldFormat::Hex).init().expect("init");
    assert_eq!(table.column("col0"), Some(&[16.0, 10.0][..]));
    assert_eq!(table.column("col1"), Some(&[255.0, 1.0][..]));
}

#[test]
fn columns_option_overrides_header() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("named.txt");
    append(&path, "# columns: [a, b]\n1 2\n");

    let mut options = SourceOptions::new();
    options.insert("columns".to_owned(), serde_json::json!(["left", "right"]));
    let table = TextReader::open(&path, FieldFormat::Decimal, &options)
        .expect("open")
        .init()
        .expect("init");
    assert_eq!(table.column_names().collect::<Vec<_>>(), ["left", "right"]);
}

#[test]
fn non_string_columns_option_is_rejected() {
    let mut options = SourceOptions::new();
    options.insert("columns".to_owned(), serde_json::json!([1, 2]));
    let err = TextReader::open("unused.txt", FieldFormat::Decimal, &options)
        .expect_err("bad option");
    assert!(matches!(err, ScopeError::Configuration(_)));
}

#[test]
fn malformed_field_reports_line_number() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("bad.txt");
    append(&path, "1 2\n3 oops\n");

    let err = reader(&path, FieldFormat::Decimal)
        .init()
        .expect_err("bad field");
    match err {
        ScopeError::DataSource(message) => {
            assert!(message.contains(":2:"), "{message}");
            assert!(message.contains("oops"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn ragged_row_is_a_data_source_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("ragged.txt");
    append(&path, "1 2\n3\n");

    let err = reader(&path, FieldFormat::Decimal)
        .init()
        .expect_err("ragged row");
    assert!(matches!(err, ScopeError::DataSource(_)));
}

#[test]
fn truncated_file_fails_update() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("truncated.txt");
    append(&path, "1 2\n3 4\n");

    let mut source = reader(&path, FieldFormat::Decimal);
    source.init().expect("init");
    fs::write(&path, "1 2\n").expect("truncate");
    assert!(matches!(source.update(), Err(ScopeError::DataSource(_))));
}

#[test]
fn missing_file_surfaces_io_error_at_init() {
    let dir = TempDir::new().expect("tempdir");
    let mut source = reader(&dir.path().join("absent.txt"), FieldFormat::Decimal);
    assert!(matches!(source.init(), Err(ScopeError::Io(_))));
}

#[test]
fn init_rereads_from_the_start() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("again.txt");
    append(&path, "1\n2\n");

    let mut source = reader(&path, FieldFormat::Decimal);
    source.init().expect("first init");
    assert_eq!(source.init().expect("second init").row_count(), 2);
}

#[test]
fn failed_update_leaves_reader_state_untouched_for_retry() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("retry.txt");
    append(&path, "1 2\n3 4\n");

    let mut source = reader(&path, FieldFormat::Decimal);
    source.init().expect("init");
    append(&path, "# gain: 2\n5 6\n7 oops\n");

    for _ in 0..2 {
        match source.update().expect_err("bad field") {
            ScopeError::DataSource(message) => assert!(message.contains(":5:"), "{message}"),
            other => panic!("unexpected error: {other}"),
        }
    }
    assert!(source.header().get("gain").is_none());

    // The writer fixes the line in place; the retry picks up every new row once.
    fs::write(&path, "1 2\n3 4\n# gain: 2\n5 6\n7 8\n").expect("rewrite");
    let table = source.update().expect("retry");
    assert_eq!(table.column("col0"), Some(&[1.0, 3.0, 5.0, 7.0][..]));
    assert_eq!(table.row_count(), 4);
    assert_eq!(source.header().get("gain").map(String::as_str), Some("2"));
}
