use eda_core::describe::{describe, duplicate_count, info, missing_counts, Include};
use eda_core::loader::{read_csv, read_csv_with, CsvOptions};
use eda_core::{ColumnKind, Value};
use std::io::Write;

fn fixture(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_read_owid_like_file() {
    let file = fixture(
        "iso_code,location,date,total_cases,tests_units\n\
         POL,Poland,2021-01-01,10,tests performed\n\
         POL,Poland,2021-01-02,NaN,\n\
         HUN,Hungary,2021-01-01,4.5,people tested\n",
    );
    let table = read_csv(file.path()).unwrap();
    assert_eq!(table.shape(), (3, 5));
    assert_eq!(table.kind("total_cases").unwrap(), ColumnKind::Float);
    assert_eq!(table.kind("location").unwrap(), ColumnKind::Text);
    assert_eq!(table.values("total_cases").unwrap()[2], Value::Float(4.5));
    assert_eq!(table.values("tests_units").unwrap()[1], Value::Missing);

    let missing = missing_counts(&table);
    assert!(missing.contains(&("total_cases".to_string(), 1)));
    assert!(missing.contains(&("tests_units".to_string(), 1)));
    assert_eq!(info(&table)[3].non_null, 2);

    let summary = describe(&table, Include::Numeric).unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].count, 2);
}

#[test]
fn test_semicolon_and_duplicates() {
    let file = fixture("a;b\n1;x\n1;x\n2;y\n");
    let options = CsvOptions {
        delimiter: b';',
        ..Default::default()
    };
    let table = read_csv_with(file.path(), &options).unwrap();
    assert_eq!(table.shape(), (3, 2));
    assert_eq!(duplicate_count(&table).unwrap(), 1);
}

#[test]
fn test_missing_file() {
    let err = read_csv("/no/such/file.csv").unwrap_err();
    assert!(matches!(err, eda_core::Error::Io(_)));
}

#[test]
fn test_all_empty_column_beside_text_columns() {
    let mut contents = String::from("empty,a,b,c,d\n");
    for i in 0..40 {
        contents.push_str(&format!(",x{},y{},z{},w{}\n", i % 3, i % 2, i % 4, i % 5));
    }
    let file = fixture(&contents);
    let table = read_csv(file.path()).unwrap();
    assert_eq!(table.shape(), (40, 5));
    assert_eq!(table.kind("empty").unwrap(), ColumnKind::Float);
    assert_eq!(table.n_unique("empty").unwrap(), 0);
    assert_eq!(table.columns_of_kind(ColumnKind::Text), vec!["a", "b", "c", "d"]);
}
