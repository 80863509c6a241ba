use eda_core::{loader, ColumnKind};
use eda_frame::coerce::{coerce_dates, coerce_numeric_columns};
use eda_frame::{pivot_sum, reduce_schema, sum_by_category, value_counts, CategoryPolicy, DateOrder};

const DATA: &str = "\
continent,location,date,total_cases
Europe,Poland,2021-01-01,10
Europe,Hungary,2021-01-01,4
Europe,Poland,2021-01-02,12
Europe,Hungary,2021-01-02,
Europe,Poland,2021-01-03,15
Europe,Hungary,2021-01-03,7
Europe,Poland,2021-01-03,1
,Czechia,2021-01-03,3
";

#[test]
fn test_load_reduce_aggregate_pivot() {
    let mut table = loader::read_csv_from_reader(DATA.as_bytes(), &Default::default()).unwrap();
    assert_eq!(coerce_dates(&mut table, "date", DateOrder::YearFirst).unwrap(), 0);
    coerce_numeric_columns(&mut table, &["total_cases".to_string()]).unwrap();

    let converted = reduce_schema(&mut table, &CategoryPolicy::default()).unwrap();
    assert_eq!(converted, vec!["continent", "location"]);
    assert_eq!(table.kind("location").unwrap(), ColumnKind::Category);

    let continents = value_counts(&table, "continent", true).unwrap();
    assert_eq!(continents[0].count, 7);
    assert_eq!(continents[1].label, None);

    let sums = sum_by_category(&table, "location", "total_cases").unwrap();
    assert_eq!(sums[0].category, "Poland");
    assert_eq!(sums[0].total, 38.0);

    let pivot = pivot_sum(&table, "date", "location", "total_cases").unwrap();
    assert_eq!(pivot.columns(), &["Czechia", "Hungary", "Poland"]);
    assert_eq!(pivot.n_rows(), 3);
    assert_eq!(pivot.column("Poland").unwrap(), vec![Some(10.0), Some(12.0), Some(16.0)]);
    assert_eq!(pivot.column("Hungary").unwrap()[1], None);

    let dense = pivot.drop_incomplete_rows();
    assert!(dense.is_dense());
    assert_eq!(dense.n_rows(), 1);
    assert_eq!(dense.column_values("Czechia").unwrap(), vec![3.0]);
}
