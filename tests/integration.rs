//! Integration tests for PremiumLens

use premiumlens::{
    aggregate_premium, combine_csv, compare_premium, load_csv, split_data, AnalysisError,
    CentralTendency, CombineOptions, Config, SplitColumns, Value,
};
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "id,neighbourhood_cleansed,property_type,bedrooms,price,review_scores_rating";

/// Create a test CSV file with listing rows
fn create_test_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file
}

fn columns() -> SplitColumns {
    SplitColumns::new(
        "neighbourhood_cleansed",
        "bedrooms",
        "property_type",
        "review_scores_rating",
    )
}

fn two_neighbourhood_csv() -> NamedTempFile {
    create_test_csv(&[
        "1,Hackney,Entire flat,1,\"$100.00\",90",
        "2,Hackney,Entire flat,1,\"$100.00\",90",
        "3,Hackney,Entire flat,1,\"$100.00\",98",
        "4,Hackney,Entire flat,1,\"$400.00\",98",
        "5,Camden,Entire flat,1,\"$50.00\",80",
        "6,Camden,Entire flat,1,\"$50.00\",80",
        "7,Camden,Entire flat,1,\"$50.00\",95",
        "8,Camden,Entire flat,1,\"$50.00\",95",
    ])
}

#[test]
fn test_end_to_end_pipeline() {
    let file = two_neighbourhood_csv();
    let options = CombineOptions {
        currency_columns: vec!["price".to_string()],
        ..Default::default()
    };
    let table = combine_csv(&[file.path()], &options).unwrap();
    assert_eq!(table.len(), 8);

    let partition = split_data(&table, &columns(), CentralTendency::Mean).unwrap();
    assert_eq!(partition.above.len() + partition.below.len(), table.len());
    assert_eq!(partition.group_stats().len(), 2);
    assert_eq!(partition.group_stats()[0].mean_price, 175.0);
    assert_eq!(partition.group_stats()[1].mean_price, 50.0);

    let records = compare_premium("neighbourhood_cleansed", &partition.above, &partition.below).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.total_count == 4));
    assert_eq!(records[0].value, Value::from("Camden"));
    assert_eq!(records[0].relative_premium, 0.0);
    assert!((records[1].relative_premium - 1.5).abs() < 1e-12);

    let summaries = aggregate_premium("neighbourhood_cleansed", &partition.above, &partition.below).unwrap();
    assert_eq!(summaries.len(), 2);
    for summary in &summaries {
        assert_eq!(summary.above_count, 2);
        assert_eq!(summary.below_count, 2);
    }
}

#[test]
fn test_combine_csv_tags_source_file() {
    let first = create_test_csv(&[
        "1,Hackney,Entire flat,1,120,91",
        "2,Hackney,Private room,1,60,85",
    ]);
    let second = create_test_csv(&["3,Camden,Entire flat,2,210,97"]);

    let options = CombineOptions {
        append_file_name: true,
        ..Default::default()
    };
    let table = combine_csv(&[first.path(), second.path()], &options).unwrap();

    assert_eq!(table.len(), 3);
    let sources = table.column("filename").unwrap();
    let first_name = first.path().display().to_string();
    let second_name = second.path().display().to_string();
    assert_eq!(sources[0], &Value::Text(first_name.clone()));
    assert_eq!(sources[1], &Value::Text(first_name));
    assert_eq!(sources[2], &Value::Text(second_name));
}

#[test]
fn test_combine_csv_saves_combined_file() {
    let first = create_test_csv(&["1,Hackney,Entire flat,1,120,91"]);
    let second = create_test_csv(&["2,Camden,Entire flat,2,210,97"]);
    let out_dir = tempfile::tempdir().unwrap();
    let out_path = out_dir.path().join("combined.csv");

    let options = CombineOptions {
        append_file_name: true,
        save_to: Some(out_path.clone()),
        ..Default::default()
    };
    combine_csv(&[first.path(), second.path()], &options).unwrap();

    let saved = load_csv(&out_path).unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved.schema().names().last().map(String::as_str), Some("filename"));
}

#[test]
fn test_schema_mismatch_between_files() {
    let first = create_test_csv(&["1,Hackney,Entire flat,1,120,91"]);
    let mut second = NamedTempFile::new().unwrap();
    writeln!(second, "id,borough,property_type,bedrooms,price,review_scores_rating").unwrap();
    writeln!(second, "2,Camden,Entire flat,2,210,97").unwrap();

    let result = combine_csv(&[first.path(), second.path()], &CombineOptions::default());
    assert!(matches!(result, Err(AnalysisError::SchemaMismatch { .. })));
}

#[test]
fn test_unknown_column_fails_fast() {
    let file = two_neighbourhood_csv();
    let table = load_csv(file.path()).unwrap();

    let bad = SplitColumns::new("neighbourhood", "bedrooms", "property_type", "review_scores_rating");
    let err = split_data(&table, &bad, CentralTendency::Mean).unwrap_err();
    assert!(err.to_string().contains("unknown column 'neighbourhood'"));
}

#[test]
fn test_header_only_file_splits_to_empty() {
    let file = create_test_csv(&[]);
    let table = combine_csv(&[file.path()], &Config::default().combine_options()).unwrap();
    assert!(table.is_empty());

    let columns = Config::default().split_columns();
    let partition = split_data(&table, &columns, CentralTendency::Mean).unwrap();
    assert!(partition.above.is_empty());
    assert!(partition.below.is_empty());
    assert!(partition.group_stats().is_empty());
    assert!(compare_premium("bedrooms", &partition.above, &partition.below)
        .unwrap()
        .is_empty());
}

#[test]
fn test_blank_rating_column_lands_below() {
    let file = create_test_csv(&[
        "1,Hackney,Entire flat,1,\"$120.00\",",
        "2,Hackney,Entire flat,1,\"$180.00\",",
    ]);
    let table = combine_csv(&[file.path()], &Config::default().combine_options()).unwrap();
    assert_eq!(table.len(), 2);

    let columns = Config::default().split_columns();
    let partition = split_data(&table, &columns, CentralTendency::Mean).unwrap();
    assert!(partition.above.is_empty());
    assert_eq!(partition.below.len(), 2);
    assert!(partition.group_stats()[0].split_point.is_nan());

    let premiums: Vec<bool> = partition.below.rows().iter().map(|r| r.premium).collect();
    assert_eq!(premiums, vec![false, true]);
}

#[test]
fn test_single_listing_groups_land_below() {
    let file = create_test_csv(&[
        "1,Hackney,Entire flat,1,120,91",
        "2,Hackney,Entire flat,2,300,99",
        "3,Camden,Boat,1,80,70",
    ]);
    let table = load_csv(file.path()).unwrap();

    let partition = split_data(&table, &columns(), CentralTendency::Median).unwrap();
    assert!(partition.above.is_empty());
    assert_eq!(partition.below.len(), 3);
    assert!(partition.below.rows().iter().all(|r| r.premium_discount == 0.0 && !r.premium));
}
