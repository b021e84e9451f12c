//! Load, coerce and process datatables end to end.

use mwb_ingest::{ParseOptions, read_data_table};
use mwb_model::{CanonicalTable, CellValue, MissingValueMethod, TableRow};
use mwb_transform::{
    MissingValueStatus, coerce_numeric, count_missing, process_missing_values,
};
use proptest::prelude::*;

const EXAMPLE: &str = "Samples\tClass\tF1\tF2\nS1\tA\t1.0\t2.0\nS2\tB\t\t4.0\nS3\tA\t3.0\t5.0\n";

fn load_example() -> CanonicalTable {
    let (mut table, classes) =
        read_data_table(EXAMPLE, &ParseOptions::default()).expect("example parses");
    assert_eq!(classes.code("A"), Some(1));
    assert_eq!(classes.code("B"), Some(2));
    let start = table.feature_offset();
    coerce_numeric(&mut table, start);
    table
}

#[test]
fn example_has_one_missing_value() {
    let table = load_example();
    assert_eq!(
        table.column_names(),
        vec!["Samples", "Class", "ClassNum", "F1", "F2"]
    );
    assert_eq!(table.row("S2").expect("S2").features[0], CellValue::Missing);
    assert_eq!(count_missing(&table), 1);
}

#[test]
fn example_replace_by_zero() {
    let outcome = process_missing_values(load_example(), Some("ReplaceByZero"));
    let s2 = outcome.table.row("S2").expect("S2");
    assert_eq!(s2.features[0], CellValue::Number(0.0));
    assert_eq!(outcome.report.missing_before, 1);
    assert_eq!(outcome.report.missing_after, 0);
}

#[test]
fn example_delete_rows() {
    let outcome = process_missing_values(load_example(), Some("DeleteRows"));
    assert_eq!(
        outcome.table.sample_keys().collect::<Vec<_>>(),
        vec!["S1", "S3"]
    );
    assert_eq!(outcome.report.rows_removed, 1);
}

#[test]
fn non_numeric_sentinels_do_not_survive_coercion() {
    let (mut table, _) = read_data_table(
        "Samples\tClass\tF1\nS1\tA\t<LOD\nS2\tA\t2.5\n",
        &ParseOptions::default(),
    )
    .expect("parse");
    coerce_numeric(&mut table, 3);
    assert_eq!(table.row("S1").expect("S1").features, vec![CellValue::Missing]);
    assert_eq!(table.row("S1").expect("S1").class_label, "A");
}

fn cell_strategy() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        3 => (-1000.0f64..1000.0).prop_map(CellValue::Number),
        1 => Just(CellValue::Missing),
    ]
}

fn table_strategy() -> impl Strategy<Value = CanonicalTable> {
    (1usize..4, 1usize..8).prop_flat_map(|(width, height)| {
        prop::collection::vec(prop::collection::vec(cell_strategy(), width), height).prop_map(
            move |rows| {
                let names = (1..=width).map(|i| format!("F{i}")).collect();
                let mut table = CanonicalTable::new("Samples", "Class", true, names);
                for (index, features) in rows.into_iter().enumerate() {
                    table
                        .push_row(TableRow {
                            sample_key: format!("S{index}"),
                            class_label: "A".to_string(),
                            class_code: Some(1),
                            features,
                        })
                        .expect("unique keys");
                }
                table
            },
        )
    })
}

fn token_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<f64>().prop_map(|v| v.to_string()),
        "[a-zA-Z<>.#/ -]{0,6}",
        Just("NaN".to_string()),
    ]
}

proptest! {
    #[test]
    fn fill_methods_converge(table in table_strategy(), method_index in 0usize..4) {
        let method = [
            MissingValueMethod::ReplaceByColumnMean,
            MissingValueMethod::ReplaceByColumnMedian,
            MissingValueMethod::ReplaceByZero,
            MissingValueMethod::LinearInterpolation,
        ][method_index];
        let first = process_missing_values(table, Some(method.as_str()));
        prop_assert_eq!(count_missing(&first.table), 0);
        let second = process_missing_values(first.table.clone(), Some(method.as_str()));
        prop_assert_eq!(second.report.status, MissingValueStatus::NoMissingValues);
        prop_assert_eq!(second.table, first.table);
    }

    #[test]
    fn no_action_is_idempotent(table in table_strategy()) {
        let first = process_missing_values(table.clone(), Some("NoAction"));
        let second = process_missing_values(first.table.clone(), Some("NoAction"));
        prop_assert_eq!(&first.table, &table);
        prop_assert_eq!(second.table, table);
    }

    #[test]
    fn coercion_leaves_numbers_or_missing(tokens in prop::collection::vec(token_strategy(), 1..6)) {
        let names = (1..=tokens.len()).map(|i| format!("F{i}")).collect();
        let mut table = CanonicalTable::new("Samples", "Class", true, names);
        table
            .push_row(TableRow {
                sample_key: "S1".to_string(),
                class_label: "A".to_string(),
                class_code: Some(1),
                features: tokens.into_iter().map(CellValue::Text).collect(),
            })
            .expect("push");
        coerce_numeric(&mut table, 3);
        for cell in &table.rows()[0].features {
            prop_assert!(matches!(cell, CellValue::Number(n) if !n.is_nan()) || cell.is_missing());
        }
    }
}
