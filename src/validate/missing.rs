use crate::table::Table;
use serde::Serialize;

/// Number of missing values in one column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MissingCount {
    pub column: String,
    pub count: usize,
}

/// Counts missing values per column, keeping only columns that have any.
pub fn check_missing_values(table: &Table) -> Vec<MissingCount> {
    table
        .columns()
        .iter()
        .map(|column| MissingCount {
            column: column.name().to_owned(),
            count: column.null_count(),
        })
        .filter(|missing| missing.count > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, Value};

    #[test]
    fn counts_only_columns_with_nulls() {
        let table = Table::new(vec![
            Column::new(
                "flag",
                vec![Value::Int(1), Value::Null, Value::Int(3), Value::Null],
            ),
            Column::new("id", vec!["a".into(), "b".into(), "c".into(), "d".into()]),
        ])
        .unwrap();

        assert_eq!(
            check_missing_values(&table),
            vec![MissingCount {
                column: "flag".to_owned(),
                count: 2
            }]
        );
    }

    #[test]
    fn no_missing_values() {
        let table = Table::new(vec![Column::new("id", vec![Value::Int(1)])]).unwrap();
        assert!(check_missing_values(&table).is_empty());
    }
}
