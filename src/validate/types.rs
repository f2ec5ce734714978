use crate::table::{ColumnType, Table, TypeCategory};
use serde::Serialize;

/// Inferred type of one column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TypeSummary {
    pub column: String,
    pub kind: ColumnType,
    pub category: TypeCategory,
}

/// Lists the inferred type of every column. Informational only.
pub fn check_data_types(table: &Table) -> Vec<TypeSummary> {
    table
        .columns()
        .iter()
        .map(|column| TypeSummary {
            column: column.name().to_owned(),
            kind: column.kind(),
            category: column.kind().category(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, Value};

    #[test]
    fn every_column_is_listed() {
        let table = Table::new(vec![
            Column::new("id", vec![Value::Int(1)]),
            Column::new("site", vec!["reef".into()]),
            Column::new("ok", vec![Value::Bool(true)]),
        ])
        .unwrap();

        let summary = check_data_types(&table);
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].kind, ColumnType::BigInt);
        assert_eq!(summary[0].category, TypeCategory::Numeric);
        assert_eq!(summary[1].category, TypeCategory::Text);
        assert_eq!(summary[2].category, TypeCategory::Boolean);
    }
}
