use crate::table::Table;
use crate::validate::IssueReport;
use regex::Regex;

pub const SPECIAL_CHARACTERS: &str = "Contains spaces, hyphens, or special characters.";
pub const OUTSIDE_ALPHANUMERIC: &str = "Contains characters outside of alphanumeric and underscores.";

/// Checks every column name against the naming convention: no whitespace or
/// punctuation, only letters, digits and underscores.
///
/// The special character check wins when both fail, so each column is
/// reported at most once.
pub fn check_column_names(table: &Table) -> IssueReport {
    let forbidden =
        Regex::new(r#"[\s!@#$%^&*()\-+={}\[\]|\\:;"'<>,?/]"#).expect("Hardcode regex pattern");
    let conventional = Regex::new(r"^[A-Za-z0-9_]+$").expect("Hardcode regex pattern");

    let mut issues = IssueReport::new();
    for name in table.column_names() {
        if forbidden.is_match(name) {
            issues.insert(name, SPECIAL_CHARACTERS);
        } else if !conventional.is_match(name) {
            issues.insert(name, OUTSIDE_ALPHANUMERIC);
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, Value};

    fn table(names: &[&str]) -> Table {
        Table::new(
            names
                .iter()
                .map(|name| Column::new(*name, vec![Value::Int(1)]))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn conventional_names_pass() {
        let issues = check_column_names(&table(&["temp_c", "Station_ID", "x1"]));
        assert!(issues.is_empty());
    }

    #[test]
    fn special_characters_take_precedence() {
        let issues = check_column_names(&table(&["Air Temp (C)", "depth-m", "tab\tname"]));
        assert_eq!(issues.get("Air Temp (C)"), Some(SPECIAL_CHARACTERS));
        assert_eq!(issues.get("depth-m"), Some(SPECIAL_CHARACTERS));
        assert_eq!(issues.get("tab\tname"), Some(SPECIAL_CHARACTERS));
    }

    #[test]
    fn other_characters() {
        let issues = check_column_names(&table(&["température", "salinity.psu", "ok_name"]));
        assert_eq!(issues.get("température"), Some(OUTSIDE_ALPHANUMERIC));
        assert_eq!(issues.get("salinity.psu"), Some(OUTSIDE_ALPHANUMERIC));
        assert!(!issues.contains("ok_name"));
        assert_eq!(issues.len(), 2);
    }
}
