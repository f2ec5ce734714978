/// Data formatting recommendations, shown before any file is checked.
pub const GUIDELINES: &str = "\
General data formatting recommendations

Best practices for column naming and data formats
- Use consistent naming conventions: snake_case (e.g. file_name, latitude_degS)
  or CamelCase (e.g. FileName, LatitudeDegS).
- Include units, preferably next to the column name separated by an underscore,
  e.g. Temperature_C for Celsius, Salinity_psu for practical salinity units.
- Date and time format: use ISO 8601 for dates (yyyy-mm-dd) and times (HH:MM:SS).
- Avoid special characters: keep column names simple and avoid spaces and
  symbols such as ! @ # $ % ^ & * ( ) - + = { } [ ] | \\ : ; \" ' < > , ? /
- Consistent data types: each column holds a single data type (all numeric or
  all text).
- Null values: use one consistent marker for missing data, such as empty cells
  or \"NA\".
- Quality flags: add a quality flag column to indicate data quality levels
  (e.g. 0 for good, 1 for suspect).
- File encoding: save CSV files as UTF-8 to support a wide range of characters.

Tidy data principles
- Each variable in one column (e.g. temperature, salinity).
- Each observation in one row.
- Each type of observation in a separate table (e.g. measurements and metadata).

Checking a file
1. Review the recommendations above.
2. Run the checker on a CSV or spreadsheet file, choosing the separator and
   encoding that match the file.
3. Read each panel: column names, missing values, data types, date and time
   formats, coordinates.
4. Write the coordinate map with --map to verify sample locations.
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mentions_every_forbidden_character() {
        for character in "!@#$%^&*()-+={}[]|\\:;\"'<>,?/".chars() {
            assert!(GUIDELINES.contains(character), "{character}");
        }
    }
}
