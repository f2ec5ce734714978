use crate::loader::{unique_names, LoadError, LoadOptions, TextEncoding};
use crate::table::{Column, Table, Value};
use csv::ReaderBuilder;
use encoding_rs::DecoderResult;
use tracing::debug;

const TRUE_LITERALS: [&str; 3] = ["True", "TRUE", "true"];
const FALSE_LITERALS: [&str; 3] = ["False", "FALSE", "false"];

/// Parses delimited text into a table.
pub(crate) fn read_table(bytes: &[u8], options: &LoadOptions) -> Result<Table, LoadError> {
    let content = decode(bytes, &options.encoding)?;
    if content.trim().is_empty() {
        return Err(LoadError::Unexpected(
            "No columns to parse from file".to_owned(),
        ));
    }

    let parse_error = |message: String| LoadError::Parse {
        message,
        separator: options.separator,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.separator.as_byte())
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| parse_error(e.to_string()))?
        .iter()
        .map(str::to_owned)
        .collect::<Vec<_>>();
    let names = unique_names(headers);

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| parse_error(e.to_string()))?;
        if record.len() > names.len() {
            let line = record
                .position()
                .map_or(index as u64 + 2, |position| position.line());
            return Err(parse_error(format!(
                "Expected {} fields in line {}, saw {}",
                names.len(),
                line,
                record.len()
            )));
        }
        // Short rows are padded with missing values.
        for (column, values) in cells.iter_mut().enumerate() {
            values.push(
                record
                    .get(column)
                    .filter(|cell| !options.nulls.contains(*cell))
                    .map(str::to_owned),
            );
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, type_values(values)))
        .collect();
    let table = Table::new(columns)?;
    debug!(rows = table.row_count(), "delimited text parsed");
    Ok(table)
}

/// Decodes bytes strictly: any malformed sequence is an encoding error.
fn decode(bytes: &[u8], encoding: &TextEncoding) -> Result<String, LoadError> {
    let bytes = if encoding.encoding() == encoding_rs::UTF_8 {
        bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
    } else {
        bytes
    };

    let undefined = encoding.undefined_bytes();
    if let Some(position) = bytes.iter().position(|byte| undefined.contains(byte)) {
        return Err(LoadError::Encoding {
            message: undecodable(encoding, bytes[position], position),
        });
    }

    let mut decoder = encoding.encoding().new_decoder_without_bom_handling();
    let capacity = decoder
        .max_utf8_buffer_length_without_replacement(bytes.len())
        .ok_or_else(|| LoadError::Unexpected("input too large to decode".to_owned()))?;
    let mut content = String::with_capacity(capacity);
    let (result, read) = decoder.decode_to_string_without_replacement(bytes, &mut content, true);
    match result {
        DecoderResult::InputEmpty => Ok(content),
        DecoderResult::Malformed(malformed, consumed) => {
            let position = read
                .saturating_sub(malformed as usize)
                .saturating_sub(consumed as usize);
            let byte = bytes.get(position).copied().unwrap_or_default();
            Err(LoadError::Encoding {
                message: undecodable(encoding, byte, position),
            })
        }
        DecoderResult::OutputFull => Err(LoadError::Unexpected(
            "decoder ran out of output space".to_owned(),
        )),
    }
}

fn undecodable(encoding: &TextEncoding, byte: u8, position: usize) -> String {
    format!(
        "'{}' codec can't decode byte 0x{:02x} in position {}",
        encoding.label(),
        byte,
        position
    )
}

/// Types the cells of one column together: integers, then numbers, then
/// booleans, otherwise text. Surrounding whitespace is ignored when reading
/// numbers and booleans; text cells keep it.
fn type_values(cells: Vec<Option<String>>) -> Vec<Value> {
    let present = || cells.iter().flatten().map(|cell| cell.trim());
    let typed = |parse: fn(&str) -> Option<Value>| -> Vec<Value> {
        cells
            .iter()
            .map(|cell| cell.as_deref().and_then(|cell| parse(cell.trim())).unwrap_or(Value::Null))
            .collect()
    };
    if present().all(|cell| cell.parse::<i64>().is_ok()) {
        typed(|cell| cell.parse::<i64>().ok().map(Value::Int))
    } else if present().all(|cell| cell.parse::<f64>().is_ok()) {
        typed(|cell| cell.parse::<f64>().ok().map(Value::Float))
    } else if present().all(|cell| parse_bool(cell).is_some()) {
        typed(|cell| parse_bool(cell).map(Value::Bool))
    } else {
        cells.into_iter().map(Value::from).collect()
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    if TRUE_LITERALS.contains(&cell) {
        Some(true)
    } else if FALSE_LITERALS.contains(&cell) {
        Some(false)
    } else {
        None
    }
}
