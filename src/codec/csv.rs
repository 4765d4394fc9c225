//! CSV text primitives
//!
//! Field quoting on write and a lenient row parser on read.

use std::io::Write;

use crate::error::Result;

/// Field separator
pub(crate) const DELIMITER: char = ',';

/// Quote character (doubled inside quoted fields)
pub(crate) const QUOTE: char = '"';

/// Record terminator written after every row
pub(crate) const TERMINATOR: &str = "\n";

// =============================================================================
// Writing
// =============================================================================

/// Whether a field must be wrapped in quotes to survive a round trip
fn needs_quotes(field: &str) -> bool {
    if field.is_empty() {
        return false;
    }
    field.starts_with(char::is_whitespace)
        || field.contains([DELIMITER, QUOTE, '\r', '\n'])
}

/// Escape a single field for output
pub fn escape_field(field: &str) -> String {
    if !needs_quotes(field) {
        return field.to_string();
    }

    let mut escaped = String::with_capacity(field.len() + 2);
    escaped.push(QUOTE);
    for c in field.chars() {
        if c == QUOTE {
            escaped.push(QUOTE);
        }
        escaped.push(c);
    }
    escaped.push(QUOTE);
    escaped
}

/// Write one row followed by the record terminator
pub fn write_row<W: Write, S: AsRef<str>>(writer: &mut W, fields: &[S]) -> Result<()> {
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(DELIMITER);
        }
        line.push_str(&escape_field(field.as_ref()));
    }
    line.push_str(TERMINATOR);
    writer.write_all(line.as_bytes())?;
    Ok(())
}

// =============================================================================
// Reading
// =============================================================================

/// Split CSV text into rows of fields
///
/// Accepts `\n` and `\r\n` terminators, quoted fields spanning lines and
/// doubled quotes. Blank lines produce no row. A quote that is never closed
/// runs to the end of the input. Stray quotes inside unquoted fields are kept
/// literally.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut row_has_content = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    chars.next();
                    field.push(QUOTE);
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            QUOTE if field.is_empty() => {
                in_quotes = true;
                row_has_content = true;
            }
            DELIMITER => {
                row.push(std::mem::take(&mut field));
                row_has_content = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                if row_has_content {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
                field.clear();
                row_has_content = false;
            }
            _ => {
                field.push(c);
                row_has_content = true;
            }
        }
    }

    if row_has_content {
        row.push(field);
        rows.push(row);
    }

    rows
}
