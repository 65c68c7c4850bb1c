//! # CSV Encoding
//!
//! Minimal-quoting CSV used by the record store:
//! ```text
//! Name,Email,Date,Time
//! Ada,ada@x.com,2026-10-16,09:30:00
//! "Lovelace, Ada","say ""hi""",2026-10-16,09:31:12
//! ```
//!
//! A field is quoted only when it contains the delimiter, a quote, or a line
//! break; quotes inside a quoted field are doubled. Rows end with `\n`.
//! [`parse_rows`] reverses [`encode_row`] exactly, including embedded newlines.

use thiserror::Error;

pub const DELIMITER: char = ',';
pub const QUOTE: char = '"';
pub const RECORD_SEPARATOR: &str = "\n";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CsvError {
    /// Input ended inside a quoted field.
    #[error("unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },

    /// Something other than a delimiter or line break followed a closing quote.
    #[error("unexpected character {found:?} after closing quote on line {line}")]
    TrailingCharacter { line: usize, found: char },
}

fn needs_quoting(field: &str) -> bool {
    field
        .chars()
        .any(|c| c == DELIMITER || c == QUOTE || c == '\n' || c == '\r')
}

/// Append one escaped field to `out`.
fn push_field(out: &mut String, field: &str) {
    if !needs_quoting(field) {
        out.push_str(field);
        return;
    }

    out.push(QUOTE);
    for c in field.chars() {
        if c == QUOTE {
            out.push(QUOTE);
        }
        out.push(c);
    }
    out.push(QUOTE);
}

/// Encode a row of fields, including the trailing record separator.
///
/// # Example
/// ```
/// use watss_forms::store::csv::encode_row;
///
/// assert_eq!(encode_row(&["a", "b,c"]), "a,\"b,c\"\n");
/// ```
pub fn encode_row<S: AsRef<str>>(fields: &[S]) -> String {
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        push_field(&mut out, field.as_ref());
    }
    out.push_str(RECORD_SEPARATOR);
    out
}

/// Parse CSV text into rows of fields.
///
/// Accepts both `\n` and `\r\n` row endings outside quotes. A trailing line
/// break does not produce an empty final row.
pub fn parse_rows(input: &str) -> Result<Vec<Vec<String>>, CsvError> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut chars = input.chars().peekable();
    let mut line = 1;
    // Set once anything (even an empty field) has been seen for the current row
    let mut row_started = false;

    while let Some(c) = chars.next() {
        match c {
            QUOTE if field.is_empty() => {
                row_started = true;
                let opened_on = line;
                loop {
                    match chars.next() {
                        Some(QUOTE) if chars.peek() == Some(&QUOTE) => {
                            chars.next();
                            field.push(QUOTE);
                        }
                        Some(QUOTE) => break,
                        Some(inner) => {
                            if inner == '\n' {
                                line += 1;
                            }
                            field.push(inner);
                        }
                        None => return Err(CsvError::UnterminatedQuote { line: opened_on }),
                    }
                }
                match chars.peek() {
                    None | Some(&DELIMITER) | Some(&'\n') | Some(&'\r') => {}
                    Some(&found) => return Err(CsvError::TrailingCharacter { line, found }),
                }
            }
            DELIMITER => {
                row_started = true;
                row.push(std::mem::take(&mut field));
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                if row_started || !field.is_empty() {
                    row.push(std::mem::take(&mut field));
                }
                rows.push(std::mem::take(&mut row));
                row_started = false;
                line += 1;
            }
            other => {
                row_started = true;
                field.push(other);
            }
        }
    }

    if row_started || !field.is_empty() {
        row.push(field);
        rows.push(row);
    }

    Ok(rows)
}
