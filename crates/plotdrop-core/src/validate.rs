//! CSV well-formedness checks for table input.
//!
//! The `csv` crate is deliberately lenient about quoting (a bare `"` inside an
//! unquoted field is kept, an unterminated quoted field runs to end of input), so
//! quoting is checked separately before the reader enforces consistent field
//! counts.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("line {line}: bare \" in non-quoted field")]
    BareQuote { line: u64 },

    #[error("line {line}: extraneous or missing \" in quoted field")]
    MalformedQuote { line: u64 },

    #[error("line {line}: quoted field is never closed")]
    UnterminatedQuote { line: u64 },

    #[error("record on line {line} has {found} fields, expected {expected}")]
    FieldCount {
        line: u64,
        expected: u64,
        found: u64,
    },

    #[error(transparent)]
    Read(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Check that `raw` is well-formed CSV.
///
/// Returns the number of records on success. Empty input is well-formed.
pub fn validate_csv(raw: &str) -> Result<usize, CsvError> {
    check_quoting(raw)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_reader(raw.as_bytes());

    let mut records = 0;
    for record in reader.byte_records() {
        match record {
            Ok(_) => records += 1,
            Err(e) => {
                if let csv::ErrorKind::UnequalLengths {
                    pos,
                    expected_len,
                    len,
                } = e.kind()
                {
                    return Err(CsvError::FieldCount {
                        line: pos.as_ref().map(|p| p.line()).unwrap_or_default(),
                        expected: *expected_len,
                        found: *len,
                    });
                }
                return Err(e.into());
            }
        }
    }
    Ok(records)
}

fn check_quoting(raw: &str) -> Result<(), CsvError> {
    let mut state = QuoteState::FieldStart;
    let mut line: u64 = 1;
    let mut quote_opened_on = line;

    for ch in raw.chars() {
        state = match (state, ch) {
            (QuoteState::FieldStart, '"') => {
                quote_opened_on = line;
                QuoteState::Quoted
            }
            (QuoteState::FieldStart | QuoteState::Unquoted, ',' | '\r' | '\n') => {
                QuoteState::FieldStart
            }
            (QuoteState::Unquoted, '"') => return Err(CsvError::BareQuote { line }),
            (QuoteState::FieldStart | QuoteState::Unquoted, _) => QuoteState::Unquoted,
            (QuoteState::Quoted, '"') => QuoteState::QuoteInQuoted,
            (QuoteState::Quoted, _) => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, '"') => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, ',' | '\r' | '\n') => QuoteState::FieldStart,
            (QuoteState::QuoteInQuoted, _) => return Err(CsvError::MalformedQuote { line }),
        };
        if ch == '\n' {
            line += 1;
        }
    }

    if state == QuoteState::Quoted {
        return Err(CsvError::UnterminatedQuote {
            line: quote_opened_on,
        });
    }
    Ok(())
}
