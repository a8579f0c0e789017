use log::debug;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseLineError {
    #[error("expected {expected} comma-separated fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },
    #[error("not a number: {0:?}")]
    NotANumber(String),
}

/// Parses one trimmed line into exactly `channels` values (1 or 2).
///
/// A single-channel line is the bare value; a two-channel line is
/// comma-delimited. Either every field parses or the whole line fails —
/// there is no partial success.
pub fn parse_line(line: &str, channels: usize) -> Result<Vec<f64>, ParseLineError> {
    let fields: Vec<&str> = if channels == 1 {
        vec![line]
    } else {
        line.split(',').collect()
    };
    if fields.len() != channels {
        return Err(ParseLineError::FieldCount {
            expected: channels,
            actual: fields.len(),
        });
    }
    fields
        .iter()
        .map(|field| {
            field
                .trim()
                .parse::<f64>()
                .map_err(|_| ParseLineError::NotANumber(field.trim().to_owned()))
        })
        .collect()
}

/// Fail-open fallback: malformed lines become all-zero samples so the
/// stream keeps flowing. The microcontroller emits one garbage line right
/// after the port opens; this policy absorbs it (and any later ones).
pub fn parse_or_zero(line: &str, channels: usize) -> Vec<f64> {
    match parse_line(line, channels) {
        Ok(values) => values,
        Err(err) => {
            debug!("unparseable line {line:?}: {err}; substituting zeros");
            vec![0.0; channels]
        }
    }
}
