//! NMEA sentence framing
//!
//! XOR checksum plus the `$<body>*CC\r\n` envelope. The acquisition parser
//! works on split fields and does not re-validate checksums, but [`validate`]
//! is exposed for robustness checks and tests.

use thiserror::Error;

/// Framing errors reported by [`validate`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FramingError {
    /// Sentence does not start with `$`
    #[error("sentence does not start with '$'")]
    MissingStart,

    /// Sentence has no `*` checksum delimiter
    #[error("sentence has no '*' checksum delimiter")]
    MissingDelimiter,

    /// Checksum field is not two hex digits
    #[error("invalid checksum field: {0:?}")]
    InvalidChecksum(String),

    /// Checksum does not match the body
    #[error("checksum mismatch: expected {expected:02X}, got {calculated:02X}")]
    ChecksumMismatch {
        /// Checksum carried by the sentence
        expected: u8,
        /// Checksum computed over the body
        calculated: u8,
    },
}

/// Running XOR of every byte of the sentence body
pub fn checksum(body: &str) -> u8 {
    body.bytes().fold(0u8, |acc, b| acc ^ b)
}

/// Wrap a sentence body into the full wire form: `$` + body + `*` + two
/// uppercase hex checksum digits + CRLF
pub fn wrap(body: &str) -> String {
    format!("${}*{:02X}\r\n", body, checksum(body))
}

/// Strip the envelope from a full sentence, verify its checksum, and return
/// the body.
///
/// A mismatch is a malformed-frame condition: callers treat it exactly like
/// an unrecognized sentence (logged and skipped, never fatal).
pub fn validate(sentence: &str) -> Result<&str, FramingError> {
    let sentence = sentence.trim_end();

    let body_and_sum = sentence
        .strip_prefix('$')
        .ok_or(FramingError::MissingStart)?;
    let star = body_and_sum
        .rfind('*')
        .ok_or(FramingError::MissingDelimiter)?;

    let body = &body_and_sum[..star];
    let sum_text = &body_and_sum[star + 1..];
    let expected = u8::from_str_radix(sum_text, 16)
        .map_err(|_| FramingError::InvalidChecksum(sum_text.to_string()))?;

    let calculated = checksum(body);
    if calculated != expected {
        return Err(FramingError::ChecksumMismatch {
            expected,
            calculated,
        });
    }

    Ok(body)
}
