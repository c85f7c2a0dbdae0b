use thiserror::Error;

use crate::schema::SchemaError;

/// Errors returned by record decoding and raw field reads.
///
/// # Examples
/// ```
/// use lvis_core::DecodeError;
///
/// let err = DecodeError::LengthMismatch { expected: 48, actual: 20 };
/// assert!(err.to_string().contains("expected 48 bytes"));
/// ```
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("record block length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("block too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("unsupported sample width {width} for field '{field}'")]
    UnsupportedWidth { field: &'static str, width: usize },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
