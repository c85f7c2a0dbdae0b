use thiserror::Error;

/// Errors returned by catalog lookups and schema name parsing.
///
/// # Examples
/// ```
/// use lvis_core::SchemaError;
///
/// let err = SchemaError::UnknownFamily { name: "lgx".to_string() };
/// assert!(err.to_string().contains("unknown record family"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("unknown schema: no layout for family {family} version {version}")]
    UnknownSchema { family: String, version: String },
    #[error("unknown record family '{name}', expected lce, lge or lgw")]
    UnknownFamily { name: String },
    #[error("unknown release version '{name}', expected 1.00 through 1.04")]
    UnknownVersion { name: String },
    #[error("layout {family} {version} has no field named '{field}'")]
    MissingField {
        family: String,
        version: String,
        field: &'static str,
    },
}
