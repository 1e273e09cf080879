//! Error types for PLY header parsing and splat decoding.

use thiserror::Error;

/// Errors that can occur while parsing a Gaussian splat PLY file.
///
/// Every variant is terminal: a malformed file does not become well-formed
/// on retry, so callers should surface the error and stop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlyError {
    #[error("PLY: can't find end_header")]
    HeaderNotFound,

    #[error("PLY: malformed header at line {line}: {reason}")]
    MalformedHeader { line: usize, reason: String },

    #[error("PLY: header is not valid utf-8")]
    InvalidHeaderEncoding,

    #[error("PLY: first line must be \"ply\"")]
    NotAPlyFile,

    #[error("PLY: missing format line")]
    MissingFormat,

    #[error("PLY: unsupported format '{0}'")]
    UnsupportedFormat(String),

    #[error("PLY: unknown scalar type '{0}'")]
    UnknownScalarType(String),

    #[error("PLY: property before element")]
    PropertyBeforeElement,

    #[error("PLY: unknown header directive '{0}'")]
    UnknownHeaderDirective(String),

    #[error("PLY: element \"{0}\" not found")]
    ElementNotFound(String),

    #[error("PLY: element \"{element}\" has list property '{property}', which splat decoding does not support")]
    UnsupportedListProperty { element: String, property: String },

    #[error("PLY: missing required field '{0}'")]
    MissingRequiredField(&'static str),

    #[error("PLY: data section truncated (need {expected} bytes or records, found {available})")]
    TruncatedData { expected: usize, available: usize },

    #[error("PLY ASCII: data is not valid utf-8")]
    InvalidAsciiData,

    #[error("PLY ASCII: malformed value in record {record}, column {column}")]
    MalformedRecord { record: usize, column: usize },
}

impl PlyError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        PlyError::MalformedHeader {
            line,
            reason: reason.into(),
        }
    }
}
