//! Error types for WMF conversion
//!
//! Every fatal condition of a conversion is one of these variants; there is no
//! partial output once one is raised.

use thiserror::Error;

/// Custom error type for WMF to SVG conversion
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("input is empty")]
    EmptyInput,

    #[error("input ended unexpectedly after {offset} bytes")]
    TruncatedInput { offset: u64 },

    #[error("malformed record 0x{opcode:04X}: {reason}")]
    MalformedRecord { opcode: u16, reason: String },

    #[error("invalid file format: {0}")]
    InvalidFormat(String),

    #[error("unsupported raster encoding: {0}")]
    UnsupportedRasterEncoding(String),

    #[error("invalid object reference: index {index} (table size {capacity})")]
    InvalidObjectReference { index: usize, capacity: usize },

    #[error("object table is full (capacity {capacity})")]
    ObjectTableFull { capacity: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub(crate) fn malformed(opcode: u16, reason: impl Into<String>) -> Self {
        ConvertError::MalformedRecord {
            opcode,
            reason: reason.into(),
        }
    }

    /// Attach the opcode of the record being decoded to a record-level error.
    pub(crate) fn in_record(self, opcode: u16) -> Self {
        match self {
            ConvertError::MalformedRecord { reason, .. } => {
                ConvertError::MalformedRecord { opcode, reason }
            }
            other => other,
        }
    }
}

/// Result type alias for conversion operations
pub type ConvertResult<T> = Result<T, ConvertError>;

impl From<image::ImageError> for ConvertError {
    fn from(err: image::ImageError) -> Self {
        ConvertError::UnsupportedRasterEncoding(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<ConvertError> for pyo3::PyErr {
    fn from(err: ConvertError) -> Self {
        pyo3::PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_record_sets_opcode() {
        let err = ConvertError::malformed(0, "record overrun").in_record(0x0324);
        assert_eq!(err.to_string(), "malformed record 0x0324: record overrun");
    }

    #[test]
    fn test_in_record_keeps_other_errors() {
        let err = ConvertError::TruncatedInput { offset: 12 }.in_record(0x0324);
        assert!(matches!(err, ConvertError::TruncatedInput { offset: 12 }));
    }
}
