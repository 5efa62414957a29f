use crate::array::ScalarType;

/// Failure to turn the content of a single `DataArray` (or the array pair of a cell
/// block) into values
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("missing attribute `{0}` on DataArray element")]
    MissingAttribute(&'static str),
    #[error("invalid value `{value}` for DataArray attribute `{attribute}`")]
    InvalidAttribute {
        attribute: &'static str,
        value: String,
    },
    #[error("unsupported DataArray type `{0}`")]
    UnsupportedType(String),
    #[error("unsupported DataArray format `{0}`")]
    UnsupportedFormat(String),
    #[error("compressed data (`{0}`) is not supported")]
    UnsupportedCompressor(String),
    #[error("failed to decode base64 data: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("could not parse ascii value `{0}`")]
    AsciiToken(String),
    #[error("expected {expected} values, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("binary header declares {declared} bytes, expected {expected} bytes of {scalar_type}")]
    ByteLengthMismatch {
        declared: u64,
        expected: usize,
        scalar_type: ScalarType,
    },
    #[error("binary data is truncated: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },
    #[error("array refers to appended data but the file has no AppendedData section")]
    MissingAppendedData,
    #[error("cell block has no `{0}` array")]
    MissingCellArray(&'static str),
    #[error("cell offsets decrease or do not match the connectivity array")]
    InvalidOffsets,
    #[error("value at position {position} is not a valid index")]
    InvalidIndex { position: usize },
    #[error("array length overflows the address space")]
    LengthOverflow,
}
