//! Codec-level error kinds shared by the block layer and the binding boundary.
//!
//! Every failure the codec can report collapses into exactly one of three
//! kinds.  The frame layer carries a richer [`Lz4FError`] that maps onto these
//! through [`Lz4FError::kind`]; the binding boundary only ever hands
//! [`Lz4Error`] to the host.
//!
//! [`Lz4FError`]: crate::frame::types::Lz4FError
//! [`Lz4FError::kind`]: crate::frame::types::Lz4FError::kind

use core::fmt;

/// Outcome of a failed compression or decompression call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lz4Error {
    /// The output buffer (or the declared maximum output size) is too small.
    /// The caller may retry with a larger buffer.
    DestinationTooSmall,
    /// Malformed token stream, bad offset, truncated data or checksum
    /// mismatch.  The input must be discarded.
    CorruptInput,
    /// A parameter is out of range (negative expected size, oversized input,
    /// unsupported frame flags).
    InvalidParameter,
}

impl Lz4Error {
    /// Stable name string, in the same style as the frame error names.
    pub fn error_name(&self) -> &'static str {
        match self {
            Lz4Error::DestinationTooSmall => "ERROR_destination_tooSmall",
            Lz4Error::CorruptInput => "ERROR_corrupt_input",
            Lz4Error::InvalidParameter => "ERROR_parameter_invalid",
        }
    }

    /// Numeric code used by the C ABI (always negative).
    pub fn code(&self) -> i32 {
        match self {
            Lz4Error::DestinationTooSmall => -1,
            Lz4Error::CorruptInput => -2,
            Lz4Error::InvalidParameter => -3,
        }
    }

    /// Inverse of [`Lz4Error::code`].  Returns `None` for non-error codes.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Lz4Error::DestinationTooSmall),
            -2 => Some(Lz4Error::CorruptInput),
            -3 => Some(Lz4Error::InvalidParameter),
            _ => None,
        }
    }
}

impl fmt::Display for Lz4Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.error_name())
    }
}

impl std::error::Error for Lz4Error {}
