//! Error types for zkaccess-core

/// Result type alias for zkaccess-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Frame-level errors raised while encoding requests or decoding responses
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Buffer cannot even hold the header and trailer
    #[error("Frame truncated: need at least {min} bytes, got {actual}")]
    Truncated {
        min: usize,
        actual: usize,
    },

    /// Header declares more payload than the buffer carries
    #[error("Frame too short: header declares {expected} bytes, got {actual} bytes")]
    TooShort {
        expected: usize,
        actual: usize,
    },

    /// Buffer carries more payload than the header declares
    #[error("Payload length mismatch: header declares {declared} bytes, frame carries {actual}")]
    LengthMismatch {
        declared: usize,
        actual: usize,
    },

    #[error("Bad start marker: 0x{0:02X}")]
    BadStartMarker(u8),

    #[error("Bad end marker: 0x{0:02X}")]
    BadEndMarker(u8),

    /// Checksum verification failed
    #[error("Checksum mismatch: expected 0x{expected:04X}, received 0x{received:04X}")]
    ChecksumMismatch {
        expected: u16,
        received: u16,
    },

    /// Payload does not fit the 16-bit length field
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },
}

/// Errors raised while splitting a payload into rows
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowDecodeError {
    /// A cell's size byte points past the end of the payload
    #[error("Cell at offset {offset} declares {size} bytes but only {remaining} remain")]
    CellOverrun {
        offset: usize,
        size: usize,
        remaining: usize,
    },

    /// Cell wider than the 64-bit value type
    #[error("Cell at offset {offset} is {size} bytes wide (max: 8)")]
    CellTooWide {
        offset: usize,
        size: usize,
    },

    /// Payload ended in the middle of a row
    #[error("Incomplete trailing row: {cells} of {expected} cells")]
    IncompleteRow {
        cells: usize,
        expected: usize,
    },

    #[error("Row width must be at least one column")]
    ZeroColumns,
}

/// Core protocol errors
///
/// Everything that makes a device response unusable ends up here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("Row decode error: {0}")]
    Rows(#[from] RowDecodeError),

    /// Table response body shorter than its column echo
    #[error("Table response sub-header truncated: expected {expected} bytes, got {actual}")]
    SubHeaderTruncated {
        expected: usize,
        actual: usize,
    },

    /// Request names more columns than its count byte can hold
    #[error("Too many columns in request: {count} (max: {max})")]
    TooManyColumns {
        count: usize,
        max: usize,
    },

    /// Response came from a different device address
    #[error("Device id mismatch: sent to 0x{expected:02X}, answered by 0x{actual:02X}")]
    DeviceMismatch {
        expected: u8,
        actual: u8,
    },
}

impl Error {
    /// Check if the response was cut short (a slower read might have succeeded)
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            Self::Frame(FrameError::Truncated { .. } | FrameError::TooShort { .. })
                | Self::SubHeaderTruncated { .. }
        )
    }
}
