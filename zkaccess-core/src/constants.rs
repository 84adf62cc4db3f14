//! Protocol constants

/// First byte of every frame
pub const START_MARKER: u8 = 0xAA;

/// Last byte of every frame
pub const END_MARKER: u8 = 0x55;

/// Start marker, device id, command id, 16-bit payload length
pub const HEADER_SIZE: usize = 5;

/// 16-bit checksum followed by the end marker
pub const TRAILER_SIZE: usize = 3;

/// Smallest well-formed frame (empty payload)
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + TRAILER_SIZE;

/// Largest payload the 16-bit length field can describe
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// Most columns one table request can name (the count is a single byte)
pub const MAX_REQUEST_COLUMNS: usize = u8::MAX as usize;

/// Fixed bytes at the start of a table response body, ahead of the echoed
/// column ids. The device repeats the table id and the column count here;
/// their exact meaning is undocumented.
pub const SUBHEADER_SIZE: usize = 2;

/// Default panel port
pub const DEFAULT_PORT: u16 = 4370;

/// Default read timeout (seconds)
pub const DEFAULT_READ_TIMEOUT: u64 = 5;

/// Largest response accepted from a single read
pub const MAX_RESPONSE_SIZE: usize = 4 * 1024 * 1024;

/// Fixed request payloads
pub mod payloads {
    /// Body of the `CONNECT` request
    pub const CONNECT: [u8; 4] = [0x00, 0x00, 0x01, 0x00];

    /// Body of the `TEST` request
    pub const TEST: [u8; 0] = [];
}
