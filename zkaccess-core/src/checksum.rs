//! Frame checksums
//!
//! The checksum algorithm is not known, so requests carry a checksum the
//! caller already has for that exact frame. The values below are the ones
//! captured from a panel for the fixed requests this crate can build.

use tracing::trace;

use crate::error::FrameError;

/// `CONNECT` with the standard payload
pub const CONNECT: u16 = 0x1FD6;

/// `TEST` with an empty payload
pub const TEST: u16 = 0x3C50;

/// `GET_DEVICE_DATA` for every column of the user table
pub const GET_ALL_USERS: u16 = 0xE1A4;

/// `GET_DEVICE_DATA` for every column of the transaction table, new records only
pub const GET_NEW_TRANSACTIONS: u16 = 0xE347;

/// Compare a received checksum against the expected one
///
/// # Examples
///
/// ```
/// use zkaccess_core::checksum;
///
/// assert!(checksum::verify(0x1FD6, 0x1FD6).is_ok());
/// assert!(checksum::verify(0x1FD6, 0x0000).is_err());
/// ```
pub fn verify(expected: u16, received: u16) -> Result<(), FrameError> {
    trace!(
        "Checksum: expected=0x{:04X}, received=0x{:04X}",
        expected,
        received
    );

    if expected == received {
        Ok(())
    } else {
        Err(FrameError::ChecksumMismatch { expected, received })
    }
}
