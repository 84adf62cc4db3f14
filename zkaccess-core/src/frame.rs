//! Wire frame encoding/decoding

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    checksum,
    command::Command,
    constants::{END_MARKER, HEADER_SIZE, MAX_PAYLOAD_SIZE, MIN_FRAME_SIZE, START_MARKER, TRAILER_SIZE},
    error::FrameError,
};

/// Request frame
///
/// # Frame Structure
///
/// ```text
/// ┌───────┬──────────┬─────────┬──────────┬─────────┬──────────┬───────┐
/// │ Start │ DeviceID │ Command │  Length  │ Payload │ Checksum │  End  │
/// │ 0xAA  │  1 byte  │ 1 byte  │ (LE u16) │ N bytes │ (LE u16) │ 0x55  │
/// └───────┴──────────┴─────────┴──────────┴─────────┴──────────┴───────┘
/// ```
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use zkaccess_core::{checksum, constants::payloads, Command, Frame};
///
/// let payload = Bytes::from_static(&payloads::CONNECT);
/// let frame = Frame::new(0x01, Command::Connect, payload, checksum::CONNECT);
/// let encoded = frame.encode().unwrap();
///
/// assert_eq!(
///     &encoded[..],
///     &[0xAA, 0x01, 0x76, 0x04, 0x00, 0x00, 0x00, 0x01, 0x00, 0xD6, 0x1F, 0x55]
/// );
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Panel address
    pub device_id: u8,

    pub command: Command,

    /// Command-specific body
    pub payload: Bytes,

    /// Caller-supplied checksum for this exact frame
    pub checksum: u16,
}

impl Frame {
    pub fn new(device_id: u8, command: Command, payload: impl Into<Bytes>, checksum: u16) -> Self {
        Self {
            device_id,
            command,
            payload: payload.into(),
            checksum,
        }
    }

    /// Encode frame to bytes
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::PayloadTooLarge`] if the payload does not fit the
    /// 16-bit length field.
    pub fn encode(&self) -> Result<BytesMut, FrameError> {
        encode(self.device_id, self.command.into(), &self.payload, self.checksum)
    }

    /// Get total encoded size
    pub fn size(&self) -> usize {
        MIN_FRAME_SIZE + self.payload.len()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("device_id", &format!("0x{:02X}", self.device_id))
            .field("command", &self.command)
            .field("checksum", &format!("0x{:04X}", self.checksum))
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame[{}](device=0x{:02X}, len={})",
            self.command,
            self.device_id,
            self.payload.len()
        )
    }
}

/// Frame as received from a panel
#[derive(Clone, PartialEq, Eq)]
pub struct ParsedFrame {
    pub device_id: u8,

    /// Raw command byte (responses are not limited to known commands)
    pub command_id: u8,

    pub payload: Bytes,

    /// Checksum found in the trailer
    pub checksum: u16,
}

impl ParsedFrame {
    /// Check the trailing checksum against a known value
    pub fn verify_checksum(&self, expected: u16) -> Result<(), FrameError> {
        checksum::verify(expected, self.checksum)
    }

    /// Command, if it is one this crate knows
    pub fn command(&self) -> Option<Command> {
        Command::try_from(self.command_id).ok()
    }
}

impl fmt::Debug for ParsedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedFrame")
            .field("device_id", &format!("0x{:02X}", self.device_id))
            .field("command_id", &format!("0x{:02X}", self.command_id))
            .field("checksum", &format!("0x{:04X}", self.checksum))
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

/// Encode raw frame fields
pub fn encode(device_id: u8, command_id: u8, payload: &[u8], checksum: u16) -> Result<BytesMut, FrameError> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }

    let mut buf = BytesMut::with_capacity(MIN_FRAME_SIZE + payload.len());

    buf.put_u8(START_MARKER);
    buf.put_u8(device_id);
    buf.put_u8(command_id);
    buf.put_u16_le(payload.len() as u16);
    buf.put_slice(payload);
    buf.put_u16_le(checksum);
    buf.put_u8(END_MARKER);

    Ok(buf)
}

/// Decode a response frame
///
/// The header is the first [`HEADER_SIZE`] bytes and the trailer the last
/// [`TRAILER_SIZE`]; everything in between is payload and must agree with
/// the length field.
///
/// # Errors
///
/// - [`FrameError::Truncated`] when fewer than 8 bytes are given
/// - [`FrameError::BadStartMarker`]
/// - [`FrameError::TooShort`] when the buffer ends before the declared
///   length, checked ahead of the end marker
/// - [`FrameError::BadEndMarker`]
/// - [`FrameError::LengthMismatch`] when the buffer carries more than declared
pub fn decode(raw: &[u8]) -> Result<ParsedFrame, FrameError> {
    if raw.len() < MIN_FRAME_SIZE {
        return Err(FrameError::Truncated {
            min: MIN_FRAME_SIZE,
            actual: raw.len(),
        });
    }

    if raw[0] != START_MARKER {
        return Err(FrameError::BadStartMarker(raw[0]));
    }

    // A frame cut short is reported as such, whatever its last byte is
    let declared = u16::from_le_bytes([raw[3], raw[4]]) as usize;
    if declared + MIN_FRAME_SIZE > raw.len() {
        return Err(FrameError::TooShort {
            expected: declared + MIN_FRAME_SIZE,
            actual: raw.len(),
        });
    }

    let end = raw[raw.len() - 1];
    if end != END_MARKER {
        return Err(FrameError::BadEndMarker(end));
    }

    let payload = &raw[HEADER_SIZE..raw.len() - TRAILER_SIZE];
    if declared < payload.len() {
        return Err(FrameError::LengthMismatch {
            declared,
            actual: payload.len(),
        });
    }

    let checksum_at = raw.len() - TRAILER_SIZE;

    Ok(ParsedFrame {
        device_id: raw[1],
        command_id: raw[2],
        payload: Bytes::copy_from_slice(payload),
        checksum: u16::from_le_bytes([raw[checksum_at], raw[checksum_at + 1]]),
    })
}

/// Total frame length announced by a buffered prefix
///
/// Returns `None` until the full header is present, or if the prefix does
/// not start with the start marker.
pub fn frame_len(prefix: &[u8]) -> Option<usize> {
    if prefix.len() < HEADER_SIZE || prefix[0] != START_MARKER {
        return None;
    }

    let declared = u16::from_le_bytes([prefix[3], prefix[4]]) as usize;
    Some(declared + MIN_FRAME_SIZE)
}

/// Bytes still missing before `prefix` holds a complete frame
///
/// Zero once the frame is complete, or when `prefix` does not start like a
/// frame at all (such responses are passed on as read).
pub fn missing_bytes(prefix: &[u8]) -> usize {
    if prefix.first() != Some(&START_MARKER) {
        return 0;
    }

    frame_len(prefix)
        .unwrap_or(HEADER_SIZE)
        .saturating_sub(prefix.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::payloads;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_encode_connect() {
        let encoded = encode(0x01, 0x76, &payloads::CONNECT, 0x1FD6).unwrap();

        assert_eq!(
            &encoded[..],
            &[0xAA, 0x01, 0x76, 0x04, 0x00, 0x00, 0x00, 0x01, 0x00, 0xD6, 0x1F, 0x55]
        );
    }

    #[test]
    fn test_encode_empty_payload() {
        let frame = Frame::new(0x02, Command::Test, Bytes::new(), checksum::TEST);
        let encoded = frame.encode().unwrap();

        assert_eq!(encoded.len(), MIN_FRAME_SIZE);
        assert_eq!(frame.size(), MIN_FRAME_SIZE);
        assert_eq!(&encoded[..], &[0xAA, 0x02, 0x01, 0x00, 0x00, 0x50, 0x3C, 0x55]);
    }

    #[test]
    fn test_encode_payload_too_large() {
        let payload = vec![0u8; MAX_PAYLOAD_SIZE + 1];
        let result = encode(0x01, 0x08, &payload, 0);

        assert_eq!(
            result,
            Err(FrameError::PayloadTooLarge {
                size: MAX_PAYLOAD_SIZE + 1,
                max: MAX_PAYLOAD_SIZE,
            })
        );
    }

    #[test]
    fn test_decode_fields() {
        let raw = [0xAA, 0x01, 0xC8, 0x02, 0x00, 0x10, 0x20, 0x34, 0x12, 0x55];
        let frame = decode(&raw).unwrap();

        assert_eq!(frame.device_id, 0x01);
        assert_eq!(frame.command_id, 0xC8);
        assert_eq!(frame.command(), None);
        assert_eq!(frame.payload.as_ref(), &[0x10, 0x20]);
        assert_eq!(frame.checksum, 0x1234);
        assert!(frame.verify_checksum(0x1234).is_ok());
        assert!(frame.verify_checksum(0x1235).is_err());
    }

    #[test]
    fn test_decode_truncated() {
        for len in 0..MIN_FRAME_SIZE {
            let raw = vec![START_MARKER; len];
            assert_eq!(
                decode(&raw),
                Err(FrameError::Truncated {
                    min: MIN_FRAME_SIZE,
                    actual: len,
                })
            );
        }
    }

    #[test]
    fn test_decode_bad_markers() {
        let raw = [0xAB, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x55];
        assert_eq!(decode(&raw), Err(FrameError::BadStartMarker(0xAB)));

        let raw = [0xAA, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x56];
        assert_eq!(decode(&raw), Err(FrameError::BadEndMarker(0x56)));
    }

    #[test]
    fn test_decode_length_disagreement() {
        // Declares 4 bytes, carries 1
        let raw = [0xAA, 0x01, 0x08, 0x04, 0x00, 0x07, 0x00, 0x00, 0x55];
        assert_eq!(
            decode(&raw),
            Err(FrameError::TooShort {
                expected: 12,
                actual: 9,
            })
        );

        // Declares 0 bytes, carries 1
        let raw = [0xAA, 0x01, 0x08, 0x00, 0x00, 0x07, 0x00, 0x00, 0x55];
        assert_eq!(
            decode(&raw),
            Err(FrameError::LengthMismatch {
                declared: 0,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_decode_cut_short() {
        let full = encode(0x01, 0x08, &[0x10; 12], 0xBEEF).unwrap();

        for len in MIN_FRAME_SIZE..full.len() {
            assert_eq!(
                decode(&full[..len]),
                Err(FrameError::TooShort {
                    expected: full.len(),
                    actual: len,
                })
            );
        }
        assert!(crate::Error::from(decode(&full[..10]).unwrap_err()).is_incomplete());
    }

    #[test]
    fn test_frame_len() {
        assert_eq!(frame_len(&[0xAA, 0x01, 0x08]), None);
        assert_eq!(frame_len(&[0x00, 0x01, 0x08, 0x02, 0x00]), None);
        assert_eq!(frame_len(&[0xAA, 0x01, 0x08, 0x02, 0x01]), Some(258 + MIN_FRAME_SIZE));
    }

    #[test]
    fn test_missing_bytes() {
        assert_eq!(missing_bytes(&[]), 0);
        assert_eq!(missing_bytes(&[0x15, 0x00]), 0);
        assert_eq!(missing_bytes(&[0xAA, 0x01]), 3);
        assert_eq!(missing_bytes(&[0xAA, 0x01, 0x08, 0x02, 0x00, 0x01]), 4);

        let full = encode(0x01, 0x08, &[1, 2], 0).unwrap();
        assert_eq!(missing_bytes(&full), 0);
    }

    proptest! {
        #[test]
        fn prop_encode_decode_preserves_payload(
            device_id in any::<u8>(),
            command_id in any::<u8>(),
            payload in proptest::collection::vec(any::<u8>(), 0..2048),
            checksum in any::<u16>(),
        ) {
            let encoded = encode(device_id, command_id, &payload, checksum).unwrap();
            prop_assert_eq!(frame_len(&encoded), Some(encoded.len()));

            let decoded = decode(&encoded).unwrap();
            prop_assert_eq!(decoded.payload.as_ref(), payload.as_slice());
            prop_assert_eq!(decoded.device_id, device_id);
            prop_assert_eq!(decoded.command_id, command_id);
            prop_assert_eq!(decoded.checksum, checksum);
        }
    }
}
