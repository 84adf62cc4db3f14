//! Table pull request and response layout
//!
//! # Request payload
//!
//! ```text
//! ┌──────────┬──────────┬────────────┬─────────┬─────────┬────────────┐
//! │ Table ID │ Col. cnt │ Column IDs │ Opt.len │ Options │ Filter len │
//! │  1 byte  │  1 byte  │  N bytes   │ 1 byte  │ 0/1 byte│   always 0 │
//! └──────────┴──────────┴────────────┴─────────┴─────────┴────────────┘
//! ```
//!
//! # Response payload
//!
//! A sub-header of [`SUBHEADER_SIZE`] bytes plus one echoed byte per
//! requested column, then the packed rows.

use bitflags::bitflags;
use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    constants::{MAX_REQUEST_COLUMNS, SUBHEADER_SIZE},
    error::Error,
};

bitflags! {
    /// Request modifiers for a table pull
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FetchOptions: u8 {
        /// Only records the device has not handed out before
        const NEW_RECORD = 0x01;
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::empty()
    }
}

impl FetchOptions {
    /// Wire form: a length byte, then the option byte if any flag is set
    pub fn put(self, buf: &mut impl BufMut) {
        if self.is_empty() {
            buf.put_u8(0x00);
        } else {
            buf.put_u8(0x01);
            buf.put_u8(self.bits());
        }
    }
}

/// Body of a `GET_DEVICE_DATA` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRequest<'a> {
    pub table_id: u8,

    /// Wire ids of the requested columns
    pub columns: &'a [u8],

    pub options: FetchOptions,
}

impl<'a> TableRequest<'a> {
    pub fn new(table_id: u8, columns: &'a [u8], options: FetchOptions) -> Self {
        Self {
            table_id,
            columns,
            options,
        }
    }

    /// Encode request payload
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyColumns`] for more than
    /// [`MAX_REQUEST_COLUMNS`] columns.
    ///
    /// # Examples
    ///
    /// ```
    /// use zkaccess_core::table::{FetchOptions, TableRequest};
    ///
    /// let payload = TableRequest::new(0x05, &[0x01, 0x07], FetchOptions::NEW_RECORD)
    ///     .encode()
    ///     .unwrap();
    /// assert_eq!(&payload[..], &[0x05, 0x02, 0x01, 0x07, 0x01, 0x01, 0x00]);
    /// ```
    pub fn encode(&self) -> Result<Bytes, Error> {
        let count = u8::try_from(self.columns.len()).map_err(|_| Error::TooManyColumns {
            count: self.columns.len(),
            max: MAX_REQUEST_COLUMNS,
        })?;

        let mut buf = BytesMut::with_capacity(self.columns.len() + 5);

        buf.put_u8(self.table_id);
        buf.put_u8(count);
        buf.put_slice(self.columns);
        self.options.put(&mut buf);
        // Filters are not supported
        buf.put_u8(0x00);

        Ok(buf.freeze())
    }
}

/// Strip the sub-header and column echo from a table response payload
pub fn response_rows(payload: &[u8], column_count: usize) -> Result<&[u8], Error> {
    let skip = column_count + SUBHEADER_SIZE;

    if payload.len() < skip {
        return Err(Error::SubHeaderTruncated {
            expected: skip,
            actual: payload.len(),
        });
    }

    Ok(&payload[skip..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_user_request() {
        let columns = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let payload = TableRequest::new(0x01, &columns, FetchOptions::empty())
            .encode()
            .unwrap();

        assert_eq!(
            &payload[..],
            &[0x01, 0x07, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x00, 0x00]
        );
    }

    #[test]
    fn test_column_count_limit() {
        let columns = vec![0x01; MAX_REQUEST_COLUMNS + 1];
        assert_eq!(
            TableRequest::new(0x01, &columns, FetchOptions::empty()).encode(),
            Err(Error::TooManyColumns {
                count: 256,
                max: 255,
            })
        );

        let payload = TableRequest::new(0x01, &columns[1..], FetchOptions::empty())
            .encode()
            .unwrap();
        assert_eq!(payload[1], 0xFF);
        assert_eq!(payload.len(), MAX_REQUEST_COLUMNS + 4);
    }

    #[test]
    fn test_options_encoding() {
        let mut buf = BytesMut::new();
        FetchOptions::default().put(&mut buf);
        FetchOptions::NEW_RECORD.put(&mut buf);

        assert_eq!(&buf[..], &[0x00, 0x01, 0x01]);
    }

    #[test]
    fn test_response_rows_skips_echo() {
        let payload = [0x05, 0x02, 0x01, 0x02, 0x00, 0x01, 0x09];
        assert_eq!(response_rows(&payload, 2).unwrap(), &[0x00, 0x01, 0x09]);
    }

    #[test]
    fn test_response_rows_truncated() {
        let result = response_rows(&[0x05, 0x02, 0x01], 2);
        assert_eq!(
            result,
            Err(Error::SubHeaderTruncated {
                expected: 4,
                actual: 3,
            })
        );
    }
}
