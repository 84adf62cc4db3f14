//! Packed row decoding
//!
//! Table responses are a flat run of cells. Each cell is a size byte
//! followed by that many little-endian value bytes; a size of zero stands
//! for the value `0` with nothing after it. Cells are grouped into rows of a
//! fixed width.

use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

use crate::error::RowDecodeError;

/// One decoded row, cells in column order
pub type Row = Vec<u64>;

/// Widest cell that fits the `u64` value type
pub const MAX_CELL_SIZE: usize = 8;

/// What to do with cells left over after the last complete row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingRow {
    /// Discard them
    #[default]
    Drop,

    /// Fail with [`RowDecodeError::IncompleteRow`]
    Reject,
}

/// Split a payload into rows of `columns_per_row` cells
///
/// An incomplete trailing row is dropped. Use [`decode_rows_with`] to
/// reject it instead.
///
/// # Examples
///
/// ```
/// use zkaccess_core::rows::decode_rows;
///
/// // One 2-byte cell holding 1, then a zero cell
/// let rows = decode_rows(&[0x02, 0x01, 0x00, 0x00], 2).unwrap();
/// assert_eq!(rows, vec![vec![1, 0]]);
/// ```
pub fn decode_rows(payload: &[u8], columns_per_row: usize) -> Result<Vec<Row>, RowDecodeError> {
    decode_rows_with(payload, columns_per_row, TrailingRow::Drop)
}

/// Split a payload into rows with an explicit trailing-row policy
pub fn decode_rows_with(
    payload: &[u8],
    columns_per_row: usize,
    trailing: TrailingRow,
) -> Result<Vec<Row>, RowDecodeError> {
    if columns_per_row == 0 {
        return Err(RowDecodeError::ZeroColumns);
    }

    let mut rows = Vec::new();
    let mut row = Vec::with_capacity(columns_per_row);
    let mut offset = 0;

    while offset < payload.len() {
        let size = payload[offset] as usize;
        let start = offset + 1;
        let remaining = payload.len() - start;

        if size > remaining {
            return Err(RowDecodeError::CellOverrun { offset, size, remaining });
        }
        if size > MAX_CELL_SIZE {
            return Err(RowDecodeError::CellTooWide { offset, size });
        }

        let value = match size {
            0 => 0,
            n => LittleEndian::read_uint(&payload[start..start + n], n),
        };

        row.push(value);
        offset = start + size;

        if row.len() == columns_per_row {
            rows.push(std::mem::replace(&mut row, Vec::with_capacity(columns_per_row)));
        }
    }

    if !row.is_empty() {
        if trailing == TrailingRow::Reject {
            return Err(RowDecodeError::IncompleteRow {
                cells: row.len(),
                expected: columns_per_row,
            });
        }
        debug!("Dropping incomplete trailing row ({} of {} cells)", row.len(), columns_per_row);
    }

    Ok(rows)
}
