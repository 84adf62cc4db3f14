//! Decoded table records

use std::fmt;

use chrono::NaiveDateTime;

use crate::{schema::Column, time};

/// One decoded table row, labeled by column name
///
/// Fields keep the column order they were labeled with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(&'static str, u64)>,
}

impl Record {
    /// Label a row with a column list
    ///
    /// Cells and columns are paired positionally; extra cells or extra
    /// columns are left out.
    pub fn from_row(columns: &[Column], row: &[u64]) -> Self {
        columns
            .iter()
            .zip(row)
            .map(|(column, value)| (column.name, *value))
            .collect()
    }

    /// Get a field value by column name
    pub fn get(&self, name: &str) -> Option<u64> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| *value)
    }

    /// Get a field holding a packed device timestamp
    pub fn timestamp(&self, name: &str) -> Option<NaiveDateTime> {
        self.get(name).and_then(time::decode_timestamp)
    }

    /// Iterate over `(column, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.fields.iter().copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(&'static str, u64)> for Record {
    fn from_iter<I: IntoIterator<Item = (&'static str, u64)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        f.write_str("}")
    }
}
