//! Table schemas known to the panel firmware

use std::fmt;

use crate::error::{Result, SchemaError};

/// One column of a device table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column {
    /// Field name used in records
    pub name: &'static str,

    /// Field identifier inside the firmware
    pub wire_id: u8,
}

impl Column {
    pub const fn new(name: &'static str, wire_id: u8) -> Self {
        Self { name, wire_id }
    }
}

/// Static column layout of a device table
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct TableSchema {
    /// Table identifier sent in pull requests
    pub table_id: u8,

    /// Registry name
    pub name: &'static str,

    /// Columns in firmware order
    pub columns: &'static [Column],
}

impl TableSchema {
    pub const fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Find a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Wire ids of every column, in schema order
    pub fn wire_ids(&self) -> Vec<u8> {
        wire_ids(self.columns)
    }
}

impl fmt::Display for TableSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}(0x{:02X}, {} columns)",
            self.name,
            self.table_id,
            self.column_count()
        )
    }
}

/// User table
pub static USER: TableSchema = TableSchema {
    table_id: 0x01,
    name: "user",
    columns: &[
        Column::new("CardNo", 0x01),
        Column::new("Pin", 0x02),
        Column::new("Password", 0x03),
        Column::new("Group", 0x04),
        Column::new("StartTime", 0x05),
        Column::new("EndTime", 0x06),
        Column::new("field7", 0x07),
    ],
};

/// Attendance transaction table
pub static TRANSACTION: TableSchema = TableSchema {
    table_id: 0x05,
    name: "transaction",
    columns: &[
        Column::new("CardNo", 0x01),
        Column::new("Pin", 0x02),
        Column::new("Verified", 0x03),
        Column::new("DoorID", 0x04),
        Column::new("EventType", 0x05),
        Column::new("InOutState", 0x06),
        Column::new("Time_second", 0x07),
    ],
};

static REGISTRY: [&TableSchema; 2] = [&USER, &TRANSACTION];

/// All built-in schemas
pub fn registry() -> &'static [&'static TableSchema] {
    &REGISTRY
}

/// Find a built-in schema by name (case-insensitive)
///
/// # Examples
///
/// ```
/// use zkaccess_types::schema;
///
/// let schema = schema::lookup("Transaction").unwrap();
/// assert_eq!(schema.table_id, 0x05);
/// assert!(schema::lookup("templatev10").is_err());
/// ```
pub fn lookup(name: &str) -> Result<&'static TableSchema> {
    REGISTRY
        .iter()
        .copied()
        .find(|schema| schema.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| SchemaError::UnknownTable(name.to_string()))
}

/// Pick the columns to request
///
/// `None` selects every column. Otherwise the schema columns named in
/// `requested` are returned in schema order; names the schema does not know
/// are ignored.
///
/// # Errors
///
/// [`SchemaError::NoMatch`] if a non-empty request matches no column.
pub fn select_columns(schema: &TableSchema, requested: Option<&[&str]>) -> Result<Vec<Column>> {
    let Some(requested) = requested else {
        return Ok(schema.columns.to_vec());
    };

    let selected: Vec<Column> = schema
        .columns
        .iter()
        .filter(|column| requested.contains(&column.name))
        .copied()
        .collect();

    if selected.is_empty() && !requested.is_empty() {
        return Err(SchemaError::NoMatch {
            table: schema.name,
            requested: requested.iter().map(|name| name.to_string()).collect(),
        });
    }

    Ok(selected)
}

/// Wire ids of a column list, in order
pub fn wire_ids(columns: &[Column]) -> Vec<u8> {
    columns.iter().map(|column| column.wire_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_schemas_are_consistent() {
        for schema in registry() {
            assert_eq!(schema.column_count(), 7);

            let ids: HashSet<u8> = schema.columns.iter().map(|c| c.wire_id).collect();
            assert_eq!(ids.len(), schema.column_count(), "duplicate wire id in {}", schema);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("user").unwrap(), &USER);
        assert_eq!(lookup("TRANSACTION").unwrap().table_id, 0x05);
        assert_eq!(
            lookup("timezone"),
            Err(SchemaError::UnknownTable("timezone".into()))
        );
    }

    #[test]
    fn test_select_all() {
        let columns = select_columns(&USER, None).unwrap();
        assert_eq!(wire_ids(&columns), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(USER.wire_ids(), wire_ids(&columns));
    }

    #[test]
    fn test_select_keeps_schema_order() {
        let columns = select_columns(&USER, Some(&["Pin", "CardNo"][..])).unwrap();

        assert_eq!(wire_ids(&columns), vec![0x01, 0x02]);
        assert_eq!(columns[0].name, "CardNo");
        assert_eq!(columns[1].name, "Pin");
    }

    #[test]
    fn test_select_ignores_unknown_names() {
        let columns = select_columns(&TRANSACTION, Some(&["Time_second", "Nope"][..])).unwrap();
        assert_eq!(columns, vec![Column::new("Time_second", 0x07)]);
    }

    #[test]
    fn test_select_no_match() {
        let result = select_columns(&TRANSACTION, Some(&["Password"][..]));
        assert_eq!(
            result,
            Err(SchemaError::NoMatch {
                table: "transaction",
                requested: vec!["Password".into()],
            })
        );
    }

    #[test]
    fn test_select_empty_request() {
        assert_eq!(select_columns(&USER, Some(&[][..])).unwrap(), Vec::<Column>::new());
    }

    #[test]
    fn test_column_by_name() {
        assert_eq!(TRANSACTION.column("DoorID").map(|c| c.wire_id), Some(0x04));
        assert_eq!(TRANSACTION.column("Password"), None);
    }
}
