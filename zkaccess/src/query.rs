//! Table pull queries

use bytes::Bytes;

use zkaccess_core::{FetchOptions, TableRequest, TrailingRow, checksum};
use zkaccess_types::{
    Column, TableSchema,
    schema::{self, TRANSACTION, USER},
};

use crate::error::{Error, Result};

/// How decoded cells are matched to column names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Labeling {
    /// Rows are as wide as the selection and labeled with the selected
    /// columns
    #[default]
    Selection,

    /// Rows are as wide as the whole schema and labeled in schema order,
    /// whatever subset was requested
    Schema,
}

/// Description of one `GET_DEVICE_DATA` request
///
/// # Examples
///
/// ```
/// use zkaccess::TableQuery;
/// use zkaccess::types::schema::USER;
///
/// let query = TableQuery::new(&USER, 0xE1A4).columns(["Pin", "CardNo"]);
/// assert_eq!(&query.payload().unwrap()[..], &[0x01, 0x02, 0x01, 0x02, 0x00, 0x00]);
/// ```
#[derive(Debug, Clone)]
pub struct TableQuery {
    schema: &'static TableSchema,
    columns: Option<Vec<String>>,
    options: FetchOptions,
    labeling: Labeling,
    trailing: TrailingRow,
    checksum: u16,
    response_checksum: Option<u16>,
}

impl TableQuery {
    /// Pull every column of `schema`, sending `checksum` with the request
    pub fn new(schema: &'static TableSchema, checksum: u16) -> Self {
        Self {
            schema,
            columns: None,
            options: FetchOptions::empty(),
            labeling: Labeling::default(),
            trailing: TrailingRow::default(),
            checksum,
            response_checksum: None,
        }
    }

    /// Pull a registered table by name
    pub fn named(table: &str, checksum: u16) -> zkaccess_types::Result<Self> {
        Ok(Self::new(schema::lookup(table)?, checksum))
    }

    /// Every user record
    pub fn all_users() -> Self {
        Self::new(&USER, checksum::GET_ALL_USERS)
    }

    /// Transactions the device has not handed out yet
    pub fn new_transactions() -> Self {
        Self::new(&TRANSACTION, checksum::GET_NEW_TRANSACTIONS).options(FetchOptions::NEW_RECORD)
    }

    /// Restrict the pull to the named columns
    ///
    /// Columns are always requested in schema order. An empty list means
    /// every column.
    pub fn columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        self.columns = if names.is_empty() { None } else { Some(names) };
        self
    }

    pub fn options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn labeling(mut self, labeling: Labeling) -> Self {
        self.labeling = labeling;
        self
    }

    /// Policy for cells left over after the last complete row
    pub fn trailing_rows(mut self, trailing: TrailingRow) -> Self {
        self.trailing = trailing;
        self
    }

    /// Verify the response trailer against a known checksum
    pub fn expect_response_checksum(mut self, checksum: u16) -> Self {
        self.response_checksum = Some(checksum);
        self
    }

    pub fn schema(&self) -> &'static TableSchema {
        self.schema
    }

    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    pub fn response_checksum(&self) -> Option<u16> {
        self.response_checksum
    }

    pub fn fetch_options(&self) -> FetchOptions {
        self.options
    }

    pub fn labeling_mode(&self) -> Labeling {
        self.labeling
    }

    pub fn trailing_policy(&self) -> TrailingRow {
        self.trailing
    }

    /// Columns that will be requested, in schema order
    pub fn selection(&self) -> zkaccess_types::Result<Vec<Column>> {
        match &self.columns {
            None => schema::select_columns(self.schema, None),
            Some(names) => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                schema::select_columns(self.schema, Some(names.as_slice()))
            }
        }
    }

    /// Columns decoded rows are labeled with
    pub fn labels<'a>(&self, selection: &'a [Column]) -> &'a [Column] {
        match self.labeling {
            Labeling::Selection => selection,
            Labeling::Schema => self.schema.columns,
        }
    }

    /// Request payload for this query
    pub fn payload(&self) -> Result<Bytes> {
        let selection = self.selection()?;
        Self::encode(self.schema, &selection, self.options)
    }

    pub(crate) fn encode(schema: &TableSchema, selection: &[Column], options: FetchOptions) -> Result<Bytes> {
        let wire_ids = schema::wire_ids(selection);
        TableRequest::new(schema.table_id, &wire_ids, options)
            .encode()
            .map_err(Error::InvalidRequest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use zkaccess_types::SchemaError;

    #[test]
    fn test_all_users_payload() {
        let query = TableQuery::all_users();

        assert_eq!(query.checksum(), 0xE1A4);
        assert_eq!(
            &query.payload().unwrap()[..],
            &[0x01, 0x07, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x00, 0x00]
        );
    }

    #[test]
    fn test_new_transactions_payload() {
        let query = TableQuery::new_transactions();

        assert_eq!(query.checksum(), 0xE347);
        assert_eq!(query.fetch_options(), FetchOptions::NEW_RECORD);
        assert_eq!(
            &query.payload().unwrap()[..],
            &[0x05, 0x07, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x01, 0x01, 0x00]
        );
    }

    #[test]
    fn test_named() {
        let query = TableQuery::named("transaction", 0x1234).unwrap();
        assert_eq!(query.schema().table_id, 0x05);

        assert!(matches!(
            TableQuery::named("fingerprint", 0),
            Err(SchemaError::UnknownTable(_))
        ));
    }

    #[test]
    fn test_labels() {
        let query = TableQuery::all_users().columns(["Pin"]);
        let selection = query.selection().unwrap();

        assert_eq!(query.labels(&selection).len(), 1);
        assert_eq!(query.labeling(Labeling::Schema).labels(&selection).len(), 7);
    }

    #[test]
    fn test_empty_column_list_means_all() {
        let query = TableQuery::all_users().columns(Vec::<String>::new());
        assert_eq!(query.selection().unwrap().len(), 7);
    }

    #[test]
    fn test_unmatched_columns() {
        let query = TableQuery::new_transactions().columns(["Password"]);
        assert!(matches!(
            query.payload(),
            Err(Error::Schema(SchemaError::NoMatch { .. }))
        ));
    }
}
