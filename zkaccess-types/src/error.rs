pub type Result<T> = std::result::Result<T, SchemaError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("No column of table '{table}' matches {requested:?}")]
    NoMatch {
        table: &'static str,
        requested: Vec<String>,
    },
}
