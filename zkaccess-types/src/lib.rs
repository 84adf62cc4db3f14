//! Type definitions for zkaccess

pub mod error;
pub mod record;
pub mod schema;
pub mod time;

pub use error::{Result, SchemaError};
pub use record::Record;
pub use schema::{Column, TableSchema};
