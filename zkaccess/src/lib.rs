//! # zkaccess
//!
//! Client for the table protocol spoken by ZKTeco access-control panels.
//!
//! ## Features
//!
//! - Frame codec with structural validation
//! - Packed row decoding into labeled records
//! - Built-in user and transaction table schemas
//! - Async driver over any connected byte stream
//!
//! ## Quick Start
//!
//! ```no_run
//! use tokio::net::TcpStream;
//! use zkaccess::{Device, TableQuery, TcpTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Opening the stream is up to the caller
//!     let stream = TcpStream::connect("192.168.1.201:4370").await?;
//!     let mut device = Device::new(TcpTransport::from_tcp(stream)?, 0x01);
//!
//!     device.connect().await?;
//!
//!     // Pull attendance records the panel has not handed out yet
//!     for record in device.fetch_table(&TableQuery::new_transactions()).await? {
//!         println!("{} at {:?}", record, record.timestamp("Time_second"));
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod error;
pub mod query;
pub mod trace;

// Re-exports
pub use device::{Device, DeviceConfig};
pub use error::{Error, Result};
pub use query::{Labeling, TableQuery};
pub use trace::{Direction, TraceHook};

pub use zkaccess_core::{FetchOptions, TrailingRow};
pub use zkaccess_transport::{StreamTransport, TcpTransport, Transport};
pub use zkaccess_types as types;
pub use zkaccess_types::{Column, Record, TableSchema};
