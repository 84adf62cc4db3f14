//! # zkaccess-core
//!
//! Core protocol implementation for ZKTeco access-control panels.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure and encoding/decoding
//! - Packed row decoding
//! - Table pull request layout
//! - Command definitions, checksums and protocol constants

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod rows;
pub mod table;

pub use command::Command;
pub use error::{Error, FrameError, Result, RowDecodeError};
pub use frame::{Frame, ParsedFrame};
pub use rows::{Row, TrailingRow};
pub use table::{FetchOptions, TableRequest};
