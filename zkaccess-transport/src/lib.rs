//! Transport layer for the panel protocol
//!
//! The protocol layer only needs an ordered, reliable byte stream that is
//! already connected. Opening and closing it is the caller's business.

pub mod error;
pub mod stream;

pub use error::{Error, Result};
pub use stream::{StreamTransport, TcpTransport};

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Duplex byte stream to a panel
#[async_trait]
pub trait Transport: Send {
    /// Send raw bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive whatever the peer has sent, at most `max_bytes`
    ///
    /// Returns an empty buffer when the peer closed the stream gracefully
    /// and [`Error::ReadTimeout`] when nothing arrived within `timeout`.
    async fn receive(&mut self, max_bytes: usize, timeout: Duration) -> Result<BytesMut>;

    /// Describe the remote end (for logs)
    fn peer(&self) -> String;
}
