//! Raw frame capture

use std::fmt;
use std::sync::Arc;

/// Which way a captured buffer travelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent => f.write_str("sent"),
            Self::Received => f.write_str("received"),
        }
    }
}

/// Callback handed every buffer written to or read from the transport
pub type TraceHook = Arc<dyn Fn(Direction, &[u8]) + Send + Sync>;
