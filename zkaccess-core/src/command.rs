//! Panel command definitions

use std::fmt;

/// Protocol command ids
///
/// Only the commands needed for the handshake and table pulls are known.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Connection test (empty payload)
    Test = 0x01,

    /// Read a device table
    GetDeviceData = 0x08,

    /// Open a session
    Connect = 0x76,
}

impl Command {
    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::Test => "TEST",
            Self::GetDeviceData => "GET_DEVICE_DATA",
            Self::Connect => "CONNECT",
        }
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, u8> {
        match value {
            0x01 => Ok(Self::Test),
            0x08 => Ok(Self::GetDeviceData),
            0x76 => Ok(Self::Connect),
            other => Err(other),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}
