//! The two wire formats a status query can be made in.

mod legacy;
mod modern;

use std::fmt;

pub use legacy::Legacy;
pub use modern::Modern;

use crate::{Address, Error, ServerStatus};

/// Builds the bytes sent after connecting, and interprets everything the
/// server sent back before closing the connection.
pub trait PingStrategy {
    /// A short name for logs and errors.
    fn name(&self) -> &'static str;

    /// The bytes to write once connected to `address`.
    fn handshake(&self, address: &Address) -> Vec<u8>;

    /// Parses the complete response.
    ///
    /// # Errors
    /// [`Error::ProtocolMismatch`] if the bytes are not a response in this
    /// strategy's format.
    fn parse(&self, response: &[u8]) -> Result<ServerStatus, Error>;
}

/// The strategy a [`Pinger`](crate::tokio::Pinger) uses for an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// The 1.7+ varint framed JSON protocol.
    Modern(Modern),
    /// The pre-1.7 UTF-16 protocol.
    Legacy(Legacy),
}

impl Strategy {
    /// The strategy to retry with after this one failed.
    #[must_use]
    pub fn fallback(&self) -> Self {
        match self {
            Self::Modern(_) => Self::Legacy(Legacy),
            Self::Legacy(_) => Self::Modern(Modern::default()),
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Modern(Modern::default())
    }
}

impl From<Modern> for Strategy {
    fn from(modern: Modern) -> Self {
        Self::Modern(modern)
    }
}

impl From<Legacy> for Strategy {
    fn from(legacy: Legacy) -> Self {
        Self::Legacy(legacy)
    }
}

impl PingStrategy for Strategy {
    fn name(&self) -> &'static str {
        match self {
            Self::Modern(modern) => modern.name(),
            Self::Legacy(legacy) => legacy.name(),
        }
    }

    fn handshake(&self, address: &Address) -> Vec<u8> {
        match self {
            Self::Modern(modern) => modern.handshake(address),
            Self::Legacy(legacy) => legacy.handshake(address),
        }
    }

    fn parse(&self, response: &[u8]) -> Result<ServerStatus, Error> {
        match self {
            Self::Modern(modern) => modern.parse(response),
            Self::Legacy(legacy) => legacy.parse(response),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
