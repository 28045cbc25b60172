#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
//! `slp` is a client for the Minecraft Java Edition "Server List Ping"
//! protocol. It can be used to query a server for its MOTD, version, player
//! counts, online player sample and icon.
//!
//! Both the modern (1.7+) varint-framed JSON protocol and the legacy
//! (pre-1.7) UTF-16 protocol are supported. When a server does not answer in
//! the dialect that was tried first, the other one is tried once. Hostnames
//! are resolved through `_minecraft._tcp` SRV records before connecting.
//!
//! The main API surface is [`tokio::Pinger`] and [`tokio::get_status`].

pub mod tokio;

mod address;
mod chat;
mod packet;
mod response;
mod strategy;
pub mod varint;

pub use address::Address;
pub use chat::{ChatColor, ChatComponent, Color, Description};
pub use packet::frame;
pub use response::{ForgeModInfoList, ForgeModMetadata, ModInfo, PingResponse, Player, Players, ServerStatus, Version};
pub use strategy::{Legacy, Modern, PingStrategy, Strategy};

/// The port a Java server listens on when none is given.
pub const DEFAULT_PORT: u16 = 25565;

/// The protocol version sent in the modern handshake (1.21).
///
/// See [Protocol Version Numbers](https://minecraft.wiki/w/Protocol_version_numbers).
pub const DEFAULT_PROTOCOL: i32 = 767;

/// Errors that can occur when pinging a server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("an invalid address was provided: {0}")]
    InvalidAddress(String),
    #[error("DNS lookup for the host provided failed: {0}")]
    DnsLookupFailed(String),
    #[error("the socket timed out")]
    SocketTimeout,
    #[error("the socket closed without receiving any data")]
    NoDataReceived,
    #[error("the response did not match the {strategy} protocol: {reason}")]
    ProtocolMismatch {
        strategy: &'static str,
        reason: String,
    },
    #[error("VarInt was truncated or longer than 5 bytes")]
    InvalidVarInt,
    #[error("an I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Whether a failed attempt with this error should be retried with the
    /// other protocol.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::SocketTimeout | Self::NoDataReceived | Self::ProtocolMismatch { .. } | Self::IoError(_)
        )
    }
}
