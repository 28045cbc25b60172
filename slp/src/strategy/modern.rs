//! The 1.7+ [Server List Ping](https://minecraft.wiki/w/Java_Edition_protocol/Server_List_Ping).

use tracing::trace;

use super::PingStrategy;
use crate::{
    Address, DEFAULT_PROTOCOL, Error, ServerStatus,
    packet::{self, HANDSHAKE, NEXT_STATE_STATUS, STATUS_REQUEST, STATUS_RESPONSE},
    varint,
};

const NAME: &str = "modern";

/// Handshake then status request, answered by a single JSON status response.
///
/// # Examples
///
/// ```
/// use slp::{Address, Modern, PingStrategy};
///
/// let handshake = Modern::default().handshake(&Address::new("localhost", 25565));
/// // the status request frame always ends the handshake
/// assert_eq!(&handshake[handshake.len() - 2..], [0x01, 0x00]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modern {
    /// The protocol version announced in the handshake. `-1` asks the server
    /// to answer regardless of version.
    pub protocol: i32,
}

impl Modern {
    #[must_use]
    pub const fn new(protocol: i32) -> Self {
        Self { protocol }
    }

    /// Announces protocol `-1`, which tolerant servers accept as any version.
    #[must_use]
    pub const fn any_version() -> Self {
        Self::new(-1)
    }
}

impl Default for Modern {
    fn default() -> Self {
        Self::new(DEFAULT_PROTOCOL)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
impl PingStrategy for Modern {
    fn name(&self) -> &'static str {
        NAME
    }

    fn handshake(&self, address: &Address) -> Vec<u8> {
        let host = address.host.as_bytes();
        let mut payload = Vec::with_capacity(host.len() + 12);
        varint::write(&mut payload, self.protocol);
        varint::write(&mut payload, host.len() as i32);
        payload.extend_from_slice(host);
        payload.extend_from_slice(&address.port.to_be_bytes());
        varint::write(&mut payload, NEXT_STATE_STATUS);

        let mut handshake = packet::frame(HANDSHAKE, &payload);
        handshake.extend(packet::frame(STATUS_REQUEST, &[]));
        handshake
    }

    fn parse(&self, response: &[u8]) -> Result<ServerStatus, Error> {
        let (frame_len, mut offset) = decode_at(response, 0, "frame length")?;
        let (packet_id, len) = decode_at(response, offset, "packet id")?;
        offset += len;
        if packet_id != STATUS_RESPONSE {
            return Err(mismatch(format!("expected packet id {STATUS_RESPONSE}, got {packet_id}")));
        }
        let (json_len, len) = decode_at(response, offset, "JSON length")?;
        offset += len;
        trace!(frame_len, json_len, received = response.len(), "Decoded status response header");

        let json_len = usize::try_from(json_len).map_err(|_| mismatch(format!("negative JSON length {json_len}")))?;
        let json = response.get(offset..offset + json_len).ok_or_else(|| {
            mismatch(format!(
                "expected {json_len} bytes of JSON, got {}",
                response.len() - offset
            ))
        })?;
        serde_json::from_slice(json).map_err(|e| mismatch(format!("invalid status JSON: {e}")))
    }
}

fn decode_at(response: &[u8], offset: usize, what: &str) -> Result<(i32, usize), Error> {
    varint::decode(&response[offset..]).map_err(|e| mismatch(format!("bad {what}: {e}")))
}

const fn mismatch(reason: String) -> Error {
    Error::ProtocolMismatch { strategy: NAME, reason }
}
