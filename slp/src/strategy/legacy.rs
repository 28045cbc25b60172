//! The pre-1.7 [Server List Ping](https://minecraft.wiki/w/Java_Edition_protocol/Server_List_Ping#1.6).

use super::PingStrategy;
use crate::{Address, Error, Players, ServerStatus, Version};

const NAME: &str = "legacy";

/// `0xFE` server list ping, `0x01` payload, `0xFA` plugin message marker.
const HANDSHAKE: [u8; 3] = [0xFE, 0x01, 0xFA];
/// Kick packet id and string length, ahead of the text.
const HEADER_LEN: usize = 4;
const EXTENDED_MARKER: &str = "§1";

/// A fixed ping packet answered by a delimited UTF-16 kick message.
///
/// The response comes in two formats. 1.4 and later send `§1`, then the
/// protocol, version name, MOTD, online and max player counts, all separated
/// by NUL. Beta 1.8 to 1.3 send the MOTD, online and max player counts
/// separated by `§`, with no version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Legacy;

impl PingStrategy for Legacy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn handshake(&self, _address: &Address) -> Vec<u8> {
        HANDSHAKE.to_vec()
    }

    fn parse(&self, response: &[u8]) -> Result<ServerStatus, Error> {
        let payload = response.get(HEADER_LEN..).ok_or_else(|| {
            mismatch(format!(
                "response of {} bytes is shorter than the header",
                response.len()
            ))
        })?;
        let text = decode_utf16le(payload);

        if text.starts_with(EXTENDED_MARKER) {
            let fields: Vec<&str> = text.split('\0').collect();
            let [_, protocol, name, motd, online, max, ..] = fields.as_slice() else {
                return Err(mismatch(format!("expected 6 NUL separated fields, got {}", fields.len())));
            };
            Ok(ServerStatus::new(
                Some(Version {
                    name: (*name).to_string(),
                    protocol: parse_number(protocol, "protocol")?,
                }),
                players(online, max)?,
                (*motd).into(),
            ))
        } else {
            let fields: Vec<&str> = text.split('§').collect();
            let [motd, online, max, ..] = fields.as_slice() else {
                return Err(mismatch(format!("expected 3 `§` separated fields, got {}", fields.len())));
            };
            Ok(ServerStatus::new(None, players(online, max)?, (*motd).into()))
        }
    }
}

/// Decodes little-endian UTF-16. A dangling last byte is read as a code unit
/// with a zero high byte.
fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair.get(1).copied().unwrap_or(0)]))
        .collect();
    String::from_utf16_lossy(&units)
}

fn players(online: &str, max: &str) -> Result<Players, Error> {
    Ok(Players {
        online: parse_number(online, "online player count")?,
        max: parse_number(max, "max player count")?,
        sample: None,
    })
}

fn parse_number<T: std::str::FromStr>(field: &str, what: &str) -> Result<T, Error> {
    field
        .parse()
        .map_err(|_| mismatch(format!("invalid {what} `{field}`")))
}

const fn mismatch(reason: String) -> Error {
    Error::ProtocolMismatch { strategy: NAME, reason }
}
