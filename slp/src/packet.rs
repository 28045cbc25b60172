//! Length-prefixed packet framing for the modern protocol.

use crate::varint;

/// Handshake packet, serverbound.
pub const HANDSHAKE: i32 = 0x00;
/// Status request packet, serverbound. Has no fields.
pub const STATUS_REQUEST: i32 = 0x00;
/// Status response packet, clientbound.
pub const STATUS_RESPONSE: i32 = 0x00;
/// The `next state` handshake field asking for the status phase.
pub const NEXT_STATE_STATUS: i32 = 1;

/// Wraps `payload` into an uncompressed packet frame:
/// `VarInt(len(id) + len(payload)) ++ VarInt(id) ++ payload`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn frame(packet_id: i32, payload: &[u8]) -> Vec<u8> {
    let id_len = varint::encoded_len(packet_id);
    let len = (id_len + payload.len()) as i32;
    let mut buf = Vec::with_capacity(varint::encoded_len(len) + id_len + payload.len());
    varint::write(&mut buf, len);
    varint::write(&mut buf, packet_id);
    buf.extend_from_slice(payload);
    buf
}
