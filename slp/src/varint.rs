//! [VarInt](https://minecraft.wiki/w/Java_Edition_protocol/Data_types#VarInt_and_VarLong)
//! encoding used to frame every modern-protocol packet.

use crate::Error;

const SEGMENT_BITS: u32 = 0x7F;
const CONTINUE_BIT: u8 = 0x80;
const MAX_LEN: usize = 5;

/// Appends the encoding of `value` to `buf`.
///
/// Negative values are written as their two's complement, so they always take
/// the full five bytes.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub fn write(buf: &mut Vec<u8>, value: i32) {
    let mut value = value as u32;
    loop {
        if value & !SEGMENT_BITS == 0 {
            buf.push(value as u8);
            return;
        }
        buf.push((value & SEGMENT_BITS) as u8 | CONTINUE_BIT);
        value >>= 7;
    }
}

/// Encodes `value` into a new buffer.
#[must_use]
pub fn encode(value: i32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(encoded_len(value));
    write(&mut buf, value);
    buf
}

/// The number of bytes [`encode`] produces for `value`.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn encoded_len(value: i32) -> usize {
    let mut value = value as u32;
    let mut len = 1;
    while value & !SEGMENT_BITS != 0 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Decodes a VarInt from the front of `buf`.
///
/// Returns the value and the number of bytes it occupied.
///
/// # Errors
/// If `buf` ends before the last byte of the VarInt, or the VarInt is longer
/// than five bytes.
#[allow(clippy::cast_possible_wrap)]
pub fn decode(buf: &[u8]) -> Result<(i32, usize), Error> {
    let mut value = 0u32;
    for (i, &byte) in buf.iter().take(MAX_LEN).enumerate() {
        value |= (u32::from(byte) & SEGMENT_BITS) << (7 * i);
        if byte & CONTINUE_BIT == 0 {
            return Ok((value as i32, i + 1));
        }
    }
    Err(Error::InvalidVarInt)
}
