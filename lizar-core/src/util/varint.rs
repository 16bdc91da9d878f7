//! Unsigned LEB128-style varints: 7 value bits per byte, least significant
//! group first, high bit set on every byte but the last.

use std::io::{ErrorKind, Read};

use super::buf::HeaderBuf;
use crate::error::{LizError, Result};

/// ceil(64 / 7)
pub const VARINT_MAX_LEN: usize = 10;

/// Encodes `v` into `out`, returning the number of bytes used.
pub fn encode(mut v: u64, out: &mut [u8; VARINT_MAX_LEN]) -> usize {
    let mut n = 0;
    loop {
        let group = (v & 0x7F) as u8;
        v >>= 7;
        if v == 0 {
            out[n] = group;
            return n + 1;
        }
        out[n] = group | 0x80;
        n += 1;
    }
}

/// Appends the encoding of `v` at the buffer cursor.
pub fn put(buf: &mut HeaderBuf, v: u64) -> Result<()> {
    let mut tmp = [0u8; VARINT_MAX_LEN];
    let n = encode(v, &mut tmp);
    buf.extend(&tmp[..n])
}

fn accumulate(acc: u64, b: u8, index: usize) -> Result<u64> {
    if index >= VARINT_MAX_LEN {
        return Err(LizError::Header(format!(
            "varint longer than {VARINT_MAX_LEN} bytes"
        )));
    }
    let group = (b & 0x7F) as u64;
    let shift = 7 * index as u32;
    if shift == 63 && group > 1 {
        return Err(LizError::Header("varint overflows 64 bits".into()));
    }
    Ok(acc | (group << shift))
}

/// Decodes one varint from the front of `input`; nothing past the end of the
/// slice is ever touched. Returns the value and the bytes consumed.
pub fn decode(input: &[u8]) -> Result<(u64, usize)> {
    let mut acc = 0u64;
    for (i, &b) in input.iter().enumerate() {
        acc = accumulate(acc, b, i)?;
        if b & 0x80 == 0 {
            return Ok((acc, i + 1));
        }
    }
    if input.len() >= VARINT_MAX_LEN {
        Err(LizError::Header(format!(
            "varint longer than {VARINT_MAX_LEN} bytes"
        )))
    } else {
        Err(LizError::Header("truncated varint".into()))
    }
}

/// Copies the raw bytes of one varint from `r` into `buf`, one byte at a
/// time. Fails before reading a byte that would land at or past `limit`.
/// The value itself is recovered with [`decode`].
pub fn read_raw<R: Read + ?Sized>(r: &mut R, buf: &mut HeaderBuf, limit: usize) -> Result<()> {
    for _ in 0..VARINT_MAX_LEN {
        if buf.len() >= limit {
            return Err(LizError::Header(format!("header exceeds {limit} bytes")));
        }
        let b = read_byte(r)?;
        buf.push_within(b, limit)?;
        if b & 0x80 == 0 {
            return Ok(());
        }
    }
    Err(LizError::Header(format!(
        "varint longer than {VARINT_MAX_LEN} bytes"
    )))
}

pub(crate) fn read_byte<R: Read + ?Sized>(r: &mut R) -> Result<u8> {
    let mut one = [0u8; 1];
    match r.read_exact(&mut one) {
        Ok(()) => Ok(one[0]),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            Err(LizError::Header("unexpected end-of-stream".into()))
        }
        Err(e) => Err(e.into()),
    }
}
