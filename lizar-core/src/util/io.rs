use std::io::{self, ErrorKind, Read, Write};

use crate::error::{LizError, Result};

/// Reads until `buf` is full or the stream ends. Returns the bytes read.
pub fn read_full<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Moves exactly `len` bytes from `src` to `dst` through `buf`.
/// A short source is reported as an end-of-stream while reading `what`.
pub fn copy_exact<R, W>(
    src: &mut R,
    dst: &mut W,
    len: u64,
    buf: &mut [u8],
    what: &'static str,
) -> Result<()>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut left = len;
    while left > 0 {
        let want = buf.len().min(usize::try_from(left).unwrap_or(usize::MAX));
        let k = match src.read(&mut buf[..want]) {
            Ok(0) => return Err(LizError::UnexpectedEof(what)),
            Ok(k) => k,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        dst.write_all(&buf[..k]).map_err(LizError::write("file data"))?;
        left -= k as u64;
    }
    Ok(())
}

/// Reads and drops exactly `len` bytes.
pub fn skip_exact<R: Read + ?Sized>(r: &mut R, len: u64) -> Result<()> {
    let skipped = io::copy(&mut r.take(len), &mut io::sink())?;
    if skipped != len {
        return Err(LizError::UnexpectedEof("skipping payload"));
    }
    Ok(())
}
