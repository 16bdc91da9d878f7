use std::io::{Read, Result, Write};

use crate::hash::crc32mpeg::Crc32Mpeg;

/// Forwards writes to `inner`, folding every accepted byte into a running CRC.
pub struct CrcWriter<W: Write> {
    inner: W,
    crc: Crc32Mpeg,
}

impl<W: Write> CrcWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            crc: Crc32Mpeg::new(),
        }
    }

    pub fn crc(&self) -> u32 {
        self.crc.value()
    }
}

impl<W: Write> Write for CrcWriter<W> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let n = self.inner.write(buf)?;
        self.crc.update(&buf[..n]);
        Ok(n)
    }
    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }
}

/// Read-side counterpart of [`CrcWriter`]. Starts from an existing state so
/// the header and name can be folded in before the payload.
pub struct CrcReader<R: Read> {
    inner: R,
    crc: Crc32Mpeg,
}

impl<R: Read> CrcReader<R> {
    pub fn with_state(inner: R, crc: Crc32Mpeg) -> Self {
        Self { inner, crc }
    }

    pub fn crc(&self) -> u32 {
        self.crc.value()
    }
}

impl<R: Read> Read for CrcReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = self.inner.read(buf)?;
        self.crc.update(&buf[..n]);
        Ok(n)
    }
}
