use crate::error::{LizError, Result};

/// Upper bound for magic + both header varints + flags byte.
pub const HEADER_CAP: usize = 32;

/// Fixed-capacity header scratch buffer with a write cursor.
#[derive(Clone, Copy)]
pub struct HeaderBuf {
    bytes: [u8; HEADER_CAP],
    len: usize,
}

impl HeaderBuf {
    pub fn new() -> Self {
        Self {
            bytes: [0u8; HEADER_CAP],
            len: 0,
        }
    }

    pub fn with_prefix(prefix: &[u8]) -> Result<Self> {
        let mut buf = Self::new();
        buf.extend(prefix)?;
        Ok(buf)
    }

    /// Appends one byte as long as the cursor stays below `limit`
    /// (clamped to the capacity).
    pub fn push_within(&mut self, b: u8, limit: usize) -> Result<()> {
        if self.len >= limit.min(HEADER_CAP) {
            return Err(LizError::Header(format!(
                "header exceeds {} bytes",
                limit.min(HEADER_CAP)
            )));
        }
        self.bytes[self.len] = b;
        self.len += 1;
        Ok(())
    }

    pub fn push(&mut self, b: u8) -> Result<()> {
        self.push_within(b, HEADER_CAP)
    }

    pub fn extend(&mut self, data: &[u8]) -> Result<()> {
        if data.len() > self.remaining() {
            return Err(LizError::Header(format!(
                "header exceeds {HEADER_CAP} bytes"
            )));
        }
        self.bytes[self.len..self.len + data.len()].copy_from_slice(data);
        self.len += data.len();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn remaining(&self) -> usize {
        HEADER_CAP - self.len
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl Default for HeaderBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HeaderBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HeaderBuf")
            .field(&hex::encode(self.as_slice()))
            .finish()
    }
}
