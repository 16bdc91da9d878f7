use std::io::BufRead;

use crate::error::Result;

/// Iterates the non-empty lines of a newline-delimited path list, with the
/// trailing `\n` / `\r\n` removed. Lines are raw bytes.
pub struct PathList<R: BufRead> {
    inner: R,
    line: Vec<u8>,
}

impl<R: BufRead> PathList<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: Vec::new(),
        }
    }
}

pub fn trim_newline(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r'] = line {
        line = rest;
    }
    line
}

impl<R: BufRead> Iterator for PathList<R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line.clear();
            match self.inner.read_until(b'\n', &mut self.line) {
                Ok(0) => return None,
                Ok(_) => {
                    let trimmed = trim_newline(&self.line);
                    if !trimmed.is_empty() {
                        return Some(Ok(trimmed.to_vec()));
                    }
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
