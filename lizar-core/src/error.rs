use std::io;
use thiserror::Error;

use crate::container::entry::MAGIC;

/// Fatal conditions. Once one of these is returned the stream framing can no
/// longer be trusted and the driver stops.
#[derive(Error, Debug)]
pub enum LizError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(
        "expected magic signature {}, got {}",
        hex::encode_upper(MAGIC),
        hex::encode_upper(.got)
    )]
    BadMagic { got: [u8; 4] },

    #[error("could not read header information: {0}")]
    Header(String),

    #[error("could not read file name: missing NUL terminator")]
    UnterminatedName,

    #[error("unexpected end-of-stream when {0}")]
    UnexpectedEof(&'static str),

    #[error("unexpected end-of-stream when writing {section} ({source})")]
    Write {
        section: &'static str,
        #[source]
        source: io::Error,
    },
}

impl LizError {
    pub(crate) fn write(section: &'static str) -> impl FnOnce(io::Error) -> LizError {
        move |source| LizError::Write { section, source }
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, LizError>;

/// Why a single entry was left out. Never fatal.
#[derive(Error, Debug)]
pub enum SkipReason {
    #[error("could not stat {path} ({source})")]
    Stat {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("can't open {path} - not a regular file")]
    NotRegular { path: String },

    #[error("can't open {path} for read ({source})")]
    OpenRead {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("file name {path} contains a NUL byte")]
    InvalidName { path: String },

    #[error("can't open {path} for write, skipping ({source})")]
    OpenWrite {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Result of processing one entry that did not abort the stream.
#[derive(Debug)]
pub enum EntryOutcome {
    Written { size: u64 },
    Skipped(SkipReason),
    ChecksumMismatch {
        path: String,
        size: u64,
        calculated: u32,
        stored: u32,
    },
}

