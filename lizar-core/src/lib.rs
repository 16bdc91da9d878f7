#![forbid(unsafe_code)]

//! Streaming `Liz1` archives: each entry is a magic, a varint header, a
//! NUL-terminated name, the raw payload and a big-endian CRC-32/MPEG-2.

pub mod error;
pub mod stats;

pub mod util {
    pub mod buf;
    pub mod crc_forward;
    pub mod io;
    pub mod path;
    pub mod varint;
}

pub mod hash {
    pub mod crc32mpeg;
}

pub mod container {
    pub mod entry;
}

pub mod pack {
    pub mod paths;
    pub mod writer;
}

pub mod read {
    pub mod extract;
}

// Re-exports: stable API surface
pub use error::{EntryOutcome, LizError, Result, SkipReason};
pub use pack::writer::{PackOptions, pack};
pub use read::extract::{UnpackOptions, unpack};
pub use stats::Stats;
