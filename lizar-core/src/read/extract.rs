use std::fs::File;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::SystemTime;

use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::container::entry::{
    CRC_LEN, EntryHeader, MagicRead, crc_after_name, read_crc, read_magic, read_name,
};
use crate::error::{EntryOutcome, Result, SkipReason};
use crate::pack::writer::DEFAULT_CHUNK_SIZE;
use crate::stats::Stats;
use crate::util::crc_forward::CrcReader;
use crate::util::io::{copy_exact, skip_exact};
use crate::util::path::{display_name, path_from_bytes};

#[derive(Clone, Debug)]
pub struct UnpackOptions {
    /// Directory entry names are resolved against.
    pub dest: PathBuf,
    /// Apply the executable flag to extracted files (Unix only).
    pub restore_executable: bool,
    pub restore_mtime: bool,
    pub chunk_size: usize,
}

impl Default for UnpackOptions {
    fn default() -> Self {
        Self {
            dest: PathBuf::from("."),
            restore_executable: true,
            restore_mtime: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Recreates every entry of the archive read from `input`. Checksum
/// mismatches and unwritable destinations are warnings; anything that
/// breaks the framing is returned as an error.
pub fn unpack<R: BufRead>(mut input: R, opts: &UnpackOptions) -> Result<Stats> {
    let mut buf = vec![0u8; opts.chunk_size.max(1)];
    let mut stats = Stats::default();

    loop {
        match read_magic(&mut input)? {
            MagicRead::End => break,
            MagicRead::Trailing(n) => {
                warn!("trailing garbage ({n} bytes)");
                break;
            }
            MagicRead::Magic => {}
        }
        let outcome = unpack_one(&mut input, opts, &mut buf)?;
        match &outcome {
            EntryOutcome::Skipped(reason) => warn!("{reason}"),
            EntryOutcome::ChecksumMismatch {
                path,
                calculated,
                stored,
                ..
            } => warn!("CRC mismatch for {path}: calculated {calculated:08X}, should be {stored:08X}"),
            EntryOutcome::Written { size } => debug!(size, "extracted"),
        }
        stats.record(&outcome);
    }

    Ok(stats)
}

fn unpack_one<R: BufRead>(input: &mut R, opts: &UnpackOptions, buf: &mut [u8]) -> Result<EntryOutcome> {
    let (header, raw) = EntryHeader::read_after_magic(input)?;
    let name = read_name(input)?;
    let crc = crc_after_name(&raw, &name);

    let bare = &name[..name.len() - 1];
    let shown = display_name(bare);
    let path = opts.dest.join(path_from_bytes(bare));

    let mut f = match File::create(&path) {
        Ok(f) => f,
        Err(source) => {
            skip_exact(input, header.size.saturating_add(CRC_LEN))?;
            return Ok(EntryOutcome::Skipped(SkipReason::OpenWrite {
                path: shown,
                source,
            }));
        }
    };

    let mut src = CrcReader::with_state(&mut *input, crc);
    copy_exact(&mut src, &mut f, header.size, buf, "reading file data")?;
    let calculated = src.crc();

    if opts.restore_executable && header.executable {
        if let Err(e) = set_executable(&f) {
            warn!("can't set executable bit on {shown} ({e})");
        }
    }
    if opts.restore_mtime {
        match mtime_to_system(header.mtime) {
            Some(t) => {
                if let Err(e) = f.set_modified(t) {
                    warn!("can't set modification time on {shown} ({e})");
                }
            }
            None => debug!(mtime = header.mtime, "modification time out of range"),
        }
    }
    drop(f);

    let stored = read_crc(input)?;
    if stored != calculated {
        return Ok(EntryOutcome::ChecksumMismatch {
            path: shown,
            size: header.size,
            calculated,
            stored,
        });
    }
    Ok(EntryOutcome::Written { size: header.size })
}

fn mtime_to_system(secs: i64) -> Option<SystemTime> {
    OffsetDateTime::from_unix_timestamp(secs)
        .ok()
        .map(SystemTime::from)
}

#[cfg(unix)]
fn set_executable(f: &File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perm = f.metadata()?.permissions();
    let mode = perm.mode();
    // +x wherever +r is set
    perm.set_mode(mode | ((mode & 0o444) >> 2));
    f.set_permissions(perm)
}

#[cfg(not(unix))]
fn set_executable(_f: &File) -> io::Result<()> {
    Ok(())
}
