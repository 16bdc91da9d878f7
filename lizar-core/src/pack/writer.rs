use std::fs::{self, File, Metadata};
use std::io::{BufRead, Write};
use std::time::UNIX_EPOCH;

use tracing::{debug, warn};

use crate::container::entry::{EntryHeader, write_entry};
use crate::error::{EntryOutcome, LizError, Result, SkipReason};
use crate::pack::paths::PathList;
use crate::stats::Stats;
use crate::util::path::{display_name, path_from_bytes};

pub const DEFAULT_CHUNK_SIZE: usize = 8192;

#[derive(Clone, Debug)]
pub struct PackOptions {
    /// Size of the buffer payload bytes are streamed through.
    pub chunk_size: usize,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

fn executable_from(_md: &Metadata) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        _md.permissions().mode() & 0o100 != 0
    }
    #[cfg(not(unix))]
    {
        false
    }
}

fn mtime_from(md: &Metadata) -> i64 {
    let Ok(t) = md.modified() else {
        return 0;
    };
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
        Err(e) => i64::try_from(e.duration().as_secs())
            .map(|s| -s)
            .unwrap_or(i64::MIN),
    }
}

/// Reads newline-separated paths from `paths` and writes one frame per
/// regular file to `out`. Unusable paths are skipped with a warning; any
/// failure on `out` aborts.
pub fn pack<R: BufRead, W: Write>(paths: R, mut out: W, opts: &PackOptions) -> Result<Stats> {
    let mut buf = vec![0u8; opts.chunk_size.max(1)];
    let mut stats = Stats::default();

    for line in PathList::new(paths) {
        let name = line?;
        let outcome = pack_one(&mut out, &name, &mut buf)?;
        match &outcome {
            EntryOutcome::Skipped(reason) => warn!("{reason}"),
            EntryOutcome::Written { size } => {
                debug!(path = %display_name(&name), size, "packed")
            }
            EntryOutcome::ChecksumMismatch { .. } => {}
        }
        stats.record(&outcome);
    }

    out.flush().map_err(LizError::write("archive"))?;
    Ok(stats)
}

fn pack_one<W: Write>(out: &mut W, name: &[u8], buf: &mut [u8]) -> Result<EntryOutcome> {
    let shown = display_name(name);
    if name.contains(&0) {
        return Ok(EntryOutcome::Skipped(SkipReason::InvalidName { path: shown }));
    }
    let path = path_from_bytes(name);

    let md = match fs::metadata(&path) {
        Ok(md) => md,
        Err(source) => {
            return Ok(EntryOutcome::Skipped(SkipReason::Stat {
                path: shown,
                source,
            }));
        }
    };
    if !md.is_file() {
        return Ok(EntryOutcome::Skipped(SkipReason::NotRegular { path: shown }));
    }
    let mut f = match File::open(&path) {
        Ok(f) => f,
        Err(source) => {
            return Ok(EntryOutcome::Skipped(SkipReason::OpenRead {
                path: shown,
                source,
            }));
        }
    };

    let header = EntryHeader {
        size: md.len(),
        mtime: mtime_from(&md),
        executable: executable_from(&md),
    };
    write_entry(out, name, &header, &mut f, buf)?;
    Ok(EntryOutcome::Written { size: header.size })
}
