use std::io::{self, BufWriter};
use std::path::PathBuf;

use lizar_core::error::Result;
use lizar_core::{PackOptions, UnpackOptions, pack, unpack};
use tracing::debug;

pub fn handle_pack() -> Result<()> {
    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());
    let stats = pack(stdin, stdout, &PackOptions::default())?;
    debug!(?stats, "pack finished");
    Ok(())
}

pub fn handle_unpack(dest: PathBuf, no_exec_bit: bool, no_mtime: bool) -> Result<()> {
    let opts = UnpackOptions {
        dest,
        restore_executable: !no_exec_bit,
        restore_mtime: !no_mtime,
        ..Default::default()
    };
    let stats = unpack(io::stdin().lock(), &opts)?;
    debug!(?stats, "unpack finished");
    Ok(())
}
