use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Streaming Liz1 archiver", long_about = None)]
pub struct Cli {
    /// Log every entry (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read newline-separated paths from stdin, write the archive to stdout
    Pack,

    /// Read an archive from stdin and recreate its files
    Unpack {
        /// Directory entry names are resolved against
        #[arg(short = 'C', long = "directory", default_value = ".")]
        dest: PathBuf,

        /// Leave the executable bit unset on extracted files
        #[arg(long)]
        no_exec_bit: bool,

        /// Leave extracted files with the current time as mtime
        #[arg(long)]
        no_mtime: bool,
    },
}
