use std::ffi::OsString;

use clap::Parser;

/// Identifies file type based on magic numbers.
#[derive(Debug, Parser)]
#[command(name = "fileid", version, about, long_about = None)]
pub struct Cli {
    /// Path to the file to identify.
    pub file_path: OsString,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}
