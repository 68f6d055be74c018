//! Identify a file's type from its magic-number signature.
//!
//! [`file`] drives one identification: validate the path, ask the signature
//! engine for a MIME type and a description, print the result.

pub mod cli;
pub mod engine;
pub mod error;
pub mod identify;
pub mod logging;
mod text;

use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;

pub use cli::Cli;
pub use engine::{EngineError, InferEngine, SignatureEngine};
pub use error::{Error, Result};
pub use identify::{identify, identify_with, Identification};

/// Identify the file named by `cli` and write the report line to `out`.
pub fn file<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let path = validate_path(&cli.file_path)?;
    let identification = identify(path)?;
    writeln!(out, "File type: {identification}").map_err(Error::Unexpected)?;
    Ok(())
}

fn validate_path(raw: &OsStr) -> Result<&Path> {
    // the OS rejects interior NULs in every path argument
    if raw.as_encoded_bytes().contains(&0) {
        return Err(Error::InvalidPath);
    }
    if raw.is_empty() {
        return Err(Error::EmptyPath);
    }
    Ok(Path::new(raw))
}
