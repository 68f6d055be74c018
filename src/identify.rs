use std::fmt;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::engine::{InferEngine, SignatureEngine};
use crate::error::{Error, Result};

/// What a [`SignatureEngine`] had to say about one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    pub mime_type: String,
    pub description: String,
}

impl fmt::Display for Identification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MIME Type: {}, File Info: {}",
            self.mime_type, self.description
        )
    }
}

/// Identify `path` with the default [`InferEngine`].
pub fn identify(path: &Path) -> Result<Identification> {
    identify_with(&InferEngine::new(), path)
}

/// Identify `path` with the given engine.
///
/// The file must exist; the engine is then asked once for the MIME type and
/// once for the description.
pub fn identify_with<E: SignatureEngine + ?Sized>(
    engine: &E,
    path: &Path,
) -> Result<Identification> {
    match path.try_exists() {
        Ok(true) => {}
        Ok(false) => return Err(Error::NotFound(path.to_path_buf())),
        Err(e) if unreachable_path(&e) => return Err(Error::NotFound(path.to_path_buf())),
        Err(e) => return Err(Error::Unexpected(e)),
    }

    debug!("Identifying {}", path.display());
    let mime_type = engine.mime_type_of(path)?;
    debug!(%mime_type, "Resolved MIME type");
    let description = engine.description_of(path)?;
    debug!(%description, "Resolved description");

    Ok(Identification {
        mime_type,
        description,
    })
}

/// Probe errors that mean nothing can live at the path, as opposed to the
/// path being there but off limits.
#[cfg(unix)]
fn unreachable_path(e: &io::Error) -> bool {
    matches!(
        e.raw_os_error(),
        Some(libc::ENOTDIR | libc::ELOOP | libc::EBADF)
    )
}

#[cfg(not(unix))]
fn unreachable_path(_: &io::Error) -> bool {
    false
}
