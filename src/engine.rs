//! Signature matching.
//!
//! [`SignatureEngine`] is the seam between the identifier and whatever knows
//! about magic numbers. [`InferEngine`] binds the [`infer`] crate, whose
//! built-in table covers the common binary formats, and falls back to text
//! classification when no signature matches.

use std::fs::{self, File, FileType};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::text;

/// Upper bound on the number of leading bytes read from a file.
pub const SAMPLE_LIMIT: u64 = 1 << 20;

/// Failure reported by a signature engine.
#[derive(Error, Debug)]
#[error("cannot read `{}' ({source})", .path.display())]
pub struct EngineError {
    path: PathBuf,
    #[source]
    source: io::Error,
}

impl EngineError {
    pub fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Something that can name the type of a file from its contents.
pub trait SignatureEngine {
    /// MIME type, e.g. `image/png`.
    fn mime_type_of(&self, path: &Path) -> Result<String, EngineError>;
    /// Free-form description, e.g. `PNG image data, 16 x 16, 8-bit/color RGBA`.
    fn description_of(&self, path: &Path) -> Result<String, EngineError>;
}

/// [`SignatureEngine`] backed by the `infer` signature table.
pub struct InferEngine {
    matcher: infer::Infer,
}

impl Default for InferEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InferEngine {
    pub fn new() -> Self {
        Self {
            matcher: infer::Infer::new(),
        }
    }

    fn sniff(&self, path: &Path) -> Result<Sniffed, EngineError> {
        let metadata = fs::metadata(path).map_err(|e| EngineError::new(path, e))?;
        if let Some(special) = Sniffed::from_file_type(metadata.file_type()) {
            debug!("{} is not a regular file", path.display());
            return Ok(special);
        }
        let (sample, truncated) = read_sample(path).map_err(|e| EngineError::new(path, e))?;
        debug!(bytes = sample.len(), truncated, "Read signature sample");

        if let Some(kind) = self.matcher.get(&sample) {
            debug!(extension = kind.extension(), "Signature matched");
            return Ok(Sniffed {
                mime_type: kind.mime_type().to_owned(),
                description: describe(&kind, &sample),
            });
        }

        let class = text::classify(&sample, truncated);
        debug!(?class, "No signature matched, classified content");
        Ok(Sniffed {
            mime_type: class.mime_type().to_owned(),
            description: class.description().to_owned(),
        })
    }
}

impl SignatureEngine for InferEngine {
    fn mime_type_of(&self, path: &Path) -> Result<String, EngineError> {
        self.sniff(path).map(|sniffed| sniffed.mime_type)
    }

    fn description_of(&self, path: &Path) -> Result<String, EngineError> {
        self.sniff(path).map(|sniffed| sniffed.description)
    }
}

struct Sniffed {
    mime_type: String,
    description: String,
}

impl Sniffed {
    fn special(mime_type: &str, description: &str) -> Self {
        Self {
            mime_type: mime_type.to_owned(),
            description: description.to_owned(),
        }
    }

    fn from_file_type(file_type: FileType) -> Option<Self> {
        if file_type.is_dir() {
            return Some(Self::special("inode/directory", "directory"));
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if file_type.is_fifo() {
                return Some(Self::special("inode/fifo", "fifo (named pipe)"));
            }
            if file_type.is_socket() {
                return Some(Self::special("inode/socket", "socket"));
            }
            if file_type.is_char_device() {
                return Some(Self::special("inode/chardevice", "character special"));
            }
            if file_type.is_block_device() {
                return Some(Self::special("inode/blockdevice", "block special"));
            }
        }
        None
    }
}

fn read_sample(path: &Path) -> io::Result<(Vec<u8>, bool)> {
    let mut sample = Vec::new();
    // one byte past the limit tells a cut-off file from one that fits exactly
    File::open(path)?
        .take(SAMPLE_LIMIT + 1)
        .read_to_end(&mut sample)?;
    let truncated = sample.len() as u64 > SAMPLE_LIMIT;
    sample.truncate(SAMPLE_LIMIT as usize);
    Ok((sample, truncated))
}

fn describe(kind: &infer::Type, sample: &[u8]) -> String {
    match kind.mime_type() {
        "image/png" => png_description(sample),
        "image/gif" => gif_description(sample),
        mime => match known_description(mime) {
            Some(description) => description.to_owned(),
            None => format!(
                "{} data ({})",
                matcher_label(kind.matcher_type()),
                kind.extension()
            ),
        },
    }
}

fn known_description(mime: &str) -> Option<&'static str> {
    let description = match mime {
        "image/jpeg" => "JPEG image data",
        "image/webp" => "RIFF (little-endian) data, Web/P image",
        "image/bmp" => "PC bitmap",
        "image/tiff" => "TIFF image data",
        "image/x-icon" => "MS Windows icon resource",
        "application/pdf" => "PDF document",
        "application/zip" => "Zip archive data",
        "application/gzip" => "gzip compressed data",
        "application/x-bzip2" => "bzip2 compressed data",
        "application/x-xz" => "XZ compressed data",
        "application/zstd" => "Zstandard compressed data",
        "application/x-tar" => "POSIX tar archive",
        "application/x-7z-compressed" => "7-zip archive data",
        "application/vnd.rar" | "application/x-rar-compressed" => "RAR archive data",
        "application/x-executable" => "ELF executable",
        "application/wasm" => "WebAssembly (wasm) binary module",
        "application/vnd.sqlite3" | "application/x-sqlite3" => "SQLite 3.x database",
        "audio/mpeg" => "MPEG ADTS, layer III",
        "audio/x-wav" => "RIFF (little-endian) data, WAVE audio",
        "audio/x-flac" => "FLAC audio bitstream data",
        "audio/ogg" => "Ogg data",
        "video/mp4" => "ISO Media, MP4",
        "video/webm" => "WebM",
        "text/html" => "HTML document text",
        "text/xml" => "XML document text",
        "text/x-shellscript" => "shell script text executable",
        _ => return None,
    };
    Some(description)
}

fn matcher_label(matcher: infer::MatcherType) -> &'static str {
    match matcher {
        infer::MatcherType::App => "application",
        infer::MatcherType::Archive => "archive",
        infer::MatcherType::Audio => "audio",
        infer::MatcherType::Book => "e-book",
        infer::MatcherType::Doc => "document",
        infer::MatcherType::Font => "font",
        infer::MatcherType::Image => "image",
        infer::MatcherType::Text => "text",
        infer::MatcherType::Video => "video",
        _ => "binary",
    }
}

fn png_description(sample: &[u8]) -> String {
    // IHDR is always the first chunk: width, height, depth, color type, ..., interlace
    let Some(ihdr) = sample.get(12..29).filter(|ihdr| ihdr.starts_with(b"IHDR")) else {
        return "PNG image data".to_owned();
    };
    let width = u32::from_be_bytes([ihdr[4], ihdr[5], ihdr[6], ihdr[7]]);
    let height = u32::from_be_bytes([ihdr[8], ihdr[9], ihdr[10], ihdr[11]]);
    let depth = ihdr[12];
    let color = match ihdr[13] {
        0 => " grayscale",
        2 => "/color RGB",
        3 => " colormap",
        4 => " gray+alpha",
        6 => "/color RGBA",
        _ => "",
    };
    let interlace = if ihdr[16] == 0 {
        "non-interlaced"
    } else {
        "interlaced"
    };
    format!("PNG image data, {width} x {height}, {depth}-bit{color}, {interlace}")
}

fn gif_description(sample: &[u8]) -> String {
    let Some(header) = sample.get(..10) else {
        return "GIF image data".to_owned();
    };
    let version = String::from_utf8_lossy(&header[3..6]);
    let width = u16::from_le_bytes([header[6], header[7]]);
    let height = u16::from_le_bytes([header[8], header[9]]);
    format!("GIF image data, version {version}, {width} x {height}")
}
