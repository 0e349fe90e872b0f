use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Conditions that abort a whole scan before any file is examined.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Folder not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Why a single candidate file was left out of the results.
///
/// Skips never abort a scan; they are counted and logged.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("No known signature and no usable extension")]
    UnrecognizedFormat,

    #[error("Header truncated at offset {offset}: needed {needed} bytes, got {available}")]
    Truncated {
        offset: u64,
        needed: usize,
        available: usize,
    },

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Unsupported pixel layout: {0}")]
    UnsupportedLayout(String),
}

impl SkipReason {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidHeader(message.into())
    }

    pub(crate) fn layout(message: impl Into<String>) -> Self {
        Self::UnsupportedLayout(message.into())
    }
}
