pub mod describe;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod io;
pub mod options;
pub mod resolution;
pub mod scan;
pub mod types;
pub mod walker;

pub use error::{ScanError, SkipReason};
pub use extraction::extract;
pub use options::ScanOptions;
pub use scan::{ScanReport, Scanner, scan_directory};
pub use types::{BitDepth, ImageFormat, ImageRecord, MAX_FILES, PixelMode, SUPPORTED_EXTENSIONS};
