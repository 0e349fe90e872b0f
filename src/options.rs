//! Scan options

use crate::types::MAX_FILES;

pub const DEFAULT_BATCH_SIZE: usize = 256;

/// Options for scanning a directory tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Requested maximum number of records; 0 means the hard cap
    pub limit: usize,
    /// Extract candidates on the rayon pool
    pub parallel: bool,
    /// Candidates handed to the pool at once when `parallel` is set
    pub batch_size: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            limit: MAX_FILES,
            parallel: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ScanOptions {
    /// Sets the requested record limit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Restricts the scan to the root directory itself
    pub fn non_recursive(mut self) -> Self {
        self.recursive = false;
        self
    }

    /// Enables parallel extraction
    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }

    /// Sets the parallel batch size
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// The limit actually enforced: never above [`MAX_FILES`], never zero.
    pub fn effective_limit(&self) -> usize {
        match self.limit {
            0 => MAX_FILES,
            n => n.min(MAX_FILES),
        }
    }
}
