//! Lazy, symlink-safe directory walk yielding candidate image paths.
//!
//! Traversal is depth-first over an explicit stack. Each directory is read
//! in full and its entries sorted by name; its matching files are yielded
//! first, then its subdirectories are visited in name order. Symlinks are
//! never followed nor yielded, and directories that cannot be read are
//! skipped without affecting their siblings.

use crate::types::ImageFormat;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Whether `path` carries a supported extension.
pub fn is_candidate(path: &Path) -> bool {
    ImageFormat::from_path(path).is_some()
}

pub struct CandidateWalker {
    stack: Vec<PathBuf>,
    pending: VecDeque<PathBuf>,
    recursive: bool,
}

impl CandidateWalker {
    pub fn new(root: impl Into<PathBuf>, recursive: bool) -> Self {
        Self {
            stack: vec![root.into()],
            pending: VecDeque::new(),
            recursive,
        }
    }

    fn expand(&mut self, dir: &Path) {
        let read_dir = match fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                return;
            }
        };

        let mut entries: Vec<fs::DirEntry> = read_dir
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                    None
                }
            })
            .collect();
        entries.sort_by_key(|entry| entry.file_name());

        let mut subdirs = Vec::new();
        for entry in entries {
            let path = entry.path();
            // DirEntry::file_type does not traverse symlinks.
            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "skipping entry of unknown type");
                    continue;
                }
            };

            if file_type.is_symlink() {
                trace!(path = %path.display(), "ignoring symlink");
            } else if file_type.is_dir() {
                if self.recursive {
                    subdirs.push(path);
                }
            } else if file_type.is_file() && is_candidate(&path) {
                self.pending.push_back(path);
            }
        }

        self.stack.extend(subdirs.into_iter().rev());
    }
}

impl Iterator for CandidateWalker {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            if let Some(path) = self.pending.pop_front() {
                return Some(path);
            }
            let dir = self.stack.pop()?;
            self.expand(&dir);
        }
    }
}
