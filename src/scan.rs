//! Scan use case
//!
//! Walks a root directory, hands each candidate to the extractor and
//! collects records in discovery order until the effective limit.

use crate::error::{ScanError, SkipReason};
use crate::extraction::extract;
use crate::options::ScanOptions;
use crate::types::ImageRecord;
use crate::walker::CandidateWalker;
use rayon::prelude::*;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Outcome of one scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub records: Vec<ImageRecord>,
    /// Candidate paths handed to the extractor.
    pub candidates: usize,
    /// Candidates that produced no record.
    pub skipped: usize,
    pub elapsed: Duration,
}

impl ScanReport {
    fn accept(&mut self, path: &Path, result: Result<ImageRecord, SkipReason>) {
        self.candidates += 1;
        match result {
            Ok(record) => self.records.push(record),
            Err(reason) => {
                self.skipped += 1;
                debug!(path = %path.display(), %reason, "skipping file");
            }
        }
    }
}

/// Expands a leading `~` component against the current user's home
/// directory. `~name` forms are not resolved and are returned unchanged.
pub fn expand_home(root: &Path) -> PathBuf {
    let mut components = root.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match dirs::home_dir() {
            Some(home) if components.as_path().as_os_str().is_empty() => home,
            Some(home) => home.join(components.as_path()),
            None => root.to_path_buf(),
        },
        _ => root.to_path_buf(),
    }
}

/// Checks the root before any walking happens.
pub fn resolve_root(root: &Path) -> Result<PathBuf, ScanError> {
    let expanded = expand_home(root);
    match fs::metadata(&expanded) {
        Err(_) => Err(ScanError::NotFound(root.to_path_buf())),
        Ok(meta) if !meta.is_dir() => Err(ScanError::NotADirectory(root.to_path_buf())),
        Ok(_) => Ok(expanded),
    }
}

pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn run(&self, root: impl AsRef<Path>) -> Result<ScanReport, ScanError> {
        let root = resolve_root(root.as_ref())?;
        let limit = self.options.effective_limit();
        let start = Instant::now();

        info!(
            root = %root.display(),
            limit,
            recursive = self.options.recursive,
            parallel = self.options.parallel,
            "starting scan"
        );

        let walker = CandidateWalker::new(&root, self.options.recursive);
        let mut report = ScanReport::default();
        if self.options.parallel {
            self.collect_parallel(walker, limit, &mut report);
        } else {
            Self::collect_sequential(walker, limit, &mut report);
        }
        report.elapsed = start.elapsed();

        info!(
            records = report.records.len(),
            candidates = report.candidates,
            skipped = report.skipped,
            elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
            "scan complete"
        );

        Ok(report)
    }

    fn collect_sequential(walker: CandidateWalker, limit: usize, report: &mut ScanReport) {
        for path in walker {
            let result = extract(&path);
            report.accept(&path, result);
            if report.records.len() >= limit {
                break;
            }
        }
    }

    /// Batches keep discovery order: `collect` on an indexed parallel
    /// iterator preserves input order, and the cap is applied while merging.
    fn collect_parallel(&self, mut walker: CandidateWalker, limit: usize, report: &mut ScanReport) {
        let batch_size = self.options.batch_size.max(1);
        loop {
            let batch: Vec<PathBuf> = walker.by_ref().take(batch_size).collect();
            if batch.is_empty() {
                return;
            }

            let results: Vec<Result<ImageRecord, SkipReason>> =
                batch.par_iter().map(|path| extract(path)).collect();

            for (path, result) in batch.iter().zip(results) {
                report.accept(path, result);
                if report.records.len() >= limit {
                    return;
                }
            }
        }
    }
}

/// Scans `root` and returns the records in discovery order.
pub fn scan_directory(
    root: impl AsRef<Path>,
    options: &ScanOptions,
) -> Result<Vec<ImageRecord>, ScanError> {
    Scanner::new(options.clone())
        .run(root)
        .map(|report| report.records)
}
