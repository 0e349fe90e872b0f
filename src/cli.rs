use clap::Parser;
use rasterscan::ScanOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rasterscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inventory raster images and their header metadata", long_about = None)]
pub struct Cli {
    /// Directory to scan; a leading `~` is expanded
    pub root: PathBuf,

    /// Stop after this many records (capped at 100000)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Only scan the root directory itself
    #[arg(long)]
    pub no_recursive: bool,

    /// Extract headers on all cores
    #[arg(short, long)]
    pub parallel: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Print one pretty JSON array instead of JSON lines
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    pub fn scan_options(&self) -> ScanOptions {
        let mut options = ScanOptions::default();
        if let Some(limit) = self.limit {
            options = options.with_limit(limit);
        }
        if self.no_recursive {
            options = options.non_recursive();
        }
        if self.parallel {
            options = options.parallel();
        }
        options
    }
}
