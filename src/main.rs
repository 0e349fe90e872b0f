mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use rasterscan::{ImageRecord, Scanner};
use std::io::{self, BufWriter, Write};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn write_records(out: &mut impl Write, records: &[ImageRecord], pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, records)?;
        writeln!(out)?;
    } else {
        for record in records {
            serde_json::to_writer(&mut *out, record)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let report = Scanner::new(cli.scan_options())
        .run(&cli.root)
        .with_context(|| format!("Failed to scan {}", cli.root.display()))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_records(&mut out, &report.records, cli.pretty)?;
    out.flush().context("Failed to flush output")?;

    Ok(())
}
