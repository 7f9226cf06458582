//! scrapbook2zotero CLI
//!
//! 1. Run this tool on a Scrapbook / Scrapbook X directory to generate an `.rdf` file.
//! 2. Import that file in Zotero (File -> Import); saved pages, PDFs and the
//!    folder hierarchy come along.
//!
//! If Zotero hangs during the import, note the last record number it showed
//! and run again with `--exclude <N>`.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use scrapzot_core::{ExportConfig, ScrapbookArchive};
use scrapzot_export::{render, Conversion};
use std::fs;
use std::io::{self, BufWriter, IsTerminal};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const EPILOG: &str = "\
First, export from Scrapbook using this tool, then open Zotero, go to
File -> Import, pick the generated RDF file and wait for the import to finish.
If Zotero hangs during the import (the counter does not move for several
minutes), note the last record number and exclude it with --exclude.";

#[derive(Parser, Debug)]
#[command(name = "scrapbook2zotero")]
#[command(
    author,
    version,
    about = "Export from Scrapbook/Scrapbook X to Zotero",
    after_help = EPILOG
)]
struct Cli {
    /// Source directory, usually somewhere inside the browser profile
    #[arg(value_name = "SCRAPBOOKDIR")]
    scrapbook_dir: PathBuf,

    /// Output RDF file name. Use '-' for standard output.
    #[arg(value_name = "OUTPUT.RDF")]
    output: PathBuf,

    /// Print debug messages
    #[arg(long)]
    debug: bool,

    /// One or more record numbers to exclude
    #[arg(long, num_args = 1.., value_name = "N")]
    exclude: Vec<u64>,

    /// Disable export of collections
    #[arg(long)]
    nocoll: bool,

    /// Disable export of tags
    #[arg(long)]
    notags: bool,

    /// Disable deduplication of titles
    #[arg(long)]
    nodedup: bool,

    /// Also write a JSON summary of the run (counts, excluded and skipped entries)
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

impl Cli {
    fn export_config(&self) -> ExportConfig {
        ExportConfig {
            exclude: self.exclude.iter().copied().collect(),
            collections: !self.nocoll,
            tags: !self.notags,
            dedup: !self.nodedup,
        }
    }

    fn writes_to_stdout(&self) -> bool {
        self.output.as_os_str() == "-"
    }
}

fn init_tracing(debug: bool) {
    let fallback = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .without_time()
        .with_target(false)
        .init();
}

fn write_output(cli: &Cli, conversion: &Conversion) -> Result<()> {
    if cli.writes_to_stdout() {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        conversion.write_to(&mut out)?;
        return Ok(());
    }
    let file = fs::File::create(&cli.output)
        .with_context(|| format!("can't open file '{}' to write", cli.output.display()))?;
    let mut out = BufWriter::new(file);
    conversion
        .write_to(&mut out)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    Ok(())
}

fn write_report(path: &Path, conversion: &Conversion) -> Result<()> {
    let json = serde_json::to_string_pretty(&conversion.report)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = cli.export_config();
    let archive = ScrapbookArchive::new(&cli.scrapbook_dir);
    let conversion = render(&archive, &config).with_context(|| {
        format!(
            "failed to convert scrapbook at {}",
            cli.scrapbook_dir.display()
        )
    })?;
    tracing::debug!(
        records = conversion.report.records,
        collections = conversion.report.collections,
        "conversion rendered"
    );

    write_output(&cli, &conversion)?;
    if let Some(path) = &cli.report {
        write_report(path, &conversion)?;
    }

    if !cli.writes_to_stdout() {
        eprintln!(
            "{} {} ({} records)",
            "wrote".green().bold(),
            cli.output.display().to_string().bold(),
            conversion.report.records
        );
    }
    Ok(())
}
