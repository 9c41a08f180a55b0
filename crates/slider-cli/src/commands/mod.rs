mod optimize;
mod scan;
mod show;

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;

use slider_core::name::read_records;
use slider_core::score::{parse_scorer, BoxedScorer};
use slider_core::ShiftRecord;

use crate::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// List the sliders of a diff, one record per line
    Scan(scan::ScanArgs),
    /// Re-derive named sliders and print their optimal shifts
    Optimize(optimize::OptimizeArgs),
    /// Render named sliders with per-split scores
    Show(show::ShowArgs),
}

pub fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Scan(args) => scan::run(args),
        Commands::Optimize(args) => optimize::run(args),
        Commands::Show(args) => show::run(args),
    }
}

/// Scorer selection shared by all subcommands.
#[derive(Debug, clap::Args)]
pub struct ScorerOpts {
    /// Scorer generation (1, 2 or 3) or a full parameter spec such as
    /// "SplitScorer3(start_of_hunk_penalty=1, ...)"
    #[arg(long, default_value = "3")]
    scorer: String,
}

impl ScorerOpts {
    pub fn build(&self) -> Result<BoxedScorer> {
        parse_scorer(&self.scorer).with_context(|| format!("bad --scorer {:?}", self.scorer))
    }
}

/// Read an input source completely; `-` or absence means stdin.
pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match path {
        Some(path) if path != Path::new("-") => {
            File::open(path)
                .with_context(|| format!("cannot open {}", path.display()))?
                .read_to_end(&mut buf)?;
        }
        _ => {
            io::stdin().lock().read_to_end(&mut buf)?;
        }
    }
    Ok(buf)
}

/// Read slider records from a file or stdin, skipping unparseable lines
/// with a warning.
pub fn read_record_input(path: Option<&PathBuf>) -> Result<Vec<ShiftRecord>> {
    let input = read_input(path.map(PathBuf::as_path))?;
    let mut records = Vec::new();
    for record in read_records(BufReader::new(input.as_slice())) {
        match record {
            Ok(record) => records.push(record),
            Err(err) => eprintln!("warning: {err}"),
        }
    }
    Ok(records)
}
