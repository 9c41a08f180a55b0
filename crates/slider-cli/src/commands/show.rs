use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use slider_git::GitDriver;

use crate::render;

use super::{read_record_input, ScorerOpts};

#[derive(Args)]
pub struct ShowArgs {
    /// Repository holding the objects the records refer to
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Records file ("-" for stdin)
    #[arg(long)]
    records: Option<PathBuf>,

    /// Context lines shown beyond the slide range
    #[arg(long, default_value_t = 5)]
    context: i32,

    #[command(flatten)]
    scorer: ScorerOpts,
}

pub fn run(args: ShowArgs) -> Result<i32> {
    let scorer = args.scorer.build()?;
    let mut driver = GitDriver::new(&args.repo);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for record in read_record_input(args.records.as_ref())? {
        let mut slider = match driver.resolve(&record.name) {
            Ok(slider) => slider,
            Err(err) => {
                eprintln!("warning: {}: {err}", record.name);
                continue;
            }
        };
        writeln!(out, "{}", record.name)?;
        render::show(&mut out, &mut slider, scorer.as_ref(), args.context)?;
    }
    Ok(0)
}
