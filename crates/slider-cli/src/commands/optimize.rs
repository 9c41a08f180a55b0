use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use slider_git::GitDriver;

use super::{read_record_input, ScorerOpts};

#[derive(Args)]
pub struct OptimizeArgs {
    /// Repository holding the objects the records refer to
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Records file ("-" for stdin)
    #[arg(long)]
    records: Option<PathBuf>,

    #[command(flatten)]
    scorer: ScorerOpts,
}

pub fn run(args: OptimizeArgs) -> Result<i32> {
    let scorer = args.scorer.build()?;
    let mut driver = GitDriver::new(&args.repo);

    for record in read_record_input(args.records.as_ref())? {
        let mut slider = match driver.resolve(&record.name) {
            Ok(slider) => slider,
            Err(err) => {
                eprintln!("warning: {}: {err}", record.name);
                continue;
            }
        };
        let best = slider.find_best_shift(scorer.as_ref());
        println!("{} {best}", record.name);
    }
    Ok(0)
}
