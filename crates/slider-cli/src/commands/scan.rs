use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rayon::prelude::*;

use slider_core::parse::iter_file_diffs;
use slider_core::score::SplitScorer;
use slider_core::{FileDiff, SliderName};
use slider_git::GitDriver;

use super::{read_input, ScorerOpts};

#[derive(Args)]
pub struct ScanArgs {
    /// Read a diff from this file ("-" for stdin) instead of running git
    #[arg(long)]
    diff: Option<PathBuf>,

    /// Repository to run the diff in
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Append the optimal shift to each record
    #[arg(long)]
    best: bool,

    /// Old revision spec, e.g. a commit or <object>:<path>
    #[arg(required_unless_present = "diff")]
    old: Option<String>,

    /// New revision spec
    #[arg(required_unless_present = "diff")]
    new: Option<String>,

    #[command(flatten)]
    scorer: ScorerOpts,
}

pub fn run(args: ScanArgs) -> Result<i32> {
    let scorer = args.scorer.build()?;

    let input = match &args.diff {
        Some(path) => read_input(Some(path.as_path()))?,
        None => {
            let mut driver = GitDriver::new(&args.repo);
            let old = args.old.as_deref().expect("old is required without --diff");
            let new = args.new.as_deref().expect("new is required without --diff");
            driver.diff(old, new)?.to_vec()
        }
    };

    let file_diffs: Vec<FileDiff> = iter_file_diffs(&input).collect();

    // File sections are independent; sliders never leave their section.
    let reports: Vec<Vec<String>> = file_diffs
        .par_iter()
        .map(|file_diff| report_file(file_diff, scorer.as_ref(), args.best))
        .collect();

    for line in reports.into_iter().flatten() {
        println!("{line}");
    }
    Ok(0)
}

/// One record per slider of the file section, in hunk order.
fn report_file(
    file_diff: &FileDiff,
    scorer: &(dyn SplitScorer + Send + Sync),
    best: bool,
) -> Vec<String> {
    let Some((old_spec, new_spec)) = file_specs(file_diff) else {
        return Vec::new();
    };
    let mut lines = Vec::new();

    for hunk in &file_diff.hunks {
        for mut slider in hunk.sliders() {
            let name = SliderName::new(
                old_spec.clone(),
                new_spec.clone(),
                slider.kind(),
                slider.canonical_line_number(),
            );
            if best {
                slider.shift_canonically();
                let shift = slider.find_best_shift(scorer);
                lines.push(format!("{name} {shift}"));
            } else {
                lines.push(name.to_string());
            }
        }
    }
    lines
}

/// The `<sha1>:<path>` specs of a file section, when it carries both.
fn file_specs(file_diff: &FileDiff) -> Option<(String, String)> {
    let old = format!(
        "{}:{}",
        file_diff.old_sha1.as_deref()?,
        file_diff.old_filename.as_ref()?
    );
    let new = format!(
        "{}:{}",
        file_diff.new_sha1.as_deref()?,
        file_diff.new_filename.as_ref()?
    );
    Some((old, new))
}
