//! The lexicographic model, the current default.

use tracing::warn;

use super::{Score, SplitScorer};
use crate::measure::SplitMeasurements;

mod defaults {
    pub const START_OF_HUNK_PENALTY: i64 = 1;
    pub const END_OF_HUNK_PENALTY: i64 = 21;
    pub const TOTAL_BLANK_WEIGHT: i64 = -30;
    pub const POST_BLANK_WEIGHT: i64 = 6;
    pub const RELATIVE_INDENT_PENALTY: i64 = -4;
    pub const RELATIVE_INDENT_WITH_BLANK_PENALTY: i64 = 10;
    pub const RELATIVE_OUTDENT_PENALTY: i64 = 24;
    pub const RELATIVE_OUTDENT_WITH_BLANK_PENALTY: i64 = 17;
    pub const RELATIVE_DEDENT_PENALTY: i64 = 23;
    pub const RELATIVE_DEDENT_WITH_BLANK_PENALTY: i64 = 17;
}

/// Third-generation scorer. Produces a compound score: the effective indent
/// of the split dominates, and an accumulated penalty decides within a
/// 60-point band (see [`Score::is_no_worse_than`]).
///
/// Positive parameters make a split less favored; the negative
/// `total_blank_weight` is what pulls splits toward blank lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::Parser)]
pub struct SplitScorer3 {
    #[arg(long, default_value_t = defaults::START_OF_HUNK_PENALTY, allow_negative_numbers = true)]
    pub start_of_hunk_penalty: i64,
    #[arg(long, default_value_t = defaults::END_OF_HUNK_PENALTY, allow_negative_numbers = true)]
    pub end_of_hunk_penalty: i64,
    #[arg(long, default_value_t = defaults::TOTAL_BLANK_WEIGHT, allow_negative_numbers = true)]
    pub total_blank_weight: i64,
    #[arg(long, default_value_t = defaults::POST_BLANK_WEIGHT, allow_negative_numbers = true)]
    pub post_blank_weight: i64,
    #[arg(long, default_value_t = defaults::RELATIVE_INDENT_PENALTY, allow_negative_numbers = true)]
    pub relative_indent_penalty: i64,
    #[arg(long, default_value_t = defaults::RELATIVE_INDENT_WITH_BLANK_PENALTY, allow_negative_numbers = true)]
    pub relative_indent_with_blank_penalty: i64,
    #[arg(long, default_value_t = defaults::RELATIVE_OUTDENT_PENALTY, allow_negative_numbers = true)]
    pub relative_outdent_penalty: i64,
    #[arg(long, default_value_t = defaults::RELATIVE_OUTDENT_WITH_BLANK_PENALTY, allow_negative_numbers = true)]
    pub relative_outdent_with_blank_penalty: i64,
    #[arg(long, default_value_t = defaults::RELATIVE_DEDENT_PENALTY, allow_negative_numbers = true)]
    pub relative_dedent_penalty: i64,
    #[arg(long, default_value_t = defaults::RELATIVE_DEDENT_WITH_BLANK_PENALTY, allow_negative_numbers = true)]
    pub relative_dedent_with_blank_penalty: i64,
}

impl Default for SplitScorer3 {
    fn default() -> Self {
        Self {
            start_of_hunk_penalty: defaults::START_OF_HUNK_PENALTY,
            end_of_hunk_penalty: defaults::END_OF_HUNK_PENALTY,
            total_blank_weight: defaults::TOTAL_BLANK_WEIGHT,
            post_blank_weight: defaults::POST_BLANK_WEIGHT,
            relative_indent_penalty: defaults::RELATIVE_INDENT_PENALTY,
            relative_indent_with_blank_penalty: defaults::RELATIVE_INDENT_WITH_BLANK_PENALTY,
            relative_outdent_penalty: defaults::RELATIVE_OUTDENT_PENALTY,
            relative_outdent_with_blank_penalty: defaults::RELATIVE_OUTDENT_WITH_BLANK_PENALTY,
            relative_dedent_penalty: defaults::RELATIVE_DEDENT_PENALTY,
            relative_dedent_with_blank_penalty: defaults::RELATIVE_DEDENT_WITH_BLANK_PENALTY,
        }
    }
}

impl SplitScorer for SplitScorer3 {
    fn scorer_name(&self) -> &'static str {
        "SplitScorer3"
    }

    fn arguments(&self) -> Vec<(&'static str, i64)> {
        vec![
            ("start_of_hunk_penalty", self.start_of_hunk_penalty),
            ("end_of_hunk_penalty", self.end_of_hunk_penalty),
            ("total_blank_weight", self.total_blank_weight),
            ("post_blank_weight", self.post_blank_weight),
            ("relative_indent_penalty", self.relative_indent_penalty),
            (
                "relative_indent_with_blank_penalty",
                self.relative_indent_with_blank_penalty,
            ),
            ("relative_outdent_penalty", self.relative_outdent_penalty),
            (
                "relative_outdent_with_blank_penalty",
                self.relative_outdent_with_blank_penalty,
            ),
            ("relative_dedent_penalty", self.relative_dedent_penalty),
            (
                "relative_dedent_with_blank_penalty",
                self.relative_dedent_with_blank_penalty,
            ),
        ]
    }

    fn from_arguments<'a, I>(args: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, i64)>,
    {
        let mut scorer = Self::default();
        for (name, value) in args {
            match name {
                "start_of_hunk_penalty" => scorer.start_of_hunk_penalty = value,
                "end_of_hunk_penalty" => scorer.end_of_hunk_penalty = value,
                "total_blank_weight" => scorer.total_blank_weight = value,
                "post_blank_weight" => scorer.post_blank_weight = value,
                "relative_indent_penalty" => scorer.relative_indent_penalty = value,
                "relative_indent_with_blank_penalty" => {
                    scorer.relative_indent_with_blank_penalty = value;
                }
                "relative_outdent_penalty" => scorer.relative_outdent_penalty = value,
                "relative_outdent_with_blank_penalty" => {
                    scorer.relative_outdent_with_blank_penalty = value;
                }
                "relative_dedent_penalty" => scorer.relative_dedent_penalty = value,
                "relative_dedent_with_blank_penalty" => {
                    scorer.relative_dedent_with_blank_penalty = value;
                }
                _ => warn!(parameter = name, "unknown SplitScorer3 parameter ignored"),
            }
        }
        scorer
    }

    fn evaluate(&self, m: &SplitMeasurements) -> Score {
        // Positive penalty makes the split less favored.
        let mut penalty = 0i64;

        if m.pre_indent.is_none() && m.pre_blank == 0 {
            penalty += self.start_of_hunk_penalty;
        }
        if m.end_of_hunk {
            penalty += self.end_of_hunk_penalty;
        }

        // Blank lines at or after the split, the split's own line included.
        let post_blank = if m.indent.is_none() {
            1 + i64::from(m.post_blank)
        } else {
            0
        };
        let total_blank = i64::from(m.pre_blank) + post_blank;

        penalty += self.total_blank_weight * total_blank + self.post_blank_weight * post_blank;

        let indent = if m.indent.is_some() { m.indent } else { m.post_indent };
        let is_blank = total_blank != 0;

        let effective_indent = indent.map_or(-1, i64::from);

        if let (Some(indent), Some(pre_indent)) = (indent, m.pre_indent) {
            let indent = i64::from(indent);
            let pre_indent = i64::from(pre_indent);
            if indent > pre_indent {
                penalty += if is_blank {
                    self.relative_indent_with_blank_penalty
                } else {
                    self.relative_indent_penalty
                };
            } else if indent < pre_indent {
                if m.post_indent.map_or(true, |p| indent >= i64::from(p)) {
                    penalty += if is_blank {
                        self.relative_dedent_with_blank_penalty
                    } else {
                        self.relative_dedent_penalty
                    };
                } else {
                    penalty += if is_blank {
                        self.relative_outdent_with_blank_penalty
                    } else {
                        self.relative_outdent_penalty
                    };
                }
            }
        }

        Score::Lexicographic {
            effective_indent,
            penalty,
        }
    }
}

impl std::fmt::Display for SplitScorer3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.repr())
    }
}
