//! The legacy bonus model.

use tracing::warn;

use super::{Score, SplitScorer};
use crate::measure::SplitMeasurements;

mod defaults {
    pub const START_OF_HUNK_BONUS: i64 = 9;
    pub const END_OF_HUNK_BONUS: i64 = 20;
    pub const FOLLOWS_BLANK_BONUS: i64 = 20;
    pub const PRECEDES_BLANK_BONUS: i64 = 5;
    pub const BETWEEN_BLANKS_BONUS: i64 = 19;
    pub const RELATIVE_INDENT_BONUS: i64 = -2;
    pub const RELATIVE_OUTDENT_BONUS: i64 = -13;
    pub const RELATIVE_DEDENT_BONUS: i64 = -13;
    pub const BLOCK_BONUS: i64 = -1;
}

/// First-generation scorer: a base score of ten times the split's indent,
/// reduced by bonuses for hunk edges, blank-line placement, and indentation
/// changes.
///
/// Unlike the later generations, absent pre/post indents are substituted
/// with zero before the indent-relation logic runs; the two code paths are
/// intentionally not unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::Parser)]
pub struct SplitScorer1 {
    #[arg(long, default_value_t = defaults::START_OF_HUNK_BONUS, allow_negative_numbers = true)]
    pub start_of_hunk_bonus: i64,
    #[arg(long, default_value_t = defaults::END_OF_HUNK_BONUS, allow_negative_numbers = true)]
    pub end_of_hunk_bonus: i64,
    #[arg(long, default_value_t = defaults::FOLLOWS_BLANK_BONUS, allow_negative_numbers = true)]
    pub follows_blank_bonus: i64,
    #[arg(long, default_value_t = defaults::PRECEDES_BLANK_BONUS, allow_negative_numbers = true)]
    pub precedes_blank_bonus: i64,
    #[arg(long, default_value_t = defaults::BETWEEN_BLANKS_BONUS, allow_negative_numbers = true)]
    pub between_blanks_bonus: i64,
    #[arg(long, default_value_t = defaults::RELATIVE_INDENT_BONUS, allow_negative_numbers = true)]
    pub relative_indent_bonus: i64,
    #[arg(long, default_value_t = defaults::RELATIVE_OUTDENT_BONUS, allow_negative_numbers = true)]
    pub relative_outdent_bonus: i64,
    #[arg(long, default_value_t = defaults::RELATIVE_DEDENT_BONUS, allow_negative_numbers = true)]
    pub relative_dedent_bonus: i64,
    #[arg(long, default_value_t = defaults::BLOCK_BONUS, allow_negative_numbers = true)]
    pub block_bonus: i64,
}

impl Default for SplitScorer1 {
    fn default() -> Self {
        Self {
            start_of_hunk_bonus: defaults::START_OF_HUNK_BONUS,
            end_of_hunk_bonus: defaults::END_OF_HUNK_BONUS,
            follows_blank_bonus: defaults::FOLLOWS_BLANK_BONUS,
            precedes_blank_bonus: defaults::PRECEDES_BLANK_BONUS,
            between_blanks_bonus: defaults::BETWEEN_BLANKS_BONUS,
            relative_indent_bonus: defaults::RELATIVE_INDENT_BONUS,
            relative_outdent_bonus: defaults::RELATIVE_OUTDENT_BONUS,
            relative_dedent_bonus: defaults::RELATIVE_DEDENT_BONUS,
            block_bonus: defaults::BLOCK_BONUS,
        }
    }
}

impl SplitScorer for SplitScorer1 {
    fn scorer_name(&self) -> &'static str {
        "SplitScorer1"
    }

    fn arguments(&self) -> Vec<(&'static str, i64)> {
        vec![
            ("start_of_hunk_bonus", self.start_of_hunk_bonus),
            ("end_of_hunk_bonus", self.end_of_hunk_bonus),
            ("follows_blank_bonus", self.follows_blank_bonus),
            ("precedes_blank_bonus", self.precedes_blank_bonus),
            ("between_blanks_bonus", self.between_blanks_bonus),
            ("relative_indent_bonus", self.relative_indent_bonus),
            ("relative_outdent_bonus", self.relative_outdent_bonus),
            ("relative_dedent_bonus", self.relative_dedent_bonus),
            ("block_bonus", self.block_bonus),
        ]
    }

    fn from_arguments<'a, I>(args: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, i64)>,
    {
        let mut scorer = Self::default();
        for (name, value) in args {
            match name {
                "start_of_hunk_bonus" => scorer.start_of_hunk_bonus = value,
                "end_of_hunk_bonus" => scorer.end_of_hunk_bonus = value,
                "follows_blank_bonus" => scorer.follows_blank_bonus = value,
                "precedes_blank_bonus" => scorer.precedes_blank_bonus = value,
                "between_blanks_bonus" => scorer.between_blanks_bonus = value,
                "relative_indent_bonus" => scorer.relative_indent_bonus = value,
                "relative_outdent_bonus" => scorer.relative_outdent_bonus = value,
                "relative_dedent_bonus" => scorer.relative_dedent_bonus = value,
                "block_bonus" => scorer.block_bonus = value,
                _ => warn!(parameter = name, "unknown SplitScorer1 parameter ignored"),
            }
        }
        scorer
    }

    fn evaluate(&self, m: &SplitMeasurements) -> Score {
        // Positive bonus makes the split more favored.
        let mut bonus = 0i64;
        let blank = m.indent.is_none();

        if m.pre_indent.is_none() && m.pre_blank == 0 {
            bonus += self.start_of_hunk_bonus;
        }
        if m.end_of_hunk {
            bonus += self.end_of_hunk_bonus;
        }

        if m.pre_blank > 0 && !blank {
            bonus += self.follows_blank_bonus;
        } else if blank && m.pre_blank == 0 {
            bonus += self.precedes_blank_bonus;
        } else if blank && m.pre_blank > 0 {
            bonus += self.between_blanks_bonus;
        }

        // A blank line is scored at the indent of the line below it; absent
        // indents count as column zero here (the later scorers keep them
        // distinct instead).
        let indent = if blank { m.post_indent } else { m.indent };
        let indent = indent.map_or(0, i64::from);
        let pre_indent = m.pre_indent.map_or(0, i64::from);

        let score = indent;
        if indent > pre_indent {
            // More indented than its predecessor: keep these lines together.
            bonus += self.relative_indent_bonus;
        } else if indent < pre_indent {
            if m.post_indent.map_or(true, |p| indent >= i64::from(p)) {
                // The previous block ended here.
                bonus += self.relative_dedent_bonus;
            } else {
                // The line below is deeper: this line starts a new block.
                bonus += self.relative_outdent_bonus;
            }
        } else if !blank {
            // Same level as its predecessor: likely inside a run of siblings.
            bonus += self.block_bonus;
        }

        Score::Plain(10 * score - bonus)
    }

    /// Legacy end-of-hunk handling: when the bottom split falls past the
    /// last line, the hunk edge stands in for the bottom split and the
    /// combined score is twice the top score less one.
    fn combine(&self, top: Score, bottom: Score, bottom_at_end: bool) -> Score {
        if bottom_at_end {
            match top {
                Score::Plain(v) => Score::Plain(2 * v - 1),
                Score::Lexicographic { .. } => unreachable!("scorer 1 emits plain scores"),
            }
        } else {
            top + bottom
        }
    }
}

impl std::fmt::Display for SplitScorer1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.repr())
    }
}
