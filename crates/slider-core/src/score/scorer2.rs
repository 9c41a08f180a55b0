//! The blank-weighted model.

use tracing::warn;

use super::{Score, SplitScorer};
use crate::measure::SplitMeasurements;

mod defaults {
    pub const START_OF_HUNK_BONUS: i64 = 9;
    pub const END_OF_HUNK_BONUS: i64 = 46;
    pub const TOTAL_BLANK_WEIGHT: i64 = 4;
    pub const PRE_BLANK_WEIGHT: i64 = 16;
    pub const RELATIVE_INDENT_BONUS: i64 = -1;
    pub const RELATIVE_INDENT_HAS_BLANK_BONUS: i64 = 15;
    pub const RELATIVE_OUTDENT_BONUS: i64 = -19;
    pub const RELATIVE_OUTDENT_HAS_BLANK_BONUS: i64 = 2;
    pub const RELATIVE_DEDENT_BONUS: i64 = -63;
    pub const RELATIVE_DEDENT_HAS_BLANK_BONUS: i64 = 50;
}

/// Second-generation scorer: blank lines contribute linearly through two
/// weights instead of the fixed location bonuses, and each indent-relation
/// bonus gains a component that applies only when blanks are present near
/// the split.
///
/// Absent indents are not substituted: a split with no usable indent scores
/// zero and a split with no predecessor takes no relation bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::Parser)]
pub struct SplitScorer2 {
    #[arg(long, default_value_t = defaults::START_OF_HUNK_BONUS, allow_negative_numbers = true)]
    pub start_of_hunk_bonus: i64,
    #[arg(long, default_value_t = defaults::END_OF_HUNK_BONUS, allow_negative_numbers = true)]
    pub end_of_hunk_bonus: i64,
    #[arg(long, default_value_t = defaults::TOTAL_BLANK_WEIGHT, allow_negative_numbers = true)]
    pub total_blank_weight: i64,
    #[arg(long, default_value_t = defaults::PRE_BLANK_WEIGHT, allow_negative_numbers = true)]
    pub pre_blank_weight: i64,
    #[arg(long, default_value_t = defaults::RELATIVE_INDENT_BONUS, allow_negative_numbers = true)]
    pub relative_indent_bonus: i64,
    #[arg(long, default_value_t = defaults::RELATIVE_INDENT_HAS_BLANK_BONUS, allow_negative_numbers = true)]
    pub relative_indent_has_blank_bonus: i64,
    #[arg(long, default_value_t = defaults::RELATIVE_OUTDENT_BONUS, allow_negative_numbers = true)]
    pub relative_outdent_bonus: i64,
    #[arg(long, default_value_t = defaults::RELATIVE_OUTDENT_HAS_BLANK_BONUS, allow_negative_numbers = true)]
    pub relative_outdent_has_blank_bonus: i64,
    #[arg(long, default_value_t = defaults::RELATIVE_DEDENT_BONUS, allow_negative_numbers = true)]
    pub relative_dedent_bonus: i64,
    #[arg(long, default_value_t = defaults::RELATIVE_DEDENT_HAS_BLANK_BONUS, allow_negative_numbers = true)]
    pub relative_dedent_has_blank_bonus: i64,
}

impl Default for SplitScorer2 {
    fn default() -> Self {
        Self {
            start_of_hunk_bonus: defaults::START_OF_HUNK_BONUS,
            end_of_hunk_bonus: defaults::END_OF_HUNK_BONUS,
            total_blank_weight: defaults::TOTAL_BLANK_WEIGHT,
            pre_blank_weight: defaults::PRE_BLANK_WEIGHT,
            relative_indent_bonus: defaults::RELATIVE_INDENT_BONUS,
            relative_indent_has_blank_bonus: defaults::RELATIVE_INDENT_HAS_BLANK_BONUS,
            relative_outdent_bonus: defaults::RELATIVE_OUTDENT_BONUS,
            relative_outdent_has_blank_bonus: defaults::RELATIVE_OUTDENT_HAS_BLANK_BONUS,
            relative_dedent_bonus: defaults::RELATIVE_DEDENT_BONUS,
            relative_dedent_has_blank_bonus: defaults::RELATIVE_DEDENT_HAS_BLANK_BONUS,
        }
    }
}

impl SplitScorer for SplitScorer2 {
    fn scorer_name(&self) -> &'static str {
        "SplitScorer2"
    }

    fn arguments(&self) -> Vec<(&'static str, i64)> {
        vec![
            ("start_of_hunk_bonus", self.start_of_hunk_bonus),
            ("end_of_hunk_bonus", self.end_of_hunk_bonus),
            ("total_blank_weight", self.total_blank_weight),
            ("pre_blank_weight", self.pre_blank_weight),
            ("relative_indent_bonus", self.relative_indent_bonus),
            (
                "relative_indent_has_blank_bonus",
                self.relative_indent_has_blank_bonus,
            ),
            ("relative_outdent_bonus", self.relative_outdent_bonus),
            (
                "relative_outdent_has_blank_bonus",
                self.relative_outdent_has_blank_bonus,
            ),
            ("relative_dedent_bonus", self.relative_dedent_bonus),
            (
                "relative_dedent_has_blank_bonus",
                self.relative_dedent_has_blank_bonus,
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
                "start_of_hunk_bonus" => scorer.start_of_hunk_bonus = value,
                "end_of_hunk_bonus" => scorer.end_of_hunk_bonus = value,
                "total_blank_weight" => scorer.total_blank_weight = value,
                "pre_blank_weight" => scorer.pre_blank_weight = value,
                "relative_indent_bonus" => scorer.relative_indent_bonus = value,
                "relative_indent_has_blank_bonus" => {
                    scorer.relative_indent_has_blank_bonus = value;
                }
                "relative_outdent_bonus" => scorer.relative_outdent_bonus = value,
                "relative_outdent_has_blank_bonus" => {
                    scorer.relative_outdent_has_blank_bonus = value;
                }
                "relative_dedent_bonus" => scorer.relative_dedent_bonus = value,
                "relative_dedent_has_blank_bonus" => {
                    scorer.relative_dedent_has_blank_bonus = value;
                }
                _ => warn!(parameter = name, "unknown SplitScorer2 parameter ignored"),
            }
        }
        scorer
    }

    fn evaluate(&self, m: &SplitMeasurements) -> Score {
        let mut bonus = 0i64;

        if m.pre_indent.is_none() && m.pre_blank == 0 {
            bonus += self.start_of_hunk_bonus;
        }
        if m.end_of_hunk {
            bonus += self.end_of_hunk_bonus;
        }

        let mut total_blank = i64::from(m.pre_blank);
        if m.indent.is_none() {
            total_blank += 1 + i64::from(m.post_blank);
        }

        bonus += self.total_blank_weight * total_blank
            + self.pre_blank_weight * i64::from(m.pre_blank);

        let indent = if m.indent.is_some() { m.indent } else { m.post_indent };
        let is_blank = i64::from(total_blank != 0);

        let score = match (indent, m.pre_indent) {
            (None, _) => 0,
            (Some(indent), None) => i64::from(indent),
            (Some(indent), Some(pre_indent)) => {
                let indent = i64::from(indent);
                let pre_indent = i64::from(pre_indent);
                if indent > pre_indent {
                    bonus += self.relative_indent_bonus
                        + self.relative_indent_has_blank_bonus * is_blank;
                } else if indent < pre_indent {
                    if m.post_indent.map_or(true, |p| indent >= i64::from(p)) {
                        bonus += self.relative_dedent_bonus
                            + self.relative_dedent_has_blank_bonus * is_blank;
                    } else {
                        bonus += self.relative_outdent_bonus
                            + self.relative_outdent_has_blank_bonus * is_blank;
                    }
                }
                indent
            }
        };

        Score::Plain(10 * score - bonus)
    }
}

impl std::fmt::Display for SplitScorer2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.repr())
    }
}
