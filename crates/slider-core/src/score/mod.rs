//! Split scorers.
//!
//! A scorer maps [`SplitMeasurements`] to a badness score; lower is better.
//! Three generations are kept: the legacy bonus model ([`SplitScorer1`]),
//! the blank-weighted model ([`SplitScorer2`]), and the lexicographic model
//! ([`SplitScorer3`]), which is the default for optimization. The older two
//! remain selectable so historical parameter sweeps stay reproducible.
//!
//! Every scorer carries a fixed, named integer parameter vector. The vector
//! round-trips three ways: as a command-line option set (each scorer derives
//! `clap::Parser`), as the textual repr form `Name(param=value, …)` used for
//! persistence, and as a filename-safe underscore-joined value list.

mod scorer1;
mod scorer2;
mod scorer3;

pub use scorer1::SplitScorer1;
pub use scorer2::SplitScorer2;
pub use scorer3::SplitScorer3;

/// The scorer used when nothing else is requested.
pub type DefaultSplitScorer = SplitScorer3;

use std::io::BufRead;
use std::ops::Add;
use std::sync::OnceLock;

use regex::Regex;

use crate::measure::SplitMeasurements;
use crate::ParseError;

/// A split badness score. Lower is better.
///
/// Scorers 1 and 2 produce plain integers; scorer 3 produces a compound
/// score ordered primarily by effective indent. Scores from different
/// families never meet: combining them is a programmer error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Score {
    /// Scalar badness.
    Plain(i64),
    /// Compound badness: effective indent dominates, penalty breaks ties
    /// within a 60-point band.
    Lexicographic { effective_indent: i64, penalty: i64 },
}

impl Score {
    /// Whether this score is at least as good as `other`.
    ///
    /// For compound scores the rule is
    /// `60 * sign(Δindent) + Δpenalty <= 0`, so a one-level indent
    /// difference outweighs up to 60 points of penalty.
    pub fn is_no_worse_than(self, other: Self) -> bool {
        match (self, other) {
            (Self::Plain(a), Self::Plain(b)) => a <= b,
            (
                Self::Lexicographic {
                    effective_indent: ei_a,
                    penalty: p_a,
                },
                Self::Lexicographic {
                    effective_indent: ei_b,
                    penalty: p_b,
                },
            ) => {
                let cmp_indents = (ei_a > ei_b) as i64 - (ei_a < ei_b) as i64;
                60 * cmp_indents + (p_a - p_b) <= 0
            }
            _ => panic!("cannot compare scores from different scorer families"),
        }
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Score {
        match (self, rhs) {
            (Self::Plain(a), Self::Plain(b)) => Self::Plain(a + b),
            (
                Self::Lexicographic {
                    effective_indent: ei_a,
                    penalty: p_a,
                },
                Self::Lexicographic {
                    effective_indent: ei_b,
                    penalty: p_b,
                },
            ) => Self::Lexicographic {
                effective_indent: ei_a + ei_b,
                penalty: p_a + p_b,
            },
            _ => panic!("cannot combine scores from different scorer families"),
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain(v) => write!(f, "{v}"),
            Self::Lexicographic {
                effective_indent,
                penalty,
            } => write!(f, "({effective_indent},{penalty})"),
        }
    }
}

/// Capability shared by the scorer generations.
pub trait SplitScorer {
    /// The family name used in the repr form (e.g. `SplitScorer3`).
    fn scorer_name(&self) -> &'static str;

    /// The parameter vector in declaration order.
    fn arguments(&self) -> Vec<(&'static str, i64)>;

    /// Score a split. Lower is better.
    fn evaluate(&self, m: &SplitMeasurements) -> Score;

    /// Combine the scores of the two splits bracketing a shifted change.
    ///
    /// `bottom_at_end` is true when the bottom split lands past the last
    /// line of the hunk. The current generations sum both splits; the
    /// legacy scorer overrides this (see [`SplitScorer1`]).
    fn combine(&self, top: Score, bottom: Score, bottom_at_end: bool) -> Score {
        let _ = bottom_at_end;
        top + bottom
    }

    /// Build a scorer from a named parameter list, starting from defaults.
    /// Unknown names are warned about and ignored.
    fn from_arguments<'a, I>(args: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, i64)>,
        Self: Sized;

    /// The command-line options selecting this exact parameter vector.
    fn as_command_line_options(&self) -> Vec<String> {
        self.arguments()
            .iter()
            .map(|(name, value)| format!("--{}={}", name.replace('_', "-"), value))
            .collect()
    }

    /// A representation safe to embed in a filename: the parameter values
    /// joined with underscores, in declaration order.
    fn as_filename_string(&self) -> String {
        self.arguments()
            .iter()
            .map(|(_, value)| value.to_string())
            .collect::<Vec<_>>()
            .join("_")
    }

    /// The persistent textual form, `Name(param=value, …)`.
    fn repr(&self) -> String {
        format!(
            "{}({})",
            self.scorer_name(),
            self.arguments()
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }

    /// This scorer followed by parameter-space neighbors: every parameter
    /// displaced by every step, recursively up to `max_perturbations`
    /// simultaneous displacements. Supports sweep tooling.
    fn perturbed(&self, steps: &[i64], max_perturbations: usize) -> Vec<Self>
    where
        Self: Sized + Clone,
    {
        let mut out = vec![self.clone()];
        if max_perturbations == 0 || steps.is_empty() {
            return out;
        }

        let args = self.arguments();
        for i in 0..args.len() {
            for &step in steps {
                let mut varied = args.clone();
                varied[i].1 += step;
                let scorer = Self::from_arguments(varied.iter().map(|&(n, v)| (n, v)));
                out.extend(scorer.perturbed(steps, max_perturbations - 1));
            }
        }
        out
    }
}

/// Parse a scorer from its command-line option set.
///
/// The inverse of [`SplitScorer::as_command_line_options`].
pub fn from_command_line_options<S: clap::Parser>(
    options: &[String],
) -> Result<S, clap::Error> {
    S::try_parse_from(std::iter::once("scorer".to_string()).chain(options.iter().cloned()))
}

fn repr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z0-9_]+)\((.*)\)$").unwrap())
}

fn parse_repr_arguments(body: &str, spec: &str) -> Result<Vec<(String, i64)>, ParseError> {
    let mut args = Vec::new();
    for piece in body.split(',') {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let (name, value) = piece
            .split_once('=')
            .ok_or_else(|| ParseError::BadScorerSpec(spec.to_string()))?;
        let value: i64 = value
            .trim()
            .parse()
            .map_err(|_| ParseError::BadScorerSpec(spec.to_string()))?;
        args.push((name.trim().to_string(), value));
    }
    Ok(args)
}

/// A scorer behind the capability trait. Scorers are plain parameter
/// vectors, so sharing one across threads is always safe.
pub type BoxedScorer = Box<dyn SplitScorer + Send + Sync>;

/// Parse a scorer spec: a bare generation number (`1`, `2`, `3`, meaning
/// that generation with default parameters) or the full repr form.
pub fn parse_scorer(spec: &str) -> Result<BoxedScorer, ParseError> {
    let spec = spec.trim();
    match spec {
        "1" => return Ok(Box::new(SplitScorer1::default())),
        "2" => return Ok(Box::new(SplitScorer2::default())),
        "3" => return Ok(Box::new(SplitScorer3::default())),
        _ => {}
    }

    let captures = repr_regex()
        .captures(spec)
        .ok_or_else(|| ParseError::BadScorerSpec(spec.to_string()))?;
    let name = captures.get(1).expect("group 1 always present").as_str();
    let args = parse_repr_arguments(captures.get(2).expect("group 2 always present").as_str(), spec)?;
    let args = args.iter().map(|(n, v)| (n.as_str(), *v));

    match name {
        "SplitScorer1" => Ok(Box::new(SplitScorer1::from_arguments(args))),
        "SplitScorer2" => Ok(Box::new(SplitScorer2::from_arguments(args))),
        "SplitScorer3" => Ok(Box::new(SplitScorer3::from_arguments(args))),
        _ => Err(ParseError::BadScorerSpec(spec.to_string())),
    }
}

/// Read previously computed `<score> <scorer-repr>` pairs, one per line.
pub fn read_scores<R: BufRead>(reader: R) -> Result<Vec<(BoxedScorer, i64)>, ParseError> {
    let mut scores = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (score, repr) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| ParseError::BadScorerSpec(line.to_string()))?;
        let score: i64 = score
            .parse()
            .map_err(|_| ParseError::BadScorerSpec(line.to_string()))?;
        scores.push((parse_scorer(repr)?, score));
    }
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_score_ordering() {
        assert!(Score::Plain(3).is_no_worse_than(Score::Plain(3)));
        assert!(Score::Plain(2).is_no_worse_than(Score::Plain(3)));
        assert!(!Score::Plain(4).is_no_worse_than(Score::Plain(3)));
    }

    #[test]
    fn lexicographic_indent_dominates_small_penalties() {
        let low = Score::Lexicographic {
            effective_indent: 0,
            penalty: 59,
        };
        let high = Score::Lexicographic {
            effective_indent: 4,
            penalty: 0,
        };
        assert!(low.is_no_worse_than(high));
        assert!(!high.is_no_worse_than(low));
    }

    #[test]
    fn lexicographic_large_penalty_beats_indent() {
        let a = Score::Lexicographic {
            effective_indent: 0,
            penalty: 100,
        };
        let b = Score::Lexicographic {
            effective_indent: 4,
            penalty: 0,
        };
        // 60 * (-1) + 100 = 40 > 0: the deeper indent wins despite the rule's
        // preference for shallow splits.
        assert!(!a.is_no_worse_than(b));
        assert!(b.is_no_worse_than(a));
    }

    #[test]
    fn score_addition_is_componentwise() {
        assert_eq!(Score::Plain(2) + Score::Plain(3), Score::Plain(5));
        let sum = Score::Lexicographic {
            effective_indent: 1,
            penalty: -4,
        } + Score::Lexicographic {
            effective_indent: 2,
            penalty: 10,
        };
        assert_eq!(
            sum,
            Score::Lexicographic {
                effective_indent: 3,
                penalty: 6
            }
        );
    }

    #[test]
    #[should_panic(expected = "different scorer families")]
    fn mixed_family_addition_panics() {
        let _ = Score::Plain(1)
            + Score::Lexicographic {
                effective_indent: 0,
                penalty: 0,
            };
    }

    #[test]
    fn parse_scorer_shorthand() {
        let scorer = parse_scorer("3").unwrap();
        assert_eq!(scorer.scorer_name(), "SplitScorer3");
        assert_eq!(scorer.arguments(), SplitScorer3::default().arguments());
    }

    #[test]
    fn parse_scorer_repr_round_trip() {
        let scorer = SplitScorer2::default();
        let parsed = parse_scorer(&scorer.repr()).unwrap();
        assert_eq!(parsed.scorer_name(), "SplitScorer2");
        assert_eq!(parsed.arguments(), scorer.arguments());
    }

    #[test]
    fn parse_scorer_rejects_unknown() {
        assert!(parse_scorer("SplitScorer9(x=1)").is_err());
        assert!(parse_scorer("gibberish").is_err());
        assert!(parse_scorer("SplitScorer3(start_of_hunk_penalty=oops)").is_err());
    }

    #[test]
    fn read_scores_parses_pairs() {
        let input = format!(
            "42 {}\n-7 {}\n",
            SplitScorer3::default().repr(),
            SplitScorer1::default().repr()
        );
        let scores = read_scores(input.as_bytes()).unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].1, 42);
        assert_eq!(scores[0].0.scorer_name(), "SplitScorer3");
        assert_eq!(scores[1].1, -7);
        assert_eq!(scores[1].0.scorer_name(), "SplitScorer1");
    }

    #[test]
    fn perturbed_yields_original_first() {
        let scorer = SplitScorer3::default();
        let all = scorer.perturbed(&[-1, 1], 1);
        assert_eq!(all[0], scorer);
        // 10 parameters x 2 steps + the original.
        assert_eq!(all.len(), 1 + 10 * 2);
    }

    #[test]
    fn perturbed_with_zero_budget_is_identity() {
        let scorer = SplitScorer1::default();
        assert_eq!(scorer.perturbed(&[-2, 2], 0), vec![scorer]);
    }
}
