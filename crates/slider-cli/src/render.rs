//! Human-readable slider rendering.
//!
//! Each line of the slider is annotated with the slide-range band markers,
//! the split score where the index is a legal top or bottom split, and the
//! placement the scorer picks, marked with the change's prefix.

use std::io::{self, Write};

use slider_core::score::SplitScorer;
use slider_core::Slider;

/// `c` when `index` falls inside the change shifted by `shift`.
fn band(shift: i32, index: i32, change_len: i32, c: char) -> char {
    if shift <= index && index < shift + change_len {
        c
    } else {
        ' '
    }
}

/// Render a slider with scores for every candidate split.
///
/// The two `|` columns mark the change band at the minimal and maximal
/// shifts; the third band uses the change prefix to mark the placement the
/// scorer chose.
pub fn show<W: Write>(
    out: &mut W,
    slider: &mut Slider,
    scorer: &(dyn SplitScorer + Send + Sync),
    slider_context: i32,
) -> io::Result<()> {
    let best_shift = slider.find_best_shift(scorer);
    let range = slider.shift_range();
    let change_len = slider.change_lines().len() as i32;
    let post_len = slider.post_context().len() as i32;
    let prefix = slider.kind().as_char();

    writeln!(out, "{}", "v".repeat(60))?;

    let show_lo = range.min - slider_context;
    let show_hi = range.limit + change_len + slider_context;

    let lines: Vec<(i32, String)> = slider
        .indexed_lines()
        .map(|(i, text)| (i, text.to_string()))
        .collect();

    for (i, text) in lines {
        if i < show_lo || i >= show_hi {
            continue;
        }

        let score = if range.contains(i) || range.contains(i - change_len) {
            slider.score_for_split(scorer, i).to_string()
        } else {
            String::new()
        };

        let current = band(0, i, change_len, prefix);
        writeln!(
            out,
            "         {}{} {:>8} {} >{}{}",
            band(range.min, i, change_len, '|'),
            band(range.max(), i, change_len, '|'),
            score,
            band(best_shift, i, change_len, prefix),
            current,
            text,
        )?;
    }

    // When the maximal shift pushes the bottom split past the last line,
    // its score belongs to a row of its own.
    let end_split = range.max() + change_len;
    if end_split == change_len + post_len && range.contains(end_split - change_len) {
        let score = slider.score_for_split(scorer, end_split).to_string();
        writeln!(out, "            {:>8}   ><EOF>", score)?;
    }

    writeln!(out, "{}", "^".repeat(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use slider_core::score::DefaultSplitScorer;
    use slider_core::{BString, ChangeKind};

    fn sample() -> Slider {
        let to = |v: &[&str]| v.iter().map(|s| BString::from(*s)).collect::<Vec<_>>();
        Slider::new(
            ChangeKind::Addition,
            to(&["a", "x"]),
            to(&["x"]),
            to(&["y"]),
            3,
        )
    }

    #[test]
    fn renders_banded_lines() {
        let mut buf = Vec::new();
        let scorer = DefaultSplitScorer::default();
        show(&mut buf, &mut sample(), &scorer, 5).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.first(), Some(&"v".repeat(60).as_str()));
        assert_eq!(lines.last(), Some(&"^".repeat(60).as_str()));
        // Every slider line is present with the > separator.
        assert_eq!(text.matches(" >").count(), 4);
        // The current placement is marked on the change line.
        assert!(text.contains(">+x"));
    }

    #[test]
    fn scores_appear_only_at_legal_splits() {
        let mut buf = Vec::new();
        let scorer = DefaultSplitScorer::default();
        show(&mut buf, &mut sample(), &scorer, 5).unwrap();
        let text = String::from_utf8(buf).unwrap();

        // Range is [-1, 1): splits -1, 0 (top) and 0, 1 (bottom) carry
        // scores; the first line of pre-context does not.
        let scored_rows = text
            .lines()
            .filter(|l| l.contains('(') && l.contains(')'))
            .count();
        assert_eq!(scored_rows, 3);
    }
}
