//! Slidable changes and shift optimization.
//!
//! A change consisting only of additions (or only of deletions) whose edge
//! lines repeat in the neighboring context can be shifted vertically without
//! changing the patched result. A [`Slider`] captures one such change
//! together with the full one-sided context of its hunk and the legal shift
//! interval, and can score every candidate placement.

use std::collections::HashMap;

use bstr::{BStr, BString, ByteSlice};
use tracing::debug;

use crate::measure::SplitMeasurements;
use crate::score::{Score, SplitScorer};
use crate::{ChangeKind, DiffLine, DiffSide, Group, Hunk};

/// Half-open interval `[min, limit)` of legal shifts. Zero, the original
/// placement, is always legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftRange {
    pub min: i32,
    pub limit: i32,
}

impl ShiftRange {
    pub fn len(&self) -> usize {
        (self.limit - self.min) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.limit <= self.min
    }

    pub fn contains(&self, shift: i32) -> bool {
        self.min <= shift && shift < self.limit
    }

    /// The largest legal shift.
    pub fn max(&self) -> i32 {
        self.limit - 1
    }

    pub fn iter(&self) -> std::ops::Range<i32> {
        self.min..self.limit
    }

    fn shifted_by(&self, delta: i32) -> Self {
        Self {
            min: self.min + delta,
            limit: self.limit + delta,
        }
    }
}

/// A slidable single-sided change with its one-sided hunk context.
///
/// The slider owns one flat vector holding the selected side's text for the
/// whole hunk (old side for a deletion, new side for an addition); the
/// pre-context / change / post-context grouping is a pair of index
/// boundaries into it. Sliding therefore moves no line text: it adjusts the
/// boundaries, the line number, and the remaining shift interval.
///
/// Not thread-safe across a `slide`/`find_best_shift` sequence: the
/// measurement cache and the in-place mutation confine a slider to one
/// thread. Distinct sliders are independent.
#[derive(Debug, Clone)]
pub struct Slider {
    kind: ChangeKind,
    lines: Vec<BString>,
    pre_len: usize,
    change_len: usize,
    line_number: u32,
    shift_range: ShiftRange,
    measurements: HashMap<i32, SplitMeasurements>,
}

impl Hunk {
    /// The sliders of this hunk.
    ///
    /// One per single-sided change group that can actually move in at least
    /// one direction; mixed replacements and pinned changes yield nothing.
    pub fn sliders(&self) -> Vec<Slider> {
        let groups = self.groups();
        let mut sliders = Vec::new();

        for i in (1..groups.len().saturating_sub(1)).step_by(2) {
            let Group::Change(change) = &groups[i] else {
                unreachable!("groups alternate context/change");
            };
            let side = match change.kind() {
                ChangeKind::Addition => DiffSide::New,
                ChangeKind::Deletion => DiffSide::Old,
                // Replacements cannot be slid.
                ChangeKind::Mixed => continue,
            };

            let change_first = change.difflines().first().map(DiffLine::text);
            let change_last = change.difflines().last().map(DiffLine::text);
            let can_slide_up =
                groups[i - 1].difflines().last().map(DiffLine::text) == change_last;
            let can_slide_down =
                groups[i + 1].difflines().first().map(DiffLine::text) == change_first;
            if !can_slide_up && !can_slide_down {
                continue;
            }

            let pre_lines: Vec<BString> = groups[..i]
                .iter()
                .flat_map(|g| g.side_lines(side))
                .map(BString::from)
                .collect();
            let post_lines: Vec<BString> = groups[i + 1..]
                .iter()
                .flat_map(|g| g.side_lines(side))
                .map(BString::from)
                .collect();
            let change_lines: Vec<BString> = change
                .difflines()
                .iter()
                .map(|l| BString::from(l.text()))
                .collect();

            let reference_line = match side {
                DiffSide::Old => self.old_start,
                DiffSide::New => self.new_start,
            };
            let line_number = reference_line + pre_lines.len() as u32;

            sliders.push(Slider::new(
                change.kind(),
                pre_lines,
                change_lines,
                post_lines,
                line_number,
            ));
        }

        sliders
    }
}

impl Slider {
    /// Assemble a slider from its three line groups.
    ///
    /// # Panics
    ///
    /// Panics if the change is mixed or empty, or if the assembled slider
    /// cannot move in either direction. [`Hunk::sliders`] only constructs
    /// sliders that satisfy all three.
    pub fn new(
        kind: ChangeKind,
        pre_context: Vec<BString>,
        change: Vec<BString>,
        post_context: Vec<BString>,
        line_number: u32,
    ) -> Self {
        assert!(
            matches!(kind, ChangeKind::Addition | ChangeKind::Deletion),
            "a replacement cannot be slid"
        );
        assert!(!change.is_empty(), "empty change group");

        let pre_len = pre_context.len();
        let change_len = change.len();
        let mut lines = pre_context;
        lines.extend(change);
        lines.extend(post_context);

        let shift_range = compute_shift_range(&lines, pre_len, change_len);
        assert!(shift_range.len() > 1, "change is not slidable");

        debug!(
            min = shift_range.min,
            max = shift_range.max(),
            line = line_number,
            "slider"
        );

        Self {
            kind,
            lines,
            pre_len,
            change_len,
            line_number,
            shift_range,
            measurements: HashMap::new(),
        }
    }

    /// The change's prefix: `+` for additions, `-` for deletions.
    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// 1-based line number of the first change line in the selected file.
    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    /// The line number the change would start at after the maximal shift.
    ///
    /// This is the placement the diff backend itself chooses, so it is the
    /// stable coordinate used by slider names.
    pub fn canonical_line_number(&self) -> u32 {
        (i64::from(self.line_number) + i64::from(self.shift_range.max())) as u32
    }

    /// The currently legal shifts.
    pub fn shift_range(&self) -> ShiftRange {
        self.shift_range
    }

    pub fn pre_context(&self) -> &[BString] {
        &self.lines[..self.pre_len]
    }

    pub fn change_lines(&self) -> &[BString] {
        &self.lines[self.pre_len..self.pre_len + self.change_len]
    }

    pub fn post_context(&self) -> &[BString] {
        &self.lines[self.pre_len + self.change_len..]
    }

    /// The line at `index`, counted from the first change line; negative
    /// indices reach into the pre-context.
    pub fn line(&self, index: i32) -> &BStr {
        self.lines[(self.pre_len as i32 + index) as usize].as_bstr()
    }

    /// All lines with their current prefixes, pre-context first.
    pub fn difflines(&self) -> impl Iterator<Item = DiffLine> + '_ {
        self.lines.iter().enumerate().map(move |(i, text)| {
            if i >= self.pre_len && i < self.pre_len + self.change_len {
                match self.kind {
                    ChangeKind::Addition => DiffLine::Addition(text.clone()),
                    ChangeKind::Deletion => DiffLine::Deletion(text.clone()),
                    ChangeKind::Mixed => unreachable!("slider changes are single-sided"),
                }
            } else {
                DiffLine::Context(text.clone())
            }
        })
    }

    /// All lines paired with their index relative to the first change line.
    pub fn indexed_lines(&self) -> impl Iterator<Item = (i32, &BStr)> + '_ {
        let offset = self.pre_len as i32;
        self.lines
            .iter()
            .enumerate()
            .map(move |(i, text)| (i as i32 - offset, text.as_bstr()))
    }

    /// Measurements for the split above the line at `split` (relative to
    /// the first change line). Memoized until the next slide.
    pub fn measure(&mut self, split: i32) -> SplitMeasurements {
        if let Some(&m) = self.measurements.get(&split) {
            return m;
        }
        let index = self.pre_len as i32 + split;
        debug_assert!(index >= 0, "split below the start of the slider");
        let m = SplitMeasurements::measure(&self.lines, index as usize);
        self.measurements.insert(split, m);
        m
    }

    /// Score a single split. Lower is better.
    pub fn score_for_split<S>(&mut self, scorer: &S, split: i32) -> Score
    where
        S: SplitScorer + ?Sized,
    {
        let m = self.measure(split);
        scorer.evaluate(&m)
    }

    /// Score the placement produced by `shift`: the combined badness of the
    /// two splits that would bracket the change.
    pub fn score_for_shift<S>(&mut self, scorer: &S, shift: i32) -> Score
    where
        S: SplitScorer + ?Sized,
    {
        let top_split = shift;
        let bottom_split = shift + self.change_len as i32;
        assert!(-(self.pre_len as i32) <= top_split);
        assert!(bottom_split <= (self.lines.len() - self.pre_len) as i32);

        let top = scorer.evaluate(&self.measure(top_split));
        let bottom_m = self.measure(bottom_split);
        let bottom = scorer.evaluate(&bottom_m);
        scorer.combine(top, bottom, bottom_m.end_of_hunk)
    }

    /// The legal shift with the lowest score; ties go to the largest shift.
    pub fn find_best_shift<S>(&mut self, scorer: &S) -> i32
    where
        S: SplitScorer + ?Sized,
    {
        let range = self.shift_range;
        if range.len() == 1 {
            return range.min;
        }

        let mut best_shift = 0;
        let mut best_score: Option<Score> = None;
        for shift in range.iter() {
            let score = self.score_for_shift(scorer, shift);
            if best_score.map_or(true, |best| score.is_no_worse_than(best)) {
                best_shift = shift;
                best_score = Some(score);
            }
        }
        best_shift
    }

    /// Move the change by `shift` lines, in place.
    ///
    /// Negative shifts move the change up: its trailing lines become
    /// post-context and the same number of pre-context lines join the
    /// change. Positive shifts are symmetric at the other end. Line text
    /// never changes, only the grouping; the shift interval and line number
    /// move along and the measurement cache is dropped.
    ///
    /// # Panics
    ///
    /// Panics when `shift` is outside the legal range.
    pub fn slide(&mut self, shift: i32) {
        if shift == 0 {
            return;
        }
        assert!(
            self.shift_range.contains(shift),
            "shift {shift} outside legal range [{}, {})",
            self.shift_range.min,
            self.shift_range.limit
        );

        let target = (i64::from(self.line_number) + i64::from(shift)) as u32;
        if shift < 0 {
            debug!(by = -shift, from = self.line_number, to = target, "sliding change up");
        } else {
            debug!(by = shift, from = self.line_number, to = target, "sliding change down");
        }

        self.pre_len = (self.pre_len as i32 + shift) as usize;
        self.line_number = target;
        self.shift_range = self.shift_range.shifted_by(-shift);
        self.measurements.clear();
    }

    /// Slide as far down as legal, the placement the diff backend picks by
    /// default. Returns the shift the slider previously had relative to the
    /// canonical one (always <= 0).
    pub fn shift_canonically(&mut self) -> i32 {
        let max_shift = self.shift_range.max();
        self.slide(max_shift);
        -max_shift
    }
}

fn compute_shift_range(lines: &[BString], pre_len: usize, change_len: usize) -> ShiftRange {
    let post_len = lines.len() - pre_len - change_len;

    let mut min = 0i32;
    loop {
        let pre_edge = pre_len as i32 + min - 1;
        let change_edge = pre_len as i32 + change_len as i32 + min - 1;
        if pre_edge >= 0
            && change_len as i32 + min - 1 >= 0
            && lines[pre_edge as usize] == lines[change_edge as usize]
        {
            min -= 1;
        } else {
            break;
        }
    }

    let mut limit = 1i32;
    while limit <= change_len as i32
        && limit <= post_len as i32
        && lines[pre_len + limit as usize - 1] == lines[pre_len + change_len + limit as usize - 1]
    {
        limit += 1;
    }

    ShiftRange { min, limit }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::DefaultSplitScorer;

    fn bstrings(texts: &[&str]) -> Vec<BString> {
        texts.iter().map(|t| BString::from(*t)).collect()
    }

    fn slider(pre: &[&str], change: &[&str], post: &[&str]) -> Slider {
        Slider::new(
            ChangeKind::Addition,
            bstrings(pre),
            bstrings(change),
            bstrings(post),
            1 + pre.len() as u32,
        )
    }

    #[test]
    fn shift_range_extends_both_ways() {
        // pre ends with "x", change is ["x", "x"], post starts with "x":
        // the change can slide one up and one down.
        let s = slider(&["a", "x"], &["x", "x"], &["x", "b"]);
        assert_eq!(s.shift_range(), ShiftRange { min: -1, limit: 2 });
    }

    #[test]
    fn shift_range_is_bounded_by_mismatches() {
        let s = slider(&["a"], &["b"], &["b", "c"]);
        assert_eq!(s.shift_range(), ShiftRange { min: 0, limit: 2 });
        assert!(s.shift_range().contains(0));
        assert!(!s.shift_range().contains(2));
    }

    #[test]
    fn slide_moves_boundaries_not_text() {
        let mut s = slider(&["a"], &["b"], &["b", "c"]);
        let before: Vec<BString> = s.lines.clone();
        s.slide(1);
        assert_eq!(s.lines, before);
        assert_eq!(s.pre_context(), &bstrings(&["a", "b"])[..]);
        assert_eq!(s.change_lines(), &bstrings(&["b"])[..]);
        assert_eq!(s.post_context(), &bstrings(&["c"])[..]);
        assert_eq!(s.line_number(), 3);
        assert_eq!(s.shift_range(), ShiftRange { min: -1, limit: 1 });
    }

    #[test]
    #[should_panic(expected = "outside legal range")]
    fn slide_outside_range_panics() {
        let mut s = slider(&["a"], &["b"], &["b", "c"]);
        s.slide(-1);
    }

    #[test]
    fn canonical_shift_is_idempotent() {
        let mut s = slider(&["a", "x"], &["x", "x"], &["x", "b"]);
        assert_eq!(s.shift_canonically(), -1);
        assert_eq!(s.shift_range(), ShiftRange { min: -2, limit: 1 });
        assert_eq!(s.shift_canonically(), 0);
        assert_eq!(s.shift_range(), ShiftRange { min: -2, limit: 1 });
    }

    #[test]
    fn canonical_line_number_is_shift_invariant() {
        let mut s = slider(&["a", "x"], &["x", "x"], &["x", "b"]);
        let canonical = s.canonical_line_number();
        s.slide(-1);
        assert_eq!(s.canonical_line_number(), canonical);
        s.shift_canonically();
        assert_eq!(s.line_number(), canonical);
    }

    #[test]
    fn prefixes_follow_the_boundaries() {
        let mut s = slider(&["a"], &["b"], &["b", "c"]);
        let rendered: Vec<String> = s.difflines().map(|l| l.to_string()).collect();
        assert_eq!(rendered, vec![" a", "+b", " b", " c"]);
        s.slide(1);
        let rendered: Vec<String> = s.difflines().map(|l| l.to_string()).collect();
        assert_eq!(rendered, vec![" a", " b", "+b", " c"]);
    }

    #[test]
    fn measurement_cache_is_invalidated_by_slide() {
        let mut s = slider(&["a"], &["  b"], &["  b", "c"]);
        let before = s.measure(0);
        s.slide(1);
        let after = s.measure(0);
        // Split 0 now sits one line lower in the hunk, below an indented
        // predecessor instead of "a".
        assert_ne!(before, after);
    }

    #[test]
    #[should_panic(expected = "replacement")]
    fn mixed_change_cannot_become_a_slider() {
        let _ = Slider::new(
            ChangeKind::Mixed,
            bstrings(&["a"]),
            bstrings(&["b"]),
            bstrings(&["b"]),
            2,
        );
    }

    #[test]
    fn constant_scores_pick_the_largest_shift() {
        struct Flat;
        impl SplitScorer for Flat {
            fn scorer_name(&self) -> &'static str {
                "Flat"
            }
            fn arguments(&self) -> Vec<(&'static str, i64)> {
                Vec::new()
            }
            fn evaluate(&self, _m: &SplitMeasurements) -> Score {
                Score::Plain(0)
            }
            fn from_arguments<'a, I>(_args: I) -> Self
            where
                I: IntoIterator<Item = (&'a str, i64)>,
            {
                Flat
            }
        }

        let mut s = slider(&["x", "x"], &["x", "x"], &["x", "x"]);
        assert_eq!(s.shift_range(), ShiftRange { min: -2, limit: 3 });
        assert_eq!(s.find_best_shift(&Flat), 2);
    }

    #[test]
    fn best_shift_with_default_scorer_is_deterministic() {
        let mut s = slider(
            &["def f():", "    return 1", ""],
            &["def g():", "    return 2", ""],
            &["def g():", "    return 2"],
        );
        let best = s.find_best_shift(&DefaultSplitScorer::default());
        assert!(s.shift_range().contains(best));
    }
}
