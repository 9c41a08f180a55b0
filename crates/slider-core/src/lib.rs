//! Hunk-placement heuristics for unified diffs.
//!
//! When a diff algorithm emits a run of added (or deleted) lines whose
//! boundary lines repeat in the surrounding context, the run can be shifted
//! vertically without changing what the patch applies to. This crate parses
//! unified diffs, identifies those slidable runs ([`Slider`]), and scores the
//! candidate placements so a driver can pick the most readable one.
//!
//! The scoring is purely structural: indentation and blank lines around the
//! two splits that bracket a change. Three scorer generations are provided;
//! [`score::SplitScorer3`] is the default.

pub mod measure;
pub mod name;
pub mod parse;
pub mod score;
pub mod slider;

mod error;

pub use bstr::{BStr, BString, ByteSlice};

pub use error::ParseError;
pub use name::{ShiftRecord, SliderName};
pub use slider::{ShiftRange, Slider};

/// A single line in a hunk body, without its trailing newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    /// Unchanged context line (` ` prefix).
    Context(BString),
    /// Added line (`+` prefix).
    Addition(BString),
    /// Deleted line (`-` prefix).
    Deletion(BString),
}

impl DiffLine {
    /// The line text, prefix stripped.
    pub fn text(&self) -> &BStr {
        match self {
            Self::Context(t) | Self::Addition(t) | Self::Deletion(t) => t.as_bstr(),
        }
    }

    /// The one-character prefix this line carries in a unified diff.
    pub fn prefix(&self) -> char {
        match self {
            Self::Context(_) => ' ',
            Self::Addition(_) => '+',
            Self::Deletion(_) => '-',
        }
    }

    /// True for context lines.
    pub fn is_context(&self) -> bool {
        matches!(self, Self::Context(_))
    }
}

impl std::fmt::Display for DiffLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.prefix(), self.text())
    }
}

/// Which side of the diff a line sequence is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSide {
    /// The pre-image: context plus deletions.
    Old,
    /// The post-image: context plus additions.
    New,
}

/// Composite prefix of a change group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Only `+` lines.
    Addition,
    /// Only `-` lines.
    Deletion,
    /// Both kinds adjacent: a replacement, never slidable.
    Mixed,
}

impl ChangeKind {
    /// Single-character form (`+`, `-`, `?`).
    pub fn as_char(&self) -> char {
        match self {
            Self::Addition => '+',
            Self::Deletion => '-',
            Self::Mixed => '?',
        }
    }

    /// The side a single-sided change contributes its lines to.
    ///
    /// # Panics
    ///
    /// Panics for [`ChangeKind::Mixed`]; mixed changes contribute to both.
    pub fn side(&self) -> DiffSide {
        match self {
            Self::Addition => DiffSide::New,
            Self::Deletion => DiffSide::Old,
            Self::Mixed => panic!("mixed change has no single side"),
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A maximal run of non-context lines in a hunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    kind: ChangeKind,
    difflines: Vec<DiffLine>,
}

impl Change {
    /// Build a change from its lines, deriving the composite prefix.
    ///
    /// # Panics
    ///
    /// Panics on an empty line list or one containing context lines; the
    /// parser never produces either.
    pub fn new(difflines: Vec<DiffLine>) -> Self {
        assert!(!difflines.is_empty(), "empty change group");
        let mut deletes = false;
        let mut adds = false;
        for line in &difflines {
            match line {
                DiffLine::Deletion(_) => deletes = true,
                DiffLine::Addition(_) => adds = true,
                DiffLine::Context(_) => panic!("context line inside a change group"),
            }
        }
        let kind = match (deletes, adds) {
            (true, true) => ChangeKind::Mixed,
            (true, false) => ChangeKind::Deletion,
            (false, true) => ChangeKind::Addition,
            (false, false) => unreachable!(),
        };
        Self { kind, difflines }
    }

    /// The composite prefix of this change.
    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// All lines of the change, in hunk order.
    pub fn difflines(&self) -> &[DiffLine] {
        &self.difflines
    }

    pub fn len(&self) -> usize {
        self.difflines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.difflines.is_empty()
    }
}

/// A run of hunk lines sharing the context/change classification.
///
/// Within a hunk, groups strictly alternate context, change, context, ...;
/// the first and last group are always context, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Group {
    Context(Vec<DiffLine>),
    Change(Change),
}

impl Group {
    /// Lines of this group as seen from one side of the diff.
    ///
    /// Context lines appear on both sides; a change contributes deletions to
    /// the old side and additions to the new side only.
    pub fn side_lines(&self, side: DiffSide) -> impl Iterator<Item = &BStr> + '_ {
        let difflines = match self {
            Self::Context(lines) => lines.as_slice(),
            Self::Change(change) => change.difflines(),
        };
        difflines.iter().filter_map(move |line| match (line, side) {
            (DiffLine::Context(t), _) => Some(t.as_bstr()),
            (DiffLine::Deletion(t), DiffSide::Old) => Some(t.as_bstr()),
            (DiffLine::Addition(t), DiffSide::New) => Some(t.as_bstr()),
            _ => None,
        })
    }

    /// All lines regardless of side.
    pub fn difflines(&self) -> &[DiffLine] {
        match self {
            Self::Context(lines) => lines,
            Self::Change(change) => change.difflines(),
        }
    }

    pub fn len(&self) -> usize {
        self.difflines().len()
    }

    pub fn is_empty(&self) -> bool {
        self.difflines().is_empty()
    }
}

/// A contiguous `@@ … @@` section of a unified diff.
///
/// Immutable after parsing; sliders copy the side they operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// 1-based first line in the old file.
    pub old_start: u32,
    /// Line count in the old file; absent when the header omits it.
    pub old_len: Option<u32>,
    /// 1-based first line in the new file.
    pub new_start: u32,
    /// Line count in the new file; absent when the header omits it.
    pub new_len: Option<u32>,
    groups: Vec<Group>,
}

impl Hunk {
    /// The alternating context/change groups of the body.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Old-side text of the hunk, in order.
    pub fn old_lines(&self) -> impl Iterator<Item = &BStr> + '_ {
        self.groups.iter().flat_map(|g| g.side_lines(DiffSide::Old))
    }

    /// New-side text of the hunk, in order.
    pub fn new_lines(&self) -> impl Iterator<Item = &BStr> + '_ {
        self.groups.iter().flat_map(|g| g.side_lines(DiffSide::New))
    }
}

/// One file section of a unified diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// Pre-image blob id from the `index` line.
    pub old_sha1: Option<String>,
    /// Post-image blob id from the `index` line.
    pub new_sha1: Option<String>,
    /// Path after the `a/` prefix; `None` for `/dev/null`.
    pub old_filename: Option<BString>,
    /// Path after the `b/` prefix; `None` for `/dev/null`.
    pub new_filename: Option<BString>,
    /// Parsed hunks; empty for binary files and bare envelopes.
    pub hunks: Vec<Hunk>,
}
