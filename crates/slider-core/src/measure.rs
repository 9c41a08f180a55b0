//! Structural measurements at a candidate split.
//!
//! A split is a position between two lines: split `j` lies between
//! `lines[j - 1]` and `lines[j]`. Scorers never look at line contents
//! directly; everything they need is captured here.

use bstr::BStr;

/// Indentation of a line in columns, or `None` if the line is blank.
///
/// Trailing whitespace is ignored. A space advances one column, a tab
/// advances to the next multiple of 8.
pub fn indent_of(line: &BStr) -> Option<u32> {
    let bytes: &[u8] = line.as_ref();
    let trimmed_len = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map(|i| i + 1)?;

    let mut indent = 0u32;
    for &b in &bytes[..trimmed_len] {
        match b {
            b' ' => indent += 1,
            b'\t' => indent += 8 - indent % 8,
            _ => break,
        }
    }
    Some(indent)
}

/// The structural features of a split, all pure functions of the line array
/// and the split index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMeasurements {
    /// The split is at or past the end of the line array.
    pub end_of_hunk: bool,

    /// Indent of the line immediately after the split, or `None` if that
    /// line is blank (or absent).
    pub indent: Option<u32>,

    /// Number of consecutive blank lines immediately above the split.
    pub pre_blank: u32,

    /// Indent of the nearest non-blank line above those blanks, or `None`
    /// if no such line exists.
    pub pre_indent: Option<u32>,

    /// Number of consecutive blank lines after the line following the
    /// split (that line itself not counted).
    pub post_blank: u32,

    /// Indent of the nearest non-blank line below those, or `None` if no
    /// such line exists.
    pub post_indent: Option<u32>,
}

impl SplitMeasurements {
    /// Measure the split before `lines[index]`.
    pub fn measure<L: AsRef<BStr>>(lines: &[L], index: usize) -> Self {
        let mut m = Self {
            end_of_hunk: false,
            indent: None,
            pre_blank: 0,
            pre_indent: None,
            post_blank: 0,
            post_indent: None,
        };

        match lines.get(index) {
            Some(line) => m.indent = indent_of(line.as_ref()),
            None => m.end_of_hunk = true,
        }

        for line in lines[..index.min(lines.len())].iter().rev() {
            m.pre_indent = indent_of(line.as_ref());
            if m.pre_indent.is_some() {
                break;
            }
            m.pre_blank += 1;
        }

        if index < lines.len() {
            for line in &lines[index + 1..] {
                m.post_indent = indent_of(line.as_ref());
                if m.post_indent.is_some() {
                    break;
                }
                m.post_blank += 1;
            }
        }

        m
    }
}
