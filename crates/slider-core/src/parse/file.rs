//! File-section envelope parsing.
//!
//! Recognizes the lines around hunks: `diff …`, optional `similarity` /
//! `rename` / `new` / `deleted`, the `index` line carrying the blob ids,
//! `Binary files …`, and the `---` / `+++` filename pair.

use std::sync::OnceLock;

use bstr::{BStr, BString, ByteSlice};
use regex::bytes::Regex;
use tracing::{debug, warn};

use super::hunk::parse_hunk;
use crate::{FileDiff, Hunk, ParseError};

fn index_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^index ([0-9a-f]+)\.\.([0-9a-f]+) [0-7]+$").unwrap())
}

fn old_file_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^--- (?:/dev/null|a/(.*))$").unwrap())
}

fn new_file_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+\+\+ (?:/dev/null|b/(.*))$").unwrap())
}

/// Whether a filename can be passed to a POSIX shell without quoting, i.e.
/// it equals its own quoted form.
fn is_shell_safe(name: &BStr) -> bool {
    !name.is_empty()
        && name
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || b"@%+=:,./-_".contains(&b))
}

/// Extract the filename from a `---` or `+++` line; `None` for `/dev/null`.
fn parse_filename(re: &Regex, line: &BStr) -> Result<Option<BString>, ParseError> {
    let captures = re
        .captures(line)
        .ok_or_else(|| ParseError::BadFilenameLine(line.into()))?;
    match captures.get(1) {
        Some(m) => {
            let name = BString::from(m.as_bytes());
            if !is_shell_safe(name.as_bstr()) {
                return Err(ParseError::UnsafeFilename(name));
            }
            Ok(Some(name))
        }
        None => Ok(None),
    }
}

/// Parse one file section of a unified diff.
///
/// The section must contain a `diff …` line; everything before it is
/// skipped. Sections that stop short of an `index` line (mode-only changes,
/// unparseable tails) yield a [`FileDiff`] without blob ids or hunks, as do
/// binary files. A malformed hunk is logged and skipped without failing the
/// section.
pub fn parse_file_diff(lines: &[&BStr]) -> Result<FileDiff, ParseError> {
    let mut i = lines
        .iter()
        .position(|line| line.starts_with(b"diff "))
        .ok_or(ParseError::MissingDiffHeader)?;
    debug!(header = %lines[i], "file section start");
    i += 1;

    if i < lines.len() && lines[i].starts_with(b"similarity ") {
        i += 1;
        while i < lines.len() && lines[i].starts_with(b"rename ") {
            i += 1;
        }
    }

    if i < lines.len()
        && (lines[i].starts_with(b"new ") || lines[i].starts_with(b"deleted "))
    {
        i += 1;
    }

    let mut file_diff = FileDiff {
        old_sha1: None,
        new_sha1: None,
        old_filename: None,
        new_filename: None,
        hunks: Vec::new(),
    };

    let Some(&index_line) = lines.get(i) else {
        return Ok(file_diff);
    };
    i += 1;
    let Some(captures) = index_regex().captures(index_line) else {
        return Ok(file_diff);
    };

    // [0-9a-f]+ is valid UTF-8.
    file_diff.old_sha1 = Some(
        captures
            .get(1)
            .expect("group 1 always present")
            .as_bytes()
            .to_str()
            .expect("hex digits")
            .to_string(),
    );
    file_diff.new_sha1 = Some(
        captures
            .get(2)
            .expect("group 2 always present")
            .as_bytes()
            .to_str()
            .expect("hex digits")
            .to_string(),
    );

    if i < lines.len() && lines[i].starts_with(b"Binary files ") {
        return Ok(file_diff);
    }

    let old_line = lines.get(i).copied().unwrap_or_default();
    file_diff.old_filename = parse_filename(old_file_regex(), old_line)?;
    i += 1;

    let new_line = lines.get(i).copied().unwrap_or_default();
    file_diff.new_filename = parse_filename(new_file_regex(), new_line)?;
    i += 1;

    while i < lines.len() {
        if !lines[i].starts_with(b"@@ ") {
            return Err(ParseError::ExpectedHunkHeader(lines[i].into()));
        }
        let start = i;
        i += 1;
        while i < lines.len() && !lines[i].starts_with(b"@@ ") {
            i += 1;
        }

        match parse_hunk(&lines[start..i]) {
            Ok(hunk) => file_diff.hunks.push(hunk),
            Err(err) => warn!(%err, "skipping unparseable hunk"),
        }
    }

    Ok(file_diff)
}

/// Lazy iteration over the file sections of a diff stream.
///
/// Each section runs from a `diff …` line to the next. A section that fails
/// to parse is logged and skipped; iteration continues with the next one.
pub struct FileDiffs<'a> {
    lines: Vec<&'a BStr>,
    pos: usize,
}

impl<'a> FileDiffs<'a> {
    fn new(lines: Vec<&'a BStr>) -> Self {
        let pos = lines
            .iter()
            .position(|line| line.starts_with(b"diff "))
            .unwrap_or(lines.len());
        Self { lines, pos }
    }
}

impl Iterator for FileDiffs<'_> {
    type Item = FileDiff;

    fn next(&mut self) -> Option<FileDiff> {
        while self.pos < self.lines.len() {
            let start = self.pos;
            self.pos += 1;
            while self.pos < self.lines.len() && !self.lines[self.pos].starts_with(b"diff ") {
                self.pos += 1;
            }

            match parse_file_diff(&self.lines[start..self.pos]) {
                Ok(file_diff) => return Some(file_diff),
                Err(err) => warn!(%err, "skipping unparseable file section"),
            }
        }
        None
    }
}

/// Iterate over the file sections of raw diff output.
pub fn iter_file_diffs(input: &[u8]) -> FileDiffs<'_> {
    FileDiffs::new(super::split_lines(input))
}

/// All hunks of a diff stream, flattened across its file sections.
pub fn iter_hunks(input: &[u8]) -> impl Iterator<Item = Hunk> + '_ {
    iter_file_diffs(input).flat_map(|file_diff| file_diff.hunks)
}
