//! Hunk header and body parsing.

use std::sync::OnceLock;

use bstr::{BStr, BString, ByteSlice};
use regex::bytes::Regex;

use crate::{Change, DiffLine, Group, Hunk, ParseError};

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").unwrap()
    })
}

fn capture_u32(captures: &regex::bytes::Captures<'_>, index: usize) -> Option<u32> {
    captures
        .get(index)
        .and_then(|m| m.as_bytes().to_str().ok()?.parse().ok())
}

/// Parse one hunk: the `@@` header line followed by its body lines.
///
/// `\` continuation markers ("No newline at end of file") are dropped. The
/// body is segmented into strictly alternating context/change groups with a
/// leading and trailing context group, either possibly empty.
pub fn parse_hunk(lines: &[&BStr]) -> Result<Hunk, ParseError> {
    let header = lines.first().copied().unwrap_or_default();
    let captures = header_regex()
        .captures(header)
        .ok_or_else(|| ParseError::BadHunkHeader(header.into()))?;

    // The counts passed the \d+ pattern, so conversion cannot fail; the
    // error covers a count too large for u32.
    let old_start =
        capture_u32(&captures, 1).ok_or_else(|| ParseError::BadHunkHeader(header.into()))?;
    let old_len = match captures.get(2) {
        Some(_) => {
            Some(capture_u32(&captures, 2).ok_or_else(|| ParseError::BadHunkHeader(header.into()))?)
        }
        None => None,
    };
    let new_start =
        capture_u32(&captures, 3).ok_or_else(|| ParseError::BadHunkHeader(header.into()))?;
    let new_len = match captures.get(4) {
        Some(_) => {
            Some(capture_u32(&captures, 4).ok_or_else(|| ParseError::BadHunkHeader(header.into()))?)
        }
        None => None,
    };

    let mut difflines = Vec::with_capacity(lines.len().saturating_sub(1));
    for &line in &lines[1..] {
        match parse_diffline(line)? {
            Some(diffline) => difflines.push(diffline),
            None => continue,
        }
    }

    Ok(Hunk {
        old_start,
        old_len,
        new_start,
        new_len,
        groups: split_groups(difflines),
    })
}

/// Parse a hunk body line, or `None` for a dropped `\` marker line.
fn parse_diffline(line: &BStr) -> Result<Option<DiffLine>, ParseError> {
    let (&prefix, text) = line.split_first().ok_or(ParseError::EmptyDiffLine)?;
    let text = BString::from(text);
    match prefix {
        b' ' => Ok(Some(DiffLine::Context(text))),
        b'+' => Ok(Some(DiffLine::Addition(text))),
        b'-' => Ok(Some(DiffLine::Deletion(text))),
        b'\\' => Ok(None),
        _ => Err(ParseError::BadLinePrefix(line.into())),
    }
}

/// Segment body lines into context, change, context, ..., context.
fn split_groups(difflines: Vec<DiffLine>) -> Vec<Group> {
    let mut groups = Vec::new();
    let mut run: Vec<DiffLine> = Vec::new();
    let mut in_change = false;

    for diffline in difflines {
        let is_change_line = !diffline.is_context();
        if is_change_line != in_change {
            let finished = std::mem::take(&mut run);
            groups.push(if in_change {
                Group::Change(Change::new(finished))
            } else {
                Group::Context(finished)
            });
            in_change = is_change_line;
        }
        run.push(diffline);
    }

    if in_change {
        groups.push(Group::Change(Change::new(run)));
        run = Vec::new();
    }
    groups.push(Group::Context(run));

    groups
}
