//! Unified-diff parsing.
//!
//! Line-oriented and tolerant in the way the surrounding tooling expects:
//! an unparseable file section or hunk is logged and skipped, and the
//! iteration over file sections keeps going.

mod file;
mod hunk;

pub use file::{iter_file_diffs, iter_hunks, parse_file_diff, FileDiffs};
pub use hunk::parse_hunk;

use bstr::{BStr, ByteSlice};

/// Split raw diff output into newline-stripped lines.
///
/// A trailing newline does not produce a final empty line.
pub fn split_lines(input: &[u8]) -> Vec<&BStr> {
    let input = input.strip_suffix(b"\n").unwrap_or(input);
    if input.is_empty() {
        return Vec::new();
    }
    input.split(|&b| b == b'\n').map(ByteSlice::as_bstr).collect()
}
