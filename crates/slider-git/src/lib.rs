//! Git driver for slider optimization.
//!
//! Runs `git diff` with a pinned myers configuration and a wide context
//! radius, and resolves [`SliderName`]s back to canonically shifted
//! [`Slider`]s. The core stays free of process invocation; everything that
//! touches a repository lives here.

use std::path::{Path, PathBuf};
use std::process::Command;

use bstr::ByteSlice;
use tracing::debug;

use slider_core::parse::iter_hunks;
use slider_core::{ChangeKind, ParseError, Slider, SliderName};

/// Context radius requested from the diff backend. Sliders score splits up
/// to one change-length away from the original placement, so generous
/// context keeps the interesting neighborhood inside the hunk.
const CONTEXT_LINES: u32 = 10;

/// Errors from driving git or resolving sliders.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {status}: {stderr}")]
    GitFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("spec {0:?} is not of the form object:filename")]
    BadSpec(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Runs the version-control tool and memoizes the most recent diff.
///
/// The same `(old, new)` pair is frequently requested back to back when
/// several sliders live in one blob pair; caching one entry matches that
/// access pattern without growing unboundedly.
#[derive(Debug)]
pub struct GitDriver {
    repo: PathBuf,
    last_diff: Option<((String, String), Vec<u8>)>,
}

impl GitDriver {
    /// A driver rooted at the given repository path.
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            last_diff: None,
        }
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    /// The unified diff between two revision specs, as raw bytes.
    ///
    /// Pins `diff.algorithm=myers` and asks for [`CONTEXT_LINES`] lines of
    /// context so output stays stable across git configurations.
    pub fn diff(&mut self, old: &str, new: &str) -> Result<&[u8], DriverError> {
        let key = (old.to_string(), new.to_string());
        if self.last_diff.as_ref().map(|(k, _)| k) != Some(&key) {
            let output = self.run_diff(old, new)?;
            self.last_diff = Some((key, output));
        }
        Ok(self
            .last_diff
            .as_ref()
            .map(|(_, out)| out.as_slice())
            .expect("cache was just filled"))
    }

    fn run_diff(&self, old: &str, new: &str) -> Result<Vec<u8>, DriverError> {
        let mut command = Command::new("git");
        command
            .arg("-c")
            .arg("diff.algorithm=myers")
            .arg("-C")
            .arg(&self.repo)
            .arg("diff")
            .arg(format!("-U{CONTEXT_LINES}"))
            .arg(old)
            .arg(new)
            .arg("--");
        debug!(?command, "running diff backend");

        let describe = || format!("git diff {old} {new}");
        let output = command.output().map_err(|source| DriverError::Spawn {
            command: describe(),
            source,
        })?;
        if !output.status.success() {
            return Err(DriverError::GitFailed {
                command: describe(),
                status: output.status,
                stderr: output.stderr.as_bstr().to_string(),
            });
        }
        Ok(output.stdout)
    }

    /// Recompute the slider a name refers to and shift it canonically.
    pub fn resolve(&mut self, name: &SliderName) -> Result<Slider, DriverError> {
        let (old_object, old_filename) = split_spec(&name.old)?;
        let (new_object, new_filename) = split_spec(&name.new)?;

        let old_spec = format!("{old_object}:{old_filename}");
        let new_spec = format!("{new_object}:{new_filename}");
        let input = self.diff(&old_spec, &new_spec)?;

        let mut slider = find_slider(input, name.prefix, name.line_number)?;
        slider.shift_canonically();
        Ok(slider)
    }
}

/// Split an `object:filename` spec at the first colon.
fn split_spec(spec: &str) -> Result<(&str, &str), DriverError> {
    spec.split_once(':')
        .ok_or_else(|| DriverError::BadSpec(spec.to_string()))
}

/// Locate a slider by prefix and canonical line number in raw diff output.
///
/// The line number is canonical (the placement after the maximal shift);
/// the returned slider keeps whatever placement the diff emitted.
pub fn find_slider(
    input: &[u8],
    prefix: ChangeKind,
    line_number: u32,
) -> Result<Slider, DriverError> {
    for hunk in iter_hunks(input) {
        for slider in hunk.sliders() {
            if slider.kind() == prefix && slider.canonical_line_number() == line_number {
                return Ok(slider);
            }
        }
    }
    Err(ParseError::SliderNotFound.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIFF: &str = "\
diff --git a/f b/f
index 1111111..2222222 100644
--- a/f
+++ b/f
@@ -1,4 +1,5 @@
 r
 r
+r
 r
 r
";

    #[test]
    fn finds_a_slider_by_canonical_position() {
        // The addition parses at line 3 but can slide down one more line.
        let slider = find_slider(DIFF.as_bytes(), ChangeKind::Addition, 4).unwrap();
        assert_eq!(slider.line_number(), 3);
        assert_eq!(slider.canonical_line_number(), 4);
    }

    #[test]
    fn missing_slider_is_an_error() {
        let err = find_slider(DIFF.as_bytes(), ChangeKind::Deletion, 4).unwrap_err();
        assert!(matches!(err, DriverError::Parse(ParseError::SliderNotFound)));

        let err = find_slider(DIFF.as_bytes(), ChangeKind::Addition, 3).unwrap_err();
        assert!(matches!(err, DriverError::Parse(ParseError::SliderNotFound)));
    }

    #[test]
    fn split_spec_requires_a_colon() {
        assert_eq!(split_spec("abc123:path/to/f").unwrap(), ("abc123", "path/to/f"));
        assert_eq!(
            split_spec("abc:with:colons").unwrap(),
            ("abc", "with:colons")
        );
        assert!(matches!(split_spec("nocolon"), Err(DriverError::BadSpec(_))));
    }
}
