//! Driver tests against a real git repository.
//!
//! Skipped silently when no `git` binary is on the path.

use std::path::Path;
use std::process::Command;

use slider_core::{ChangeKind, SliderName};
use slider_git::GitDriver;

fn git_available() -> bool {
    Command::new("git")
        .arg("version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn git(repo: &Path, args: &[&str]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["-c", "user.name=test", "-c", "user.email=test@example.com"])
        .args(args)
        .status()
        .expect("git invocation");
    assert!(status.success(), "git {args:?} failed");
}

fn rev_parse(repo: &Path, spec: &str) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["rev-parse", spec])
        .output()
        .expect("git rev-parse");
    assert!(output.status.success());
    String::from_utf8(output.stdout).expect("hex revision").trim().to_string()
}

/// Two commits differing by an appended function block, with the classic
/// placement ambiguity around the separating blank line.
fn fixture() -> Option<(tempfile::TempDir, String, String)> {
    if !git_available() {
        return None;
    }

    let dir = tempfile::tempdir().expect("tempdir");
    let repo = dir.path();
    git(repo, &["init", "-q"]);

    let v1 = "def f():\n    return 1\n\ndef g():\n    return 2\n\n";
    std::fs::write(repo.join("code.py"), v1).expect("write v1");
    git(repo, &["add", "code.py"]);
    git(repo, &["commit", "-q", "-m", "v1"]);
    let c1 = rev_parse(repo, "HEAD");

    let v2 = "def f():\n    return 1\n\ndef g():\n    return 2\n\ndef h():\n    return 3\n\n";
    std::fs::write(repo.join("code.py"), v2).expect("write v2");
    git(repo, &["commit", "-q", "-am", "v2"]);
    let c2 = rev_parse(repo, "HEAD");

    Some((dir, c1, c2))
}

#[test]
fn diff_output_parses_into_sliders() {
    let Some((dir, c1, c2)) = fixture() else {
        return;
    };

    let mut driver = GitDriver::new(dir.path());
    let old = format!("{c1}:code.py");
    let new = format!("{c2}:code.py");
    let input = driver.diff(&old, &new).expect("diff").to_vec();

    let sliders: Vec<_> = slider_core::parse::iter_file_diffs(&input)
        .flat_map(|fd| fd.hunks)
        .flat_map(|hunk| hunk.sliders())
        .collect();
    assert_eq!(sliders.len(), 1);
    assert_eq!(sliders[0].kind(), ChangeKind::Addition);
    // The appended block is blank + def h() + return 3, slidable across
    // the blank separator.
    assert_eq!(sliders[0].shift_range().len(), 2);
}

#[test]
fn resolve_returns_the_canonical_slider() {
    let Some((dir, c1, c2)) = fixture() else {
        return;
    };

    let mut driver = GitDriver::new(dir.path());
    let old = format!("{c1}:code.py");
    let new = format!("{c2}:code.py");
    let input = driver.diff(&old, &new).expect("diff").to_vec();

    let canonical = slider_core::parse::iter_file_diffs(&input)
        .flat_map(|fd| fd.hunks)
        .flat_map(|hunk| hunk.sliders())
        .next()
        .expect("one slider")
        .canonical_line_number();

    let name = SliderName::new(old, new, ChangeKind::Addition, canonical);
    let slider = driver.resolve(&name).expect("resolve");
    assert_eq!(slider.line_number(), canonical);
    // Canonicalized: no shift below remains legal above zero.
    assert_eq!(slider.shift_range().max(), 0);
}

#[test]
fn repeated_diffs_hit_the_cache() {
    let Some((dir, c1, c2)) = fixture() else {
        return;
    };

    let mut driver = GitDriver::new(dir.path());
    let old = format!("{c1}:code.py");
    let new = format!("{c2}:code.py");
    let first = driver.diff(&old, &new).expect("diff").to_vec();
    let second = driver.diff(&old, &new).expect("cached diff").to_vec();
    assert_eq!(first, second);
}

#[test]
fn nonexistent_revision_is_a_git_failure() {
    let Some((dir, _c1, _c2)) = fixture() else {
        return;
    };

    let mut driver = GitDriver::new(dir.path());
    let err = driver.diff("0000000:nope", "0000001:nope").unwrap_err();
    assert!(matches!(err, slider_git::DriverError::GitFailed { .. }));
}
