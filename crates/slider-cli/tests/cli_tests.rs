//! Black-box tests of the `diff-slider` binary.

use std::path::Path;
use std::process::{Command, Output};

const FIXTURE: &str = "\
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

fn diff_slider(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_diff-slider"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("run diff-slider")
}

fn write_fixture(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("fixture.diff");
    std::fs::write(&path, FIXTURE).expect("write fixture");
    path
}

#[test]
fn scan_prints_canonical_records() {
    let dir = tempfile::tempdir().unwrap();
    let diff = write_fixture(dir.path());

    let out = diff_slider(&["scan", "--diff", diff.to_str().unwrap()], dir.path());
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "1111111:f 2222222:f + 4\n"
    );
}

#[test]
fn scan_best_appends_the_optimal_shift() {
    let dir = tempfile::tempdir().unwrap();
    let diff = write_fixture(dir.path());

    let out = diff_slider(
        &["scan", "--best", "--diff", diff.to_str().unwrap()],
        dir.path(),
    );
    assert!(out.status.success());
    // Uniform lines score alike everywhere, so the canonical placement
    // stands: shift 0.
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "1111111:f 2222222:f + 4 0\n"
    );
}

#[test]
fn scan_accepts_an_explicit_scorer_spec() {
    let dir = tempfile::tempdir().unwrap();
    let diff = write_fixture(dir.path());

    let out = diff_slider(
        &[
            "scan",
            "--best",
            "--scorer",
            "SplitScorer1(end_of_hunk_bonus=20)",
            "--diff",
            diff.to_str().unwrap(),
        ],
        dir.path(),
    );
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("1111111:f 2222222:f + 4 "));
}

#[test]
fn bad_scorer_spec_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let diff = write_fixture(dir.path());

    let out = diff_slider(
        &["scan", "--scorer", "bogus", "--diff", diff.to_str().unwrap()],
        dir.path(),
    );
    assert_eq!(out.status.code(), Some(128));
    assert!(String::from_utf8_lossy(&out.stderr).contains("fatal:"));
}

#[test]
fn scan_skips_binary_and_broken_sections() {
    let dir = tempfile::tempdir().unwrap();
    let diff = dir.path().join("mixed.diff");
    let content = format!(
        "diff --git a/b.bin b/b.bin\nindex 1234567..89abcde 100644\nBinary files a/b.bin and b/b.bin differ\n{FIXTURE}"
    );
    std::fs::write(&diff, content).unwrap();

    let out = diff_slider(&["scan", "--diff", diff.to_str().unwrap()], dir.path());
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "1111111:f 2222222:f + 4\n"
    );
}
