//! End-to-end tests driving the `dtsvert` binary with a stand-in `sox`.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Write an executable script which answers `--version`, records every
/// other invocation to `calls.log`, reports progress on stdout, and exits with
/// `status`.
fn fake_sox(dir: &Path, status: i32) -> PathBuf {
    let log = dir.join("calls.log");
    let script = dir.join("fake-sox");

    let body = format!(
        "#!/bin/sh\n\
         if [ \"$1\" = \"--version\" ]; then echo 'sox:      SoX v14.4.2'; exit 0; fi\n\
         echo \"$@\" >> '{}'\n\
         echo \"In:100.00% Output written to $2\"\n\
         if [ {status} -ne 0 ]; then echo \"sox FAIL formats: can't open input file\" >&2; fi\n\
         exit {status}\n",
        log.display()
    );

    fs::write(&script, body).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}

fn calls(dir: &Path) -> Vec<String> {
    match fs::read_to_string(dir.join("calls.log")) {
        Ok(log) => log.lines().map(str::to_owned).collect(),
        Err(..) => Vec::new(),
    }
}

fn dtsvert(dir: &Path, sox: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dtsvert").unwrap();
    cmd.current_dir(dir).arg("--sox").arg(sox);
    cmd
}

#[test]
fn converts_single_file() {
    let temp = TempDir::new().unwrap();
    let sox = fake_sox(temp.path(), 0);
    fs::write(temp.path().join("track.wav"), b"RIFF").unwrap();

    dtsvert(temp.path(), &sox)
        .arg("track.wav")
        .assert()
        .success()
        .stdout(predicate::str::contains("Done: track_DTS.wav"))
        .stdout(predicate::str::contains("Conversion complete!"));

    assert_eq!(calls(temp.path()), [
        "track.wav track_DTS.wav remix 1 2 1 2"
    ]);
}

#[test]
fn expands_patterns_itself() {
    let temp = TempDir::new().unwrap();
    let sox = fake_sox(temp.path(), 0);

    for name in ["b.flac", "a.wav", "c.WV", "notes.txt"] {
        fs::write(temp.path().join(name), b"").unwrap();
    }

    dtsvert(temp.path(), &sox)
        .args(["*.wav", "*.flac", "*.WV", "*.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Skipping unsupported file type: notes.txt",
        ));

    assert_eq!(calls(temp.path()), [
        "a.wav a_DTS.wav remix 1 2 1 2",
        "b.flac b_DTS.flac remix 1 2 1 2",
        "c.WV c_DTS.wv remix 1 2 1 2",
    ]);
}

#[test]
fn tool_output_is_passed_through() {
    let temp = TempDir::new().unwrap();
    let sox = fake_sox(temp.path(), 0);
    fs::write(temp.path().join("take.flac"), b"").unwrap();

    dtsvert(temp.path(), &sox)
        .arg("take.flac")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "In:100.00% Output written to take_DTS.flac",
        ))
        .stdout(predicate::str::contains("Done: take_DTS.flac"));
}

#[test]
fn skips_unsupported_file() {
    let temp = TempDir::new().unwrap();
    let sox = fake_sox(temp.path(), 0);
    fs::write(temp.path().join("notes.txt"), b"").unwrap();

    dtsvert(temp.path(), &sox)
        .arg("notes.txt")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Skipping unsupported file type: notes.txt",
        ));

    assert!(calls(temp.path()).is_empty());
}

#[test]
fn failed_conversion_keeps_going() {
    let temp = TempDir::new().unwrap();
    let sox = fake_sox(temp.path(), 2);
    fs::write(temp.path().join("a.wav"), b"").unwrap();
    fs::write(temp.path().join("b.wav"), b"").unwrap();

    dtsvert(temp.path(), &sox)
        .arg("*.wav")
        .assert()
        .success()
        .stdout(predicate::str::contains("Error during conversion of a.wav"))
        .stdout(predicate::str::contains("can't open input file"))
        .stdout(predicate::str::contains("Error during conversion of b.wav"))
        .stdout(predicate::str::contains("Conversion complete!"));

    assert_eq!(calls(temp.path()).len(), 2);
}

#[test]
fn no_matching_files() {
    let temp = TempDir::new().unwrap();
    let sox = fake_sox(temp.path(), 0);

    dtsvert(temp.path(), &sox)
        .arg("*.xyz")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No files matched for pattern: *.xyz"))
        .stdout(predicate::str::contains("No files to process"));
}

#[test]
fn usage_without_arguments() {
    let temp = TempDir::new().unwrap();
    let sox = fake_sox(temp.path(), 0);

    dtsvert(temp.path(), &sox)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Supports: WAV, FLAC"));
}

#[test]
fn missing_sox() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("track.wav"), b"").unwrap();

    dtsvert(temp.path(), &temp.path().join("no-such-sox"))
        .arg("*.wav")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("SoX is not installed"))
        .stdout(predicate::str::contains("No files matched").not());
}

#[test]
fn dry_run_leaves_files_alone() {
    let temp = TempDir::new().unwrap();
    let sox = fake_sox(temp.path(), 0);
    fs::write(temp.path().join("track.ogg"), b"").unwrap();

    dtsvert(temp.path(), &sox)
        .args(["--dry-run", "track.ogg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<sox> <from> <to> remix 1 2 1 2"));

    assert!(calls(temp.path()).is_empty());
}
