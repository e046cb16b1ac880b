mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn dcmfind(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dcmfind").unwrap();
    cmd.arg("--directory").arg(dir);
    cmd
}

fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

fn fixture() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    common::three_file_fixture(dir.path());
    let root = dir.path().canonicalize().unwrap();
    (dir, root)
}

// --- search ---

#[test]
fn test_cli_accession_query_finds_one_file() {
    let (_dir, root) = fixture();
    let output = dcmfind(&root)
        .arg("--query")
        .arg(format!("AccessionNumber={}", common::ACCESSION))
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec![root.join("2.dcm").display().to_string()]
    );
}

#[test]
fn test_cli_numeric_tag_and_wildcard() {
    let (_dir, root) = fixture();
    let output = dcmfind(&root)
        .args(["-q", "(0008,0050)=%062117111"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec![root.join("2.dcm").display().to_string()]
    );

    // Both accessions start with CR2022.
    let output = dcmfind(&root)
        .args(["-q", "(0008,0050)=cr2022%"])
        .output()
        .unwrap();
    let mut lines = stdout_lines(&output);
    lines.sort();
    assert_eq!(
        lines,
        vec![
            root.join("1.dcm").display().to_string(),
            root.join("2.dcm").display().to_string()
        ]
    );
}

#[test]
fn test_cli_without_query_lists_every_dicom_file() {
    let (_dir, root) = fixture();
    let output = dcmfind(&root).output().unwrap();
    assert!(output.status.success());
    let mut lines = stdout_lines(&output);
    lines.sort();
    assert_eq!(
        lines,
        vec![
            root.join("1.dcm").display().to_string(),
            root.join("2.dcm").display().to_string()
        ]
    );
}

#[test]
fn test_cli_presence_query() {
    let (_dir, root) = fixture();
    let output = dcmfind(&root).args(["-q", "PatientName"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output).len(), 2);
}

#[test]
fn test_cli_and_of_queries() {
    let (_dir, root) = fixture();
    let output = dcmfind(&root)
        .args(["-q", "PatientName", "-q", "StudyDate<20210101"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec![root.join("1.dcm").display().to_string()]
    );
}

#[test]
fn test_cli_limit() {
    let (_dir, root) = fixture();
    let output = dcmfind(&root).args(["--limit", "1"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output).len(), 1);
}

#[test]
fn test_cli_no_match_is_success_with_empty_output() {
    let (_dir, root) = fixture();
    dcmfind(&root)
        .args(["-q", "AccessionNumber=nothing"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_cli_non_recursive() {
    let (_dir, root) = fixture();
    let nested = root.join("nested");
    std::fs::create_dir(&nested).unwrap();
    common::write_dicom(&nested.join("3.dcm"), "1.2.3.4.5.3", "N1", "20230101", 64);

    let output = dcmfind(&root).args(["-q", "AccessionNumber=N1"]).output().unwrap();
    assert_eq!(
        stdout_lines(&output),
        vec![nested.join("3.dcm").display().to_string()]
    );
    dcmfind(&root)
        .args(["-q", "AccessionNumber=N1", "--recursive", "false"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

// --- settings file ---

#[test]
fn test_cli_settings_file_pattern_and_override() {
    let (_dir, root) = fixture();
    std::fs::write(
        root.join(".dcmfind.toml"),
        "[settings]\nfile_pattern = \"1.*\"\n",
    )
    .unwrap();

    let output = dcmfind(&root).output().unwrap();
    assert_eq!(
        stdout_lines(&output),
        vec![root.join("1.dcm").display().to_string()]
    );

    let output = dcmfind(&root).args(["-f", "2.DCM"]).output().unwrap();
    assert_eq!(
        stdout_lines(&output),
        vec![root.join("2.dcm").display().to_string()]
    );
}

#[test]
fn test_cli_malformed_settings_file_is_ignored() {
    let (_dir, root) = fixture();
    std::fs::write(root.join(".dcmfind.toml"), "[settings\n").unwrap();
    let output = dcmfind(&root).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output).len(), 2);
}

// --- validation ---

#[test]
fn test_cli_rejects_unknown_operator() {
    let (_dir, root) = fixture();
    dcmfind(&root)
        .args(["-q", "AccessionNumber~x"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_cli_rejects_unknown_tag() {
    let (_dir, root) = fixture();
    dcmfind(&root)
        .args(["-q", "NotARealKeyword=1"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_cli_rejects_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    dcmfind(&dir.path().join("missing"))
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_cli_rejects_empty_pattern() {
    let (_dir, root) = fixture();
    dcmfind(&root)
        .args(["--file-pattern", ""])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_cli_rejects_zero_limit() {
    let (_dir, root) = fixture();
    dcmfind(&root)
        .args(["--limit", "0"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}
