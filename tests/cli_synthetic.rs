//! Fixture-driven CLI synthetic tests.
//!
//! Each case under `tests/fixtures/synthetic/<case>/` provides:
//! - `input/`    initial project tree copied to a temp directory
//! - `scenario.toml` command list and command-level assertions
//! - `expected/` expected final project tree after executing scenario

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(rename = "command")]
    commands: Vec<CommandSpec>,
}

#[derive(Debug, Deserialize)]
struct CommandSpec {
    args: Vec<String>,
    #[serde(default)]
    expect_exit: i32,
    #[serde(default)]
    stdout_contains: Vec<String>,
    #[serde(default)]
    stdout_not_contains: Vec<String>,
    #[serde(default)]
    stderr_contains: Vec<String>,
}

#[test]
fn test_synthetic_fixtures() {
    let root = Path::new("tests").join("fixtures").join("synthetic");

    let mut case_dirs: Vec<PathBuf> = fs::read_dir(&root)
        .unwrap_or_else(|e| panic!("Synthetic fixture root {}: {}", root.display(), e))
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    case_dirs.sort();
    assert!(!case_dirs.is_empty(), "No synthetic test cases found");

    for case_dir in case_dirs {
        run_case(&case_dir);
    }
}

fn run_case(case_dir: &Path) {
    let case = case_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown-case>")
        .to_string();

    let scenario_path = case_dir.join("scenario.toml");
    let scenario: Scenario = fs::read_to_string(&scenario_path)
        .map_err(|e| e.to_string())
        .and_then(|text| toml::from_str(&text).map_err(|e| e.to_string()))
        .unwrap_or_else(|e| panic!("Case '{}': bad {}: {}", case, scenario_path.display(), e));

    let temp = tempfile::TempDir::new().unwrap();
    let input = read_tree(&case_dir.join("input"));
    for (rel, content) in &input {
        let dest = temp.path().join(rel);
        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        fs::write(dest, content).unwrap();
    }

    for (idx, command) in scenario.commands.iter().enumerate() {
        let label = format!("Case '{}', command #{} {:?}", case, idx + 1, command.args);
        let output = std::process::Command::new(env!("CARGO_BIN_EXE_tagstrip"))
            .current_dir(temp.path())
            .env_remove("RUST_LOG")
            .args(&command.args)
            .output()
            .unwrap_or_else(|e| panic!("{}: failed to execute: {}", label, e));

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        assert_eq!(
            output.status.code(),
            Some(command.expect_exit),
            "{} exit code mismatch.\nstdout:\n{}\nstderr:\n{}",
            label,
            stdout,
            stderr
        );
        for needle in &command.stdout_contains {
            assert!(stdout.contains(needle), "{} stdout lacks {:?}:\n{}", label, needle, stdout);
        }
        for needle in &command.stdout_not_contains {
            assert!(!stdout.contains(needle), "{} stdout has {:?}:\n{}", label, needle, stdout);
        }
        for needle in &command.stderr_contains {
            assert!(stderr.contains(needle), "{} stderr lacks {:?}:\n{}", label, needle, stderr);
        }
    }

    let expected = read_tree(&case_dir.join("expected"));
    let actual = read_tree(temp.path());

    let expected_paths: Vec<_> = expected.keys().collect();
    let actual_paths: Vec<_> = actual.keys().collect();
    assert_eq!(actual_paths, expected_paths, "Case '{}' tree mismatch", case);

    for (rel, want) in &expected {
        let got = &actual[rel];
        if let Some(line) = first_differing_line(want, got) {
            panic!(
                "Case '{}' file mismatch at {} line {}.\nexpected: {:?}\nactual:   {:?}",
                case,
                rel.display(),
                line + 1,
                want.lines().nth(line),
                got.lines().nth(line)
            );
        }
    }
}

/// All files under `root`, keyed by relative path, with newlines normalized
fn read_tree(root: &Path) -> BTreeMap<PathBuf, String> {
    assert!(root.is_dir(), "Missing fixture directory: {}", root.display());

    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            let text = fs::read_to_string(e.path()).unwrap().replace("\r\n", "\n");
            (rel, text)
        })
        .collect()
}

fn first_differing_line(expected: &str, actual: &str) -> Option<usize> {
    if expected == actual {
        return None;
    }
    let mismatch = expected
        .split_inclusive('\n')
        .zip(actual.split_inclusive('\n'))
        .position(|(e, a)| e != a);
    Some(mismatch.unwrap_or_else(|| {
        expected
            .split_inclusive('\n')
            .count()
            .min(actual.split_inclusive('\n').count())
    }))
}
