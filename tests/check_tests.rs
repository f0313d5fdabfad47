//! Integration tests for the check command

#![allow(deprecated)]

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

mod common;
use common::tagstrip_cmd;

#[test]
fn test_check_clean_tree_succeeds() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.tsx"), "<div>x</div>\n").unwrap();

    tagstrip_cmd()
        .arg("check")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked 1 file(s)."))
        .stdout(predicate::str::contains("No remaining references."));
}

#[test]
fn test_check_reports_references_and_fails() {
    let temp = TempDir::new().unwrap();
    let content = "import { motion } from \"framer-motion\";\n\n<motion.div>x</motion.div>\n";
    fs::write(temp.path().join("a.tsx"), content).unwrap();

    tagstrip_cmd()
        .arg("check")
        .arg(temp.path())
        .assert()
        .failure()
        .code(3)
        .stdout(predicate::str::contains("Remaining references (2):"))
        .stdout(predicate::str::contains(
            "a.tsx:1: import { motion } from \"framer-motion\";",
        ))
        .stdout(predicate::str::contains("a.tsx:3: <motion.div>x</motion.div>"))
        .stderr(predicate::str::contains("2 remaining reference(s) found"));

    // check never writes
    assert_eq!(fs::read_to_string(temp.path().join("a.tsx")).unwrap(), content);
}

#[test]
fn test_check_after_run_is_clean() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("a.tsx"),
        "import * as m from 'framer-motion';\n<AnimatePresence><motion.li key={i} />\n</AnimatePresence>",
    )
    .unwrap();

    tagstrip_cmd().arg("run").arg(temp.path()).assert().success();
    tagstrip_cmd().arg("check").arg(temp.path()).assert().success();
}

#[test]
fn test_check_json_output() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.tsx"), "</motion.p>\n").unwrap();

    let output = tagstrip_cmd()
        .arg("check")
        .arg(temp.path())
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["scanned_files"], 1);
    assert_eq!(report["residuals"][0]["path"], "a.tsx");
    assert_eq!(report["residuals"][0]["residuals"][0]["line"], 1);
    assert_eq!(report["residuals"][0]["residuals"][0]["kind"], "qualified_tag");
}

#[test]
fn test_check_with_explicit_config() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("custom.toml");
    fs::write(&config, "[rule]\nnamespace = \"anim\"\nimport_modules = []\n").unwrap();
    fs::write(temp.path().join("a.tsx"), "<motion.div>x</motion.div>\n").unwrap();

    tagstrip_cmd()
        .arg("--config")
        .arg(&config)
        .arg("check")
        .arg(temp.path())
        .assert()
        .success();
}

#[test]
fn test_check_missing_explicit_config_fails() {
    let temp = TempDir::new().unwrap();

    tagstrip_cmd()
        .arg("check")
        .arg(temp.path())
        .arg("--config")
        .arg(temp.path().join("missing.toml"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Config file not found"));
}
