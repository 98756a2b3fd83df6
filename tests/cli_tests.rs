mod common;

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use assert_cmd::Command;
use common::{TWO_LETTER, reference_bytes, reference_words};
use dawglex::DawgConfig;
use serde_json::Value;
use tempfile::{TempDir, tempdir};

#[test]
fn test_cli_exits_with_success_on_help() {
    let mut cmd = cli();
    cmd.arg("--help");
    let output = cmd.assert().success().get_output().stdout.clone();
    assert!(String::from_utf8_lossy(&output).contains("Commands:"));
}

#[test]
fn test_cli_unknown_flag_is_usage_error() {
    let mut cmd = cli();
    cmd.args(["--verbose", "info"]);
    cmd.assert().code(2);
}

#[test]
fn test_cli_without_dictionary_fails() {
    let mut cmd = cli();
    cmd.env_remove("DAWG_DICT").args(["validate", "aa"]);
    let output = cmd.assert().code(1).get_output().stderr.clone();
    assert!(String::from_utf8_lossy(&output).contains("no dictionary"));
}

#[test]
fn test_cli_validate_accepts_words() {
    let (_dir, dict) = prepare_dict();
    let mut cmd = cli();
    cmd.args(["--dict", path_str(&dict), "validate", "aa", "Aardvark"]);
    cmd.assert()
        .success()
        .stdout("aa\tboth\nAardvark\tboth\n");
}

#[test]
fn test_cli_validate_rejects_unknown_word() {
    let (_dir, dict) = prepare_dict();
    let mut cmd = cli();
    cmd.args(["--dict", path_str(&dict), "validate", "qi", "zzzzz"]);
    cmd.assert()
        .code(1)
        .stdout("qi\tboth\nzzzzz\tnone\n");
}

#[test]
fn test_cli_dictionary_from_environment() {
    let (_dir, dict) = prepare_dict();
    let mut cmd = cli();
    cmd.env("DAWG_DICT", &dict).args(["validate", "quiz"]);
    cmd.assert().success();
}

#[test]
fn test_cli_enumerate_two_letter_words() {
    let (_dir, dict) = prepare_dict();
    for extra in [&[][..], &["--parallel"][..]] {
        let mut cmd = cli();
        cmd.args(["--dict", path_str(&dict), "enumerate", "--length", "2"])
            .args(extra);
        let output = cmd.assert().success().get_output().stdout.clone();
        let text = String::from_utf8(output).expect("utf8 output");
        let found: Vec<&str> = text.lines().collect();
        let unique: BTreeSet<&str> = found.iter().copied().collect();
        assert_eq!(unique.len(), found.len());
        assert_eq!(unique, TWO_LETTER.iter().copied().collect::<BTreeSet<_>>());
    }
}

#[test]
fn test_cli_enumerate_single_section() {
    let (_dir, dict) = prepare_dict();
    let mut cmd = cli();
    cmd.args(["--dict", path_str(&dict), "enumerate", "--section", "1"]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).expect("utf8 output");
    assert_eq!(text.lines().count(), reference_words().len());
}

#[test]
fn test_cli_info_reports_layout() {
    let (_dir, dict) = prepare_dict();
    let mut cmd = cli();
    cmd.args(["--dict", path_str(&dict), "info"]);
    let value = json_output(&mut cmd);
    assert_eq!(value["command"], "info");
    assert_eq!(value["summary"]["encoding"], "packed");
    assert_eq!(value["summary"]["trailing_nodes"], 0);
    assert_eq!(value["section2_top_chains"], 1);
}

#[test]
fn test_cli_cross_validate_reports_exact_match() {
    let (dir, dict) = prepare_dict();
    let list = write_list(dir.path(), "reference.txt", &reference_words());
    let mut cmd = cli();
    cmd.args([
        "--dict",
        path_str(&dict),
        "cross-validate",
        path_str(&list),
        "--exhaustive-len",
        "2",
        "--enumerate",
    ]);
    let value = json_output(&mut cmd);
    assert_eq!(value["command"], "cross-validate");
    assert_eq!(value["report"]["match_rate"], 1.0);
    assert_eq!(value["report"]["false_negatives"], serde_json::json!([]));
    assert_eq!(value["report"]["false_positives"], serde_json::json!([]));
}

#[test]
fn test_cli_rank_encodings_lists_both() {
    let (dir, dict) = prepare_dict();
    let list = write_list(dir.path(), "reference.txt", &reference_words());
    let mut cmd = cli();
    cmd.args([
        "--dict",
        path_str(&dict),
        "rank-encodings",
        path_str(&list),
        "--exhaustive-len",
        "2",
    ]);
    let value = json_output(&mut cmd);
    let ranking = value["ranking"].as_array().expect("ranking array");
    assert_eq!(ranking.len(), 2);
    assert_eq!(ranking[0]["encoding"], "packed");
}

#[test]
fn test_cli_build_then_validate() {
    let dir = tempdir().expect("tempdir");
    let list = write_list(dir.path(), "words.txt", &["# seed list", "quiz", "Zebra", "x"]);
    let extra = write_list(dir.path(), "suffix.txt", &["qi"]);
    let output = dir.path().join("built.dawg");

    let mut build = cli();
    build.args([
        "--encoding",
        "split",
        "build",
        path_str(&list),
        path_str(&output),
        "--suffix-only",
        path_str(&extra),
    ]);
    let value = json_output(&mut build);
    assert_eq!(value["command"], "build");
    assert_eq!(value["words"], 2);
    assert_eq!(value["skipped_entries"], 1);

    let mut validate = cli();
    validate.args([
        "--dict",
        path_str(&output),
        "--encoding",
        "split",
        "validate",
        "zebra",
        "qi",
    ]);
    validate
        .assert()
        .success()
        .stdout("zebra\tboth\nqi\tsection1\n");
}

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dawglex"));
    cmd.env_remove("DAWG_ENCODING")
        .env_remove("DAWG_NODE_BASE")
        .env_remove("DAWG_CHAIN_POLICY")
        .env_remove("DAWG_MAX_DEPTH");
    cmd
}

fn prepare_dict() -> (TempDir, PathBuf) {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("reference.dawg");
    std::fs::write(&path, reference_bytes(&DawgConfig::default())).expect("write dictionary");
    (dir, path)
}

fn write_list(dir: &Path, name: &str, words: &[&str]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, words.join("\n")).expect("write list");
    path
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("json output")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf8 path")
}
