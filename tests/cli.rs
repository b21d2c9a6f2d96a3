//! End-to-end tests for the dotify binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dotify(state: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dotify").unwrap();
    cmd.env("DOTIFY_STATE_DIR", state.path())
        .env_remove("DOTIFY_PAGE_SIZE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_count() {
    let state = TempDir::new().unwrap();
    dotify(&state)
        .args(["count", "a.b.c.d@gmail.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abcd@gmail.com"))
        .stdout(predicate::str::contains("Variations: 8"));
}

#[test]
fn test_count_single_character() {
    let state = TempDir::new().unwrap();
    dotify(&state)
        .args(["count", "a@gmail.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Variations: 0"))
        .stdout(predicate::str::contains("Try a longer username"));
}

#[test]
fn test_at() {
    let state = TempDir::new().unwrap();
    dotify(&state)
        .args(["at", "abcd@domain.com", "5"])
        .assert()
        .success()
        .stdout("a.bc.d@domain.com\n");
}

#[test]
fn test_at_out_of_range() {
    let state = TempDir::new().unwrap();
    dotify(&state)
        .args(["at", "abcd@domain.com", "8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_invalid_address() {
    let state = TempDir::new().unwrap();
    dotify(&state)
        .args(["count", "not-an-email"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn test_page_json() {
    let state = TempDir::new().unwrap();
    let output = dotify(&state)
        .args(["page", "abcdefgh@gmail.com", "--page", "2", "--page-size", "10", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let page: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(page["number"], 2);
    assert_eq!(page["total"], 128);
    assert_eq!(page["total_pages"], 13);
    assert_eq!(page["items"].as_array().unwrap().len(), 10);
    assert_eq!(page["items"][0]["index"], 10);
    assert_eq!(page["items"][0]["address"], "ab.cd.efgh@gmail.com");
}

#[test]
fn test_page_out_of_range() {
    let state = TempDir::new().unwrap();
    dotify(&state)
        .args(["page", "abc@gmail.com", "--page", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Page 3 does not exist"));
}

#[test]
fn test_page_size_from_env() {
    let state = TempDir::new().unwrap();
    dotify(&state)
        .env("DOTIFY_PAGE_SIZE", "3")
        .args(["page", "abcd@gmail.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Page 1 of 3"));
}

#[test]
fn test_export_to_file() {
    let state = TempDir::new().unwrap();
    let out = state.path().join("variations.txt");

    dotify(&state)
        .args(["export", "jo.e@gmail.com", "--output"])
        .arg(&out)
        .assert()
        .success();

    let content = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines, vec!["joe@gmail.com", "j.oe@gmail.com", "jo.e@gmail.com", "j.o.e@gmail.com"]);
}

#[test]
fn test_export_limit_to_stdout() {
    let state = TempDir::new().unwrap();
    dotify(&state)
        .args(["export", "abcdef@gmail.com", "--limit", "2"])
        .assert()
        .success()
        .stdout("abcdef@gmail.com\na.bcdef@gmail.com\n");
}

#[test]
fn test_export_requires_limit_for_huge_spaces() {
    let state = TempDir::new().unwrap();
    dotify(&state)
        .args(["export", "abcdefghijklmnopqrstuvwxyz@gmail.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--limit"));
}

#[test]
fn test_random_prints_a_variation() {
    let state = TempDir::new().unwrap();
    dotify(&state)
        .args(["random", "jo@gmail.com"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^j\.?o@gmail\.com\n$").unwrap());
}

#[test]
fn test_reset() {
    let state = TempDir::new().unwrap();
    dotify(&state)
        .args(["reset", "jo@gmail.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Forgot 0"));

    assert!(state.path().join("session_jo@gmail.com.json").exists());
}

#[test]
fn test_reset_recovers_corrupt_session() {
    let state = TempDir::new().unwrap();
    let path = state.path().join("session_jo@gmail.com.json");
    std::fs::write(&path, "{ not json").unwrap();

    dotify(&state)
        .args(["reset", "jo@gmail.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Forgot 0"));

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["address"], "jo@gmail.com");
}

#[test]
fn test_page_of_empty_space() {
    let state = TempDir::new().unwrap();
    dotify(&state)
        .args(["page", "a@gmail.com", "--page", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no variations"))
        .stderr(predicate::str::contains("1..=0").not());
}

#[test]
fn test_export_from_start_index() {
    let state = TempDir::new().unwrap();
    dotify(&state)
        .args(["export", "abc@gmail.com", "--start", "2"])
        .assert()
        .success()
        .stdout("ab.c@gmail.com\na.b.c@gmail.com\n");
}

#[test]
fn test_export_start_out_of_range() {
    let state = TempDir::new().unwrap();
    dotify(&state)
        .args(["export", "abc@gmail.com", "--start", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_log_filter_from_dotenv() {
    let state = TempDir::new().unwrap();
    std::fs::write(state.path().join(".env"), "RUST_LOG=dotify=info\n").unwrap();

    dotify(&state)
        .current_dir(state.path())
        .args(["count", "jo@gmail.com"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Parsed address"));
}
