use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Run onpull with no credentials, an empty home and an empty working dir
fn onpull(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("onpull").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("PINATA_JWT")
        .env_remove("SUPABASE_URL")
        .env_remove("SUPABASE_KEY")
        .env_remove("RUST_LOG")
        .env_remove("ONPULL_AI_ID")
        .arg("--no-color");
    cmd
}

// ─── Help & version ──────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    onpull(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("clean"))
        .stdout(predicate::str::contains("archive"))
        .stdout(predicate::str::contains("recall"))
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("keygen"));
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    onpull(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("onpull"));
}

#[test]
fn test_clean_has_no_scope_flag() {
    let home = TempDir::new().unwrap();
    onpull(&home)
        .args(["clean", "--visibility", "public"])
        .assert()
        .failure();
}

// ─── Credentials ─────────────────────────────────────────────────────────────

#[test]
fn test_clean_without_jwt_fails_before_network() {
    let home = TempDir::new().unwrap();
    onpull(&home)
        .arg("clean")
        .assert()
        .failure()
        .stderr(predicate::str::contains("PINATA_JWT"));
}

#[test]
fn test_archive_without_credentials_fails() {
    let home = TempDir::new().unwrap();
    onpull(&home)
        .args(["archive", "a memory"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PINATA_JWT"));
}

#[test]
fn test_recall_needs_supabase() {
    let home = TempDir::new().unwrap();
    onpull(&home)
        .args(["recall", "ai_core_001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SUPABASE_URL"));
}

#[test]
fn test_dotenv_is_loaded_from_working_dir() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join(".env"), "SUPABASE_URL=http://127.0.0.1:9\n").unwrap();
    onpull(&home)
        .args(["recall", "ai_core_001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SUPABASE_KEY"));
}

#[test]
fn test_dotenv_supplies_ai_id_default() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join(".env"),
        "SUPABASE_URL=http://127.0.0.1:9\n\
         SUPABASE_KEY=anon\n\
         ONPULL_AI_ID=ai_from_dotenv\n\
         ENCRYPTION_KEY_AI_FROM_DOTENV=not-a-key\n",
    )
    .unwrap();
    onpull(&home)
        .args(["recall", "anything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ENCRYPTION_KEY_AI_FROM_DOTENV"));
}

#[test]
fn test_dotenv_rust_log_applies_to_logging() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join(".env"), "RUST_LOG=onpull=debug\n").unwrap();
    onpull(&home)
        .args(["keygen", "--format", "quiet"])
        .assert()
        .success()
        .stderr(predicate::str::contains("loaded .env"));
}

// ─── Import ──────────────────────────────────────────────────────────────────

#[test]
fn test_import_missing_file() {
    let home = TempDir::new().unwrap();
    onpull(&home)
        .args(["import", "does_not_exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does_not_exist.json"));
}

#[test]
fn test_import_blank_record_rejected_before_upload() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("m.json"), r#"[{"content":""}]"#).unwrap();
    onpull(&home)
        .args(["import", "m.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("content/text"));
}

// ─── Keygen ──────────────────────────────────────────────────────────────────

#[test]
fn test_keygen_writes_default_file() {
    let home = TempDir::new().unwrap();
    onpull(&home)
        .args(["keygen", "--format", "quiet"])
        .assert()
        .success();

    let written = std::fs::read_to_string(home.path().join("generated_key.txt")).unwrap();
    assert_eq!(written.lines().count(), 2);
}

#[test]
fn test_keygen_json_output() {
    let home = TempDir::new().unwrap();
    onpull(&home)
        .args(["keygen", "--output", "k.txt", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"key\""))
        .stdout(predicate::str::contains("k.txt"));
}

// ─── Config command ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_defaults() {
    let home = TempDir::new().unwrap();
    onpull(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("page_limit = 100"))
        .stdout(predicate::str::contains("test_out_memories"));
}

#[test]
fn test_config_set_then_show() {
    let home = TempDir::new().unwrap();
    onpull(&home)
        .args(["config", "set", "page_limit", "25"])
        .assert()
        .success();
    onpull(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("page_limit = 25"));
}

#[test]
fn test_config_set_rejects_zero_limit() {
    let home = TempDir::new().unwrap();
    onpull(&home)
        .args(["config", "set", "page_limit", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("positive"));
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    onpull(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("onpull"));
}
