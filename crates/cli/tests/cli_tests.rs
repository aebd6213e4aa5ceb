// Integration tests driving the compiled `userlink` binary.
//
// Run with: cargo test -p userlink-cli --test cli_tests -- --nocapture

use std::path::Path;
use std::process::{Command, Output};

fn userlink() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_userlink"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    userlink()
        .current_dir(dir)
        .args(args)
        .output()
        .expect("spawn userlink")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// The id column of an annotated CSV, one entry per data row.
fn id_column(path: &Path) -> Vec<String> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    content
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap_or("").to_string())
        .collect()
}

/// Assert stdout is a single, parseable JSON value.
fn single_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let trimmed = stdout.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty");
    serde_json::from_str(trimmed)
        .unwrap_or_else(|e| panic!("stdout must be one JSON value: {e}\nstdout:\n{trimmed}"))
}

const PEOPLE: &str = "\
FirstName,Email1,Phone1
John,john@example.com,1234567890
Jane,,(123) 456-7890
Jill,JOHN@example.com,
Alice,alice@example.com,9999999999
";

// ===========================================================================
// userlink match
// ===========================================================================

#[test]
fn match_email_writes_default_output() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("people.csv"), PEOPLE).unwrap();

    let out = run_in(dir.path(), &["match", "email", "people.csv"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let written = dir.path().join("people_with_user_ids.csv");
    assert_eq!(id_column(&written), vec!["1", "", "1", ""]);

    let content = std::fs::read_to_string(&written).unwrap();
    assert!(content.starts_with("user_id,FirstName,Email1,Phone1\n"));
    assert!(stderr(&out).contains("wrote "));
    assert!(stderr(&out).contains("4 records: 1 groups, 2 grouped, 2 ungrouped"));
}

#[test]
fn match_email_or_phone_links_transitively() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("people.csv"), PEOPLE).unwrap();

    let out = run_in(
        dir.path(),
        &["match", "email_or_phone", "people.csv", "-o", "grouped.csv"],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(id_column(&dir.path().join("grouped.csv")), vec!["1", "1", "1", ""]);
    assert!(!dir.path().join("people_with_user_ids.csv").exists());
}

#[test]
fn match_custom_id_column() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("people.csv"), PEOPLE).unwrap();

    let out = run_in(
        dir.path(),
        &["match", "phone", "people.csv", "--id-column", "person_id", "-q"],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stderr(&out).is_empty(), "quiet run printed: {}", stderr(&out));

    let content = std::fs::read_to_string(dir.path().join("people_with_user_ids.csv")).unwrap();
    assert!(content.starts_with("person_id,FirstName"));
}

#[test]
fn unsupported_mode_fails_before_reading_input() {
    let dir = tempfile::tempdir().unwrap();

    // Input does not even exist: the mode error must win.
    let out = run_in(dir.path(), &["match", "unsupported", "missing.csv"]);
    assert_eq!(out.status.code(), Some(3));
    let err = stderr(&out);
    assert!(err.contains("unsupported match mode"), "stderr: {err}");
    assert!(err.contains("hint:"), "stderr: {err}");
}

#[test]
fn missing_input_is_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), &["match", "email", "missing.csv"]);
    assert_eq!(out.status.code(), Some(4));
    assert!(stderr(&out).contains("cannot read"));
}

#[test]
fn existing_id_column_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ids.csv"), "User ID,Email\n7,a@x.com\n").unwrap();

    let out = run_in(dir.path(), &["match", "email", "ids.csv"]);
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("already has a column"));
    assert!(!dir.path().join("ids_with_user_ids.csv").exists());
}

#[test]
fn output_spelled_differently_from_input_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("people.csv"), PEOPLE).unwrap();

    for output in ["./people.csv", "sub/../people.csv"] {
        if output.starts_with("sub") {
            std::fs::create_dir_all(dir.path().join("sub")).unwrap();
        }
        let out = run_in(dir.path(), &["match", "email", "people.csv", "-o", output]);
        assert_eq!(out.status.code(), Some(2), "output {output}: {}", stderr(&out));
        assert!(stderr(&out).contains("would overwrite the input"));
    }
    let content = std::fs::read_to_string(dir.path().join("people.csv")).unwrap();
    assert_eq!(content, PEOPLE, "input must be left untouched");
}

#[test]
fn run_config_output_onto_input_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("people.csv"), PEOPLE).unwrap();
    std::fs::write(
        dir.path().join("people.match.toml"),
        "mode = \"email\"\ninput = \"people.csv\"\noutput = \"./people.csv\"\n",
    )
    .unwrap();

    let out = run_in(dir.path(), &["run", "people.match.toml"]);
    assert_eq!(out.status.code(), Some(2), "stderr: {}", stderr(&out));
    let content = std::fs::read_to_string(dir.path().join("people.csv")).unwrap();
    assert_eq!(content, PEOPLE);
}

#[test]
fn cells_past_the_header_survive() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("wide.csv"), "Name,Email\nA,a@x.com,keep me\nB,a@x.com\n").unwrap();

    let out = run_in(dir.path(), &["match", "email", "wide.csv"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("line 2: 1 cells beyond the header"), "stderr: {}", stderr(&out));

    let content = std::fs::read_to_string(dir.path().join("wide_with_user_ids.csv")).unwrap();
    assert_eq!(content, "user_id,Name,Email\n1,A,a@x.com,keep me\n1,B,a@x.com\n");
}

#[test]
fn empty_csv_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("empty.csv"), "").unwrap();

    let out = run_in(dir.path(), &["match", "email_or_phone", "empty.csv", "--json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let val = single_json(&out);
    assert_eq!(val["summary"]["total_records"], 0);
    assert_eq!(val["groups"], serde_json::json!([]));
}

// ===========================================================================
// --json / --dry-run
// ===========================================================================

#[test]
fn json_output_shape() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("people.csv"), PEOPLE).unwrap();

    let out = run_in(dir.path(), &["match", "email_or_phone", "people.csv", "--json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let val = single_json(&out);
    let obj = val.as_object().expect("should be JSON object");
    for key in ["input", "output", "meta", "summary", "groups", "assignments"] {
        assert!(obj.contains_key(key), "missing key '{key}'");
    }
    assert_eq!(val["meta"]["mode"], "email_or_phone");
    assert_eq!(val["summary"]["group_count"], 1);
    assert_eq!(val["summary"]["grouped_records"], 3);
    assert_eq!(val["groups"][0]["id"], 1);
    assert_eq!(val["groups"][0]["members"], serde_json::json!([0, 1, 2]));
    assert_eq!(
        val["groups"][0]["shared_values"],
        serde_json::json!(["1234567890", "john@example.com"])
    );
    assert!(val["assignments"][3].get("group_id").is_none());
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("people.csv"), PEOPLE).unwrap();

    let out = run_in(
        dir.path(),
        &["match", "email", "people.csv", "--dry-run", "--json"],
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(!dir.path().join("people_with_user_ids.csv").exists());

    let val = single_json(&out);
    assert!(val["output"].is_null());
    assert_eq!(val["summary"]["group_count"], 1);
}

// ===========================================================================
// userlink run / validate
// ===========================================================================

#[test]
fn run_config_with_column_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir(&data).unwrap();
    std::fs::write(
        data.join("contacts.csv"),
        "Name,Contact,Mobile\nAnn,ann@x.com,555-0100\nBen,ANN@x.com ,\nCal,cal@x.com,5550100\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("contacts.match.toml"),
        r#"
mode = "email_or_phone"
input = "data/contacts.csv"
output = "data/contacts_grouped.csv"
id_column = "contact_id"

[columns]
email = ["Contact"]
phone = ["Mobile"]
"#,
    )
    .unwrap();

    // Run from elsewhere: paths resolve relative to the config file.
    let cwd = tempfile::tempdir().unwrap();
    let config = dir.path().join("contacts.match.toml");
    let out = run_in(cwd.path(), &["run", config.to_str().unwrap()]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let written = data.join("contacts_grouped.csv");
    assert_eq!(id_column(&written), vec!["1", "1", "1"]);
    let content = std::fs::read_to_string(&written).unwrap();
    assert!(content.starts_with("contact_id,Name,Contact,Mobile\n"));
}

#[test]
fn run_config_unsupported_mode() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("bad.match.toml"),
        "mode = \"fuzzy\"\ninput = \"people.csv\"\n",
    )
    .unwrap();

    let out = run_in(dir.path(), &["run", "bad.match.toml"]);
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("\"fuzzy\""));
}

#[test]
fn run_config_missing_override_column() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("people.csv"), PEOPLE).unwrap();
    std::fs::write(
        dir.path().join("people.match.toml"),
        "mode = \"email\"\ninput = \"people.csv\"\n\n[columns]\nemail = [\"Work Email\"]\n",
    )
    .unwrap();

    let out = run_in(dir.path(), &["run", "people.match.toml"]);
    assert_eq!(out.status.code(), Some(4));
    assert!(stderr(&out).contains("missing column 'Work Email'"));
}

#[test]
fn validate_valid_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("people.match.toml"),
        "mode = \"phone\"\ninput = \"people.csv\"\n",
    )
    .unwrap();

    // Input does not exist; validate must not read it.
    let out = run_in(dir.path(), &["validate", "people.match.toml"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let err = stderr(&out);
    assert!(err.contains("valid: phone match"), "stderr: {err}");
    assert!(err.contains("people_with_user_ids.csv"), "stderr: {err}");
}

#[test]
fn validate_rejects_unknown_keys() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("typo.match.toml"),
        "mode = \"phone\"\ninput = \"people.csv\"\nid_colum = \"x\"\n",
    )
    .unwrap();

    let out = run_in(dir.path(), &["validate", "typo.match.toml"]);
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("config parse error"));
}

#[test]
fn missing_mode_argument_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), &["match"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn long_version_reports_build() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), &["--version"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "stdout: {stdout}");
    assert!(stdout.contains("target:"), "stdout: {stdout}");
}
