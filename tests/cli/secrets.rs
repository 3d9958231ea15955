//! Tests for `credmatch store`, `fetch` and `list`.

use crate::support::*;

#[test]
fn test_store_and_fetch_roundtrip() {
    crate::skip_without_git!();
    let t = Test::init_here();

    let output = t.store("FOO", "bar");
    assert_success(&output);
    assert_stdout_contains(&output, "stored FOO");

    let output = t.fetch("FOO");
    assert_success(&output);
    assert_eq!(stdout(&output), "bar\n");
}

#[test]
fn test_overwrite_lists_only_latest() {
    crate::skip_without_git!();
    let t = Test::with_credentials(&[("FOO", "bar")]);

    let output = t.store("FOO", "baz");
    assert_success(&output);
    assert_stdout_contains(&output, "updated FOO");

    let output = t.list();
    assert_success(&output);
    assert_eq!(stdout(&output), "FOO=baz\n");
}

#[test]
fn test_sample_credentials_roundtrip() {
    crate::skip_without_git!();
    let t = Test::init_here();
    for (key, value) in SAMPLE_CREDENTIALS {
        assert_roundtrip(&t, key, value);
    }

    let listed = stdout(&t.list());
    for (key, value) in SAMPLE_CREDENTIALS {
        assert!(listed.contains(&format!("{}={}\n", key, value)));
    }
}

#[test]
fn test_list_keeps_write_order() {
    crate::skip_without_git!();
    let t = Test::with_credentials(&[("A", "1"), ("B", "2"), ("C", "3")]);
    assert_success(&t.store("A", "4"));

    assert_eq!(stdout(&t.list()), "B=2\nC=3\nA=4\n");
}

#[test]
fn test_fetch_missing_key_exit_4() {
    crate::skip_without_git!();
    let t = Test::with_credentials(&[("FOO", "bar")]);

    let output = t.fetch("MISSING");
    assert_exit_code(&output, 4);
    assert_stderr_contains(&output, "MISSING");
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_fetch_on_fresh_store_is_not_found() {
    crate::skip_without_git!();
    let t = Test::init_here();

    assert_exit_code(&t.fetch("FOO"), 4);
}

#[test]
fn test_list_fresh_store() {
    crate::skip_without_git!();
    let t = Test::init_here();

    let output = t.list();
    assert_success(&output);
    assert_stdout_contains(&output, "no credentials stored");

    let output = t.list_json();
    assert_success(&output);
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed, serde_json::json!([]));
}

#[test]
fn test_list_json() {
    crate::skip_without_git!();
    let t = Test::with_credentials(&[("FOO", "bar"), ("URL", "a=b")]);

    let output = t.list_json();
    assert_success(&output);
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!([
            {"key": "FOO", "value": "bar"},
            {"key": "URL", "value": "a=b"},
        ])
    );
}

#[test]
fn test_store_file_is_armored_ciphertext() {
    crate::skip_without_git!();
    let t = Test::with_credentials(&[("SECRET", "plaintext-should-not-appear")]);

    let raw = std::fs::read_to_string(t.path("credentials.enc")).unwrap();
    assert!(raw.starts_with("-----BEGIN AGE ENCRYPTED FILE-----"));
    assert!(!raw.contains("plaintext-should-not-appear"));
    assert!(!raw.contains("SECRET"));
}

#[test]
fn test_store_commits_with_key_in_message() {
    crate::skip_without_git!();
    let t = Test::with_credentials(&[("API_TOKEN", "tok-123")]);

    let subject = t.git(&["log", "-1", "--format=%s"]);
    assert_eq!(subject, "Update credential API_TOKEN");
    let tracked = t.git(&["ls-files"]);
    assert!(tracked.lines().any(|l| l == "credentials.enc"));
}

#[test]
fn test_password_from_stdin() {
    crate::skip_without_git!();
    let t = Test::init_here();

    let output = t
        .cmd()
        .args(["store", "FOO", "bar"])
        .write_stdin(format!("{}\n", PASSWORD))
        .output()
        .unwrap();
    assert_success(&output);

    let output = t.fetch("FOO");
    assert_success(&output);
    assert_eq!(stdout(&output), "bar\n");
}

#[test]
fn test_password_argument_warns() {
    crate::skip_without_git!();
    let t = Test::init_here();

    let output = t.store("FOO", "bar");
    assert_success(&output);
    assert_stderr_contains(&output, "visible in shell history");
    assert_output_excludes(&output, PASSWORD);
}
