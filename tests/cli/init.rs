//! Tests for `credmatch init` and `credmatch init-here`.

use crate::support::*;

#[test]
fn test_init_here_in_git_repository() {
    crate::skip_without_git!();
    let t = Test::new();
    t.git(&["init", "--quiet"]);

    let output = t.init_here_cmd();
    assert_success(&output);
    assert_stdout_contains(&output, "initialized credential store");

    let marker = std::fs::read_to_string(t.path(".credmatch.toml")).unwrap();
    assert!(marker.contains("current-directory"));
}

#[test]
fn test_init_here_outside_git_fails() {
    let t = Test::new();

    let output = t.init_here_cmd();
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "not a git working tree");
    assert!(!t.path(".credmatch.toml").exists());
}

#[test]
fn test_init_here_twice_fails() {
    crate::skip_without_git!();
    let t = Test::init_here();

    let output = t.init_here_cmd();
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "already initialized");
}

#[test]
fn test_init_here_reuses_existing_store_file() {
    crate::skip_without_git!();
    let t = Test::with_credentials(&[("FOO", "bar")]);
    std::fs::remove_file(t.path(".credmatch.toml")).unwrap();

    let output = t.init_here_cmd();
    assert_success(&output);
    assert_stdout_contains(&output, "existing credentials.enc");

    let output = t.fetch("FOO");
    assert_success(&output);
    assert_eq!(stdout(&output), "bar\n");
}

#[test]
fn test_init_clones_remote() {
    crate::skip_without_git!();
    let remote = Remote::new();
    let t = Test::new();

    let output = t.init(&remote.url());
    assert_success(&output);
    assert!(t.path(".credmatch-store/.git").exists());

    let marker = std::fs::read_to_string(t.path(".credmatch.toml")).unwrap();
    assert!(marker.contains("dedicated"));
    assert!(marker.contains(&remote.url()));
}

#[test]
fn test_init_unreachable_remote_creates_repository() {
    crate::skip_without_git!();
    let t = Test::new();
    let missing = t.home.path().join("nowhere.git");

    let output = t.init(&missing.to_string_lossy());
    assert_success(&output);
    assert_stderr_contains(&output, "could not clone");

    let remote = t.git(&["-C", ".credmatch-store", "remote", "get-url", "origin"]);
    assert_eq!(remote, missing.to_string_lossy());

    // Storing still works; the push failure is only a warning.
    let output = t.store("FOO", "bar");
    assert_success(&output);
    assert_stderr_contains(&output, "could not push");
}

#[test]
fn test_init_twice_fails() {
    crate::skip_without_git!();
    let remote = Remote::new();
    let t = Test::clone_of(&remote);

    let output = t.init(&remote.url());
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "already initialized");
}

#[test]
fn test_init_without_url_fails() {
    let t = Test::new();

    let output = t.cmd().arg("init").output().unwrap();
    assert_exit_code(&output, 1);
    assert!(!t.path(".credmatch-store").exists());
}
