//! Tests for synchronization between two stores sharing a bare remote.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_second_clone_sees_first_clone_credentials() {
    crate::skip_without_git!();
    let remote = Remote::new();
    let a = Test::clone_of(&remote);
    let b = Test::clone_of(&remote);

    assert_success(&a.store("FOO", "bar"));

    // fetch pulls before reading
    let output = b.fetch("FOO");
    assert_success(&output);
    assert_eq!(stdout(&output), "bar\n");
}

#[test]
fn test_clone_after_push_gets_store() {
    crate::skip_without_git!();
    let remote = Remote::new();
    let a = Test::clone_of(&remote);
    assert_success(&a.store("FOO", "bar"));

    let b = Test::clone_of(&remote);
    assert!(b.path(".credmatch-store/credentials.enc").exists());
    assert_eq!(stdout(&b.list()), "FOO=bar\n");
}

#[test]
fn test_sync_pulls_updates() {
    crate::skip_without_git!();
    let remote = Remote::new();
    let a = Test::clone_of(&remote);
    let b = Test::clone_of(&remote);
    assert_success(&a.store("FOO", "bar"));

    b.cmd()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("pulled latest credentials"));
    b.cmd()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("already up to date"));
}

/// Point a store's origin somewhere unreachable while `f` runs.
fn offline<T>(t: &Test, remote: &Remote, f: impl FnOnce() -> T) -> T {
    let missing = t.home.path().join("offline.git");
    t.git(&[
        "-C",
        ".credmatch-store",
        "remote",
        "set-url",
        "origin",
        &missing.to_string_lossy(),
    ]);
    let result = f();
    t.git(&[
        "-C",
        ".credmatch-store",
        "remote",
        "set-url",
        "origin",
        &remote.url(),
    ]);
    result
}

#[test]
fn test_offline_store_is_kept_locally() {
    crate::skip_without_git!();
    let remote = Remote::new();
    let a = Test::clone_of(&remote);

    let output = offline(&a, &remote, || a.store("FOO", "bar"));
    assert_success(&output);
    assert_stderr_contains(&output, "could not update from remote");
    assert_stderr_contains(&output, "could not push");
    assert_eq!(stdout(&a.list()), "FOO=bar\n");

    // Back online, sync pushes the pending commit.
    a.cmd()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("pushed local changes"));

    let b = Test::clone_of(&remote);
    assert_eq!(stdout(&b.fetch("FOO")), "bar\n");
}

#[test]
fn test_concurrent_store_conflicts_then_sync_merges() {
    crate::skip_without_git!();
    let remote = Remote::new();
    let a = Test::clone_of(&remote);
    assert_success(&a.store("SHARED", "v1"));
    let b = Test::clone_of(&remote);

    assert_success(&offline(&b, &remote, || b.store("FROM_B", "b")));
    assert_success(&a.store("FROM_A", "a"));
    assert_success(&a.store("SHARED", "v2"));

    // The histories have diverged: the next store loses the push race.
    let output = b.store("ALSO_B", "b2");
    assert_exit_code(&output, 5);
    assert_stderr_contains(&output, "diverged");
    assert_stderr_contains(&output, "credmatch sync");

    b.cmd()
        .args(["sync", PASSWORD])
        .assert()
        .success()
        .stdout(predicate::str::contains("merged remote and local credentials"))
        .stdout(predicate::str::contains("pushed local changes"));

    let expected = "FROM_A=a\nSHARED=v2\nFROM_B=b\nALSO_B=b2\n";
    assert_eq!(stdout(&b.list()), expected);
    assert_eq!(stdout(&a.list()), expected);
}

#[test]
fn test_sync_with_different_password_exit_5() {
    crate::skip_without_git!();
    let remote = Remote::new();
    let a = Test::clone_of(&remote);
    let b = Test::clone_of(&remote);

    assert_success(&offline(&b, &remote, || {
        b.store_with("MINE", "x", WRONG_PASSWORD)
    }));
    assert_success(&a.store("FOO", "bar"));

    let output = b.cmd().args(["sync", WRONG_PASSWORD]).output().unwrap();
    assert_exit_code(&output, 5);
    assert_stderr_contains(&output, "does not open with this master password");

    // Local credentials are untouched.
    assert_eq!(stdout(&b.list_with(WRONG_PASSWORD)), "MINE=x\n");
}

#[test]
fn test_sync_without_remote() {
    crate::skip_without_git!();
    let t = Test::init_here();

    t.cmd()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("no remote configured"));
}
