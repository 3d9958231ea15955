//! Tests for `credmatch completions`.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_completions_for_each_shell() {
    let t = Test::new();

    for shell in ["bash", "zsh", "fish", "power-shell"] {
        t.cmd()
            .args(["completions", shell])
            .assert()
            .success()
            .stdout(predicate::str::contains("credmatch"));
    }
}

#[test]
fn test_completions_unknown_shell() {
    let t = Test::new();

    t.cmd().args(["completions", "tcsh"]).assert().code(1);
}
