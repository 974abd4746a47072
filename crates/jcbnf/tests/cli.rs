//! Tests for the `jcbnf` binary.
#![cfg(feature = "cli")]

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const GRAMMAR: &str = "main ::= pair [{\",\" pair}] \\Z\npair ::= {$letter}\n";

fn file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn jcbnf() -> Command {
    Command::cargo_bin("jcbnf").unwrap()
}

#[test]
fn prints_an_outline() {
    let grammar = file(GRAMMAR);
    let input = file("ab,c");
    jcbnf()
        .arg(grammar.path())
        .arg(input.path())
        .assert()
        .success()
        .stdout("main [0..4]\n  pair [0..2]\n  pair [3..4]\n");
}

#[test]
fn prints_json() {
    let grammar = file(GRAMMAR);
    let input = file("ab");
    jcbnf()
        .arg(grammar.path())
        .arg(input.path())
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pair\"").and(predicate::str::contains("\"ab\"")));
}

#[test]
fn matches_from_another_definition() {
    let grammar = file(GRAMMAR);
    let input = file("abc,");
    jcbnf()
        .arg(grammar.path())
        .arg(input.path())
        .args(["--main", "pair"])
        .assert()
        .success()
        .stdout("pair [0..3]\n");
}

#[test]
fn no_match_exits_with_one() {
    let grammar = file(GRAMMAR);
    let input = file("ab,");
    jcbnf()
        .arg(grammar.path())
        .arg(input.path())
        .assert()
        .code(1)
        .stdout("no match\n");
}

#[test]
fn grammar_errors_exit_with_two() {
    let grammar = file("main ::= a\n     ?? b\n");
    let input = file("a");
    jcbnf()
        .arg(grammar.path())
        .arg(input.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unrecognised statement symbol @ line 2"));
}

#[test]
fn undefined_references_exit_with_two() {
    let grammar = file("main ::= missing\n");
    let input = file("a");
    jcbnf()
        .arg(grammar.path())
        .arg(input.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("'missing'"));
}
