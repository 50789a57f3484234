// CLI regression tests: run the built binary end to end.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

/// A fresh scratch directory per test.
fn scratch(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sprig-cli-{}-{test}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn sprig() -> Command {
    Command::cargo_bin("sprig").unwrap()
}

#[test]
fn run_evaluates_a_file() {
    let dir = scratch("run");
    let file = dir.join("hello.scm");
    fs::write(
        &file,
        "(define (greet who) (display \"hello, \") (display who) (newline))\n(greet \"world\")\n",
    )
    .unwrap();

    sprig()
        .arg("run")
        .arg(&file)
        .assert()
        .success()
        .stdout("hello, world\n");
}

#[test]
fn run_reports_diagnostics_on_error() {
    let dir = scratch("bad");
    let file = dir.join("bad.scm");
    fs::write(&file, "(display 1)\n(define x 42\n").unwrap();

    sprig()
        .arg("run")
        .arg(&file)
        .assert()
        .failure()
        .stdout("1")
        .stderr(contains("sprig::read::unexpected_eof"));
}

#[test]
fn run_walks_directories_in_name_order() {
    let dir = scratch("dir");
    fs::write(dir.join("b.scm"), "(display \"b\")").unwrap();
    fs::write(dir.join("a.scm"), "(define tag \"a\") (display tag)").unwrap();
    fs::write(dir.join("notes.txt"), "(display \"skipped\")").unwrap();

    sprig()
        .arg("run")
        .arg(&dir)
        .assert()
        .success()
        .stdout("ab");
}

#[test]
fn expand_prints_canonical_forms() {
    let dir = scratch("expand");
    let file = dir.join("forms.scm");
    fs::write(
        &file,
        "(define-macro swap (lambda (a b) `(list ,b ,a)))\n(define (f x) (swap x 1))\n(if x y)\n",
    )
    .unwrap();

    sprig()
        .arg("expand")
        .arg(&file)
        .assert()
        .success()
        .stdout("(define f (lambda (x) (list 1 x)))\n(if x y nil)\n");
}

#[test]
fn expand_trace_shows_macro_steps() {
    let dir = scratch("trace");
    let file = dir.join("let.scm");
    fs::write(&file, "(let ((x 1)) x)\n").unwrap();

    sprig()
        .args(["expand", "--trace"])
        .arg(&file)
        .assert()
        .success()
        .stdout(
            contains("Step 1: let")
                .and(contains("- (let ((x 1)) x)"))
                .and(contains("((lambda (x) x) 1)")),
        );
}

#[test]
fn repl_reads_stdin_and_recovers_from_errors() {
    sprig()
        .arg("repl")
        .write_stdin("(define x 2)\n(* x\n  21)\n(car '())\n\"still here\"\n:quit\n(display 99)\n")
        .assert()
        .success()
        .stdout("42\n\"still here\"\n")
        .stderr(contains("sprig::builtin::type_mismatch"));
}

#[test]
fn repl_is_the_default_command() {
    sprig().write_stdin("(+ 1 2)\n").assert().success().stdout("3\n");
}

#[test]
fn list_atoms_prints_sorted_names() {
    sprig()
        .arg("list-atoms")
        .assert()
        .success()
        .stdout(contains("apply\n").and(contains("display\n")).and(contains("car\n")));
}

#[test]
fn config_file_and_flag_set_the_depth_limit() {
    let dir = scratch("config");
    let config = dir.join("sprig.yaml");
    fs::write(&config, "max_depth: 50\n").unwrap();
    let file = dir.join("deep.scm");
    fs::write(
        &file,
        "(define (count n) (if (= n 0) 0 (+ 1 (count (- n 1)))))\n(display (count 100))\n",
    )
    .unwrap();

    sprig()
        .arg("--config")
        .arg(&config)
        .arg("run")
        .arg(&file)
        .assert()
        .failure()
        .stderr(contains("sprig::eval::recursion_limit"));

    sprig()
        .arg("--config")
        .arg(&config)
        .args(["--max-depth", "1000", "run"])
        .arg(&file)
        .assert()
        .success()
        .stdout("100");
}

#[test]
fn default_depth_limit_fails_cleanly_instead_of_overflowing() {
    let dir = scratch("default-depth");
    let count = "(define (count n) (if (= n 0) 0 (+ 1 (count (- n 1)))))\n";
    let ok = dir.join("ok.scm");
    fs::write(&ok, format!("{count}(display (count 990))\n")).unwrap();
    let deep = dir.join("deep.scm");
    fs::write(&deep, format!("{count}(display (count 5000))\n")).unwrap();
    let nested = dir.join("nested.scm");
    fs::write(&nested, format!("{}1{}", "(".repeat(5000), ")".repeat(5000))).unwrap();

    sprig().arg("run").arg(&ok).assert().success().stdout("990");

    sprig()
        .arg("run")
        .arg(&deep)
        .assert()
        .code(1)
        .stderr(contains("sprig::eval::recursion_limit"));

    sprig()
        .arg("run")
        .arg(&nested)
        .assert()
        .code(1)
        .stderr(contains("sprig::read::recursion_limit"));
}

#[test]
fn unknown_config_keys_are_rejected() {
    let dir = scratch("badconfig");
    let config = dir.join("sprig.yaml");
    fs::write(&config, "max_dept: 5\n").unwrap();

    sprig()
        .arg("--config")
        .arg(&config)
        .arg("list-atoms")
        .assert()
        .failure()
        .stderr(contains("sprig::io"));
}
