//! Tests for error handling and CLI flags.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_help() {
    let t = Test::new();

    t.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--type"))
        .stdout(predicate::str::contains("passed to dmenu"));
    assert!(t.log().is_empty());
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    t.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_store_fails_before_any_tool() {
    let t = Test::with_entries(&[("web/site", "secret\n")]);
    std::fs::remove_dir_all(&t.store).unwrap();

    let output = t.pick("web/site", &[]);
    assert_failure(&output);

    assert_stderr_contains(&output, "does not exist");
    assert_stderr_contains(&output, "PASSWORD_STORE_DIR");
    assert!(t.log().is_empty());
}

#[test]
fn test_missing_pass_binary() {
    let t = Test::with_entries(&[("web/site", "secret\n")]);
    std::fs::remove_file(t.tool("pass")).unwrap();

    let output = t.pick("web/site", &[]);
    assert_failure(&output);

    assert_stderr_contains(&output, "pass binary");
    assert!(t.calls("dmenu").is_empty());
}

#[test]
fn test_missing_dmenu_binary() {
    let t = Test::with_entries(&[("web/site", "secret\n")]);
    std::fs::remove_file(t.tool("dmenu")).unwrap();

    let output = t.pick("web/site", &[]);
    assert_failure(&output);

    assert_stderr_contains(&output, "dmenu binary");
}

#[test]
fn test_decrypt_failure_aborts_delivery() {
    let t = Test::with_entries(&[("web/site", "secret\n")]);
    write_script(&t.tool("pass"), FAILING);
    let hook = t.tool("hook");

    let output = t.pick("web/site", &["-e", hook.to_str().unwrap()]);
    assert_failure(&output);

    assert_stderr_contains(&output, "cannot decrypt 'web/site'");
    assert_stderr_contains(&output, "broken");
    assert!(t.calls("xclip").is_empty());
    assert!(t.calls("hook").is_empty());
}

#[test]
fn test_username_pattern_without_group_is_rejected() {
    let t = Test::with_entries(&[("web/site", "secret\nuser: alice\n")]);

    let output = t.pick("web/site", &["-u", "^user: .*"]);
    assert_failure(&output);

    assert_stderr_contains(&output, "exactly one capture group");
    assert!(t.log().is_empty());
}

#[test]
fn test_invalid_filter_is_rejected() {
    let t = Test::with_entries(&[("web/site", "secret\n")]);

    let output = t.pick("web/site", &["--filter", "web/[a-"]);
    assert_failure(&output);

    assert_stderr_contains(&output, "invalid filter pattern");
    assert!(t.log().is_empty());
}

#[test]
fn test_invalid_selection_is_usage_error() {
    let t = Test::new();

    let output = t.cancel(&["-S", "cutbuffer"]);
    assert_failure(&output);
    assert!(t.log().is_empty());
}

#[test]
fn test_menu_crash_is_treated_as_cancel() {
    let t = Test::with_entries(&[("web/site", "secret\n")]);

    let output = t
        .cmd()
        .env("DMENU_EXIT", "3")
        .env("DMENU_CHOICE", "web/site")
        .output()
        .unwrap();
    assert_success(&output);
    assert!(t.calls("pass").is_empty());
}
