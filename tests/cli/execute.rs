//! Tests for `--execute`.

use crate::support::*;

const ENTRY: &str = "secret\nuser: alice\n";

#[test]
fn test_execute_receives_entry_store_and_filter() {
    let t = Test::with_entries(&[("web/site", ENTRY)]);
    let hook = t.tool("hook");

    let output = t.pick(
        "web/site",
        &["-e", hook.to_str().unwrap(), "--filter", "web"],
    );
    assert_success(&output);

    assert_eq!(
        t.calls("hook"),
        vec![format!("hook web/site {} web", t.store.display())]
    );
    assert_eq!(t.hook_input(), ENTRY);
    // execute does not replace the default copy
    assert_eq!(t.calls("xclip"), vec!["xclip -selection primary <secret>"]);
}

#[test]
fn test_execute_without_filter() {
    let t = Test::with_entries(&[("web/site", ENTRY)]);
    let hook = t.tool("hook");

    assert_success(&t.pick("web/site", &["--execute", hook.to_str().unwrap()]));

    assert_eq!(
        t.calls("hook"),
        vec![format!("hook web/site {}", t.store.display())]
    );
}

#[test]
fn test_execute_runs_after_failed_copy() {
    let t = Test::with_entries(&[("web/site", ENTRY)]);
    write_script(&t.tool("xclip"), FAILING);
    let hook = t.tool("hook");

    let output = t.pick("web/site", &["-e", hook.to_str().unwrap()]);
    assert_failure(&output);

    assert_eq!(t.calls("hook").len(), 1);
    assert_stderr_contains(&output, "copy failed");
}

#[test]
fn test_execute_failure_is_reported() {
    let t = Test::with_entries(&[("web/site", ENTRY)]);
    let failing = t.tool("failing");

    let output = t.pick("web/site", &["-e", failing.to_str().unwrap()]);
    assert_failure(&output);

    assert_stderr_contains(&output, "execute failed");
    assert_eq!(t.calls("xclip").len(), 1);
}
