//! Tests for copying to X selections.

use crate::support::*;

const ENTRY: &str = "secret\nuser: alice\nurl: example.org\n";

#[test]
fn test_default_copies_password_to_primary() {
    let t = Test::with_entries(&[("web/site", ENTRY)]);

    let output = t.pick("web/site", &[]);
    assert_success(&output);

    assert_eq!(t.calls("pass"), vec!["pass web/site"]);
    assert_eq!(t.calls("xclip"), vec!["xclip -selection primary <secret>"]);
    assert!(t.calls("xdotool").is_empty());
}

#[test]
fn test_pass_gets_store_from_environment() {
    let t = Test::with_entries(&[("web/site", ENTRY)]);

    assert_success(&t.pick("web/site", &[]));

    let store_line = format!("store {}", t.store.display());
    assert!(t.log().contains(&store_line), "log: {:?}", t.log());
}

#[test]
fn test_menu_lists_sorted_entries_without_manifest() {
    let t = Test::with_entries(&[("web/site", ENTRY), ("bank", "pw\n"), ("mail/work", "pw\n")]);

    assert_success(&t.cancel(&[]));

    assert_eq!(t.menu_input(), "bank\nmail/work\nweb/site");
    assert_eq!(t.calls("dmenu"), vec!["dmenu -p copy"]);
}

#[test]
fn test_unknown_args_are_forwarded_to_dmenu() {
    let t = Test::with_entries(&[("web/site", ENTRY)]);

    assert_success(&t.cancel(&["-i", "-l", "10", "-fn", "Mono-10"]));

    assert_eq!(t.calls("dmenu"), vec!["dmenu -p copy -i -l 10 -fn Mono-10"]);
}

#[test]
fn test_filter_narrows_menu() {
    let t = Test::with_entries(&[("web/site", ENTRY), ("web/shop", "pw\n"), ("bank", "pw\n")]);

    assert_success(&t.cancel(&["--filter", "^web/"]));

    assert_eq!(t.menu_input(), "web/shop\nweb/site");
}

#[test]
fn test_copy_to_each_selection_and_field() {
    let t = Test::with_entries(&[("web/site", ENTRY)]);

    let output = t.pick(
        "web/site",
        &["-u", "^user: (.*)", "-P", "-S", "primary", "-S", "clipboard"],
    );
    assert_success(&output);

    assert_eq!(
        t.calls("xclip"),
        vec![
            "xclip -selection primary <alice>",
            "xclip -selection primary <secret>",
            "xclip -selection clipboard <alice>",
            "xclip -selection clipboard <secret>",
        ]
    );
}

#[test]
fn test_user_only() {
    let t = Test::with_entries(&[("web/site", ENTRY)]);

    assert_success(&t.pick("web/site", &["--user", "^user: (.*)$"]));

    assert_eq!(t.calls("xclip"), vec!["xclip -selection primary <alice>"]);
}

#[test]
fn test_username_without_match_copies_password_only() {
    let t = Test::with_entries(&[("web/site", "secret\n")]);

    let output = t.pick("web/site", &["-u", "^user: (.*)", "-P"]);
    assert_success(&output);

    assert_eq!(t.calls("xclip"), vec!["xclip -selection primary <secret>"]);
    assert_stderr_contains(&output, "no username found in web/site");
}

#[test]
fn test_bare_user_flag_yields_no_username() {
    let t = Test::with_entries(&[("web/site", ENTRY)]);

    let output = t.pick("web/site", &["-u"]);
    assert_success(&output);

    assert!(t.calls("xclip").is_empty());
    assert_stderr_contains(&output, "no username found");
}

#[test]
fn test_display_is_passed_to_xclip() {
    let t = Test::with_entries(&[("web/site", ENTRY)]);

    assert_success(&t.pick("web/site", &["--display", ":1"]));

    assert_eq!(
        t.calls("xclip"),
        vec!["xclip -selection primary -d :1 <secret>"]
    );
}

#[test]
fn test_cancel_does_nothing() {
    let t = Test::with_entries(&[("web/site", ENTRY)]);

    let output = t.cancel(&[]);
    assert_success(&output);

    assert!(t.calls("pass").is_empty());
    assert!(t.calls("xclip").is_empty());
}

#[test]
fn test_choice_not_in_store_is_cancel() {
    let t = Test::with_entries(&[("web/site", ENTRY)]);

    assert_success(&t.pick("typed/by/hand", &[]));

    assert!(t.calls("pass").is_empty());
}

#[test]
fn test_empty_store_shows_empty_menu() {
    let t = Test::new();

    assert_success(&t.cancel(&[]));

    assert_eq!(t.menu_input(), "");
    assert_eq!(t.calls("dmenu").len(), 1);
}
