//! Options specs

use crate::prelude::*;

#[test]
fn show_defaults_without_a_file() {
    let state = StateDir::empty();

    state
        .yajn()
        .args(&["options", "show"])
        .passes()
        .stdout_has("60s")
        .stdout_has("all")
        .stdout_has("Shift+J");
}

#[test]
fn set_persists_options() {
    let state = StateDir::empty();

    state
        .yajn()
        .args(&["options", "set", "--refresh-time", "15", "--notification", "unstable"])
        .passes();

    let options = state.read_json("options.json");
    assert_eq!(options["refreshTimeSeconds"], 15);
    assert_eq!(options["notificationMode"], "unstable");
    state.yajn().args(&["options", "show"]).passes().stdout_has("15s").stdout_has("unstable");
}

#[test]
fn show_json() {
    let state = StateDir::empty();
    state.yajn().args(&["options", "set", "--notification", "none"]).passes();

    let options = state.yajn().args(&["options", "show", "-o", "json"]).passes().json();

    assert_eq!(options["notificationMode"], "none");
    assert_eq!(options["refreshTimeSeconds"], 60);
}

#[test]
fn legacy_keys_are_read() {
    let state = StateDir::empty();
    state.file("options.json", r#"{"refreshTime": "30", "notification": "unstable"}"#);

    state.yajn().args(&["options", "show"]).passes().stdout_has("30s").stdout_has("unstable");
}

#[test]
fn set_without_fields_is_a_usage_error() {
    let state = StateDir::empty();
    state.yajn().args(&["options", "set"]).fails().code(EXIT_USAGE).stderr_has("nothing to set");
}

#[test]
fn unknown_mode_is_rejected() {
    let state = StateDir::empty();
    state
        .yajn()
        .args(&["options", "set", "--notification", "loud"])
        .fails()
        .code(EXIT_USAGE)
        .stdout_lacks("Saved");
    assert!(!state.path().join("options.json").exists());
}
