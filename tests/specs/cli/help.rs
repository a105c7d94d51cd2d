//! CLI help output specs

use crate::prelude::*;

#[test]
fn yajn_no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn yajn_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("add")
        .stdout_has("remove")
        .stdout_has("refresh")
        .stdout_has("options");
}

#[test]
fn yajn_add_help_shows_flags() {
    cli().args(&["add", "--help"]).passes().stdout_has("--page").stdout_has("--no-refresh");
}

#[test]
fn yajn_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn unknown_command_is_a_usage_error() {
    cli().args(&["frobnicate"]).fails().code(EXIT_USAGE);
}
