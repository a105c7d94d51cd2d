//! Tracked-URL specs: add, remove, set, list, status
//!
//! Adds use `--no-refresh` so nothing is fetched. Page adds only reach a
//! local port with nothing listening.

use crate::prelude::*;

const APP: &str = "http://ci.example.com/job/app/";

#[test]
fn add_then_list() {
    let state = StateDir::empty();

    state
        .yajn()
        .args(&["add", "http://ci.example.com/job/app", "--no-refresh"])
        .passes()
        .stdout_has(&format!("Tracking {APP}"));

    state.yajn().args(&["list"]).passes().stdout_has("app");
}

#[test]
fn list_json_is_keyed_by_normalized_url() {
    let state = StateDir::empty();
    state.yajn().args(&["add", "http://ci.example.com/job/my%20app", "--no-refresh"]).passes();

    let jobs = state.yajn().args(&["list", "-o", "json"]).passes().json();

    let record = &jobs["http://ci.example.com/job/my app/"];
    assert_eq!(record["name"], "my app");
    assert_eq!(record["status"], "");
    assert_eq!(record["building"], false);
}

#[test]
fn jobs_file_uses_versioned_envelope() {
    let state = StateDir::empty();
    state.yajn().args(&["add", APP, "--no-refresh"]).passes();

    let file = state.read_json("jobs.json");

    assert_eq!(file["v"], 1);
    assert!(file["writer"].is_string());
    assert_eq!(file["jobs"][APP]["url"], APP);
}

#[test]
fn add_page_without_job_is_a_usage_error() {
    let state = StateDir::empty();

    state
        .yajn()
        .args(&["add", "--page", "http://ci.example.com/view/all/"])
        .fails()
        .code(EXIT_USAGE)
        .stderr_has("no job in page URL");

    assert!(!state.path().join("jobs.json").exists());
}

#[test]
fn add_page_that_cannot_be_verified_is_not_tracked() {
    let state = StateDir::empty();

    // Nothing listens on the discard port, so the connection is refused.
    state
        .yajn()
        .args(&["add", "--page", "http://127.0.0.1:9/job/app/42/console"])
        .fails()
        .code(1)
        .stderr_has("could not verify Jenkins job");

    assert!(!state.path().join("jobs.json").exists());
}

#[test]
fn add_twice_keeps_one_entry() {
    let state = StateDir::empty();
    state.yajn().args(&["add", APP, "--no-refresh"]).passes();
    state.yajn().args(&["add", APP, "--no-refresh"]).passes().stdout_has("Already tracking");

    let jobs = state.yajn().args(&["list", "-o", "json"]).passes().json();
    assert_eq!(jobs.as_object().map(|m| m.len()), Some(1));
}

#[test]
fn add_invalid_url_is_a_usage_error() {
    let state = StateDir::empty();

    state
        .yajn()
        .args(&["add", "ci.example.com/job/app", "--no-refresh"])
        .fails()
        .code(EXIT_USAGE)
        .stderr_has("not an http(s) URL");

    assert!(!state.path().join("jobs.json").exists());
}

#[test]
fn remove_stops_tracking() {
    let state = StateDir::empty();
    state.yajn().args(&["add", APP, "--no-refresh"]).passes();

    state.yajn().args(&["remove", APP]).passes().stdout_has("Removed");

    state.yajn().args(&["list"]).passes().stdout_has("No jobs tracked");
}

#[test]
fn remove_untracked_url_fails() {
    let state = StateDir::empty();
    state.yajn().args(&["remove", APP]).fails().code(EXIT_NOT_TRACKED).stderr_has("not tracked");
}

#[test]
fn refresh_untracked_url_fails() {
    let state = StateDir::empty();
    state.yajn().args(&["refresh", APP]).fails().code(EXIT_NOT_TRACKED);
}

#[test]
fn set_reads_urls_from_stdin() {
    let state = StateDir::empty();
    state.yajn().args(&["add", APP, "--no-refresh"]).passes();

    state
        .yajn()
        .args(&["set", "-"])
        .stdin("# nightly\nhttp://ci.example.com/job/a/\n\nhttp://ci.example.com/job/b\n")
        .passes()
        .stdout_has("Tracking 2 job(s)");

    let jobs = state.yajn().args(&["list", "-o", "json"]).passes().json();
    let urls: Vec<_> = jobs.as_object().unwrap().keys().cloned().collect();
    assert_eq!(urls, vec!["http://ci.example.com/job/a/", "http://ci.example.com/job/b/"]);
}

#[test]
fn set_reads_urls_from_file() {
    let state = StateDir::empty();
    let list = state.file("urls.txt", "http://ci.example.com/job/a/\n");

    state
        .yajn()
        .args(&["set", "--file", list.to_str().unwrap()])
        .passes()
        .stdout_has("Tracking 1 job(s)");
}

#[test]
fn set_without_urls_is_a_usage_error() {
    let state = StateDir::empty();
    state.yajn().args(&["set"]).fails().code(EXIT_USAGE);
}

#[test]
fn status_of_untouched_jobs_is_idle() {
    let state = StateDir::empty();
    state.yajn().args(&["add", APP, "--no-refresh"]).passes();

    let status = state.yajn().args(&["status", "-o", "json"]).passes().json();

    assert_eq!(status["text"], "");
    assert_eq!(status["color"], "#777777");
    assert_eq!(status["tooltip"], "No jobs");
}

#[test]
fn status_reads_jobs_written_elsewhere() {
    let state = StateDir::empty();
    state.file(
        "jobs.json",
        r#"{"http://ci/job/a/": {"url": "http://ci/job/a/", "name": "a", "status": "Failure",
            "building": false, "lastBuildNumber": "3"}}"#,
    );

    state.yajn().args(&["status"]).passes().stdout_has("1 Failed");
}

#[test]
fn corrupt_jobs_file_is_set_aside() {
    let state = StateDir::empty();
    state.file("jobs.json", "{ not json");

    state.yajn().args(&["list"]).passes().stdout_has("No jobs tracked");

    assert!(state.path().join("jobs.bak").exists());
}
