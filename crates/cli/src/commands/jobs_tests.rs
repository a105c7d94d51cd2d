// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::exit_error::{EXIT_NOT_TRACKED, EXIT_USAGE};
use yajn_adapters::{FakeJenkinsAdapter, FetchError};
use yajn_core::test_support::leaf;
use yajn_core::{BuildNumber, BuildStatus, JobMap};
use yajn_engine::EventBus;
use yajn_storage::MemoryStorage;

const APP: &str = "http://ci/job/app/";
const LIB: &str = "http://ci/job/lib/";

struct Harness {
    jenkins: FakeJenkinsAdapter,
    storage: MemoryStorage,
    store: Arc<JobStore<FakeJenkinsAdapter, MemoryStorage>>,
}

fn harness_with(jobs: JobMap) -> Harness {
    let jenkins = FakeJenkinsAdapter::new();
    let storage = MemoryStorage::with_jobs(jobs);
    let store =
        Arc::new(JobStore::open(jenkins.clone(), storage.clone(), EventBus::new()).unwrap());
    Harness { jenkins, storage, store }
}

fn harness() -> Harness {
    harness_with(JobMap::new())
}

fn tracked(urls: &[&str]) -> JobMap {
    urls.iter().map(|u| (u.to_string(), leaf(u, BuildStatus::Success, 1))).collect()
}

fn exit_code(err: &anyhow::Error) -> Option<i32> {
    err.downcast_ref::<ExitError>().map(|e| e.code)
}

fn add_args(url: &str) -> AddArgs {
    AddArgs { url: url.to_string(), page: false, no_refresh: false }
}

#[tokio::test]
async fn add_tracks_then_refreshes() {
    let h = harness();
    h.jenkins.respond(APP, leaf(APP, BuildStatus::Success, 7));

    let mut out = Vec::new();
    add(&h.store, add_args("http://ci/job/app"), &mut out).await.unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "Tracking http://ci/job/app/\napp: Success #7\n");
    assert_eq!(h.storage.saved_jobs()[APP], leaf(APP, BuildStatus::Success, 7));
}

fn page_args(url: &str) -> AddArgs {
    AddArgs { url: url.to_string(), page: true, no_refresh: false }
}

#[tokio::test]
async fn add_page_verifies_then_tracks_owning_job() {
    let h = harness();
    h.jenkins.respond(APP, leaf(APP, BuildStatus::Success, 42));

    let mut out = Vec::new();
    add(&h.store, page_args("http://ci/job/app/42/console"), &mut out).await.unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "Tracking http://ci/job/app/\napp: Success #42\n");
    assert_eq!(h.jenkins.calls(), vec![APP]);
    assert_eq!(h.storage.saved_jobs()[APP], leaf(APP, BuildStatus::Success, 42));
}

#[tokio::test]
async fn add_page_unreachable_job_is_not_tracked() {
    let h = harness();
    h.jenkins.fail(APP, FetchError::Status { code: 404, reason: "Not Found".to_string() });

    let err = add(&h.store, page_args("http://ci/job/app/42/"), &mut Vec::new()).await.unwrap_err();

    assert_eq!(exit_code(&err), None);
    assert!(err.to_string().starts_with("could not verify Jenkins job"), "{err}");
    assert!(h.store.get(APP).is_none());
    assert_eq!(h.storage.job_saves(), 0);
}

#[tokio::test]
async fn add_reports_failed_fetch_but_keeps_url() {
    let h = harness();

    let mut out = Vec::new();
    add(&h.store, add_args(APP), &mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.ends_with("app: fetch failed: Unreachable\n"), "{text}");
    assert_eq!(h.store.get(APP).unwrap().error(), Some("Unreachable"));
}

#[tokio::test]
async fn add_existing_url_says_so() {
    let h = harness_with(tracked(&[APP]));

    let mut out = Vec::new();
    let args = AddArgs { no_refresh: true, ..add_args(APP) };
    add(&h.store, args, &mut out).await.unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "Already tracking http://ci/job/app/\n");
}

#[yare::parameterized(
    not_http       = { "ftp://ci/job/app/", false },
    bare_scheme    = { "http://", false },
    page_without_job = { "http://ci/view/all/", true },
)]
fn add_rejects_bad_input_as_usage(url: &str, page: bool) {
    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    let h = harness();
    let args = AddArgs { url: url.to_string(), page, no_refresh: !page };

    let err = rt.block_on(add(&h.store, args, &mut Vec::new())).unwrap_err();

    assert_eq!(exit_code(&err), Some(EXIT_USAGE));
    assert_eq!(h.storage.job_saves(), 0);
}

#[test]
fn remove_tracked_url() {
    let h = harness_with(tracked(&[APP, LIB]));

    let mut out = Vec::new();
    remove(&h.store, "http://ci/job/app", &mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "Removed http://ci/job/app/\n");
    assert_eq!(h.storage.saved_jobs().keys().collect::<Vec<_>>(), vec![LIB]);
}

#[test]
fn remove_untracked_url_fails_without_writing() {
    let h = harness_with(tracked(&[LIB]));

    let err = remove(&h.store, APP, &mut Vec::new()).unwrap_err();

    assert_eq!(exit_code(&err), Some(EXIT_NOT_TRACKED));
    assert_eq!(h.storage.job_saves(), 0);
}

#[test]
fn url_list_skips_blanks_and_comments() {
    let text = "http://ci/job/a/\n\n  # staging\n  http://ci/job/b/  \n";
    assert_eq!(parse_url_list(text), vec!["http://ci/job/a/", "http://ci/job/b/"]);
}

#[test]
fn collect_urls_expands_stdin_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("urls.txt");
    std::fs::write(&file, "http://ci/job/c/\n").unwrap();
    let args = SetArgs { urls: vec![APP.to_string(), "-".to_string()], file: Some(file) };
    let mut stdin = "http://ci/job/b/\n".as_bytes();

    let urls = collect_urls(&args, &mut stdin).unwrap();

    assert_eq!(urls, vec![APP, "http://ci/job/b/", "http://ci/job/c/"]);
}

#[test]
fn collect_urls_requires_a_source() {
    let args = SetArgs { urls: vec![], file: None };
    let err = collect_urls(&args, &mut std::io::empty()).unwrap_err();
    assert_eq!(exit_code(&err), Some(EXIT_USAGE));
}

#[test]
fn set_replaces_tracked_urls_keeping_known_records() {
    let h = harness_with(tracked(&[APP, LIB]));

    let mut out = Vec::new();
    set(&h.store, &[APP.to_string(), "http://ci/job/new".to_string()], &mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "Tracking 2 job(s)\n");
    let saved = h.storage.saved_jobs();
    assert_eq!(saved[APP], leaf(APP, BuildStatus::Success, 1));
    assert!(saved["http://ci/job/new/"].is_placeholder());
    assert!(!saved.contains_key(LIB));
}

#[test]
fn set_with_invalid_url_changes_nothing() {
    let h = harness_with(tracked(&[APP]));

    let err = set(&h.store, &[LIB.to_string(), "not a url".to_string()], &mut Vec::new())
        .unwrap_err();

    assert_eq!(exit_code(&err), Some(EXIT_USAGE));
    assert_eq!(h.store.urls(), vec![APP]);
}

#[tokio::test]
async fn refresh_untracked_url_is_refused() {
    let h = harness();

    let err = refresh(&h.store, Some(APP), &mut Vec::new()).await.unwrap_err();

    assert_eq!(exit_code(&err), Some(EXIT_NOT_TRACKED));
    assert!(h.jenkins.calls().is_empty());
}

#[tokio::test]
async fn refresh_one_reports_new_state() {
    let h = harness_with(tracked(&[APP]));
    h.jenkins.respond(APP, leaf(APP, BuildStatus::Failure, 2));

    let mut out = Vec::new();
    refresh(&h.store, Some(APP), &mut out).await.unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "app: Failure #2\n");
}

#[tokio::test]
async fn refresh_all_counts_failures() {
    let h = harness_with(tracked(&[APP, LIB]));
    h.jenkins.respond(APP, leaf(APP, BuildStatus::Success, 2));

    let mut out = Vec::new();
    refresh(&h.store, None, &mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("app: Success #2\n"), "{text}");
    assert!(text.contains("lib: fetch failed: Unreachable\n"), "{text}");
    assert!(text.ends_with("Refreshed 2 job(s), 1 failed\n"), "{text}");
    let lib = h.store.get(LIB).unwrap();
    assert_eq!(lib.record().last_build_number, Some(BuildNumber::from(1u64)));
}

#[tokio::test]
async fn refresh_all_reports_every_job_when_saves_fail() {
    let h = harness_with(tracked(&[APP, LIB]));
    h.jenkins.respond(APP, leaf(APP, BuildStatus::Success, 2));
    h.jenkins.respond(LIB, leaf(LIB, BuildStatus::Success, 3));
    h.storage.fail_saves(true);

    let mut out = Vec::new();
    let err = refresh(&h.store, None, &mut out).await.unwrap_err();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains(&format!("{APP}: not saved: ")), "{text}");
    assert!(text.contains(&format!("{LIB}: not saved: ")), "{text}");
    assert!(text.ends_with("Refreshed 2 job(s), 2 failed\n"), "{text}");
    assert_eq!(err.to_string(), "2 refreshed job(s) could not be saved");
    assert_eq!(h.store.get(APP).unwrap(), leaf(APP, BuildStatus::Success, 1));
}
