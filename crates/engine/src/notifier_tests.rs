// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::events::EventBus;
use crate::store::JobStore;
use std::sync::Arc;
use std::time::Duration;
use yajn_adapters::{FakeJenkinsAdapter, FakeNotifyAdapter};
use yajn_core::test_support::{leaf, view};
use yajn_core::JobMap;
use yajn_storage::MemoryStorage;

const APP: &str = "http://ci.example.com/job/app/";

fn record(status: BuildStatus, number: Option<u64>) -> JobRecord {
    let builder = JobRecord::builder().url(APP).name("app").status(status);
    match number {
        Some(n) => builder.last_build_number(n).build(),
        None => builder.build(),
    }
}

fn title(
    mode: NotificationMode,
    previous: Option<(BuildStatus, u64)>,
    current: (BuildStatus, u64),
) -> Option<String> {
    let previous = previous.map(|(status, n)| record(status, Some(n)));
    let current = record(current.0, Some(current.1));
    build_notification(mode, previous.as_ref(), &current).map(|n| n.title)
}

#[yare::parameterized(
    new_failure          = { NotificationMode::All, Some((BuildStatus::Success, 5)), (BuildStatus::Failure, 6), Some("Build Failure! - app") },
    same_build           = { NotificationMode::All, Some((BuildStatus::Success, 5)), (BuildStatus::Failure, 5), None },
    repeat_success       = { NotificationMode::All, Some((BuildStatus::Success, 5)), (BuildStatus::Success, 6), Some("Build Success! - app") },
    not_built            = { NotificationMode::All, Some((BuildStatus::Success, 5)), (BuildStatus::NotBuilt, 6), None },
    aborted              = { NotificationMode::All, Some((BuildStatus::Success, 5)), (BuildStatus::Aborted, 6), Some("Build Aborted! - app") },
    off                  = { NotificationMode::None, Some((BuildStatus::Success, 5)), (BuildStatus::Failure, 6), None },
    unstable_green_green = { NotificationMode::Unstable, Some((BuildStatus::Success, 5)), (BuildStatus::Success, 6), None },
    unstable_recovery    = { NotificationMode::Unstable, Some((BuildStatus::Failure, 5)), (BuildStatus::Success, 6), Some("Build back to stable! - app") },
    unstable_failure     = { NotificationMode::Unstable, Some((BuildStatus::Success, 5)), (BuildStatus::Failure, 6), Some("Build Failure! - app") },
    unstable_unstable    = { NotificationMode::Unstable, Some((BuildStatus::Success, 5)), (BuildStatus::Unstable, 6), Some("Build Unstable! - app") },
    unstable_first_build = { NotificationMode::Unstable, None, (BuildStatus::Success, 1), Some("Build Success! - app") },
    unstable_no_history  = { NotificationMode::Unstable, None, (BuildStatus::Success, 4), Some("Build back to stable! - app") },
)]
fn notification_title(
    mode: NotificationMode,
    previous: Option<(BuildStatus, u64)>,
    current: (BuildStatus, u64),
    expected: Option<&str>,
) {
    assert_eq!(title(mode, previous, current).as_deref(), expected);
}

#[test]
fn first_build_after_green_first_build_follows_normal_path() {
    let previous = record(BuildStatus::Success, Some(1));
    let current = record(BuildStatus::Success, Some(2));
    assert_eq!(build_notification(NotificationMode::Unstable, Some(&previous), &current), None);

    let current = record(BuildStatus::Failure, Some(2));
    assert!(build_notification(NotificationMode::Unstable, Some(&previous), &current).is_some());
}

#[test]
fn notification_addresses_the_build() {
    let previous = record(BuildStatus::Success, Some(5));
    let current = record(BuildStatus::Failure, Some(6));

    let n = build_notification(NotificationMode::All, Some(&previous), &current).unwrap();

    assert_eq!(n.id, "jenkins-http://ci.example.com/job/app/6");
    assert_eq!(n.message, "http://ci.example.com/job/app/6");
    assert_eq!(n.icon, None);
}

#[test]
fn missing_build_number_announces_nothing() {
    let previous = record(BuildStatus::Success, Some(5));
    let current = record(BuildStatus::Failure, None);
    assert_eq!(build_notification(NotificationMode::All, Some(&previous), &current), None);
}

#[test]
fn baseline_changes_announce_nothing() {
    let fetched = leaf(APP, BuildStatus::Success, 5);

    let added = JobChange::new(APP, None, Some(fetched.clone()));
    let from_placeholder =
        JobChange::new(APP, Some(TrackedJob::placeholder(APP)), Some(fetched.clone()));
    let from_failed_placeholder = JobChange::new(
        APP,
        Some(TrackedJob::placeholder(APP).with_error("Unreachable")),
        Some(fetched),
    );

    for change in [added, from_placeholder, from_failed_placeholder] {
        assert!(notifications_for(NotificationMode::All, &change).is_empty());
    }
}

#[test]
fn removal_announces_nothing() {
    let change = JobChange::new(APP, Some(leaf(APP, BuildStatus::Success, 5)), None);
    assert!(notifications_for(NotificationMode::All, &change).is_empty());
}

#[test]
fn views_are_compared_per_sub_job() {
    let url = "http://ci.example.com/view/main/";
    let sub = |name: &str, status, n: u64| {
        JobRecord::builder()
            .url(format!("http://ci.example.com/job/{name}/"))
            .name(name)
            .status(status)
            .last_build_number(n)
            .build()
    };
    let previous = view(
        url,
        vec![("a", sub("a", BuildStatus::Success, 1)), ("b", sub("b", BuildStatus::Success, 4))],
    );
    let current = view(
        url,
        vec![
            ("a", sub("a", BuildStatus::Success, 1)),
            ("b", sub("b", BuildStatus::Failure, 5)),
            ("c", sub("c", BuildStatus::Unstable, 2)),
        ],
    );

    let notifications =
        notifications_for(NotificationMode::All, &JobChange::new(url, Some(previous), Some(current)));

    let titles: Vec<_> = notifications.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Build Failure! - b", "Build Unstable! - c"]);
    assert_eq!(notifications[0].id, "jenkins-http://ci.example.com/job/b/5");
}

fn options(mode: NotificationMode) -> watch::Sender<Options> {
    watch::channel(Options { notification_mode: mode, ..Options::default() }).0
}

fn change(from: u64, to: u64, status: BuildStatus) -> JobChange {
    JobChange::new(
        APP,
        Some(leaf(APP, BuildStatus::Success, from)),
        Some(leaf(APP, status, to)),
    )
}

#[tokio::test]
async fn delivery_failures_are_isolated() {
    let fake = FakeNotifyAdapter::new();
    let other = "http://ci.example.com/job/other/";
    fake.fail_id("jenkins-http://ci.example.com/job/app/2");
    let tx = options(NotificationMode::All);
    let notifier = BuildNotifier::new(fake.clone(), tx.subscribe());

    let delivered = notifier
        .notify_changes(&[
            change(1, 2, BuildStatus::Failure),
            JobChange::new(
                other,
                Some(leaf(other, BuildStatus::Success, 8)),
                Some(leaf(other, BuildStatus::Failure, 9)),
            ),
        ])
        .await;

    assert_eq!(delivered, 1);
    assert_eq!(fake.attempts(), 2);
    assert_eq!(fake.titles(), vec!["Build Failure! - other".to_string()]);
}

#[tokio::test]
async fn icon_is_attached() {
    let fake = FakeNotifyAdapter::new();
    let tx = options(NotificationMode::All);
    let notifier =
        BuildNotifier::new(fake.clone(), tx.subscribe()).with_icon(Some("/icons/j.png".into()));

    notifier.notify_changes(&[change(1, 2, BuildStatus::Failure)]).await;

    assert_eq!(fake.shown()[0].icon.as_deref(), Some("/icons/j.png"));
}

struct Batch {
    store: Arc<JobStore<FakeJenkinsAdapter, MemoryStorage>>,
    jenkins: FakeJenkinsAdapter,
}

fn batch_with_previous_build(delay: Duration) -> Batch {
    let jenkins = FakeJenkinsAdapter::new();
    let mut jobs = JobMap::new();
    jobs.insert(APP.to_string(), leaf(APP, BuildStatus::Success, 5));
    let store =
        JobStore::open(jenkins.clone(), MemoryStorage::with_jobs(jobs), EventBus::new()).unwrap();
    jenkins.respond(APP, leaf(APP, BuildStatus::Failure, 6));
    jenkins.delay(APP, delay);
    Batch { store: Arc::new(store), jenkins }
}

#[tokio::test]
async fn pending_refreshes_are_notified_as_they_resolve() {
    let batch = batch_with_previous_build(Duration::ZERO);
    let fake = FakeNotifyAdapter::new();
    let tx = options(NotificationMode::All);
    let notifier = BuildNotifier::new(fake.clone(), tx.subscribe());

    let delivered = notifier.notify_pending(batch.store.refresh_all()).await;

    assert_eq!(delivered, 1);
    assert_eq!(fake.titles(), vec!["Build Failure! - app".to_string()]);
    assert_eq!(batch.jenkins.call_count(APP), 1);
}

#[tokio::test]
async fn batch_is_skipped_when_off() {
    let batch = batch_with_previous_build(Duration::ZERO);
    let fake = FakeNotifyAdapter::new();
    let tx = options(NotificationMode::None);
    let notifier = BuildNotifier::new(fake.clone(), tx.subscribe());

    assert_eq!(notifier.notify_pending(batch.store.refresh_all()).await, 0);
    assert!(fake.shown().is_empty());
}

#[tokio::test(start_paused = true)]
async fn mode_change_mid_batch_applies_to_next_batch() {
    let batch = batch_with_previous_build(Duration::from_secs(5));
    let fake = FakeNotifyAdapter::new();
    let tx = options(NotificationMode::All);
    let notifier = Arc::new(BuildNotifier::new(fake.clone(), tx.subscribe()));

    let running = tokio::spawn({
        let notifier = Arc::clone(&notifier);
        let pending = batch.store.refresh_all();
        async move { notifier.notify_pending(pending).await }
    });
    tokio::time::sleep(Duration::from_secs(1)).await;
    tx.send_replace(Options { notification_mode: NotificationMode::None, ..Options::default() });

    assert_eq!(running.await.unwrap(), 1);

    batch.jenkins.respond(APP, leaf(APP, BuildStatus::Success, 7));
    assert_eq!(notifier.notify_pending(batch.store.refresh_all()).await, 0);
    assert_eq!(fake.shown().len(), 1);
}
