//! Integration tests for the metrics store over file storage.

use std::sync::Arc;

use tempfile::TempDir;

use jobdeck_dashboard::layout::{LoadState, StoreError};
use jobdeck_dashboard::metrics::{metrics_key, MetricsStore};
use jobdeck_dashboard::storage::{FileStorage, KeyValueStorage};
use jobdeck_dashboard::types::{MetricsUpdate, UserMetrics};

const USER: &str = "alice";

fn open_store(dir: &TempDir) -> MetricsStore {
    let storage = FileStorage::open(dir.path()).expect("Failed to open storage");
    let mut store = MetricsStore::new(Arc::new(storage));
    store.load(USER);
    store
}

#[test]
fn missing_metrics_default_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);

    assert_eq!(store.state(), LoadState::Ready);
    assert_eq!(store.metrics(), UserMetrics::default());
}

#[test]
fn partial_updates_merge_and_persist() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut store = open_store(&dir);
        store
            .update_metrics(MetricsUpdate {
                resume_progress: Some(70),
                streak_days: Some(3),
                ..Default::default()
            })
            .unwrap();
        store
            .update_metrics(MetricsUpdate {
                streak_days: Some(4),
                ..Default::default()
            })
            .unwrap();
    }

    let reopened = open_store(&dir);
    let metrics = reopened.metrics();
    assert_eq!(metrics.resume_progress, 70);
    assert_eq!(metrics.streak_days, 4);
    assert_eq!(metrics.applications_week, 0);
}

#[test]
fn persisted_json_uses_camel_case_keys() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(&dir);
    store
        .update_metrics(MetricsUpdate {
            deadlines_48h: Some(2),
            interviews_upcoming: Some(1),
            ..Default::default()
        })
        .unwrap();

    let storage = FileStorage::open(dir.path()).unwrap();
    let raw = storage.get(&metrics_key(USER)).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(value["deadlines48h"], 2);
    assert_eq!(value["interviewsUpcoming"], 1);
    assert_eq!(value["resumeProgress"], 0);
}

#[test]
fn malformed_metrics_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();
    storage
        .set(&metrics_key(USER), r#"{"resumeProgress": "lots"}"#)
        .unwrap();

    let store = open_store(&dir);

    assert_eq!(store.metrics(), UserMetrics::default());
}

#[test]
fn missing_fields_read_as_zero() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();
    storage
        .set(&metrics_key(USER), r#"{"streakDays": 9}"#)
        .unwrap();

    let store = open_store(&dir);

    assert_eq!(store.metrics().streak_days, 9);
    assert_eq!(store.metrics().resume_progress, 0);
}

#[test]
fn update_before_load_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();
    let mut store = MetricsStore::new(Arc::new(storage));

    let err = store
        .update_metrics(MetricsUpdate {
            streak_days: Some(1),
            ..Default::default()
        })
        .unwrap_err();

    assert_eq!(err, StoreError::NotReady(LoadState::Uninitialized));
}

#[tokio::test]
async fn subscribers_see_committed_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(&dir);
    let mut rx = store.subscribe();

    store
        .update_metrics(MetricsUpdate {
            applications_week: Some(6),
            ..Default::default()
        })
        .unwrap();

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().applications_week, 6);
}
