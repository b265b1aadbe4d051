#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::fs;
use std::time::Duration;

use chunkgate_core::ChunkSystemError;
use chunkgate_store::{ChunkRepository, FileRepository, LatencyRepository, STATE_FILE_NAME};
use common::{initial, scheduled};
use futures::StreamExt;
use tempfile::TempDir;

fn assert_repository_failure(err: ChunkSystemError) {
    assert!(
        matches!(err, ChunkSystemError::RepositoryFailure { .. }),
        "expected RepositoryFailure, got {:?}",
        err
    );
}

#[tokio::test]
async fn test_missing_document_is_repository_failure() {
    let dir = TempDir::new().unwrap();
    let repo = FileRepository::open(dir.path());

    assert_repository_failure(repo.load().await.unwrap_err());
}

#[tokio::test]
async fn test_state_survives_new_instance() {
    // GIVEN a state saved by one repository instance
    let dir = TempDir::new().unwrap();
    let t = scheduled(&initial(), "overworld/5_5");
    FileRepository::open(dir.path())
        .save(&t.state, &t.events)
        .await
        .unwrap();

    // WHEN a second instance opens the same directory
    let reopened = FileRepository::open(dir.path());

    // THEN it loads the identical state
    assert_eq!(reopened.load().await.unwrap(), t.state);
    assert!(dir.path().join(STATE_FILE_NAME).exists());
}

#[tokio::test]
async fn test_save_leaves_no_temp_files() {
    let dir = TempDir::new().unwrap();
    let repo = FileRepository::open(dir.path());
    let t = scheduled(&initial(), "a");

    repo.save(&t.state, &t.events).await.unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![STATE_FILE_NAME.to_string()]);
}

#[tokio::test]
async fn test_corrupt_document_is_repository_failure() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(STATE_FILE_NAME), b"{\"active\": 3").unwrap();

    let repo = FileRepository::open(dir.path());

    assert_repository_failure(repo.load().await.unwrap_err());
}

#[tokio::test]
async fn test_invalid_field_in_document_is_rejected() {
    // GIVEN a valid document whose chunk id was edited to an illegal value
    let dir = TempDir::new().unwrap();
    let repo = FileRepository::open(dir.path());
    let t = scheduled(&initial(), "good/0");
    repo.save(&t.state, &t.events).await.unwrap();

    let path = dir.path().join(STATE_FILE_NAME);
    let edited = fs::read_to_string(&path).unwrap().replace("good/0", "BAD CHUNK");
    fs::write(&path, edited).unwrap();

    // WHEN loading THEN validation rejects it
    assert_repository_failure(repo.load().await.unwrap_err());
}

#[tokio::test]
async fn test_events_published_after_write() {
    let dir = TempDir::new().unwrap();
    let repo = FileRepository::open(dir.path());
    let mut events = repo.observe();
    let t = scheduled(&initial(), "a");

    repo.save(&t.state, &t.events).await.unwrap();

    assert_eq!(events.next().await.unwrap().unwrap(), t.events[0]);
    assert_eq!(repo.load().await.unwrap().tick(), 1);
}

#[tokio::test]
async fn test_latency_over_file_backend() {
    let dir = TempDir::new().unwrap();
    let repo = LatencyRepository::with_min_latency(FileRepository::open(dir.path()));
    let t = scheduled(&initial(), "a");

    repo.save(&t.state, &t.events).await.unwrap();

    assert_eq!(repo.inner().load().await.unwrap(), t.state);
}

#[tokio::test]
async fn test_abandoned_save_still_publishes_its_events() {
    // GIVEN a subscriber on a file repository
    let dir = TempDir::new().unwrap();
    let repo = FileRepository::open(dir.path());
    let mut events = repo.observe();
    let t = scheduled(&initial(), "a");

    // WHEN the caller stops waiting as soon as the save is in flight
    let _ = tokio::time::timeout(Duration::ZERO, repo.save(&t.state, &t.events)).await;

    // THEN the write and its events still land together
    let delivered = tokio::time::timeout(Duration::from_secs(5), events.next())
        .await
        .expect("event for the abandoned save")
        .unwrap()
        .unwrap();
    assert_eq!(delivered, t.events[0]);
    assert_eq!(repo.load().await.unwrap(), t.state);
}

#[tokio::test]
async fn test_document_with_impossible_figures_is_rejected() {
    // GIVEN a saved document
    let dir = TempDir::new().unwrap();
    let repo = FileRepository::open(dir.path());
    let t = scheduled(&initial(), "a");
    repo.save(&t.state, &t.events).await.unwrap();
    let path = dir.path().join(STATE_FILE_NAME);
    let original: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();

    // WHEN the success ratio is pushed out of range THEN loading fails
    let mut doc = original.clone();
    doc["performance"]["throughput"]["successRatio"] = serde_json::json!(5.0);
    fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();
    assert_repository_failure(repo.load().await.unwrap_err());

    // WHEN the tick has no successor THEN loading fails
    let mut doc = original;
    doc["tick"] = serde_json::json!(u64::MAX);
    fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();
    assert_repository_failure(repo.load().await.unwrap_err());
}
