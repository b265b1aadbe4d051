#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Service Dispatch Tests
//!
//! ## Scenarios Covered
//!
//! 1. Capacity-one admit/reject/complete/readmit through the service
//! 2. Rejected dispatch leaves cached and persisted state untouched
//! 3. Repository failure leaves the cache untouched
//! 4. Event stream order matches dispatch order
//! 5. JSON payloads are validated before reaching the state machine
//! 6. State watchers are notified on commit
//! 7. A dispatch the caller stops waiting for still commits as a whole

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chunkgate_core::model::{EpochMillis, FailureReason};
use chunkgate_core::{ChunkEvent, ChunkSystemError, Command};
use chunkgate_engine::ChunkService;
use chunkgate_store::{ChunkRepository, FileRepository, InMemoryRepository};
use common::{clock_at, request, system_config, FlakyRepository};
use futures::StreamExt;
use tempfile::TempDir;

async fn memory_service(max: u32, now: u64) -> (ChunkService, Arc<InMemoryRepository>) {
    let repo = Arc::new(InMemoryRepository::new());
    let service = ChunkService::start(repo.clone(), &system_config(max), clock_at(now)).await;
    (service, repo)
}

#[tokio::test]
async fn test_capacity_one_lifecycle_through_service() {
    // GIVEN a service over an empty in-memory repository, max_concurrent = 1
    let (service, repo) = memory_service(1, 0).await;
    let a = request("overworld/0_0", 0, 100);
    let b = request("overworld/0_1", 0, 100);

    // WHEN A then B are scheduled
    service
        .dispatch(Command::Schedule { request: a.clone() })
        .await
        .unwrap();
    let rejected = service
        .dispatch(Command::Schedule { request: b.clone() })
        .await;

    // THEN B is rejected
    assert!(matches!(
        rejected,
        Err(ChunkSystemError::ResourceBudgetExceeded { .. })
    ));

    // WHEN A completes and B is retried THEN B is admitted
    service
        .dispatch(Command::Complete {
            request_id: a.id.clone(),
            completed_at: EpochMillis::from_millis(5),
        })
        .await
        .unwrap();
    let t = service
        .dispatch(Command::Schedule { request: b.clone() })
        .await
        .unwrap();

    assert_eq!(t.state.active(), &[b]);
    assert_eq!(service.current().tick(), 3);
    assert_eq!(repo.load().await.unwrap(), *service.current());
}

#[tokio::test]
async fn test_rejected_dispatch_changes_nothing() {
    // GIVEN one admitted request at capacity
    let (service, repo) = memory_service(1, 0).await;
    service
        .dispatch(Command::Schedule {
            request: request("a", 0, 100),
        })
        .await
        .unwrap();
    let cached_before = service.current();
    let persisted_before = repo.load().await.unwrap();

    // WHEN an unknown request is failed
    let result = service
        .dispatch(Command::Fail {
            request_id: request("ghost", 0, 1).id,
            occurred_at: EpochMillis::from_millis(1),
            reason: FailureReason::new("never existed").unwrap(),
        })
        .await;

    // THEN RequestNotFound and both copies of the state are unchanged
    assert!(matches!(
        result,
        Err(ChunkSystemError::RequestNotFound { .. })
    ));
    assert_eq!(*service.current(), *cached_before);
    assert_eq!(repo.load().await.unwrap(), persisted_before);
}

#[tokio::test]
async fn test_save_failure_leaves_cache_untouched() {
    // GIVEN a repository whose saves fail
    let repo = Arc::new(FlakyRepository::new(false, true));
    let service = ChunkService::start(repo.clone(), &system_config(2), clock_at(0)).await;

    // WHEN a valid schedule is dispatched
    let result = service
        .dispatch(Command::Schedule {
            request: request("a", 0, 100),
        })
        .await;

    // THEN the failure propagates unchanged and the cache stays at tick 0
    assert_eq!(
        result.unwrap_err(),
        ChunkSystemError::RepositoryFailure {
            reason: "disk full".to_string()
        }
    );
    assert_eq!(service.current().tick(), 0);
    assert!(service.current().active().is_empty());

    // WHEN the backend recovers THEN dispatch proceeds from tick 0
    repo.fail_save.store(false, Ordering::SeqCst);
    let t = service
        .dispatch(Command::Schedule {
            request: request("a", 0, 100),
        })
        .await
        .unwrap();
    assert_eq!(t.state.tick(), 1);
    assert_eq!(repo.save_count(), 1);
}

#[tokio::test]
async fn test_events_arrive_in_dispatch_order() {
    let (service, _repo) = memory_service(2, 0).await;
    let mut events = service.events();
    let a = request("a", 0, 100);

    service
        .dispatch(Command::Schedule { request: a.clone() })
        .await
        .unwrap();
    service
        .dispatch(Command::Complete {
            request_id: a.id.clone(),
            completed_at: EpochMillis::from_millis(9),
        })
        .await
        .unwrap();

    assert_eq!(
        events.next().await.unwrap().unwrap(),
        ChunkEvent::RequestQueued { request: a.clone() }
    );
    assert_eq!(
        events.next().await.unwrap().unwrap(),
        ChunkEvent::RequestCompleted {
            request_id: a.id,
            completed_at: EpochMillis::from_millis(9),
        }
    );
}

#[tokio::test]
async fn test_concurrent_dispatches_are_serialized() {
    // GIVEN a shared service with room for everything
    let (service, repo) = memory_service(16, 0).await;
    let service = Arc::new(service);

    // WHEN many schedules race
    let handles: Vec<_> = (0..10)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .dispatch(Command::Schedule {
                        request: request(&format!("race/{}", i), 0, 100),
                    })
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // THEN every one was applied exactly once
    assert_eq!(service.current().tick(), 10);
    assert_eq!(service.current().active().len(), 10);
    assert_eq!(repo.load().await.unwrap().tick(), 10);
}

#[tokio::test]
async fn test_dispatch_json_rejects_invalid_payload() {
    let (service, repo) = memory_service(1, 0).await;

    let result = service
        .dispatch_json(r#"{"type":"Complete","requestId":"not-a-uuid","completedAt":1}"#)
        .await;

    assert!(matches!(
        result,
        Err(ChunkSystemError::ValidationError { .. })
    ));
    assert_eq!(service.current().tick(), 0);
    assert!(repo.load().await.is_err());
}

#[tokio::test]
async fn test_dispatch_json_schedules_request() {
    let (service, _repo) = memory_service(1, 10).await;
    let payload = serde_json::json!({
        "type": "Schedule",
        "request": {
            "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "chunk": "overworld/2_2",
            "priority": "critical",
            "action": "load",
            "createdAt": 0,
            "deadline": 50
        }
    });

    let t = service.dispatch_json(&payload.to_string()).await.unwrap();

    assert_eq!(t.state.active().len(), 1);
    assert_eq!(
        t.state.active()[0].id.as_str(),
        "7c9e6679-7425-40de-944b-e07fc1f90ae7"
    );
}

#[tokio::test]
async fn test_watchers_see_committed_state() {
    let (service, _repo) = memory_service(1, 0).await;
    let mut watcher = service.watch_state();

    service
        .dispatch(Command::Schedule {
            request: request("a", 0, 100),
        })
        .await
        .unwrap();

    watcher.changed().await.unwrap();
    assert_eq!(watcher.borrow().tick(), 1);
}

#[tokio::test]
async fn test_abandoned_dispatch_keeps_cache_and_file_in_step() {
    // GIVEN a service over a file repository, watched for commits
    let dir = TempDir::new().unwrap();
    let repo = Arc::new(FileRepository::open(dir.path()));
    let service = ChunkService::start(repo.clone(), &system_config(8), clock_at(0)).await;
    let mut watcher = service.watch_state();
    let mut events = service.events();

    for round in 1..=3u64 {
        // WHEN the caller stops waiting as soon as the dispatch is in flight
        let command = Command::Schedule {
            request: request(&format!("overworld/{}_0", round), 0, 100),
        };
        let _ = tokio::time::timeout(Duration::ZERO, service.dispatch(command)).await;

        // THEN the commit still completes and the cache matches the file
        tokio::time::timeout(Duration::from_secs(5), watcher.changed())
            .await
            .expect("abandoned dispatch should still commit")
            .unwrap();
        let persisted = repo.load().await.unwrap();
        assert_eq!(persisted.tick(), round);
        assert_eq!(&persisted, service.current().as_ref());
    }

    // AND every abandoned commit published its event
    for _ in 0..3 {
        let event = events.next().await.unwrap().unwrap();
        assert!(matches!(event, ChunkEvent::RequestQueued { .. }));
    }

    // AND the next dispatch builds on all of them
    let t = service
        .dispatch(Command::Schedule {
            request: request("overworld/4_0", 0, 100),
        })
        .await
        .unwrap();
    assert_eq!(t.state.tick(), 4);
    assert_eq!(repo.load().await.unwrap().active().len(), 4);
}
