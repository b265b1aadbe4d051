#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use chunkgate_core::errors::{ChunkSystemError, ExError, ExErrorKind};
use chunkgate_core::{apply_command, Command};
use chunkgate_core_types::CorrelationId;
use common::{fresh, request, schedule};

#[test]
fn test_budget_exceeded_carries_request_and_budget() {
    // GIVEN a full capacity-one state
    let (state, clock) = fresh(1, 0);
    let state = schedule(&state, &request("a", 0, 100), &clock);
    let rejected = request("b", 0, 100);

    // WHEN a second request is scheduled
    let err = apply_command(
        &state,
        Command::Schedule {
            request: rejected.clone(),
        },
        &clock,
    )
    .unwrap_err();

    // THEN the structured error names the rejected request
    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::ResourceBudgetExceeded);
    assert_eq!(ex_err.code(), "ERR_RESOURCE_BUDGET_EXCEEDED");
    assert_eq!(ex_err.entity_id(), Some(rejected.id.as_str()));
    assert!(ex_err.message().contains("test-budget"));
}

#[test]
fn test_not_found_verifiable_by_kind() {
    let err = ChunkSystemError::RequestNotFound {
        id: "unknown".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.code(), "ERR_NOT_FOUND");
    assert_eq!(ex_err.entity_id(), Some("unknown"));
}

#[test]
fn test_repository_failure_maps_to_persistence() {
    let ex_err: ExError = ChunkSystemError::repository("state.json: permission denied").into();

    assert_eq!(ex_err.kind(), ExErrorKind::Persistence);
    assert!(ex_err.message().contains("permission denied"));
}

#[test]
fn test_validation_maps_to_invalid_input() {
    let ex_err: ExError = ChunkSystemError::validation("bad chunk").into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(ex_err.message(), "bad chunk");
}

#[test]
fn test_correlation_id_rendered() {
    let correlation_id = CorrelationId::from_string("corr-42".to_string());
    let ex_err = ExError::new(ExErrorKind::InvalidTransition)
        .with_op("dispatch")
        .with_correlation_id(correlation_id.clone());

    assert_eq!(ex_err.correlation_id(), Some(&correlation_id));
    assert!(ex_err.to_string().contains("(correlation_id: corr-42)"));
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (
            ExErrorKind::ResourceBudgetExceeded,
            "ERR_RESOURCE_BUDGET_EXCEEDED",
        ),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::InvalidTransition, "ERR_INVALID_TRANSITION"),
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}
