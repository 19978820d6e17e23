use std::sync::Arc;

use phishdrill::models::{SubmissionInput, Variant};
use phishdrill::submission::{SubmissionService, SubmissionState};
use phishdrill::validation::EMAIL_INVALID;

use super::support::{test_config, StubStore};

fn valid_input() -> SubmissionInput {
    SubmissionInput {
        email: "a@b.com".into(),
        variant: Variant::VariantA,
        location_tag: Some("breakroom".into()),
        ip_address: Some("203.0.113.7".into()),
        user_agent: Some("Mozilla/5.0".into()),
    }
}

#[tokio::test]
async fn happy_path_transitions_idle_to_success() {
    let store = Arc::new(StubStore::new());
    let mut service = SubmissionService::new(store.clone(), test_config());
    assert_eq!(service.state(), SubmissionState::Idle);

    let record = service.submit(valid_input()).await.expect("record");

    assert_eq!(service.state(), SubmissionState::Success);
    assert!(!record.id.is_empty());
    assert!(!record.revealed);
    assert_eq!(record.email, "a@b.com");
    assert_eq!(record.variant, Variant::VariantA);
    assert_eq!(service.last_submission(), Some(&record));
    assert_eq!(service.error_message(), None);
    assert_eq!(store.rows().len(), 1);
}

#[tokio::test]
async fn backend_rejection_transitions_to_error_with_no_partial_record() {
    let store = Arc::new(StubStore::failing());
    let mut service = SubmissionService::new(store, test_config());

    let outcome = service.submit(valid_input()).await;

    assert_eq!(outcome, None);
    assert_eq!(service.state(), SubmissionState::Error);
    assert_eq!(service.last_submission(), None);
    assert!(service
        .error_message()
        .is_some_and(|msg| msg.contains("insert rejected")));
}

#[tokio::test]
async fn missing_backend_client_short_circuits_without_io() {
    let mut service = SubmissionService::without_store(test_config());

    let outcome = service.submit(valid_input()).await;

    assert_eq!(outcome, None);
    assert_eq!(service.state(), SubmissionState::Error);
    assert!(service
        .error_message()
        .is_some_and(|msg| msg.contains("unavailable")));
}

#[tokio::test]
async fn malformed_email_is_rejected_before_the_insert() {
    let store = Arc::new(StubStore::new());
    let mut service = SubmissionService::new(store.clone(), test_config());

    let mut input = valid_input();
    input.email = "not-an-email".into();
    let outcome = service.submit(input).await;

    assert_eq!(outcome, None);
    assert_eq!(service.state(), SubmissionState::Error);
    assert_eq!(service.error_message(), Some(EMAIL_INVALID));
    assert!(store.rows().is_empty());
}

#[tokio::test]
async fn failed_ip_lookup_degrades_to_null_without_failing_the_submission() {
    let store = Arc::new(StubStore::new());
    // test_config points the IP echo endpoint at a dead local port.
    let mut service = SubmissionService::new(store, test_config());

    let mut input = valid_input();
    input.ip_address = None;
    let record = service.submit(input).await.expect("record");

    assert_eq!(service.state(), SubmissionState::Success);
    assert_eq!(record.ip_address, None);
}

#[tokio::test]
async fn fresh_submit_leaves_the_previous_terminal_state() {
    let store = Arc::new(StubStore::new());
    let mut service = SubmissionService::new(store, test_config());

    let mut bad = valid_input();
    bad.email = "broken".into();
    assert_eq!(service.submit(bad).await, None);
    assert_eq!(service.state(), SubmissionState::Error);

    let record = service.submit(valid_input()).await;
    assert!(record.is_some());
    assert_eq!(service.state(), SubmissionState::Success);
    assert_eq!(service.error_message(), None);
}

#[tokio::test]
async fn clear_error_drops_the_message_but_keeps_the_state() {
    let mut service = SubmissionService::without_store(test_config());
    service.submit(valid_input()).await;
    assert!(service.error_message().is_some());

    service.clear_error();
    assert_eq!(service.error_message(), None);
    assert_eq!(service.state(), SubmissionState::Error);
}
