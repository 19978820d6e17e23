//! Backend insert feed: rows inserted by any writer reach subscribers
//! exactly once, and the poll task stops on cancellation.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use serde_json::json;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use phishdrill::backend::supabase::SupabaseStore;
use phishdrill::backend::SubmissionStore;
use phishdrill::config::BackendCredentials;
use phishdrill::models::{SubmissionInput, Variant};
use phishdrill::GlobalConfig;

use super::backend_stub::StubBackend;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn store_for(base_url: &str) -> Arc<SupabaseStore> {
    let credentials = BackendCredentials {
        url: base_url.into(),
        anon_key: "test-anon-key".into(),
    };
    Arc::new(SupabaseStore::new(&credentials, &GlobalConfig::default()).expect("store"))
}

/// A row timestamped after the feed watermark, as other writers produce.
fn future_row(id: &str) -> String {
    let timestamp = Utc::now() + TimeDelta::hours(1);
    json!({
        "id": id,
        "email": format!("{id}@guestcompany.com"),
        "variant": "variant_b",
        "location_tag": null,
        "ip_address": null,
        "user_agent": null,
        "timestamp": timestamp.to_rfc3339(),
        "revealed": false
    })
    .to_string()
}

#[tokio::test]
async fn feed_publishes_rows_inserted_by_other_writers() {
    let (backend, base_url) = StubBackend::start().await;
    let store = store_for(&base_url);
    backend.enqueue_get(200, &format!("[{}]", future_row("remote-1")));

    let mut events = store.insert_events();
    let cancel = CancellationToken::new();
    let handle = Arc::clone(&store).spawn_insert_feed(POLL_INTERVAL, cancel.clone());

    let row = timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("feed delivers within the poll interval")
        .expect("channel open");
    assert_eq!(row.id, "remote-1");
    assert_eq!(row.variant, Variant::VariantB);

    cancel.cancel();
    handle.await.expect("feed task joins");
}

#[tokio::test]
async fn feed_does_not_republish_a_row_across_polls() {
    let (backend, base_url) = StubBackend::start().await;
    let store = store_for(&base_url);
    // Two polls answer with the same row, as the inclusive lower bound does.
    let row = future_row("remote-1");
    backend.enqueue_get(200, &format!("[{row}]"));
    backend.enqueue_get(200, &format!("[{row}]"));

    let mut events = store.insert_events();
    let cancel = CancellationToken::new();
    let handle = Arc::clone(&store).spawn_insert_feed(POLL_INTERVAL, cancel.clone());

    timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("first delivery")
        .expect("channel open");

    // Give the second scripted poll time to run, then drain.
    tokio::time::sleep(Duration::from_millis(300)).await;
    cancel.cancel();
    handle.await.expect("feed task joins");
    assert!(events.try_recv().is_err(), "row was published twice");
}

#[tokio::test]
async fn local_insert_is_published_once_even_when_the_poll_refetches_it() {
    let (backend, base_url) = StubBackend::start().await;
    let store = store_for(&base_url);

    let inserted_row = future_row("local-1");
    backend.enqueue_post(201, &inserted_row);
    backend.enqueue_get(200, &format!("[{inserted_row}]"));

    let mut events = store.insert_events();
    let cancel = CancellationToken::new();
    let handle = Arc::clone(&store).spawn_insert_feed(POLL_INTERVAL, cancel.clone());

    let input = SubmissionInput {
        email: "local-1@guestcompany.com".into(),
        variant: Variant::VariantB,
        location_tag: None,
        ip_address: None,
        user_agent: None,
    };
    store.insert_returning(input.into_row()).await.expect("row");

    let first = timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("local echo")
        .expect("channel open");
    assert_eq!(first.id, "local-1");

    tokio::time::sleep(Duration::from_millis(300)).await;
    cancel.cancel();
    handle.await.expect("feed task joins");
    assert!(events.try_recv().is_err(), "local insert echoed twice");
}

#[tokio::test]
async fn cancellation_stops_the_poll_task() {
    let (backend, base_url) = StubBackend::start().await;
    let store = store_for(&base_url);

    let cancel = CancellationToken::new();
    let handle = Arc::clone(&store).spawn_insert_feed(POLL_INTERVAL, cancel.clone());
    tokio::time::sleep(Duration::from_millis(120)).await;

    cancel.cancel();
    timeout(Duration::from_secs(2), handle)
        .await
        .expect("task stops after cancellation")
        .expect("feed task joins");

    let polls_after_cancel = backend.requests().len();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(backend.requests().len(), polls_after_cancel);
}
