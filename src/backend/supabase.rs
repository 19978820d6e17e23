//! PostgREST-backed submission store for a hosted Supabase project.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{BackendCredentials, GlobalConfig};
use crate::models::{NewSubmissionRow, SubmissionFilters, SubmissionRow};
use crate::{AppError, Result};

use super::SubmissionStore;

const EVENT_CAPACITY: usize = 256;

/// Dedup state for the insert feed. `seen` maps row ids to their insertion
/// instants so entries older than the watermark can be pruned.
#[derive(Default)]
struct FeedState {
    watermark: Option<DateTime<Utc>>,
    seen: HashMap<String, DateTime<Utc>>,
}

/// Submission store speaking the PostgREST dialect over HTTPS.
///
/// Rows inserted through this store are echoed directly onto the broadcast
/// feed backing [`SubmissionStore::insert_events`]; rows inserted by other
/// writers reach the same feed through the poller started by
/// [`SupabaseStore::spawn_insert_feed`]. The two paths share dedup state so
/// every insert is published exactly once.
pub struct SupabaseStore {
    http: Client,
    rest_url: String,
    anon_key: String,
    insert_tx: broadcast::Sender<SubmissionRow>,
    feed: Mutex<FeedState>,
}

impl SupabaseStore {
    /// Build a store from environment-supplied credentials and config.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Network`] if the HTTP client cannot be built.
    pub fn new(credentials: &BackendCredentials, config: &GlobalConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.http_timeout()).build()?;
        let base = credentials.url.trim_end_matches('/');
        let (insert_tx, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            http,
            rest_url: format!("{base}/rest/v1/{}", config.submissions_table),
            anon_key: credentials.anon_key.clone(),
            insert_tx,
            feed: Mutex::new(FeedState::default()),
        })
    }

    /// Spawn the backend insert feed: a background task polling the
    /// submissions table for rows inserted after the task started — by this
    /// process or any other writer — and publishing them on the channel
    /// behind [`SubmissionStore::insert_events`]. Rows predating the task
    /// are not replayed. The task runs until `cancel` fires.
    #[must_use]
    pub fn spawn_insert_feed(
        self: Arc<Self>,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        {
            let mut feed = self.feed.lock().unwrap_or_else(PoisonError::into_inner);
            if feed.watermark.is_none() {
                feed.watermark = Some(Utc::now());
            }
        }

        let store = self;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            loop {
                tokio::select! {
                    () = cancel.cancelled() => {
                        info!("insert feed shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        if let Err(err) = store.poll_feed_once().await {
                            warn!(%err, "insert feed poll failed");
                        }
                    }
                }
            }
        })
    }

    async fn poll_feed_once(&self) -> Result<()> {
        let since = self
            .feed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .watermark;

        let filters = SubmissionFilters {
            start_date: since,
            ..SubmissionFilters::default()
        };
        let mut rows = self.select_inner(filters).await?;
        // The backend answers newest first; publish in insertion order.
        rows.reverse();

        let mut feed = self.feed.lock().unwrap_or_else(PoisonError::into_inner);
        for row in rows {
            if feed.seen.contains_key(&row.id) {
                continue;
            }
            feed.seen.insert(row.id.clone(), row.timestamp);
            if feed.watermark.map_or(true, |mark| row.timestamp > mark) {
                feed.watermark = Some(row.timestamp);
            }
            let _ = self.insert_tx.send(row);
        }

        // The inclusive lower bound refetches rows at the watermark instant;
        // keep only those entries around for dedup.
        if let Some(mark) = feed.watermark {
            feed.seen.retain(|_, timestamp| *timestamp >= mark);
        }
        Ok(())
    }

    /// Publish a locally inserted row unless the poll feed already did.
    fn publish_insert(&self, row: &SubmissionRow) {
        let mut feed = self.feed.lock().unwrap_or_else(PoisonError::into_inner);
        if feed.watermark.is_some()
            && feed
                .seen
                .insert(row.id.clone(), row.timestamp)
                .is_some()
        {
            return;
        }
        let _ = self.insert_tx.send(row.clone());
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    async fn insert_inner(&self, row: NewSubmissionRow) -> Result<SubmissionRow> {
        let response = self
            .authed(self.http.post(&self.rest_url))
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, "application/vnd.pgrst.object+json")
            .json(&row)
            .send()
            .await?;

        let inserted: SubmissionRow = read_json(response).await?;
        debug!(
            id = %inserted.id,
            variant = inserted.variant.as_str(),
            "submission row inserted"
        );

        self.publish_insert(&inserted);
        Ok(inserted)
    }

    async fn select_inner(&self, filters: SubmissionFilters) -> Result<Vec<SubmissionRow>> {
        let mut request = self
            .authed(self.http.get(&self.rest_url))
            .query(&[("select", "*"), ("order", "timestamp.desc")]);

        if let Some(variant) = filters.variant {
            request = request.query(&[("variant", format!("eq.{}", variant.as_str()))]);
        }

        if let Some(start) = filters.start_date {
            request = request.query(&[("timestamp", format!("gte.{}", start.to_rfc3339()))]);
        }

        if let Some(end) = filters.end_date {
            request = request.query(&[("timestamp", format!("lte.{}", end.to_rfc3339()))]);
        }

        if let Some(tag) = &filters.location_tag {
            request = request.query(&[("location_tag", format!("eq.{tag}"))]);
        }

        if let Some(limit) = filters.effective_limit() {
            request = request.query(&[("limit", limit.to_string())]);
        }

        if let Some(offset) = filters.offset {
            request = request.query(&[("offset", offset.to_string())]);
        }

        let response = request.send().await?;
        read_json(response).await
    }

    async fn set_revealed_inner(&self, id: &str, revealed: bool) -> Result<SubmissionRow> {
        let response = self
            .authed(self.http.patch(&self.rest_url))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, "application/vnd.pgrst.object+json")
            .json(&serde_json::json!({ "revealed": revealed }))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_ACCEPTABLE {
            // PostgREST answers 406 when the single-object filter matches
            // zero rows.
            return Err(AppError::NotFound(format!("submission {id} not found")));
        }

        read_json(response).await
    }
}

impl SubmissionStore for SupabaseStore {
    fn insert_returning(
        &self,
        row: NewSubmissionRow,
    ) -> Pin<Box<dyn Future<Output = Result<SubmissionRow>> + Send + '_>> {
        Box::pin(self.insert_inner(row))
    }

    fn select(
        &self,
        filters: SubmissionFilters,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SubmissionRow>>> + Send + '_>> {
        Box::pin(self.select_inner(filters))
    }

    fn set_revealed(
        &self,
        id: &str,
        revealed: bool,
    ) -> Pin<Box<dyn Future<Output = Result<SubmissionRow>> + Send + '_>> {
        let id = id.to_owned();
        Box::pin(async move { self.set_revealed_inner(&id, revealed).await })
    }

    fn insert_events(&self) -> broadcast::Receiver<SubmissionRow> {
        self.insert_tx.subscribe()
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(AppError::Persistence(format!(
            "backend answered {status}: {body}"
        )));
    }

    serde_json::from_str(&body).map_err(AppError::from)
}
