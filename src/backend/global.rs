//! Process-wide backend store cell with lazy, idempotent construction.
//!
//! The first successful [`init_global_store`] wins; later calls return the
//! cached store. [`reset_global_store`] exists so tests can exercise
//! construction repeatedly without process restarts.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use crate::config::{BackendCredentials, GlobalConfig};
use crate::Result;

use super::supabase::SupabaseStore;

static STORE: Mutex<Option<Arc<SupabaseStore>>> = Mutex::new(None);

/// Return the cached store, constructing it on first call from
/// environment-supplied credentials. Safe under repeated and concurrent
/// calls; a failed construction is not cached, so a later call with the
/// environment fixed succeeds.
///
/// # Errors
///
/// Returns [`AppError::Config`](crate::AppError::Config) if credentials are
/// missing, or any [`SupabaseStore::new`] failure.
pub fn init_global_store(config: &GlobalConfig) -> Result<Arc<SupabaseStore>> {
    let mut cell = STORE.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(store) = cell.as_ref() {
        return Ok(Arc::clone(store));
    }

    let credentials = BackendCredentials::from_env()?;
    let store = Arc::new(SupabaseStore::new(&credentials, config)?);
    info!("backend store initialized");
    *cell = Some(Arc::clone(&store));
    Ok(store)
}

/// The cached store, if one has been constructed.
#[must_use]
pub fn try_global_store() -> Option<Arc<SupabaseStore>> {
    STORE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Drop the cached store so the next [`init_global_store`] reconstructs it.
pub fn reset_global_store() {
    let mut cell = STORE.lock().unwrap_or_else(PoisonError::into_inner);
    *cell = None;
}
