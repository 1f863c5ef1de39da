//! HTTP API for the address book.

use anyhow::{anyhow, Result};
use axum::routing::get;
use axum::Router;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::net::TcpListener;

use crate::db::Database;

mod error;
mod payload;
mod routes;

pub use error::ApiError;
pub use payload::{parse_contact_patch, parse_new_contact, ValidationError};

/// Shared handler state. The database is opened once at startup and injected here.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Database>>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Run one storage call on the blocking pool while holding the connection lock.
    pub async fn with_db<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || f(&*lock_db(&db)))
            .await
            .map_err(|e| ApiError::Storage(anyhow!("storage worker join error: {e}")))?
            .map_err(ApiError::Storage)
    }
}

/// A panic inside a storage call poisons the lock but the connection stays
/// usable; an open rusqlite transaction rolls back when it is dropped.
fn lock_db(db: &Mutex<Database>) -> MutexGuard<'_, Database> {
    db.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("database lock was poisoned; recovering");
        db.clear_poison();
        PoisonError::into_inner(poisoned)
    })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/contacts",
            get(routes::list_contacts).post(routes::create_contact),
        )
        .route(
            "/contacts/{id}",
            get(routes::get_contact)
                .patch(routes::update_contact)
                .delete(routes::delete_contact),
        )
        .with_state(state)
}

/// Serve the API on `addr` until Ctrl-C.
pub async fn serve(db: Database, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow!("failed to bind HTTP on {addr}: {e}"))?;
    tracing::info!(addr = %listener.local_addr()?, "contactbook HTTP API ready");

    axum::serve(listener, router(AppState::new(db)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("contactbook HTTP API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(%e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
