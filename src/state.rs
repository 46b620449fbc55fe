//! Shared application state.

use std::sync::Arc;

use crate::{catalog::Catalog, config::Config, db::DbPool, mailer::Mailer};

/// State handed to every handler via Axum's `State` extractor.
///
/// Everything here is read-only after startup (the pool serializes all
/// mutable state in PostgreSQL), so a cheap clone per request is fine.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,
    pub catalog: Arc<Catalog>,
    pub mailer: Mailer,
}
