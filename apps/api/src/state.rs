use std::sync::Arc;

use crate::repository::SkillRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence collaborator. Postgres in production, in-memory in router tests.
    pub repo: Arc<dyn SkillRepository>,
}
