pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::roles::handlers as roles;
use crate::skills::handlers as skills;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Roles API
        .route("/api/v1/roles", get(roles::handle_list_roles))
        .route("/api/v1/roles/:id/fit", get(roles::handle_role_fit))
        // Skills API
        .route(
            "/api/v1/skills",
            get(skills::handle_list_skills).post(skills::handle_add_skill),
        )
        .route("/api/v1/skills/:id", delete(skills::handle_delete_skill))
        .route("/api/v1/skills/import", post(skills::handle_import))
        .route("/api/v1/skills/compare", post(skills::handle_compare))
        .route(
            "/api/v1/skills/:id/assessment",
            post(skills::handle_assessment),
        )
        .route("/api/v1/skills/:id/challenge", post(skills::handle_challenge))
        .with_state(state)
}
