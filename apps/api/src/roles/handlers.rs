//! Axum route handlers for the Roles API.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::role::TargetRoleRow;
use crate::scoring::role_fit::{
    compute_fit, user_level_map, FitBand, SkillGap, SkillRequirement, UserSkillLevel,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct RoleCategory {
    pub category: String,
    pub roles: Vec<TargetRoleRow>,
}

#[derive(Debug, Serialize)]
pub struct RoleListResponse {
    pub categories: Vec<RoleCategory>,
}

#[derive(Debug, Serialize)]
pub struct RoleFitResponse {
    pub role: TargetRoleRow,
    pub fit_score: u32,
    pub band: FitBand,
    pub gaps: Vec<SkillGap>,
    pub strengths: Vec<SkillGap>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/roles
///
/// All target roles, grouped by category. Categories are alphabetical; roles keep
/// the store's name order.
pub async fn handle_list_roles(
    State(state): State<AppState>,
) -> Result<Json<RoleListResponse>, AppError> {
    let roles = state.repo.list_roles().await?;
    Ok(Json(RoleListResponse {
        categories: group_by_category(roles),
    }))
}

/// GET /api/v1/roles/:id/fit?user_id=
///
/// Weighted fit of the user's current skills against the role's requirements.
pub async fn handle_role_fit(
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<RoleFitResponse>, AppError> {
    let role = state
        .repo
        .get_role(role_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Role {role_id} not found")))?;

    let requirements: Vec<SkillRequirement> = state
        .repo
        .role_requirements(role_id)
        .await?
        .iter()
        .map(SkillRequirement::from)
        .collect();

    let levels: Vec<UserSkillLevel> = state
        .repo
        .user_skills(params.user_id)
        .await?
        .iter()
        .map(|s| UserSkillLevel {
            skill_id: s.skill_id,
            confidence: s.confidence_score,
        })
        .collect();

    let result = compute_fit(&requirements, &user_level_map(&levels));
    info!(
        "Role fit for user {} on '{}': {}% ({} gaps, {} strengths)",
        params.user_id,
        role.name,
        result.fit_score,
        result.gaps.len(),
        result.strengths.len()
    );

    Ok(Json(RoleFitResponse {
        band: result.band(),
        role,
        fit_score: result.fit_score,
        gaps: result.gaps,
        strengths: result.strengths,
    }))
}

fn group_by_category(roles: Vec<TargetRoleRow>) -> Vec<RoleCategory> {
    let mut grouped: BTreeMap<String, Vec<TargetRoleRow>> = BTreeMap::new();
    for role in roles {
        grouped.entry(role.category.clone()).or_default().push(role);
    }
    grouped
        .into_iter()
        .map(|(category, roles)| RoleCategory { category, roles })
        .collect()
}
