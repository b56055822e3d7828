//! Axum route handlers for the Skills API.

use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::skill::{
    NewAssessmentAttempt, NewUserSkill, SkillRow, SkillScoreUpdate, UserSkillRow,
};
use crate::repository::SkillRepository;
use crate::skills::comparison::{compare_sources, plan_common_import, ComparisonReport};
use crate::skills::confidence::{
    apply_challenge_bonus, assessment_score, clamp_confidence, confidence_after_assessment,
    ChallengeDifficulty, ChallengeOutcome, ScoreBreakdown, SkillProfileSummary,
};
use crate::skills::import::{plan_import, ExtractedSkill, ImportPlan, ImportResult, SkillSource};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SkillListResponse {
    pub skills: Vec<UserSkillRow>,
    pub summary: SkillProfileSummary,
}

#[derive(Debug, Deserialize)]
pub struct AddSkillRequest {
    pub user_id: Uuid,
    pub confidence: i32,
    #[serde(flatten)]
    pub skill: SkillRef,
}

/// Either an existing catalog skill, or a custom skill looked up by name and
/// created in the catalog when missing.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SkillRef {
    Catalog { skill_id: Uuid },
    Custom { name: String, category: String },
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub payload: ImportPayload,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ImportPayload {
    Cv {
        skills: Vec<ExtractedSkill>,
    },
    Github {
        skills: Vec<ExtractedSkill>,
    },
    Common {
        cv_skills: Vec<ExtractedSkill>,
        github_skills: Vec<ExtractedSkill>,
    },
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub cv_skills: Vec<ExtractedSkill>,
    #[serde(default)]
    pub github_skills: Vec<ExtractedSkill>,
}

#[derive(Debug, Deserialize)]
pub struct AssessmentRequest {
    pub correct_answers: u32,
    pub questions_answered: u32,
    #[serde(default)]
    pub time_taken_seconds: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub assessment_score: i32,
    pub previous_confidence: i32,
    pub confidence_score: i32,
}

#[derive(Debug, Deserialize)]
pub struct ChallengeRequest {
    pub difficulty: ChallengeDifficulty,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/skills?user_id=
pub async fn handle_list_skills(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<SkillListResponse>, AppError> {
    let skills = state.repo.user_skills(params.user_id).await?;
    let summary = SkillProfileSummary::from_skills(&skills);
    Ok(Json(SkillListResponse { skills, summary }))
}

/// POST /api/v1/skills
///
/// Adds a skill by hand, seeding the component scores from the confidence.
/// Custom names are matched case-insensitively against the catalog first.
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Json(request): Json<AddSkillRequest>,
) -> Result<(StatusCode, Json<UserSkillRow>), AppError> {
    let skill = resolve_skill(state.repo.as_ref(), &request.skill).await?;

    let owned = owned_skill_ids(state.repo.as_ref(), request.user_id).await?;
    if owned.contains(&skill.id) {
        return Err(AppError::Validation(format!(
            "{} is already in your skill profile",
            skill.name
        )));
    }

    let confidence = clamp_confidence(request.confidence);
    let breakdown = ScoreBreakdown::from_confidence(confidence);
    let new_skill = NewUserSkill {
        user_id: request.user_id,
        skill_id: skill.id,
        skill_name: skill.name.clone(),
        confidence_score: confidence,
        projects_score: Some(breakdown.projects_score),
        time_score: Some(breakdown.time_score),
        assessment_score: Some(breakdown.assessment_score),
        contribution_score: Some(breakdown.contribution_score),
    };
    let row = state.repo.insert_user_skill(&new_skill).await?;

    info!("Added {} ({confidence}%) for user {}", skill.name, request.user_id);
    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /api/v1/skills/:id
pub async fn handle_delete_skill(
    State(state): State<AppState>,
    Path(user_skill_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.repo.delete_user_skill(user_skill_id).await? {
        return Err(AppError::NotFound(format!(
            "User skill {user_skill_id} not found"
        )));
    }
    info!("Removed user skill {user_skill_id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/skills/import
///
/// Imports skills from a CV analysis, a GitHub analysis, or the skills both share.
/// Per-row insert failures are reported, not fatal.
pub async fn handle_import(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> Result<Json<ImportResult>, AppError> {
    let is_empty = match &request.payload {
        ImportPayload::Cv { skills } | ImportPayload::Github { skills } => skills.is_empty(),
        ImportPayload::Common {
            cv_skills,
            github_skills,
        } => cv_skills.is_empty() || github_skills.is_empty(),
    };
    if is_empty {
        return Err(AppError::Validation("no skills to import".to_string()));
    }

    let catalog = state.repo.skill_catalog().await?;
    let owned = owned_skill_ids(state.repo.as_ref(), request.user_id).await?;

    let plan = match &request.payload {
        ImportPayload::Cv { skills } => {
            plan_import(request.user_id, SkillSource::Cv, skills, &catalog, &owned)
        }
        ImportPayload::Github { skills } => {
            plan_import(request.user_id, SkillSource::Github, skills, &catalog, &owned)
        }
        ImportPayload::Common {
            cv_skills,
            github_skills,
        } => {
            let report = ComparisonReport::from_comparison(compare_sources(cv_skills, github_skills));
            plan_common_import(request.user_id, &report.common, &catalog, &owned)
        }
    };

    let result = execute_import(state.repo.as_ref(), plan).await;
    info!(
        "Imported {} skills for user {} ({} skipped, {} errors)",
        result.imported,
        request.user_id,
        result.skipped,
        result.errors.len()
    );
    Ok(Json(result))
}

/// POST /api/v1/skills/compare
pub async fn handle_compare(Json(request): Json<CompareRequest>) -> Json<ComparisonReport> {
    let rows = compare_sources(&request.cv_skills, &request.github_skills);
    Json(ComparisonReport::from_comparison(rows))
}

/// POST /api/v1/skills/:id/assessment
///
/// Records a finished quiz and blends its score into the skill's confidence.
pub async fn handle_assessment(
    State(state): State<AppState>,
    Path(user_skill_id): Path<Uuid>,
    Json(request): Json<AssessmentRequest>,
) -> Result<Json<AssessmentResponse>, AppError> {
    if request.questions_answered == 0 {
        return Err(AppError::Validation(
            "questions_answered must be at least 1".to_string(),
        ));
    }
    if request.correct_answers > request.questions_answered {
        return Err(AppError::Validation(
            "correct_answers cannot exceed questions_answered".to_string(),
        ));
    }

    let skill = find_user_skill(state.repo.as_ref(), user_skill_id).await?;
    let score = assessment_score(request.correct_answers, request.questions_answered);
    let confidence = confidence_after_assessment(skill.confidence_score, score);

    state
        .repo
        .record_assessment_attempt(&NewAssessmentAttempt {
            user_id: skill.user_id,
            skill_id: skill.skill_id,
            score,
            questions_answered: to_db_count(request.questions_answered),
            correct_answers: to_db_count(request.correct_answers),
            time_taken_seconds: request.time_taken_seconds.map(to_db_count),
        })
        .await?;

    state
        .repo
        .update_skill_scores(
            user_skill_id,
            SkillScoreUpdate {
                confidence_score: confidence,
                assessment_score: Some(score),
                contribution_score: None,
            },
        )
        .await?;

    Ok(Json(AssessmentResponse {
        assessment_score: score,
        previous_confidence: skill.confidence_score,
        confidence_score: confidence,
    }))
}

/// POST /api/v1/skills/:id/challenge
///
/// Applies the bonus for a completed coding challenge.
pub async fn handle_challenge(
    State(state): State<AppState>,
    Path(user_skill_id): Path<Uuid>,
    Json(request): Json<ChallengeRequest>,
) -> Result<Json<ChallengeOutcome>, AppError> {
    let skill = find_user_skill(state.repo.as_ref(), user_skill_id).await?;
    let outcome = apply_challenge_bonus(skill.confidence_score, request.difficulty);

    state
        .repo
        .update_skill_scores(
            user_skill_id,
            SkillScoreUpdate {
                confidence_score: outcome.confidence_score,
                assessment_score: None,
                contribution_score: Some(outcome.contribution_score),
            },
        )
        .await?;

    Ok(Json(outcome))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn owned_skill_ids(
    repo: &dyn SkillRepository,
    user_id: Uuid,
) -> Result<HashSet<Uuid>, AppError> {
    Ok(repo
        .user_skills(user_id)
        .await?
        .into_iter()
        .map(|s| s.skill_id)
        .collect())
}

async fn find_user_skill(
    repo: &dyn SkillRepository,
    user_skill_id: Uuid,
) -> Result<UserSkillRow, AppError> {
    repo.get_user_skill(user_skill_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User skill {user_skill_id} not found")))
}

async fn resolve_skill(repo: &dyn SkillRepository, skill: &SkillRef) -> Result<SkillRow, AppError> {
    match skill {
        SkillRef::Catalog { skill_id } => repo
            .skill_catalog()
            .await?
            .into_iter()
            .find(|s| s.id == *skill_id)
            .ok_or_else(|| AppError::NotFound(format!("Skill {skill_id} not found"))),
        SkillRef::Custom { name, category } => {
            let name = name.trim();
            let category = category.trim();
            if name.is_empty() || category.is_empty() {
                return Err(AppError::Validation(
                    "skill name and category are required".to_string(),
                ));
            }
            match repo.find_skill_by_name(name).await? {
                Some(existing) => Ok(existing),
                None => {
                    let created = repo.insert_skill(name, category).await?;
                    info!("Created catalog skill {} ({})", created.name, created.category);
                    Ok(created)
                }
            }
        }
    }
}

fn to_db_count(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Inserts planned rows one by one. A skill repeated in the batch is skipped
/// only after an earlier row for it was stored; a failed insert leaves the
/// next occurrence free to try again.
async fn execute_import(repo: &dyn SkillRepository, plan: ImportPlan) -> ImportResult {
    let mut result = ImportResult {
        skipped: plan.skipped,
        ..ImportResult::default()
    };
    let mut stored: HashSet<Uuid> = HashSet::new();

    for skill in &plan.to_insert {
        if stored.contains(&skill.skill_id) {
            result.skipped += 1;
            continue;
        }
        match repo.insert_user_skill(skill).await {
            Ok(_) => {
                stored.insert(skill.skill_id);
                result.imported += 1;
            }
            Err(e) => {
                warn!("Failed to import {}: {e}", skill.skill_name);
                result.errors.push(format!("{}: {e}", skill.skill_name));
            }
        }
    }

    result
}
