use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A catalog skill (`skills` table).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
}

/// A user's skill joined with its catalog name and category.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSkillRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub skill_id: Uuid,
    pub skill_name: String,
    pub category: String,
    pub confidence_score: i32,
    pub projects_score: Option<i32>,
    pub time_score: Option<i32>,
    pub assessment_score: Option<i32>,
    pub contribution_score: Option<i32>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for `user_skills`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserSkill {
    pub user_id: Uuid,
    pub skill_id: Uuid,
    pub skill_name: String,
    pub confidence_score: i32,
    pub projects_score: Option<i32>,
    pub time_score: Option<i32>,
    pub assessment_score: Option<i32>,
    pub contribution_score: Option<i32>,
}

/// Partial score update for an existing `user_skills` row.
/// `None` fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillScoreUpdate {
    pub confidence_score: i32,
    pub assessment_score: Option<i32>,
    pub contribution_score: Option<i32>,
}

/// Insert payload for `user_assessment_attempts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAssessmentAttempt {
    pub user_id: Uuid,
    pub skill_id: Uuid,
    pub score: i32,
    pub questions_answered: i32,
    pub correct_answers: i32,
    pub time_taken_seconds: Option<i32>,
}
