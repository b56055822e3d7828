//! Persistence: read snapshots of roles and skills, write user skills.
//!
//! `AppState` holds an `Arc<dyn SkillRepository>`; handlers never touch the pool directly.
//! The scorer itself never writes back through here.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::role::{RoleRequirementRow, TargetRoleRow};
use crate::models::skill::{
    NewAssessmentAttempt, NewUserSkill, SkillRow, SkillScoreUpdate, UserSkillRow,
};

#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn list_roles(&self) -> Result<Vec<TargetRoleRow>, AppError>;

    async fn get_role(&self, role_id: Uuid) -> Result<Option<TargetRoleRow>, AppError>;

    async fn role_requirements(&self, role_id: Uuid) -> Result<Vec<RoleRequirementRow>, AppError>;

    /// User skills, highest confidence first.
    async fn user_skills(&self, user_id: Uuid) -> Result<Vec<UserSkillRow>, AppError>;

    async fn get_user_skill(&self, user_skill_id: Uuid) -> Result<Option<UserSkillRow>, AppError>;

    async fn skill_catalog(&self) -> Result<Vec<SkillRow>, AppError>;

    /// Case-insensitive exact match on the catalog name.
    async fn find_skill_by_name(&self, name: &str) -> Result<Option<SkillRow>, AppError>;

    async fn insert_skill(&self, name: &str, category: &str) -> Result<SkillRow, AppError>;

    /// Inserts a user skill and returns the stored row.
    async fn insert_user_skill(&self, skill: &NewUserSkill) -> Result<UserSkillRow, AppError>;

    /// Returns `false` when no row matched.
    async fn delete_user_skill(&self, user_skill_id: Uuid) -> Result<bool, AppError>;

    async fn record_assessment_attempt(&self, attempt: &NewAssessmentAttempt) -> Result<(), AppError>;

    async fn update_skill_scores(
        &self,
        user_skill_id: Uuid,
        update: SkillScoreUpdate,
    ) -> Result<(), AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres
// ────────────────────────────────────────────────────────────────────────────

pub struct PgSkillRepository {
    pool: PgPool,
}

impl PgSkillRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_SKILL_SELECT: &str = r#"
    SELECT us.id, us.user_id, us.skill_id, s.name AS skill_name, s.category,
           us.confidence_score, us.projects_score, us.time_score,
           us.assessment_score, us.contribution_score, us.last_used_at, us.updated_at
    FROM user_skills us
    JOIN skills s ON s.id = us.skill_id
"#;

#[async_trait]
impl SkillRepository for PgSkillRepository {
    async fn list_roles(&self) -> Result<Vec<TargetRoleRow>, AppError> {
        let roles = sqlx::query_as::<_, TargetRoleRow>(
            "SELECT id, name, category, description, created_at FROM target_roles ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    async fn get_role(&self, role_id: Uuid) -> Result<Option<TargetRoleRow>, AppError> {
        let role = sqlx::query_as::<_, TargetRoleRow>(
            "SELECT id, name, category, description, created_at FROM target_roles WHERE id = $1",
        )
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(role)
    }

    async fn role_requirements(&self, role_id: Uuid) -> Result<Vec<RoleRequirementRow>, AppError> {
        let rows = sqlx::query_as::<_, RoleRequirementRow>(
            r#"
            SELECT r.skill_id, s.name AS skill_name, s.category,
                   r.required_level, r.importance
            FROM role_skill_requirements r
            JOIN skills s ON s.id = r.skill_id
            WHERE r.role_id = $1
            ORDER BY r.importance
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;
        debug!("Loaded {} requirements for role {role_id}", rows.len());
        Ok(rows)
    }

    async fn user_skills(&self, user_id: Uuid) -> Result<Vec<UserSkillRow>, AppError> {
        let query = format!("{USER_SKILL_SELECT} WHERE us.user_id = $1 ORDER BY us.confidence_score DESC");
        let rows = sqlx::query_as::<_, UserSkillRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_user_skill(&self, user_skill_id: Uuid) -> Result<Option<UserSkillRow>, AppError> {
        let query = format!("{USER_SKILL_SELECT} WHERE us.id = $1");
        let row = sqlx::query_as::<_, UserSkillRow>(&query)
            .bind(user_skill_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn skill_catalog(&self) -> Result<Vec<SkillRow>, AppError> {
        let rows = sqlx::query_as::<_, SkillRow>("SELECT id, name, category FROM skills")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_skill_by_name(&self, name: &str) -> Result<Option<SkillRow>, AppError> {
        let row = sqlx::query_as::<_, SkillRow>(
            "SELECT id, name, category FROM skills WHERE lower(name) = lower($1) LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_skill(&self, name: &str, category: &str) -> Result<SkillRow, AppError> {
        let row = sqlx::query_as::<_, SkillRow>(
            r#"
            INSERT INTO skills (name, category, description)
            VALUES ($1, $2, 'Added by user')
            RETURNING id, name, category
            "#,
        )
        .bind(name)
        .bind(category)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_user_skill(&self, skill: &NewUserSkill) -> Result<UserSkillRow, AppError> {
        let row = sqlx::query_as::<_, UserSkillRow>(
            r#"
            WITH inserted AS (
                INSERT INTO user_skills
                    (user_id, skill_id, confidence_score, projects_score,
                     time_score, assessment_score, contribution_score)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            )
            SELECT us.id, us.user_id, us.skill_id, s.name AS skill_name, s.category,
                   us.confidence_score, us.projects_score, us.time_score,
                   us.assessment_score, us.contribution_score, us.last_used_at, us.updated_at
            FROM inserted us
            JOIN skills s ON s.id = us.skill_id
            "#,
        )
        .bind(skill.user_id)
        .bind(skill.skill_id)
        .bind(skill.confidence_score)
        .bind(skill.projects_score)
        .bind(skill.time_score)
        .bind(skill.assessment_score)
        .bind(skill.contribution_score)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_user_skill(&self, user_skill_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM user_skills WHERE id = $1")
            .bind(user_skill_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn record_assessment_attempt(&self, attempt: &NewAssessmentAttempt) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO user_assessment_attempts
                (user_id, skill_id, score, questions_answered, correct_answers, time_taken_seconds)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(attempt.user_id)
        .bind(attempt.skill_id)
        .bind(attempt.score)
        .bind(attempt.questions_answered)
        .bind(attempt.correct_answers)
        .bind(attempt.time_taken_seconds)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_skill_scores(
        &self,
        user_skill_id: Uuid,
        update: SkillScoreUpdate,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE user_skills
            SET confidence_score = $1,
                assessment_score = COALESCE($2, assessment_score),
                contribution_score = COALESCE($3, contribution_score),
                updated_at = now()
            WHERE id = $4
            "#,
        )
        .bind(update.confidence_score)
        .bind(update.assessment_score)
        .bind(update.contribution_score)
        .bind(user_skill_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User skill {user_skill_id} not found")));
        }
        Ok(())
    }
}
