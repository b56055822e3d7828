use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::scoring::importance::Importance;
use crate::scoring::role_fit::SkillRequirement;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TargetRoleRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// `role_skill_requirements` joined with the skill's name and category.
/// `importance` stays raw text here; it is decoded on conversion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoleRequirementRow {
    pub skill_id: Uuid,
    pub skill_name: String,
    pub category: String,
    pub required_level: i32,
    pub importance: String,
}

impl From<&RoleRequirementRow> for SkillRequirement {
    fn from(row: &RoleRequirementRow) -> Self {
        SkillRequirement {
            skill_id: row.skill_id,
            skill_name: row.skill_name.clone(),
            required_level: row.required_level,
            importance: Importance::parse(&row.importance),
        }
    }
}
