//! CV vs GitHub skill comparison.
//!
//! Skills are merged by lower-cased name. Order: found in both sources first, then
//! CV-only, then GitHub-only; first-seen order inside each bucket.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::skill::{NewUserSkill, SkillRow};
use crate::skills::confidence::confidence_from_f64;
use crate::skills::import::{CatalogIndex, ExtractedSkill, ImportPlan};

const DEFAULT_GITHUB_CONFIDENCE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillComparison {
    pub name: String,
    pub category: Option<String>,
    pub in_cv: bool,
    pub in_github: bool,
    pub cv_level: Option<String>,
    pub github_confidence: Option<f64>,
}

impl SkillComparison {
    fn source_rank(&self) -> u8 {
        (if self.in_cv { 2 } else { 0 }) + (if self.in_github { 1 } else { 0 })
    }

    /// Confidence for a skill present in both sources: mean of the CV level's score
    /// and the GitHub confidence.
    pub fn combined_confidence(&self) -> i32 {
        let cv = cv_level_confidence(self.cv_level.as_deref());
        let github = self
            .github_confidence
            .filter(|c| *c != 0.0 && c.is_finite())
            .unwrap_or(DEFAULT_GITHUB_CONFIDENCE);
        confidence_from_f64((f64::from(cv) + github) / 2.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub common: Vec<SkillComparison>,
    pub cv_only: Vec<SkillComparison>,
    pub github_only: Vec<SkillComparison>,
}

/// Scale used for CV levels when combining with GitHub evidence.
/// Coarser than the import scale: only three levels are recognised.
fn cv_level_confidence(level: Option<&str>) -> i32 {
    match level {
        Some("expert") => 90,
        Some("advanced") => 75,
        Some("intermediate") => 55,
        _ => 35,
    }
}

/// Merges both skill lists into one ordered comparison.
pub fn compare_sources(
    cv_skills: &[ExtractedSkill],
    github_skills: &[ExtractedSkill],
) -> Vec<SkillComparison> {
    let mut order: Vec<String> = Vec::new();
    let mut merged: HashMap<String, SkillComparison> = HashMap::new();

    for skill in cv_skills {
        let key = skill.name.to_lowercase();
        if !merged.contains_key(&key) {
            order.push(key.clone());
        }
        merged.insert(
            key,
            SkillComparison {
                name: skill.name.clone(),
                category: skill.category.clone(),
                in_cv: true,
                in_github: false,
                cv_level: skill.level.clone(),
                github_confidence: None,
            },
        );
    }

    for skill in github_skills {
        let key = skill.name.to_lowercase();
        match merged.get_mut(&key) {
            Some(existing) => {
                existing.in_github = true;
                existing.github_confidence = skill.confidence;
            }
            None => {
                order.push(key.clone());
                merged.insert(
                    key,
                    SkillComparison {
                        name: skill.name.clone(),
                        category: skill.category.clone(),
                        in_cv: false,
                        in_github: true,
                        cv_level: None,
                        github_confidence: skill.confidence,
                    },
                );
            }
        }
    }

    let mut rows: Vec<SkillComparison> = order
        .into_iter()
        .filter_map(|key| merged.remove(&key))
        .collect();
    rows.sort_by(|a, b| b.source_rank().cmp(&a.source_rank()));
    rows
}

impl ComparisonReport {
    pub fn from_comparison(rows: Vec<SkillComparison>) -> Self {
        let mut report = ComparisonReport::default();
        for row in rows {
            match (row.in_cv, row.in_github) {
                (true, true) => report.common.push(row),
                (true, false) => report.cv_only.push(row),
                _ => report.github_only.push(row),
            }
        }
        report
    }
}

/// Plans the import of skills present in both sources.
/// Matching is exact on the lower-cased name; aliases are not applied here.
pub fn plan_common_import(
    user_id: Uuid,
    common: &[SkillComparison],
    catalog: &[SkillRow],
    owned: &HashSet<Uuid>,
) -> ImportPlan {
    let index = CatalogIndex::new(catalog);
    let mut plan = ImportPlan::default();

    for row in common.iter().filter(|r| r.in_cv && r.in_github) {
        match index.find(&row.name) {
            Some(matched) if !owned.contains(&matched.id) => {
                plan.to_insert.push(NewUserSkill {
                    user_id,
                    skill_id: matched.id,
                    skill_name: matched.name.clone(),
                    confidence_score: row.combined_confidence(),
                    projects_score: None,
                    time_score: None,
                    assessment_score: None,
                    contribution_score: None,
                });
            }
            _ => plan.skipped += 1,
        }
    }

    plan
}
