//! Import planning for skills extracted from a CV or detected on a GitHub profile.
//!
//! Planning is pure: names are normalised, matched against the catalog and
//! filtered against what the user already owns. The handler performs the inserts.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::skill::{NewUserSkill, SkillRow};
use crate::skills::confidence::{clamp_confidence, confidence_from_f64};

const DEFAULT_CONFIDENCE: i32 = 50;

/// Alias → canonical catalog name. Keys are lower-case.
const SKILL_ALIASES: &[(&str, &str)] = &[
    ("js", "JavaScript"),
    ("javascript", "JavaScript"),
    ("ts", "TypeScript"),
    ("typescript", "TypeScript"),
    ("py", "Python"),
    ("python", "Python"),
    ("react.js", "React"),
    ("reactjs", "React"),
    ("node.js", "Node.js"),
    ("nodejs", "Node.js"),
    ("vue.js", "Vue.js"),
    ("vuejs", "Vue.js"),
    ("angular.js", "Angular"),
    ("angularjs", "Angular"),
    ("postgres", "PostgreSQL"),
    ("postgresql", "PostgreSQL"),
    ("mongo", "MongoDB"),
    ("mongodb", "MongoDB"),
    ("aws", "AWS"),
    ("gcp", "Google Cloud"),
    ("azure", "Azure"),
    ("k8s", "Kubernetes"),
    ("kubernetes", "Kubernetes"),
    ("docker", "Docker"),
    ("git", "Git"),
    ("github", "GitHub"),
    ("gitlab", "GitLab"),
    ("css3", "CSS"),
    ("css", "CSS"),
    ("html5", "HTML"),
    ("html", "HTML"),
    ("sass", "Sass"),
    ("scss", "Sass"),
    ("tailwindcss", "Tailwind CSS"),
    ("tailwind", "Tailwind CSS"),
    ("nextjs", "Next.js"),
    ("next.js", "Next.js"),
    ("expressjs", "Express.js"),
    ("express.js", "Express.js"),
    ("express", "Express.js"),
];

const LEVEL_CONFIDENCE: &[(&str, i32)] = &[
    ("expert", 90),
    ("advanced", 80),
    ("senior", 80),
    ("proficient", 70),
    ("intermediate", 60),
    ("mid", 60),
    ("junior", 40),
    ("beginner", 30),
    ("learning", 20),
];

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A skill as reported by the CV analyser or the GitHub analyser.
/// Analysers report `confidence` as a plain number, possibly fractional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSkill {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillSource {
    Cv,
    Github,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPlan {
    pub to_insert: Vec<NewUserSkill>,
    pub skipped: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub imported: u32,
    pub skipped: u32,
    pub errors: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Normalisation
// ────────────────────────────────────────────────────────────────────────────

/// Maps common aliases ("k8s", "reactjs", ...) to catalog names.
/// Unknown names come back trimmed but otherwise untouched.
pub fn normalize_skill_name(name: &str) -> String {
    let trimmed = name.trim();
    let lower = trimmed.to_lowercase();
    SKILL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Converts a seniority word into a confidence score; unknown words score 50.
pub fn level_to_confidence(level: &str) -> i32 {
    let lower = level.trim().to_lowercase();
    LEVEL_CONFIDENCE
        .iter()
        .find(|(word, _)| *word == lower)
        .map(|(_, score)| *score)
        .unwrap_or(DEFAULT_CONFIDENCE)
}

/// Case-insensitive view over the skill catalog. Later duplicates win.
pub struct CatalogIndex<'a> {
    by_name: HashMap<String, &'a SkillRow>,
}

impl<'a> CatalogIndex<'a> {
    pub fn new(catalog: &'a [SkillRow]) -> Self {
        let by_name = catalog
            .iter()
            .map(|skill| (skill.name.to_lowercase(), skill))
            .collect();
        Self { by_name }
    }

    pub fn find(&self, name: &str) -> Option<&'a SkillRow> {
        self.by_name.get(&name.to_lowercase()).copied()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Planning
// ────────────────────────────────────────────────────────────────────────────

/// Plans which extracted skills become new `user_skills` rows.
///
/// Unknown skills and skills the user already has are counted as skipped.
/// Repeats within the batch stay in the plan; the import executor skips a repeat only once
/// an earlier row for the same skill has actually been stored.
pub fn plan_import(
    user_id: Uuid,
    source: SkillSource,
    extracted: &[ExtractedSkill],
    catalog: &[SkillRow],
    owned: &HashSet<Uuid>,
) -> ImportPlan {
    let index = CatalogIndex::new(catalog);
    let mut plan = ImportPlan::default();

    for skill in extracted {
        let normalized = normalize_skill_name(&skill.name);
        let Some(matched) = index.find(&normalized) else {
            plan.skipped += 1;
            continue;
        };
        if owned.contains(&matched.id) {
            plan.skipped += 1;
            continue;
        }

        let (confidence, contribution_share) = match source {
            SkillSource::Cv => (cv_confidence(skill), 0.5),
            SkillSource::Github => (
                skill
                    .confidence
                    .map(confidence_from_f64)
                    .unwrap_or(DEFAULT_CONFIDENCE),
                0.6,
            ),
        };
        let confidence = clamp_confidence(confidence);

        plan.to_insert.push(NewUserSkill {
            user_id,
            skill_id: matched.id,
            skill_name: matched.name.clone(),
            confidence_score: confidence,
            projects_score: None,
            time_score: None,
            assessment_score: None,
            contribution_score: Some((f64::from(confidence) * contribution_share).round() as i32),
        });
    }

    plan
}

/// CV skills: a stated level wins, then an explicit non-zero confidence, then 50.
fn cv_confidence(skill: &ExtractedSkill) -> i32 {
    if let Some(level) = skill.level.as_deref().filter(|l| !l.is_empty()) {
        return level_to_confidence(level);
    }
    match skill.confidence {
        Some(c) if c != 0.0 && c.is_finite() => confidence_from_f64(c),
        _ => DEFAULT_CONFIDENCE,
    }
}
