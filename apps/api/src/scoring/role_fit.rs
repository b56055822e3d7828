//! Role-fit scorer: weighs a user's skill confidences against a role's requirements.
//!
//! Pure and total: every input, however sparse, yields a fully-populated `FitResult`.
//!
//! Algorithm:
//! 1. For each requirement, current level = user's confidence for that skill (0 if absent).
//! 2. skill_fit = min(100, current / required × 100), or 100 when required is 0.
//! 3. fit_score = round(Σ(skill_fit × weight) / Σ(weight)), weights 3 / 2 / 1 by importance.
//! 4. current < required → gap; otherwise → strength.
//! 5. Gaps sort by importance (critical first), then by gap size descending. Stable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::importance::Importance;

const MAX_LEVEL: i32 = 100;

// ────────────────────────────────────────────────────────────────────────────
// Inputs
// ────────────────────────────────────────────────────────────────────────────

/// One skill a role demands, at a minimum proficiency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub skill_id: Uuid,
    pub skill_name: String,
    pub required_level: i32,
    pub importance: Importance,
}

/// A user's current proficiency in one skill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserSkillLevel {
    pub skill_id: Uuid,
    pub confidence: i32,
}

// ────────────────────────────────────────────────────────────────────────────
// Outputs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill_id: Uuid,
    pub skill_name: String,
    pub current_level: u32,
    pub required_level: u32,
    pub importance: Importance,
    pub gap: u32, // 0 for strengths
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitResult {
    pub fit_score: u32, // 0 – 100
    pub gaps: Vec<SkillGap>,
    pub strengths: Vec<SkillGap>,
}

impl FitResult {
    pub fn empty() -> Self {
        FitResult {
            fit_score: 0,
            gaps: vec![],
            strengths: vec![],
        }
    }

    pub fn band(&self) -> FitBand {
        FitBand::from_score(self.fit_score)
    }
}

/// Coarse reading of a fit score for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitBand {
    High,
    Medium,
    Low,
}

impl FitBand {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 80 => FitBand::High,
            s if s >= 50 => FitBand::Medium,
            _ => FitBand::Low,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scorer
// ────────────────────────────────────────────────────────────────────────────

/// Builds the skill → confidence lookup `compute_fit` expects.
/// The first entry wins if a skill is listed twice.
pub fn user_level_map(levels: &[UserSkillLevel]) -> HashMap<Uuid, i32> {
    let mut map = HashMap::with_capacity(levels.len());
    for level in levels {
        map.entry(level.skill_id).or_insert(level.confidence);
    }
    map
}

/// Computes the weighted fit score, ranked gaps and strengths for one role.
///
/// Levels are clamped to [0, 100] before use. Skills missing from `user_levels`
/// count as confidence 0.
pub fn compute_fit(
    requirements: &[SkillRequirement],
    user_levels: &HashMap<Uuid, i32>,
) -> FitResult {
    if requirements.is_empty() {
        return FitResult::empty();
    }

    let mut gaps = Vec::new();
    let mut strengths = Vec::new();

    let mut total_weight = 0_u32;
    let mut weighted_sum = 0.0_f64;

    for req in requirements {
        let required_level = clamp_level(req.required_level);
        let current_level = clamp_level(user_levels.get(&req.skill_id).copied().unwrap_or(0));
        let weight = req.importance.weight();

        total_weight += weight;
        weighted_sum += skill_fit(current_level, required_level) * f64::from(weight);

        let entry = SkillGap {
            skill_id: req.skill_id,
            skill_name: req.skill_name.clone(),
            current_level,
            required_level,
            importance: req.importance,
            gap: required_level.saturating_sub(current_level),
        };

        if entry.gap > 0 {
            gaps.push(entry);
        } else {
            strengths.push(entry);
        }
    }

    gaps.sort_by(|a, b| {
        a.importance
            .rank()
            .cmp(&b.importance.rank())
            .then_with(|| b.gap.cmp(&a.gap))
    });

    let fit_score = if total_weight > 0 {
        (weighted_sum / f64::from(total_weight))
            .round()
            .clamp(0.0, 100.0) as u32
    } else {
        0
    };

    FitResult {
        fit_score,
        gaps,
        strengths,
    }
}

/// Percentage of a single requirement that is met, capped at 100.
fn skill_fit(current_level: u32, required_level: u32) -> f64 {
    if required_level == 0 {
        return 100.0;
    }
    (f64::from(current_level) / f64::from(required_level) * 100.0).min(100.0)
}

fn clamp_level(level: i32) -> u32 {
    level.clamp(0, MAX_LEVEL) as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn skill_id(n: u128) -> Uuid {
        Uuid::from_u128(n + 1)
    }

    fn req(n: u128, name: &str, required_level: i32, importance: &str) -> SkillRequirement {
        SkillRequirement {
            skill_id: skill_id(n),
            skill_name: name.to_string(),
            required_level,
            importance: Importance::parse(importance),
        }
    }

    fn levels(pairs: &[(u128, i32)]) -> HashMap<Uuid, i32> {
        pairs.iter().map(|(n, c)| (skill_id(*n), *c)).collect()
    }

    #[test]
    fn test_empty_requirements_yield_neutral_result() {
        let result = compute_fit(&[], &HashMap::new());
        assert_eq!(result, FitResult::empty());
        assert_eq!(result.fit_score, 0);
    }

    #[test]
    fn test_react_docker_scenario() {
        let requirements = vec![
            req(0, "React", 80, "critical"),
            req(1, "Docker", 60, "nice-to-have"),
        ];
        let result = compute_fit(&requirements, &levels(&[(0, 40), (1, 60)]));

        // (50×3 + 100×1) / 4 = 62.5 → 63
        assert_eq!(result.fit_score, 63);
        assert_eq!(result.gaps.len(), 1);
        assert_eq!(result.gaps[0].skill_name, "React");
        assert_eq!(result.gaps[0].gap, 40);
        assert_eq!(result.gaps[0].importance, Importance::Critical);
        assert_eq!(result.strengths.len(), 1);
        assert_eq!(result.strengths[0].skill_name, "Docker");
        assert_eq!(result.strengths[0].gap, 0);
    }

    #[test]
    fn test_over_qualification_is_capped() {
        let requirements = vec![req(0, "Git", 10, "critical"), req(1, "Rust", 100, "critical")];
        let result = compute_fit(&requirements, &levels(&[(0, 100)]));
        // Git capped at 100, Rust 0 → 50
        assert_eq!(result.fit_score, 50);
    }

    #[test]
    fn test_missing_user_skill_counts_as_zero() {
        let requirements = vec![req(0, "Kafka", 70, "important")];
        let missing = compute_fit(&requirements, &HashMap::new());
        let explicit = compute_fit(&requirements, &levels(&[(0, 0)]));
        assert_eq!(missing, explicit);
        assert_eq!(missing.gaps[0].current_level, 0);
        assert_eq!(missing.gaps[0].gap, 70);
    }

    #[test]
    fn test_zero_requirement_is_always_strength() {
        let requirements = vec![req(0, "Markdown", 0, "critical")];
        let result = compute_fit(&requirements, &HashMap::new());
        assert!(result.gaps.is_empty());
        assert_eq!(result.strengths.len(), 1);
        assert_eq!(result.fit_score, 100);
    }

    #[test]
    fn test_gaps_sorted_by_importance_then_size() {
        let requirements = vec![
            req(0, "Figma", 90, "nice-to-have"),
            req(1, "SQL", 60, "important"),
            req(2, "Go", 50, "critical"),
            req(3, "Kubernetes", 90, "important"),
            req(4, "Rust", 80, "critical"),
        ];
        let result = compute_fit(&requirements, &HashMap::new());
        let order: Vec<&str> = result.gaps.iter().map(|g| g.skill_name.as_str()).collect();
        assert_eq!(order, vec!["Rust", "Go", "Kubernetes", "SQL", "Figma"]);
    }

    #[test]
    fn test_equal_gaps_keep_requirement_order() {
        let requirements = vec![
            req(0, "First", 50, "important"),
            req(1, "Second", 50, "important"),
            req(2, "Third", 50, "important"),
        ];
        let result = compute_fit(&requirements, &HashMap::new());
        let order: Vec<&str> = result.gaps.iter().map(|g| g.skill_name.as_str()).collect();
        assert_eq!(order, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_unrecognized_importance_weighs_like_nice_to_have() {
        let requirements = vec![
            req(0, "Haskell", 80, "optional"),
            req(1, "Python", 60, "important"),
            req(2, "Java", 40, "critical"),
        ];
        let result = compute_fit(&requirements, &HashMap::new());
        assert_eq!(result.gaps.last().map(|g| g.skill_name.as_str()), Some("Haskell"));
        assert_eq!(result.gaps[2].importance, Importance::NiceToHave);

        // optional met (weight 1) + critical missed (weight 3) → 100 / 4 = 25
        let result = compute_fit(
            &[req(0, "Haskell", 80, "optional"), req(2, "Java", 40, "critical")],
            &levels(&[(0, 80)]),
        );
        assert_eq!(result.fit_score, 25);
    }

    #[test]
    fn test_out_of_range_levels_are_clamped() {
        let requirements = vec![req(0, "C", 150, "critical"), req(1, "Lua", -10, "important")];
        let result = compute_fit(&requirements, &levels(&[(0, 120), (1, -5)]));
        assert_eq!(result.fit_score, 100);
        assert!(result.gaps.is_empty());
        assert_eq!(result.strengths[0].required_level, 100);
        assert_eq!(result.strengths[0].current_level, 100);
        assert_eq!(result.strengths[1].required_level, 0);
    }

    #[test]
    fn test_user_level_map_keeps_first_entry() {
        let id = skill_id(7);
        let map = user_level_map(&[
            UserSkillLevel { skill_id: id, confidence: 40 },
            UserSkillLevel { skill_id: id, confidence: 90 },
        ]);
        assert_eq!(map.get(&id), Some(&40));
    }

    #[test]
    fn test_fit_band_thresholds() {
        assert_eq!(FitBand::from_score(100), FitBand::High);
        assert_eq!(FitBand::from_score(80), FitBand::High);
        assert_eq!(FitBand::from_score(79), FitBand::Medium);
        assert_eq!(FitBand::from_score(50), FitBand::Medium);
        assert_eq!(FitBand::from_score(49), FitBand::Low);
        assert_eq!(FitBand::from_score(0), FitBand::Low);
    }

    fn importance_strategy() -> impl Strategy<Value = Importance> {
        prop_oneof![
            Just("critical"),
            Just("important"),
            Just("nice-to-have"),
            Just("optional"),
            Just(""),
        ]
        .prop_map(Importance::parse)
    }

    /// Requirements with unique skill ids plus, per requirement, an optional user level.
    fn scenario_strategy() -> impl Strategy<Value = (Vec<SkillRequirement>, HashMap<Uuid, i32>)> {
        prop::collection::vec(
            (-20i32..130, importance_strategy(), prop::option::of(-20i32..130)),
            0..24,
        )
        .prop_map(|rows| {
            let mut requirements = Vec::with_capacity(rows.len());
            let mut user_levels = HashMap::new();
            for (i, (required_level, importance, confidence)) in rows.into_iter().enumerate() {
                let id = skill_id(i as u128);
                requirements.push(SkillRequirement {
                    skill_id: id,
                    skill_name: format!("skill-{i}"),
                    required_level,
                    importance,
                });
                if let Some(c) = confidence {
                    user_levels.insert(id, c);
                }
            }
            (requirements, user_levels)
        })
    }

    proptest! {
        #[test]
        fn fit_score_always_bounded((requirements, user_levels) in scenario_strategy()) {
            let result = compute_fit(&requirements, &user_levels);
            prop_assert!(result.fit_score <= 100, "fit_score {} out of range", result.fit_score);
        }

        #[test]
        fn every_requirement_lands_in_exactly_one_bucket((requirements, user_levels) in scenario_strategy()) {
            let result = compute_fit(&requirements, &user_levels);
            prop_assert_eq!(result.gaps.len() + result.strengths.len(), requirements.len());
            for req in &requirements {
                let in_gaps = result.gaps.iter().filter(|g| g.skill_id == req.skill_id).count();
                let in_strengths = result.strengths.iter().filter(|s| s.skill_id == req.skill_id).count();
                prop_assert_eq!(in_gaps + in_strengths, 1);
            }
        }

        #[test]
        fn gap_values_are_consistent((requirements, user_levels) in scenario_strategy()) {
            let result = compute_fit(&requirements, &user_levels);
            for gap in &result.gaps {
                prop_assert!(gap.gap > 0);
                prop_assert_eq!(gap.gap, gap.required_level - gap.current_level);
            }
            for strength in &result.strengths {
                prop_assert_eq!(strength.gap, 0);
                prop_assert!(strength.current_level >= strength.required_level);
            }
        }

        #[test]
        fn gaps_are_ordered((requirements, user_levels) in scenario_strategy()) {
            let result = compute_fit(&requirements, &user_levels);
            for pair in result.gaps.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.importance.rank() <= b.importance.rank());
                if a.importance == b.importance {
                    prop_assert!(a.gap >= b.gap);
                }
            }
        }

        #[test]
        fn zero_requirement_never_a_gap((requirements, user_levels) in scenario_strategy()) {
            let result = compute_fit(&requirements, &user_levels);
            prop_assert!(result.gaps.iter().all(|g| g.required_level > 0));
        }

        #[test]
        fn scoring_is_idempotent((requirements, user_levels) in scenario_strategy()) {
            let first = compute_fit(&requirements, &user_levels);
            let second = compute_fit(&requirements, &user_levels);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn missing_skill_scores_like_zero((requirements, user_levels) in scenario_strategy()) {
            let mut with_zeros = user_levels.clone();
            for req in &requirements {
                with_zeros.entry(req.skill_id).or_insert(0);
            }
            prop_assert_eq!(
                compute_fit(&requirements, &user_levels),
                compute_fit(&requirements, &with_zeros)
            );
        }
    }
}
