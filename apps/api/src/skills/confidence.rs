//! Confidence score arithmetic shared by the skill endpoints.

use serde::{Deserialize, Serialize};

use crate::models::skill::UserSkillRow;

const SUMMARY_LIMIT: usize = 3;

pub fn clamp_confidence(value: i32) -> i32 {
    value.clamp(0, 100)
}

/// Rounds a fractional confidence (analysers report plain numbers) into [0, 100].
/// Non-finite values count as 0.
pub fn confidence_from_f64(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    value.clamp(0.0, 100.0).round() as i32
}

fn round_share(value: i32, share: f64) -> i32 {
    (f64::from(value) * share).round() as i32
}

/// Component scores seeded from a single confidence value when a skill is added by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub projects_score: i32,
    pub time_score: i32,
    pub assessment_score: i32,
    pub contribution_score: i32,
}

impl ScoreBreakdown {
    /// 30% projects, 25% time, 25% assessment, 20% contribution.
    pub fn from_confidence(confidence: i32) -> Self {
        let confidence = clamp_confidence(confidence);
        Self {
            projects_score: round_share(confidence, 0.30),
            time_score: round_share(confidence, 0.25),
            assessment_score: round_share(confidence, 0.25),
            contribution_score: round_share(confidence, 0.20),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Assessments
// ────────────────────────────────────────────────────────────────────────────

/// Percentage of correct answers. Zero questions scores 0.
pub fn assessment_score(correct_answers: u32, questions_answered: u32) -> i32 {
    if questions_answered == 0 {
        return 0;
    }
    let pct = f64::from(correct_answers) / f64::from(questions_answered) * 100.0;
    clamp_confidence(pct.round() as i32)
}

/// Blends the previous confidence (60%) with a fresh assessment score (40%).
pub fn confidence_after_assessment(current_confidence: i32, assessment_score: i32) -> i32 {
    let blended = f64::from(current_confidence) * 0.6 + f64::from(assessment_score) * 0.4;
    clamp_confidence(blended.round() as i32)
}

// ────────────────────────────────────────────────────────────────────────────
// Coding challenges
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ChallengeDifficulty {
    Easy,
    Medium,
    Hard,
}

impl ChallengeDifficulty {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "hard" => ChallengeDifficulty::Hard,
            "medium" => ChallengeDifficulty::Medium,
            _ => ChallengeDifficulty::Easy,
        }
    }

    pub fn bonus(self) -> i32 {
        match self {
            ChallengeDifficulty::Hard => 15,
            ChallengeDifficulty::Medium => 10,
            ChallengeDifficulty::Easy => 5,
        }
    }
}

impl From<String> for ChallengeDifficulty {
    fn from(raw: String) -> Self {
        ChallengeDifficulty::parse(&raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeOutcome {
    pub confidence_score: i32,
    pub contribution_score: i32,
}

/// Scores after a completed challenge: contribution gets the full bonus on top of
/// confidence, confidence gets half of it (rounded up).
pub fn apply_challenge_bonus(
    current_confidence: i32,
    difficulty: ChallengeDifficulty,
) -> ChallengeOutcome {
    let current_confidence = clamp_confidence(current_confidence);
    let bonus = difficulty.bonus();
    ChallengeOutcome {
        confidence_score: clamp_confidence(current_confidence + (bonus + 1) / 2),
        contribution_score: clamp_confidence(current_confidence + bonus),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Profile summary
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillProfileSummary {
    pub total: usize,
    pub average_confidence: i32,
    pub top_skills: Vec<UserSkillRow>,
    pub weakest_skills: Vec<UserSkillRow>,
}

impl SkillProfileSummary {
    pub fn from_skills(skills: &[UserSkillRow]) -> Self {
        let total = skills.len();
        let average_confidence = if total > 0 {
            let sum: i64 = skills.iter().map(|s| i64::from(s.confidence_score)).sum();
            (sum as f64 / total as f64).round() as i32
        } else {
            0
        };

        let mut by_confidence: Vec<&UserSkillRow> = skills.iter().collect();
        by_confidence.sort_by(|a, b| b.confidence_score.cmp(&a.confidence_score));
        let top_skills = by_confidence
            .iter()
            .take(SUMMARY_LIMIT)
            .map(|s| (*s).clone())
            .collect();

        let mut ascending: Vec<&UserSkillRow> = skills.iter().collect();
        ascending.sort_by(|a, b| a.confidence_score.cmp(&b.confidence_score));
        let weakest_skills = ascending
            .iter()
            .take(SUMMARY_LIMIT)
            .map(|s| (*s).clone())
            .collect();

        Self {
            total,
            average_confidence,
            top_skills,
            weakest_skills,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_skill(name: &str, confidence: i32) -> UserSkillRow {
        UserSkillRow {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            skill_id: Uuid::new_v4(),
            skill_name: name.to_string(),
            category: "backend".to_string(),
            confidence_score: confidence,
            projects_score: None,
            time_score: None,
            assessment_score: None,
            contribution_score: None,
            last_used_at: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_breakdown_from_confidence() {
        let b = ScoreBreakdown::from_confidence(80);
        assert_eq!(b.projects_score, 24);
        assert_eq!(b.time_score, 20);
        assert_eq!(b.assessment_score, 20);
        assert_eq!(b.contribution_score, 16);
    }

    #[test]
    fn test_breakdown_clamps_input() {
        assert_eq!(
            ScoreBreakdown::from_confidence(250),
            ScoreBreakdown::from_confidence(100)
        );
        assert_eq!(ScoreBreakdown::from_confidence(-3).projects_score, 0);
    }

    #[test]
    fn test_assessment_score() {
        assert_eq!(assessment_score(4, 5), 80);
        assert_eq!(assessment_score(2, 3), 67);
        assert_eq!(assessment_score(0, 0), 0);
        assert_eq!(assessment_score(5, 5), 100);
    }

    #[test]
    fn test_confidence_after_assessment_blends_60_40() {
        // 50×0.6 + 80×0.4 = 30 + 32 = 62
        assert_eq!(confidence_after_assessment(50, 80), 62);
        assert_eq!(confidence_after_assessment(0, 100), 40);
        assert_eq!(confidence_after_assessment(100, 100), 100);
    }

    #[test]
    fn test_challenge_difficulty_parse() {
        assert_eq!(ChallengeDifficulty::parse("hard"), ChallengeDifficulty::Hard);
        assert_eq!(ChallengeDifficulty::parse("medium"), ChallengeDifficulty::Medium);
        assert_eq!(ChallengeDifficulty::parse("easy"), ChallengeDifficulty::Easy);
        assert_eq!(ChallengeDifficulty::parse("brutal"), ChallengeDifficulty::Easy);
    }

    #[test]
    fn test_challenge_bonus_rounds_half_up() {
        let easy = apply_challenge_bonus(60, ChallengeDifficulty::Easy);
        assert_eq!(easy.confidence_score, 63);
        assert_eq!(easy.contribution_score, 65);

        let hard = apply_challenge_bonus(60, ChallengeDifficulty::Hard);
        assert_eq!(hard.confidence_score, 68);
        assert_eq!(hard.contribution_score, 75);

        let medium = apply_challenge_bonus(60, ChallengeDifficulty::Medium);
        assert_eq!(medium.confidence_score, 65);
    }

    #[test]
    fn test_challenge_bonus_caps_at_100() {
        let outcome = apply_challenge_bonus(95, ChallengeDifficulty::Hard);
        assert_eq!(outcome.confidence_score, 100);
        assert_eq!(outcome.contribution_score, 100);
    }

    #[test]
    fn test_challenge_bonus_with_out_of_range_stored_value() {
        let outcome = apply_challenge_bonus(i32::MAX, ChallengeDifficulty::Hard);
        assert_eq!(outcome.confidence_score, 100);
        assert_eq!(outcome.contribution_score, 100);

        let outcome = apply_challenge_bonus(i32::MIN, ChallengeDifficulty::Easy);
        assert_eq!(outcome.confidence_score, 3);
        assert_eq!(outcome.contribution_score, 5);
    }

    #[test]
    fn test_confidence_from_f64() {
        assert_eq!(confidence_from_f64(72.5), 73);
        assert_eq!(confidence_from_f64(72.4), 72);
        assert_eq!(confidence_from_f64(180.0), 100);
        assert_eq!(confidence_from_f64(-4.0), 0);
        assert_eq!(confidence_from_f64(f64::NAN), 0);
    }

    #[test]
    fn test_summary_of_empty_profile() {
        let summary = SkillProfileSummary::from_skills(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_confidence, 0);
        assert!(summary.top_skills.is_empty());
        assert!(summary.weakest_skills.is_empty());
    }

    #[test]
    fn test_summary_top_and_weakest() {
        let skills = vec![
            make_skill("Rust", 90),
            make_skill("Go", 40),
            make_skill("SQL", 75),
            make_skill("CSS", 20),
            make_skill("Docker", 55),
        ];
        let summary = SkillProfileSummary::from_skills(&skills);
        assert_eq!(summary.total, 5);
        // 280 / 5 = 56
        assert_eq!(summary.average_confidence, 56);

        let top: Vec<&str> = summary.top_skills.iter().map(|s| s.skill_name.as_str()).collect();
        assert_eq!(top, vec!["Rust", "SQL", "Docker"]);

        let weak: Vec<&str> = summary
            .weakest_skills
            .iter()
            .map(|s| s.skill_name.as_str())
            .collect();
        assert_eq!(weak, vec!["CSS", "Go", "Docker"]);
    }
}
