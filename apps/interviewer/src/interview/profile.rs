//! Candidate profile: the running aggregate of how the candidate is doing.
//!
//! The orchestrator is the only writer, through `update`, immediately after
//! each answer is scored. Everything else reads a snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::interview::models::{clamp_score, Difficulty};

/// A score at or above this marks the skill as a strength.
pub const STRENGTH_THRESHOLD: f64 = 80.0;
/// A score below this flags the skill as a weakness for the rest of the session.
pub const WEAKNESS_THRESHOLD: f64 = 60.0;
/// Number of most recent scores used to pick the preferred difficulty.
pub const DIFFICULTY_WINDOW: usize = 3;

const HARD_AVERAGE: f64 = 85.0;
const MEDIUM_AVERAGE: f64 = 70.0;

/// One performance sample, appended per assessment record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryEntry {
    pub skill: String,
    pub score: f64,
    pub difficulty: Difficulty,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CandidateProfile {
    role_context: String,
    focus_areas: Vec<String>,
    initial_difficulty: String,
    strengths: Vec<String>,
    weaknesses: Vec<String>,
    areas_needing_focus: Vec<String>,
    trajectory: Vec<TrajectoryEntry>,
    preferred_difficulty: Difficulty,
}

impl CandidateProfile {
    /// A fresh profile. Preferred difficulty starts at `Medium`.
    pub fn new(role_context: &str, focus_areas: &[String], initial_difficulty: &str) -> Self {
        Self {
            role_context: role_context.to_string(),
            focus_areas: focus_areas.to_vec(),
            initial_difficulty: initial_difficulty.to_string(),
            preferred_difficulty: Difficulty::Medium,
            ..Default::default()
        }
    }

    /// Records one scored answer.
    ///
    /// Weak skills are never removed: a skill flagged once stays flagged for
    /// the session even if later answers on it score well.
    pub fn update(&mut self, skill: &str, score: f64, difficulty: Difficulty) {
        self.trajectory.push(TrajectoryEntry {
            skill: skill.to_string(),
            score,
            difficulty,
            timestamp: Utc::now(),
        });

        if score >= STRENGTH_THRESHOLD {
            push_unique(&mut self.strengths, skill);
        } else if score < WEAKNESS_THRESHOLD {
            push_unique(&mut self.weaknesses, skill);
            push_unique(&mut self.areas_needing_focus, skill);
        }

        let recent = self.recent_scores(DIFFICULTY_WINDOW);
        if !recent.is_empty() {
            let average = recent.iter().map(|s| clamp_score(*s)).sum::<f64>() / recent.len() as f64;
            self.preferred_difficulty = difficulty_for_average(average);
        }
    }

    pub fn role_context(&self) -> &str {
        &self.role_context
    }

    pub fn focus_areas(&self) -> &[String] {
        &self.focus_areas
    }

    pub fn initial_difficulty(&self) -> &str {
        &self.initial_difficulty
    }

    pub fn strengths(&self) -> &[String] {
        &self.strengths
    }

    pub fn weaknesses(&self) -> &[String] {
        &self.weaknesses
    }

    pub fn areas_needing_focus(&self) -> &[String] {
        &self.areas_needing_focus
    }

    pub fn trajectory(&self) -> &[TrajectoryEntry] {
        &self.trajectory
    }

    pub fn preferred_difficulty(&self) -> Difficulty {
        self.preferred_difficulty
    }

    /// The last `n` raw scores, oldest first.
    pub fn recent_scores(&self, n: usize) -> Vec<f64> {
        let skip = self.trajectory.len().saturating_sub(n);
        self.trajectory[skip..].iter().map(|e| e.score).collect()
    }
}

/// ≥85 → Hard, ≥70 → Medium, otherwise Easy.
pub fn difficulty_for_average(average: f64) -> Difficulty {
    if average >= HARD_AVERAGE {
        Difficulty::Hard
    } else if average >= MEDIUM_AVERAGE {
        Difficulty::Medium
    } else {
        Difficulty::Easy
    }
}

fn push_unique(list: &mut Vec<String>, skill: &str) {
    if !list.iter().any(|s| s == skill) {
        list.push(skill.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CandidateProfile {
        CandidateProfile::new("Financial Analyst", &["Pivot Tables".to_string()], "Mixed")
    }

    #[test]
    fn test_new_profile_starts_medium_and_empty() {
        let p = profile();
        assert_eq!(p.preferred_difficulty(), Difficulty::Medium);
        assert_eq!(p.role_context(), "Financial Analyst");
        assert_eq!(p.focus_areas(), ["Pivot Tables".to_string()]);
        assert!(p.trajectory().is_empty());
        assert!(p.strengths().is_empty());
    }

    #[test]
    fn test_trajectory_is_append_only_in_call_order() {
        let mut p = profile();
        let calls = [("A", 50.0), ("B", 90.0), ("A", 75.0), ("C", 10.0), ("B", 65.0)];
        for (skill, score) in calls {
            p.update(skill, score, Difficulty::Medium);
        }
        assert_eq!(p.trajectory().len(), calls.len());
        for (entry, (skill, score)) in p.trajectory().iter().zip(calls) {
            assert_eq!(entry.skill, skill);
            assert_eq!(entry.score, score);
        }
    }

    #[test]
    fn test_strength_threshold_is_inclusive_80() {
        let mut p = profile();
        p.update("Lookups", 79.9, Difficulty::Easy);
        assert!(p.strengths().is_empty());
        p.update("Lookups", 80.0, Difficulty::Easy);
        assert_eq!(p.strengths(), ["Lookups".to_string()]);
        p.update("Lookups", 95.0, Difficulty::Hard);
        assert_eq!(p.strengths().len(), 1, "strengths must not duplicate");
    }

    #[test]
    fn test_weakness_is_never_removed() {
        let mut p = profile();
        p.update("Charts", 40.0, Difficulty::Medium);
        assert_eq!(p.weaknesses(), ["Charts".to_string()]);
        assert_eq!(p.areas_needing_focus(), ["Charts".to_string()]);

        p.update("Charts", 95.0, Difficulty::Hard);
        p.update("Charts", 100.0, Difficulty::Hard);
        assert_eq!(p.weaknesses(), ["Charts".to_string()]);
        assert_eq!(p.areas_needing_focus(), ["Charts".to_string()]);
        assert_eq!(p.strengths(), ["Charts".to_string()]);
    }

    #[test]
    fn test_weakness_threshold_is_exclusive_60() {
        let mut p = profile();
        p.update("IF Logic", 60.0, Difficulty::Medium);
        assert!(p.weaknesses().is_empty());
        p.update("IF Logic", 59.0, Difficulty::Medium);
        p.update("IF Logic", 20.0, Difficulty::Medium);
        assert_eq!(p.weaknesses(), ["IF Logic".to_string()]);
    }

    #[test]
    fn test_preferred_difficulty_uses_last_three_scores() {
        let mut p = profile();
        p.update("A", 90.0, Difficulty::Medium);
        assert_eq!(p.preferred_difficulty(), Difficulty::Hard);

        p.update("B", 50.0, Difficulty::Medium);
        // mean(90, 50) = 70
        assert_eq!(p.preferred_difficulty(), Difficulty::Medium);

        p.update("C", 40.0, Difficulty::Medium);
        // mean(90, 50, 40) = 60
        assert_eq!(p.preferred_difficulty(), Difficulty::Easy);

        p.update("D", 100.0, Difficulty::Medium);
        p.update("E", 100.0, Difficulty::Medium);
        // mean(40, 100, 100) = 80; the first 90 has rolled out of the window
        assert_eq!(p.preferred_difficulty(), Difficulty::Medium);
    }

    #[test]
    fn test_difficulty_for_average_boundaries() {
        assert_eq!(difficulty_for_average(85.0), Difficulty::Hard);
        assert_eq!(difficulty_for_average(84.99), Difficulty::Medium);
        assert_eq!(difficulty_for_average(70.0), Difficulty::Medium);
        assert_eq!(difficulty_for_average(69.99), Difficulty::Easy);
    }

    #[test]
    fn test_recent_scores_shorter_than_window() {
        let mut p = profile();
        p.update("A", 10.0, Difficulty::Easy);
        assert_eq!(p.recent_scores(3), vec![10.0]);
    }
}
