//! Trajectory policy: pure decisions over the profile and assessment history.
//!
//! Nothing here mutates state; the orchestrator calls these and acts on the
//! result.

use std::fmt;

use serde::Serialize;

use crate::interview::models::{clamp_score, AssessmentRecord};
use crate::interview::profile::TrajectoryEntry;

/// Below this many records the assessment always continues.
pub const MIN_RECORDS: usize = 4;
/// The plateau check only applies from this many records on.
pub const PLATEAU_MIN_RECORDS: usize = 6;
/// Number of most recent scores inspected by the plateau check.
pub const PLATEAU_WINDOW: usize = 4;
/// Max−min spread under which recent scores count as stable.
pub const PLATEAU_SPREAD: f64 = 15.0;
/// Distinct skills after which coverage is considered adequate.
pub const TARGET_SKILL_COVERAGE: usize = 5;
/// Number of trajectory entries used for trend classification.
pub const TREND_WINDOW: usize = 3;
/// Score movement needed to call a trend improving or declining.
pub const TREND_DELTA: f64 = 10.0;
/// Untested skills appended after the weak ones in a skill-gap list.
pub const MAX_UNTESTED_GAPS: usize = 2;

// ────────────────────────────────────────────────────────────────────────────
// Continue / stop
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    MinimumCoverageNotMet,
    MaxReached,
    PerformanceEstablished,
    SkillCoverageAchieved,
    ContinueAdaptive,
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DecisionReason::MinimumCoverageNotMet => "minimum coverage not met",
            DecisionReason::MaxReached => "max reached",
            DecisionReason::PerformanceEstablished => "performance level established",
            DecisionReason::SkillCoverageAchieved => "adequate skill coverage",
            DecisionReason::ContinueAdaptive => "continue adaptive assessment",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContinueDecision {
    pub should_continue: bool,
    pub reason: DecisionReason,
}

impl ContinueDecision {
    fn proceed(reason: DecisionReason) -> Self {
        Self {
            should_continue: true,
            reason,
        }
    }

    fn stop(reason: DecisionReason) -> Self {
        Self {
            should_continue: false,
            reason,
        }
    }
}

/// Decides whether to ask another question. Rules are checked in order and
/// the first match wins:
///
/// 1. fewer than 4 records → continue
/// 2. records ≥ `max_questions` → stop
/// 3. ≥ 6 records and the last 4 scores span less than 15 points → stop
/// 4. ≥ 5 distinct skills tested → stop
/// 5. otherwise continue
pub fn should_continue(
    records: &[AssessmentRecord],
    max_questions: usize,
    skills_tested_count: usize,
) -> ContinueDecision {
    if records.len() < MIN_RECORDS {
        return ContinueDecision::proceed(DecisionReason::MinimumCoverageNotMet);
    }

    if records.len() >= max_questions {
        return ContinueDecision::stop(DecisionReason::MaxReached);
    }

    if records.len() >= PLATEAU_MIN_RECORDS {
        let recent: Vec<f64> = records[records.len() - PLATEAU_WINDOW..]
            .iter()
            .map(|r| clamp_score(r.evaluation.score))
            .collect();
        if spread(&recent) < PLATEAU_SPREAD {
            return ContinueDecision::stop(DecisionReason::PerformanceEstablished);
        }
    }

    if skills_tested_count >= TARGET_SKILL_COVERAGE {
        return ContinueDecision::stop(DecisionReason::SkillCoverageAchieved);
    }

    ContinueDecision::proceed(DecisionReason::ContinueAdaptive)
}

// ────────────────────────────────────────────────────────────────────────────
// Trend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
            Trend::InsufficientData => "insufficient_data",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnalysis {
    pub trend: Trend,
    /// Mean of the scores in the trend window. `None` with insufficient data.
    pub recent_average: Option<f64>,
    /// `(min, max)` of the scores in the trend window.
    pub score_range: Option<(f64, f64)>,
}

/// Classifies the direction of the last few scores. The newest score is
/// compared with the oldest one in a window of up to 3 entries.
pub fn analyze_trend(trajectory: &[TrajectoryEntry]) -> TrendAnalysis {
    if trajectory.len() < 2 {
        return TrendAnalysis {
            trend: Trend::InsufficientData,
            recent_average: None,
            score_range: None,
        };
    }

    let window = &trajectory[trajectory.len().saturating_sub(TREND_WINDOW)..];
    let scores: Vec<f64> = window.iter().map(|e| clamp_score(e.score)).collect();

    let earliest = scores[0];
    let latest = scores[scores.len() - 1];
    let trend = if latest > earliest + TREND_DELTA {
        Trend::Improving
    } else if latest < earliest - TREND_DELTA {
        Trend::Declining
    } else {
        Trend::Stable
    };

    let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    TrendAnalysis {
        trend,
        recent_average: Some(scores.iter().sum::<f64>() / scores.len() as f64),
        score_range: Some((min, max)),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skill gaps
// ────────────────────────────────────────────────────────────────────────────

/// Weak skills in their existing order, then at most two known skills that
/// have not been tested yet, in catalogue order. Order matters: the result is
/// rendered into the next generation prompt as a priority list.
pub fn identify_skill_gaps(
    tested_skills: &[String],
    weak_skills: &[String],
    all_known_skills: &[String],
) -> Vec<String> {
    let untested = all_known_skills
        .iter()
        .filter(|skill| !tested_skills.contains(skill))
        .take(MAX_UNTESTED_GAPS)
        .cloned();

    weak_skills.iter().cloned().chain(untested).collect()
}

fn spread(scores: &[f64]) -> f64 {
    let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    max - min
}
