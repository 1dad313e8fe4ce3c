//! Performance metrics: the summary block attached to final results.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::interview::models::{clamp_score, AssessmentRecord, Grade};
use crate::interview::policy::{analyze_trend, Trend};
use crate::interview::profile::CandidateProfile;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillPerformance {
    pub attempts: usize,
    pub average_score: f64,
    pub latest_grade: Grade,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub total_questions: usize,
    pub average_score: f64,
    /// Keyed by grade label so the JSON reads `{"Satisfactory": 3, ...}`.
    pub grade_distribution: BTreeMap<String, usize>,
    /// Share of answers graded Satisfactory or Partly Acceptable, 0–100.
    pub pass_rate: f64,
    pub skill_performance: BTreeMap<String, SkillPerformance>,
    pub trend: Trend,
}

impl PerformanceMetrics {
    pub fn compute(records: &[AssessmentRecord], profile: &CandidateProfile) -> Self {
        let total = records.len();

        let mut grade_distribution = BTreeMap::new();
        let mut skill_scores: BTreeMap<String, (Vec<f64>, Grade)> = BTreeMap::new();
        let mut passing = 0usize;
        let mut score_sum = 0.0;

        for record in records {
            let grade = record.evaluation.grade;
            let score = clamp_score(record.evaluation.score);

            *grade_distribution
                .entry(grade.as_str().to_string())
                .or_insert(0) += 1;
            if grade.is_passing() {
                passing += 1;
            }
            score_sum += score;

            let entry = skill_scores
                .entry(record.question.skill.clone())
                .or_insert_with(|| (Vec::new(), grade));
            entry.0.push(score);
            entry.1 = grade;
        }

        let skill_performance = skill_scores
            .into_iter()
            .map(|(skill, (scores, latest_grade))| {
                let average_score = scores.iter().sum::<f64>() / scores.len() as f64;
                (
                    skill,
                    SkillPerformance {
                        attempts: scores.len(),
                        average_score,
                        latest_grade,
                    },
                )
            })
            .collect();

        let (average_score, pass_rate) = if total == 0 {
            (0.0, 0.0)
        } else {
            (
                score_sum / total as f64,
                passing as f64 / total as f64 * 100.0,
            )
        };

        Self {
            total_questions: total,
            average_score,
            grade_distribution,
            pass_rate,
            skill_performance,
            trend: analyze_trend(profile.trajectory()).trend,
        }
    }
}
