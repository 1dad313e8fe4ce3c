//! Typed messages exchanged between the orchestrator and its agents.
//!
//! Everything an agent produces is deserialized into one of these structs at
//! the parser boundary. Deserialization is deliberately lenient about shape
//! (missing optional fields, scores sent as strings, unknown grade labels)
//! because generated text is rarely exact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Enumerations
// ────────────────────────────────────────────────────────────────────────────

/// Question difficulty. Unknown labels fall back to `Medium`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        if label.starts_with("easy") || label.starts_with("basic") {
            Difficulty::Easy
        } else if label.starts_with("hard") || label.starts_with("advanced") {
            Difficulty::Hard
        } else {
            Difficulty::Medium
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Difficulty::from_label(&label))
    }
}

/// Reviewer grade. Unknown labels are treated as `RequiresMoreAssessment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Grade {
    Satisfactory,
    #[serde(rename = "Partly Acceptable")]
    PartlyAcceptable,
    Unsatisfactory,
    #[serde(rename = "Requires More Assessment")]
    RequiresMoreAssessment,
}

impl Grade {
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "satisfactory" => Grade::Satisfactory,
            "partlyacceptable" | "partiallyacceptable" => Grade::PartlyAcceptable,
            "unsatisfactory" => Grade::Unsatisfactory,
            _ => Grade::RequiresMoreAssessment,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Satisfactory => "Satisfactory",
            Grade::PartlyAcceptable => "Partly Acceptable",
            Grade::Unsatisfactory => "Unsatisfactory",
            Grade::RequiresMoreAssessment => "Requires More Assessment",
        }
    }

    /// Satisfactory and Partly Acceptable count towards the pass rate.
    pub fn is_passing(&self) -> bool {
        matches!(self, Grade::Satisfactory | Grade::PartlyAcceptable)
    }
}

impl<'de> Deserialize<'de> for Grade {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Grade::from_label(&label))
    }
}

/// Clamps a reviewer score into [0, 100] for averaging and trend math.
/// NaN is treated as 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Session input
// ────────────────────────────────────────────────────────────────────────────

/// Who is being interviewed and how the session should be shaped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub name: String,
    #[serde(default = "default_role_type")]
    pub role_type: String,
    #[serde(default = "default_difficulty_level")]
    pub difficulty_level: String,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    /// Falls back to the configured default when absent.
    #[serde(default)]
    pub max_questions: Option<usize>,
    #[serde(default = "default_true")]
    pub include_datasets: bool,
}

fn default_role_type() -> String {
    "Business Analyst".to_string()
}

fn default_difficulty_level() -> String {
    "Mixed Assessment".to_string()
}

fn default_true() -> bool {
    true
}

// ────────────────────────────────────────────────────────────────────────────
// Questions
// ────────────────────────────────────────────────────────────────────────────

/// What the question writer would like the dataset collaborator to produce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetRequirements {
    #[serde(default)]
    pub data_context: String,
    #[serde(default)]
    pub required_columns: Vec<String>,
    #[serde(default)]
    pub data_challenges: Vec<String>,
    #[serde(default)]
    pub sample_size: Option<u32>,
}

/// A question as proposed by the question writer, before it joins the queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub question: String,
    #[serde(default = "unknown_skill")]
    pub skill_target: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub scenario_context: String,
    #[serde(default)]
    pub requires_dataset: bool,
    #[serde(default)]
    pub dataset_requirements: Option<DatasetRequirements>,
    #[serde(default)]
    pub expected_approach: String,
    #[serde(default, deserialize_with = "string_or_list")]
    pub evaluation_criteria: Vec<String>,
    #[serde(default)]
    pub adaptive_reasoning: String,
}

fn unknown_skill() -> String {
    "Unknown".to_string()
}

/// Supporting data attached to a question. Produced and owned by the dataset
/// collaborator; the orchestrator only carries it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetHandle {
    pub id: Uuid,
    pub title: String,
    pub columns: Vec<String>,
    pub row_count: usize,
    pub csv: String,
}

/// A question in the session queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    /// Sequence-scoped id (`q1`, `q2`, ...), unique within one session only.
    pub id: String,
    pub prompt: String,
    pub skill: String,
    pub difficulty: Difficulty,
    pub scenario: String,
    pub requires_dataset: bool,
    pub dataset: Option<DatasetHandle>,
    pub expected_approach: String,
    pub evaluation_criteria: Vec<String>,
    pub adaptive_reasoning: String,
}

impl Question {
    pub fn from_draft(id: String, draft: QuestionDraft, dataset: Option<DatasetHandle>) -> Self {
        Self {
            id,
            prompt: draft.question,
            skill: draft.skill_target,
            difficulty: draft.difficulty,
            scenario: draft.scenario_context,
            requires_dataset: draft.requires_dataset,
            dataset,
            expected_approach: draft.expected_approach,
            evaluation_criteria: draft.evaluation_criteria,
            adaptive_reasoning: draft.adaptive_reasoning,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Evaluation and records
// ────────────────────────────────────────────────────────────────────────────

/// The reviewer's verdict on one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub grade: Grade,
    #[serde(deserialize_with = "lenient_score")]
    pub score: f64,
    #[serde(default)]
    pub justification: String,
    #[serde(default, deserialize_with = "string_or_list")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub weaknesses: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub alternative_solutions: Vec<String>,
    #[serde(default)]
    pub follow_up_needed: bool,
    #[serde(default)]
    pub follow_up_suggestion: Option<String>,
}

/// One answered-and-scored question. Immutable once appended.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentRecord {
    pub index: usize,
    pub question: Question,
    pub answer: String,
    pub evaluation: EvaluationResult,
    pub timestamp: DateTime<Utc>,
}

/// The recruiter's hiring recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalDecision {
    pub decision: String,
    #[serde(default = "default_confidence", alias = "confidence_level")]
    pub confidence: String,
    #[serde(deserialize_with = "lenient_score")]
    pub overall_score: f64,
    #[serde(default)]
    pub recommendation_summary: String,
    #[serde(default, deserialize_with = "string_or_list")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub improvement_areas: Vec<String>,
    #[serde(default)]
    pub next_steps: String,
}

fn default_confidence() -> String {
    "Medium".to_string()
}

impl FinalDecision {
    /// Substituted when the recruiter cannot produce a decision.
    pub fn manual_review() -> Self {
        Self {
            decision: "Requires Manual Review".to_string(),
            confidence: "Low".to_string(),
            overall_score: 0.0,
            recommendation_summary: "Unable to generate adaptive assessment decision.".to_string(),
            strengths: Vec::new(),
            improvement_areas: Vec::new(),
            next_steps: "A reviewer should read the transcript before any decision is made."
                .to_string(),
        }
    }
}

/// Audit entry written each time the queue is extended mid-session.
#[derive(Debug, Clone, Serialize)]
pub struct TrajectoryDecision {
    pub reasoning: String,
    pub trajectory: String,
    pub questions_generated: usize,
    pub timestamp: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field deserializers
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum ScoreRepr {
    Number(f64),
    Text(String),
}

/// Accepts `85`, `85.5`, `"85"` or `"85%"`.
fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match ScoreRepr::deserialize(deserializer)? {
        ScoreRepr::Number(n) => Ok(n),
        ScoreRepr::Text(s) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accepts a single string, a list of strings or null. Empty strings and null
/// become an empty list.
fn string_or_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) if s.trim().is_empty() => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}
