//! Agents: the collaborator capabilities the orchestrator depends on.
//!
//! Each role is a trait held as `Arc<dyn ..>` so the orchestrator never knows
//! whether it is talking to Claude or to a scripted test double. The LLM-backed
//! strategies live in the submodules; each wraps an `Arc<dyn Generator>` and
//! funnels the generated text through `interview::parser`, so untyped JSON
//! never leaves this module.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::interview::models::{
    AssessmentRecord, CandidateInfo, DatasetHandle, EvaluationResult, FinalDecision, Grade,
    Question, QuestionDraft,
};
use crate::interview::parser::ParseError;
use crate::interview::policy::TrendAnalysis;
use crate::interview::profile::CandidateProfile;
use crate::llm_client::{Generator, LlmError};

pub mod datasets;
pub mod interviewer;
pub mod question_writer;
pub mod recruiter;
pub mod reviewer;

pub use datasets::{LlmDatasetProvider, NoDatasets};
pub use interviewer::LlmInterviewer;
pub use question_writer::LlmQuestionWriter;
pub use recruiter::LlmRecruiter;
pub use reviewer::LlmReviewer;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("generation backend failed: {0}")]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{0} returned no usable content")]
    Empty(&'static str),

    #[error("invalid agent output: {0}")]
    Invalid(String),

    #[error("could not render prompt context: {0}")]
    Context(#[from] serde_json::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Generation context
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationPhase {
    InitialAssessment,
    AdaptiveContinuation,
}

impl GenerationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationPhase::InitialAssessment => "initial_assessment",
            GenerationPhase::AdaptiveContinuation => "adaptive_continuation",
        }
    }
}

/// Hints computed from the latest answer, only present for refills.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseAnalysis {
    pub latest_evaluation: EvaluationResult,
    pub trend: TrendAnalysis,
    pub skill_gaps: Vec<String>,
}

/// Everything the question writer sees. A snapshot; owns its data.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationContext {
    pub phase: GenerationPhase,
    pub role_context: String,
    pub candidate_profile: CandidateProfile,
    /// At most the last three records.
    pub recent_records: Vec<AssessmentRecord>,
    pub skills_tested: Vec<String>,
    pub response_analysis: Option<ResponseAnalysis>,
}

/// One batch as returned by the question writer.
#[derive(Debug, Clone, Default)]
pub struct GeneratedBatch {
    pub drafts: Vec<QuestionDraft>,
    pub reasoning: String,
    pub trajectory_decision: String,
    pub next_focus_areas: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Capability traits
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait QuestionWriter: Send + Sync {
    /// Proposes up to `count` questions. An empty batch is an error.
    async fn generate_questions(
        &self,
        context: &GenerationContext,
        count: usize,
    ) -> Result<GeneratedBatch, AgentError>;
}

#[async_trait]
pub trait Reviewer: Send + Sync {
    async fn evaluate_answer(
        &self,
        question: &Question,
        answer: &str,
    ) -> Result<EvaluationResult, AgentError>;
}

#[async_trait]
pub trait Recruiter: Send + Sync {
    async fn make_final_decision(
        &self,
        profile: &CandidateProfile,
        records: &[AssessmentRecord],
    ) -> Result<FinalDecision, AgentError>;
}

/// Produces supporting data for a draft that asks for it. `Ok(None)` means
/// "no dataset for this one"; the orchestrator treats errors the same way.
#[async_trait]
pub trait DatasetProvider: Send + Sync {
    async fn attach_dataset(&self, draft: &QuestionDraft)
        -> Result<Option<DatasetHandle>, AgentError>;
}

/// The conversational voice of the session. Output is plain text shown to
/// the candidate; the orchestrator substitutes fixed text on failure.
#[async_trait]
pub trait Interviewer: Send + Sync {
    async fn welcome(&self, candidate: &CandidateInfo) -> Result<String, AgentError>;

    async fn present_question(&self, question: &Question, number: usize)
        -> Result<String, AgentError>;

    async fn acknowledge(&self, answer: &str, grade: Grade) -> Result<String, AgentError>;

    async fn clarify(&self, question: &Question, area: &str) -> Result<String, AgentError>;

    async fn conclude(&self, decision: &FinalDecision) -> Result<String, AgentError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Agent set
// ────────────────────────────────────────────────────────────────────────────

/// The full set of collaborators handed to each orchestrator.
#[derive(Clone)]
pub struct Agents {
    pub question_writer: Arc<dyn QuestionWriter>,
    pub reviewer: Arc<dyn Reviewer>,
    pub recruiter: Arc<dyn Recruiter>,
    pub interviewer: Arc<dyn Interviewer>,
    pub datasets: Arc<dyn DatasetProvider>,
}

impl Agents {
    /// Wires the LLM-backed roles. The interviewer runs on the lite
    /// generator; every judging or planning role runs on the pro one.
    pub fn from_generators(pro: Arc<dyn Generator>, lite: Arc<dyn Generator>) -> Self {
        Self {
            question_writer: Arc::new(LlmQuestionWriter::new(pro.clone())),
            reviewer: Arc::new(LlmReviewer::new(pro.clone())),
            recruiter: Arc::new(LlmRecruiter::new(pro.clone())),
            interviewer: Arc::new(LlmInterviewer::new(lite)),
            datasets: Arc::new(LlmDatasetProvider::new(pro)),
        }
    }

    /// Same agents, with dataset generation switched off.
    pub fn without_datasets(&self) -> Self {
        Self {
            datasets: Arc::new(NoDatasets),
            ..self.clone()
        }
    }
}

/// Pretty JSON for prompt bodies.
fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AgentError> {
    Ok(serde_json::to_string_pretty(value)?)
}
