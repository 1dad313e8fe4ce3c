//! Scripted collaborators shared by the interview tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::interview::agents::{
    AgentError, Agents, DatasetProvider, GeneratedBatch, GenerationContext, Interviewer,
    QuestionWriter, Recruiter, Reviewer,
};
use crate::interview::models::{
    AssessmentRecord, CandidateInfo, DatasetHandle, Difficulty, EvaluationResult, FinalDecision,
    Grade, Question, QuestionDraft,
};
use crate::interview::profile::CandidateProfile;
use crate::llm_client::{Generator, LlmError, Prompt};

fn scripted_failure() -> LlmError {
    LlmError::Api {
        status: 500,
        message: "scripted failure".to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generator
// ────────────────────────────────────────────────────────────────────────────

/// Replays canned responses in order and records every prompt. `None` in the
/// script is a backend failure; an exhausted script fails too.
#[derive(Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Option<String>>>,
    pub prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<Option<&str>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().map(|r| r.map(String::from)).collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(vec![Some(text)])
    }

    pub fn last_prompt(&self) -> Prompt {
        self.prompts.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, prompt: &Prompt) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .flatten()
            .ok_or_else(scripted_failure)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fixtures
// ────────────────────────────────────────────────────────────────────────────

pub fn draft(skill: &str) -> QuestionDraft {
    QuestionDraft {
        question: format!("How would you approach a {skill} problem?"),
        skill_target: skill.to_string(),
        difficulty: Difficulty::Medium,
        scenario_context: "Monthly sales report".to_string(),
        requires_dataset: false,
        dataset_requirements: None,
        expected_approach: String::new(),
        evaluation_criteria: Vec::new(),
        adaptive_reasoning: String::new(),
    }
}

pub fn evaluation(score: f64) -> EvaluationResult {
    let grade = if score >= 80.0 {
        Grade::Satisfactory
    } else if score >= 60.0 {
        Grade::PartlyAcceptable
    } else {
        Grade::Unsatisfactory
    };
    EvaluationResult {
        grade,
        score,
        justification: format!("scored {score}"),
        strengths: Vec::new(),
        weaknesses: Vec::new(),
        alternative_solutions: Vec::new(),
        follow_up_needed: false,
        follow_up_suggestion: None,
    }
}

pub fn follow_up(score: f64, suggestion: Option<&str>) -> EvaluationResult {
    EvaluationResult {
        follow_up_needed: true,
        follow_up_suggestion: suggestion.map(String::from),
        ..evaluation(score)
    }
}

pub fn candidate(max_questions: usize) -> CandidateInfo {
    CandidateInfo {
        name: "Ada".to_string(),
        role_type: "Financial Analyst".to_string(),
        difficulty_level: "Mixed Assessment".to_string(),
        focus_areas: vec!["Pivot Tables".to_string()],
        max_questions: Some(max_questions),
        include_datasets: true,
    }
}

pub fn decision(label: &str) -> FinalDecision {
    FinalDecision {
        decision: label.to_string(),
        confidence: "High".to_string(),
        overall_score: 88.0,
        recommendation_summary: "Strong candidate".to_string(),
        strengths: Vec::new(),
        improvement_areas: Vec::new(),
        next_steps: "Schedule a panel".to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Role doubles
// ────────────────────────────────────────────────────────────────────────────

/// Hands out one scripted batch per call. `None` is a failed call.
#[derive(Default)]
pub struct ScriptedWriter {
    batches: Mutex<VecDeque<Option<Vec<QuestionDraft>>>>,
    pub contexts: Mutex<Vec<(GenerationContext, usize)>>,
}

impl ScriptedWriter {
    pub fn new(batches: Vec<Option<Vec<QuestionDraft>>>) -> Arc<Self> {
        Arc::new(Self {
            batches: Mutex::new(batches.into()),
            contexts: Mutex::new(Vec::new()),
        })
    }

    /// One batch per pair of skills, in order, and nothing after that.
    pub fn with_skills(skills: &[&str]) -> Arc<Self> {
        let batches = skills
            .chunks(2)
            .map(|pair| Some(pair.iter().map(|s| draft(s)).collect()))
            .collect();
        Self::new(batches)
    }

    pub fn calls(&self) -> usize {
        self.contexts.lock().unwrap().len()
    }
}

#[async_trait]
impl QuestionWriter for ScriptedWriter {
    async fn generate_questions(
        &self,
        context: &GenerationContext,
        count: usize,
    ) -> Result<GeneratedBatch, AgentError> {
        self.contexts.lock().unwrap().push((context.clone(), count));
        let drafts = self
            .batches
            .lock()
            .unwrap()
            .pop_front()
            .flatten()
            .ok_or(AgentError::Llm(scripted_failure()))?;
        Ok(GeneratedBatch {
            drafts,
            reasoning: format!("{} batch", context.phase.as_str()),
            trajectory_decision: "steady".to_string(),
            next_focus_areas: Vec::new(),
        })
    }
}

/// Returns scripted evaluations in order. `None` is a failed call.
#[derive(Default)]
pub struct ScriptedReviewer {
    results: Mutex<VecDeque<Option<EvaluationResult>>>,
}

impl ScriptedReviewer {
    pub fn new(results: Vec<Option<EvaluationResult>>) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(results.into()),
        })
    }

    pub fn scoring(scores: &[f64]) -> Arc<Self> {
        Self::new(scores.iter().map(|s| Some(evaluation(*s))).collect())
    }
}

#[async_trait]
impl Reviewer for ScriptedReviewer {
    async fn evaluate_answer(
        &self,
        _question: &Question,
        _answer: &str,
    ) -> Result<EvaluationResult, AgentError> {
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .flatten()
            .ok_or(AgentError::Llm(scripted_failure()))
    }
}

pub struct ScriptedRecruiter {
    decision: Option<FinalDecision>,
    pub seen_records: Mutex<Option<usize>>,
}

impl ScriptedRecruiter {
    pub fn deciding(label: &str) -> Arc<Self> {
        Arc::new(Self {
            decision: Some(decision(label)),
            seen_records: Mutex::new(None),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            decision: None,
            seen_records: Mutex::new(None),
        })
    }
}

#[async_trait]
impl Recruiter for ScriptedRecruiter {
    async fn make_final_decision(
        &self,
        _profile: &CandidateProfile,
        records: &[AssessmentRecord],
    ) -> Result<FinalDecision, AgentError> {
        *self.seen_records.lock().unwrap() = Some(records.len());
        self.decision
            .clone()
            .ok_or(AgentError::Empty("recruiter"))
    }
}

/// Echoes a short fixed text, or fails every call.
pub struct EchoInterviewer {
    pub fail: bool,
}

impl EchoInterviewer {
    fn reply(&self, text: String) -> Result<String, AgentError> {
        if self.fail {
            Err(AgentError::Empty("interviewer"))
        } else {
            Ok(text)
        }
    }
}

#[async_trait]
impl Interviewer for EchoInterviewer {
    async fn welcome(&self, candidate: &CandidateInfo) -> Result<String, AgentError> {
        self.reply(format!("Welcome, {}", candidate.name))
    }

    async fn present_question(
        &self,
        question: &Question,
        number: usize,
    ) -> Result<String, AgentError> {
        self.reply(format!("Question {number}: {}", question.prompt))
    }

    async fn acknowledge(&self, _answer: &str, grade: Grade) -> Result<String, AgentError> {
        self.reply(format!("Noted ({})", grade.as_str()))
    }

    async fn clarify(&self, _question: &Question, area: &str) -> Result<String, AgentError> {
        self.reply(format!("Could you clarify {area}?"))
    }

    async fn conclude(&self, decision: &FinalDecision) -> Result<String, AgentError> {
        self.reply(format!("Goodbye ({})", decision.decision))
    }
}

/// Attaches a one-row dataset to every draft, or fails every call.
pub struct StubDatasets {
    pub fail: bool,
}

#[async_trait]
impl DatasetProvider for StubDatasets {
    async fn attach_dataset(
        &self,
        draft: &QuestionDraft,
    ) -> Result<Option<DatasetHandle>, AgentError> {
        if self.fail {
            return Err(AgentError::Empty("dataset provider"));
        }
        Ok(Some(DatasetHandle {
            id: uuid::Uuid::new_v4(),
            title: format!("{} data", draft.skill_target),
            columns: vec!["region".to_string(), "revenue".to_string()],
            row_count: 1,
            csv: "region,revenue\nNorth,100".to_string(),
        }))
    }
}

/// Builds an agent set from the given writer, reviewer and recruiter with a
/// working interviewer and dataset provider.
pub fn agents(
    writer: Arc<ScriptedWriter>,
    reviewer: Arc<ScriptedReviewer>,
    recruiter: Arc<ScriptedRecruiter>,
) -> Agents {
    Agents {
        question_writer: writer,
        reviewer,
        recruiter,
        interviewer: Arc::new(EchoInterviewer { fail: false }),
        datasets: Arc::new(StubDatasets { fail: false }),
    }
}
