//! Interview orchestrator: the adaptive session state machine.
//!
//! Flow: start → initial batch → present q1 → (process_response)* → complete.
//!
//! The orchestrator owns the question queue, the cursor into it, the linear
//! list of assessment records and the candidate profile. It performs no
//! internal parallelism; callers hold it behind a single-writer lock for the
//! duration of every call.
//!
//! Queue invariant: `0 <= cursor <= questions.len()`. Whenever an advance
//! makes `cursor == questions.len()` the queue is extended before the next
//! question is presented, or the session completes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::interview::agents::{
    AgentError, Agents, GeneratedBatch, GenerationContext, GenerationPhase, ResponseAnalysis,
};
use crate::interview::metrics::PerformanceMetrics;
use crate::interview::models::{
    AssessmentRecord, CandidateInfo, DatasetHandle, Difficulty, EvaluationResult, FinalDecision,
    Grade, Question, TrajectoryDecision,
};
use crate::interview::policy::{self, DecisionReason, Trend};
use crate::interview::profile::CandidateProfile;

pub const INITIAL_BATCH_SIZE: usize = 2;
pub const REFILL_BATCH_SIZE: usize = 2;
/// Number of most recent records handed to the question writer.
const RECENT_RECORDS_IN_CONTEXT: usize = 3;

const FALLBACK_WELCOME: &str =
    "Welcome to the assessment. Talk me through how you would approach each problem.";
const FALLBACK_ACKNOWLEDGMENT: &str = "Thank you for your response.";
const FALLBACK_FOLLOW_UP: &str = "Can you elaborate?";
const FALLBACK_CONCLUSION: &str = "Thank you for completing the assessment.";

#[derive(Debug, Error)]
pub enum InterviewError {
    #[error("question generation failed: {0}")]
    Generation(#[source] AgentError),

    #[error("answer evaluation failed: {0}")]
    Evaluation(#[source] AgentError),

    #[error("invalid state: {0}")]
    InvalidState(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Session types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewState {
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for InterviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InterviewState::NotStarted => "not started",
            InterviewState::InProgress => "in progress",
            InterviewState::Completed => "completed",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    Policy(DecisionReason),
    GenerationFailed,
    Manual,
}

impl fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionReason::Policy(reason) => write!(f, "{reason}"),
            CompletionReason::GenerationFailed => f.write_str("generation failed"),
            CompletionReason::Manual => f.write_str("completed on request"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Completion {
    pub reason: CompletionReason,
    pub reason_text: String,
    pub decision: FinalDecision,
    pub conclusion: String,
    pub ended_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptKind {
    Welcome,
    Question,
    Answer,
    Acknowledgment,
    FollowUp,
    FollowUpAnswer,
    Conclusion,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub kind: TranscriptKind,
    pub question_id: Option<String>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PresentedQuestion {
    /// 1-based position in the session.
    pub number: usize,
    pub presentation: String,
    pub question: Question,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartOutcome {
    pub session_id: Uuid,
    pub welcome: String,
    pub first_question: PresentedQuestion,
}

/// What happened to one submitted answer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseOutcome {
    Continue {
        acknowledgment: String,
        /// `None` when the answer was a clarification, which is not scored.
        evaluation: Option<EvaluationResult>,
        next_question: PresentedQuestion,
    },
    FollowUp {
        clarification: String,
        evaluation: EvaluationResult,
    },
    Completed {
        acknowledgment: String,
        evaluation: Option<EvaluationResult>,
        completion: Completion,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Progress {
    pub session_id: Uuid,
    pub state: InterviewState,
    pub questions_completed: usize,
    pub current_question_number: Option<usize>,
    pub max_questions: usize,
    pub questions_prepared: usize,
    pub skills_tested: Vec<String>,
    pub trajectory_decisions: usize,
    pub strengths: Vec<String>,
    pub areas_needing_focus: Vec<String>,
    pub preferred_difficulty: Difficulty,
    pub trend: Trend,
    pub awaiting_clarification: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalResults {
    pub session_id: Uuid,
    pub candidate: Option<CandidateInfo>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: DateTime<Utc>,
    pub duration_seconds: i64,
    pub completion: Completion,
    pub metrics: PerformanceMetrics,
    pub profile: CandidateProfile,
    pub records: Vec<AssessmentRecord>,
    pub trajectory_decisions: Vec<TrajectoryDecision>,
    pub transcript: Vec<TranscriptEntry>,
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

pub struct InterviewOrchestrator {
    session_id: Uuid,
    agents: Agents,
    skill_catalogue: Vec<String>,
    state: InterviewState,
    candidate: Option<CandidateInfo>,
    max_questions: usize,
    profile: CandidateProfile,
    questions: Vec<Question>,
    cursor: usize,
    records: Vec<AssessmentRecord>,
    skills_tested: Vec<String>,
    trajectory_decisions: Vec<TrajectoryDecision>,
    transcript: Vec<TranscriptEntry>,
    awaiting_clarification: bool,
    started_at: Option<DateTime<Utc>>,
    completion: Option<Completion>,
}

impl InterviewOrchestrator {
    pub fn new(agents: Agents, skill_catalogue: Vec<String>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            agents,
            skill_catalogue,
            state: InterviewState::NotStarted,
            candidate: None,
            max_questions: 0,
            profile: CandidateProfile::default(),
            questions: Vec::new(),
            cursor: 0,
            records: Vec::new(),
            skills_tested: Vec::new(),
            trajectory_decisions: Vec::new(),
            transcript: Vec::new(),
            awaiting_clarification: false,
            started_at: None,
            completion: None,
        }
    }

    /// Seeds the profile, generates the initial batch and presents the first
    /// question. On failure nothing is committed and the session stays
    /// `NotStarted`, so `start` may be called again.
    pub async fn start(
        &mut self,
        candidate: CandidateInfo,
        max_questions: usize,
    ) -> Result<StartOutcome, InterviewError> {
        if self.state != InterviewState::NotStarted {
            return Err(InterviewError::InvalidState(format!(
                "cannot start a session that is {}",
                self.state
            )));
        }

        let agents = if candidate.include_datasets {
            self.agents.clone()
        } else {
            self.agents.without_datasets()
        };

        let profile = CandidateProfile::new(
            &candidate.role_type,
            &candidate.focus_areas,
            &candidate.difficulty_level,
        );
        let context = GenerationContext {
            phase: GenerationPhase::InitialAssessment,
            role_context: candidate.role_type.clone(),
            candidate_profile: profile.clone(),
            recent_records: Vec::new(),
            skills_tested: Vec::new(),
            response_analysis: None,
        };

        let (_, questions) = build_batch(&agents, &context, INITIAL_BATCH_SIZE, 0)
            .await
            .map_err(InterviewError::Generation)?;

        info!(
            "Session {} started for {} ({}), max {} questions, {} prepared",
            self.session_id,
            candidate.name,
            candidate.role_type,
            max_questions,
            questions.len()
        );

        self.agents = agents;
        self.profile = profile;
        self.max_questions = max_questions;
        self.questions = questions;
        self.cursor = 0;
        self.state = InterviewState::InProgress;
        self.started_at = Some(Utc::now());

        let welcome = match self.agents.interviewer.welcome(&candidate).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Interviewer welcome failed, using fallback: {e}");
                FALLBACK_WELCOME.to_string()
            }
        };
        self.candidate = Some(candidate);
        self.log(TranscriptKind::Welcome, None, &welcome);

        let first_question = self.present_current().await?;

        Ok(StartOutcome {
            session_id: self.session_id,
            welcome,
            first_question,
        })
    }

    /// Scores the answer to the current question and moves the session on.
    ///
    /// A reviewer failure surfaces as `Evaluation` with no state change. The
    /// answer following a `FollowUp` outcome is a clarification: it goes into
    /// the transcript only and the session then advances as usual.
    pub async fn process_response(
        &mut self,
        answer: &str,
    ) -> Result<ResponseOutcome, InterviewError> {
        self.ensure_in_progress()?;
        let question = self.current_question()?.clone();

        if self.awaiting_clarification {
            self.awaiting_clarification = false;
            self.log(TranscriptKind::FollowUpAnswer, Some(&question.id), answer);

            let grade = self
                .records
                .last()
                .map(|r| r.evaluation.grade)
                .unwrap_or(Grade::RequiresMoreAssessment);
            let acknowledgment = self.acknowledge(&question, answer, grade).await;
            return self.advance(acknowledgment, None).await;
        }

        let evaluation = self
            .agents
            .reviewer
            .evaluate_answer(&question, answer)
            .await
            .map_err(InterviewError::Evaluation)?;

        self.log(TranscriptKind::Answer, Some(&question.id), answer);
        self.profile
            .update(&question.skill, evaluation.score, question.difficulty);
        self.records.push(AssessmentRecord {
            index: self.records.len(),
            question: question.clone(),
            answer: answer.to_string(),
            evaluation: evaluation.clone(),
            timestamp: Utc::now(),
        });

        info!(
            "Session {}: {} answered on {}: {} ({:.0})",
            self.session_id,
            question.id,
            question.skill,
            evaluation.grade.as_str(),
            evaluation.score
        );

        if evaluation.follow_up_needed {
            let area = evaluation
                .follow_up_suggestion
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(FALLBACK_FOLLOW_UP)
                .to_string();

            let clarification = match self.agents.interviewer.clarify(&question, &area).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Interviewer clarification failed, asking directly: {e}");
                    area
                }
            };

            self.awaiting_clarification = true;
            self.log(TranscriptKind::FollowUp, Some(&question.id), &clarification);
            debug!("Session {}: follow-up requested on {}", self.session_id, question.id);

            return Ok(ResponseOutcome::FollowUp {
                clarification,
                evaluation,
            });
        }

        let acknowledgment = self.acknowledge(&question, answer, evaluation.grade).await;
        self.advance(acknowledgment, Some(evaluation)).await
    }

    /// Ends the session early. Only valid while in progress; completion
    /// itself never fails.
    pub async fn complete(&mut self, reason: CompletionReason) -> Result<Completion, InterviewError> {
        self.ensure_in_progress()?;
        Ok(self.finish(reason).await)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            session_id: self.session_id,
            state: self.state,
            questions_completed: self.records.len(),
            current_question_number: (self.state == InterviewState::InProgress)
                .then_some(self.cursor + 1),
            max_questions: self.max_questions,
            questions_prepared: self.questions.len(),
            skills_tested: self.skills_tested.clone(),
            trajectory_decisions: self.trajectory_decisions.len(),
            strengths: self.profile.strengths().to_vec(),
            areas_needing_focus: self.profile.areas_needing_focus().to_vec(),
            preferred_difficulty: self.profile.preferred_difficulty(),
            trend: policy::analyze_trend(self.profile.trajectory()).trend,
            awaiting_clarification: self.awaiting_clarification,
        }
    }

    pub fn final_results(&self) -> Result<FinalResults, InterviewError> {
        let completion = match (&self.state, &self.completion) {
            (InterviewState::Completed, Some(completion)) => completion.clone(),
            _ => {
                return Err(InterviewError::InvalidState(format!(
                    "results are not available while the session is {}",
                    self.state
                )))
            }
        };

        let duration_seconds = self
            .started_at
            .map(|start| (completion.ended_at - start).num_seconds())
            .unwrap_or(0);

        Ok(FinalResults {
            session_id: self.session_id,
            candidate: self.candidate.clone(),
            started_at: self.started_at,
            ended_at: completion.ended_at,
            duration_seconds,
            metrics: PerformanceMetrics::compute(&self.records, &self.profile),
            completion,
            profile: self.profile.clone(),
            records: self.records.clone(),
            trajectory_decisions: self.trajectory_decisions.clone(),
            transcript: self.transcript.clone(),
        })
    }

    /// The dataset attached to the question currently awaiting an answer.
    pub fn current_dataset(&self) -> Option<&DatasetHandle> {
        if self.state != InterviewState::InProgress {
            return None;
        }
        self.questions
            .get(self.cursor)
            .and_then(|q| q.dataset.as_ref())
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> InterviewState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn records(&self) -> &[AssessmentRecord] {
        &self.records
    }

    pub fn profile(&self) -> &CandidateProfile {
        &self.profile
    }

    pub fn skills_tested(&self) -> &[String] {
        &self.skills_tested
    }

    pub fn trajectory_decisions(&self) -> &[TrajectoryDecision] {
        &self.trajectory_decisions
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    // ── internals ──────────────────────────────────────────────────────────

    fn ensure_in_progress(&self) -> Result<(), InterviewError> {
        if self.state != InterviewState::InProgress {
            return Err(InterviewError::InvalidState(format!(
                "session is {}",
                self.state
            )));
        }
        Ok(())
    }

    fn current_question(&self) -> Result<&Question, InterviewError> {
        self.questions.get(self.cursor).ok_or_else(|| {
            InterviewError::InvalidState(format!(
                "cursor {} is past the {} prepared questions",
                self.cursor,
                self.questions.len()
            ))
        })
    }

    /// Policy check, then cursor advance with refill when the queue runs dry.
    async fn advance(
        &mut self,
        acknowledgment: String,
        evaluation: Option<EvaluationResult>,
    ) -> Result<ResponseOutcome, InterviewError> {
        let decision =
            policy::should_continue(&self.records, self.max_questions, self.skills_tested.len());
        debug!(
            "Session {}: continue={} ({})",
            self.session_id, decision.should_continue, decision.reason
        );

        if !decision.should_continue {
            let completion = self.finish(CompletionReason::Policy(decision.reason)).await;
            return Ok(ResponseOutcome::Completed {
                acknowledgment,
                evaluation,
                completion,
            });
        }

        self.cursor += 1;
        if self.cursor == self.questions.len() {
            if let Err(e) = self.refill().await {
                warn!(
                    "Session {}: question refill failed, completing early: {e}",
                    self.session_id
                );
                let completion = self.finish(CompletionReason::GenerationFailed).await;
                return Ok(ResponseOutcome::Completed {
                    acknowledgment,
                    evaluation,
                    completion,
                });
            }
        }

        let next_question = self.present_current().await?;
        Ok(ResponseOutcome::Continue {
            acknowledgment,
            evaluation,
            next_question,
        })
    }

    /// Extends the queue with an adaptive batch and logs the trajectory
    /// decision. The queue is untouched on failure.
    async fn refill(&mut self) -> Result<(), AgentError> {
        let latest_evaluation = self
            .records
            .last()
            .map(|r| r.evaluation.clone())
            .ok_or_else(|| AgentError::Invalid("refill requested with no records".to_string()))?;

        let analysis = ResponseAnalysis {
            latest_evaluation,
            trend: policy::analyze_trend(self.profile.trajectory()),
            skill_gaps: policy::identify_skill_gaps(
                &self.skills_tested,
                self.profile.areas_needing_focus(),
                &self.skill_catalogue,
            ),
        };
        let context = self.generation_context(GenerationPhase::AdaptiveContinuation, analysis);

        let (batch, questions) =
            build_batch(&self.agents, &context, REFILL_BATCH_SIZE, self.questions.len()).await?;

        info!(
            "Session {}: generated {} adaptive question(s), trajectory '{}'",
            self.session_id,
            questions.len(),
            batch.trajectory_decision
        );

        self.trajectory_decisions.push(TrajectoryDecision {
            reasoning: batch.reasoning,
            trajectory: batch.trajectory_decision,
            questions_generated: questions.len(),
            timestamp: Utc::now(),
        });
        self.questions.extend(questions);
        Ok(())
    }

    fn generation_context(
        &self,
        phase: GenerationPhase,
        analysis: ResponseAnalysis,
    ) -> GenerationContext {
        let skip = self.records.len().saturating_sub(RECENT_RECORDS_IN_CONTEXT);
        GenerationContext {
            phase,
            role_context: self.profile.role_context().to_string(),
            candidate_profile: self.profile.clone(),
            recent_records: self.records[skip..].to_vec(),
            skills_tested: self.skills_tested.clone(),
            response_analysis: Some(analysis),
        }
    }

    /// Presents the question under the cursor and marks its skill tested.
    async fn present_current(&mut self) -> Result<PresentedQuestion, InterviewError> {
        let question = self.current_question()?.clone();
        let number = self.cursor + 1;

        if !self.skills_tested.contains(&question.skill) {
            self.skills_tested.push(question.skill.clone());
        }

        let presentation = match self
            .agents
            .interviewer
            .present_question(&question, number)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("Interviewer presentation failed, using question text: {e}");
                format!("Question {number}: {}", question.prompt)
            }
        };
        self.log(TranscriptKind::Question, Some(&question.id), &presentation);

        Ok(PresentedQuestion {
            number,
            presentation,
            question,
        })
    }

    async fn acknowledge(&mut self, question: &Question, answer: &str, grade: Grade) -> String {
        let text = match self.agents.interviewer.acknowledge(answer, grade).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Interviewer acknowledgment failed, using fallback: {e}");
                FALLBACK_ACKNOWLEDGMENT.to_string()
            }
        };
        self.log(TranscriptKind::Acknowledgment, Some(&question.id), &text);
        text
    }

    /// Asks the recruiter for a decision and freezes the session. Falls back
    /// to a manual-review decision if the recruiter fails.
    async fn finish(&mut self, reason: CompletionReason) -> Completion {
        let decision = match self
            .agents
            .recruiter
            .make_final_decision(&self.profile, &self.records)
            .await
        {
            Ok(decision) => decision,
            Err(e) => {
                warn!(
                    "Session {}: recruiter failed, requiring manual review: {e}",
                    self.session_id
                );
                FinalDecision::manual_review()
            }
        };

        let conclusion = match self.agents.interviewer.conclude(&decision).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Interviewer conclusion failed, using fallback: {e}");
                FALLBACK_CONCLUSION.to_string()
            }
        };
        self.log(TranscriptKind::Conclusion, None, &conclusion);

        let completion = Completion {
            reason,
            reason_text: reason.to_string(),
            decision,
            conclusion,
            ended_at: Utc::now(),
        };

        self.state = InterviewState::Completed;
        self.awaiting_clarification = false;
        self.completion = Some(completion.clone());

        info!(
            "Session {} completed after {} answer(s): {}, decision {}",
            self.session_id,
            self.records.len(),
            completion.reason_text,
            completion.decision.decision
        );

        completion
    }

    fn log(&mut self, kind: TranscriptKind, question_id: Option<&str>, content: &str) {
        self.transcript.push(TranscriptEntry {
            kind,
            question_id: question_id.map(String::from),
            content: content.to_string(),
            timestamp: Utc::now(),
        });
    }
}

/// Asks the writer for up to `count` drafts and turns them into questions,
/// attaching datasets where requested. Ids continue from `already_prepared`.
async fn build_batch(
    agents: &Agents,
    context: &GenerationContext,
    count: usize,
    already_prepared: usize,
) -> Result<(GeneratedBatch, Vec<Question>), AgentError> {
    let mut batch = agents
        .question_writer
        .generate_questions(context, count)
        .await?;

    let drafts: Vec<_> = std::mem::take(&mut batch.drafts)
        .into_iter()
        .take(count)
        .collect();
    if drafts.is_empty() {
        return Err(AgentError::Empty("question writer"));
    }

    let mut questions = Vec::with_capacity(drafts.len());
    for (offset, draft) in drafts.into_iter().enumerate() {
        let dataset = if draft.requires_dataset {
            match agents.datasets.attach_dataset(&draft).await {
                Ok(handle) => handle,
                Err(e) => {
                    warn!(
                        "Dataset generation failed for '{}', continuing without: {e}",
                        draft.skill_target
                    );
                    None
                }
            }
        } else {
            None
        };

        let id = format!("q{}", already_prepared + offset + 1);
        questions.push(Question::from_draft(id, draft, dataset));
    }

    Ok((batch, questions))
}
