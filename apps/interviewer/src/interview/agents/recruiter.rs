//! Recruiter: turns the whole assessment into a hiring recommendation.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::interview::agents::{render_json, AgentError, Recruiter};
use crate::interview::models::{AssessmentRecord, Difficulty, FinalDecision, Grade};
use crate::interview::parser;
use crate::interview::profile::CandidateProfile;
use crate::interview::prompts::{FINAL_DECISION_TEMPLATE, RECRUITER_ROLE};
use crate::llm_client::prompts::json_system;
use crate::llm_client::{Generator, Prompt};

/// What the recruiter needs from each record. Drops datasets and hints.
#[derive(Debug, Serialize)]
struct RecordSummary<'a> {
    number: usize,
    skill: &'a str,
    difficulty: Difficulty,
    question: &'a str,
    answer: &'a str,
    grade: Grade,
    score: f64,
    justification: &'a str,
}

impl<'a> From<&'a AssessmentRecord> for RecordSummary<'a> {
    fn from(record: &'a AssessmentRecord) -> Self {
        Self {
            number: record.index + 1,
            skill: &record.question.skill,
            difficulty: record.question.difficulty,
            question: &record.question.prompt,
            answer: &record.answer,
            grade: record.evaluation.grade,
            score: record.evaluation.score,
            justification: &record.evaluation.justification,
        }
    }
}

pub struct LlmRecruiter {
    generator: Arc<dyn Generator>,
}

impl LlmRecruiter {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Recruiter for LlmRecruiter {
    async fn make_final_decision(
        &self,
        profile: &CandidateProfile,
        records: &[AssessmentRecord],
    ) -> Result<FinalDecision, AgentError> {
        let prompt = build_prompt(profile, records)?;
        let text = self.generator.generate(&prompt).await?;
        let decision: FinalDecision = parser::parse(&text)?;

        if decision.decision.trim().is_empty() {
            return Err(AgentError::Invalid("decision label is empty".to_string()));
        }
        Ok(decision)
    }
}

fn build_prompt(
    profile: &CandidateProfile,
    records: &[AssessmentRecord],
) -> Result<Prompt, AgentError> {
    let summaries: Vec<RecordSummary<'_>> = records.iter().map(RecordSummary::from).collect();

    let user = FINAL_DECISION_TEMPLATE
        .replace("{profile_json}", &render_json(profile)?)
        .replace("{records_json}", &render_json(&summaries)?);

    Ok(Prompt::new(json_system(RECRUITER_ROLE), user))
}
