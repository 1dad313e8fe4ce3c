//! Question writer: proposes the next batch of adaptive questions.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::interview::agents::{
    render_json, AgentError, GeneratedBatch, GenerationContext, QuestionWriter,
};
use crate::interview::models::QuestionDraft;
use crate::interview::parser;
use crate::interview::prompts::{QUESTION_BATCH_TEMPLATE, QUESTION_WRITER_ROLE};
use crate::llm_client::prompts::json_system;
use crate::llm_client::{Generator, Prompt};

#[derive(Debug, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    trajectory_decision: String,
    questions: Vec<QuestionDraft>,
    #[serde(default)]
    next_focus_areas: Vec<String>,
}

pub struct LlmQuestionWriter {
    generator: Arc<dyn Generator>,
}

impl LlmQuestionWriter {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl QuestionWriter for LlmQuestionWriter {
    async fn generate_questions(
        &self,
        context: &GenerationContext,
        count: usize,
    ) -> Result<GeneratedBatch, AgentError> {
        let prompt = build_prompt(context, count)?;
        let text = self.generator.generate(&prompt).await?;
        let response: BatchResponse = parser::parse(&text)?;

        if response.questions.is_empty() {
            return Err(AgentError::Empty("question writer"));
        }

        debug!(
            "Question writer proposed {} question(s) for phase {}",
            response.questions.len(),
            context.phase.as_str()
        );

        Ok(GeneratedBatch {
            drafts: response.questions,
            reasoning: response.reasoning,
            trajectory_decision: response.trajectory_decision,
            next_focus_areas: response.next_focus_areas,
        })
    }
}

fn build_prompt(context: &GenerationContext, count: usize) -> Result<Prompt, AgentError> {
    let skills_tested = if context.skills_tested.is_empty() {
        "None yet".to_string()
    } else {
        context.skills_tested.join(", ")
    };

    let analysis_json = match &context.response_analysis {
        Some(analysis) => render_json(analysis)?,
        None => "None (first batch)".to_string(),
    };

    let user = QUESTION_BATCH_TEMPLATE
        .replace("{count}", &count.to_string())
        .replace("{phase}", context.phase.as_str())
        .replace("{role_context}", &context.role_context)
        .replace("{profile_json}", &render_json(&context.candidate_profile)?)
        .replace("{recent_json}", &render_json(&context.recent_records)?)
        .replace("{skills_tested}", &skills_tested)
        .replace("{analysis_json}", &analysis_json);

    Ok(Prompt::new(json_system(QUESTION_WRITER_ROLE), user))
}
