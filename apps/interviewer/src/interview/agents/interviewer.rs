//! Interviewer: the conversational voice, backed by the lite model.

use std::sync::Arc;

use async_trait::async_trait;

use crate::interview::agents::{AgentError, Interviewer};
use crate::interview::models::{CandidateInfo, FinalDecision, Grade, Question};
use crate::interview::prompts::{
    ACKNOWLEDGE_TEMPLATE, CLARIFY_TEMPLATE, CONCLUDE_TEMPLATE, INTERVIEWER_SYSTEM,
    PRESENT_QUESTION_TEMPLATE, WELCOME_TEMPLATE,
};
use crate::llm_client::{Generator, Prompt};

pub struct LlmInterviewer {
    generator: Arc<dyn Generator>,
}

impl LlmInterviewer {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    async fn say(&self, user: String) -> Result<String, AgentError> {
        let text = self
            .generator
            .generate(&Prompt::new(INTERVIEWER_SYSTEM, user))
            .await?;
        let text = text.trim().trim_matches('"').trim();
        if text.is_empty() {
            return Err(AgentError::Empty("interviewer"));
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl Interviewer for LlmInterviewer {
    async fn welcome(&self, candidate: &CandidateInfo) -> Result<String, AgentError> {
        self.say(
            WELCOME_TEMPLATE
                .replace("{name}", &candidate.name)
                .replace("{role_type}", &candidate.role_type),
        )
        .await
    }

    async fn present_question(
        &self,
        question: &Question,
        number: usize,
    ) -> Result<String, AgentError> {
        let scenario = if question.scenario.is_empty() {
            "N/A"
        } else {
            question.scenario.as_str()
        };
        self.say(
            PRESENT_QUESTION_TEMPLATE
                .replace("{number}", &number.to_string())
                .replace("{scenario}", scenario)
                .replace("{question}", &question.prompt),
        )
        .await
    }

    async fn acknowledge(&self, answer: &str, grade: Grade) -> Result<String, AgentError> {
        self.say(
            ACKNOWLEDGE_TEMPLATE
                .replace("{answer}", answer)
                .replace("{grade}", grade.as_str()),
        )
        .await
    }

    async fn clarify(&self, question: &Question, area: &str) -> Result<String, AgentError> {
        self.say(
            CLARIFY_TEMPLATE
                .replace("{question}", &question.prompt)
                .replace("{area}", area),
        )
        .await
    }

    async fn conclude(&self, decision: &FinalDecision) -> Result<String, AgentError> {
        self.say(
            CONCLUDE_TEMPLATE
                .replace("{decision}", &decision.decision)
                .replace("{next_steps}", &decision.next_steps),
        )
        .await
    }
}
