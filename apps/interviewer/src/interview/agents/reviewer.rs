//! Reviewer: grades one answer against its question.

use std::sync::Arc;

use async_trait::async_trait;

use crate::interview::agents::{AgentError, Reviewer};
use crate::interview::models::{EvaluationResult, Question};
use crate::interview::parser;
use crate::interview::prompts::{EVALUATION_TEMPLATE, REVIEWER_ROLE};
use crate::llm_client::prompts::json_system;
use crate::llm_client::{Generator, Prompt};

pub struct LlmReviewer {
    generator: Arc<dyn Generator>,
}

impl LlmReviewer {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Reviewer for LlmReviewer {
    async fn evaluate_answer(
        &self,
        question: &Question,
        answer: &str,
    ) -> Result<EvaluationResult, AgentError> {
        let prompt = build_prompt(question, answer);
        let text = self.generator.generate(&prompt).await?;
        Ok(parser::parse::<EvaluationResult>(&text)?)
    }
}

fn build_prompt(question: &Question, answer: &str) -> Prompt {
    let criteria = if question.evaluation_criteria.is_empty() {
        "N/A".to_string()
    } else {
        question.evaluation_criteria.join("; ")
    };
    let expected = if question.expected_approach.is_empty() {
        "N/A"
    } else {
        question.expected_approach.as_str()
    };

    let user = EVALUATION_TEMPLATE
        .replace("{question}", &question.prompt)
        .replace("{skill}", &question.skill)
        .replace("{difficulty}", question.difficulty.as_str())
        .replace("{expected_approach}", expected)
        .replace("{evaluation_criteria}", &criteria)
        .replace("{answer}", answer);

    Prompt::new(json_system(REVIEWER_ROLE), user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::models::{Grade, QuestionDraft};
    use crate::interview::testing::{draft, ScriptedGenerator};

    fn question() -> Question {
        let draft = QuestionDraft {
            expected_approach: "INDEX/MATCH with exact match".to_string(),
            evaluation_criteria: vec!["Exact match".to_string(), "Error handling".to_string()],
            ..draft("Lookups")
        };
        Question::from_draft("q1".to_string(), draft, None)
    }

    #[tokio::test]
    async fn test_evaluation_parsed_from_messy_output() {
        let generator = ScriptedGenerator::replying(
            "Evaluation: {\"grade\": \"Partly Acceptable\", \"score\": \"65\", \
             \"follow_up_needed\": true, \"follow_up_suggestion\": \"What about missing keys?\"} Done.",
        );
        let reviewer = LlmReviewer::new(generator.clone());

        let result = reviewer
            .evaluate_answer(&question(), "I would use VLOOKUP")
            .await
            .unwrap();
        assert_eq!(result.grade, Grade::PartlyAcceptable);
        assert_eq!(result.score, 65.0);
        assert!(result.follow_up_needed);
        assert_eq!(
            result.follow_up_suggestion.as_deref(),
            Some("What about missing keys?")
        );

        let prompt = generator.last_prompt();
        assert!(prompt.user.contains("I would use VLOOKUP"));
        assert!(prompt.user.contains("INDEX/MATCH with exact match"));
        assert!(prompt.user.contains("Exact match; Error handling"));
    }

    #[tokio::test]
    async fn test_missing_score_is_a_parse_error() {
        let generator = ScriptedGenerator::replying(r#"{"grade": "Satisfactory"}"#);
        let reviewer = LlmReviewer::new(generator);
        let result = reviewer.evaluate_answer(&question(), "answer").await;
        assert!(matches!(result, Err(AgentError::Parse(_))));
    }

    #[test]
    fn test_prompt_marks_missing_hints() {
        let question = Question::from_draft("q2".to_string(), draft("Charts"), None);
        let prompt = build_prompt(&question, "a bar chart");
        assert!(prompt.user.contains("Expected Approach: N/A"));
        assert!(prompt.user.contains("Evaluation Criteria: N/A"));
    }
}
