//! Dataset provider: generates the CSV a question refers to.
//!
//! The core treats the result as an opaque handle. Rendering it (tables,
//! downloads) belongs to whatever presents the session.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::interview::agents::{render_json, AgentError, DatasetProvider};
use crate::interview::models::{DatasetHandle, DatasetRequirements, QuestionDraft};
use crate::interview::parser;
use crate::interview::prompts::{DATASET_ROLE, DATASET_TEMPLATE};
use crate::llm_client::prompts::json_system;
use crate::llm_client::{Generator, Prompt};

#[derive(Debug, Deserialize)]
struct DatasetResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    columns: Vec<String>,
    csv: String,
}

pub struct LlmDatasetProvider {
    generator: Arc<dyn Generator>,
}

impl LlmDatasetProvider {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl DatasetProvider for LlmDatasetProvider {
    async fn attach_dataset(
        &self,
        draft: &QuestionDraft,
    ) -> Result<Option<DatasetHandle>, AgentError> {
        if !draft.requires_dataset {
            return Ok(None);
        }

        let requirements = draft.dataset_requirements.clone().unwrap_or_default();
        let prompt = build_prompt(draft, &requirements)?;
        let text = self.generator.generate(&prompt).await?;
        let response: DatasetResponse = parser::parse(&text)?;

        let handle = into_handle(response, &draft.skill_target)?;
        debug!(
            "Generated dataset '{}' ({} rows) for {}",
            handle.title, handle.row_count, draft.skill_target
        );
        Ok(Some(handle))
    }
}

/// Used when a session opts out of datasets.
pub struct NoDatasets;

#[async_trait]
impl DatasetProvider for NoDatasets {
    async fn attach_dataset(
        &self,
        _draft: &QuestionDraft,
    ) -> Result<Option<DatasetHandle>, AgentError> {
        Ok(None)
    }
}

fn build_prompt(
    draft: &QuestionDraft,
    requirements: &DatasetRequirements,
) -> Result<Prompt, AgentError> {
    let user = DATASET_TEMPLATE
        .replace("{question}", &draft.question)
        .replace("{requirements_json}", &render_json(requirements)?);
    Ok(Prompt::new(json_system(DATASET_ROLE), user))
}

fn into_handle(response: DatasetResponse, skill: &str) -> Result<DatasetHandle, AgentError> {
    let csv = response.csv.trim().replace("\r\n", "\n");
    let mut lines = csv.lines().filter(|line| !line.trim().is_empty());

    let header = lines
        .next()
        .ok_or(AgentError::Empty("dataset provider"))?;
    let row_count = lines.count();
    if row_count == 0 {
        return Err(AgentError::Invalid("dataset has a header but no rows".to_string()));
    }

    let columns = if response.columns.is_empty() {
        header.split(',').map(|c| c.trim().to_string()).collect()
    } else {
        response.columns
    };

    let title = if response.title.trim().is_empty() {
        format!("{skill} dataset")
    } else {
        response.title
    };

    Ok(DatasetHandle {
        id: Uuid::new_v4(),
        title,
        columns,
        row_count,
        csv,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::testing::{draft, ScriptedGenerator};

    fn dataset_draft() -> QuestionDraft {
        QuestionDraft {
            requires_dataset: true,
            dataset_requirements: Some(DatasetRequirements {
                data_context: "regional sales".to_string(),
                required_columns: vec!["region".to_string(), "revenue".to_string()],
                data_challenges: vec!["duplicates".to_string()],
                sample_size: Some(40),
            }),
            ..draft("Pivot Tables")
        }
    }

    #[tokio::test]
    async fn test_builds_handle_and_counts_rows() {
        let generator = ScriptedGenerator::replying(
            r#"{"title": "Q3 sales", "csv": "region,revenue\r\nNorth,100\r\nSouth,80\r\n\r\nNorth,100\r\n"}"#,
        );
        let provider = LlmDatasetProvider::new(generator.clone());

        let handle = provider
            .attach_dataset(&dataset_draft())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(handle.title, "Q3 sales");
        assert_eq!(handle.columns, vec!["region", "revenue"]);
        assert_eq!(handle.row_count, 3);
        assert!(!handle.csv.contains('\r'));

        assert!(generator.last_prompt().user.contains("regional sales"));
    }

    #[tokio::test]
    async fn test_skips_drafts_without_dataset() {
        let generator = ScriptedGenerator::new(vec![]);
        let provider = LlmDatasetProvider::new(generator.clone());
        let handle = provider.attach_dataset(&draft("Charts")).await.unwrap();
        assert!(handle.is_none());
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_header_only_csv_is_invalid() {
        let generator = ScriptedGenerator::replying(r#"{"csv": "region,revenue"}"#);
        let provider = LlmDatasetProvider::new(generator);
        let result = provider.attach_dataset(&dataset_draft()).await;
        assert!(matches!(result, Err(AgentError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_no_datasets_never_attaches() {
        let handle = NoDatasets.attach_dataset(&dataset_draft()).await.unwrap();
        assert!(handle.is_none());
    }
}
