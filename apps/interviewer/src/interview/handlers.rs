//! Axum route handlers for the Interview API.
//!
//! Handlers are thin: they resolve the session, take its lock for the
//! duration of one orchestrator call and serialize whatever comes back.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::models::{CandidateInfo, DatasetHandle};
use crate::interview::orchestrator::{
    Completion, CompletionReason, FinalResults, InterviewOrchestrator, Progress, ResponseOutcome,
    StartOutcome,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub outcome: ResponseOutcome,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews
///
/// Starts a session. It is only registered once the first batch exists, so a
/// failed start leaves nothing behind.
pub async fn handle_start(
    State(state): State<AppState>,
    Json(candidate): Json<CandidateInfo>,
) -> Result<(StatusCode, Json<StartOutcome>), AppError> {
    if candidate.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }

    let max_questions = candidate.max_questions.unwrap_or(state.config.max_questions);
    if max_questions == 0 {
        return Err(AppError::Validation(
            "max_questions must be at least 1".to_string(),
        ));
    }

    let mut orchestrator =
        InterviewOrchestrator::new(state.agents.clone(), state.config.skill_catalogue.clone());
    let outcome = orchestrator.start(candidate, max_questions).await?;
    state.insert_session(orchestrator).await;

    Ok((StatusCode::CREATED, Json(outcome)))
}

/// POST /api/v1/interviews/:id/responses
pub async fn handle_respond(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    if request.answer.trim().is_empty() {
        return Err(AppError::Validation("answer cannot be empty".to_string()));
    }

    let session = state.session(id).await?;
    let mut orchestrator = session.lock().await;
    let outcome = orchestrator.process_response(&request.answer).await?;

    Ok(Json(AnswerResponse {
        session_id: id,
        outcome,
    }))
}

/// POST /api/v1/interviews/:id/complete
///
/// Ends the session early with a final decision.
pub async fn handle_complete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Completion>, AppError> {
    let session = state.session(id).await?;
    let mut orchestrator = session.lock().await;
    let completion = orchestrator.complete(CompletionReason::Manual).await?;
    Ok(Json(completion))
}

/// GET /api/v1/interviews/:id/progress
pub async fn handle_progress(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Progress>, AppError> {
    let session = state.session(id).await?;
    let orchestrator = session.lock().await;
    Ok(Json(orchestrator.progress()))
}

/// GET /api/v1/interviews/:id/results
pub async fn handle_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FinalResults>, AppError> {
    let session = state.session(id).await?;
    let orchestrator = session.lock().await;
    Ok(Json(orchestrator.final_results()?))
}

/// GET /api/v1/interviews/:id/dataset
///
/// The dataset attached to the question currently awaiting an answer.
pub async fn handle_dataset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DatasetHandle>, AppError> {
    let session = state.session(id).await?;
    let orchestrator = session.lock().await;
    orchestrator
        .current_dataset()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("The current question has no dataset".to_string()))
}

/// DELETE /api/v1/interviews/:id
///
/// Discards the session. Starting over means creating a new one.
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .remove_session(id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| AppError::NotFound(format!("Interview session {id} not found")))
}
