use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::{require_learner, CurrentAccount};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::submission::SubmissionResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/:submission_id", get(get_submission))
}

async fn get_submission(
    Path(submission_id): Path<String>,
    CurrentAccount(account): CurrentAccount,
    State(state): State<AppState>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let learner = require_learner(&state, &account).await?;

    let submission = repositories::submissions::find_by_id(state.db(), &submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load submission"))?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    if submission.learner_id != learner.id {
        return Err(ApiError::Forbidden("Access denied"));
    }

    let assets = repositories::submissions::list_assets(state.db(), &submission.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load submission assets"))?;

    Ok(Json(SubmissionResponse::from_db(submission, &assets)))
}
