use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::core::{security, state::AppState};
use crate::db::models::{Account, Learner};
use crate::repositories;

pub(crate) struct CurrentAccount(pub(crate) Account);

#[async_trait]
impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let claims = security::verify_token(token, app_state.settings())
            .map_err(|_| ApiError::Unauthorized("Invalid authentication credentials"))?;

        let account = repositories::accounts::find_by_id(app_state.db(), &claims.sub)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load account"))?;

        let Some(account) = account else {
            return Err(ApiError::Unauthorized("Account not found"));
        };

        if !account.is_active {
            return Err(ApiError::Unauthorized("Invalid authentication credentials"));
        }

        Ok(CurrentAccount(account))
    }
}

/// Resolve the learner profile behind an account; the submission and result
/// flows are learner-only surfaces.
pub(crate) async fn require_learner(
    state: &AppState,
    account: &Account,
) -> Result<Learner, ApiError> {
    let learner = repositories::learners::find_by_account_id(state.db(), &account.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load learner profile"))?;

    learner.ok_or_else(|| ApiError::NotFound("Learner profile not found".to_string()))
}

pub(crate) async fn require_enrollment(
    state: &AppState,
    course_id: &str,
    learner_id: &str,
) -> Result<(), ApiError> {
    let enrolled = repositories::enrollments::is_enrolled(state.db(), course_id, learner_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?;

    if enrolled {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Not enrolled in this course"))
    }
}
