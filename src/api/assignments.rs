use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::{require_enrollment, require_learner, CurrentAccount};
use crate::api::validation::validate_audio_upload;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::assignment::{
    AssignmentQuestionResponse, AssignmentResponse, SubmissionSummary,
};
use crate::schemas::submission::{QuestionResultResponse, ResultsResponse, SubmissionResponse};
use crate::services::grading;
use crate::services::submit::{self, AudioUpload, SubmitRequest};
use crate::services::visibility;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assignments))
        .route("/:assignment_id", get(get_assignment))
        .route("/:assignment_id/questions", get(list_questions))
        .route("/:assignment_id/submit", post(submit_assignment))
        .route("/:assignment_id/results", get(get_results))
}

async fn list_assignments(
    CurrentAccount(account): CurrentAccount,
    State(state): State<AppState>,
) -> Result<Json<Vec<AssignmentResponse>>, ApiError> {
    let learner = require_learner(&state, &account).await?;

    let assignments = repositories::assignments::list_for_learner(state.db(), &learner.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assignments"))?;

    let mut responses = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        let submission = repositories::submissions::find_by_assignment_and_learner(
            state.db(),
            &assignment.id,
            &learner.id,
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load submission"))?;

        responses.push(AssignmentResponse::from_db(assignment, submission.as_ref()));
    }

    Ok(Json(responses))
}

async fn get_assignment(
    Path(assignment_id): Path<String>,
    CurrentAccount(account): CurrentAccount,
    State(state): State<AppState>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    let learner = require_learner(&state, &account).await?;
    let assignment = fetch_assignment(&state, &assignment_id).await?;
    require_enrollment(&state, &assignment.course_id, &learner.id).await?;

    let submission = repositories::submissions::find_by_assignment_and_learner(
        state.db(),
        &assignment_id,
        &learner.id,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to load submission"))?;

    Ok(Json(AssignmentResponse::from_db(assignment, submission.as_ref())))
}

async fn list_questions(
    Path(assignment_id): Path<String>,
    CurrentAccount(account): CurrentAccount,
    State(state): State<AppState>,
) -> Result<Json<Vec<AssignmentQuestionResponse>>, ApiError> {
    let learner = require_learner(&state, &account).await?;
    let assignment = fetch_assignment(&state, &assignment_id).await?;
    require_enrollment(&state, &assignment.course_id, &learner.id).await?;

    let questions = repositories::questions::list_for_assignment(state.db(), &assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load questions"))?;
    let options =
        repositories::questions::list_options_for_assignment(state.db(), &assignment_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load question options"))?;

    let mut options_by_question: HashMap<String, Vec<_>> = HashMap::new();
    for option in options {
        options_by_question.entry(option.question_id.clone()).or_default().push(option);
    }

    let responses = questions
        .iter()
        .map(|question| {
            let options = options_by_question
                .get(&question.question_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            AssignmentQuestionResponse::from_db(question, options)
        })
        .collect();

    Ok(Json(responses))
}

async fn submit_assignment(
    Path(assignment_id): Path<String>,
    CurrentAccount(account): CurrentAccount,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let request = parse_submit_multipart(&state, multipart).await?;

    let submission =
        submit::submit_assignment(&state, &account, &assignment_id, request).await?;

    let assets = repositories::submissions::list_assets(state.db(), &submission.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load submission assets"))?;

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from_db(submission, &assets))))
}

async fn get_results(
    Path(assignment_id): Path<String>,
    CurrentAccount(account): CurrentAccount,
    State(state): State<AppState>,
) -> Result<Json<ResultsResponse>, ApiError> {
    let learner = require_learner(&state, &account).await?;
    let assignment = fetch_assignment(&state, &assignment_id).await?;
    require_enrollment(&state, &assignment.course_id, &learner.id).await?;

    let submission = repositories::submissions::find_by_assignment_and_learner(
        state.db(),
        &assignment_id,
        &learner.id,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to load submission"))?
    .ok_or_else(|| ApiError::NotFound("No submission found for this assignment".to_string()))?;

    let questions = repositories::questions::list_for_assignment(state.db(), &assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load questions"))?;
    let options =
        repositories::questions::list_options_for_assignment(state.db(), &assignment_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load question options"))?;

    let mut options_by_question: HashMap<String, Vec<_>> = HashMap::new();
    for option in options {
        options_by_question.entry(option.question_id.clone()).or_default().push(option);
    }

    let answers =
        repositories::answers::list_for_assignment(state.db(), &assignment_id, &learner.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load answers"))?;
    let answers_by_ordinal: HashMap<&str, &str> = answers
        .iter()
        .map(|answer| (answer.assignment_question_id.as_str(), answer.answer.as_str()))
        .collect();

    let answers_visible = visibility::can_show_answers(
        assignment.show_answers,
        assignment.deadline,
        primitive_now_utc(),
    );

    let results = questions
        .iter()
        .map(|question| {
            let your_answer =
                answers_by_ordinal.get(question.assignment_question_id.as_str()).copied();
            let options = options_by_question
                .get(&question.question_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            // Correctness details stay hidden until the policy opens them.
            let (verdict, correct_answer, correct_option_id) = if answers_visible {
                let verdict = your_answer
                    .map(|answer| grading::evaluate(question, options, answer));
                let correct_option_id = options
                    .iter()
                    .filter(|option| option.is_correct)
                    .map(|option| option.id.clone())
                    .collect::<Vec<_>>();
                let correct_option_id = match correct_option_id.as_slice() {
                    [single] => Some(single.clone()),
                    _ => None,
                };
                (verdict, question.canonical_answer.clone(), correct_option_id)
            } else {
                (None, None, None)
            };

            QuestionResultResponse {
                id: question.assignment_question_id.clone(),
                content: question.content.clone(),
                kind: question.kind,
                points: question.points,
                position: question.position,
                your_answer: your_answer.map(str::to_string),
                verdict,
                correct_answer,
                correct_option_id,
            }
        })
        .collect();

    Ok(Json(ResultsResponse {
        assignment_id,
        submission: SubmissionSummary::from_db(&submission),
        answers_visible,
        questions: results,
    }))
}

async fn fetch_assignment(
    state: &AppState,
    assignment_id: &str,
) -> Result<crate::db::models::Assignment, ApiError> {
    repositories::assignments::find_by_id(state.db(), assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load assignment"))?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))
}

async fn parse_submit_multipart(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<SubmitRequest, ApiError> {
    let mut request = SubmitRequest::default();
    let max_bytes = state.settings().storage().max_upload_size_mb * 1024 * 1024;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "answers" => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| ApiError::BadRequest("Failed to read answers".to_string()))?;
                request.answers = serde_json::from_str::<HashMap<String, String>>(&text)
                    .map_err(|_| {
                        ApiError::BadRequest(
                            "answers must be a JSON object of question id to answer".to_string(),
                        )
                    })?;
            }
            "content" => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| ApiError::BadRequest("Failed to read content".to_string()))?;
                if !text.is_empty() {
                    request.content = Some(text);
                }
            }
            "duration_sec" => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| ApiError::BadRequest("Invalid duration".to_string()))?;
                let duration = text.parse::<i32>().map_err(|_| {
                    ApiError::BadRequest("duration_sec must be a valid integer".to_string())
                })?;
                if duration < 0 {
                    return Err(ApiError::BadRequest(
                        "duration_sec must not be negative".to_string(),
                    ));
                }
                request.duration_sec = Some(duration);
            }
            "audio_file" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| ApiError::BadRequest("Audio file needs a name".to_string()))?;
                let content_type =
                    field.content_type().unwrap_or("application/octet-stream").to_string();

                validate_audio_upload(
                    &filename,
                    &content_type,
                    &state.settings().storage().allowed_audio_extensions,
                )?;

                let mut bytes = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|_| ApiError::BadRequest("Failed to read audio file".to_string()))?
                {
                    let next_size = bytes.len() as u64 + chunk.len() as u64;
                    if next_size > max_bytes {
                        return Err(ApiError::BadRequest(format!(
                            "File size exceeds {}MB limit",
                            state.settings().storage().max_upload_size_mb
                        )));
                    }
                    bytes.extend_from_slice(&chunk);
                }

                request.audio = Some(AudioUpload { filename, content_type, bytes });
            }
            _ => {}
        }
    }

    Ok(request)
}
