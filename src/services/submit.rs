use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Account, Submission};
use crate::db::types::{AssetKind, AssignmentKind, AssignmentStatus, QuestionKind, SubmissionStatus};
use crate::repositories;
use crate::services::grading::{self, QuestionSet};

#[derive(Debug, Error)]
pub(crate) enum SubmitError {
    #[error("Learner profile not found")]
    LearnerProfileNotFound,
    #[error("Assignment not found")]
    AssignmentNotFound,
    #[error("Not enrolled in this course")]
    NotEnrolled,
    #[error("Assignment is not available")]
    AssignmentNotAvailable,
    #[error("Assignment already submitted")]
    AlreadySubmitted,
    #[error("Invalid answer payload: {0}")]
    InvalidAnswerPayload(String),
    #[error("Audio storage is not configured")]
    StorageUnavailable,
    #[error("Audio upload failed")]
    UploadFailed(anyhow::Error),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

#[derive(Debug)]
pub(crate) struct AudioUpload {
    pub(crate) filename: String,
    pub(crate) content_type: String,
    pub(crate) bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub(crate) struct SubmitRequest {
    pub(crate) answers: HashMap<String, String>,
    pub(crate) content: Option<String>,
    pub(crate) duration_sec: Option<i32>,
    pub(crate) audio: Option<AudioUpload>,
}

/// One learner attempt at an assignment. Terminal either way: a successful
/// call persists the only submission this learner will ever have for the
/// assignment, and every precondition failure rejects without side effects.
pub(crate) async fn submit_assignment(
    state: &AppState,
    account: &Account,
    assignment_id: &str,
    request: SubmitRequest,
) -> Result<Submission, SubmitError> {
    let learner = repositories::learners::find_by_account_id(state.db(), &account.id)
        .await?
        .ok_or(SubmitError::LearnerProfileNotFound)?;

    let assignment = repositories::assignments::find_by_id(state.db(), assignment_id)
        .await?
        .ok_or(SubmitError::AssignmentNotFound)?;

    let enrolled =
        repositories::enrollments::is_enrolled(state.db(), &assignment.course_id, &learner.id)
            .await?;
    if !enrolled {
        return Err(SubmitError::NotEnrolled);
    }

    if assignment.status != AssignmentStatus::Active {
        return Err(SubmitError::AssignmentNotAvailable);
    }

    let existing = repositories::submissions::find_by_assignment_and_learner(
        state.db(),
        assignment_id,
        &learner.id,
    )
    .await?;
    if existing.is_some() {
        return Err(SubmitError::AlreadySubmitted);
    }

    let now = primitive_now_utc();
    let status = submission_status(assignment.deadline, now);

    let questions = QuestionSet::new(
        repositories::questions::list_for_assignment(state.db(), assignment_id).await?,
        repositories::questions::list_options_for_assignment(state.db(), assignment_id).await?,
    );

    let answers = collect_answers(&questions, &request.answers)?;
    let score = grading::aggregate_score(&questions, &answers);

    let audio = match (assignment.kind, request.audio) {
        (AssignmentKind::Audio, Some(upload)) => {
            Some(upload_audio(state, assignment_id, &learner.id, upload).await?)
        }
        _ => None,
    };

    let submission_id = Uuid::new_v4().to_string();

    let mut tx = state.db().begin().await?;

    let inserted = repositories::submissions::insert_if_absent(
        &mut *tx,
        repositories::submissions::CreateSubmission {
            id: &submission_id,
            assignment_id,
            learner_id: &learner.id,
            status,
            score,
            content: request.content.as_deref(),
            audio_url: audio.as_ref().map(|uploaded| uploaded.url.as_str()),
            audio_duration_sec: request.duration_sec,
            submitted_at: now,
            now,
        },
    )
    .await?;

    if !inserted {
        // Lost a race with a concurrent submit; the unique index kept the
        // invariant, surface it like the sequential duplicate.
        return Err(SubmitError::AlreadySubmitted);
    }

    for (ordinal_id, answer) in &answers {
        repositories::answers::upsert(
            &mut *tx,
            &Uuid::new_v4().to_string(),
            &learner.id,
            ordinal_id,
            answer,
            now,
        )
        .await?;
    }

    if let Some(uploaded) = &audio {
        repositories::submissions::insert_asset(
            &mut *tx,
            repositories::submissions::CreateAsset {
                id: &Uuid::new_v4().to_string(),
                submission_id: &submission_id,
                kind: AssetKind::Audio,
                object_key: &uploaded.key,
                url: &uploaded.url,
                content_type: &uploaded.content_type,
                file_size: uploaded.file_size,
                duration_sec: request.duration_sec,
                uploaded_at: now,
            },
        )
        .await?;
    }

    tx.commit().await?;

    let submission =
        repositories::submissions::find_by_id(state.db(), &submission_id).await?.ok_or_else(
            || SubmitError::Db(sqlx::Error::RowNotFound),
        )?;

    tracing::info!(
        assignment_id = %assignment_id,
        learner_id = %learner.id,
        status = ?submission.status,
        score = submission.score,
        answers = answers.len(),
        "Submission recorded"
    );

    Ok(submission)
}

/// A passed deadline does not block submission; it only marks the attempt
/// late. Only the assignment status gate can block.
fn submission_status(
    deadline: Option<time::PrimitiveDateTime>,
    now: time::PrimitiveDateTime,
) -> SubmissionStatus {
    match deadline {
        Some(deadline) if now > deadline => SubmissionStatus::Late,
        _ => SubmissionStatus::Submitted,
    }
}

/// Keep only answers addressed to this assignment's ordinals and validate
/// matching blobs before anything is persisted. Unknown ordinals are dropped
/// the way the aggregator skips them.
fn collect_answers(
    questions: &QuestionSet,
    raw: &HashMap<String, String>,
) -> Result<Vec<(String, String)>, SubmitError> {
    let mut answers = Vec::with_capacity(raw.len());

    for (ordinal_id, answer) in raw {
        let Some(question) = questions.get(ordinal_id) else {
            tracing::warn!(ordinal_id = %ordinal_id, "Dropping answer for unknown question");
            continue;
        };

        if question.kind == QuestionKind::Matching
            && grading::parse_match_pairs(answer).is_err()
        {
            return Err(SubmitError::InvalidAnswerPayload(format!(
                "answer for question {ordinal_id} is not a list of left/right pairs"
            )));
        }

        answers.push((ordinal_id.clone(), answer.clone()));
    }

    // Deterministic persistence and scoring order.
    answers.sort();
    Ok(answers)
}

struct UploadedAudio {
    key: String,
    url: String,
    content_type: String,
    file_size: i64,
}

async fn upload_audio(
    state: &AppState,
    assignment_id: &str,
    learner_id: &str,
    upload: AudioUpload,
) -> Result<UploadedAudio, SubmitError> {
    let storage = state.storage().ok_or(SubmitError::StorageUnavailable)?;

    let object_id = Uuid::new_v4().to_string();
    let key = format!(
        "submissions/{assignment_id}/{learner_id}/{object_id}_{}",
        crate::api::validation::sanitized_filename(&upload.filename)
    );

    let (file_size, _hash) = storage
        .upload_bytes(&key, &upload.content_type, upload.bytes)
        .await
        .map_err(SubmitError::UploadFailed)?;

    let url = storage.object_url(&key);

    Ok(UploadedAudio { key, url, content_type: upload.content_type, file_size })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::types::QuestionKind;
    use crate::test_support::question_row;
    use time::macros::datetime;

    #[test]
    fn submission_after_deadline_is_late() {
        let deadline = datetime!(2024-01-10 00:00);

        assert_eq!(
            submission_status(Some(deadline), datetime!(2024-01-11 00:00)),
            SubmissionStatus::Late
        );
        assert_eq!(
            submission_status(Some(deadline), datetime!(2024-01-09 00:00)),
            SubmissionStatus::Submitted
        );
        assert_eq!(submission_status(Some(deadline), deadline), SubmissionStatus::Submitted);
    }

    #[test]
    fn submission_without_deadline_is_never_late() {
        assert_eq!(
            submission_status(None, datetime!(2030-01-01 00:00)),
            SubmissionStatus::Submitted
        );
    }

    fn question_set(questions: Vec<crate::db::models::AssignmentQuestion>) -> QuestionSet {
        QuestionSet::new(questions, vec![])
    }

    #[test]
    fn collect_answers_drops_unknown_ordinals() {
        let set = question_set(vec![question_row(
            "aq-1",
            "q-1",
            QuestionKind::TrueFalse,
            Some("true"),
            1.0,
        )]);

        let mut raw = HashMap::new();
        raw.insert("aq-1".to_string(), "true".to_string());
        raw.insert("aq-elsewhere".to_string(), "true".to_string());

        let answers = collect_answers(&set, &raw).expect("answers");
        assert_eq!(answers, vec![("aq-1".to_string(), "true".to_string())]);
    }

    #[test]
    fn collect_answers_rejects_malformed_matching_blob() {
        let set = question_set(vec![question_row(
            "aq-1",
            "q-1",
            QuestionKind::Matching,
            Some(r#"[{"left":"a","right":"b"}]"#),
            1.0,
        )]);

        let mut raw = HashMap::new();
        raw.insert("aq-1".to_string(), "{not pairs".to_string());

        let error = collect_answers(&set, &raw).unwrap_err();
        assert!(matches!(error, SubmitError::InvalidAnswerPayload(_)));
    }

    #[test]
    fn collect_answers_accepts_valid_matching_blob() {
        let set = question_set(vec![question_row(
            "aq-1",
            "q-1",
            QuestionKind::Matching,
            Some(r#"[{"left":"a","right":"b"}]"#),
            1.0,
        )]);

        let mut raw = HashMap::new();
        raw.insert("aq-1".to_string(), r#"[{"left":"a","right":"b"}]"#.to_string());

        let answers = collect_answers(&set, &raw).expect("answers");
        assert_eq!(answers.len(), 1);
    }
}
