use sqlx::{PgConnection, PgPool};
use time::PrimitiveDateTime;

use crate::db::models::{Submission, SubmissionAsset};
use crate::db::types::{AssetKind, SubmissionStatus};

const COLUMNS: &str = "\
    id, assignment_id, learner_id, status, score, content, audio_url, \
    audio_duration_sec, submitted_at, created_at, updated_at";

const ASSET_COLUMNS: &str = "\
    id, submission_id, kind, object_key, url, content_type, file_size, \
    duration_sec, uploaded_at";

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!("SELECT {COLUMNS} FROM submissions WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_assignment_and_learner(
    pool: &PgPool,
    assignment_id: &str,
    learner_id: &str,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {COLUMNS} FROM submissions WHERE assignment_id = $1 AND learner_id = $2"
    ))
    .bind(assignment_id)
    .bind(learner_id)
    .fetch_optional(pool)
    .await
}

pub(crate) struct CreateSubmission<'a> {
    pub id: &'a str,
    pub assignment_id: &'a str,
    pub learner_id: &'a str,
    pub status: SubmissionStatus,
    pub score: f64,
    pub content: Option<&'a str>,
    pub audio_url: Option<&'a str>,
    pub audio_duration_sec: Option<i32>,
    pub submitted_at: PrimitiveDateTime,
    pub now: PrimitiveDateTime,
}

/// Idempotent insert guarded by the (assignment_id, learner_id) unique index.
/// Returns false when a submission already exists; the loser of a concurrent
/// race lands here instead of creating a duplicate row.
pub(crate) async fn insert_if_absent(
    conn: &mut PgConnection,
    params: CreateSubmission<'_>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO submissions (
            id, assignment_id, learner_id, status, score, content, audio_url,
            audio_duration_sec, submitted_at, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
        ON CONFLICT (assignment_id, learner_id) DO NOTHING",
    )
    .bind(params.id)
    .bind(params.assignment_id)
    .bind(params.learner_id)
    .bind(params.status)
    .bind(params.score)
    .bind(params.content)
    .bind(params.audio_url)
    .bind(params.audio_duration_sec)
    .bind(params.submitted_at)
    .bind(params.now)
    .bind(params.now)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub(crate) struct CreateAsset<'a> {
    pub id: &'a str,
    pub submission_id: &'a str,
    pub kind: AssetKind,
    pub object_key: &'a str,
    pub url: &'a str,
    pub content_type: &'a str,
    pub file_size: i64,
    pub duration_sec: Option<i32>,
    pub uploaded_at: PrimitiveDateTime,
}

pub(crate) async fn insert_asset(
    conn: &mut PgConnection,
    params: CreateAsset<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO submission_assets (
            id, submission_id, kind, object_key, url, content_type, file_size,
            duration_sec, uploaded_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)",
    )
    .bind(params.id)
    .bind(params.submission_id)
    .bind(params.kind)
    .bind(params.object_key)
    .bind(params.url)
    .bind(params.content_type)
    .bind(params.file_size)
    .bind(params.duration_sec)
    .bind(params.uploaded_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub(crate) async fn list_assets(
    pool: &PgPool,
    submission_id: &str,
) -> Result<Vec<SubmissionAsset>, sqlx::Error> {
    sqlx::query_as::<_, SubmissionAsset>(&format!(
        "SELECT {ASSET_COLUMNS} FROM submission_assets
         WHERE submission_id = $1
         ORDER BY uploaded_at, id"
    ))
    .bind(submission_id)
    .fetch_all(pool)
    .await
}
