use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Enrollment;
use crate::db::types::EnrollmentStatus;

const COLUMNS: &str = "id, course_id, learner_id, status, created_at, updated_at";

pub(crate) async fn is_enrolled(
    pool: &PgPool,
    course_id: &str,
    learner_id: &str,
) -> Result<bool, sqlx::Error> {
    let found: Option<i32> = sqlx::query_scalar(
        "SELECT 1 FROM enrollments WHERE course_id = $1 AND learner_id = $2 AND status = $3",
    )
    .bind(course_id)
    .bind(learner_id)
    .bind(EnrollmentStatus::Active)
    .fetch_optional(pool)
    .await?;

    Ok(found.is_some())
}

pub(crate) struct CreateEnrollment<'a> {
    pub id: &'a str,
    pub course_id: &'a str,
    pub learner_id: &'a str,
    pub status: EnrollmentStatus,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateEnrollment<'_>,
) -> Result<Enrollment, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "INSERT INTO enrollments (id, course_id, learner_id, status, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.learner_id)
    .bind(params.status)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}
