use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Assignment;
use crate::db::types::{AssignmentKind, AssignmentStatus, EnrollmentStatus, ShowAnswersPolicy};

const COLUMNS: &str = "\
    id, course_id, title, description, kind, status, deadline, show_answers, \
    created_by, created_at, updated_at";

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!("SELECT {COLUMNS} FROM assignments WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Assignments visible to a learner: non-draft assignments of courses the
/// learner is actively enrolled in.
pub(crate) async fn list_for_learner(
    pool: &PgPool,
    learner_id: &str,
) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "SELECT {COLUMNS_QUALIFIED} FROM assignments a
         JOIN enrollments e ON e.course_id = a.course_id
         WHERE e.learner_id = $1
           AND e.status = $2
           AND a.status <> $3
         ORDER BY a.created_at DESC",
        COLUMNS_QUALIFIED = "a.id, a.course_id, a.title, a.description, a.kind, a.status, \
                             a.deadline, a.show_answers, a.created_by, a.created_at, a.updated_at",
    ))
    .bind(learner_id)
    .bind(EnrollmentStatus::Active)
    .bind(AssignmentStatus::Draft)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateAssignment<'a> {
    pub id: &'a str,
    pub course_id: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub kind: AssignmentKind,
    pub status: AssignmentStatus,
    pub deadline: Option<PrimitiveDateTime>,
    pub show_answers: ShowAnswersPolicy,
    pub created_by: &'a str,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateAssignment<'_>,
) -> Result<Assignment, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "INSERT INTO assignments (
            id, course_id, title, description, kind, status, deadline, show_answers,
            created_by, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.kind)
    .bind(params.status)
    .bind(params.deadline)
    .bind(params.show_answers)
    .bind(params.created_by)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}
