use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::{AssignmentQuestion, QuestionOption};
use crate::db::types::QuestionKind;

/// Questions of an assignment with their per-assignment ordinal ids,
/// ordered by position.
pub(crate) async fn list_for_assignment(
    pool: &PgPool,
    assignment_id: &str,
) -> Result<Vec<AssignmentQuestion>, sqlx::Error> {
    sqlx::query_as::<_, AssignmentQuestion>(
        "SELECT aq.id AS assignment_question_id, q.id AS question_id, q.content, q.kind,
                q.canonical_answer, q.points, aq.position
         FROM assignment_questions aq
         JOIN questions q ON q.id = aq.question_id
         WHERE aq.assignment_id = $1
         ORDER BY aq.position, aq.id",
    )
    .bind(assignment_id)
    .fetch_all(pool)
    .await
}

/// Options of every question attached to an assignment, ordered per question.
pub(crate) async fn list_options_for_assignment(
    pool: &PgPool,
    assignment_id: &str,
) -> Result<Vec<QuestionOption>, sqlx::Error> {
    sqlx::query_as::<_, QuestionOption>(
        "SELECT o.id, o.question_id, o.content, o.is_correct, o.position
         FROM question_options o
         JOIN assignment_questions aq ON aq.question_id = o.question_id
         WHERE aq.assignment_id = $1
         ORDER BY o.question_id, o.position, o.id",
    )
    .bind(assignment_id)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateQuestion<'a> {
    pub id: &'a str,
    pub content: &'a str,
    pub kind: QuestionKind,
    pub canonical_answer: Option<&'a str>,
    pub points: f64,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateQuestion<'_>) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO questions (id, content, kind, canonical_answer, points, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6,$7)",
    )
    .bind(params.id)
    .bind(params.content)
    .bind(params.kind)
    .bind(params.canonical_answer)
    .bind(params.points)
    .bind(params.created_at)
    .bind(params.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn create_option(
    pool: &PgPool,
    id: &str,
    question_id: &str,
    content: &str,
    is_correct: bool,
    position: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO question_options (id, question_id, content, is_correct, position)
         VALUES ($1,$2,$3,$4,$5)",
    )
    .bind(id)
    .bind(question_id)
    .bind(content)
    .bind(is_correct)
    .bind(position)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn attach_to_assignment(
    pool: &PgPool,
    id: &str,
    assignment_id: &str,
    question_id: &str,
    position: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO assignment_questions (id, assignment_id, question_id, position)
         VALUES ($1,$2,$3,$4)",
    )
    .bind(id)
    .bind(assignment_id)
    .bind(question_id)
    .bind(position)
    .execute(pool)
    .await?;
    Ok(())
}
