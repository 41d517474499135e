use sqlx::{PgConnection, PgPool};
use time::PrimitiveDateTime;

use crate::db::models::SubmissionAnswer;

/// Upsert keyed by (learner_id, assignment_question_id); the latest write
/// wins when a submission payload repeats an ordinal.
pub(crate) async fn upsert(
    conn: &mut PgConnection,
    id: &str,
    learner_id: &str,
    assignment_question_id: &str,
    answer: &str,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO submission_answers (
            id, learner_id, assignment_question_id, answer, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$5)
        ON CONFLICT (learner_id, assignment_question_id)
        DO UPDATE SET answer = EXCLUDED.answer, updated_at = EXCLUDED.updated_at",
    )
    .bind(id)
    .bind(learner_id)
    .bind(assignment_question_id)
    .bind(answer)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

pub(crate) async fn list_for_assignment(
    pool: &PgPool,
    assignment_id: &str,
    learner_id: &str,
) -> Result<Vec<SubmissionAnswer>, sqlx::Error> {
    sqlx::query_as::<_, SubmissionAnswer>(&format!(
        "SELECT {COLUMNS_QUALIFIED} FROM submission_answers sa
         JOIN assignment_questions aq ON aq.id = sa.assignment_question_id
         WHERE aq.assignment_id = $1 AND sa.learner_id = $2
         ORDER BY aq.position, aq.id",
        COLUMNS_QUALIFIED = "sa.id, sa.learner_id, sa.assignment_question_id, sa.answer, \
                             sa.created_at, sa.updated_at",
    ))
    .bind(assignment_id)
    .bind(learner_id)
    .fetch_all(pool)
    .await
}
