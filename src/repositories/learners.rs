use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Learner;

const COLUMNS: &str = "id, account_id, full_name, created_at, updated_at";

pub(crate) async fn find_by_account_id(
    pool: &PgPool,
    account_id: &str,
) -> Result<Option<Learner>, sqlx::Error> {
    sqlx::query_as::<_, Learner>(&format!("SELECT {COLUMNS} FROM learners WHERE account_id = $1"))
        .bind(account_id)
        .fetch_optional(pool)
        .await
}

pub(crate) struct CreateLearner<'a> {
    pub id: &'a str,
    pub account_id: &'a str,
    pub full_name: &'a str,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateLearner<'_>,
) -> Result<Learner, sqlx::Error> {
    sqlx::query_as::<_, Learner>(&format!(
        "INSERT INTO learners (id, account_id, full_name, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.account_id)
    .bind(params.full_name)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}
