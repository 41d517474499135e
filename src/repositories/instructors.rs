use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Instructor;

const COLUMNS: &str = "id, account_id, full_name, created_at, updated_at";

pub(crate) struct CreateInstructor<'a> {
    pub id: &'a str,
    pub account_id: &'a str,
    pub full_name: &'a str,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateInstructor<'_>,
) -> Result<Instructor, sqlx::Error> {
    sqlx::query_as::<_, Instructor>(&format!(
        "INSERT INTO instructors (id, account_id, full_name, created_at, updated_at)
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
