use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Course;

const COLUMNS: &str = "id, title, instructor_id, is_active, created_at, updated_at";

pub(crate) struct CreateCourse<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub instructor_id: &'a str,
    pub is_active: bool,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateCourse<'_>) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (id, title, instructor_id, is_active, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.title)
    .bind(params.instructor_id)
    .bind(params.is_active)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}
