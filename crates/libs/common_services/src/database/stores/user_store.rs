use crate::database::DbError;
use crate::database::ids_json;
use crate::database::tables::app_user::{User, UserWithPassword};
use chrono::Utc;
use sqlx::{Executor, Sqlite};

pub struct UserStore;

impl UserStore {
    /// Creates a new user. A taken email or username surfaces as [`DbError::UniqueViolation`].
    pub async fn create(
        executor: impl Executor<'_, Database = Sqlite>,
        username: &str,
        email: &str,
        hashed_password: &str,
    ) -> Result<User, DbError> {
        Ok(sqlx::query_as::<_, User>(
            r"
            INSERT INTO app_user (username, email, password, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, email, created_at
            ",
        )
        .bind(username)
        .bind(email)
        .bind(hashed_password)
        .bind(Utc::now())
        .fetch_one(executor)
        .await?)
    }

    pub async fn find_by_id(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
    ) -> Result<Option<User>, DbError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, username, email, created_at FROM app_user WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await?)
    }

    /// Email comparison is case-insensitive (the column collates `NOCASE`).
    pub async fn find_by_email(
        executor: impl Executor<'_, Database = Sqlite>,
        email: &str,
    ) -> Result<Option<User>, DbError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, username, email, created_at FROM app_user WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(executor)
        .await?)
    }

    pub async fn find_by_email_with_password(
        executor: impl Executor<'_, Database = Sqlite>,
        email: &str,
    ) -> Result<Option<UserWithPassword>, DbError> {
        Ok(sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, username, email, created_at, password FROM app_user WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(executor)
        .await?)
    }

    pub async fn list_by_ids(
        executor: impl Executor<'_, Database = Sqlite>,
        user_ids: &[i64],
    ) -> Result<Vec<User>, DbError> {
        Ok(sqlx::query_as::<_, User>(
            r"
            SELECT id, username, email, created_at
            FROM app_user
            WHERE id IN (SELECT value FROM json_each(?))
            ",
        )
        .bind(ids_json(user_ids)?)
        .fetch_all(executor)
        .await?)
    }

    /// Deletes a user. Their photos, albums and collaborations go with them.
    pub async fn delete(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
    ) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM app_user WHERE id = ?")
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
