use crate::database::DbError;
use crate::database::tables::collaboration::{
    Collaboration, ContentType, Permission, SharedItem,
};
use chrono::Utc;
use sqlx::{Executor, Sqlite};

pub struct CollaborationStore;

impl CollaborationStore {
    /// Inserts a grant. A second grant for the same (grantee, item) hits the partial unique
    /// index and comes back as [`DbError::UniqueViolation`].
    pub async fn create(
        executor: impl Executor<'_, Database = Sqlite>,
        shared_by_id: i64,
        shared_with_id: i64,
        item: SharedItem,
        permission: Permission,
        message: &str,
    ) -> Result<Collaboration, DbError> {
        Ok(sqlx::query_as::<_, Collaboration>(
            r"
            INSERT INTO collaboration
                (shared_by_id, shared_with_id, message, content_type, photo_id, album_id, permission, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            ",
        )
        .bind(shared_by_id)
        .bind(shared_with_id)
        .bind(message)
        .bind(item.content_type())
        .bind(item.photo_id())
        .bind(item.album_id())
        .bind(permission)
        .bind(Utc::now())
        .fetch_one(executor)
        .await?)
    }

    pub async fn find_by_id(
        executor: impl Executor<'_, Database = Sqlite>,
        collaboration_id: i64,
    ) -> Result<Option<Collaboration>, DbError> {
        Ok(
            sqlx::query_as::<_, Collaboration>("SELECT * FROM collaboration WHERE id = ?")
                .bind(collaboration_id)
                .fetch_optional(executor)
                .await?,
        )
    }

    /// The permission granted to `user_id` on `item`, if any.
    pub async fn find_permission(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
        item: SharedItem,
    ) -> Result<Option<Permission>, DbError> {
        Ok(sqlx::query_scalar::<_, Permission>(
            r"
            SELECT permission
            FROM collaboration
            WHERE shared_with_id = ?1
              AND content_type = ?2
              AND (photo_id = ?3 OR album_id = ?4)
            ",
        )
        .bind(user_id)
        .bind(item.content_type())
        .bind(item.photo_id())
        .bind(item.album_id())
        .fetch_optional(executor)
        .await?)
    }

    /// `None` leaves a field unchanged.
    pub async fn update(
        executor: impl Executor<'_, Database = Sqlite>,
        collaboration_id: i64,
        permission: Option<Permission>,
        message: Option<&str>,
    ) -> Result<Collaboration, DbError> {
        Ok(sqlx::query_as::<_, Collaboration>(
            r"
            UPDATE collaboration
            SET
                permission = COALESCE(?, permission),
                message = COALESCE(?, message)
            WHERE id = ?
            RETURNING *
            ",
        )
        .bind(permission)
        .bind(message)
        .bind(collaboration_id)
        .fetch_one(executor)
        .await?)
    }

    pub async fn delete(
        executor: impl Executor<'_, Database = Sqlite>,
        collaboration_id: i64,
    ) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM collaboration WHERE id = ?")
            .bind(collaboration_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    //================================================================================
    // Listings
    //================================================================================

    /// Grants created by the user, newest first, optionally of one content type.
    pub async fn list_shared_by(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
        content_type: Option<ContentType>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Collaboration>, DbError> {
        Ok(sqlx::query_as::<_, Collaboration>(
            r"
            SELECT *
            FROM collaboration
            WHERE shared_by_id = ?1 AND (?2 IS NULL OR content_type = ?2)
            ORDER BY created_at DESC, id DESC
            LIMIT ?3 OFFSET ?4
            ",
        )
        .bind(user_id)
        .bind(content_type)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?)
    }

    pub async fn count_shared_by(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
        content_type: Option<ContentType>,
    ) -> Result<i64, DbError> {
        Ok(sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM collaboration
            WHERE shared_by_id = ?1 AND (?2 IS NULL OR content_type = ?2)
            ",
        )
        .bind(user_id)
        .bind(content_type)
        .fetch_one(executor)
        .await?)
    }

    /// Grants naming the user as grantee, newest first.
    pub async fn list_shared_with(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
        content_type: Option<ContentType>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Collaboration>, DbError> {
        Ok(sqlx::query_as::<_, Collaboration>(
            r"
            SELECT *
            FROM collaboration
            WHERE shared_with_id = ?1 AND (?2 IS NULL OR content_type = ?2)
            ORDER BY created_at DESC, id DESC
            LIMIT ?3 OFFSET ?4
            ",
        )
        .bind(user_id)
        .bind(content_type)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?)
    }

    pub async fn count_shared_with(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
        content_type: Option<ContentType>,
    ) -> Result<i64, DbError> {
        Ok(sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM collaboration
            WHERE shared_with_id = ?1 AND (?2 IS NULL OR content_type = ?2)
            ",
        )
        .bind(user_id)
        .bind(content_type)
        .fetch_one(executor)
        .await?)
    }
}
