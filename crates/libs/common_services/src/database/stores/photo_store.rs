use crate::database::DbError;
use crate::database::ids_json;
use crate::database::tables::photo::{Photo, PhotoWithOwner};
use chrono::Utc;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{Executor, Sqlite};

/// Visibility predicate on `photo p` for the user bound as `?1`: owned, or shared with them.
macro_rules! photo_visible_to_user {
    () => {
        r"(p.user_id = ?1 OR EXISTS (
            SELECT 1 FROM collaboration c
            WHERE c.content_type = 'PHOTO' AND c.photo_id = p.id AND c.shared_with_id = ?1
        ))"
    };
}

pub struct PhotoStore;

impl PhotoStore {
    //================================================================================
    // Single photo
    //================================================================================

    pub async fn create(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
        image: &str,
        format: &str,
        is_bookmarked: bool,
        metadata: &Value,
    ) -> Result<Photo, DbError> {
        let now = Utc::now();
        Ok(sqlx::query_as::<_, Photo>(
            r"
            INSERT INTO photo (user_id, image, format, is_bookmarked, metadata, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            ",
        )
        .bind(user_id)
        .bind(image)
        .bind(format)
        .bind(is_bookmarked)
        .bind(Json(metadata))
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?)
    }

    pub async fn find_by_id(
        executor: impl Executor<'_, Database = Sqlite>,
        photo_id: i64,
    ) -> Result<Option<Photo>, DbError> {
        Ok(
            sqlx::query_as::<_, Photo>("SELECT * FROM photo WHERE id = ?")
                .bind(photo_id)
                .fetch_optional(executor)
                .await?,
        )
    }

    pub async fn find_with_owner(
        executor: impl Executor<'_, Database = Sqlite>,
        photo_id: i64,
    ) -> Result<Option<PhotoWithOwner>, DbError> {
        Ok(sqlx::query_as::<_, PhotoWithOwner>(
            "SELECT p.*, u.username FROM photo p JOIN app_user u ON u.id = p.user_id WHERE p.id = ?",
        )
        .bind(photo_id)
        .fetch_optional(executor)
        .await?)
    }

    /// Updates the mutable fields of a photo. `None` leaves a field unchanged.
    pub async fn update(
        executor: impl Executor<'_, Database = Sqlite>,
        photo_id: i64,
        is_bookmarked: Option<bool>,
        metadata: Option<&Value>,
    ) -> Result<Photo, DbError> {
        Ok(sqlx::query_as::<_, Photo>(
            r"
            UPDATE photo
            SET
                is_bookmarked = COALESCE(?, is_bookmarked),
                metadata = COALESCE(?, metadata),
                updated_at = ?
            WHERE id = ?
            RETURNING *
            ",
        )
        .bind(is_bookmarked)
        .bind(metadata.map(Json))
        .bind(Utc::now())
        .bind(photo_id)
        .fetch_one(executor)
        .await?)
    }

    /// Deletes a photo. Its collaborations and album memberships cascade.
    pub async fn delete(
        executor: impl Executor<'_, Database = Sqlite>,
        photo_id: i64,
    ) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM photo WHERE id = ?")
            .bind(photo_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    //================================================================================
    // Listings
    //================================================================================

    pub async fn list_by_ids(
        executor: impl Executor<'_, Database = Sqlite>,
        photo_ids: &[i64],
    ) -> Result<Vec<Photo>, DbError> {
        Ok(sqlx::query_as::<_, Photo>(
            "SELECT * FROM photo WHERE id IN (SELECT value FROM json_each(?))",
        )
        .bind(ids_json(photo_ids)?)
        .fetch_all(executor)
        .await?)
    }

    /// Photos the user owns or received a grant on, newest first.
    pub async fn list_accessible(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Photo>, DbError> {
        Ok(sqlx::query_as::<_, Photo>(concat!(
            "SELECT p.* FROM photo p WHERE ",
            photo_visible_to_user!(),
            " ORDER BY p.created_at DESC, p.id DESC LIMIT ?2 OFFSET ?3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?)
    }

    pub async fn count_accessible(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
    ) -> Result<i64, DbError> {
        Ok(sqlx::query_scalar::<_, i64>(concat!(
            "SELECT COUNT(*) FROM photo p WHERE ",
            photo_visible_to_user!()
        ))
        .bind(user_id)
        .fetch_one(executor)
        .await?)
    }

    pub async fn list_accessible_bookmarked(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
    ) -> Result<Vec<Photo>, DbError> {
        Ok(sqlx::query_as::<_, Photo>(concat!(
            "SELECT p.* FROM photo p WHERE p.is_bookmarked AND ",
            photo_visible_to_user!(),
            " ORDER BY p.created_at DESC, p.id DESC"
        ))
        .bind(user_id)
        .fetch_all(executor)
        .await?)
    }

    /// Most recent visible photos, with the owner's username.
    pub async fn list_recent_accessible(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<PhotoWithOwner>, DbError> {
        Ok(sqlx::query_as::<_, PhotoWithOwner>(concat!(
            "SELECT p.*, u.username FROM photo p JOIN app_user u ON u.id = p.user_id WHERE ",
            photo_visible_to_user!(),
            " ORDER BY p.created_at DESC, p.id DESC LIMIT ?2"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(executor)
        .await?)
    }

    /// Photos other users shared with this user, newest grant first.
    pub async fn list_shared_with(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Photo>, DbError> {
        Ok(sqlx::query_as::<_, Photo>(
            r"
            SELECT p.*
            FROM photo p
            JOIN collaboration c ON c.photo_id = p.id AND c.content_type = 'PHOTO'
            WHERE c.shared_with_id = ?1
            ORDER BY c.created_at DESC, c.id DESC
            LIMIT ?2 OFFSET ?3
            ",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?)
    }

    pub async fn count_shared_with(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
    ) -> Result<i64, DbError> {
        Ok(sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM collaboration
            WHERE content_type = 'PHOTO' AND shared_with_id = ?
            ",
        )
        .bind(user_id)
        .fetch_one(executor)
        .await?)
    }

    /// Storage keys of every photo a user owns, for cleaning up files on account deletion.
    pub async fn list_images_by_user(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
    ) -> Result<Vec<String>, DbError> {
        Ok(
            sqlx::query_scalar::<_, String>("SELECT image FROM photo WHERE user_id = ?")
                .bind(user_id)
                .fetch_all(executor)
                .await?,
        )
    }

    /// Whether the user owns the photo or received any grant on it.
    pub async fn is_visible_to(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
        photo_id: i64,
    ) -> Result<bool, DbError> {
        Ok(sqlx::query_scalar::<_, bool>(concat!(
            "SELECT EXISTS (SELECT 1 FROM photo p WHERE p.id = ?2 AND ",
            photo_visible_to_user!(),
            ")"
        ))
        .bind(user_id)
        .bind(photo_id)
        .fetch_one(executor)
        .await?)
    }
}
