use crate::database::DbError;
use crate::database::ids_json;
use crate::database::tables::album::{Album, AlbumWithOwner};
use crate::database::tables::photo::{Photo, PhotoWithOwner};
use chrono::Utc;
use sqlx::{Executor, Sqlite};

/// Visibility predicate on `album a` for the user bound as `?1`.
macro_rules! album_visible_to_user {
    () => {
        r"(a.user_id = ?1 OR EXISTS (
            SELECT 1 FROM collaboration c
            WHERE c.content_type = 'ALBUM' AND c.album_id = a.id AND c.shared_with_id = ?1
        ))"
    };
}

pub struct AlbumStore;

impl AlbumStore {
    //================================================================================
    // Core Album Management (CRUD)
    //================================================================================

    pub async fn create(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
        name: &str,
        description: &str,
        cover_photo_id: Option<i64>,
    ) -> Result<Album, DbError> {
        let now = Utc::now();
        Ok(sqlx::query_as::<_, Album>(
            r"
            INSERT INTO album (user_id, name, description, cover_photo_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            ",
        )
        .bind(user_id)
        .bind(name)
        .bind(description)
        .bind(cover_photo_id)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?)
    }

    pub async fn find_by_id(
        executor: impl Executor<'_, Database = Sqlite>,
        album_id: i64,
    ) -> Result<Option<Album>, DbError> {
        Ok(
            sqlx::query_as::<_, Album>("SELECT * FROM album WHERE id = ?")
                .bind(album_id)
                .fetch_optional(executor)
                .await?,
        )
    }

    /// Updates an album. `None` leaves a field unchanged, `Some(None)` clears the cover.
    pub async fn update(
        executor: impl Executor<'_, Database = Sqlite>,
        album_id: i64,
        name: Option<&str>,
        description: Option<&str>,
        cover_photo_id: Option<Option<i64>>,
    ) -> Result<Album, DbError> {
        Ok(sqlx::query_as::<_, Album>(
            r"
            UPDATE album
            SET
                name = COALESCE(?1, name),
                description = COALESCE(?2, description),
                cover_photo_id = CASE WHEN ?3 THEN ?4 ELSE cover_photo_id END,
                updated_at = ?5
            WHERE id = ?6
            RETURNING *
            ",
        )
        .bind(name)
        .bind(description)
        .bind(cover_photo_id.is_some())
        .bind(cover_photo_id.flatten())
        .bind(Utc::now())
        .bind(album_id)
        .fetch_one(executor)
        .await?)
    }

    /// Deletes an album. Its photos are kept.
    pub async fn delete(
        executor: impl Executor<'_, Database = Sqlite>,
        album_id: i64,
    ) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM album WHERE id = ?")
            .bind(album_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    //================================================================================
    // Listings
    //================================================================================

    pub async fn list_by_ids(
        executor: impl Executor<'_, Database = Sqlite>,
        album_ids: &[i64],
    ) -> Result<Vec<Album>, DbError> {
        Ok(sqlx::query_as::<_, Album>(
            "SELECT * FROM album WHERE id IN (SELECT value FROM json_each(?))",
        )
        .bind(ids_json(album_ids)?)
        .fetch_all(executor)
        .await?)
    }

    pub async fn list_accessible(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Album>, DbError> {
        Ok(sqlx::query_as::<_, Album>(concat!(
            "SELECT a.* FROM album a WHERE ",
            album_visible_to_user!(),
            " ORDER BY a.created_at DESC, a.id DESC LIMIT ?2 OFFSET ?3"
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
            "SELECT COUNT(*) FROM album a WHERE ",
            album_visible_to_user!()
        ))
        .bind(user_id)
        .fetch_one(executor)
        .await?)
    }

    pub async fn list_recent_accessible(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<AlbumWithOwner>, DbError> {
        Ok(sqlx::query_as::<_, AlbumWithOwner>(concat!(
            "SELECT a.*, u.username FROM album a JOIN app_user u ON u.id = a.user_id WHERE ",
            album_visible_to_user!(),
            " ORDER BY a.created_at DESC, a.id DESC LIMIT ?2"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(executor)
        .await?)
    }

    pub async fn list_shared_with(
        executor: impl Executor<'_, Database = Sqlite>,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Album>, DbError> {
        Ok(sqlx::query_as::<_, Album>(
            r"
            SELECT a.*
            FROM album a
            JOIN collaboration c ON c.album_id = a.id AND c.content_type = 'ALBUM'
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
            WHERE content_type = 'ALBUM' AND shared_with_id = ?
            ",
        )
        .bind(user_id)
        .fetch_one(executor)
        .await?)
    }

    //================================================================================
    // Album photos
    //================================================================================

    /// Attaches the given photos, keeping only those `user_id` owns or has a grant on.
    /// Already attached photos are ignored. Returns the number of new attachments.
    pub async fn add_photos(
        executor: impl Executor<'_, Database = Sqlite>,
        album_id: i64,
        user_id: i64,
        photo_ids: &[i64],
    ) -> Result<u64, DbError> {
        let result = sqlx::query(
            r"
            INSERT OR IGNORE INTO album_photo (album_id, photo_id, added_at)
            SELECT ?2, p.id, ?3
            FROM photo p
            WHERE p.id IN (SELECT value FROM json_each(?4))
              AND (p.user_id = ?1 OR EXISTS (
                  SELECT 1 FROM collaboration c
                  WHERE c.content_type = 'PHOTO' AND c.photo_id = p.id AND c.shared_with_id = ?1
              ))
            ",
        )
        .bind(user_id)
        .bind(album_id)
        .bind(Utc::now())
        .bind(ids_json(photo_ids)?)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Detaches photos from the album. The photos themselves are untouched.
    pub async fn remove_photos(
        executor: impl Executor<'_, Database = Sqlite>,
        album_id: i64,
        photo_ids: &[i64],
    ) -> Result<u64, DbError> {
        let result = sqlx::query(
            r"
            DELETE FROM album_photo
            WHERE album_id = ? AND photo_id IN (SELECT value FROM json_each(?))
            ",
        )
        .bind(album_id)
        .bind(ids_json(photo_ids)?)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Photos attached to the album, in the order they were added.
    pub async fn list_photos(
        executor: impl Executor<'_, Database = Sqlite>,
        album_id: i64,
    ) -> Result<Vec<Photo>, DbError> {
        Ok(sqlx::query_as::<_, Photo>(
            r"
            SELECT p.*
            FROM photo p
            JOIN album_photo ap ON ap.photo_id = p.id
            WHERE ap.album_id = ?
            ORDER BY ap.added_at, p.id
            ",
        )
        .bind(album_id)
        .fetch_all(executor)
        .await?)
    }

    /// Attached photos with their owners' usernames, in the order they were added.
    pub async fn list_photos_with_owner(
        executor: impl Executor<'_, Database = Sqlite>,
        album_id: i64,
    ) -> Result<Vec<PhotoWithOwner>, DbError> {
        Ok(sqlx::query_as::<_, PhotoWithOwner>(
            r"
            SELECT p.*, u.username
            FROM photo p
            JOIN album_photo ap ON ap.photo_id = p.id
            JOIN app_user u ON u.id = p.user_id
            WHERE ap.album_id = ?
            ORDER BY ap.added_at, p.id
            ",
        )
        .bind(album_id)
        .fetch_all(executor)
        .await?)
    }

    /// Attached photos, plus one when the cover is set but not attached.
    pub async fn photo_count(
        executor: impl Executor<'_, Database = Sqlite>,
        album_id: i64,
    ) -> Result<i64, DbError> {
        Ok(sqlx::query_scalar::<_, i64>(
            r"
            SELECT
                (SELECT COUNT(*) FROM album_photo ap WHERE ap.album_id = a.id)
                + CASE
                    WHEN a.cover_photo_id IS NOT NULL AND NOT EXISTS (
                        SELECT 1 FROM album_photo ap
                        WHERE ap.album_id = a.id AND ap.photo_id = a.cover_photo_id
                    ) THEN 1
                    ELSE 0
                  END
            FROM album a
            WHERE a.id = ?
            ",
        )
        .bind(album_id)
        .fetch_optional(executor)
        .await?
        .unwrap_or(0))
    }
}
