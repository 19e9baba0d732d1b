//! Access level resolution for photos and albums.
//!
//! An owner always has edit access. Anyone else has exactly what their collaboration on
//! the item grants, or nothing when there is none.

use crate::database::DbError;
use crate::database::album_store::AlbumStore;
use crate::database::collaboration::{Permission, SharedItem};
use crate::database::collaboration_store::CollaborationStore;
use crate::database::photo_store::PhotoStore;
use sqlx::SqlitePool;
use tracing::instrument;

/// What a user may do with an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Access {
    NoAccess,
    View,
    Edit,
}

impl Access {
    #[must_use]
    pub fn can_view(self) -> bool {
        self >= Self::View
    }

    #[must_use]
    pub fn can_edit(self) -> bool {
        self == Self::Edit
    }
}

impl From<Permission> for Access {
    fn from(permission: Permission) -> Self {
        match permission {
            Permission::View => Self::View,
            Permission::Edit => Self::Edit,
        }
    }
}

/// Resolves access from ownership and the user's grant on the item, if any.
#[must_use]
pub fn resolve_access(is_owner: bool, grant: Option<Permission>) -> Access {
    if is_owner {
        return Access::Edit;
    }
    grant.map_or(Access::NoAccess, Access::from)
}

/// An existing item together with its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessTarget {
    pub item: SharedItem,
    pub owner_id: i64,
}

/// Looks up the item and its owner. `None` if the item does not exist.
pub async fn find_target(
    pool: &SqlitePool,
    item: SharedItem,
) -> Result<Option<AccessTarget>, DbError> {
    let owner_id = match item {
        SharedItem::Photo(id) => PhotoStore::find_by_id(pool, id).await?.map(|p| p.user_id),
        SharedItem::Album(id) => AlbumStore::find_by_id(pool, id).await?.map(|a| a.user_id),
    };
    Ok(owner_id.map(|owner_id| AccessTarget { item, owner_id }))
}

/// Access level of `user_id` on an existing item.
#[instrument(skip(pool))]
pub async fn access_level(
    pool: &SqlitePool,
    user_id: i64,
    target: AccessTarget,
) -> Result<Access, DbError> {
    if target.owner_id == user_id {
        return Ok(Access::Edit);
    }
    let grant = CollaborationStore::find_permission(pool, user_id, target.item).await?;
    Ok(resolve_access(false, grant))
}
