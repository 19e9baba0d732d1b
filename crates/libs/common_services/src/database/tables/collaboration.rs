use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::fmt::Display;
use std::str::FromStr;
use utoipa::ToSchema;

/// Discriminates what a collaboration grants access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentType {
    Photo,
    Album,
}

impl ContentType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "PHOTO",
            Self::Album => "ALBUM",
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    /// Case-insensitive, so `?content_type=photo` works.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("PHOTO") {
            Ok(Self::Photo)
        } else if s.eq_ignore_ascii_case("ALBUM") {
            Ok(Self::Album)
        } else {
            Err(format!("unknown content type '{s}'"))
        }
    }
}

/// Level of access a collaboration grants. `Edit` implies `View`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Permission {
    #[default]
    View,
    Edit,
}

impl Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View => f.write_str("VIEW"),
            Self::Edit => f.write_str("EDIT"),
        }
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("VIEW") {
            Ok(Self::View)
        } else if s.eq_ignore_ascii_case("EDIT") {
            Ok(Self::Edit)
        } else {
            Err(format!("unknown permission '{s}'"))
        }
    }
}

/// The single item a collaboration points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SharedItem {
    Photo(i64),
    Album(i64),
}

impl SharedItem {
    /// Picks the id matching `content_type`, ignoring the other one.
    #[must_use]
    pub const fn from_parts(
        content_type: ContentType,
        photo_id: Option<i64>,
        album_id: Option<i64>,
    ) -> Option<Self> {
        match (content_type, photo_id, album_id) {
            (ContentType::Photo, Some(id), _) => Some(Self::Photo(id)),
            (ContentType::Album, _, Some(id)) => Some(Self::Album(id)),
            _ => None,
        }
    }

    #[must_use]
    pub const fn content_type(self) -> ContentType {
        match self {
            Self::Photo(_) => ContentType::Photo,
            Self::Album(_) => ContentType::Album,
        }
    }

    #[must_use]
    pub const fn id(self) -> i64 {
        match self {
            Self::Photo(id) | Self::Album(id) => id,
        }
    }

    #[must_use]
    pub const fn photo_id(self) -> Option<i64> {
        match self {
            Self::Photo(id) => Some(id),
            Self::Album(_) => None,
        }
    }

    #[must_use]
    pub const fn album_id(self) -> Option<i64> {
        match self {
            Self::Album(id) => Some(id),
            Self::Photo(_) => None,
        }
    }
}

/// A sharing grant from `shared_by_id` to `shared_with_id`.
#[derive(Debug, Clone, FromRow)]
pub struct Collaboration {
    pub id: i64,
    pub shared_by_id: i64,
    pub shared_with_id: i64,
    pub message: String,
    pub content_type: ContentType,
    pub photo_id: Option<i64>,
    pub album_id: Option<i64>,
    pub permission: Permission,
    pub created_at: DateTime<Utc>,
}

impl Collaboration {
    /// `None` only if the row breaks the content type check, which the schema forbids.
    #[must_use]
    pub const fn item(&self) -> Option<SharedItem> {
        SharedItem::from_parts(self.content_type, self.photo_id, self.album_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_parses_case_insensitively() {
        assert_eq!("photo".parse::<ContentType>(), Ok(ContentType::Photo));
        assert_eq!("Album".parse::<ContentType>(), Ok(ContentType::Album));
        assert!("video".parse::<ContentType>().is_err());
    }

    #[test]
    fn permission_edit_outranks_view() {
        assert!(Permission::Edit > Permission::View);
        assert_eq!(Permission::default(), Permission::View);
        assert_eq!("edit".parse::<Permission>(), Ok(Permission::Edit));
    }

    #[test]
    fn shared_item_only_keeps_the_matching_id() {
        let item = SharedItem::from_parts(ContentType::Album, Some(4), Some(9));
        assert_eq!(item, Some(SharedItem::Album(9)));
        assert_eq!(item.and_then(SharedItem::photo_id), None);

        assert_eq!(
            SharedItem::from_parts(ContentType::Photo, None, Some(9)),
            None
        );
    }

    #[test]
    fn content_type_serializes_uppercase() {
        let json = serde_json::to_string(&ContentType::Photo).expect("serialize");
        assert_eq!(json, "\"PHOTO\"");
        let parsed: Permission = serde_json::from_str("\"EDIT\"").expect("deserialize");
        assert_eq!(parsed, Permission::Edit);
    }
}
