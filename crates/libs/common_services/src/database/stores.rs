pub mod album_store;
pub mod collaboration_store;
pub mod photo_store;
pub mod user_store;
