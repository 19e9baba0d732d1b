pub mod album;
pub mod app_user;
pub mod collaboration;
pub mod photo;
