pub mod access;
pub mod albums;
pub mod auth;
pub mod homepage;
pub mod pagination;
pub mod photos;
pub mod sharing;
