mod form;
pub mod handlers;
pub mod router;
