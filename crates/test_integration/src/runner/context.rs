pub mod context_utils;
pub mod test_context;
