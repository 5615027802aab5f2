pub mod avatar_handler;
pub mod health_handler;
pub mod image_handler;
pub mod pronunciation_handler;
pub mod topic_handler;
pub mod word_handler;
