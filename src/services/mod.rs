pub mod auth_service;
pub mod gemini_service;
pub mod image_cache;
pub mod storage_service;
pub mod unsplash_service;
pub mod word_service;
