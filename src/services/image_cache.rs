use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::services::unsplash_service::ImageCandidate;

/// Kết quả tìm ảnh được giữ trong một giờ.
pub const IMAGE_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Số mục tối đa; đầy thì bỏ mục cũ nhất.
pub const MAX_CACHE_ENTRIES: usize = 500;

struct CachedImages {
    stored_at: Instant,
    images: Vec<ImageCandidate>,
}

/// Cache trong bộ nhớ cho kết quả Unsplash, khóa theo (từ khóa, số ảnh).
pub struct ImageCache {
    ttl: Duration,
    capacity: usize,
    entries: RwLock<HashMap<(String, u32), CachedImages>>,
}

impl ImageCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, MAX_CACHE_ENTRIES)
    }

    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn key(term: &str, count: u32) -> (String, u32) {
        (term.trim().to_lowercase(), count)
    }

    pub async fn get(&self, term: &str, count: u32) -> Option<Vec<ImageCandidate>> {
        let entries = self.entries.read().await;
        entries
            .get(&Self::key(term, count))
            .filter(|cached| cached.stored_at.elapsed() < self.ttl)
            .map(|cached| cached.images.clone())
    }

    pub async fn insert(&self, term: &str, count: u32, images: Vec<ImageCandidate>) {
        let mut entries = self.entries.write().await;
        let ttl = self.ttl;
        entries.retain(|_, cached| cached.stored_at.elapsed() < ttl);

        let key = Self::key(term, count);
        while !entries.contains_key(&key) && entries.len() >= self.capacity {
            let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, cached)| cached.stored_at)
                .map(|(k, _)| k.clone())
            else {
                break;
            };
            tracing::debug!("--- Cache ảnh đầy, bỏ mục cũ nhất: {:?}", oldest);
            entries.remove(&oldest);
        }

        entries.insert(
            key,
            CachedImages {
                stored_at: Instant::now(),
                images,
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(IMAGE_CACHE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(url: &str) -> ImageCandidate {
        ImageCandidate {
            url: url.to_string(),
            thumb: format!("{url}?w=200"),
            alt: None,
            author: None,
        }
    }

    #[tokio::test]
    async fn hit_is_case_and_whitespace_insensitive() {
        let cache = ImageCache::default();
        cache.insert("Apple", 12, vec![candidate("https://img/1")]).await;

        let hit = cache.get("  apple ", 12).await.unwrap();
        assert_eq!(hit[0].url, "https://img/1");
        assert!(cache.get("apple", 6).await.is_none());
    }

    #[tokio::test]
    async fn expired_entries_are_ignored_and_pruned() {
        let cache = ImageCache::new(Duration::ZERO);
        cache.insert("apple", 12, vec![candidate("https://img/1")]).await;
        assert!(cache.get("apple", 12).await.is_none());

        cache.insert("map", 12, vec![candidate("https://img/2")]).await;
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn full_cache_evicts_oldest_entry() {
        let cache = ImageCache::with_capacity(IMAGE_CACHE_TTL, 2);
        cache.insert("apple", 12, vec![candidate("https://img/1")]).await;
        cache.insert("banana", 12, vec![candidate("https://img/2")]).await;

        // Ghi đè khóa đã có không làm mất mục nào
        cache.insert("banana", 12, vec![candidate("https://img/3")]).await;
        assert_eq!(cache.len().await, 2);
        assert!(cache.get("apple", 12).await.is_some());

        cache.insert("map", 12, vec![candidate("https://img/4")]).await;
        assert_eq!(cache.len().await, 2);
        assert!(cache.get("apple", 12).await.is_none());
        assert_eq!(cache.get("banana", 12).await.unwrap()[0].url, "https://img/3");
        assert!(cache.get("map", 12).await.is_some());
    }
}
