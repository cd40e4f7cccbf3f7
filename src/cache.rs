use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::Place;

/// Key for one cached recommendation list
///
/// Keyed by the exact (mood, latitude, longitude) triple. Coordinates are
/// compared by f64 bit pattern, so two requests a few meters apart never share
/// an entry; bucketing coordinates before keying is a future tuning knob.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    mood: String,
    lat_bits: u64,
    lon_bits: u64,
}

impl CacheKey {
    pub fn new(mood: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            mood: mood.to_string(),
            lat_bits: latitude.to_bits(),
            lon_bits: longitude.to_bits(),
        }
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rec:{}:{}:{}",
            self.mood,
            f64::from_bits(self.lat_bits),
            f64::from_bits(self.lon_bits)
        )
    }
}

/// One cached result list plus its insertion time
#[derive(Debug, Clone)]
struct CacheEntry {
    places: Vec<Place>,
    inserted_at: DateTime<Utc>,
}

/// In-memory cache of scored, sorted recommendation lists
///
/// Entries never expire; a fresh fetch for the same key fully replaces the
/// old entry (last write wins). An optional entry cap evicts the oldest
/// insertion when exceeded, defaulting to unbounded. Not persisted across
/// process restarts.
#[derive(Clone)]
pub struct RecommendationCache {
    entries: Arc<RwLock<HashMap<CacheKey, CacheEntry>>>,
    max_entries: Option<usize>,
}

impl RecommendationCache {
    pub fn new(max_entries: Option<usize>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            max_entries,
        }
    }

    /// Retrieves the cached list for an exact key match, if present
    pub async fn get(&self, mood: &str, latitude: f64, longitude: f64) -> Option<Vec<Place>> {
        let key = CacheKey::new(mood, latitude, longitude);
        let entries = self.entries.read().await;
        entries.get(&key).map(|entry| entry.places.clone())
    }

    /// Stores a result list, replacing any previous entry for the key
    pub async fn set(&self, mood: &str, latitude: f64, longitude: f64, places: Vec<Place>) {
        let key = CacheKey::new(mood, latitude, longitude);
        let mut entries = self.entries.write().await;

        entries.insert(
            key,
            CacheEntry {
                places,
                inserted_at: Utc::now(),
            },
        );

        if let Some(cap) = self.max_entries {
            while entries.len() > cap {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.inserted_at)
                    .map(|(key, _)| key.clone());
                match oldest {
                    Some(key) => {
                        tracing::debug!(key = %key, "Evicting oldest cache entry");
                        entries.remove(&key);
                    }
                    None => break,
                }
            }
        }
    }

    /// Number of cached entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(title: &str) -> Place {
        Place {
            id: format!("place-{}", title),
            title: title.to_string(),
            google_maps_uri: "https://maps.google.com/test".to_string(),
            rating: 4.5,
            price_level: None,
            distance_km: 1.0,
            tags: vec!["Chill".to_string()],
            description: "Recommended for your Chill mood.".to_string(),
            intelligence_score: 100,
        }
    }

    #[test]
    fn test_cache_key_display() {
        let key = CacheKey::new("Budget", 40.5, -74.25);
        assert_eq!(format!("{}", key), "rec:Budget:40.5:-74.25");
    }

    #[test]
    fn test_cache_key_mood_is_exact() {
        // The key is the exact triple; mood strings are not normalized
        assert_ne!(
            CacheKey::new("Date Night", 1.0, 2.0),
            CacheKey::new("date night", 1.0, 2.0)
        );
    }

    #[test]
    fn test_cache_key_exact_coordinates() {
        // Nearby but unequal coordinates must never collide
        assert_ne!(
            CacheKey::new("budget", 40.5000001, -74.25),
            CacheKey::new("budget", 40.5000002, -74.25)
        );
    }

    #[tokio::test]
    async fn test_cache_round_trip() {
        let cache = RecommendationCache::new(None);
        let places = vec![place("Cafe X"), place("Cafe Y")];

        cache.set("Budget", 40.5, -74.25, places.clone()).await;
        let retrieved = cache.get("Budget", 40.5, -74.25).await;

        assert_eq!(retrieved, Some(places));
    }

    #[tokio::test]
    async fn test_cache_miss() {
        let cache = RecommendationCache::new(None);
        assert_eq!(cache.get("Budget", 40.5, -74.25).await, None);
    }

    #[tokio::test]
    async fn test_set_replaces_entry() {
        let cache = RecommendationCache::new(None);

        cache.set("Budget", 40.5, -74.25, vec![place("Old")]).await;
        cache.set("Budget", 40.5, -74.25, vec![place("New")]).await;

        let retrieved = cache.get("Budget", 40.5, -74.25).await.unwrap();
        assert_eq!(retrieved.len(), 1);
        assert_eq!(retrieved[0].title, "New");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_eviction_respects_cap() {
        let cache = RecommendationCache::new(Some(2));

        cache.set("a", 1.0, 1.0, vec![place("A")]).await;
        cache.set("b", 2.0, 2.0, vec![place("B")]).await;
        cache.set("c", 3.0, 3.0, vec![place("C")]).await;

        assert_eq!(cache.len().await, 2);
        // The newest entry always survives
        assert!(cache.get("c", 3.0, 3.0).await.is_some());
    }

    #[tokio::test]
    async fn test_unbounded_by_default() {
        let cache = RecommendationCache::new(None);
        for i in 0..50 {
            cache.set("mood", i as f64, 0.0, vec![place("P")]).await;
        }
        assert_eq!(cache.len().await, 50);
    }
}
