use std::sync::Arc;

use crate::{
    cache::RecommendationCache,
    error::AppResult,
    models::{GeoLocation, Place},
    services::{gemini::GroundingClient, parser, prompt, scoring},
};

/// Orchestrates the recommendation pipeline
///
/// Cache lookup, prompt build, one upstream call, parse, score, stable sort,
/// cache store. Upstream failures propagate unchanged with no retry and no
/// partial result; an empty grounding result is a valid outcome and maps to
/// an empty list.
pub struct RecommendationService {
    client: Arc<dyn GroundingClient>,
    cache: RecommendationCache,
}

impl RecommendationService {
    pub fn new(client: Arc<dyn GroundingClient>, cache: RecommendationCache) -> Self {
        Self { client, cache }
    }

    /// Fetches scored, sorted place recommendations for a mood and location
    ///
    /// Always yields a list (possibly empty), never an absent value.
    pub async fn recommend(
        &self,
        mood: &str,
        location: GeoLocation,
        custom_prompt: Option<&str>,
    ) -> AppResult<Vec<Place>> {
        if let Some(cached) = self
            .cache
            .get(mood, location.latitude, location.longitude)
            .await
        {
            tracing::debug!(mood = %mood, "Cache hit");
            return Ok(cached);
        }

        tracing::debug!(mood = %mood, "Cache miss");

        let prompt = prompt::build_prompt(mood, custom_prompt);
        let response = self.client.fetch(&prompt, location).await?;

        if response.chunks.is_empty() {
            tracing::warn!(mood = %mood, "No grounding chunks found");
            return Ok(Vec::new());
        }

        let mut places = parser::parse_places(
            &response.text,
            &response.chunks,
            mood,
            &mut rand::thread_rng(),
        );

        for place in &mut places {
            place.intelligence_score =
                scoring::score(place.rating, place.distance_km, place.price_level, mood);
        }

        // Stable sort keeps parse order among equal scores
        places.sort_by(|a, b| b.intelligence_score.cmp(&a.intelligence_score));

        tracing::info!(
            mood = %mood,
            places = places.len(),
            backend = self.client.name(),
            "Recommendations ready"
        );

        self.cache
            .set(mood, location.latitude, location.longitude, places.clone())
            .await;

        Ok(places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{ChunkRef, GroundingChunk};
    use crate::services::gemini::{GroundedResponse, MockGroundingClient};

    fn anchor() -> GeoLocation {
        GeoLocation {
            latitude: 40.7128,
            longitude: -74.0060,
        }
    }

    fn maps_chunk(title: &str) -> GroundingChunk {
        GroundingChunk {
            maps: Some(ChunkRef {
                title: Some(title.to_string()),
                uri: None,
                google_maps_uri: Some(format!("https://maps.google.com/{}", title)),
            }),
            web: None,
        }
    }

    fn service_with(client: MockGroundingClient) -> RecommendationService {
        RecommendationService::new(Arc::new(client), RecommendationCache::new(None))
    }

    #[tokio::test]
    async fn test_results_sorted_by_score_descending() {
        let mut client = MockGroundingClient::new();
        client.expect_fetch().times(1).returning(|_, _| {
            Ok(GroundedResponse {
                // Rating spread dominates the synthesized distance noise
                text: "Dive Bar has 1.0 stars. Gem Cafe has 4.9 stars.".to_string(),
                chunks: vec![maps_chunk("Dive Bar"), maps_chunk("Gem Cafe")],
            })
        });
        client.expect_name().return_const("mock");

        let places = service_with(client)
            .recommend("Chill", anchor(), None)
            .await
            .unwrap();

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].title, "Gem Cafe");
        for pair in places.windows(2) {
            assert!(pair[0].intelligence_score >= pair[1].intelligence_score);
        }
    }

    #[tokio::test]
    async fn test_cache_hit_skips_upstream_call() {
        let mut client = MockGroundingClient::new();
        client.expect_fetch().times(1).returning(|_, _| {
            Ok(GroundedResponse {
                text: "Cafe X has 4.5 stars.".to_string(),
                chunks: vec![maps_chunk("Cafe X")],
            })
        });
        client.expect_name().return_const("mock");

        let service = service_with(client);

        let first = service.recommend("Chill", anchor(), None).await.unwrap();
        let second = service.recommend("Chill", anchor(), None).await.unwrap();

        // The mock allows exactly one fetch; a second would panic
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_different_keys_do_not_share_cache() {
        let mut client = MockGroundingClient::new();
        client.expect_fetch().times(2).returning(|_, _| {
            Ok(GroundedResponse {
                text: String::new(),
                chunks: vec![maps_chunk("Cafe X")],
            })
        });
        client.expect_name().return_const("mock");

        let service = service_with(client);

        service.recommend("Chill", anchor(), None).await.unwrap();
        let other = GeoLocation {
            latitude: 41.0,
            longitude: -74.0060,
        };
        service.recommend("Chill", other, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_upstream_error_propagates() {
        let mut client = MockGroundingClient::new();
        client
            .expect_fetch()
            .returning(|_, _| Err(AppError::Upstream("service unreachable".to_string())));

        let result = service_with(client).recommend("Chill", anchor(), None).await;

        assert!(matches!(result, Err(AppError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_empty_grounding_yields_empty_list() {
        let mut client = MockGroundingClient::new();
        client.expect_fetch().times(2).returning(|_, _| {
            Ok(GroundedResponse {
                text: "I could not find anything nearby.".to_string(),
                chunks: vec![],
            })
        });

        let service = service_with(client);

        let places = service.recommend("Chill", anchor(), None).await.unwrap();
        assert!(places.is_empty());

        // An empty grounding result is not cached; the next call retries upstream
        let places = service.recommend("Chill", anchor(), None).await.unwrap();
        assert!(places.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_titles_deduplicated() {
        let mut client = MockGroundingClient::new();
        client.expect_fetch().times(1).returning(|_, _| {
            Ok(GroundedResponse {
                text: String::new(),
                chunks: vec![maps_chunk("Cafe X"), maps_chunk("Cafe X")],
            })
        });
        client.expect_name().return_const("mock");

        let places = service_with(client)
            .recommend("Chill", anchor(), None)
            .await
            .unwrap();

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].title, "Cafe X");
    }

    #[tokio::test]
    async fn test_custom_prompt_forwarded_verbatim() {
        let mut client = MockGroundingClient::new();
        client
            .expect_fetch()
            .withf(|prompt, _| prompt == "rooftop bars with a skyline view")
            .times(1)
            .returning(|_, _| {
                Ok(GroundedResponse {
                    text: String::new(),
                    chunks: vec![maps_chunk("Sky Bar")],
                })
            });
        client.expect_name().return_const("mock");

        let places = service_with(client)
            .recommend("Chill", anchor(), Some("rooftop bars with a skyline view"))
            .await
            .unwrap();

        assert_eq!(places.len(), 1);
    }
}
