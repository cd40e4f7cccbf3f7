use std::collections::HashSet;

use chrono::Utc;
use rand::Rng;
use regex::Regex;

use crate::models::{GroundingChunk, Place, PriceLevel};

/// Extracts place candidates from grounding chunks
///
/// Chunks are processed in input order. A maps reference wins over a web
/// reference, chunks lacking a title or link are skipped, and duplicate
/// titles collapse to their first occurrence. Each surviving candidate is
/// supplemented with a rating and price level mined from the accompanying
/// free text.
///
/// Rating and distance fall back to synthesized values when the text carries
/// none: ratings land in [4.0, 5.0) since the prompt already asked for
/// well-fitting places, and distances in [0, 5) km because the upstream
/// supplies no true distance. Both draw from the injected `rng` so callers
/// can pin them. Synthesized fields are approximations, not measurements.
///
/// An empty chunk list yields an empty result; grounding nothing is a valid
/// outcome, not a fault.
pub fn parse_places<R: Rng>(
    raw_text: &str,
    chunks: &[GroundingChunk],
    mood: &str,
    rng: &mut R,
) -> Vec<Place> {
    let generated_at = Utc::now().timestamp_millis();
    let mut seen_titles: HashSet<String> = HashSet::new();
    let mut places = Vec::new();

    for (index, chunk) in chunks.iter().enumerate() {
        let Some((title, uri)) = chunk.resolve() else {
            tracing::debug!(index, "Skipping grounding chunk without title and uri");
            continue;
        };

        if !seen_titles.insert(title.clone()) {
            tracing::debug!(title = %title, "Skipping duplicate grounding chunk");
            continue;
        }

        let rating = extract_rating(raw_text, &title)
            .unwrap_or_else(|| rng.gen_range(4.0..5.0));
        let price_level = extract_price_level(raw_text);

        let distance_km = round_one_decimal(rng.gen_range(0.0..5.0));

        places.push(Place {
            id: format!("place-{}-{}", index, generated_at),
            title,
            google_maps_uri: uri,
            rating,
            price_level,
            distance_km,
            tags: vec![
                mood.to_string(),
                price_level
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "$$".to_string()),
            ],
            description: format!("Recommended for your {} mood.", mood),
            intelligence_score: 0,
        });
    }

    places
}

/// Mines the response text for a rating mentioned near the place title
///
/// Matches "<title> ... <digit>.<digit> stars" case-insensitively, first
/// occurrence wins. Returns `None` when the text never rates the place.
fn extract_rating(text: &str, title: &str) -> Option<f64> {
    let pattern = format!(r"(?i){}.*?([0-5]\.[0-9])\s*stars?", regex::escape(title));
    let re = Regex::new(&pattern).ok()?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Finds the longest run of dollar signs anywhere in the response text
fn extract_price_level(text: &str) -> Option<PriceLevel> {
    if text.contains("$$$$") {
        Some(PriceLevel::Luxury)
    } else if text.contains("$$$") {
        Some(PriceLevel::Expensive)
    } else if text.contains("$$") {
        Some(PriceLevel::Moderate)
    } else if text.contains('$') {
        Some(PriceLevel::Cheap)
    } else {
        None
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
