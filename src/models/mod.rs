use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A geographic anchor supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    /// Checks that the coordinates fall in valid WGS84 ranges
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Price tier of a place, rendered as dollar signs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceLevel {
    #[serde(rename = "$")]
    Cheap,
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Expensive,
    #[serde(rename = "$$$$")]
    Luxury,
}

impl Display for PriceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PriceLevel::Cheap => "$",
            PriceLevel::Moderate => "$$",
            PriceLevel::Expensive => "$$$",
            PriceLevel::Luxury => "$$$$",
        };
        write!(f, "{}", s)
    }
}

/// A recommended place returned to the client
///
/// Titles are unique within one result list, and the list is sorted by
/// `intelligence_score` descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Stable within one response only; derived from chunk index and generation time
    pub id: String,
    pub title: String,
    pub google_maps_uri: String,
    /// Estimated rating in [0, 5]; synthesized when the response text carries none
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_level: Option<PriceLevel>,
    /// Synthesized when the upstream supplies no true distance
    pub distance_km: f64,
    pub tags: Vec<String>,
    pub description: String,
    pub intelligence_score: u32,
}

// ============================================================================
// Gemini generateContent API Types
// ============================================================================

/// Request body for the Gemini generateContent endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub tools: Vec<Tool>,
    pub tool_config: ToolConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
pub struct TextPart {
    pub text: String,
}

/// Tool selection; an empty `googleMaps` object enables maps grounding
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub google_maps: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    pub retrieval_config: RetrievalConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalConfig {
    pub lat_lng: LatLng,
}

#[derive(Debug, Serialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl GenerateContentRequest {
    /// Builds a maps-grounded request anchored at the given location
    pub fn grounded(prompt: String, anchor: GeoLocation) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![TextPart { text: prompt }],
            }],
            tools: vec![Tool {
                google_maps: serde_json::json!({}),
            }],
            tool_config: ToolConfig {
                retrieval_config: RetrievalConfig {
                    lat_lng: LatLng {
                        latitude: anchor.latitude,
                        longitude: anchor.longitude,
                    },
                },
            },
        }
    }
}

/// Raw response from the Gemini generateContent endpoint
///
/// Absent candidates or grounding metadata deserialize to empty defaults;
/// the parser maps those to an empty result rather than an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// A grounded source reference; polymorphic over maps and web sources
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub maps: Option<ChunkRef>,
    #[serde(default)]
    pub web: Option<ChunkRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkRef {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub google_maps_uri: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }

    /// Grounding chunks of the first candidate, if any grounding happened
    pub fn grounding_chunks(&self) -> Vec<GroundingChunk> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|m| m.grounding_chunks.clone())
            .unwrap_or_default()
    }
}

impl GroundingChunk {
    /// Resolves the display title and outbound link for this chunk
    ///
    /// A maps reference wins over a web reference; within a maps reference the
    /// dedicated Google Maps URI wins over the generic one. Chunks lacking
    /// either a title or a link resolve to `None` and are skipped upstream.
    pub fn resolve(&self) -> Option<(String, String)> {
        let (title, uri) = if let Some(maps) = &self.maps {
            (
                maps.title.clone(),
                maps.google_maps_uri.clone().or_else(|| maps.uri.clone()),
            )
        } else if let Some(web) = &self.web {
            (web.title.clone(), web.uri.clone())
        } else {
            (None, None)
        };

        match (title, uri) {
            (Some(title), Some(uri)) => Some((title, uri)),
            _ => None,
        }
    }
}
