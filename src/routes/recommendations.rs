use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{GeoLocation, Place},
    services::recommendations::RecommendationService,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    /// Canned label (e.g. "Work Mode") or free-text mood
    pub mood: String,
    pub location: GeoLocation,
    /// Optional free-text "vibe" overriding the templated prompt
    #[serde(default)]
    pub custom_prompt: Option<String>,
}

/// Handler for the recommendations endpoint
pub async fn recommend(
    State(service): State<Arc<RecommendationService>>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Vec<Place>>> {
    if request.mood.trim().is_empty() {
        return Err(AppError::InvalidInput("Mood cannot be empty".to_string()));
    }

    if !request.location.is_valid() {
        return Err(AppError::InvalidInput(format!(
            "Coordinates out of range: ({}, {})",
            request.location.latitude, request.location.longitude
        )));
    }

    let places = service
        .recommend(
            &request.mood,
            request.location,
            request.custom_prompt.as_deref(),
        )
        .await?;

    Ok(Json(places))
}
