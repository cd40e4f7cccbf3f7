use crate::models::PriceLevel;

/// Computes the Mood Intelligence Score for one candidate place
///
/// A hand-tuned heuristic, chosen deliberately over a learned model: the goal
/// is a stable, explainable ranking rather than optimality. Deterministic for
/// fixed inputs and never negative.
///
/// Starting from a base of 100:
/// - ratings above 4.0 are rewarded (and below penalized) at 25 points per star
/// - distance costs 8 points per kilometer
/// - a budget/cheap mood boosts `$` and `$$` places and punishes `$$$$`
/// - a date/romantic mood boosts `$$$`/`$$$$` places and very high ratings
pub fn score(rating: f64, distance_km: f64, price_level: Option<PriceLevel>, mood: &str) -> u32 {
    let mut score = 100.0;

    score += (rating - 4.0) * 25.0;
    score -= distance_km * 8.0;

    let mood = mood.to_lowercase();

    if mood.contains("budget") || mood.contains("cheap") {
        match price_level {
            Some(PriceLevel::Cheap) => score += 30.0,
            Some(PriceLevel::Moderate) => score += 10.0,
            Some(PriceLevel::Luxury) => score -= 50.0,
            _ => {}
        }
    }

    if mood.contains("date") || mood.contains("romantic") {
        if matches!(
            price_level,
            Some(PriceLevel::Expensive) | Some(PriceLevel::Luxury)
        ) {
            score += 20.0;
        }
        if rating > 4.5 {
            score += 15.0;
        }
    }

    score.max(0.0).round() as u32
}
