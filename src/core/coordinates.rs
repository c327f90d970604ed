use crate::domain::model::Coordinate;

const STRIPPED_MARKERS: [&str; 3] = ["°", "N", "E"];

/// Extracts a `lat, lon` pair from free-form location text.
///
/// Only the literal markers `°`, `N` and `E` are removed, so southern or
/// western hemispheres must be written as negative numbers. Returns `None`
/// unless exactly two finite numbers are found.
pub fn parse_coordinates(location: &str) -> Option<Coordinate> {
    let mut cleaned = location.to_string();
    for marker in STRIPPED_MARKERS {
        cleaned = cleaned.replace(marker, "");
    }

    let tokens: Vec<&str> = cleaned.trim().split(',').collect();
    if tokens.len() != 2 {
        tracing::debug!("Location {:?} does not split into two tokens", location);
        return None;
    }

    let latitude = parse_token(tokens[0])?;
    let longitude = parse_token(tokens[1])?;
    Some(Coordinate::new(latitude, longitude))
}

fn parse_token(token: &str) -> Option<f64> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
