use crate::utils::error::{AssistantError, Result};
use crate::utils::validation::parse_coverage_area;
use serde::{Deserialize, Serialize};

/// The seven raw form fields, exactly as the front end supplied them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentInput {
    pub location: String,
    pub terrain: String,
    pub budget: String,
    pub special_conditions: String,
    pub estimated_users: String,
    pub coverage_area: String,
    pub technology_preference: String,
}

/// A validated deployment request. Built once per operation and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentRequest {
    location: String,
    terrain: String,
    budget: String,
    special_conditions: String,
    estimated_users: String,
    coverage_area_km2: f64,
    technology_preference: String,
}

impl DeploymentRequest {
    /// Validates the coverage area; every other field is carried verbatim.
    pub fn from_input(input: &DeploymentInput) -> Result<Self> {
        let coverage_area_km2 = parse_coverage_area(&input.coverage_area)?;

        Ok(Self {
            location: input.location.clone(),
            terrain: input.terrain.clone(),
            budget: input.budget.clone(),
            special_conditions: input.special_conditions.clone(),
            estimated_users: input.estimated_users.clone(),
            coverage_area_km2,
            technology_preference: input.technology_preference.clone(),
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn terrain(&self) -> &str {
        &self.terrain
    }

    pub fn budget(&self) -> &str {
        &self.budget
    }

    pub fn special_conditions(&self) -> &str {
        &self.special_conditions
    }

    pub fn estimated_users(&self) -> &str {
        &self.estimated_users
    }

    pub fn coverage_area_km2(&self) -> f64 {
        self.coverage_area_km2
    }

    pub fn technology_preference(&self) -> &str {
        &self.technology_preference
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Not applied by the parser; available to callers that want strict bounds.
    pub fn is_within_bounds(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Classified result of one inference call.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceOutcome {
    Success(String),
    Busy { attempt: u32, max_retries: u32 },
    Unavailable { attempts: u32 },
    Error { status: u16, payload: String },
}

impl InferenceOutcome {
    /// Usable generated text, or the error describing why there is none.
    pub fn into_text(self) -> Result<String> {
        match self {
            InferenceOutcome::Success(text) if text.trim().is_empty() => {
                Err(AssistantError::EmptyResponse)
            }
            InferenceOutcome::Success(text) => Ok(text),
            InferenceOutcome::Busy {
                attempt,
                max_retries,
            } => Err(AssistantError::ServiceBusy {
                attempt,
                max_retries,
            }),
            InferenceOutcome::Unavailable { attempts } => {
                Err(AssistantError::ServiceUnavailable { attempts })
            }
            InferenceOutcome::Error { status, payload } => {
                Err(AssistantError::ServiceError { status, payload })
            }
        }
    }
}

/// Embeddable map markup for one deployment area.
#[derive(Debug, Clone, PartialEq)]
pub struct MapArtifact {
    pub coordinate: Coordinate,
    pub radius_km: f64,
    pub html: String,
}

impl MapArtifact {
    /// Wraps the fragment in a standalone page that can be opened in a browser.
    pub fn to_document(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\"/>\n<title>Network Coverage Map</title>\n</head>\n<body style=\"margin: 0;\">\n{}\n</body>\n</html>\n",
            self.html
        )
    }
}

/// What the suggestion flow hands back to the front end.
#[derive(Debug, Clone)]
pub struct SuggestionReport {
    pub text: String,
    pub map: Option<MapArtifact>,
}
