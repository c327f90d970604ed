pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use crate::core::{
    inference::InferenceClient,
    map::{MapRenderer, MapStyle},
    orchestrator::DeploymentOrchestrator,
};
pub use domain::model::{Coordinate, DeploymentInput, InferenceOutcome, MapArtifact, SuggestionReport};
pub use utils::error::{AssistantError, Result};
