pub mod coordinates;
pub mod formatter;
pub mod inference;
pub mod map;
pub mod orchestrator;
pub mod prompt;

pub use crate::domain::model::{
    Coordinate, DeploymentInput, DeploymentRequest, InferenceOutcome, MapArtifact,
    SuggestionReport,
};
pub use crate::domain::ports::{ConfigProvider, RetryPolicy, TextGenerator};
pub use crate::utils::error::Result;
