use crate::core::coordinates::parse_coordinates;
use crate::core::formatter::format_response;
use crate::core::map::MapRenderer;
use crate::core::prompt::{comparison_prompt, suggestion_prompt};
use crate::domain::model::{
    Coordinate, DeploymentInput, DeploymentRequest, MapArtifact, SuggestionReport,
};
use crate::domain::ports::TextGenerator;
use crate::utils::error::{AssistantError, InputField, Result};

pub const COMPARISON_NO_RESPONSE_MESSAGE: &str = "⚠ No response received for comparison.";

/// Runs the two user-facing operations. Failures come back as display strings.
pub struct DeploymentOrchestrator<G: TextGenerator> {
    generator: G,
    renderer: MapRenderer,
}

impl<G: TextGenerator> DeploymentOrchestrator<G> {
    pub fn new(generator: G) -> Self {
        Self::with_renderer(generator, MapRenderer::default())
    }

    pub fn with_renderer(generator: G, renderer: MapRenderer) -> Self {
        Self {
            generator,
            renderer,
        }
    }

    /// Produces the formatted recommendation and its map.
    ///
    /// The map is only rendered alongside a usable answer. Invalid input, a busy
    /// or unavailable model and service errors all return the warning text with
    /// `map: None`.
    pub async fn get_suggestion(&self, input: &DeploymentInput) -> SuggestionReport {
        match self.try_get_suggestion(input).await {
            Ok((text, map)) => SuggestionReport {
                text,
                map: Some(map),
            },
            Err(e) => {
                log_failure("suggestion", &e);
                SuggestionReport {
                    text: e.user_friendly_message(),
                    map: None,
                }
            }
        }
    }

    pub async fn compare_suggestions(&self, model_suggestion: &str, input: &DeploymentInput) -> String {
        match self.try_compare_suggestions(model_suggestion, input).await {
            Ok(text) => text,
            Err(AssistantError::EmptyResponse) => {
                tracing::warn!("Comparison returned no usable text");
                COMPARISON_NO_RESPONSE_MESSAGE.to_string()
            }
            Err(e) => {
                log_failure("comparison", &e);
                e.user_friendly_message()
            }
        }
    }

    async fn try_get_suggestion(&self, input: &DeploymentInput) -> Result<(String, MapArtifact)> {
        // 驗證在任何網路呼叫之前完成
        let request = DeploymentRequest::from_input(input)?;
        let coordinate = locate(&request)?;

        tracing::info!(
            "📡 Requesting deployment plan for ({}, {}), coverage {} km²",
            coordinate.latitude,
            coordinate.longitude,
            request.coverage_area_km2()
        );

        let prompt = suggestion_prompt(&request);
        let text = self.generator.generate(&prompt).await?.into_text()?;
        let formatted = format_response(&text);
        let map = self
            .renderer
            .render(coordinate, request.coverage_area_km2());

        tracing::info!("✅ Deployment plan ready ({} chars)", formatted.len());
        Ok((formatted, map))
    }

    async fn try_compare_suggestions(
        &self,
        model_suggestion: &str,
        input: &DeploymentInput,
    ) -> Result<String> {
        let request = DeploymentRequest::from_input(input)?;

        tracing::info!("📊 Comparing model suggestion with user strategy");
        let prompt = comparison_prompt(model_suggestion, &request);
        let text = self.generator.generate(&prompt).await?.into_text()?;
        Ok(format_response(&text))
    }
}

fn locate(request: &DeploymentRequest) -> Result<Coordinate> {
    let coordinate =
        parse_coordinates(request.location()).ok_or_else(|| AssistantError::InvalidInput {
            field: InputField::Location,
            value: request.location().to_string(),
        })?;

    if !coordinate.is_within_bounds() {
        tracing::warn!(
            "Coordinate ({}, {}) is outside the valid latitude/longitude range",
            coordinate.latitude,
            coordinate.longitude
        );
    }
    Ok(coordinate)
}

fn log_failure(operation: &str, e: &AssistantError) {
    tracing::warn!(
        "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
        operation,
        e,
        e.category(),
        e.severity()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::InferenceOutcome;
    use crate::utils::error::{INVALID_COVERAGE_MESSAGE, INVALID_LOCATION_MESSAGE, NO_RESPONSE_MESSAGE};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct MockGenerator {
        outcome: InferenceOutcome,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl MockGenerator {
        fn new(outcome: InferenceOutcome) -> Self {
            Self {
                outcome,
                prompts: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn replying(text: &str) -> Self {
            Self::new(InferenceOutcome::Success(text.to_string()))
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for MockGenerator {
        async fn generate(&self, prompt: &str) -> Result<InferenceOutcome> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.outcome.clone())
        }
    }

    fn input(location: &str, coverage_area: &str) -> DeploymentInput {
        DeploymentInput {
            location: location.to_string(),
            terrain: "urban".to_string(),
            budget: "$50,000".to_string(),
            special_conditions: "limited power".to_string(),
            estimated_users: "5000".to_string(),
            coverage_area: coverage_area.to_string(),
            technology_preference: "5G".to_string(),
        }
    }

    #[tokio::test]
    async fn test_suggestion_success_returns_text_and_map() {
        let generator = MockGenerator::replying("Plan A");
        let orchestrator = DeploymentOrchestrator::new(generator.clone());

        let report = orchestrator
            .get_suggestion(&input("40.7128, -74.0060", "10"))
            .await;

        assert_eq!(report.text, format_response("Plan A"));
        let map = report.map.expect("map should be rendered");
        assert_eq!(map.coordinate, Coordinate::new(40.7128, -74.006));
        assert!(map.html.contains("40.7128"));
        assert!(map.html.contains("-74.006"));
        assert!(map.html.contains("\"radius\":10000.0"));

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- Location: 40.7128, -74.0060"));
        assert!(prompts[0].contains("1. Recommended Network Topology"));
    }

    #[tokio::test]
    async fn test_suggestion_invalid_coverage_skips_generator() {
        let generator = MockGenerator::replying("Plan A");
        let orchestrator = DeploymentOrchestrator::new(generator.clone());

        let report = orchestrator
            .get_suggestion(&input("40.7128, -74.0060", "abc"))
            .await;

        assert_eq!(report.text, INVALID_COVERAGE_MESSAGE);
        assert!(report.map.is_none());
        assert!(generator.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_suggestion_invalid_location_skips_generator() {
        let generator = MockGenerator::replying("Plan A");
        let orchestrator = DeploymentOrchestrator::new(generator.clone());

        let report = orchestrator.get_suggestion(&input("Lahore, Pakistan", "10")).await;

        assert_eq!(report.text, INVALID_LOCATION_MESSAGE);
        assert!(report.map.is_none());
        assert!(generator.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_suggestion_empty_text_reports_no_response() {
        let orchestrator = DeploymentOrchestrator::new(MockGenerator::replying(""));

        let report = orchestrator.get_suggestion(&input("1.0, 2.0", "3")).await;

        assert_eq!(report.text, NO_RESPONSE_MESSAGE);
        assert!(report.map.is_none());
    }

    #[tokio::test]
    async fn test_suggestion_busy_surfaces_attempt() {
        let orchestrator = DeploymentOrchestrator::new(MockGenerator::new(InferenceOutcome::Busy {
            attempt: 1,
            max_retries: 3,
        }));

        let report = orchestrator.get_suggestion(&input("1.0, 2.0", "3")).await;

        assert_eq!(
            report.text,
            "⚠ Model is busy, please try again later. (Attempt 1/3)"
        );
        // 沒有可用的建議就不畫地圖
        assert!(report.map.is_none());
    }

    #[tokio::test]
    async fn test_suggestion_service_error_has_no_map() {
        let orchestrator = DeploymentOrchestrator::new(MockGenerator::new(InferenceOutcome::Error {
            status: 500,
            payload: "{\"error\":\"internal\"}".to_string(),
        }));

        let report = orchestrator.get_suggestion(&input("1.0, 2.0", "3")).await;

        assert!(report.text.starts_with("⚠ Error: "));
        assert!(report.map.is_none());
    }

    #[tokio::test]
    async fn test_compare_does_not_require_location() {
        let generator = MockGenerator::replying("Model's plan is cheaper.\\n    Verdict: model");
        let orchestrator = DeploymentOrchestrator::new(generator.clone());

        let text = orchestrator
            .compare_suggestions("Use fiber backhaul", &input("somewhere hilly", "25"))
            .await;

        assert_eq!(text, "Model's plan is cheaper.\nVerdict: model");
        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("*Model's Suggestion:* Use fiber backhaul"));
        assert!(prompts[0].contains("- Location: somewhere hilly"));
    }

    #[tokio::test]
    async fn test_compare_invalid_coverage() {
        let generator = MockGenerator::replying("irrelevant");
        let orchestrator = DeploymentOrchestrator::new(generator.clone());

        let text = orchestrator
            .compare_suggestions("plan", &input("1, 2", "ten"))
            .await;

        assert_eq!(text, INVALID_COVERAGE_MESSAGE);
        assert!(generator.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_compare_empty_text_reports_no_response() {
        let orchestrator = DeploymentOrchestrator::new(MockGenerator::replying("   "));

        let text = orchestrator.compare_suggestions("plan", &input("x", "1")).await;

        assert_eq!(text, COMPARISON_NO_RESPONSE_MESSAGE);
    }

    #[tokio::test]
    async fn test_compare_service_error_embeds_payload() {
        let orchestrator = DeploymentOrchestrator::new(MockGenerator::new(InferenceOutcome::Error {
            status: 500,
            payload: "{\"error\":\"internal\"}".to_string(),
        }));

        let text = orchestrator.compare_suggestions("plan", &input("x", "1")).await;

        assert_eq!(text, "⚠ Error: {\"error\":\"internal\"}");
    }
}
