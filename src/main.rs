use anyhow::Context;
use clap::Parser;
use netdeploy_ai::config::Command;
use netdeploy_ai::utils::error::{AssistantError, ErrorSeverity};
use netdeploy_ai::utils::{logger, validation::Validate};
use netdeploy_ai::{
    CliConfig, DeploymentInput, DeploymentOrchestrator, InferenceClient, MapRenderer, MapStyle,
    TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting netdeploy-ai");

    let (client, style) = match build_client(&config) {
        Ok(parts) => parts,
        Err(e) => exit_with(&e),
    };
    tracing::debug!("Inference endpoint: {}", client.endpoint());

    let orchestrator = DeploymentOrchestrator::with_renderer(client, MapRenderer::new(style));

    match config.command {
        Command::Suggest {
            deployment,
            map_output,
        } => {
            let input = DeploymentInput::from(deployment);
            let report = orchestrator.get_suggestion(&input).await;
            println!("{}", report.text);

            if let Some(path) = map_output {
                match &report.map {
                    Some(map) => {
                        std::fs::write(&path, map.to_document()).with_context(|| {
                            format!("failed to write map to {}", path.display())
                        })?;
                        tracing::info!("📍 Map saved to: {}", path.display());
                        println!("📍 Map saved to: {}", path.display());
                    }
                    None => tracing::warn!("No map generated, {} not written", path.display()),
                }
            }
        }
        Command::Compare {
            model_suggestion,
            model_suggestion_file,
            deployment,
        } => {
            let model_suggestion = match (model_suggestion, model_suggestion_file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path).with_context(|| {
                    format!("failed to read model suggestion from {}", path.display())
                })?,
                // clap 已保證兩者至少有一個
                (None, None) => String::new(),
            };

            let input = DeploymentInput::from(deployment);
            let comparison = orchestrator
                .compare_suggestions(&model_suggestion, &input)
                .await;
            println!("{}", comparison);
        }
    }

    Ok(())
}

/// 依 --config 決定設定來源
fn build_client(config: &CliConfig) -> netdeploy_ai::Result<(InferenceClient, MapStyle)> {
    match &config.config {
        Some(path) => {
            tracing::info!("Loading settings from {}", path.display());
            let ignored = config.inference_flags_set();
            if !ignored.is_empty() {
                tracing::warn!(
                    "{} ignored: {} takes precedence",
                    ignored.join(", "),
                    path.display()
                );
            }
            let file_config = TomlConfig::from_file(path)?;
            file_config.validate()?;
            let client = InferenceClient::from_config(&file_config)?;
            Ok((client, file_config.map_style().clone()))
        }
        None => {
            config.validate()?;
            Ok((InferenceClient::from_config(config)?, MapStyle::default()))
        }
    }
}

fn exit_with(e: &AssistantError) -> ! {
    tracing::error!(
        "❌ Configuration failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
