use crate::core::inference::{
    DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECONDS, DEFAULT_WAIT_SECONDS,
};
use crate::core::{ConfigProvider, DeploymentInput, RetryPolicy};
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_secret, validate_url, Validate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "netdeploy-ai")]
#[command(about = "AI-assisted network deployment planning")]
pub struct CliConfig {
    /// TOML settings file; when given, its [inference] section replaces the flags below
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    #[arg(long, global = true, env = "HF_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    #[arg(long, global = true, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    #[arg(long, global = true, default_value_t = DEFAULT_WAIT_SECONDS)]
    pub wait_seconds: u64,

    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    /// Report a busy model immediately instead of retrying
    #[arg(long, global = true)]
    pub fail_fast: bool,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate a deployment plan and coverage map
    Suggest {
        #[command(flatten)]
        deployment: DeploymentArgs,

        /// Write the coverage map as a standalone HTML page
        #[arg(long)]
        map_output: Option<PathBuf>,
    },
    /// Compare a model-generated plan with your own requirements
    Compare {
        #[arg(
            long,
            conflicts_with = "model_suggestion_file",
            required_unless_present = "model_suggestion_file"
        )]
        model_suggestion: Option<String>,

        #[arg(long)]
        model_suggestion_file: Option<PathBuf>,

        #[command(flatten)]
        deployment: DeploymentArgs,
    },
}

#[derive(Debug, Clone, Args)]
pub struct DeploymentArgs {
    /// Coordinates, e.g. "40.7128, -74.0060"
    #[arg(long, default_value = "")]
    pub location: String,

    #[arg(long, default_value = "")]
    pub terrain: String,

    #[arg(long, default_value = "")]
    pub budget: String,

    #[arg(long, default_value = "")]
    pub special_conditions: String,

    #[arg(long, default_value = "")]
    pub estimated_users: String,

    /// Coverage area in km²
    #[arg(long)]
    pub coverage_area: String,

    #[arg(long = "technology", default_value = "")]
    pub technology_preference: String,
}

impl From<DeploymentArgs> for DeploymentInput {
    fn from(args: DeploymentArgs) -> Self {
        DeploymentInput {
            location: args.location,
            terrain: args.terrain,
            budget: args.budget,
            special_conditions: args.special_conditions,
            estimated_users: args.estimated_users,
            coverage_area: args.coverage_area,
            technology_preference: args.technology_preference,
        }
    }
}

impl CliConfig {
    /// Inference flags given a non-default value. A settings file passed with
    /// `--config` takes precedence over all of them.
    pub fn inference_flags_set(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.endpoint != DEFAULT_ENDPOINT {
            flags.push("--endpoint");
        }
        if self.max_retries != DEFAULT_MAX_RETRIES {
            flags.push("--max-retries");
        }
        if self.wait_seconds != DEFAULT_WAIT_SECONDS {
            flags.push("--wait-seconds");
        }
        if self.timeout_seconds != DEFAULT_TIMEOUT_SECONDS {
            flags.push("--timeout-seconds");
        }
        if self.fail_fast {
            flags.push("--fail-fast");
        }
        flags
    }
}

impl ConfigProvider for CliConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn api_token(&self) -> &str {
        self.api_token.as_deref().unwrap_or("")
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.wait_seconds)
    }

    fn retry_policy(&self) -> RetryPolicy {
        if self.fail_fast {
            RetryPolicy::FailFast
        } else {
            RetryPolicy::Backoff
        }
    }

    fn request_timeout(&self) -> Option<Duration> {
        // 0 表示不設逾時
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("endpoint", &self.endpoint)?;
        validate_secret("api_token", self.api_token())?;
        validate_positive_number("max_retries", self.max_retries, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suggest_command() {
        let config = CliConfig::try_parse_from([
            "netdeploy-ai",
            "--api-token",
            "hf_x",
            "suggest",
            "--location",
            "40.7128, -74.0060",
            "--coverage-area",
            "10",
            "--technology",
            "5G",
        ])
        .unwrap();

        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.retry_policy(), RetryPolicy::Backoff);
        assert!(config.validate().is_ok());

        match config.command {
            Command::Suggest {
                deployment,
                map_output,
            } => {
                let input = DeploymentInput::from(deployment);
                assert_eq!(input.location, "40.7128, -74.0060");
                assert_eq!(input.technology_preference, "5G");
                assert!(map_output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_compare_requires_a_suggestion() {
        let result = CliConfig::try_parse_from([
            "netdeploy-ai",
            "compare",
            "--coverage-area",
            "10",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_fail_fast_and_timeout_flags() {
        let config = CliConfig::try_parse_from([
            "netdeploy-ai",
            "--api-token",
            "hf_x",
            "--fail-fast",
            "--timeout-seconds",
            "0",
            "compare",
            "--model-suggestion",
            "plan",
            "--coverage-area",
            "3",
        ])
        .unwrap();

        assert_eq!(config.retry_policy(), RetryPolicy::FailFast);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_validation_rejects_zero_retries() {
        let config = CliConfig::try_parse_from([
            "netdeploy-ai",
            "--api-token",
            "hf_x",
            "--max-retries",
            "0",
            "suggest",
            "--coverage-area",
            "1",
        ])
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inference_flags_set_lists_changed_flags() {
        let config = CliConfig::try_parse_from([
            "netdeploy-ai",
            "--config",
            "settings.toml",
            "--fail-fast",
            "--max-retries",
            "5",
            "suggest",
            "--coverage-area",
            "1",
        ])
        .unwrap();
        assert_eq!(
            config.inference_flags_set(),
            vec!["--max-retries", "--fail-fast"]
        );

        let config = CliConfig::try_parse_from([
            "netdeploy-ai",
            "--config",
            "settings.toml",
            "suggest",
            "--coverage-area",
            "1",
        ])
        .unwrap();
        assert!(config.inference_flags_set().is_empty());
    }
}
