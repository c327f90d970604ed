use crate::core::inference::{
    DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECONDS, DEFAULT_WAIT_SECONDS,
};
use crate::core::map::MapStyle;
use crate::core::{ConfigProvider, RetryPolicy};
use crate::utils::error::{AssistantError, Result};
use crate::utils::validation::{
    validate_positive_number, validate_range, validate_secret, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub inference: InferenceConfig,
    #[serde(default)]
    pub map: MapStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub api_token: String,
    pub max_retries: Option<u32>,
    pub wait_seconds: Option<u64>,
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub retry_policy: RetryPolicy,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AssistantError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AssistantError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HF_API_TOKEN})，找不到的變數原樣保留
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn map_style(&self) -> &MapStyle {
        &self.map
    }
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> &str {
        &self.inference.endpoint
    }

    fn api_token(&self) -> &str {
        &self.inference.api_token
    }

    fn max_retries(&self) -> u32 {
        self.inference.max_retries.unwrap_or(DEFAULT_MAX_RETRIES)
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.inference.wait_seconds.unwrap_or(DEFAULT_WAIT_SECONDS))
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.inference.retry_policy
    }

    fn request_timeout(&self) -> Option<Duration> {
        match self.inference.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS) {
            0 => None,
            seconds => Some(Duration::from_secs(seconds)),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("inference.endpoint", &self.inference.endpoint)?;
        validate_secret("inference.api_token", &self.inference.api_token)?;
        if self.inference.api_token.contains("${") {
            // 環境變數沒有設定
            return Err(AssistantError::MissingConfigError {
                field: "inference.api_token".to_string(),
            });
        }
        validate_positive_number("inference.max_retries", self.max_retries(), 1)?;
        validate_range("map.zoom", self.map.zoom, 0, 20)?;
        validate_range("map.fill_opacity", self.map.fill_opacity, 0.0, 1.0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
[inference]
api_token = "hf_literal"
"#,
        )
        .unwrap();

        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.max_retries(), 3);
        assert_eq!(config.retry_delay(), Duration::from_secs(10));
        assert_eq!(config.retry_policy(), RetryPolicy::Backoff);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(60)));
        assert_eq!(config.map_style(), &MapStyle::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::from_toml_str(
            r##"
[inference]
endpoint = "http://localhost:8080/generate"
api_token = "hf_literal"
max_retries = 5
wait_seconds = 2
timeout_seconds = 0
retry_policy = "fail_fast"

[map]
zoom = 10
stroke_color = "#A27B5C"
fill_opacity = 0.35
"##,
        )
        .unwrap();

        assert_eq!(config.endpoint(), "http://localhost:8080/generate");
        assert_eq!(config.max_retries(), 5);
        assert_eq!(config.retry_delay(), Duration::from_secs(2));
        assert_eq!(config.retry_policy(), RetryPolicy::FailFast);
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.map.zoom, 10);
        assert_eq!(config.map.stroke_color, "#A27B5C");
        // 未指定的欄位使用預設值
        assert_eq!(config.map.height_px, 500);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("NETDEPLOY_TEST_TOKEN", "hf_from_env");

        let config = TomlConfig::from_toml_str(
            r#"
[inference]
api_token = "${NETDEPLOY_TEST_TOKEN}"
"#,
        )
        .unwrap();
        assert_eq!(config.api_token(), "hf_from_env");

        std::env::remove_var("NETDEPLOY_TEST_TOKEN");
    }

    #[test]
    fn test_unresolved_token_fails_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[inference]
api_token = "${NETDEPLOY_UNSET_TOKEN_VAR}"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(AssistantError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[inference]
endpoint = "invalid-url"
api_token = "hf_literal"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[inference]
api_token = "hf_literal"

[map]
fill_opacity = 1.5
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_inference_section_is_config_error() {
        let result = TomlConfig::from_toml_str("[map]\nzoom = 3\n");
        assert!(matches!(result, Err(AssistantError::ConfigError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[inference]\napi_token = \"hf_file\"\nmax_retries = 2\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.api_token(), "hf_file");
        assert_eq!(config.max_retries(), 2);
    }
}
