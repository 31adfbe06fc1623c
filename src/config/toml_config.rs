use crate::core::ConfigProvider;
use crate::utils::error::{AppError, Result};
use crate::utils::messages::MessageCatalog;
use crate::utils::validation::{validate_settings, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_ELEVATION_URL: &str = "https://api.open-elevation.com/api/v1/lookup";
pub const DEFAULT_USER_AGENT: &str = concat!("altitude-temp/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub datasets: DatasetConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub messages: MessageCatalog,
    /// 設定檔所在目錄，資料集路徑以此為基準
    #[serde(skip)]
    pub base_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub nominatim_url: String,
    pub elevation_url: String,
    pub user_agent: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub temperatures: String,
    pub offsets: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: Option<bool>,
    pub level: Option<String>,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let mut config = Self::from_toml_str(&content)?;

        config.base_dir = path
            .as_ref()
            .parent()
            .map(|dir| dir.to_string_lossy().to_string())
            .filter(|dir| !dir.is_empty())
            .unwrap_or_else(|| ".".to_string());

        Ok(config)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: Self = toml::from_str(&processed_content).map_err(|e| AppError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })?;
        config.base_dir = ".".to_string();
        Ok(config)
    }

    /// 替換環境變數 (例如 ${NOMINATIM_URL})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;

        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.json.unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.level.as_deref()
    }
}

impl ConfigProvider for AppConfig {
    fn bind_address(&self) -> &str {
        &self.server.bind
    }

    fn nominatim_url(&self) -> &str {
        &self.api.nominatim_url
    }

    fn elevation_url(&self) -> &str {
        &self.api.elevation_url
    }

    fn user_agent(&self) -> &str {
        self.api.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    fn dataset_root(&self) -> &str {
        &self.base_dir
    }

    fn temperatures_dataset(&self) -> &str {
        &self.datasets.temperatures
    }

    fn offsets_dataset(&self) -> &str {
        &self.datasets.offsets
    }

    fn messages(&self) -> &MessageCatalog {
        &self.messages
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_settings(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[server]
bind = "127.0.0.1:9000"

[api]
nominatim_url = "https://nominatim.example.com/search"
elevation_url = "https://elevation.example.com/api/v1/lookup"
user_agent = "test-agent/1.0"
timeout_seconds = 3

[datasets]
temperatures = "datasets/temperatures.json"
offsets = "datasets/offsets.csv"
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = AppConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.nominatim_url(), "https://nominatim.example.com/search");
        assert_eq!(config.user_agent(), "test-agent/1.0");
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.offsets_dataset(), "datasets/offsets.csv");
        assert_eq!(config.messages(), &MessageCatalog::default());
        assert!(!config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_for_optional_sections() {
        let config = AppConfig::from_toml_str(
            r#"
[api]
nominatim_url = "https://nominatim.example.com/search"
elevation_url = "https://elevation.example.com/lookup"

[datasets]
temperatures = "t.json"
offsets = "o.json"
"#,
        )
        .unwrap();

        assert_eq!(config.bind_address(), DEFAULT_BIND);
        assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);
        assert_eq!(config.request_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECONDS));
        assert_eq!(config.log_level(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ALTITUDE_TEMP_TEST_ELEVATION", "https://elevation.internal/lookup");

        let content = BASIC.replace(
            "https://elevation.example.com/api/v1/lookup",
            "${ALTITUDE_TEMP_TEST_ELEVATION}",
        );
        let config = AppConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.elevation_url(), "https://elevation.internal/lookup");

        std::env::remove_var("ALTITUDE_TEMP_TEST_ELEVATION");
    }

    #[test]
    fn test_messages_override() {
        let content = format!(
            "{}\n[messages]\naltitude_exceed = \"Au-dessus de {{max}} m\"\n",
            BASIC
        );
        let config = AppConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.messages().altitude_exceed, "Au-dessus de {max} m");
        assert_eq!(config.messages().validation, "Validation error");
    }

    #[test]
    fn test_config_validation() {
        let invalid_url = BASIC.replace("https://nominatim.example.com/search", "invalid-url");
        assert!(AppConfig::from_toml_str(&invalid_url).unwrap().validate().is_err());

        let invalid_dataset = BASIC.replace("offsets.csv", "offsets.xml");
        assert!(AppConfig::from_toml_str(&invalid_dataset).unwrap().validate().is_err());

        let invalid_bind = BASIC.replace("127.0.0.1:9000", "localhost");
        assert!(AppConfig::from_toml_str(&invalid_bind).unwrap().validate().is_err());

        let zero_timeout = BASIC.replace("timeout_seconds = 3", "timeout_seconds = 0");
        assert!(AppConfig::from_toml_str(&zero_timeout).unwrap().validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[api\nnominatim_url = ").unwrap_err();
        assert!(matches!(err, AppError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file_sets_base_dir() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        let expected_dir = temp_file.path().parent().unwrap().to_string_lossy().to_string();
        assert_eq!(config.dataset_root(), expected_dir);
    }
}
