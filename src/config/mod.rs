pub mod toml_config;

pub use toml_config::AppConfig;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use super::toml_config::{
        DEFAULT_BIND, DEFAULT_ELEVATION_URL, DEFAULT_NOMINATIM_URL, DEFAULT_TIMEOUT_SECONDS,
        DEFAULT_USER_AGENT,
    };
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::messages::MessageCatalog;
    use crate::utils::validation::{validate_settings, Validate};
    use clap::Parser;
    use std::time::Duration;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "altitude-temp")]
    #[command(about = "Altitude-adjusted standard minimum temperature service")]
    pub struct CliConfig {
        /// TOML configuration file; when given it replaces the flags below
        #[arg(short, long)]
        pub config: Option<String>,

        #[arg(long, default_value = DEFAULT_BIND)]
        pub bind: String,

        #[arg(long, default_value = DEFAULT_NOMINATIM_URL)]
        pub nominatim_url: String,

        #[arg(long, default_value = DEFAULT_ELEVATION_URL)]
        pub elevation_url: String,

        #[arg(long, default_value = DEFAULT_USER_AGENT)]
        pub user_agent: String,

        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
        pub timeout_seconds: u64,

        #[arg(long, default_value = "datasets/temperatures.json")]
        pub temperatures: String,

        #[arg(long, default_value = "datasets/offsets.json")]
        pub offsets: String,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(skip)]
        pub messages: MessageCatalog,
    }

    impl ConfigProvider for CliConfig {
        fn bind_address(&self) -> &str {
            &self.bind
        }

        fn nominatim_url(&self) -> &str {
            &self.nominatim_url
        }

        fn elevation_url(&self) -> &str {
            &self.elevation_url
        }

        fn user_agent(&self) -> &str {
            &self.user_agent
        }

        fn request_timeout(&self) -> Duration {
            Duration::from_secs(self.timeout_seconds)
        }

        fn dataset_root(&self) -> &str {
            "."
        }

        fn temperatures_dataset(&self) -> &str {
            &self.temperatures
        }

        fn offsets_dataset(&self) -> &str {
            &self.offsets
        }

        fn messages(&self) -> &MessageCatalog {
            &self.messages
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_settings(self)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults_are_valid() {
            let config = CliConfig::parse_from(["altitude-temp"]);
            assert_eq!(config.bind_address(), DEFAULT_BIND);
            assert_eq!(config.request_timeout(), Duration::from_secs(10));
            assert!(config.config.is_none());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_flags_override_defaults() {
            let config = CliConfig::parse_from([
                "altitude-temp",
                "--bind",
                "127.0.0.1:3000",
                "--offsets",
                "data/offsets.csv",
                "--timeout-seconds",
                "2",
                "-v",
            ]);
            assert_eq!(config.bind_address(), "127.0.0.1:3000");
            assert_eq!(config.offsets_dataset(), "data/offsets.csv");
            assert_eq!(config.request_timeout(), Duration::from_secs(2));
            assert!(config.verbose);
        }
    }
}
