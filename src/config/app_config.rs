use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub cache_type: String,
    pub max_capacity: u64,
    /// TTL used by the bundled demo when none is given on the command line
    pub default_ttl_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            cache_type: "in_memory".to_string(),
            max_capacity: 10_000,
            default_ttl_secs: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("MEMO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.cache.cache_type, "in_memory");
        assert_eq!(config.cache.max_capacity, 10_000);
        assert_eq!(config.cache.default_ttl_secs, 10);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let config = config::Config::builder()
            .set_override("cache.max_capacity", 500_i64)
            .unwrap()
            .set_override("logging.format", "json")
            .unwrap()
            .build()
            .unwrap();

        let app: AppConfig = config.try_deserialize().unwrap();

        assert_eq!(app.cache.max_capacity, 500);
        assert_eq!(app.cache.cache_type, "in_memory");
        assert_eq!(app.logging.format, LogFormat::Json);
        assert_eq!(app.logging.level, "info");
    }
}
