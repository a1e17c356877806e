use serde::{Deserialize, Serialize};

use crate::domain::{
    errors::ConfigError,
    logging::{LogComponent, LogLevel, get_logger},
    market_data::{DEFAULT_BATCH_SEPARATOR, PeriodPreset},
};
use super::http::DEFAULT_BASE_URL;

/// Id of the optional `<script type="application/json">` holding overrides
pub const CONFIG_ELEMENT_ID: &str = "app-config";

/// Startup configuration. Every field has a default, so a host page only
/// lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Chart API origin; point it at a CORS proxy when needed
    pub base_url: String,
    pub default_tickers: String,
    pub default_period: PeriodPreset,
    /// Symbols containing it are fetched one at a time
    pub batch_separator: char,
    pub chart_width: u32,
    pub chart_height: u32,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_tickers: "QQQ ARKK".to_string(),
            default_period: PeriodPreset::default(),
            batch_separator: DEFAULT_BATCH_SEPARATOR,
            chart_width: 960,
            chart_height: 520,
            log_level: LogLevel::Info,
        }
    }
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// Reads the config element of the current page; a missing element
    /// yields the defaults.
    pub fn read_document() -> Result<Self, ConfigError> {
        let text = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|element| element.text_content());

        match text {
            Some(text) => Self::from_json(&text),
            None => Ok(Self::default()),
        }
    }

    /// Like [`AppConfig::read_document`], logging a malformed element and
    /// falling back to the defaults.
    pub fn load_from_document() -> Self {
        Self::read_document().unwrap_or_else(|e| {
            get_logger().warn(
                LogComponent::Infrastructure("Config"),
                &format!("{}; using defaults", e),
            );
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = AppConfig::from_json(
            r#"{"base_url":"https://proxy.example","default_period":"1 Year","log_level":"debug"}"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://proxy.example");
        assert_eq!(config.default_period, PeriodPreset::OneYear);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.default_tickers, "QQQ ARKK");
        assert_eq!(config.batch_separator, '.');
    }

    #[test]
    fn empty_object_is_the_default() {
        assert_eq!(AppConfig::from_json("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = AppConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }
}
