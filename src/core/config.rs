//! Configuration management for liveboard.
//!
//! This module provides configuration handling with:
//! - YAML file support
//! - Environment variable and CLI overrides (applied by the CLI)
//! - Validation and defaults

use crate::charts::ChartSpec;
use crate::core::{LiveboardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Complete configuration for liveboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server connection configuration
    pub server: ServerConfig,
    /// Reconnect policy for the stream
    pub reconnect: ReconnectConfig,
    /// Chart configuration
    pub charts: ChartsConfig,
    /// Field viewer configuration
    pub field: FieldConfig,
    /// UI configuration
    pub ui: UiConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Debug mode
    #[serde(skip)]
    pub debug: bool,
}

/// Server connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the demo server (http:// or https://)
    pub base_url: String,
    /// Path of the stats stream
    pub stats_path: String,
    /// Path of the soccer field stream
    pub field_path: String,
    /// Timeout for a single connect attempt
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
}

/// Reconnect policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    /// Reconnect after the channel drops
    pub enabled: bool,
    /// Delay before the first reconnect attempt
    #[serde(with = "humantime_serde")]
    pub initial_backoff: Duration,
    /// Upper bound for the delay between attempts
    #[serde(with = "humantime_serde")]
    pub max_backoff: Duration,
    /// Backoff multiplier
    pub multiplier: f64,
    /// Add up to 10% random jitter to each delay
    pub jitter: bool,
    /// Give up after this many consecutive failed connect attempts
    pub max_attempts: Option<u32>,
}

/// Chart configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    /// Sliding window size per series
    pub window: usize,
    /// JSON array of samples used to seed the charts
    pub seed_file: Option<PathBuf>,
    /// Charts to draw, in order
    pub layout: Vec<ChartSpec>,
}

/// Field viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Extent of the long (y) axis
    pub height: f64,
    /// Extent of the short (x) axis
    pub width: f64,
    /// Cadence of the position sender
    #[serde(with = "humantime_serde")]
    pub send_interval: Duration,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Redraw cadence of the terminal
    #[serde(with = "humantime_serde")]
    pub tick_rate: Duration,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,
    /// Log file path; the terminal UI discards logs when unset
    pub file: Option<PathBuf>,
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including per-frame detail
    Trace,
    /// Diagnostic output
    Debug,
    /// Normal operation
    Info,
    /// Recoverable problems
    Warn,
    /// Failures only
    Error,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            reconnect: ReconnectConfig::default(),
            charts: ChartsConfig::default(),
            field: FieldConfig::default(),
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
            debug: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            base_url: "http://127.0.0.1:8123".to_string(),
            stats_path: "/stats/ws".to_string(),
            field_path: "/soccer_field/ws".to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        ReconnectConfig {
            enabled: true,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: true,
            max_attempts: None,
        }
    }
}

impl Default for ChartsConfig {
    fn default() -> Self {
        ChartsConfig {
            window: 2048, // server-side history size
            seed_file: None,
            layout: ChartSpec::default_layout(),
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            height: 800.0,
            width: 400.0,
            send_interval: Duration::from_millis(50),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            tick_rate: Duration::from_millis(100),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: LogLevel::Info,
            file: None,
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Result<Self> {
        let config = Config::default();
        config.validate()?;
        Ok(config)
    }

    /// Tracing filter for this run; debug mode raises the level to at least debug.
    pub fn log_filter(&self) -> &'static str {
        match self.logging.level {
            LogLevel::Trace => "trace",
            _ if self.debug => "debug",
            level => level.as_str(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.server.base_url.starts_with("http://")
            || self.server.base_url.starts_with("https://")
            || self.server.base_url.starts_with("ws://")
            || self.server.base_url.starts_with("wss://"))
        {
            return Err(LiveboardError::config(format!(
                "base_url must start with http://, https://, ws:// or wss://, got '{}'",
                self.server.base_url
            )));
        }

        for path in [&self.server.stats_path, &self.server.field_path] {
            if !path.starts_with('/') {
                return Err(LiveboardError::config(format!(
                    "stream paths must start with '/', got '{}'",
                    path
                )));
            }
        }

        if self.server.connect_timeout.is_zero() {
            return Err(LiveboardError::config("connect_timeout must be greater than 0"));
        }

        // Reconnect validation
        if !self.reconnect.multiplier.is_finite() || self.reconnect.multiplier < 1.0 {
            return Err(LiveboardError::config(format!(
                "Backoff multiplier must be a finite number of at least 1.0, got {}",
                self.reconnect.multiplier
            )));
        }

        if self.reconnect.initial_backoff > self.reconnect.max_backoff {
            return Err(LiveboardError::config(format!(
                "initial_backoff ({:?}) exceeds max_backoff ({:?})",
                self.reconnect.initial_backoff, self.reconnect.max_backoff
            )));
        }

        // Chart validation
        if self.charts.window == 0 {
            return Err(LiveboardError::config("window must be greater than 0"));
        }
        validate_layout(&self.charts.layout)?;

        // Field validation
        if !(self.field.height > 0.0 && self.field.width > 0.0) {
            return Err(LiveboardError::config(format!(
                "Field extent must be positive, got {}x{}",
                self.field.height, self.field.width
            )));
        }

        if self.field.send_interval.is_zero() || self.ui.tick_rate.is_zero() {
            return Err(LiveboardError::config("send_interval and tick_rate must be greater than 0"));
        }

        Ok(())
    }
}

/// Check chart names are unique and every chart has at least one series.
pub fn validate_layout(layout: &[ChartSpec]) -> Result<()> {
    if layout.is_empty() {
        return Err(LiveboardError::config("chart layout is empty"));
    }

    let mut seen = HashSet::new();
    for chart in layout {
        if chart.name.is_empty() {
            return Err(LiveboardError::config("chart name must not be empty"));
        }
        if !seen.insert(chart.name.as_str()) {
            return Err(LiveboardError::config(format!("duplicate chart name '{}'", chart.name)));
        }
        if chart.series.is_empty() {
            return Err(LiveboardError::config(format!("chart '{}' has no series", chart.name)));
        }
    }

    Ok(())
}

impl std::str::FromStr for LogLevel {
    type Err = LiveboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(LiveboardError::config(format!("Unknown log level '{}'", other))),
        }
    }
}

impl LogLevel {
    /// Convert to tracing filter string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        ConfigBuilder {
            config: Config::default(),
        }
    }

    /// Load configuration from YAML string
    pub fn from_yaml(mut self, yaml: &str) -> Result<Self> {
        self.config = serde_yaml::from_str(yaml)
            .map_err(|e| LiveboardError::config(format!("Failed to parse YAML config: {}", e)))?;
        Ok(self)
    }

    /// Set server base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.server.base_url = url.into();
        self
    }

    /// Set chart window size
    pub fn window(mut self, window: usize) -> Self {
        self.config.charts.window = window;
        self
    }

    /// Set seed history file
    pub fn seed_file(mut self, path: PathBuf) -> Self {
        self.config.charts.seed_file = Some(path);
        self
    }

    /// Set position send interval
    pub fn send_interval(mut self, interval: Duration) -> Self {
        self.config.field.send_interval = interval;
        self
    }

    /// Enable or disable reconnecting
    pub fn reconnect(mut self, enabled: bool) -> Self {
        self.config.reconnect.enabled = enabled;
        self
    }

    /// Set log level
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set debug mode
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = Config::default();
        config.server.base_url = "localhost:8123".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_window() {
        let mut config = Config::default();
        config.charts.window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_chart_names() {
        let mut config = Config::default();
        let first = config.charts.layout[0].clone();
        config.charts.layout.push(first);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate chart name"));
    }

    #[test]
    fn test_backoff_bounds() {
        let mut config = Config::default();
        config.reconnect.initial_backoff = Duration::from_secs(60);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.reconnect.multiplier = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_multiplier_rejected() {
        for multiplier in [f64::NAN, f64::INFINITY] {
            let mut config = Config::default();
            config.reconnect.multiplier = multiplier;
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("finite"));
        }

        let yaml = "reconnect:\n  multiplier: .nan\n";
        let result = ConfigBuilder::new().from_yaml(yaml).unwrap().build();
        assert!(result.is_err());
    }

    #[test]
    fn test_log_filter_follows_debug_and_level() {
        let config = ConfigBuilder::new().log_level(LogLevel::Warn).build().unwrap();
        assert_eq!(config.log_filter(), "warn");

        let config = ConfigBuilder::new().log_level(LogLevel::Warn).debug(true).build().unwrap();
        assert_eq!(config.log_filter(), "debug");

        let config = ConfigBuilder::new().log_level(LogLevel::Trace).debug(true).build().unwrap();
        assert_eq!(config.log_filter(), "trace");
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("trace".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .base_url("https://demo.example.com")
            .window(60)
            .send_interval(Duration::from_millis(20))
            .reconnect(false)
            .debug(true)
            .build()
            .unwrap();

        assert_eq!(config.server.base_url, "https://demo.example.com");
        assert_eq!(config.charts.window, 60);
        assert_eq!(config.field.send_interval, Duration::from_millis(20));
        assert!(!config.reconnect.enabled);
        assert!(config.debug);
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
server:
  base_url: "http://10.0.0.5:8123"
  connect_timeout: 3s
reconnect:
  initial_backoff: 250ms
  max_backoff: 5s
  max_attempts: 4
charts:
  window: 120
field:
  send_interval: 100ms
"#;

        let config = ConfigBuilder::new().from_yaml(yaml).unwrap().build().unwrap();

        assert_eq!(config.server.base_url, "http://10.0.0.5:8123");
        assert_eq!(config.server.stats_path, "/stats/ws");
        assert_eq!(config.server.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.reconnect.initial_backoff, Duration::from_millis(250));
        assert_eq!(config.reconnect.max_attempts, Some(4));
        assert_eq!(config.charts.window, 120);
        assert_eq!(config.charts.layout.len(), 3);
        assert_eq!(config.field.send_interval, Duration::from_millis(100));
        assert_eq!(config.field.height, 800.0);
    }
}
