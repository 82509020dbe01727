use crate::query::request::ChartType;
use crate::storage::schema::is_valid_identifier;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration loaded from environment variables or TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// DuckDB file holding the statistics table. Opened read-only.
    /// If not set, an empty in-memory table is used.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// Name of the statistics table. Must be a plain SQL identifier.
    #[serde(default = "default_table_name")]
    pub table_name: String,
    /// Charset declared on the HTML count page.
    #[serde(default = "default_charset")]
    pub charset: String,
    /// Title of the HTML count page.
    #[serde(default = "default_page_title")]
    pub page_title: String,
    /// Chart types accepted in the `type` parameter.
    #[serde(default = "default_chart_types")]
    pub chart_types: Vec<String>,
    /// Whether pie charts print the share of each slice.
    #[serde(default = "default_pie_percentages")]
    pub pie_percentages: bool,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

fn default_table_name() -> String {
    "bouncer_stats".to_string()
}

fn default_charset() -> String {
    "UTF-8".to_string()
}

fn default_page_title() -> String {
    "OpenOffice.org Bouncer statistics".to_string()
}

fn default_chart_types() -> Vec<String> {
    ChartType::ALL
        .iter()
        .map(|t| t.as_str().to_string())
        .collect()
}

const fn default_pie_percentages() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: None,
            table_name: default_table_name(),
            charset: default_charset(),
            page_title: default_page_title(),
            chart_types: default_chart_types(),
            pie_percentages: default_pie_percentages(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults.
    ///
    /// Environment variables override file values:
    /// - `BOUNCER_HOST` → host
    /// - `BOUNCER_PORT` → port
    /// - `BOUNCER_DATABASE` → database_path
    /// - `BOUNCER_TABLE` → table_name
    /// - `BOUNCER_CHARSET` → charset
    /// - `BOUNCER_TITLE` → page_title
    /// - `BOUNCER_PIE_PERCENTAGES` → pie_percentages
    /// - `BOUNCER_REQUEST_TIMEOUT` → request_timeout_secs
    pub fn load(config_path: Option<&Path>) -> Self {
        let mut config =
            config_path.map_or_else(Self::default, |path| match std::fs::read_to_string(path) {
                Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                    tracing::warn!("Failed to parse config file: {e}, using defaults");
                    Self::default()
                }),
                Err(e) => {
                    tracing::warn!("Failed to read config file: {e}, using defaults");
                    Self::default()
                }
            });

        // Environment variable overrides
        if let Ok(host) = std::env::var("BOUNCER_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("BOUNCER_PORT") {
            if let Ok(p) = port.parse() {
                config.port = p;
            }
        }
        if let Ok(path) = std::env::var("BOUNCER_DATABASE") {
            config.database_path = Some(PathBuf::from(path));
        }
        if let Ok(table) = std::env::var("BOUNCER_TABLE") {
            config.table_name = table;
        }
        if let Ok(charset) = std::env::var("BOUNCER_CHARSET") {
            config.charset = charset;
        }
        if let Ok(title) = std::env::var("BOUNCER_TITLE") {
            config.page_title = title;
        }
        if let Ok(val) = std::env::var("BOUNCER_PIE_PERCENTAGES") {
            config.pie_percentages = val != "0" && val.to_lowercase() != "false";
        }
        if let Ok(val) = std::env::var("BOUNCER_REQUEST_TIMEOUT") {
            if let Ok(t) = val.parse() {
                config.request_timeout_secs = t;
            }
        }

        config
    }

    /// Check the values that are spliced into SQL or drive request validation.
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_identifier(&self.table_name) {
            return Err(format!(
                "table_name '{}' is not a plain SQL identifier",
                self.table_name
            ));
        }
        if self.chart_types.is_empty() {
            return Err("chart_types must list at least one chart type".to_string());
        }
        if let Some(unknown) = self
            .chart_types
            .iter()
            .find(|t| t.parse::<ChartType>().is_err())
        {
            return Err(format!("chart_types contains unknown type '{unknown}'"));
        }
        Ok(())
    }

    /// Returns `true` if the chart type may be requested.
    pub fn is_enabled(&self, chart: ChartType) -> bool {
        self.chart_types.iter().any(|t| t == chart.as_str())
    }
}
