use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::errors::SamplerError;
use crate::signing::DEFAULT_SERVICE;
use crate::types::OutputFormat;

pub const DEFAULT_REGION: &str = "ap-northeast-2";
pub const DEFAULT_REQUEST: usize = 3;
pub const DEFAULT_TARGET_AVG_MS: u64 = 1;
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// One source of settings. Every field is optional so layers can be
/// stacked: command line over config file over defaults.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub url: Option<String>,
    pub index_name: Option<String>,
    pub region: Option<String>,
    pub service: Option<String>,
    pub request: Option<usize>,
    pub target_avg_search_time: Option<u64>,
    pub interval_ms: Option<u64>,
    pub max_rounds: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub unsigned: Option<bool>,
    pub format: Option<OutputFormat>,
}

impl ConfigLayer {
    /// Fill every unset field from `lower`.
    pub fn or(self, lower: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            url: self.url.or(lower.url),
            index_name: self.index_name.or(lower.index_name),
            region: self.region.or(lower.region),
            service: self.service.or(lower.service),
            request: self.request.or(lower.request),
            target_avg_search_time: self.target_avg_search_time.or(lower.target_avg_search_time),
            interval_ms: self.interval_ms.or(lower.interval_ms),
            max_rounds: self.max_rounds.or(lower.max_rounds),
            timeout_secs: self.timeout_secs.or(lower.timeout_secs),
            unsigned: self.unsigned.or(lower.unsigned),
            format: self.format.or(lower.format),
        }
    }
}

/// Settings for one run. Built once at startup, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub url: String,
    pub index_name: String,
    pub region: String,
    pub service: String,
    pub request: usize,
    pub target_avg_search_time: u64,
    pub interval: Duration,
    pub max_rounds: Option<u32>,
    pub timeout: Option<Duration>,
    pub single_shot: bool,
    pub sign: bool,
    pub format: OutputFormat,
}

impl Config {
    pub fn resolve(layer: ConfigLayer, single_shot: bool) -> Result<Self, SamplerError> {
        let url = layer
            .url
            .filter(|u| !u.trim().is_empty())
            .ok_or(SamplerError::MissingEndpoint)?;

        let index_name = layer.index_name.unwrap_or_default();
        if index_name.trim().is_empty() {
            return Err(invalid("index name must not be empty (use --index_name)"));
        }

        let request = layer.request.unwrap_or(DEFAULT_REQUEST);
        if !single_shot && request == 0 {
            return Err(invalid("request count must be at least 1"));
        }

        if layer.max_rounds == Some(0) {
            return Err(invalid("max rounds must be at least 1"));
        }
        if layer.timeout_secs == Some(0) {
            return Err(invalid("timeout must be at least 1 second"));
        }

        Ok(Config {
            url,
            index_name,
            region: layer.region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            service: layer.service.unwrap_or_else(|| DEFAULT_SERVICE.to_string()),
            request,
            target_avg_search_time: layer.target_avg_search_time.unwrap_or(DEFAULT_TARGET_AVG_MS),
            interval: Duration::from_millis(layer.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS)),
            max_rounds: layer.max_rounds,
            timeout: layer.timeout_secs.map(Duration::from_secs),
            single_shot,
            sign: !layer.unsigned.unwrap_or(false),
            format: layer.format.unwrap_or_default(),
        })
    }
}

fn invalid(detail: &str) -> SamplerError {
    SamplerError::InvalidConfig {
        detail: detail.to_string(),
    }
}

/// `<config_dir>/search-latency/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("search-latency").join("config.toml"))
}

/// Load the config file layer.
///
/// An explicit path must exist. The default path is optional and yields an
/// empty layer when absent.
pub fn load_file(explicit: Option<&Path>) -> Result<ConfigLayer, SamplerError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.is_file() => p,
            _ => return Ok(ConfigLayer::default()),
        },
    };

    let contents = std::fs::read_to_string(&path).map_err(|source| SamplerError::ConfigRead {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| SamplerError::ConfigParse { path, source })
}
