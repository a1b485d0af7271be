use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::errors::SamplerError;

/// Match-all probe issued by the sampling loop.
pub const MATCH_ALL_BODY: &str = r#"{"query":{"query_string":{"query":"*"}}}"#;

/// Size-limited query issued once in single-shot mode.
pub const SINGLE_SHOT_BODY: &str = r#"{"size":1}"#;

/// The subset of a `_search` response body the sampler reads.
///
/// Only `took` is required; the rest is accepted so that a cluster which
/// omits it still parses.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub took: u64,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(rename = "_shards", default)]
    pub shards: ShardStats,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShardStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub successful: u64,
    #[serde(default)]
    pub skipped: u64,
    #[serde(default)]
    pub failed: u64,
}

impl SearchResponse {
    pub fn parse(body: &str) -> Result<Self, SamplerError> {
        serde_json::from_str(body).map_err(|source| SamplerError::MalformedResponse { source })
    }
}

/// Outcome of one measurement attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Took(u64),
    Failed(String),
}

/// Statistics triple in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub min: u64,
    pub max: u64,
    pub avg: u64,
}

/// One batch of attempts. `summary` covers successful attempts only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub requested: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub summary: Summary,
}

impl BatchReport {
    pub fn from_attempts(attempts: &[Attempt]) -> Self {
        let samples: Vec<u64> = attempts
            .iter()
            .filter_map(|a| match a {
                Attempt::Took(ms) => Some(*ms),
                Attempt::Failed(_) => None,
            })
            .collect();

        BatchReport {
            requested: attempts.len(),
            succeeded: samples.len(),
            failed: attempts.len() - samples.len(),
            summary: crate::stats::summarize(&samples),
        }
    }

    /// A batch meets the target only if something was actually measured.
    pub fn meets_target(&self, target_avg: u64) -> bool {
        self.succeeded > 0 && self.summary.avg >= target_avg
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
