use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum SamplerError {
    #[error("No cluster endpoint configured. Pass --url or set SEARCH_LATENCY_URL")]
    MissingEndpoint,

    #[error("Invalid cluster endpoint '{url}': expected an http:// or https:// URL")]
    InvalidEndpoint { url: String },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Could not resolve AWS credentials: {detail}")]
    Credentials { detail: String },

    #[error("Failed to sign request: {detail}")]
    Signing { detail: String },

    #[error("Request to {url} failed: {detail}")]
    Transport { url: String, detail: String },

    #[error("Cluster returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Malformed search response: {source}")]
    MalformedResponse { source: serde_json::Error },

    #[error("Target average of {target} ms not reached after {rounds} round(s) ({reason})")]
    TargetNotReached {
        target: u64,
        rounds: u32,
        reason: &'static str,
    },
}
