use std::time::Duration;

use tracing::debug;

use crate::errors::SamplerError;
use crate::signing::RequestSigner;

/// A handle that can run a search against the cluster.
///
/// Returns the raw response body on a 2xx status.
pub trait SearchClient {
    fn search(&self, index: &str, body: &str) -> Result<String, SamplerError>;
}

/// Blocking HTTP client for an OpenSearch-compatible `_search` endpoint.
pub struct HttpSearchClient {
    agent: ureq::Agent,
    endpoint: String,
    signer: Option<RequestSigner>,
}

fn http_agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(Duration::from_secs(10))
        .timeout_read(Duration::from_secs(30))
        .timeout_write(Duration::from_secs(30))
        .build()
}

/// Validate an endpoint and strip trailing slashes.
pub fn normalize_endpoint(url: &str) -> Result<String, SamplerError> {
    let trimmed = url.trim();
    let has_host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .is_some_and(|rest| !rest.trim_matches('/').is_empty());
    if !has_host {
        return Err(SamplerError::InvalidEndpoint {
            url: url.to_string(),
        });
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

impl HttpSearchClient {
    pub fn new(endpoint: &str) -> Result<Self, SamplerError> {
        Ok(HttpSearchClient {
            agent: http_agent(),
            endpoint: normalize_endpoint(endpoint)?,
            signer: None,
        })
    }

    pub fn with_signer(mut self, signer: RequestSigner) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn search_url(&self, index: &str) -> String {
        format!("{}/{}/_search", self.endpoint, index)
    }
}

impl SearchClient for HttpSearchClient {
    fn search(&self, index: &str, body: &str) -> Result<String, SamplerError> {
        let url = self.search_url(index);
        let mut request = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json");

        if let Some(signer) = &self.signer {
            let signed = signer.sign(
                "POST",
                &url,
                &[("content-type", "application/json")],
                body.as_bytes(),
            )?;
            for (name, value) in &signed {
                request = request.set(name, value);
            }
        }

        debug!(%url, "POST search");
        match request.send_string(body) {
            Ok(resp) => resp.into_string().map_err(|e| SamplerError::Transport {
                url,
                detail: format!("failed to read response body: {e}"),
            }),
            Err(ureq::Error::Status(status, resp)) => Err(SamplerError::HttpStatus {
                status,
                body: resp
                    .into_string()
                    .unwrap_or_else(|e| format!("<failed to read response body: {e}>")),
            }),
            Err(ureq::Error::Transport(err)) => Err(SamplerError::Transport {
                url,
                detail: err.to_string(),
            }),
        }
    }
}
