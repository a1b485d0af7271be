//! AWS SigV4 request signing for managed OpenSearch domains.
//!
//! Credentials come from the standard AWS provider chain (environment,
//! profile files, SSO, instance or container roles). The chain caches and
//! refreshes them, so they are looked up again for every signed request.

use std::fmt;
use std::time::SystemTime;

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{SignableBody, SignableRequest, SigningParams, SigningSettings, sign};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::errors::SamplerError;

/// Service name for managed OpenSearch domains.
pub const DEFAULT_SERVICE: &str = "es";

pub struct RequestSigner {
    provider: SharedCredentialsProvider,
    region: String,
    service: String,
    // The SDK providers are async; this tool is not.
    runtime: Runtime,
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("region", &self.region)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl RequestSigner {
    /// Resolve credentials through the default AWS provider chain.
    ///
    /// Credentials are fetched once here so a misconfigured environment
    /// fails at startup instead of on the first request.
    pub fn from_environment(region: &str, service: &str) -> Result<Self, SamplerError> {
        let runtime = build_runtime()?;
        let sdk_config = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region.to_owned()))
                .load(),
        );
        let provider = sdk_config
            .credentials_provider()
            .ok_or_else(|| SamplerError::Credentials {
                detail: "no credentials provider available".to_string(),
            })?;

        let signer = RequestSigner {
            provider,
            region: region.to_owned(),
            service: service.to_owned(),
            runtime,
        };
        signer.credentials()?;
        debug!(region, service, "resolved AWS credentials");
        Ok(signer)
    }

    pub fn with_provider(
        provider: SharedCredentialsProvider,
        region: &str,
        service: &str,
    ) -> Result<Self, SamplerError> {
        Ok(RequestSigner {
            provider,
            region: region.to_owned(),
            service: service.to_owned(),
            runtime: build_runtime()?,
        })
    }

    fn credentials(&self) -> Result<Credentials, SamplerError> {
        self.runtime
            .block_on(self.provider.provide_credentials())
            .map_err(|e| SamplerError::Credentials {
                detail: e.to_string(),
            })
    }

    /// Sign a request and return the headers that must be added to it.
    ///
    /// `headers` must be exactly the headers that will be sent, since
    /// they are part of the signature.
    pub fn sign(
        &self,
        method: &str,
        url: &str,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Result<Vec<(String, String)>, SamplerError> {
        let identity: Identity = self.credentials()?.into();
        let params: SigningParams<'_> = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(&self.service)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .map_err(signing_error)?
            .into();

        let signable = SignableRequest::new(
            method,
            url,
            headers.iter().copied(),
            SignableBody::Bytes(body),
        )
        .map_err(signing_error)?;

        let (instructions, _signature) = sign(signable, &params)
            .map_err(signing_error)?
            .into_parts();

        Ok(instructions
            .headers()
            .map(|(name, value)| (name.to_owned(), value.to_owned()))
            .collect())
    }
}

fn build_runtime() -> Result<Runtime, SamplerError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| SamplerError::Credentials {
            detail: format!("failed to start credential runtime: {e}"),
        })
}

fn signing_error(err: impl fmt::Display) -> SamplerError {
    SamplerError::Signing {
        detail: err.to_string(),
    }
}
