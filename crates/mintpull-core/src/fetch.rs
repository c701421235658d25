use reqwest::{Client, Url};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Tunables;
use crate::error::PullError;
use crate::model::TokenMetadata;

const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenMetadataRequest<'a> {
    mint_accounts: &'a [String],
    include_off_chain: bool,
    disable_cache: bool,
}

/// Client for the token-metadata endpoint. One request per batch, no retries.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    client: Client,
    endpoint: Url,
    disable_cache: bool,
}

impl MetadataClient {
    pub fn new(client: Client, tunables: &Tunables) -> Result<Self, PullError> {
        let endpoint = Url::parse_with_params(
            &tunables.api_url,
            &[("api-key", tunables.api_key.as_str())],
        )
        .map_err(|err| {
            PullError::Config(format!("invalid metadata URL {}: {}", tunables.api_url, err))
        })?;

        Ok(Self {
            client,
            endpoint,
            disable_cache: tunables.disable_cache,
        })
    }

    /// Looks up on-chain and off-chain metadata for `mints`.
    ///
    /// The response may be shorter than the request and in any order; records are
    /// matched to mints by `account`.
    pub async fn fetch(&self, mints: &[String]) -> Result<Vec<TokenMetadata>, PullError> {
        let body = TokenMetadataRequest {
            mint_accounts: mints,
            include_off_chain: true,
            disable_cache: self.disable_cache,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    warn!(status = %status, error = %err, "Failed to read error response body");
                    "<unreadable body>".to_string()
                }
            };
            return Err(PullError::UpstreamStatus {
                status,
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let payload = response.bytes().await?;
        let records: Vec<TokenMetadata> =
            serde_json::from_slice(&payload).map_err(PullError::Decode)?;
        debug!(
            requested = mints.len(),
            returned = records.len(),
            "Fetched token metadata"
        );
        Ok(records)
    }
}
