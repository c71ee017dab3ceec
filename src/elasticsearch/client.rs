use std::collections::HashMap;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header::CONTENT_TYPE};
use semver::Version;
use serde::Deserialize;
use url::Url;

use super::compat::Compatibility;
use super::error::{ErrorCause, StoreError};
use super::mapping::index_mapping;
use crate::config::ElasticsearchConfig;
use crate::prelude::*;
use crate::request_client::build_request_client;

const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

#[derive(Debug, Deserialize)]
struct ClusterInfo {
    version: ClusterVersion,
}

#[derive(Debug, Deserialize)]
struct ClusterVersion {
    number: String,
}

#[derive(Debug, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub errors: bool,
    #[serde(default)]
    pub items: Vec<HashMap<String, BulkItem>>,
}

#[derive(Debug, Deserialize)]
pub struct BulkItem {
    pub status: u16,
    pub error: Option<ErrorCause>,
}

impl BulkResponse {
    fn failures(&self) -> impl Iterator<Item = &BulkItem> {
        self.items
            .iter()
            .flat_map(|item| item.values())
            .filter(|item| item.error.is_some())
    }
}

pub struct ElasticsearchClient {
    http: Client,
    url: Url,
    username: Option<String>,
    password: Option<String>,
    verbose: bool,
}

impl ElasticsearchClient {
    pub fn new(config: &ElasticsearchConfig, verbose: bool) -> Result<Self> {
        Ok(Self {
            http: build_request_client(config.request_timeout, config.skip_tls_verify)?,
            url: config.url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            verbose,
        })
    }

    /// `path` appended to the base URL, keeping any path prefix the base URL has.
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.url.clone();
        let base_path = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base_path}/{path}"));
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self.http.request(method, url);
        if self.username.is_none() && self.password.is_none() {
            return request;
        }
        request.basic_auth(
            self.username.as_deref().unwrap_or_default(),
            self.password.as_deref(),
        )
    }

    /// Read the whole body of a response, turning error statuses into a [`StoreError`].
    async fn read_response(&self, response: Response) -> Result<Vec<u8>, StoreError> {
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        if !status.is_success() {
            return Err(StoreError::from_response(status, &body));
        }
        if self.verbose {
            info!("Elasticsearch replied {status}: {}", String::from_utf8_lossy(&body));
        }
        Ok(body)
    }

    /// The version reported by the cluster root endpoint.
    pub async fn version(&self) -> Result<Version> {
        let response = self
            .request(Method::GET, self.url.clone())
            .send()
            .await
            .context(format!("Failed to reach Elasticsearch at {}", self.url))?;

        let status = response.status();
        if status != StatusCode::OK {
            bail!("received unexpected {} status code", status.as_u16());
        }

        let info: ClusterInfo = response
            .json()
            .await
            .context("Failed to decode the Elasticsearch cluster info")?;
        let version = Version::parse(&info.version.number).context(format!(
            "Invalid Elasticsearch version {:?}",
            info.version.number
        ))?;
        debug!("Elasticsearch version: {version}");

        Ok(version)
    }

    /// Create `index` with the benchmark document mapping. An existing index is left as is.
    pub async fn create_index(&self, index: &str, compatibility: Compatibility) -> Result<()> {
        let response = self
            .request(Method::PUT, self.endpoint(index))
            .json(&index_mapping(compatibility))
            .send()
            .await
            .map_err(StoreError::from)?;

        match self.read_response(response).await {
            Ok(_) => {
                info!("Created index {index}");
                Ok(())
            }
            Err(e) if e.is_already_exists() => {
                if self.verbose {
                    info!("index {index:?} already exists");
                } else {
                    debug!("index {index:?} already exists");
                }
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Send a newline-delimited bulk body in a single request.
    ///
    /// Documents individually rejected by Elasticsearch are reported but do not fail the
    /// request.
    pub async fn bulk(&self, body: Vec<u8>) -> Result<BulkResponse> {
        let response = self
            .request(Method::POST, self.endpoint("_bulk"))
            .header(CONTENT_TYPE, NDJSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(StoreError::from)?;

        let body = self.read_response(response).await?;
        let bulk_response: BulkResponse =
            serde_json::from_slice(&body).context("Failed to decode the bulk response")?;
        debug!(
            "Bulk request of {} items took {}ms",
            bulk_response.items.len(),
            bulk_response.took
        );

        if bulk_response.errors {
            let failures: Vec<_> = bulk_response.failures().collect();
            warn!(
                "{} of {} documents were rejected by Elasticsearch",
                failures.len(),
                bulk_response.items.len()
            );
            for item in failures {
                if let Some(error) = &item.error {
                    debug!("{} {}: {}", item.status, error.kind, error.reason);
                }
            }
        }

        Ok(bulk_response)
    }
}
