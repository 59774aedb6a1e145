//! Pinecone gateway: index provisioning and vector upserts.
//!
//! Talks to the control plane (`https://api.pinecone.io`) for index lifecycle
//! and to the per-index data-plane host for upserts.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::VectorStoreError;
use crate::models::{VectorPoint, VectorStoreConfig};

const API_VERSION_HEADER: &str = "X-Pinecone-API-Version";
const API_VERSION: &str = "2025-01";

/// How long to wait for a freshly created index to become ready.
const READY_POLL_INTERVAL: Duration = Duration::from_secs(2);
const READY_POLL_ATTEMPTS: u32 = 60;

/// Request body for index creation.
#[derive(Debug, Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: u32,
    metric: &'a str,
    spec: IndexSpec<'a>,
}

#[derive(Debug, Serialize)]
struct IndexSpec<'a> {
    serverless: ServerlessSpec<'a>,
}

#[derive(Debug, Serialize)]
struct ServerlessSpec<'a> {
    cloud: &'a str,
    region: &'a str,
}

/// Index model returned by describe/create.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexDescription {
    pub name: String,
    pub dimension: u32,
    pub metric: String,
    pub host: String,
    #[serde(default)]
    pub status: IndexStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexStatus {
    #[serde(default)]
    pub ready: bool,
}

/// Handle to a ready index: the data-plane host upserts go to.
#[derive(Debug, Clone)]
pub struct IndexHandle {
    pub name: String,
    pub host: String,
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorPoint],
}

#[derive(Debug, Deserialize)]
struct UpsertResponse {
    #[serde(rename = "upsertedCount", default)]
    upserted_count: u64,
}

/// Client for the Pinecone vector store.
#[derive(Debug, Clone)]
pub struct VectorStoreClient {
    client: Client,
    config: VectorStoreConfig,
    api_key: String,
}

impl VectorStoreClient {
    /// Create a new vector store client with the given configuration.
    pub fn new(config: &VectorStoreConfig, api_key: String) -> Result<Self, VectorStoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
        })
    }

    /// Describe the configured index, or `None` if it does not exist.
    pub async fn describe_index(&self) -> Result<Option<IndexDescription>, VectorStoreError> {
        let url = format!(
            "{}/indexes/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.index
        );
        let response = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .header(API_VERSION_HEADER, API_VERSION)
            .send()
            .await
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::IndexError(format!(
                "describe failed with status {}: {}",
                status, body
            )));
        }

        let description = response
            .json::<IndexDescription>()
            .await
            .map_err(|e| VectorStoreError::InvalidResponse(e.to_string()))?;
        Ok(Some(description))
    }

    /// Create the configured index with the given dimensionality.
    pub async fn create_index(&self, dimension: u32) -> Result<IndexDescription, VectorStoreError> {
        let url = format!("{}/indexes", self.config.api_url.trim_end_matches('/'));
        let request = CreateIndexRequest {
            name: &self.config.index,
            dimension,
            metric: &self.config.metric,
            spec: IndexSpec {
                serverless: ServerlessSpec {
                    cloud: &self.config.cloud,
                    region: &self.config.region,
                },
            },
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .header(API_VERSION_HEADER, API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::IndexError(format!(
                "create failed with status {}: {}",
                status, body
            )));
        }

        response
            .json::<IndexDescription>()
            .await
            .map_err(|e| VectorStoreError::InvalidResponse(e.to_string()))
    }

    /// Ensure the configured index exists and is ready to accept upserts.
    ///
    /// Idempotent: an existing index is reused as-is (its dimension and metric
    /// are fixed at creation and never modified here). A newly created index
    /// is polled until Pinecone reports it ready. Returns whether the index
    /// was created along with its data-plane handle.
    pub async fn ensure_index(
        &self,
        dimension: u32,
    ) -> Result<(IndexHandle, bool), VectorStoreError> {
        if let Some(existing) = self.describe_index().await? {
            let handle = self.wait_until_ready(existing).await?;
            return Ok((handle, false));
        }

        let created = self.create_index(dimension).await?;
        let handle = self.wait_until_ready(created).await?;
        Ok((handle, true))
    }

    /// Poll describe until the index reports ready.
    async fn wait_until_ready(
        &self,
        description: IndexDescription,
    ) -> Result<IndexHandle, VectorStoreError> {
        let mut current = description;
        let mut attempts = 0;

        while !current.status.ready {
            attempts += 1;
            if attempts > READY_POLL_ATTEMPTS {
                return Err(VectorStoreError::NotReady(current.name));
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
            current = self
                .describe_index()
                .await?
                .ok_or_else(|| VectorStoreError::IndexError(
                    "index disappeared while waiting for it to become ready".to_string(),
                ))?;
        }

        Ok(IndexHandle {
            name: current.name,
            host: current.host,
        })
    }

    /// Upsert a batch of vectors into the index behind `handle`.
    ///
    /// Insert-or-overwrite keyed by id; re-upserting the same ids is harmless.
    pub async fn upsert(
        &self,
        handle: &IndexHandle,
        points: &[VectorPoint],
    ) -> Result<u64, VectorStoreError> {
        if points.is_empty() {
            return Ok(0);
        }

        let url = format!("{}/vectors/upsert", data_plane_url(&handle.host));
        let request = UpsertRequest { vectors: points };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .header(API_VERSION_HEADER, API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::UpsertError(format!(
                "status {}: {}",
                status, body
            )));
        }

        let parsed: UpsertResponse = response
            .json()
            .await
            .map_err(|e| VectorStoreError::InvalidResponse(e.to_string()))?;

        if parsed.upserted_count != points.len() as u64 {
            return Err(VectorStoreError::UpsertError(format!(
                "upserted {} of {} vectors",
                parsed.upserted_count,
                points.len()
            )));
        }

        Ok(parsed.upserted_count)
    }

    /// Name of the configured index.
    pub fn index(&self) -> &str {
        &self.config.index
    }
}

/// Pinecone returns index hosts without a scheme.
fn data_plane_url(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.trim_end_matches('/').to_string()
    } else {
        format!("https://{}", host.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecordMetadata, SourceTag};

    #[test]
    fn test_client_creation() {
        let config = VectorStoreConfig::default();
        let client = VectorStoreClient::new(&config, "pc-test".to_string()).unwrap();
        assert_eq!(client.index(), "combined-index");
    }

    #[test]
    fn test_data_plane_url() {
        assert_eq!(
            data_plane_url("combined-index-abc123.svc.pinecone.io"),
            "https://combined-index-abc123.svc.pinecone.io"
        );
        assert_eq!(
            data_plane_url("https://host.pinecone.io/"),
            "https://host.pinecone.io"
        );
    }

    #[test]
    fn test_create_index_request_body() {
        let request = CreateIndexRequest {
            name: "combined-index",
            dimension: 1536,
            metric: "euclidean",
            spec: IndexSpec {
                serverless: ServerlessSpec {
                    cloud: "aws",
                    region: "us-west-2",
                },
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["name"], "combined-index");
        assert_eq!(json["dimension"], 1536);
        assert_eq!(json["metric"], "euclidean");
        assert_eq!(json["spec"]["serverless"]["cloud"], "aws");
        assert_eq!(json["spec"]["serverless"]["region"], "us-west-2");
    }

    #[test]
    fn test_upsert_request_body() {
        let points = vec![VectorPoint {
            id: "tmcf_0".to_string(),
            values: vec![0.1, 0.2],
            metadata: RecordMetadata {
                source: SourceTag::TmcfJobs,
                original: "{}".to_string(),
            },
        }];
        let request = UpsertRequest { vectors: &points };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["vectors"][0]["id"], "tmcf_0");
        assert_eq!(json["vectors"][0]["metadata"]["source"], "tmcf_jobs");
        assert_eq!(json["vectors"][0]["metadata"]["original"], "{}");
    }

    #[test]
    fn test_describe_response_parsing() {
        let raw = r#"{
            "name": "combined-index",
            "dimension": 1536,
            "metric": "euclidean",
            "host": "combined-index-abc123.svc.pinecone.io",
            "status": {"ready": true, "state": "Ready"}
        }"#;
        let description: IndexDescription = serde_json::from_str(raw).unwrap();
        assert_eq!(description.dimension, 1536);
        assert!(description.status.ready);
    }
}
