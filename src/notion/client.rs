//! HTTP implementation of [`NotionApi`]

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::error::{NotionError, Result};
use super::types::{Block, Page, PaginatedList, QueryRequest};
use super::NotionApi;
use crate::config::NotionSettings;

/// Default HTTP timeout in seconds
const DEFAULT_TIMEOUT: u64 = 30;

/// Page size for block children requests (API maximum)
const BLOCK_PAGE_SIZE: u32 = 100;

/// Notion REST API client
pub struct NotionClient {
    client: reqwest::Client,
    base_url: String,
    version: String,
    token: Option<String>,
}

/// Error body returned by the API
#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl NotionClient {
    /// Create a client. A missing token is not an error here; every call
    /// fails with [`NotionError::MissingCredential`] instead.
    pub fn new(settings: &NotionSettings, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            version: settings.api_version.clone(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or(NotionError::MissingCredential("NOTION_TOKEN"))
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request
            .bearer_auth(self.token()?)
            .header("Notion-Version", &self.version)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let error: ApiErrorBody = serde_json::from_str(&body).unwrap_or(ApiErrorBody {
                code: String::new(),
                message: body,
            });
            return Err(NotionError::Api {
                status: status.as_u16(),
                code: error.code,
                message: error.message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl NotionApi for NotionClient {
    async fn query_database(
        &self,
        database_id: &str,
        request: &QueryRequest,
    ) -> Result<PaginatedList<Page>> {
        let url = format!("{}/databases/{}/query", self.base_url, database_id);
        tracing::debug!("Querying database {}", database_id);
        self.send(self.client.post(&url).json(request)).await
    }

    async fn retrieve_page(&self, page_id: &str) -> Result<Page> {
        let url = format!("{}/pages/{}", self.base_url, page_id);
        tracing::debug!("Retrieving page {}", page_id);
        self.send(self.client.get(&url)).await
    }

    async fn block_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<PaginatedList<Block>> {
        let url = format!("{}/blocks/{}/children", self.base_url, block_id);
        let mut query = vec![("page_size", BLOCK_PAGE_SIZE.to_string())];
        if let Some(cursor) = start_cursor {
            query.push(("start_cursor", cursor.to_string()));
        }
        tracing::debug!("Fetching children of block {}", block_id);
        self.send(self.client.get(&url).query(&query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_base_url() {
        let mut settings = NotionSettings::default();
        settings.api_url = "http://localhost:1234/v1/".to_string();
        let client = NotionClient::new(&settings, Some("secret".to_string())).unwrap();
        assert_eq!(client.base_url, "http://localhost:1234/v1");
        assert_eq!(client.version, settings.api_version);
    }

    #[tokio::test]
    async fn test_missing_token_fails_every_call() {
        let client = NotionClient::new(&NotionSettings::default(), Some(String::new())).unwrap();
        let err = client.retrieve_page("abc").await.unwrap_err();
        assert!(matches!(err, NotionError::MissingCredential("NOTION_TOKEN")));
    }
}
