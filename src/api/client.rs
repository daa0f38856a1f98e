// src/api/client.rs
//! HTTP client for the Notion API.
//!
//! A thin wrapper around reqwest: authentication headers, the three
//! endpoints the exporter needs, and status handling. Parsing lives in
//! `parser`.

use super::parser;
use super::types::Paginated;
use super::PageSource;
use crate::constants::{NOTION_API_BASE_URL, NOTION_API_PAGE_SIZE, NOTION_API_VERSION};
use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::{ApiKey, NotionId};
use reqwest::{header, Client, Response};
use serde::Serialize;

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

/// Body of a database query request.
#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    page_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_cursor: Option<&'a str>,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        Self::with_base_url(api_key, NOTION_API_BASE_URL)
    }

    /// Same as `new`, against another API root.
    pub fn with_base_url(api_key: &ApiKey, base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let mut auth = header::HeaderValue::from_str(&api_key.bearer()).map_err(|e| {
            AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
        })?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_API_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Makes a GET request to the specified endpoint.
    pub async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Response, AppError> {
        let url = self.endpoint_url(endpoint);
        log::debug!("GET {}", url);
        Ok(self.client.get(url).query(query).send().await?)
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = self.endpoint_url(endpoint);
        log::debug!("POST {}", url);
        Ok(self.client.post(url).json(body).send().await?)
    }
}

/// Reads the body of a response, turning error statuses into `AppError::NotionApi`.
pub async fn extract_response_text(response: Response) -> Result<String, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    if status.is_success() {
        Ok(text)
    } else {
        log::debug!("{} answered {}", url, status);
        Err(parser::parse_error_response(status.as_u16(), &text))
    }
}

fn pagination_query(cursor: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query = vec![("page_size", NOTION_API_PAGE_SIZE.to_string())];
    if let Some(cursor) = cursor {
        query.push(("start_cursor", cursor.to_string()));
    }
    query
}

#[async_trait::async_trait]
impl PageSource for NotionHttpClient {
    async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError> {
        let endpoint = format!("pages/{}", id.as_str());
        let response = self.get(&endpoint, &[]).await?;
        let body = extract_response_text(response).await?;
        parser::parse_page_response(&body)
    }

    async fn list_block_children(
        &self,
        id: &NotionId,
        cursor: Option<&str>,
    ) -> Result<Paginated<Block>, AppError> {
        let endpoint = format!("blocks/{}/children", id.as_str());
        let response = self.get(&endpoint, &pagination_query(cursor)).await?;
        let body = extract_response_text(response).await?;
        parser::parse_block_children(&body)
    }

    async fn query_database(
        &self,
        id: &NotionId,
        cursor: Option<&str>,
    ) -> Result<Paginated<Page>, AppError> {
        let endpoint = format!("databases/{}/query", id.as_str());
        let body = QueryBody {
            page_size: NOTION_API_PAGE_SIZE,
            start_cursor: cursor,
        };
        let response = self.post(&endpoint, &body).await?;
        let body = extract_response_text(response).await?;
        parser::parse_database_rows(&body)
    }
}
