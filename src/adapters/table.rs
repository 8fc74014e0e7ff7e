//! REST adapter for the hosted table service.
//!
//! Speaks the PostgREST dialect exposed at `{url}/rest/v1/{table}`:
//! ordering, offset/limit paging and `column=eq.value` filters are all
//! query parameters, and the anon key travels in both the `apikey` and
//! `Authorization` headers.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{PageQuery, RecordSource, SourceError, Table};

/// Connection settings for the hosted backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`
    pub url: String,

    /// Public (anon) API key
    pub anon_key: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    10
}

/// Hosted table service client
pub struct TableClient {
    /// REST root (`{url}/rest/v1`)
    base_url: String,
    /// Anon key
    anon_key: String,
    /// HTTP client
    client: reqwest::Client,
}

impl TableClient {
    /// Create a new client
    pub fn new(url: &str, anon_key: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: format!("{}/rest/v1", url.trim_end_matches('/')),
            anon_key: anon_key.into(),
            client,
        })
    }

    /// Create from config
    pub fn from_config(config: &TableConfig) -> Result<Self, SourceError> {
        Self::new(
            &config.url,
            config.anon_key.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// Build the endpoint URL for a table
    fn table_url(&self, table: Table) -> String {
        format!("{}/{}", self.base_url, table.as_str())
    }

    /// Translate a page query into PostgREST query parameters
    fn query_params(query: &PageQuery) -> Vec<(String, String)> {
        let select = query
            .columns
            .as_ref()
            .map(|cols| cols.join(","))
            .unwrap_or_else(|| "*".to_string());
        let direction = if query.descending { "desc" } else { "asc" };

        let mut params = vec![
            ("select".to_string(), select),
            ("order".to_string(), format!("{}.{}", query.order_by, direction)),
            ("offset".to_string(), query.offset.to_string()),
            ("limit".to_string(), query.limit.to_string()),
        ];

        for (column, value) in &query.filters {
            params.push((column.clone(), format!("eq.{}", value)));
        }

        params
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }
}

/// Turn a non-2xx response into a `SourceError`
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(SourceError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl RecordSource for TableClient {
    fn name(&self) -> &str {
        "rest"
    }

    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<Value>, SourceError> {
        let url = self.table_url(query.table);
        tracing::debug!(table = %query.table, offset = query.offset, limit = query.limit, "Fetching page");

        let response = self
            .authorized(self.client.get(&url))
            .query(&Self::query_params(query))
            .send()
            .await?;

        let body: Value = check_status(response).await?.json().await?;

        match body {
            Value::Array(records) => Ok(records),
            other => Err(SourceError::Shape(format!(
                "expected an array of records from {}, got {}",
                query.table, other
            ))),
        }
    }

    async fn insert(&self, table: Table, record: Value) -> Result<(), SourceError> {
        let url = self.table_url(table);

        let response = self
            .authorized(self.client.post(&url))
            .header("Prefer", "return=minimal")
            .json(&Value::Array(vec![record]))
            .send()
            .await?;

        check_status(response).await?;
        tracing::info!(%table, "Record inserted");
        Ok(())
    }
}
