//! PostgREST client for the hosted table store
//!
//! Speaks the REST dialect exposed by hosted Postgres backends:
//! `{base}/rest/v1/{table}` with `col=eq.value` filters.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use super::query::encode_params;
use super::{Filter, GatewayError, GatewayResult, SelectQuery, TableGateway};
use crate::core::config::GatewayConfig;

/// Error body returned by PostgREST
#[derive(Debug, Deserialize)]
struct RestErrorResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

pub struct RestGateway {
    http_client: Client,
    base_url: String,
}

impl std::fmt::Debug for RestGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestGateway")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl RestGateway {
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| GatewayError::Transport(format!("Invalid API key header: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| GatewayError::Transport(format!("Invalid API key header: {}", e)))?;
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let http_client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
        })
    }

    fn table_url(&self, table: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}/{}", self.base_url, table)
        } else {
            format!("{}/{}?{}", self.base_url, table, query)
        }
    }

    fn filter_query(filters: &[Filter]) -> String {
        let params: Vec<(String, String)> = filters.iter().map(Filter::to_param).collect();
        encode_params(&params)
    }

    async fn send(request: RequestBuilder, table: &str) -> GatewayResult<Response> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Request to table '{}' failed: {}", table, e);
            GatewayError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<RestErrorResponse>(&body) {
            Ok(err) if !err.message.is_empty() => {
                tracing::debug!(
                    "Gateway error on '{}': code={:?} details={:?}",
                    table,
                    err.code,
                    err.details
                );
                err.message
            }
            _ if !body.is_empty() => body,
            _ => format!("HTTP {}", status),
        };

        tracing::error!("Gateway error on '{}': HTTP {} - {}", table, status, message);
        Err(GatewayError::Remote {
            status: status.as_u16(),
            message,
        })
    }

    async fn rows(response: Response) -> GatewayResult<Vec<Value>> {
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Value>(&body)
            .map_err(|e| GatewayError::Parse(e.to_string()))?
        {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(Vec::new()),
            single => Ok(vec![single]),
        }
    }
}

#[async_trait]
impl TableGateway for RestGateway {
    async fn select(&self, table: &str, query: &SelectQuery) -> GatewayResult<Vec<Value>> {
        let url = self.table_url(table, &query.to_query_string());
        tracing::debug!("select {}", url);

        let response = Self::send(self.http_client.get(&url), table).await?;
        Self::rows(response).await
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> GatewayResult<Vec<Value>> {
        let url = self.table_url(table, "");
        tracing::debug!("insert {} row(s) into {}", rows.len(), table);

        let request = self
            .http_client
            .post(&url)
            .header("Prefer", "return=representation")
            .json(&rows);

        let response = Self::send(request, table).await?;
        Self::rows(response).await
    }

    async fn update(
        &self,
        table: &str,
        patch: Value,
        filters: &[Filter],
    ) -> GatewayResult<Vec<Value>> {
        let url = self.table_url(table, &Self::filter_query(filters));
        tracing::debug!("update {}", url);

        let request = self
            .http_client
            .patch(&url)
            .header("Prefer", "return=representation")
            .json(&patch);

        let response = Self::send(request, table).await?;
        Self::rows(response).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> GatewayResult<()> {
        // PostgREST refuses unfiltered deletes; refuse them here too
        if filters.is_empty() {
            return Err(GatewayError::Transport(format!(
                "Refusing to delete from '{}' without a filter",
                table
            )));
        }

        let url = self.table_url(table, &Self::filter_query(filters));
        tracing::debug!("delete {}", url);

        Self::send(self.http_client.delete(&url), table).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> GatewayConfig {
        GatewayConfig {
            url: "https://example.supabase.co/".to_string(),
            api_key: "anon-key".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_table_url_building() {
        let gateway = RestGateway::new(&config()).unwrap();
        assert_eq!(
            gateway.table_url("prompts", ""),
            "https://example.supabase.co/rest/v1/prompts"
        );
        assert_eq!(
            gateway.table_url("prompts", "select=%2A"),
            "https://example.supabase.co/rest/v1/prompts?select=%2A"
        );
    }

    #[test]
    fn test_filter_query_encoding() {
        let filters = vec![Filter::eq("id", "a b")];
        assert_eq!(RestGateway::filter_query(&filters), "id=eq.a%20b");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let gateway = RestGateway::new(&config()).unwrap();
        let debug = format!("{:?}", gateway);
        assert!(!debug.contains("anon-key"));
    }

    #[tokio::test]
    async fn test_unfiltered_delete_is_refused() {
        let gateway = RestGateway::new(&config()).unwrap();
        let result = gateway.delete("prompts", &[]).await;
        assert!(matches!(result, Err(GatewayError::Transport(_))));
    }
}
