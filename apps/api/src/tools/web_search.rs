//! Web search — Serper-backed Google search returning ranked
//! title/link/snippet blocks.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Tool, ToolError};

const SERPER_URL: &str = "https://google.serper.dev/search";

pub const NO_RESULTS_TEXT: &str = "No search results were found for that query.";

#[derive(Clone)]
pub struct WebSearchClient {
    client: Client,
    api_key: Option<String>,
}

impl WebSearchClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }

    pub async fn search(&self, query: &str) -> Result<String, ToolError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ToolError::MissingApiKey("web search"))?;

        let response = self
            .client
            .post(SERPER_URL)
            .header("X-API-KEY", api_key)
            .json(&json!({"q": query}))
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        Ok(format_results(&body))
    }
}

/// Renders the ranked organic results as Title/Link/Snippet blocks,
/// skipping entries with missing fields.
pub fn format_results(body: &Value) -> String {
    let Some(items) = body.get("organic").and_then(|v| v.as_array()) else {
        return NO_RESULTS_TEXT.to_string();
    };

    let blocks: Vec<String> = items
        .iter()
        .filter_map(|item| {
            let title = item.get("title")?.as_str()?;
            let link = item.get("link")?.as_str()?;
            let snippet = item.get("snippet")?.as_str()?;
            Some(format!(
                "Title: {title}\nLink: {link}\nSnippet: {snippet}\n---"
            ))
        })
        .collect();

    if blocks.is_empty() {
        NO_RESULTS_TEXT.to_string()
    } else {
        blocks.join("\n")
    }
}

#[derive(Debug, Deserialize)]
struct WebSearchInput {
    query: String,
}

pub struct GoogleSearchTool {
    client: Arc<WebSearchClient>,
}

impl GoogleSearchTool {
    pub fn new(client: Arc<WebSearchClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GoogleSearchTool {
    fn name(&self) -> &'static str {
        "google_search"
    }

    fn description(&self) -> &'static str {
        "Search the web for the given query and return the search results."
    }

    fn parameter_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "Search query for web"}
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<String, ToolError> {
        let input: WebSearchInput = serde_json::from_value(arguments)?;
        self.client.search(&input.query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_results_renders_blocks() {
        let body = json!({
            "organic": [
                {"title": "Acme careers", "link": "https://acme.test/jobs", "snippet": "Open roles at Acme."},
                {"title": "Acme culture", "link": "https://acme.test/about", "snippet": "How Acme works."}
            ]
        });
        let out = format_results(&body);
        assert!(out.contains("Title: Acme careers"));
        assert!(out.contains("Link: https://acme.test/about"));
        assert_eq!(out.matches("---").count(), 2);
    }

    #[test]
    fn test_format_results_skips_malformed_entries() {
        let body = json!({
            "organic": [
                {"title": "No link or snippet"},
                {"title": "Complete", "link": "https://x.test", "snippet": "ok"}
            ]
        });
        let out = format_results(&body);
        assert!(!out.contains("No link or snippet"));
        assert!(out.contains("Complete"));
    }

    #[test]
    fn test_format_results_without_organic_section() {
        assert_eq!(format_results(&json!({})), NO_RESULTS_TEXT);
    }
}
