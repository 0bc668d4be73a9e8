//! Page scrape — Firecrawl-backed page-to-markdown extraction.
//!
//! Any failure is reported as `Failed to scrape <url>`: scrape targets are
//! model-chosen and frequently unreachable, and the research agent should
//! carry on with what it has.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::{Tool, ToolError};

const FIRECRAWL_URL: &str = "https://api.firecrawl.dev/v1/scrape";

#[derive(Clone)]
pub struct ScrapeClient {
    client: Client,
    api_key: Option<String>,
}

impl ScrapeClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }

    pub async fn scrape(&self, url: &str) -> Result<String, ToolError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ToolError::MissingApiKey("page scrape"))?;

        let response = self
            .client
            .post(FIRECRAWL_URL)
            .bearer_auth(api_key)
            .json(&json!({"url": url, "formats": ["markdown"]}))
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        body.get("data")
            .and_then(|d| d.get("markdown"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .ok_or_else(|| ToolError::Failed(format!("no content returned for {url}")))
    }
}

#[derive(Debug, Deserialize)]
struct ScrapeInput {
    url: String,
}

pub struct ScrapeWebsiteTool {
    client: Arc<ScrapeClient>,
}

impl ScrapeWebsiteTool {
    pub fn new(client: Arc<ScrapeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ScrapeWebsiteTool {
    fn name(&self) -> &'static str {
        "scrape_website"
    }

    fn description(&self) -> &'static str {
        "Scrape the content of a website and return the text."
    }

    fn parameter_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {"type": "string", "description": "Url to be scraped"}
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<String, ToolError> {
        let input: ScrapeInput = serde_json::from_value(arguments)?;
        match self.client.scrape(&input.url).await {
            Ok(content) => Ok(content),
            Err(e) => {
                warn!("scrape of {} failed: {e}", input.url);
                Ok(format!("Failed to scrape {}", input.url))
            }
        }
    }
}
