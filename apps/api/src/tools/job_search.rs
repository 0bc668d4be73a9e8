//! Job search — queries a hosted job-board aggregation API (JSearch-style)
//! and renders the postings as a markdown table.
//!
//! The search parameters mirror what the workers collect from the user:
//! keywords, location, employment types, remote/onsite/hybrid, experience
//! levels, recency window, and distance.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{Tool, ToolError};

const JSEARCH_URL: &str = "https://jsearch.p.rapidapi.com/search";
const JSEARCH_HOST: &str = "jsearch.p.rapidapi.com";

/// Stored nowhere: a run with no usable postings leaves `job_info` unset.
pub const NO_RESULTS_TEXT: &str = "No matching job listings were found.";

const SUMMARY_MAX_CHARS: usize = 300;

fn default_limit() -> usize {
    5
}

fn default_listed_at() -> u64 {
    86_400 // last 24 hours
}

fn default_distance() -> u32 {
    25 // miles
}

/// Structured job query, deserialized from the model's tool-call arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSearchInput {
    pub keywords: String,
    #[serde(default)]
    pub location_name: Option<String>,
    /// "full-time", "contract", "part-time", "temporary", "internship", ...
    #[serde(default)]
    pub employment_type: Option<Vec<String>>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// "onsite", "remote", "hybrid"
    #[serde(default)]
    pub job_type: Option<Vec<String>>,
    /// "internship", "entry-level", "associate", "mid-senior-level", ...
    #[serde(default)]
    pub experience: Option<Vec<String>>,
    /// Maximum seconds since the job was posted.
    #[serde(default = "default_listed_at")]
    pub listed_at: u64,
    /// Maximum distance from the location, in miles.
    #[serde(default = "default_distance")]
    pub distance: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub summary: Option<String>,
    pub apply_url: Option<String>,
    pub pay_range: Option<String>,
    pub posted_at: Option<String>,
}

#[derive(Clone)]
pub struct JobSearchClient {
    client: Client,
    api_key: Option<String>,
}

impl JobSearchClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }

    pub async fn search(&self, input: &JobSearchInput) -> Result<Vec<JobPosting>, ToolError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ToolError::MissingApiKey("job search"))?;

        let query = match &input.location_name {
            Some(location) => format!("{} in {}", input.keywords, location),
            None => input.keywords.clone(),
        };

        let mut params: Vec<(&str, String)> = vec![
            ("query", query),
            ("num_pages", "1".to_string()),
            ("date_posted", date_posted_window(input.listed_at).to_string()),
            ("radius", input.distance.to_string()),
        ];
        if let Some(types) = employment_types_param(input.employment_type.as_deref()) {
            params.push(("employment_types", types));
        }
        if wants_remote_only(input.job_type.as_deref()) {
            params.push(("remote_jobs_only", "true".to_string()));
        }
        if let Some(reqs) = experience_param(input.experience.as_deref()) {
            params.push(("job_requirements", reqs));
        }

        let response = self
            .client
            .get(JSEARCH_URL)
            .header("X-RapidAPI-Key", api_key)
            .header("X-RapidAPI-Host", JSEARCH_HOST)
            .query(&params)
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        let postings = parse_postings(&body, input.limit);
        debug!("job search returned {} postings", postings.len());
        Ok(postings)
    }
}

/// Maps a seconds-based recency window onto the API's posting-date buckets.
fn date_posted_window(listed_at_secs: u64) -> &'static str {
    match listed_at_secs {
        0..=86_400 => "today",
        86_401..=259_200 => "3days",
        259_201..=604_800 => "week",
        _ => "month",
    }
}

fn employment_types_param(types: Option<&[String]>) -> Option<String> {
    let mapped: Vec<&str> = types?
        .iter()
        .filter_map(|t| match t.to_lowercase().as_str() {
            "full-time" => Some("FULLTIME"),
            "part-time" => Some("PARTTIME"),
            "contract" | "temporary" => Some("CONTRACTOR"),
            "internship" => Some("INTERN"),
            _ => None,
        })
        .collect();
    if mapped.is_empty() {
        None
    } else {
        Some(mapped.join(","))
    }
}

fn wants_remote_only(job_type: Option<&[String]>) -> bool {
    let Some(kinds) = job_type else { return false };
    // "remote" alone means remote-only; mixed lists keep onsite results too.
    kinds.len() == 1 && kinds[0].eq_ignore_ascii_case("remote")
}

fn experience_param(levels: Option<&[String]>) -> Option<String> {
    let mut mapped: Vec<&str> = levels?
        .iter()
        .filter_map(|l| match l.to_lowercase().as_str() {
            "internship" | "entry-level" => Some("no_experience"),
            "associate" => Some("under_3_years_experience"),
            "mid-senior-level" | "director" | "executive" => Some("more_than_3_years_experience"),
            _ => None,
        })
        .collect();
    mapped.dedup();
    if mapped.is_empty() {
        None
    } else {
        Some(mapped.join(","))
    }
}

/// Pulls the fields we render out of the provider's response envelope.
pub fn parse_postings(body: &Value, limit: usize) -> Vec<JobPosting> {
    let Some(items) = body.get("data").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    items
        .iter()
        .take(limit)
        .filter_map(|item| {
            let title = item.get("job_title")?.as_str()?.to_string();
            let company = item.get("employer_name")?.as_str()?.to_string();
            let location = [
                item.get("job_city").and_then(|v| v.as_str()),
                item.get("job_country").and_then(|v| v.as_str()),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");

            Some(JobPosting {
                title,
                company,
                location,
                summary: item
                    .get("job_description")
                    .and_then(|v| v.as_str())
                    .map(|d| truncate_chars(d, SUMMARY_MAX_CHARS)),
                apply_url: item
                    .get("job_apply_link")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                pay_range: pay_range(item),
                posted_at: item
                    .get("job_posted_at_datetime_utc")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
            })
        })
        .collect()
}

fn pay_range(item: &Value) -> Option<String> {
    let min = item.get("job_min_salary").and_then(|v| v.as_f64())?;
    let max = item.get("job_max_salary").and_then(|v| v.as_f64())?;
    let currency = item
        .get("job_salary_currency")
        .and_then(|v| v.as_str())
        .unwrap_or("USD");
    Some(format!("{currency} {min:.0}-{max:.0}"))
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_chars).collect();
    format!("{cut}…")
}

/// Renders postings as the markdown table the search agent promises the user.
pub fn format_postings(postings: &[JobPosting]) -> String {
    if postings.is_empty() {
        return NO_RESULTS_TEXT.to_string();
    }

    let mut table = String::from(
        "| Job Title | Company | Location | Job Role (Summary) | Apply URL | Pay Range | Posted |\n\
         |---|---|---|---|---|---|---|\n",
    );
    for posting in postings {
        table.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            cell(&posting.title),
            cell(&posting.company),
            cell(&posting.location),
            cell(posting.summary.as_deref().unwrap_or("-")),
            cell(posting.apply_url.as_deref().unwrap_or("-")),
            cell(posting.pay_range.as_deref().unwrap_or("-")),
            cell(posting.posted_at.as_deref().unwrap_or("-")),
        ));
    }
    table
}

/// Markdown table cells cannot contain pipes or newlines.
fn cell(text: &str) -> String {
    text.replace('|', "/").replace(['\n', '\r'], " ")
}

pub struct JobSearchTool {
    client: Arc<JobSearchClient>,
}

impl JobSearchTool {
    pub fn new(client: Arc<JobSearchClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for JobSearchTool {
    fn name(&self) -> &'static str {
        "JobSearchTool"
    }

    fn description(&self) -> &'static str {
        "Search for job postings based on specified criteria. Returns detailed job listings."
    }

    fn parameter_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "keywords": {
                    "type": "string",
                    "description": "Keywords describing the job role. If the user is looking for a role at a particular company, include the company in the keywords."
                },
                "location_name": {
                    "type": "string",
                    "description": "Name of the location to search within. Example: \"Kyiv City, Ukraine\"."
                },
                "employment_type": {
                    "type": "array",
                    "items": {"type": "string", "enum": ["full-time", "contract", "part-time", "temporary", "internship", "volunteer", "other"]},
                    "description": "Specific type(s) of job to search for."
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of jobs to retrieve.",
                    "default": 5
                },
                "job_type": {
                    "type": "array",
                    "items": {"type": "string", "enum": ["onsite", "remote", "hybrid"]},
                    "description": "Filter for remote, onsite or hybrid jobs."
                },
                "experience": {
                    "type": "array",
                    "items": {"type": "string", "enum": ["internship", "entry-level", "associate", "mid-senior-level", "director", "executive"]},
                    "description": "Filter by experience levels."
                },
                "listed_at": {
                    "type": "integer",
                    "description": "Maximum number of seconds since the job was posted. 86400 filters postings from the last 24 hours.",
                    "default": 86400
                },
                "distance": {
                    "type": "integer",
                    "description": "Maximum distance from the location in miles.",
                    "default": 25
                }
            },
            "required": ["keywords"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<String, ToolError> {
        let input: JobSearchInput = serde_json::from_value(arguments)?;
        let postings = self.client.search(&input).await?;
        Ok(format_postings(&postings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_body() -> Value {
        json!({
            "data": [
                {
                    "job_title": "Senior Rust Engineer",
                    "employer_name": "Acme",
                    "job_city": "Berlin",
                    "job_country": "DE",
                    "job_description": "Build storage engines in Rust.",
                    "job_apply_link": "https://acme.test/apply",
                    "job_min_salary": 90000.0,
                    "job_max_salary": 120000.0,
                    "job_salary_currency": "EUR",
                    "job_posted_at_datetime_utc": "2026-08-01T00:00:00Z"
                },
                {
                    "job_title": "Backend Engineer",
                    "employer_name": "Weyland",
                    "job_city": "Remote",
                    "job_country": "US"
                }
            ]
        })
    }

    #[test]
    fn test_parse_postings_maps_fields_and_honors_limit() {
        let postings = parse_postings(&sample_body(), 5);
        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].title, "Senior Rust Engineer");
        assert_eq!(postings[0].location, "Berlin, DE");
        assert_eq!(postings[0].pay_range.as_deref(), Some("EUR 90000-120000"));
        assert!(postings[1].apply_url.is_none());

        assert_eq!(parse_postings(&sample_body(), 1).len(), 1);
    }

    #[test]
    fn test_format_postings_renders_markdown_table() {
        let table = format_postings(&parse_postings(&sample_body(), 5));
        assert!(table.starts_with("| Job Title | Company |"));
        assert!(table.contains("| Senior Rust Engineer | Acme | Berlin, DE |"));
        assert!(table.contains("https://acme.test/apply"));
    }

    #[test]
    fn test_format_postings_empty_is_no_results_text() {
        assert_eq!(format_postings(&[]), NO_RESULTS_TEXT);
    }

    #[test]
    fn test_input_defaults() {
        let input: JobSearchInput =
            serde_json::from_value(json!({"keywords": "rust engineer"})).unwrap();
        assert_eq!(input.limit, 5);
        assert_eq!(input.listed_at, 86_400);
        assert_eq!(input.distance, 25);
        assert!(input.location_name.is_none());
    }

    #[test]
    fn test_date_posted_window_buckets() {
        assert_eq!(date_posted_window(3600), "today");
        assert_eq!(date_posted_window(86_400), "today");
        assert_eq!(date_posted_window(172_800), "3days");
        assert_eq!(date_posted_window(604_800), "week");
        assert_eq!(date_posted_window(2_592_000), "month");
    }

    #[test]
    fn test_employment_and_experience_mapping() {
        let types = vec!["full-time".to_string(), "internship".to_string()];
        assert_eq!(
            employment_types_param(Some(types.as_slice())).as_deref(),
            Some("FULLTIME,INTERN")
        );
        let empty: Vec<String> = Vec::new();
        assert_eq!(employment_types_param(Some(empty.as_slice())), None);

        let levels = vec!["entry-level".to_string(), "director".to_string()];
        assert_eq!(
            experience_param(Some(levels.as_slice())).as_deref(),
            Some("no_experience,more_than_3_years_experience")
        );
    }

    #[test]
    fn test_remote_only_detection() {
        let remote = vec!["remote".to_string()];
        let mixed = vec!["remote".to_string(), "onsite".to_string()];
        assert!(wants_remote_only(Some(remote.as_slice())));
        assert!(!wants_remote_only(Some(mixed.as_slice())));
        assert!(!wants_remote_only(None));
    }

    #[test]
    fn test_cell_escapes_pipes_and_newlines() {
        assert_eq!(cell("a|b\nc"), "a/b c");
    }
}
