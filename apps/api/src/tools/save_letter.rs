//! Cover-letter persist — writes the generated letter into the session's
//! staging directory and returns a download path.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::{Tool, ToolError};

pub struct SaveCoverLetter {
    staging_dir: PathBuf,
}

impl SaveCoverLetter {
    pub fn new(staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            staging_dir: staging_dir.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SaveLetterInput {
    cover_letter_content: String,
    company_name: String,
}

#[async_trait]
impl Tool for SaveCoverLetter {
    fn name(&self) -> &'static str {
        "save_cover_letter"
    }

    fn description(&self) -> &'static str {
        "Save the generated cover letter for a specific company and return a download link."
    }

    fn parameter_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "cover_letter_content": {
                    "type": "string",
                    "description": "The full cover letter text to persist"
                },
                "company_name": {
                    "type": "string",
                    "description": "Company the letter is addressed to; used in the file name"
                }
            },
            "required": ["cover_letter_content", "company_name"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<String, ToolError> {
        let input: SaveLetterInput = serde_json::from_value(arguments)?;

        let filename = format!(
            "{}_cover_letter.md",
            sanitize_file_stem(&input.company_name)
        );
        let path = self.staging_dir.join(filename);

        tokio::fs::create_dir_all(&self.staging_dir).await?;
        tokio::fs::write(&path, input.cover_letter_content.as_bytes()).await?;

        let abs_path = path.canonicalize()?;
        info!("cover letter saved to {}", abs_path.display());
        Ok(format!("Here is the download link: {}", abs_path.display()))
    }
}

/// Keeps company names safe to use as a file stem.
fn sanitize_file_stem(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "company".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("Acme Corp."), "Acme_Corp_");
        assert_eq!(sanitize_file_stem("  "), "company");
        assert_eq!(sanitize_file_stem("weyland-yutani"), "weyland-yutani");
    }

    #[tokio::test]
    async fn test_save_writes_artifact_and_returns_path() {
        let dir = tempfile::tempdir().unwrap();
        let tool = SaveCoverLetter::new(dir.path());
        let out = tool
            .execute(json!({
                "cover_letter_content": "Dear Hiring Manager,",
                "company_name": "Acme"
            }))
            .await
            .unwrap();

        assert!(out.starts_with("Here is the download link:"));
        let saved = std::fs::read_to_string(dir.path().join("Acme_cover_letter.md")).unwrap();
        assert_eq!(saved, "Dear Hiring Manager,");
    }
}
