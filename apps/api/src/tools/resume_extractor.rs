//! Résumé extractor — reads the staged PDF and returns its text.
//!
//! Missing or unreadable files come back as marker-prefixed failure strings,
//! not errors: the ResumeAnalyzer classifies the text it gets back, and the
//! run must keep going either way.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::{Tool, ToolError};

/// Fixed name of the staged résumé inside a session's staging directory.
pub const RESUME_FILENAME: &str = "resume.pdf";

pub const MISSING_FILE_TEXT: &str =
    "❌ No resume file found in the staging directory. Please upload again.";
pub const UNREADABLE_FILE_TEXT: &str = "⚠️ Resume PDF is empty or unreadable.";

pub struct ResumeExtractor {
    staging_dir: PathBuf,
}

impl ResumeExtractor {
    pub fn new(staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            staging_dir: staging_dir.into(),
        }
    }
}

#[async_trait]
impl Tool for ResumeExtractor {
    fn name(&self) -> &'static str {
        "ResumeExtractor"
    }

    fn description(&self) -> &'static str {
        "Extract the content of the uploaded resume from a PDF file."
    }

    fn parameter_schema(&self) -> Value {
        // Takes no arguments; the staged file location is fixed.
        json!({"type": "object", "properties": {}, "required": []})
    }

    async fn execute(&self, _arguments: Value) -> Result<String, ToolError> {
        let path = self.staging_dir.join(RESUME_FILENAME);

        if !path.exists() {
            return Ok(MISSING_FILE_TEXT.to_string());
        }

        // pdf-extract is synchronous and panics on some malformed files;
        // spawn_blocking keeps it off the async runtime and contains both
        // failure modes as data for the analyzer to classify.
        let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path)).await;

        match extracted {
            Ok(Ok(text)) if text.trim().is_empty() => Ok(UNREADABLE_FILE_TEXT.to_string()),
            Ok(Ok(text)) => {
                debug!("extracted {} characters of resume text", text.len());
                Ok(text)
            }
            Ok(Err(e)) => Ok(format!("⚠️ Resume PDF could not be parsed: {e}")),
            Err(e) => Ok(format!("⚠️ Resume PDF could not be parsed: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_reports_failure_text() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ResumeExtractor::new(dir.path());
        let out = tool.execute(json!({})).await.unwrap();
        assert_eq!(out, MISSING_FILE_TEXT);
    }

    #[tokio::test]
    async fn test_unparsable_file_reports_failure_text() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(RESUME_FILENAME), b"not a pdf").unwrap();
        let tool = ResumeExtractor::new(dir.path());
        let out = tool.execute(json!({})).await.unwrap();
        assert!(out.starts_with("⚠️"), "unexpected output: {out}");
    }
}
