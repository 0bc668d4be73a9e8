//! ResumeAnalyzer — extracts the staged résumé through the extractor tool
//! and classifies its own result before trusting it.

use async_trait::async_trait;

use crate::llm_client::strip_json_fences;
use crate::tools::ToolSet;
use crate::trace::TraceSink;
use crate::workflow::state::{NextStep, Role, RunState, Turn};

use super::{prompts, run_agent, Worker, WorkerContext};

/// Extractions shorter than this are treated as failures: real résumés are
/// never this short, truncated tool errors frequently are.
const MIN_RESUME_CHARS: usize = 50;

/// Substrings that mark an extraction result as a failure report.
const FAILURE_MARKERS: &[&str] = &["❌", "⚠️", "failed", "not found"];

pub struct ResumeAnalyzer;

#[async_trait]
impl Worker for ResumeAnalyzer {
    fn role(&self) -> Role {
        Role::ResumeAnalyzer
    }

    async fn run(&self, state: RunState, ctx: &WorkerContext) -> RunState {
        let mut state = state;
        ctx.trace.agent("ResumeAnalyzer Agent 📄");

        let tools = ToolSet::new(vec![ctx.resume_extractor.clone()]);
        let system = prompts::analyzer_agent_system();

        match run_agent(
            &ctx.llm,
            &state.config,
            &system,
            &tools,
            &state.messages,
            ctx.trace.as_ref(),
        )
        .await
        {
            Ok(raw) => {
                let text = extract_resume_text(&raw);
                if extraction_succeeded(&text) {
                    let chars = text.chars().count();
                    ctx.trace
                        .line(&format!("✅ resume extracted ({chars} characters)"));
                    state.record_resume(text);
                    state.push_turn(Turn::worker(
                        self.role(),
                        format!("Resume extracted successfully: {chars} characters."),
                    ));
                } else {
                    ctx.trace.line(&format!("❌ resume extraction failed: {text}"));
                    state.push_turn(Turn::worker(
                        self.role(),
                        format!("Resume extraction failed: {text}"),
                    ));
                    state.record_extraction_failure(text);
                }
            }
            Err(e) => {
                ctx.trace.line(&format!("❌ resume extraction failed: {e}"));
                state.push_turn(Turn::worker(
                    self.role(),
                    format!("Resume extraction failed: {e}"),
                ));
                state.record_extraction_failure(e.to_string());
            }
        }

        state.next_step = NextStep::Supervisor;
        state
    }
}

/// The analyzer prompt asks for `{"resume_text": …}`; models occasionally
/// reply with fenced JSON or plain text instead. Accept all three.
fn extract_resume_text(raw: &str) -> String {
    let stripped = strip_json_fences(raw);
    serde_json::from_str::<serde_json::Value>(stripped)
        .ok()
        .and_then(|v| {
            v.get("resume_text")
                .and_then(|t| t.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| raw.trim().to_string())
}

/// A result counts as a successful extraction only if it is free of failure
/// markers and long enough to plausibly be a résumé.
fn extraction_succeeded(text: &str) -> bool {
    let lowered = text.to_lowercase();
    if FAILURE_MARKERS.iter().any(|m| lowered.contains(m)) {
        return false;
    }
    text.trim().chars().count() > MIN_RESUME_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_resume_text_from_json_reply() {
        let raw = r#"{"resume_text": "Jane Doe, engineer"}"#;
        assert_eq!(extract_resume_text(raw), "Jane Doe, engineer");

        let fenced = "```json\n{\"resume_text\": \"Jane Doe\"}\n```";
        assert_eq!(extract_resume_text(fenced), "Jane Doe");
    }

    #[test]
    fn test_extract_resume_text_falls_back_to_raw_string() {
        assert_eq!(extract_resume_text("  plain text resume  "), "plain text resume");
    }

    #[test]
    fn test_short_results_are_failures() {
        assert!(!extraction_succeeded("too short"));
        assert!(extraction_succeeded(&"long enough resume body ".repeat(10)));
    }

    #[test]
    fn test_marker_results_are_failures_even_when_long() {
        let text = format!("❌ Failed to extract resume. {}", "padding ".repeat(30));
        assert!(!extraction_succeeded(&text));
        let text = format!("The file was NOT FOUND anywhere. {}", "padding ".repeat(30));
        assert!(!extraction_succeeded(&text));
    }
}
