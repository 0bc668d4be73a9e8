//! JobSearcher — runs the job-board query through the model and captures a
//! usable result into `job_info`.

use async_trait::async_trait;

use crate::tools::job_search::NO_RESULTS_TEXT;
use crate::tools::ToolSet;
use crate::trace::TraceSink;
use crate::workflow::state::{NextStep, Role, RunState, Turn};

use super::{prompts, run_agent, Worker, WorkerContext};

pub struct JobSearcher;

#[async_trait]
impl Worker for JobSearcher {
    fn role(&self) -> Role {
        Role::JobSearcher
    }

    async fn run(&self, state: RunState, ctx: &WorkerContext) -> RunState {
        let mut state = state;
        ctx.trace.agent("JobSearcher Agent 💼");

        let tools = ToolSet::new(vec![ctx.job_search.clone()]);
        let system = prompts::search_agent_system();

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
            Ok(output) => {
                if found_listings(&output) {
                    // Only successful results are stored: `job_info` is the
                    // cover-letter prerequisite, and a "nothing found" text
                    // must not satisfy it.
                    state.job_info = Some(output.clone());
                    ctx.trace.line("✅ job listings captured into run state");
                } else {
                    ctx.trace.line("❌ no matching job listings found");
                }
                state.push_turn(Turn::worker(self.role(), output));
            }
            Err(e) => {
                ctx.trace.line(&format!("❌ job search failed: {e}"));
                state.push_turn(Turn::worker(self.role(), format!("Job search failed: {e}")));
            }
        }

        state.next_step = NextStep::Supervisor;
        state
    }
}

/// Did the agent come back with listings rather than a no-results report?
fn found_listings(output: &str) -> bool {
    let trimmed = output.trim();
    if trimmed.is_empty() || trimmed.contains(NO_RESULTS_TEXT) {
        return false;
    }
    let lowered = trimmed.to_lowercase();
    !(lowered.contains("no matching job") || lowered.contains("no job listings"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_listings_accepts_markdown_table() {
        let table = "| Job Title | Company |\n|---|---|\n| Rust Engineer | Acme |";
        assert!(found_listings(table));
    }

    #[test]
    fn test_found_listings_rejects_no_results_reports() {
        assert!(!found_listings(""));
        assert!(!found_listings("   "));
        assert!(!found_listings(NO_RESULTS_TEXT));
        assert!(!found_listings(
            "I searched three times but there were no job listings for that query."
        ));
    }
}
