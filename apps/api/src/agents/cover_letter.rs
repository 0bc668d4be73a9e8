//! CoverLetterGenerator — drafts a tailored letter from the extracted résumé
//! and the captured job info.
//!
//! Prerequisite checks here are defense-in-depth beyond the Supervisor's own
//! gating: routing bugs must degrade into explanatory turns, not panics or
//! hallucinated letters.

use async_trait::async_trait;

use crate::tools::ToolSet;
use crate::trace::TraceSink;
use crate::workflow::state::{NextStep, Role, RunState, Turn};

use super::{prompts, run_agent, Worker, WorkerContext};

pub struct CoverLetterGenerator;

#[async_trait]
impl Worker for CoverLetterGenerator {
    fn role(&self) -> Role {
        Role::CoverLetterGenerator
    }

    async fn run(&self, state: RunState, ctx: &WorkerContext) -> RunState {
        let mut state = state;
        ctx.trace.agent("CoverLetterGenerator Agent ✍️");

        let Some(resume_text) = state.resume_text.clone().filter(|t| !t.trim().is_empty())
        else {
            ctx.trace.line("❌ no resume available, cannot generate a cover letter");
            state.push_turn(Turn::worker(
                self.role(),
                "A resume is required before a cover letter can be generated. Please upload one first.",
            ));
            state.next_step = NextStep::Supervisor;
            return state;
        };

        let Some(job_info) = state.job_info.clone().filter(|j| !j.trim().is_empty()) else {
            ctx.trace.line("❌ no job info available, redirecting to the job search");
            state.push_turn(Turn::worker(
                self.role(),
                "Job information is required before a cover letter can be generated.",
            ));
            // Advisory redirect: the Supervisor re-decides, and with a
            // missing prerequisite it lands on the JobSearcher anyway.
            state.next_step = NextStep::Act(Role::JobSearcher);
            return state;
        };

        let system = prompts::generator_agent_system(&resume_text, &job_info);
        let tools = ToolSet::new(vec![ctx.save_letter.clone()]);

        // The drafting request embeds both inputs verbatim so the model
        // cannot claim they are missing.
        let mut history = state.messages.clone();
        history.push(Turn::user(format!(
            "Generate a cover letter based on the following.\n\nResume content:\n{resume_text}\n\nJob information:\n{job_info}"
        )));

        match run_agent(
            &ctx.llm,
            &state.config,
            &system,
            &tools,
            &history,
            ctx.trace.as_ref(),
        )
        .await
        {
            Ok(letter) => {
                ctx.trace.line("✅ cover letter generated");
                state.cover_letter = Some(letter.clone());
                state.push_turn(Turn::worker(self.role(), letter));
            }
            Err(e) => {
                ctx.trace.line(&format!("❌ cover letter generation failed: {e}"));
                state.push_turn(Turn::worker(
                    self.role(),
                    format!("Cover letter generation failed: {e}"),
                ));
            }
        }

        state.next_step = NextStep::Supervisor;
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::offline_ctx;
    use crate::llm_client::{ModelConfig, Provider};

    fn state() -> RunState {
        RunState::new(
            "cover letter please",
            ModelConfig::for_provider(Provider::Deepseek),
        )
    }

    #[tokio::test]
    async fn test_missing_resume_yields_explanatory_turn() {
        let out = CoverLetterGenerator.run(state(), &offline_ctx()).await;
        assert_eq!(out.next_step, NextStep::Supervisor);
        assert!(out.cover_letter.is_none());
        let turn = out.messages.last().unwrap();
        assert!(turn.content.contains("resume is required"));
    }

    #[tokio::test]
    async fn test_missing_job_info_redirects_to_job_searcher() {
        let mut s = state();
        s.record_resume("r".repeat(120));
        let out = CoverLetterGenerator.run(s, &offline_ctx()).await;
        assert_eq!(out.next_step, NextStep::Act(Role::JobSearcher));
        let turn = out.messages.last().unwrap();
        assert!(turn.content.contains("Job information is required"));
    }
}
