//! Supervisor — the rule-based router at the center of the workflow.
//!
//! A pure transition: `RunState` in, `RunState` out with `next_step` chosen
//! and `supervisor_count` incremented. It never calls a model or a tool.
//! Rule order encodes the prerequisite chain résumé → job info → cover
//! letter, resolved greedily by the cheapest missing prerequisite.

use crate::trace::TraceSink;
use crate::workflow::intent::{Intent, IntentClassifier};
use crate::workflow::state::{NextStep, Role, RunState, Turn};

/// The Supervisor refuses to run more than this many times per query.
/// Deliberately redundant with [`crate::workflow::runner::MAX_RUN_STEPS`]:
/// this one breaks routing ping-pong, the ceiling backs up defective logic.
pub const SUPERVISOR_LOOP_LIMIT: u32 = 2;

/// Decides the next step for the run. First matching rule wins:
///
/// 1. loop protection — too many passes, finish unconditionally;
/// 2. cover-letter intent without a résumé (and no failed extraction) —
///    extract the résumé first;
/// 3. extraction previously failed — let the ChatBot tell the user;
/// 4. résumé present — cover letter if job info is usable, otherwise the
///    missing prerequisite (job search), then plain job search, research,
///    or chat;
/// 5. nothing else applies — chat.
pub fn supervise(
    state: RunState,
    classifier: &dyn IntentClassifier,
    trace: &dyn TraceSink,
) -> RunState {
    let mut state = state;
    state.supervisor_count += 1;

    if state.supervisor_count > SUPERVISOR_LOOP_LIMIT {
        trace.line("supervisor: possible loop detected, finishing the run");
        state.next_step = NextStep::Finish;
        return state;
    }

    // First pass of a fresh query: seed the conversation with the user turn.
    if state.messages.is_empty() && !state.user_input.is_empty() {
        let turn = Turn::user(state.user_input.clone());
        state.messages.push(turn);
    }

    trace.line(&format!(
        "supervisor: pass {} — messages={}, resume={}, extraction_failed={}, job_info={}",
        state.supervisor_count,
        state.messages.len(),
        state.has_resume(),
        state.resume_extraction_failed,
        state.has_job_info(),
    ));

    let intent_text = state.user_intent();
    let wants_letter = classifier.detect(&intent_text, Intent::CoverLetter);

    if !state.has_resume() && !state.resume_extraction_failed && wants_letter {
        trace.line("supervisor: cover letter requested without a resume, extracting it first");
        state.next_step = NextStep::Act(Role::ResumeAnalyzer);
        return state;
    }

    if state.resume_extraction_failed {
        let error = state
            .resume_extraction_error
            .as_deref()
            .unwrap_or("unknown error");
        trace.line(&format!(
            "supervisor: resume extraction failed ({error}), handing off to the chatbot"
        ));
        state.next_step = NextStep::Act(Role::ChatBot);
        return state;
    }

    if state.has_resume() {
        let next = if wants_letter {
            if state.has_job_info() {
                trace.line("supervisor: resume and job info available, generating the cover letter");
                Role::CoverLetterGenerator
            } else {
                trace.line("supervisor: cover letter requested but job info is missing, searching first");
                Role::JobSearcher
            }
        } else if classifier.detect(&intent_text, Intent::JobSearch) {
            Role::JobSearcher
        } else if classifier.detect(&intent_text, Intent::Research) {
            Role::WebResearcher
        } else {
            Role::ChatBot
        };
        state.next_step = NextStep::Act(next);
        return state;
    }

    // No résumé and no cover-letter intent: default to chat.
    state.next_step = NextStep::Act(Role::ChatBot);
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{ModelConfig, Provider};
    use crate::trace::NullTrace;
    use crate::workflow::intent::KeywordClassifier;

    fn state_with_input(input: &str) -> RunState {
        RunState::new(input, ModelConfig::for_provider(Provider::Deepseek))
    }

    fn route(state: RunState) -> RunState {
        supervise(state, &KeywordClassifier, &NullTrace)
    }

    fn resume() -> String {
        "Jane Doe — ten years of distributed systems engineering, \
         comfortable across Rust, Go, and large-scale storage."
            .to_string()
    }

    #[test]
    fn test_loop_breaker_overrides_everything() {
        let mut s = state_with_input("Generate a cover letter for my resume.");
        s.record_resume(resume());
        s.job_info = Some("x".repeat(200));
        s.supervisor_count = SUPERVISOR_LOOP_LIMIT; // increment pushes it over

        let s = route(s);
        assert_eq!(s.next_step, NextStep::Finish);
        assert_eq!(s.supervisor_count, SUPERVISOR_LOOP_LIMIT + 1);
    }

    #[test]
    fn test_cover_letter_intent_without_resume_extracts_first() {
        let s = route(state_with_input("Please write a cover letter for me"));
        assert_eq!(s.next_step, NextStep::Act(Role::ResumeAnalyzer));
    }

    #[test]
    fn test_extraction_failure_routes_to_chatbot_regardless_of_intent() {
        let mut s = state_with_input("Please write a cover letter for me");
        s.record_extraction_failure("file not found");
        let s = route(s);
        assert_eq!(s.next_step, NextStep::Act(Role::ChatBot));
    }

    #[test]
    fn test_letter_intent_with_short_job_info_searches_jobs() {
        let mut s = state_with_input("Now the cover letter please");
        s.record_resume(resume());
        s.job_info = Some("0123456789".to_string()); // ≤ 10 chars: not usable
        let s = route(s);
        assert_eq!(s.next_step, NextStep::Act(Role::JobSearcher));
    }

    #[test]
    fn test_letter_intent_with_job_info_generates_letter() {
        let mut s = state_with_input("Now the cover letter please");
        s.record_resume(resume());
        s.job_info = Some("Senior Rust Engineer at Acme, Berlin".to_string());
        let s = route(s);
        assert_eq!(s.next_step, NextStep::Act(Role::CoverLetterGenerator));
    }

    #[test]
    fn test_job_keyword_with_resume_routes_to_job_searcher() {
        let mut s = state_with_input("find me a job in Berlin");
        s.record_resume(resume());
        let s = route(s);
        assert_eq!(s.next_step, NextStep::Act(Role::JobSearcher));
    }

    #[test]
    fn test_research_keyword_with_resume_routes_to_web_researcher() {
        // "调研" avoids the job-search keyword "search" hiding inside
        // the English word "research".
        let mut s = state_with_input("请帮我调研 Acme 的企业文化");
        s.record_resume(resume());
        let s = route(s);
        assert_eq!(s.next_step, NextStep::Act(Role::WebResearcher));
    }

    #[test]
    fn test_default_is_chatbot_and_repeat_passes_agree() {
        let mut s = state_with_input("summarize my background for me");
        s.record_resume(resume());

        let s = route(s);
        assert_eq!(s.next_step, NextStep::Act(Role::ChatBot));

        // Idempotence aside from the counter: same state, same decision.
        let s = route(s);
        assert_eq!(s.next_step, NextStep::Act(Role::ChatBot));
        assert_eq!(s.supervisor_count, 2);
    }

    #[test]
    fn test_no_resume_and_no_letter_intent_is_chatbot() {
        let s = route(state_with_input("hello there"));
        assert_eq!(s.next_step, NextStep::Act(Role::ChatBot));
    }

    #[test]
    fn test_first_pass_seeds_conversation_with_user_turn() {
        let s = route(state_with_input("hello there"));
        assert_eq!(s.messages.len(), 1);
        assert_eq!(s.messages[0].content, "hello there");
    }

    #[test]
    fn test_prerequisite_chain_for_cover_letter_request() {
        // The end-to-end routing ladder: resume → job info → letter.
        let s = route(state_with_input("Generate a cover letter for my resume."));
        assert_eq!(s.next_step, NextStep::Act(Role::ResumeAnalyzer));

        // Extraction succeeded; counter reset models a fresh follow-up query.
        let mut s = s;
        s.record_resume(resume());
        s.supervisor_count = 0;
        let s = route(s);
        assert_eq!(s.next_step, NextStep::Act(Role::JobSearcher));

        let mut s = s;
        s.job_info = Some("y".repeat(200));
        s.supervisor_count = 0;
        let s = route(s);
        assert_eq!(s.next_step, NextStep::Act(Role::CoverLetterGenerator));
    }
}
