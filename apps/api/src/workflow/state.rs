//! Run State — the single value threaded through one query's execution.
//!
//! Transitions are pure: every step consumes the state and returns a new
//! one. Nothing here is shared between steps or between concurrent queries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::llm_client::ModelConfig;

/// `job_info` shorter than this is treated as "no usable job info".
/// A non-empty-result heuristic, not a validation rule.
pub const JOB_INFO_MIN_LEN: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Roles
// ────────────────────────────────────────────────────────────────────────────

/// The closed set of worker roles. Adding or removing a role is a
/// compile-time-checked change: dispatch matches exhaustively on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    ResumeAnalyzer,
    JobSearcher,
    CoverLetterGenerator,
    WebResearcher,
    ChatBot,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::ResumeAnalyzer => "ResumeAnalyzer",
            Role::JobSearcher => "JobSearcher",
            Role::CoverLetterGenerator => "CoverLetterGenerator",
            Role::WebResearcher => "WebResearcher",
            Role::ChatBot => "ChatBot",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "resumeanalyzer" => Ok(Role::ResumeAnalyzer),
            "jobsearcher" => Ok(Role::JobSearcher),
            "coverlettergenerator" => Ok(Role::CoverLetterGenerator),
            "webresearcher" => Ok(Role::WebResearcher),
            "chatbot" => Ok(Role::ChatBot),
            _ => Err(()),
        }
    }
}

/// Where control goes after the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Hand back to the Supervisor (every worker's exit).
    Supervisor,
    /// Run the named worker (the Supervisor's choice).
    Act(Role),
    /// Terminate the run.
    Finish,
}

/// Case-insensitive mapping from a role-table name. Anything unrecognized
/// terminates the run rather than dispatching into the void.
impl From<&str> for NextStep {
    fn from(name: &str) -> NextStep {
        match name.trim().to_lowercase().as_str() {
            "supervisor" => NextStep::Supervisor,
            "finish" => NextStep::Finish,
            _ => name
                .parse::<Role>()
                .map(NextStep::Act)
                .unwrap_or(NextStep::Finish),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Conversation turns
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Worker,
    Assistant,
}

/// One conversation turn, tagged with its speaker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: String,
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            speaker: "user".to_string(),
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn worker(role: Role, content: impl Into<String>) -> Self {
        Self {
            speaker: role.name().to_string(),
            role: TurnRole::Worker,
            content: content.into(),
        }
    }

    pub fn assistant(speaker: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Run state
// ────────────────────────────────────────────────────────────────────────────

/// The accumulated state of one query: conversation, extracted résumé,
/// job info, cover letter, routing bookkeeping.
#[derive(Debug, Clone)]
pub struct RunState {
    pub messages: Vec<Turn>,
    pub user_input: String,
    pub resume_text: Option<String>,
    pub resume_extraction_failed: bool,
    pub resume_extraction_error: Option<String>,
    pub job_info: Option<String>,
    pub cover_letter: Option<String>,
    pub next_step: NextStep,
    pub supervisor_count: u32,
    pub config: ModelConfig,
}

impl RunState {
    pub fn new(user_input: impl Into<String>, config: ModelConfig) -> Self {
        Self::with_history(Vec::new(), user_input, config)
    }

    /// Seeds a run from a session's persisted conversation.
    pub fn with_history(
        messages: Vec<Turn>,
        user_input: impl Into<String>,
        config: ModelConfig,
    ) -> Self {
        Self {
            messages,
            user_input: user_input.into(),
            resume_text: None,
            resume_extraction_failed: false,
            resume_extraction_error: None,
            job_info: None,
            cover_letter: None,
            next_step: NextStep::Supervisor,
            supervisor_count: 0,
            config,
        }
    }

    /// "User intent": the lowercased concatenation of every user-authored
    /// turn. Worker and assistant turns never contribute.
    pub fn user_intent(&self) -> String {
        let mut intent = String::new();
        for turn in self.messages.iter().filter(|t| t.role == TurnRole::User) {
            if !intent.is_empty() {
                intent.push(' ');
            }
            intent.push_str(&turn.content);
        }
        intent.to_lowercase()
    }

    pub fn has_resume(&self) -> bool {
        self.resume_text
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }

    pub fn has_job_info(&self) -> bool {
        self.job_info
            .as_deref()
            .is_some_and(|info| info.chars().count() > JOB_INFO_MIN_LEN)
    }

    /// Records a successful extraction. Success clears any earlier failure:
    /// at most one of {résumé present, extraction failed} ever holds.
    pub fn record_resume(&mut self, text: impl Into<String>) {
        self.resume_text = Some(text.into());
        self.resume_extraction_failed = false;
        self.resume_extraction_error = None;
    }

    /// Records a failed extraction and drops any stale résumé text.
    pub fn record_extraction_failure(&mut self, error: impl Into<String>) {
        self.resume_text = None;
        self.resume_extraction_failed = true;
        self.resume_extraction_error = Some(error.into());
    }

    pub fn push_turn(&mut self, turn: Turn) {
        self.messages.push(turn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{ModelConfig, Provider};

    fn state() -> RunState {
        RunState::new("hello", ModelConfig::for_provider(Provider::Deepseek))
    }

    #[test]
    fn test_role_parses_case_insensitively() {
        assert_eq!("resumeanalyzer".parse::<Role>(), Ok(Role::ResumeAnalyzer));
        assert_eq!("CHATBOT".parse::<Role>(), Ok(Role::ChatBot));
        assert_eq!(
            "CoverLetterGenerator".parse::<Role>(),
            Ok(Role::CoverLetterGenerator)
        );
        assert!("Supervisor".parse::<Role>().is_err());
    }

    #[test]
    fn test_next_step_from_name_defaults_unknown_to_finish() {
        assert_eq!(
            NextStep::from("JobSearcher"),
            NextStep::Act(Role::JobSearcher)
        );
        assert_eq!(NextStep::from("finish"), NextStep::Finish);
        assert_eq!(NextStep::from("FINISH"), NextStep::Finish);
        assert_eq!(NextStep::from("supervisor"), NextStep::Supervisor);
        assert_eq!(NextStep::from("unknown-role"), NextStep::Finish);
        assert_eq!(NextStep::from(""), NextStep::Finish);
    }

    #[test]
    fn test_user_intent_ignores_worker_and_assistant_turns() {
        let mut s = state();
        s.push_turn(Turn::user("Find me a Job"));
        s.push_turn(Turn::worker(Role::JobSearcher, "cover letter candidates"));
        s.push_turn(Turn::assistant("ChatBot", "research notes"));
        s.push_turn(Turn::user("thanks"));

        assert_eq!(s.user_intent(), "find me a job thanks");
    }

    #[test]
    fn test_extraction_success_and_failure_are_mutually_exclusive() {
        let mut s = state();
        s.record_extraction_failure("file not found");
        assert!(s.resume_extraction_failed);
        assert!(s.resume_text.is_none());

        s.record_resume("a".repeat(100));
        assert!(!s.resume_extraction_failed);
        assert!(s.resume_extraction_error.is_none());
        assert!(s.has_resume());
    }

    #[test]
    fn test_job_info_length_heuristic() {
        let mut s = state();
        assert!(!s.has_job_info());
        s.job_info = Some("short".to_string());
        assert!(!s.has_job_info());
        s.job_info = Some("0123456789".to_string()); // exactly 10 chars
        assert!(!s.has_job_info());
        s.job_info = Some("a definitely long enough job result".to_string());
        assert!(s.has_job_info());
    }
}
