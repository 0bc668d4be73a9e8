//! Worker Agents — the five role-specialized steps the Supervisor routes
//! between, plus the bounded tool-calling loop they share.
//!
//! The worker contract: read the state fields you depend on, append exactly
//! one turn, hand control back to the Supervisor, and turn every internal
//! failure into an error-describing turn — a run never aborts mid-graph.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use crate::llm_client::{ChatMessage, LlmClient, LlmError, ModelConfig};
use crate::tools::{Tool, ToolSet};
use crate::trace::TraceSink;
use crate::workflow::runner::Dispatch;
use crate::workflow::state::{Role, RunState, Turn, TurnRole};

pub mod prompts;

mod chatbot;
mod cover_letter;
mod job_searcher;
mod resume_analyzer;
mod web_researcher;

pub use chatbot::ChatBot;
pub use cover_letter::CoverLetterGenerator;
pub use job_searcher::JobSearcher;
pub use resume_analyzer::ResumeAnalyzer;
pub use web_researcher::WebResearcher;

/// How many tool rounds one agent invocation may take before it is forced
/// to answer with what it has.
const MAX_TOOL_ROUNDS: usize = 5;

/// Everything a worker needs besides the run state: the model client, the
/// tool adapters for this session, and the trace sink.
#[derive(Clone)]
pub struct WorkerContext {
    pub llm: Arc<LlmClient>,
    pub resume_extractor: Arc<dyn Tool>,
    pub job_search: Arc<dyn Tool>,
    pub web_search: Arc<dyn Tool>,
    pub scrape: Arc<dyn Tool>,
    pub save_letter: Arc<dyn Tool>,
    pub trace: Arc<dyn TraceSink>,
}

/// One role-specialized step.
#[async_trait]
pub trait Worker: Send + Sync {
    fn role(&self) -> Role;

    async fn run(&self, state: RunState, ctx: &WorkerContext) -> RunState;
}

/// The production dispatcher: owns the five workers and matches the closed
/// role enum exhaustively, so adding a role is a compile-time-checked change.
pub struct AgentDispatcher {
    ctx: WorkerContext,
    resume_analyzer: ResumeAnalyzer,
    job_searcher: JobSearcher,
    cover_letter_generator: CoverLetterGenerator,
    web_researcher: WebResearcher,
    chatbot: ChatBot,
}

impl AgentDispatcher {
    pub fn new(ctx: WorkerContext) -> Self {
        Self {
            ctx,
            resume_analyzer: ResumeAnalyzer,
            job_searcher: JobSearcher,
            cover_letter_generator: CoverLetterGenerator,
            web_researcher: WebResearcher,
            chatbot: ChatBot,
        }
    }
}

#[async_trait]
impl Dispatch for AgentDispatcher {
    async fn dispatch(&self, role: Role, state: RunState) -> RunState {
        match role {
            Role::ResumeAnalyzer => self.resume_analyzer.run(state, &self.ctx).await,
            Role::JobSearcher => self.job_searcher.run(state, &self.ctx).await,
            Role::CoverLetterGenerator => self.cover_letter_generator.run(state, &self.ctx).await,
            Role::WebResearcher => self.web_researcher.run(state, &self.ctx).await,
            Role::ChatBot => self.chatbot.run(state, &self.ctx).await,
        }
    }
}

/// Maps conversation turns onto chat-completions messages. Worker output is
/// relayed as named user messages so every model sees the full exchange.
fn conversation_messages(system: &str, history: &[Turn]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::system(system));
    for turn in history {
        let message = match turn.role {
            TurnRole::User => ChatMessage::user(&turn.content),
            TurnRole::Worker => ChatMessage::user_named(&turn.speaker, &turn.content),
            TurnRole::Assistant => ChatMessage::assistant(&turn.content),
        };
        messages.push(message);
    }
    messages
}

/// The tool-calling facility: sends the conversation plus tool definitions
/// to the model, executes requested tool calls against the adapters, feeds
/// the results back, and returns the first plain-text reply.
async fn run_agent(
    llm: &LlmClient,
    config: &ModelConfig,
    system: &str,
    tools: &ToolSet,
    history: &[Turn],
    trace: &dyn TraceSink,
) -> Result<String, LlmError> {
    let mut messages = conversation_messages(system, history);
    let specs = if tools.is_empty() {
        None
    } else {
        Some(tools.specs())
    };

    for _ in 0..MAX_TOOL_ROUNDS {
        let reply = llm.chat(config, &messages, specs.as_deref()).await?;

        let calls = match &reply.tool_calls {
            Some(calls) if !calls.is_empty() => calls.clone(),
            _ => return reply.content.ok_or(LlmError::EmptyContent),
        };

        messages.push(reply);
        for call in calls {
            trace.line(&format!("🔧 calling tool: {}", call.function.name));
            let arguments: Value = serde_json::from_str(&call.function.arguments)
                .unwrap_or_else(|e| {
                    warn!("malformed tool arguments from model: {e}");
                    json!({})
                });
            let result = tools.dispatch(&call.function.name, arguments).await;
            messages.push(ChatMessage::tool_result(call.id, result));
        }
    }

    // Tool rounds exhausted: force a final answer without tools.
    let reply = llm.chat(config, &messages, None).await?;
    reply.content.ok_or(LlmError::EmptyContent)
}
