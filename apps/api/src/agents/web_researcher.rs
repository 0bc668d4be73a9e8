//! WebResearcher — answers research requests with the web-search and
//! page-scrape tools.

use async_trait::async_trait;

use crate::tools::ToolSet;
use crate::trace::TraceSink;
use crate::workflow::state::{NextStep, Role, RunState, Turn};

use super::{prompts, run_agent, Worker, WorkerContext};

pub struct WebResearcher;

#[async_trait]
impl Worker for WebResearcher {
    fn role(&self) -> Role {
        Role::WebResearcher
    }

    async fn run(&self, state: RunState, ctx: &WorkerContext) -> RunState {
        let mut state = state;
        ctx.trace.agent("WebResearcher Agent 🔍");

        let tools = ToolSet::new(vec![ctx.web_search.clone(), ctx.scrape.clone()]);
        let system = prompts::researcher_agent_system();

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
            Ok(content) => {
                ctx.trace.line("✅ research complete");
                state.push_turn(Turn::worker(self.role(), content));
            }
            Err(e) => {
                ctx.trace.line(&format!("❌ web research failed: {e}"));
                state.push_turn(Turn::worker(
                    self.role(),
                    format!("Web research failed: {e}"),
                ));
            }
        }

        state.next_step = NextStep::Supervisor;
        state
    }
}
