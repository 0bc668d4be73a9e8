//! Run Loop — alternates Supervisor and worker steps until the run
//! terminates.
//!
//! The node set is fixed: the Supervisor plus the five workers. Every worker
//! hands control straight back to the Supervisor; only the Supervisor's
//! `next_step` selects a worker or finishes. Worker dispatch goes through a
//! trait so tests can script workers without touching the network.

use async_trait::async_trait;

use crate::trace::TraceSink;
use crate::workflow::intent::IntentClassifier;
use crate::workflow::state::{NextStep, Role, RunState};
use crate::workflow::supervisor;

/// Hard ceiling on supervisor+worker rounds per query. Overlaps with the
/// Supervisor's own loop limit on purpose: this one still terminates the run
/// if the routing logic itself is defective.
pub const MAX_RUN_STEPS: usize = 30;

/// Executes one worker step. Implementations must uphold the worker
/// contract: append exactly one turn and hand control back to the
/// Supervisor, converting internal failures into error turns.
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn dispatch(&self, role: Role, state: RunState) -> RunState;
}

/// Drives one query to completion and returns the final state.
pub async fn run(
    mut state: RunState,
    dispatcher: &dyn Dispatch,
    classifier: &dyn IntentClassifier,
    trace: &dyn TraceSink,
) -> RunState {
    for _ in 0..MAX_RUN_STEPS {
        state = supervisor::supervise(state, classifier, trace);

        match state.next_step {
            NextStep::Finish => {
                trace.line("run: finished");
                return state;
            }
            NextStep::Act(role) => {
                trace.line(&format!("run: routing to {role}"));
                state = dispatcher.dispatch(role, state).await;
                // Whatever the worker suggested, control returns to the
                // Supervisor: worker → Supervisor edges are unconditional.
            }
            NextStep::Supervisor => {}
        }
    }

    trace.line("run: step ceiling reached, terminating");
    state.next_step = NextStep::Finish;
    state
}
