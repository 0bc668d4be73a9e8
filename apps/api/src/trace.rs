//! Run trace — the live diagnostic feed a run emits while it executes.
//!
//! The front end renders these lines next to the chat reply; they are
//! diagnostic only and never part of the routing contract.

use std::sync::Mutex;

use tracing::debug;

/// Sink for human-readable trace output from the Supervisor and workers.
pub trait TraceSink: Send + Sync {
    /// Announces which agent is taking over.
    fn agent(&self, name: &str);

    /// Emits one diagnostic line.
    fn line(&self, text: &str);
}

/// Collects trace output in memory so the chat handler can return it
/// alongside the reply. Also mirrors everything to the `tracing` log.
#[derive(Default)]
pub struct BufferedTrace {
    lines: Mutex<Vec<String>>,
    agents: Mutex<Vec<String>>,
}

impl BufferedTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("trace lock poisoned").clone()
    }

    /// The order in which agents ran, for the front end's progress view.
    pub fn agent_sequence(&self) -> Vec<String> {
        self.agents.lock().expect("trace lock poisoned").clone()
    }
}

impl TraceSink for BufferedTrace {
    fn agent(&self, name: &str) {
        debug!("agent: {name}");
        self.agents
            .lock()
            .expect("trace lock poisoned")
            .push(name.to_string());
        self.lines
            .lock()
            .expect("trace lock poisoned")
            .push(format!("▶ {name}"));
    }

    fn line(&self, text: &str) {
        debug!("{text}");
        self.lines
            .lock()
            .expect("trace lock poisoned")
            .push(text.to_string());
    }
}

/// Discards everything. Used by tests that don't inspect the trace.
#[cfg(test)]
pub struct NullTrace;

#[cfg(test)]
impl TraceSink for NullTrace {
    fn agent(&self, _name: &str) {}
    fn line(&self, _text: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_trace_records_lines_and_agent_sequence() {
        let trace = BufferedTrace::new();
        trace.agent("ResumeAnalyzer");
        trace.line("extracting resume");
        trace.agent("ChatBot");

        assert_eq!(trace.agent_sequence(), vec!["ResumeAnalyzer", "ChatBot"]);
        let lines = trace.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("ResumeAnalyzer"));
        assert_eq!(lines[1], "extracting resume");
    }
}
