use serde::{Deserialize, Serialize};

/// Budget of one group-chat run. `max_turns` counts transcript messages
/// including the inbound task, so a budget of 6 allows five agent turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    pub max_turns: usize,
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self { max_turns: 10 }
    }
}

impl TeamConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_turns(mut self, max: usize) -> Self {
        self.max_turns = max;
        self
    }
}

/// Budget of one graph-flow run. `max_messages` counts transcript messages
/// including the inbound task and stops degenerate cycles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    pub max_messages: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { max_messages: 50 }
    }
}

impl GraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_messages(mut self, max: usize) -> Self {
        self.max_messages = max;
        self
    }
}
