use agora_types::Transcript;

/// Outcome of a speaker-selection decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Force this participant to speak next.
    Select(String),
    /// Let the group's default policy decide.
    Defer,
}

/// Pure policy choosing the next speaker from the transcript.
///
/// Implementations see only the message sequence; on [`Selection::Defer`]
/// the group chat falls back to its default policy.
pub trait SpeakerSelector: Send + Sync {
    fn pick(&self, transcript: &Transcript) -> Selection;
}

/// Defers every turn to the default policy.
pub struct DeferAll;

impl SpeakerSelector for DeferAll {
    fn pick(&self, _transcript: &Transcript) -> Selection {
        Selection::Defer
    }
}

/// Positional policy that pins the opening and closing speakers of a run.
///
/// With only the task in the transcript the `first` agent speaks; one
/// turn before the `max_turns` cap the `last` agent speaks; every turn
/// in between is deferred. Message content is never inspected.
pub struct BookendSelector {
    first: String,
    last: String,
    max_turns: usize,
}

impl BookendSelector {
    pub fn new(first: impl Into<String>, last: impl Into<String>, max_turns: usize) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
            max_turns,
        }
    }
}

impl SpeakerSelector for BookendSelector {
    fn pick(&self, transcript: &Transcript) -> Selection {
        let len = transcript.len();
        if len == 1 {
            Selection::Select(self.first.clone())
        } else if self.max_turns >= 2 && len == self.max_turns - 1 {
            Selection::Select(self.last.clone())
        } else {
            Selection::Defer
        }
    }
}
