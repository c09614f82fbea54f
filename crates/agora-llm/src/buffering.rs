use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};

/// Time-windowed accumulator for streamed text.
///
/// Pushing is cheap; the owner flushes with `take()` whenever `ticker()`
/// fires inside a `tokio::select!` loop, so a fast token stream turns into
/// a few larger writes.
pub struct TokenBatcher {
    buffer: String,
    ticker: Interval,
    window_ms: u64,
}

impl TokenBatcher {
    pub fn new(window_ms: u64) -> Self {
        let period = Duration::from_millis(window_ms);
        // first tick one window out, not immediately
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self {
            buffer: String::new(),
            ticker,
            window_ms,
        }
    }

    pub fn push(&mut self, chunk: &str) {
        self.buffer.push_str(chunk);
    }

    /// Take the accumulated text, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Ticker for use in `tokio::select!`
    pub fn ticker(&mut self) -> &mut Interval {
        &mut self.ticker
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }
}
