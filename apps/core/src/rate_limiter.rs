use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Per-conversation requests allowed within [`DEFAULT_WINDOW`].
pub const DEFAULT_LIMIT: usize = 10;
/// Length of the sliding window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// A sliding-window throttle on conversation requests.
///
/// Each conversation id gets its own window of request timestamps. The engine
/// consults it before composing a reply, so a single conversation cannot
/// hammer the metered completion service.
pub struct RequestThrottle {
    /// Request timestamps per conversation id.
    requests: HashMap<String, Vec<Instant>>,
    /// The maximum number of requests allowed within the `window`.
    limit: usize,
    /// The duration of the sliding window.
    window: Duration,
}

impl Default for RequestThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, DEFAULT_WINDOW)
    }
}

impl RequestThrottle {
    pub fn new(limit: usize, window: Duration) -> Self {
        RequestThrottle {
            requests: HashMap::new(),
            limit,
            window,
        }
    }

    /// Attempts to admit a request for the given conversation.
    ///
    /// Admitted requests are recorded against the window. Returns `false`
    /// when the conversation has exhausted its allowance.
    pub fn try_acquire(&mut self, conversation_id: &str) -> bool {
        let now = Instant::now();
        let window_start = now - self.window;

        let recent = self.requests.entry(conversation_id.to_string()).or_default();

        // Drop timestamps that have slid out of the window
        recent.retain(|&timestamp| timestamp > window_start);

        if recent.len() < self.limit {
            recent.push(now);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_throttle_admits_requests_within_limit() {
        let mut throttle = RequestThrottle::new(5, Duration::from_secs(1));
        for _ in 0..5 {
            assert!(throttle.try_acquire("conversation-1"));
        }
        assert!(!throttle.try_acquire("conversation-1"));
    }

    #[test]
    fn test_throttle_tracks_conversations_independently() {
        let mut throttle = RequestThrottle::new(1, Duration::from_secs(1));
        assert!(throttle.try_acquire("conversation-1"));
        assert!(throttle.try_acquire("conversation-2"));
        assert!(!throttle.try_acquire("conversation-1"));
    }

    #[test]
    fn test_throttle_resets_after_window() {
        let mut throttle = RequestThrottle::new(2, Duration::from_millis(50));
        assert!(throttle.try_acquire("conversation-3"));
        assert!(throttle.try_acquire("conversation-3"));
        assert!(!throttle.try_acquire("conversation-3"));

        thread::sleep(Duration::from_millis(60));

        assert!(throttle.try_acquire("conversation-3"));
    }
}
