//! Reconnection backoff policy

use std::time::Duration;

/// Exponential backoff with a fixed attempt ceiling
///
/// Attempt `N` (zero-based) is retried after `base × 2^N`; once the ceiling
/// is reached automatic reconnection stops and the caller surfaces
/// `Disconnected` to the UI.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    /// Delay before the first retry
    pub base: Duration,
    /// Maximum number of automatic reconnect attempts
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(1),
            max_attempts: 5,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt `attempt` (zero-based), or `None`
    /// once the ceiling is exceeded
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }

        Some(self.base.saturating_mul(2u32.saturating_pow(attempt)))
    }
}
