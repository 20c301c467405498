//! Engine configuration.

use core::time::Duration;

/// Tunables for an [`Engine`](crate::Engine).
///
/// ```rust
/// use std::time::Duration;
/// use hive_ui::{Config, Engine, TaskQueue};
///
/// let queue = TaskQueue::new();
/// let config = Config {
///     action_delay: Duration::from_millis(16),
/// };
/// let engine = Engine::with_config(queue.scheduler(), config);
/// assert_eq!(engine.config().action_delay, Duration::from_millis(16));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Delay between invoking a bound action and evaluating it.
    pub action_delay: Duration,
}

impl Config {
    pub const DEFAULT_ACTION_DELAY: Duration = Duration::from_millis(100);
}

impl Default for Config {
    fn default() -> Self {
        Self {
            action_delay: Self::DEFAULT_ACTION_DELAY,
        }
    }
}
