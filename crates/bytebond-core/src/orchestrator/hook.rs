//! Exhaustion hook: observes users whose turns keep ending in the apology.

use tracing::warn;

/// Called every time a turn's generation is exhausted.
///
/// `consecutive` counts exhausted turns for this user since their last
/// generated reply (1 on the first). Policy (throttling, alerting) is up
/// to the implementation.
pub trait ExhaustionHook: Send + Sync {
    fn on_exhausted(&self, user_id: &str, consecutive: u32);
}

/// Hook that does nothing.
pub struct NoopExhaustionHook;

impl ExhaustionHook for NoopExhaustionHook {
    fn on_exhausted(&self, _user_id: &str, _consecutive: u32) {}
}

/// Hook that warns once a user reaches `threshold` consecutive exhaustions.
pub struct LogExhaustionHook {
    threshold: u32,
}

impl LogExhaustionHook {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
        }
    }

    pub fn should_warn(&self, consecutive: u32) -> bool {
        consecutive >= self.threshold
    }
}

impl ExhaustionHook for LogExhaustionHook {
    fn on_exhausted(&self, user_id: &str, consecutive: u32) {
        if self.should_warn(consecutive) {
            warn!(
                user_id,
                consecutive,
                threshold = self.threshold,
                "generation repeatedly exhausted for user"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_hook_threshold() {
        let hook = LogExhaustionHook::new(3);
        assert!(!hook.should_warn(2));
        assert!(hook.should_warn(3));
        assert!(hook.should_warn(10));
    }

    #[test]
    fn test_log_hook_zero_threshold_clamped() {
        let hook = LogExhaustionHook::new(0);
        assert!(hook.should_warn(1));
        hook.on_exhausted("u1", 1);
    }
}
