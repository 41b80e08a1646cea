//! Exponential backoff with jitter between generation attempts.
//!
//! Stateless apart from configuration: the caller tracks the attempt
//! number and asks for the delay before the next one.

use std::time::Duration;

use bytebond_types::config::GenerationConfig;

// ---------------------------------------------------------------------------
// BackoffPolicy
// ---------------------------------------------------------------------------

/// Delay schedule between failed attempts.
///
/// The base delay for retry `n` (0-based) is
/// `initial * multiplier^n`, capped at `max`. Jitter then scales it by a
/// random factor in `[1 - jitter, 1 + jitter]`, and the result is capped
/// at `max` again.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    pub initial: Duration,
    pub max: Duration,
    pub multiplier: f64,
    pub jitter: f64,
}

impl BackoffPolicy {
    /// A policy that never waits. Reproduces back-to-back retries.
    pub fn none() -> Self {
        Self {
            initial: Duration::ZERO,
            max: Duration::ZERO,
            multiplier: 1.0,
            jitter: 0.0,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            initial: Duration::from_millis(config.initial_delay_ms),
            max: Duration::from_millis(config.max_delay_ms),
            multiplier: config.multiplier.max(1.0),
            jitter: config.jitter.clamp(0.0, 1.0),
        }
    }

    /// Un-jittered delay before retry `retry` (0-based).
    pub fn base_delay(&self, retry: u32) -> Duration {
        let exp = self.multiplier.powi(retry.min(i32::MAX as u32) as i32);
        let millis = self.initial.as_millis() as f64 * exp;
        let capped = millis.min(self.max.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }

    /// Jittered delay before retry `retry` (0-based), never above `max`.
    pub fn delay(&self, retry: u32) -> Duration {
        let base = self.base_delay(retry);
        if self.jitter <= 0.0 || base.is_zero() {
            return base;
        }
        let factor = rand::random_range((1.0 - self.jitter)..=(1.0 + self.jitter));
        let millis = (base.as_millis() as f64 * factor).min(self.max.as_millis() as f64);
        Duration::from_millis(millis.max(0.0) as u64)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from_config(&GenerationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(jitter: f64) -> BackoffPolicy {
        BackoffPolicy {
            initial: Duration::from_millis(100),
            max: Duration::from_millis(1_000),
            multiplier: 2.0,
            jitter,
        }
    }

    #[test]
    fn test_base_delay_grows_exponentially() {
        let p = policy(0.0);
        assert_eq!(p.base_delay(0), Duration::from_millis(100));
        assert_eq!(p.base_delay(1), Duration::from_millis(200));
        assert_eq!(p.base_delay(2), Duration::from_millis(400));
    }

    #[test]
    fn test_base_delay_capped_at_max() {
        let p = policy(0.0);
        assert_eq!(p.base_delay(10), Duration::from_millis(1_000));
        assert_eq!(p.base_delay(u32::MAX), Duration::from_millis(1_000));
    }

    #[test]
    fn test_jittered_delay_stays_in_bounds() {
        let p = policy(0.5);
        for retry in 0..8 {
            let base = p.base_delay(retry).as_millis() as f64;
            for _ in 0..50 {
                let d = p.delay(retry).as_millis() as f64;
                assert!(d >= (base * 0.5).floor() - 1.0, "delay {d} below bound for base {base}");
                assert!(d <= 1_000.0, "delay {d} above max");
            }
        }
    }

    #[test]
    fn test_none_policy_never_waits() {
        let p = BackoffPolicy::none();
        assert_eq!(p.delay(0), Duration::ZERO);
        assert_eq!(p.delay(6), Duration::ZERO);
    }

    #[test]
    fn test_from_config_clamps_values() {
        let config = GenerationConfig {
            multiplier: 0.5,
            jitter: 3.0,
            ..Default::default()
        };
        let p = BackoffPolicy::from_config(&config);
        assert_eq!(p.multiplier, 1.0);
        assert_eq!(p.jitter, 1.0);
        assert_eq!(p.initial, Duration::from_millis(250));
    }
}
