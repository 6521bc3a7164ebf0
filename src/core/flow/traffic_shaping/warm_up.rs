//! WarmUpCalculator ramps the allowed threshold up gradually after a
//! cold start, the same "leaky bucket with tokens" scheme Guava's
//! SmoothWarmingUp rate limiter uses: the more tokens sit unspent in
//! the bucket, the colder (more throttled) the allowed rate, until
//! enough of them have been drained by admitted traffic that it reaches
//! the configured steady-state value.

use super::{Calculator, Controller};
use crate::config;
use crate::core::flow::Rule;
use crate::utils;
use std::sync::{Arc, Mutex, Weak};

struct WarmUpState {
    stored_tokens: f64,
    last_filled_time_ms: u64,
}

#[derive(Debug)]
pub struct WarmUpCalculator {
    owner: Weak<Controller>,
    threshold: f64,
    cold_factor: f64,
    warning_token: f64,
    max_token: f64,
    slope: f64,
    state: Mutex<WarmUpState>,
}

impl WarmUpCalculator {
    pub fn new(owner: Weak<Controller>, rule: &Arc<Rule>) -> Self {
        let cold_factor = if rule.warm_up_cold_factor <= 1 {
            config::WARM_UP_COLD_FACTOR as f64
        } else {
            rule.warm_up_cold_factor as f64
        };
        let threshold = rule.threshold;
        let warm_up_period_sec = rule.warm_up_period_sec as f64;

        let warning_token = (warm_up_period_sec * threshold) / (cold_factor - 1.0);
        let max_token = warning_token + 2.0 * warm_up_period_sec * threshold / (cold_factor + 1.0);
        let slope = (cold_factor - 1.0) / threshold / (max_token - warning_token);

        WarmUpCalculator {
            owner,
            threshold,
            cold_factor,
            warning_token,
            max_token,
            slope,
            state: Mutex::new(WarmUpState {
                // `last_filled_time_ms` is left at 0 (not "now"), so the
                // first real call sees an enormous elapsed time and
                // `sync_tokens` saturates the bucket to `max_token` —
                // i.e. a never-yet-used resource starts fully cold.
                stored_tokens: 0.0,
                last_filled_time_ms: 0,
            }),
        }
    }

    /// Refills the bucket for the time elapsed since the last call. The
    /// refill rate itself depends on how cold the bucket currently is:
    /// while cold (at or above `warning_token`) tokens trickle back at
    /// only `threshold / cold_factor`; once warm, they refill at the
    /// full `threshold` rate.
    fn sync_tokens(&self, state: &mut WarmUpState, now_ms: u64) {
        if now_ms <= state.last_filled_time_ms {
            return;
        }
        let elapsed_ms = (now_ms - state.last_filled_time_ms) as f64;
        let refill_rate = if state.stored_tokens >= self.warning_token {
            self.threshold / self.cold_factor
        } else {
            self.threshold
        };
        let restored = elapsed_ms * refill_rate / 1000.0;
        state.stored_tokens = (state.stored_tokens + restored).min(self.max_token);
        state.last_filled_time_ms = now_ms;
    }
}

impl Calculator for WarmUpCalculator {
    fn get_owner(&self) -> &Weak<Controller> {
        &self.owner
    }

    fn set_owner(&mut self, owner: Weak<Controller>) {
        self.owner = owner;
    }

    fn calculate_allowed_threshold(&self, batch_count: u32, _flag: i32) -> f64 {
        if self.threshold <= 0.0 {
            return self.threshold;
        }
        let now_ms = utils::curr_time_millis();
        let mut state = self.state.lock().unwrap();
        self.sync_tokens(&mut state, now_ms);

        let rest_token = state.stored_tokens;
        let allowed = if rest_token >= self.warning_token {
            // cold: above the warning line, ramp from count/k up to count
            1.0 / (self.slope * (rest_token - self.warning_token) + 1.0 / self.threshold)
        } else {
            // warm: below the warning line, steady-state rate applies
            self.threshold
        };

        // Only traffic this controller would actually admit drains the
        // bucket — an attempt that the checker is about to block should
        // not make the resource look any warmer than it is.
        if let Some(owner) = self.owner.upgrade() {
            let cur_qps = owner.stat().current_qps();
            if cur_qps + batch_count as f64 <= allowed {
                state.stored_tokens = (rest_token - batch_count as f64).max(0.0);
            }
        }

        allowed
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn throttled_while_cold_then_warms_up() {
        let rule = Arc::new(Rule {
            threshold: 100.0,
            warm_up_period_sec: 2,
            warm_up_cold_factor: 3,
            ..Default::default()
        });
        let calc = WarmUpCalculator::new(Weak::new(), &rule);
        // a never-yet-used resource starts fully cold: the bucket
        // saturates to max_token on the first call, so the allowed
        // rate starts at count/k rather than the steady-state count.
        let first = calc.calculate_allowed_threshold(1, 0);
        assert!(
            (first - 100.0 / 3.0).abs() < 0.01,
            "expected cold-start rate near count/k, got {}",
            first
        );
    }

    #[test]
    fn falls_back_to_cold_factor_default() {
        let rule = Arc::new(Rule {
            threshold: 50.0,
            warm_up_period_sec: 2,
            ..Default::default()
        });
        let calc = WarmUpCalculator::new(Weak::new(), &rule);
        let first = calc.calculate_allowed_threshold(1, 0);
        assert!(
            (first - 50.0 / config::WARM_UP_COLD_FACTOR as f64).abs() < 0.01,
            "expected fallback to the default cold factor, got {}",
            first
        );
    }
}
