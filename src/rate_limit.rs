//! Outbound send budget. Twitch enforces per-30s message ceilings that
//! depend on the bot's classification; exceeding them gets the account
//! locked out, so sends above the budget are dropped, not queued.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::debug;

/// Named bot classification selecting which send budget applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotTier {
    #[default]
    Normal,
    NormalModded,
    Known,
    Verified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimits {
    pub messages: u32,
    pub timespan: Duration,
}

impl BotTier {
    pub fn limits(&self) -> RateLimits {
        let (messages, secs) = match self {
            BotTier::Normal => (20, 30),
            BotTier::NormalModded => (100, 30),
            BotTier::Known => (50, 30),
            BotTier::Verified => (7500, 30),
        };
        RateLimits {
            messages,
            timespan: Duration::from_secs(secs),
        }
    }
}

/// Fixed-window counter over all outbound sends. One instance per
/// process; a burst straddling a window boundary is not smoothed.
pub struct RateLimiter {
    enabled: bool,
    limits: RateLimits,
    count: Arc<Mutex<u32>>,
    reset_task: Mutex<Option<JoinHandle<()>>>,
}

impl RateLimiter {
    pub fn new(tier: BotTier, enabled: bool) -> Self {
        Self {
            enabled,
            limits: tier.limits(),
            count: Arc::new(Mutex::new(0)),
            reset_task: Mutex::new(None),
        }
    }

    /// True when a send fits the current window. On a true result the
    /// caller must follow the actual send with [`RateLimiter::on_sent`].
    pub fn try_consume(&self) -> bool {
        if !self.enabled {
            return true;
        }
        *self.count.lock().unwrap() < self.limits.messages
    }

    /// Record one completed send. The window-reset task is spawned
    /// lazily on the first send after the counter was last at zero and
    /// keeps running until [`RateLimiter::shutdown`].
    pub fn on_sent(&self) {
        if !self.enabled {
            return;
        }

        let was_zero = {
            let mut count = self.count.lock().unwrap();
            let was_zero = *count == 0;
            *count += 1;
            was_zero
        };

        if was_zero {
            self.ensure_reset_task();
        }
    }

    pub fn count(&self) -> u32 {
        *self.count.lock().unwrap()
    }

    /// Stop the window-reset task and clear the counter. Called when the
    /// transport disconnects so the timer does not outlive the session.
    pub fn shutdown(&self) {
        let mut slot = self.reset_task.lock().unwrap();
        if let Some(task) = slot.take() {
            debug!("stopping rate-limit window task");
            task.abort();
        }
        *self.count.lock().unwrap() = 0;
    }

    fn ensure_reset_task(&self) {
        let mut slot = self.reset_task.lock().unwrap();
        let running = slot.as_ref().is_some_and(|t| !t.is_finished());
        if running {
            return;
        }

        debug!("starting rate-limit window task");
        let count = Arc::clone(&self.count);
        let timespan = self.limits.timespan;
        *slot = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(timespan).await;
                debug!("resetting send counter");
                *count.lock().unwrap() = 0;
            }
        }));
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        if let Some(task) = self.reset_task.lock().unwrap().take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn budget_is_exhausted_on_the_twenty_first_send() {
        let limiter = RateLimiter::new(BotTier::Normal, true);

        for i in 0..20 {
            assert!(limiter.try_consume(), "send {} should fit", i);
            limiter.on_sent();
        }
        assert!(!limiter.try_consume());
        assert_eq!(limiter.count(), 20);
    }

    #[tokio::test(start_paused = true)]
    async fn counter_resets_after_the_window_elapses() {
        let limiter = RateLimiter::new(BotTier::Normal, true);

        for _ in 0..20 {
            assert!(limiter.try_consume());
            limiter.on_sent();
        }
        assert!(!limiter.try_consume());

        tokio::time::sleep(Duration::from_secs(31)).await;

        assert_eq!(limiter.count(), 0);
        assert!(limiter.try_consume());
    }

    #[tokio::test]
    async fn disabled_limiter_always_allows() {
        let limiter = RateLimiter::new(BotTier::Normal, false);
        for _ in 0..100 {
            assert!(limiter.try_consume());
            limiter.on_sent();
        }
        assert_eq!(limiter.count(), 0);
    }

    #[tokio::test]
    async fn shutdown_clears_the_counter() {
        let limiter = RateLimiter::new(BotTier::Normal, true);
        for _ in 0..20 {
            limiter.on_sent();
        }
        assert!(!limiter.try_consume());

        limiter.shutdown();
        assert!(limiter.try_consume());
        assert_eq!(limiter.count(), 0);
    }

    #[test]
    fn tier_table_matches_twitch_limits() {
        assert_eq!(BotTier::Normal.limits().messages, 20);
        assert_eq!(BotTier::NormalModded.limits().messages, 100);
        assert_eq!(BotTier::Known.limits().messages, 50);
        assert_eq!(BotTier::Verified.limits().messages, 7500);
        assert_eq!(BotTier::Normal.limits().timespan, Duration::from_secs(30));
    }
}
