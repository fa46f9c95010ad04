//! Advisory request counters.
//!
//! Every tracked request bumps the in-flight queue and both window counters.
//! Each bump of a window counter is released by its own timer task, so a
//! burst of N requests schedules N independent releases. Nothing here blocks
//! or throttles; the counters only describe recent traffic.

use crate::types::{RateInfo, RateLimitInfo, RateLimits};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Window {
    Second,
    Minute,
}

impl Window {
    fn duration(self) -> Duration {
        match self {
            Window::Second => Duration::from_secs(1),
            Window::Minute => Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    queue_length: u32,
    per_minute: u32,
    per_second: u32,
}

impl Counters {
    fn release(&mut self, window: Window) {
        let slot = match window {
            Window::Second => &mut self.per_second,
            Window::Minute => &mut self.per_minute,
        };
        *slot = slot.saturating_sub(1);
    }
}

/// Per-client request counters with cancellable window timers.
///
/// Dropping the observer aborts every pending release.
#[derive(Debug)]
pub struct RateObserver {
    counters: Arc<Mutex<Counters>>,
    limits: RateLimits,
    timers: Mutex<JoinSet<()>>,
}

impl RateObserver {
    /// Create an observer reporting `limits` in its snapshots.
    pub fn new(limits: RateLimits) -> Self {
        Self {
            counters: Arc::default(),
            limits,
            timers: Mutex::new(JoinSet::new()),
        }
    }

    /// Record the start of a request.
    ///
    /// Window releases are scheduled on the current Tokio runtime. Outside a
    /// runtime the counters are still bumped but never released.
    pub fn track(&self) {
        {
            let mut counters = self.counters.lock();
            counters.queue_length = counters.queue_length.saturating_add(1);
            counters.per_minute = counters.per_minute.saturating_add(1);
            counters.per_second = counters.per_second.saturating_add(1);
        }

        let Ok(handle) = Handle::try_current() else {
            debug!(target: "mockup_sdk", "no tokio runtime, rate windows will not be released");
            return;
        };

        let mut timers = self.timers.lock();
        while timers.try_join_next().is_some() {}
        for window in [Window::Second, Window::Minute] {
            timers.spawn_on(release_after(self.counters.clone(), window), &handle);
        }
    }

    /// Record the end of a request.
    pub fn decrease_queue(&self) {
        let mut counters = self.counters.lock();
        counters.queue_length = counters.queue_length.saturating_sub(1);
    }

    /// Copy of the counters and configured limits.
    pub fn snapshot(&self) -> RateLimitInfo {
        let counters = self.counters.lock();

        RateLimitInfo {
            queue_length: counters.queue_length,
            rate_info: RateInfo {
                per_minute: counters.per_minute,
                per_second: counters.per_second,
            },
            limits: self.limits,
        }
    }

    /// Abort every pending window release.
    pub fn shutdown(&self) {
        self.timers.lock().abort_all();
    }
}

async fn release_after(counters: Arc<Mutex<Counters>>, window: Window) {
    tokio::time::sleep(window.duration()).await;
    counters.lock().release(window);
}
