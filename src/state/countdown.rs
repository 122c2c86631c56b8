//! Deadline countdown

use std::{
    fmt,
    sync::{Arc, Mutex, Weak},
    time::Duration,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::Notifier;
use crate::{
    runtime::{Scheduler, TimerHandle},
    utils::lock,
};

const MS_PER_DAY: i64 = 86_400_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_SECOND: i64 = 1_000;

/// How often a running countdown refreshes
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Fixed target instant of a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deadline(DateTime<Utc>);

impl Deadline {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Deadline {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Time left until a deadline, broken down for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemainingDuration {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl RemainingDuration {
    /// All-zero duration
    pub const ZERO: RemainingDuration = RemainingDuration {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Break down the time from `now` until `deadline`, clamped at zero
    pub fn until(deadline: Deadline, now: DateTime<Utc>) -> Self {
        let distance = (deadline.instant() - now).num_milliseconds();
        if distance <= 0 {
            return Self::ZERO;
        }

        // distance > 0, so every component below is non-negative
        Self {
            days: (distance / MS_PER_DAY) as u64,
            hours: ((distance % MS_PER_DAY) / MS_PER_HOUR) as u64,
            minutes: ((distance % MS_PER_HOUR) / MS_PER_MINUTE) as u64,
            seconds: ((distance % MS_PER_MINUTE) / MS_PER_SECOND) as u64,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Total whole seconds represented
    pub fn total_seconds(&self) -> u64 {
        self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds
    }
}

impl fmt::Display for RemainingDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[derive(Debug)]
struct CountdownInner {
    deadline: Deadline,
    remaining: Mutex<RemainingDuration>,
    /// Latched once the countdown reached zero
    expired: Mutex<bool>,
    timer: Mutex<Option<TimerHandle>>,
    notifier: Notifier,
}

impl CountdownInner {
    fn tick_at(&self, now: DateTime<Utc>) -> RemainingDuration {
        let mut expired = lock(&self.expired);
        let next = if *expired {
            RemainingDuration::ZERO
        } else {
            RemainingDuration::until(self.deadline, now)
        };

        if next.is_zero() && !*expired {
            *expired = true;
            info!("Countdown to {} reached zero", self.deadline);
        }
        drop(expired);

        let mut remaining = lock(&self.remaining);
        let changed = *remaining != next;
        *remaining = next;
        drop(remaining);

        if changed {
            self.notifier.notify();
        }
        next
    }
}

/// Countdown towards a fixed [`Deadline`].
///
/// A deadline already in the past yields [`RemainingDuration::ZERO`] from
/// the first tick; once zero, the countdown stays zero.
#[derive(Debug)]
pub struct CountdownClock {
    inner: Arc<CountdownInner>,
}

impl CountdownClock {
    pub fn new(deadline: Deadline, notifier: Notifier) -> Self {
        Self {
            inner: Arc::new(CountdownInner {
                deadline,
                remaining: Mutex::new(RemainingDuration::ZERO),
                expired: Mutex::new(false),
                timer: Mutex::new(None),
                notifier,
            }),
        }
    }

    pub fn deadline(&self) -> Deadline {
        self.inner.deadline
    }

    /// Recompute the remaining time against the wall clock
    pub fn tick(&self) -> RemainingDuration {
        self.inner.tick_at(Utc::now())
    }

    /// Recompute the remaining time as of `now`
    pub fn tick_at(&self, now: DateTime<Utc>) -> RemainingDuration {
        self.inner.tick_at(now)
    }

    /// Last computed remaining time
    pub fn remaining(&self) -> RemainingDuration {
        *lock(&self.inner.remaining)
    }

    /// Tick now, then once per [`TICK_INTERVAL`] until stopped.
    ///
    /// Starting an already running countdown restarts its timer.
    pub fn start(&self, scheduler: &dyn Scheduler) {
        self.stop();
        self.tick();

        let weak: Weak<CountdownInner> = Arc::downgrade(&self.inner);
        let handle = scheduler.every(
            TICK_INTERVAL,
            Box::new(move || match weak.upgrade() {
                Some(inner) => {
                    inner.tick_at(Utc::now());
                }
                None => debug!("Countdown tick after teardown ignored"),
            }),
        );

        info!("Countdown to {} started", self.inner.deadline);
        *lock(&self.inner.timer) = Some(handle);
    }

    /// Cancel the recurring tick
    pub fn stop(&self) {
        if let Some(handle) = lock(&self.inner.timer).take() {
            handle.cancel();
            debug!("Countdown to {} stopped", self.inner.deadline);
        }
    }

    pub fn is_running(&self) -> bool {
        lock(&self.inner.timer).is_some()
    }
}

impl Drop for CountdownClock {
    fn drop(&mut self) {
        self.stop();
    }
}
