//! Landing section with the presale countdown

use serde::{Deserialize, Serialize};

use super::MountContext;
use crate::{
    content::SiteContent,
    state::{CountdownClock, Deadline, RemainingDuration},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeView {
    pub deadline: Deadline,
    pub remaining: RemainingDuration,
    pub ended: bool,
}

/// Home owns the countdown, so the clock only ticks while Home is mounted.
#[derive(Debug)]
pub struct HomeSection {
    countdown: CountdownClock,
}

impl HomeSection {
    pub fn mount(content: &SiteContent, ctx: &MountContext) -> Self {
        let countdown = CountdownClock::new(content.deadline, ctx.notifier.clone());
        countdown.start(ctx.scheduler.as_ref());
        Self { countdown }
    }

    pub fn snapshot(&self) -> HomeView {
        let remaining = self.countdown.remaining();
        HomeView {
            deadline: self.countdown.deadline(),
            remaining,
            ended: remaining.is_zero(),
        }
    }
}
