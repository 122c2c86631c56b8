//! Presale section with the funding progress bar

use std::{slice, sync::Arc, time::Duration};
use serde::{Deserialize, Serialize};

use super::{observed_reveal, MountContext};
use crate::{
    content::SiteContent,
    state::{ProgressAnimator, ProgressTrack, RevealConfig, RevealPhase, RevealSequencer, Section},
};

const THRESHOLD: f64 = 0.3;
const PROGRESS_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresaleView {
    pub phase: RevealPhase,
    pub raised: String,
    pub goal: String,
    pub progress: ProgressTrack,
}

#[derive(Debug)]
pub struct PresaleSection {
    raised: String,
    goal: String,
    progress: ProgressAnimator,
    reveal: RevealSequencer,
}

impl PresaleSection {
    pub fn mount(content: &SiteContent, ctx: &MountContext) -> Self {
        let progress = ProgressAnimator::new(
            content.presale.progress,
            PROGRESS_DELAY,
            Arc::clone(&ctx.scheduler),
            ctx.notifier.clone(),
        );
        // No staggered items: the trigger only starts the funding bar
        let reveal = observed_reveal(
            RevealConfig::new(Section::Presale.id(), 0, 0, THRESHOLD),
            slice::from_ref(&progress),
            ctx,
        );

        Self {
            raised: content.presale.raised.clone(),
            goal: content.presale.goal.clone(),
            progress,
            reveal,
        }
    }

    pub fn snapshot(&self) -> PresaleView {
        PresaleView {
            phase: self.reveal.phase(),
            raised: self.raised.clone(),
            goal: self.goal.clone(),
            progress: self.progress.track(),
        }
    }
}
