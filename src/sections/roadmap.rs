//! Roadmap phases revealed one by one, each followed by its progress bar

use std::time::Duration;
use serde::{Deserialize, Serialize};

use super::{observed_reveal, progress_bars, MountContext};
use crate::{
    content::{PhaseStatus, RoadmapPhase, SiteContent},
    state::{ProgressAnimator, ProgressTrack, RevealConfig, RevealPhase, RevealSequencer, Section},
};

const THRESHOLD: f64 = 0.2;
const PHASE_DELAY_MS: u64 = 200;
/// Lag between a phase appearing and its bar starting to fill
const BAR_LAG: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseView {
    pub phase: String,
    pub status: PhaseStatus,
    pub items: Vec<String>,
    pub revealed: bool,
    pub bar: ProgressTrack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapView {
    pub phase: RevealPhase,
    pub phases: Vec<PhaseView>,
}

#[derive(Debug)]
pub struct RoadmapSection {
    phases: Vec<RoadmapPhase>,
    bars: Vec<ProgressAnimator>,
    reveal: RevealSequencer,
}

impl RoadmapSection {
    pub fn mount(content: &SiteContent, ctx: &MountContext) -> Self {
        let phases = content.roadmap.clone();
        let config = RevealConfig::new(Section::Roadmap.id(), phases.len(), PHASE_DELAY_MS, THRESHOLD);

        let bars = progress_bars(
            phases
                .iter()
                .enumerate()
                .map(|(index, phase)| (phase.progress, config.offset(index) + BAR_LAG)),
            ctx,
        );
        let reveal = observed_reveal(config, &bars, ctx);

        Self { phases, bars, reveal }
    }

    pub fn snapshot(&self) -> RoadmapView {
        let revealed = self.reveal.activated();
        RoadmapView {
            phase: self.reveal.phase(),
            phases: self
                .phases
                .iter()
                .zip(&self.bars)
                .zip(revealed)
                .map(|((phase, bar), revealed)| PhaseView {
                    phase: phase.phase.clone(),
                    status: phase.status,
                    items: phase.items.clone(),
                    revealed,
                    bar: bar.track(),
                })
                .collect(),
        }
    }
}
