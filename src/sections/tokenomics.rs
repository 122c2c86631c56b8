//! Token allocation table with staggered allocation bars

use serde::{Deserialize, Serialize};

use super::{observed_reveal, progress_bars, MountContext};
use crate::{
    content::{Allocation, SiteContent},
    state::{ProgressAnimator, ProgressTrack, RevealConfig, RevealPhase, RevealSequencer, Section},
};

const THRESHOLD: f64 = 0.3;
const ROW_DELAY_MS: u64 = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationView {
    pub label: String,
    pub value: String,
    pub revealed: bool,
    pub bar: ProgressTrack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenomicsView {
    pub phase: RevealPhase,
    pub allocations: Vec<AllocationView>,
}

#[derive(Debug)]
pub struct TokenomicsSection {
    allocations: Vec<Allocation>,
    bars: Vec<ProgressAnimator>,
    reveal: RevealSequencer,
}

impl TokenomicsSection {
    pub fn mount(content: &SiteContent, ctx: &MountContext) -> Self {
        let allocations = content.tokenomics.clone();
        let config = RevealConfig::new(Section::Tokenomics.id(), allocations.len(), ROW_DELAY_MS, THRESHOLD);

        // Bar i fills together with row i
        let bars = progress_bars(
            allocations
                .iter()
                .enumerate()
                .map(|(index, allocation)| (allocation.percentage, config.offset(index))),
            ctx,
        );
        let reveal = observed_reveal(config, &bars, ctx);

        Self {
            allocations,
            bars,
            reveal,
        }
    }

    pub fn snapshot(&self) -> TokenomicsView {
        let revealed = self.reveal.activated();
        TokenomicsView {
            phase: self.reveal.phase(),
            allocations: self
                .allocations
                .iter()
                .zip(&self.bars)
                .zip(revealed)
                .map(|((allocation, bar), revealed)| AllocationView {
                    label: allocation.label.clone(),
                    value: allocation.value.clone(),
                    revealed,
                    bar: bar.track(),
                })
                .collect(),
        }
    }
}
