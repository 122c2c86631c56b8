//! Section view models
//!
//! Each section composes the engine components it needs with the timing of
//! the live site. Only the active section is mounted; dropping a mounted
//! section tears down all of its timers and observations.

pub mod announcements;
pub mod home;
pub mod presale;
pub mod roadmap;
pub mod tokenomics;

use std::{sync::Arc, time::Duration};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    content::SiteContent,
    runtime::{Scheduler, Viewport},
    state::{Notifier, ProgressAnimator, RevealConfig, RevealSequencer, Section},
};

// Re-export main types
pub use announcements::{AnnouncementFilter, AnnouncementsSection, AnnouncementsView};
pub use home::{HomeSection, HomeView};
pub use presale::{PresaleSection, PresaleView};
pub use roadmap::{RoadmapSection, RoadmapView};
pub use tokenomics::{TokenomicsSection, TokenomicsView};

/// Host collaborators handed to every section on mount
#[derive(Debug, Clone)]
pub struct MountContext {
    pub scheduler: Arc<dyn Scheduler>,
    pub viewport: Arc<dyn Viewport>,
    pub notifier: Notifier,
}

/// Create one progress bar per `(target, delay)` pair
pub(crate) fn progress_bars(
    bars: impl IntoIterator<Item = (u8, Duration)>,
    ctx: &MountContext,
) -> Vec<ProgressAnimator> {
    bars.into_iter()
        .map(|(target, delay)| {
            ProgressAnimator::new(target, delay, Arc::clone(&ctx.scheduler), ctx.notifier.clone())
        })
        .collect()
}

/// Create a sequencer that also begins `bars` when it triggers, and start
/// observing its container
pub(crate) fn observed_reveal(
    config: RevealConfig,
    bars: &[ProgressAnimator],
    ctx: &MountContext,
) -> RevealSequencer {
    let starters: Vec<_> = bars.iter().map(ProgressAnimator::starter).collect();
    let reveal = RevealSequencer::new(config, Arc::clone(&ctx.scheduler), ctx.notifier.clone())
        .with_on_trigger(move || starters.iter().for_each(|starter| starter.begin()));
    reveal.observe(ctx.viewport.as_ref());
    reveal
}

/// The single mounted section
#[derive(Debug)]
pub enum MountedSection {
    Home(HomeSection),
    Tokenomics(TokenomicsSection),
    Presale(PresaleSection),
    Roadmap(RoadmapSection),
    Announcements(AnnouncementsSection),
}

impl MountedSection {
    /// Mount a fresh instance of `section`
    pub fn mount(section: Section, content: &SiteContent, ctx: &MountContext) -> Self {
        info!("Mounting section {}", section);
        match section {
            Section::Home => Self::Home(HomeSection::mount(content, ctx)),
            Section::Tokenomics => Self::Tokenomics(TokenomicsSection::mount(content, ctx)),
            Section::Presale => Self::Presale(PresaleSection::mount(content, ctx)),
            Section::Roadmap => Self::Roadmap(RoadmapSection::mount(content, ctx)),
            Section::Announcements => Self::Announcements(AnnouncementsSection::mount(content, ctx)),
        }
    }

    pub fn section(&self) -> Section {
        match self {
            Self::Home(_) => Section::Home,
            Self::Tokenomics(_) => Section::Tokenomics,
            Self::Presale(_) => Section::Presale,
            Self::Roadmap(_) => Section::Roadmap,
            Self::Announcements(_) => Section::Announcements,
        }
    }

    pub fn snapshot(&self) -> SectionView {
        match self {
            Self::Home(home) => SectionView::Home(home.snapshot()),
            Self::Tokenomics(tokenomics) => SectionView::Tokenomics(tokenomics.snapshot()),
            Self::Presale(presale) => SectionView::Presale(presale.snapshot()),
            Self::Roadmap(roadmap) => SectionView::Roadmap(roadmap.snapshot()),
            Self::Announcements(announcements) => SectionView::Announcements(announcements.snapshot()),
        }
    }
}

/// Renderable state of the mounted section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", rename_all = "lowercase")]
pub enum SectionView {
    Home(HomeView),
    Tokenomics(TokenomicsView),
    Presale(PresaleView),
    Roadmap(RoadmapView),
    Announcements(AnnouncementsView),
}
