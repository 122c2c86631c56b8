//! News cards with a kind filter and a single expandable card

use std::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{observed_reveal, MountContext};
use crate::{
    content::{Announcement, AnnouncementKind, Priority, SiteContent},
    error::StageError,
    state::{Notifier, RevealConfig, RevealPhase, RevealSequencer, Section},
};

const THRESHOLD: f64 = 0.3;
const CARD_DELAY_MS: u64 = 150;

/// Which announcements are listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementFilter {
    #[default]
    All,
    #[serde(untagged)]
    Kind(AnnouncementKind),
}

impl AnnouncementFilter {
    pub fn matches(self, kind: AnnouncementKind) -> bool {
        match self {
            AnnouncementFilter::All => true,
            AnnouncementFilter::Kind(wanted) => wanted == kind,
        }
    }
}

impl fmt::Display for AnnouncementFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnouncementFilter::All => f.write_str("all"),
            AnnouncementFilter::Kind(kind) => kind.fmt(f),
        }
    }
}

impl FromStr for AnnouncementFilter {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(AnnouncementFilter::All),
            other => other.parse().map(AnnouncementFilter::Kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    pub index: usize,
    pub date: String,
    pub title: String,
    pub content: String,
    pub kind: AnnouncementKind,
    pub priority: Priority,
    pub revealed: bool,
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementsView {
    pub phase: RevealPhase,
    pub filter: AnnouncementFilter,
    pub expanded: Option<usize>,
    /// Cards passing the filter, in content order
    pub cards: Vec<CardView>,
}

#[derive(Debug)]
pub struct AnnouncementsSection {
    announcements: Vec<Announcement>,
    filter: AnnouncementFilter,
    expanded: Option<usize>,
    reveal: RevealSequencer,
    notifier: Notifier,
}

impl AnnouncementsSection {
    pub fn mount(content: &SiteContent, ctx: &MountContext) -> Self {
        let announcements = content.announcements.clone();
        let reveal = observed_reveal(
            RevealConfig::new(Section::Announcements.id(), announcements.len(), CARD_DELAY_MS, THRESHOLD),
            &[],
            ctx,
        );

        Self {
            announcements,
            filter: AnnouncementFilter::default(),
            expanded: None,
            reveal,
            notifier: ctx.notifier.clone(),
        }
    }

    /// Show only announcements matching `filter`.
    ///
    /// Reveal state is per card and unaffected by filtering. An expanded card
    /// that no longer passes the filter is collapsed.
    pub fn set_filter(&mut self, filter: AnnouncementFilter) {
        if self.filter == filter {
            return;
        }
        info!("Announcement filter: {} -> {}", self.filter, filter);
        self.filter = filter;
        if let Some(index) = self.expanded {
            if !self.is_listed(index) {
                self.expanded = None;
            }
        }
        self.notifier.notify();
    }

    /// Whether card `index` exists and passes the current filter
    fn is_listed(&self, index: usize) -> bool {
        self.announcements
            .get(index)
            .is_some_and(|announcement| self.filter.matches(announcement.kind))
    }

    /// Expand card `index`, or collapse it when it is already expanded.
    ///
    /// Only listed cards can be toggled. Returns the expanded card after the
    /// toggle.
    pub fn toggle_expanded(&mut self, index: usize) -> Result<Option<usize>, StageError> {
        if !self.is_listed(index) {
            return Err(StageError::UnknownAnnouncement(index));
        }

        self.expanded = if self.expanded == Some(index) {
            None
        } else {
            Some(index)
        };
        self.notifier.notify();
        Ok(self.expanded)
    }

    pub fn snapshot(&self) -> AnnouncementsView {
        let revealed = self.reveal.activated();
        AnnouncementsView {
            phase: self.reveal.phase(),
            filter: self.filter,
            expanded: self.expanded,
            cards: self
                .announcements
                .iter()
                .zip(revealed)
                .enumerate()
                .filter(|(_, (announcement, _))| self.filter.matches(announcement.kind))
                .map(|(index, (announcement, revealed))| CardView {
                    index,
                    date: announcement.date.clone(),
                    title: announcement.title.clone(),
                    content: announcement.content.clone(),
                    kind: announcement.kind,
                    priority: announcement.priority,
                    revealed,
                    expanded: self.expanded == Some(index),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{NoViewport, TokioScheduler};
    use std::sync::Arc;

    fn mounted() -> AnnouncementsSection {
        let ctx = MountContext {
            scheduler: Arc::new(TokioScheduler::current()),
            viewport: Arc::new(NoViewport),
            notifier: Notifier::new(),
        };
        AnnouncementsSection::mount(&SiteContent::default(), &ctx)
    }

    #[tokio::test(start_paused = true)]
    async fn hidden_cards_cannot_be_expanded() {
        let mut section = mounted();
        section.set_filter(AnnouncementFilter::Kind(AnnouncementKind::Security));

        assert!(matches!(
            section.toggle_expanded(1),
            Err(StageError::UnknownAnnouncement(1))
        ));
        assert_eq!(section.snapshot().expanded, None);
        assert_eq!(section.toggle_expanded(3).unwrap(), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn filtering_out_the_expanded_card_collapses_it() {
        let mut section = mounted();
        assert_eq!(section.toggle_expanded(1).unwrap(), Some(1));

        section.set_filter(AnnouncementFilter::Kind(AnnouncementKind::Giveaway));
        assert_eq!(section.snapshot().expanded, Some(1));

        section.set_filter(AnnouncementFilter::Kind(AnnouncementKind::Security));
        let view = section.snapshot();
        assert_eq!(view.expanded, None);
        assert!(view.cards.iter().all(|card| !card.expanded));

        section.set_filter(AnnouncementFilter::All);
        assert_eq!(section.snapshot().expanded, None);
    }

    #[test]
    fn filter_parses_all_and_kinds() {
        assert_eq!("all".parse::<AnnouncementFilter>().unwrap(), AnnouncementFilter::All);
        assert_eq!(
            "partnership".parse::<AnnouncementFilter>().unwrap(),
            AnnouncementFilter::Kind(AnnouncementKind::Partnership)
        );
        assert!(AnnouncementFilter::All.matches(AnnouncementKind::Giveaway));
    }
}
