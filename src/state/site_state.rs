//! Site-wide presentation state: the hosting surface that composes the
//! router with the mounted section

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use super::{Notifier, Section, SectionRouter};
use crate::{
    content::SiteContent,
    error::StageError,
    runtime::{ContainerId, Scheduler, Viewport},
    sections::{AnnouncementFilter, MountContext, MountedSection, SectionView},
    utils::lock,
};

/// One navigation entry as rendered in the header and mobile bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    pub id: String,
    pub label: String,
    pub active: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub active: Section,
    pub navigation: Vec<NavEntry>,
    pub view: SectionView,
    pub revision: u64,
    pub rendered_at: DateTime<Utc>,
}

/// Composition root of the presentation engine.
///
/// Holds the router, the static content and the currently mounted section.
/// Selecting a different section tears the old one down and mounts a fresh
/// one, so returning to a section replays its reveal.
#[derive(Debug)]
pub struct SiteState {
    router: SectionRouter,
    content: SiteContent,
    ctx: MountContext,
    mounted: Mutex<MountedSection>,
    pub start_time: Instant,
}

impl SiteState {
    /// Create the site on [`Section::Home`]
    pub fn new(
        content: SiteContent,
        scheduler: Arc<dyn Scheduler>,
        viewport: Arc<dyn Viewport>,
    ) -> Self {
        let notifier = Notifier::new();
        let ctx = MountContext {
            scheduler,
            viewport,
            notifier: notifier.clone(),
        };
        let router = SectionRouter::new(notifier);
        let mounted = MountedSection::mount(router.current(), &content, &ctx);

        Self {
            router,
            content,
            ctx,
            mounted: Mutex::new(mounted),
            start_time: Instant::now(),
        }
    }

    /// Activate `section`, remounting only if it changed
    pub fn select(&self, section: Section) {
        let mut mounted = lock(&self.mounted);
        if !self.router.select(section) {
            return;
        }

        let fresh = MountedSection::mount(section, &self.content, &self.ctx);
        let previous = std::mem::replace(&mut *mounted, fresh);
        drop(mounted);

        let container = ContainerId::new(previous.section().id());
        debug!("Tearing down section {}", previous.section());
        drop(previous);
        self.ctx.viewport.release(&container);
    }

    /// Activate a section by id
    pub fn select_id(&self, id: &str) -> Result<Section, StageError> {
        let section: Section = id.parse()?;
        self.select(section);
        Ok(section)
    }

    pub fn current(&self) -> Section {
        self.router.current()
    }

    /// Receiver that changes whenever anything renderable changes
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.ctx.notifier.subscribe()
    }

    /// Run `f` against the mounted section
    pub fn with_mounted<R>(&self, f: impl FnOnce(&mut MountedSection) -> R) -> R {
        f(&mut lock(&self.mounted))
    }

    /// Set the announcement filter; only valid while Announcements is mounted
    pub fn set_announcement_filter(&self, filter: &str) -> Result<AnnouncementFilter, StageError> {
        let filter: AnnouncementFilter = filter.parse()?;
        self.with_mounted(|mounted| match mounted {
            MountedSection::Announcements(announcements) => {
                announcements.set_filter(filter);
                Ok(filter)
            }
            other => Err(StageError::SectionNotMounted(other.section())),
        })
    }

    /// Toggle an announcement card; only valid while Announcements is mounted
    pub fn toggle_announcement(&self, index: usize) -> Result<Option<usize>, StageError> {
        self.with_mounted(|mounted| match mounted {
            MountedSection::Announcements(announcements) => announcements.toggle_expanded(index),
            other => Err(StageError::SectionNotMounted(other.section())),
        })
    }

    /// Capture the current renderable state
    pub fn snapshot(&self) -> ViewSnapshot {
        let revision = self.ctx.notifier.revision();
        let view = lock(&self.mounted).snapshot();
        let active = self.router.current();

        ViewSnapshot {
            active,
            navigation: Section::ALL
                .into_iter()
                .map(|section| NavEntry {
                    id: section.id().to_string(),
                    label: section.label().to_string(),
                    active: section == active,
                })
                .collect(),
            view,
            revision,
            rendered_at: Utc::now(),
        }
    }

    /// Calculate host uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
