//! Content sections and the active-section router

use std::{fmt, str::FromStr, sync::Mutex};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::Notifier;
use crate::{error::StageError, utils::lock};

/// One of the fixed content views of the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Home,
    Tokenomics,
    Presale,
    Roadmap,
    Announcements,
}

impl Section {
    /// All sections in navigation order
    pub const ALL: [Section; 5] = [
        Section::Home,
        Section::Tokenomics,
        Section::Presale,
        Section::Roadmap,
        Section::Announcements,
    ];

    /// Stable lowercase identifier used in URLs and navigation
    pub fn id(self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Tokenomics => "tokenomics",
            Section::Presale => "presale",
            Section::Roadmap => "roadmap",
            Section::Announcements => "announcements",
        }
    }

    /// Navigation label
    pub fn label(self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::Tokenomics => "Tokenomics",
            Section::Presale => "Presale",
            Section::Roadmap => "Roadmap",
            Section::Announcements => "News",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Section {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.id() == s)
            .ok_or_else(|| StageError::InvalidSection(s.to_string()))
    }
}

/// Holds the active section; the only writer of it
#[derive(Debug)]
pub struct SectionRouter {
    active: Mutex<Section>,
    notifier: Notifier,
}

impl SectionRouter {
    /// Create a router starting on [`Section::Home`]
    pub fn new(notifier: Notifier) -> Self {
        Self {
            active: Mutex::new(Section::default()),
            notifier,
        }
    }

    /// Make `section` active and notify observers.
    ///
    /// Returns `true` when the active section changed. Selecting the
    /// already-active section is a no-op.
    pub fn select(&self, section: Section) -> bool {
        let mut active = lock(&self.active);
        if *active == section {
            debug!("Section {} already active", section);
            return false;
        }

        info!("Switching section: {} -> {}", *active, section);
        *active = section;
        drop(active);

        self.notifier.notify();
        true
    }

    /// Select a section by its id
    pub fn select_id(&self, id: &str) -> Result<bool, StageError> {
        let section = id.parse()?;
        Ok(self.select(section))
    }

    /// The active section
    pub fn current(&self) -> Section {
        *lock(&self.active)
    }
}
