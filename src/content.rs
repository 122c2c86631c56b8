//! Static site content
//!
//! Content is loaded once at startup and handed to each section when it is
//! mounted; nothing here changes at runtime.

use std::{fmt, path::Path, str::FromStr};
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::StageError, state::Deadline};

/// One slice of the token allocation table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub label: String,
    pub value: String,
    pub percentage: u8,
}

/// Completion status of a roadmap phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseStatus {
    Completed,
    Active,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    pub phase: String,
    pub status: PhaseStatus,
    pub items: Vec<String>,
    pub progress: u8,
}

/// Category of an announcement, also used as a list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementKind {
    Important,
    Giveaway,
    Partnership,
    Security,
}

impl AnnouncementKind {
    pub const ALL: [AnnouncementKind; 4] = [
        AnnouncementKind::Important,
        AnnouncementKind::Giveaway,
        AnnouncementKind::Partnership,
        AnnouncementKind::Security,
    ];

    pub fn id(self) -> &'static str {
        match self {
            AnnouncementKind::Important => "important",
            AnnouncementKind::Giveaway => "giveaway",
            AnnouncementKind::Partnership => "partnership",
            AnnouncementKind::Security => "security",
        }
    }
}

impl fmt::Display for AnnouncementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AnnouncementKind {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnnouncementKind::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| StageError::UnknownFilter(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub date: String,
    pub title: String,
    pub content: String,
    pub kind: AnnouncementKind,
    pub priority: Priority,
}

/// Funding progress shown on the presale section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresaleContent {
    pub progress: u8,
    pub raised: String,
    pub goal: String,
}

/// Everything the sections display that is not layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteContent {
    pub deadline: Deadline,
    pub presale: PresaleContent,
    #[serde(default)]
    pub tokenomics: Vec<Allocation>,
    #[serde(default)]
    pub roadmap: Vec<RoadmapPhase>,
    #[serde(default)]
    pub announcements: Vec<Announcement>,
}

impl SiteContent {
    /// Load content from a TOML file
    pub fn load(path: &Path) -> Result<Self, StageError> {
        let raw = std::fs::read_to_string(path).map_err(|source| StageError::ContentRead {
            path: path.to_path_buf(),
            source,
        })?;
        let content: SiteContent = toml::from_str(&raw).map_err(|source| StageError::ContentParse {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            "Loaded content from {}: {} allocations, {} roadmap phases, {} announcements",
            path.display(),
            content.tokenomics.len(),
            content.roadmap.len(),
            content.announcements.len()
        );
        Ok(content)
    }
}

fn allocation(label: &str, value: &str, percentage: u8) -> Allocation {
    Allocation {
        label: label.to_string(),
        value: value.to_string(),
        percentage,
    }
}

fn phase(name: &str, status: PhaseStatus, items: [&str; 4], progress: u8) -> RoadmapPhase {
    RoadmapPhase {
        phase: name.to_string(),
        status,
        items: items.iter().map(|item| item.to_string()).collect(),
        progress,
    }
}

fn announcement(
    date: &str,
    title: &str,
    content: &str,
    kind: AnnouncementKind,
    priority: Priority,
) -> Announcement {
    Announcement {
        date: date.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        kind,
        priority,
    }
}

impl Default for SiteContent {
    fn default() -> Self {
        let deadline = Utc
            .with_ymd_and_hms(2025, 10, 5, 23, 59, 59)
            .single()
            .unwrap_or_else(Utc::now);

        Self {
            deadline: Deadline::new(deadline),
            presale: PresaleContent {
                progress: 67,
                raised: "$2.8M".to_string(),
                goal: "$4.2M".to_string(),
            },
            tokenomics: vec![
                allocation("Total Supply", "1,000,000,000 LAST", 100),
                allocation("Presale", "400,000,000 LAST", 40),
                allocation("Liquidity Pool", "300,000,000 LAST", 30),
                allocation("Marketing & Development", "150,000,000 LAST", 15),
                allocation("Team & Advisors", "100,000,000 LAST", 10),
                allocation("Community Rewards", "50,000,000 LAST", 5),
            ],
            roadmap: vec![
                phase(
                    "Phase 1: Launch",
                    PhaseStatus::Completed,
                    ["Website Launch", "Smart Contract Deployment", "Community Building", "Initial Marketing"],
                    100,
                ),
                phase(
                    "Phase 2: Presale",
                    PhaseStatus::Active,
                    ["Presale Launch", "KOL Partnerships", "Giveaway Campaigns", "Audit Completion"],
                    75,
                ),
                phase(
                    "Phase 3: Exchange",
                    PhaseStatus::Upcoming,
                    ["DEX Listing", "CEX Applications", "Staking Platform", "Mobile App Beta"],
                    0,
                ),
                phase(
                    "Phase 4: Expansion",
                    PhaseStatus::Upcoming,
                    ["Major Exchange Listings", "NFT Collection", "DeFi Integrations", "Global Marketing"],
                    0,
                ),
            ],
            announcements: vec![
                announcement(
                    "Sept 18, 2025",
                    "Presale Phase 2 Now Live!",
                    "The second phase of our presale is officially live. Get your LAST tokens before the price increases!",
                    AnnouncementKind::Important,
                    Priority::High,
                ),
                announcement(
                    "Sept 15, 2025",
                    "10,000 LAST Giveaway Winners Announced",
                    "Congratulations to all winners of our community giveaway! Check your wallets.",
                    AnnouncementKind::Giveaway,
                    Priority::Medium,
                ),
                announcement(
                    "Sept 12, 2025",
                    "Partnership with CryptoInfluencer",
                    "We're excited to announce our partnership with top crypto influencers for maximum exposure.",
                    AnnouncementKind::Partnership,
                    Priority::Medium,
                ),
                announcement(
                    "Sept 10, 2025",
                    "Smart Contract Audit Completed",
                    "Our smart contract has passed security audit with flying colors. Safety guaranteed!",
                    AnnouncementKind::Security,
                    Priority::High,
                ),
            ],
        }
    }
}
