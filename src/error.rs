//! Error types for the presentation engine

use std::path::PathBuf;

use crate::state::Section;

/// Errors surfaced by the engine and its content loading
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// A section id outside the fixed navigation set
    #[error("Invalid section: {0}")]
    InvalidSection(String),
    #[error("Section {0} is not mounted")]
    SectionNotMounted(Section),
    #[error("Unknown announcement filter: {0}")]
    UnknownFilter(String),
    #[error("No announcement at index {0}")]
    UnknownAnnouncement(usize),
    #[error("Failed to read content file {path}: {source}")]
    ContentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse content file {path}: {source}")]
    ContentParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
