//! Configuration and CLI argument handling

use std::path::PathBuf;
use chrono::{DateTime, Utc};
use clap::Parser;

use crate::{content::SiteContent, error::StageError, state::Deadline};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "presale-stage")]
#[command(about = "Presentation state engine for a token-sale landing site")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// TOML file with the site content (built-in content when omitted)
    #[arg(short, long)]
    pub content: Option<PathBuf>,

    /// Countdown deadline as RFC 3339, overriding the content file
    #[arg(short, long)]
    pub deadline: Option<DateTime<Utc>>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Load the site content, applying the deadline override
    pub fn load_content(&self) -> Result<SiteContent, StageError> {
        let mut content = match &self.content {
            Some(path) => SiteContent::load(path)?,
            None => SiteContent::default(),
        };
        if let Some(deadline) = self.deadline {
            content.deadline = Deadline::new(deadline);
        }
        Ok(content)
    }
}
