//! Render loop that re-renders on every state change

use std::sync::Arc;
use tracing::{debug, info};

use crate::{sections::SectionView, state::{SiteState, ViewSnapshot}};

/// One-line textual rendering of a snapshot
pub fn render_line(snapshot: &ViewSnapshot) -> String {
    let body = match &snapshot.view {
        SectionView::Home(home) => format!("countdown {}", home.remaining),
        SectionView::Tokenomics(view) => format!(
            "{:?} rows={} bars=[{}]",
            view.phase,
            flags(view.allocations.iter().map(|a| a.revealed)),
            percents(view.allocations.iter().map(|a| (a.bar.displayed, a.bar.target))),
        ),
        SectionView::Presale(view) => format!(
            "{:?} funding {}%/{}% ({} of {})",
            view.phase, view.progress.displayed, view.progress.target, view.raised, view.goal
        ),
        SectionView::Roadmap(view) => format!(
            "{:?} phases={} bars=[{}]",
            view.phase,
            flags(view.phases.iter().map(|p| p.revealed)),
            percents(view.phases.iter().map(|p| (p.bar.displayed, p.bar.target))),
        ),
        SectionView::Announcements(view) => format!(
            "{:?} filter={} cards={} expanded={:?}",
            view.phase,
            view.filter,
            flags(view.cards.iter().map(|c| c.revealed)),
            view.expanded
        ),
    };
    format!("[{}] #{} {}", snapshot.active, snapshot.revision, body)
}

fn flags(values: impl Iterator<Item = bool>) -> String {
    values.map(|on| if on { '#' } else { '.' }).collect()
}

fn percents(values: impl Iterator<Item = (u8, u8)>) -> String {
    values
        .map(|(displayed, target)| format!("{}/{}", displayed, target))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Background task that renders a snapshot whenever the site changes
pub async fn render_task(state: Arc<SiteState>) {
    info!("Starting render task");
    let mut changes = state.subscribe();

    info!("{}", render_line(&state.snapshot()));
    while changes.changed().await.is_ok() {
        debug!("{}", render_line(&state.snapshot()));
    }
}
