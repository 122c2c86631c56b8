use std::{sync::Arc, time::Duration};

use chrono::Utc;
use presale_stage::{
    content::SiteContent,
    runtime::{ContainerId, NoViewport, SharedViewport, TokioScheduler},
    sections::SectionView,
    state::{Deadline, RevealPhase, Section, SiteState},
    StageError,
};
use tokio::time::sleep;

fn site_with(content: SiteContent) -> (SiteState, SharedViewport) {
    let viewport = SharedViewport::new();
    let site = SiteState::new(
        content,
        Arc::new(TokioScheduler::current()),
        Arc::new(viewport.clone()),
    );
    (site, viewport)
}

fn site() -> (SiteState, SharedViewport) {
    site_with(SiteContent::default())
}

fn scroll_to(viewport: &SharedViewport, section: Section, ratio: f64) -> usize {
    viewport.report(&ContainerId::new(section.id()), ratio)
}

#[tokio::test(start_paused = true)]
async fn home_is_mounted_with_running_countdown() {
    let mut content = SiteContent::default();
    content.deadline = Deadline::new(Utc::now() + chrono::Duration::seconds(90_061));
    let (site, _) = site_with(content);

    assert_eq!(site.current(), Section::Home);
    let snapshot = site.snapshot();
    assert!(snapshot.navigation.iter().any(|nav| nav.id == "home" && nav.active));

    match snapshot.view {
        SectionView::Home(home) => {
            assert_eq!(home.remaining.days, 1);
            assert_eq!(home.remaining.hours, 1);
            assert_eq!(home.remaining.minutes, 1);
            assert!(!home.ended);
        }
        other => panic!("expected home view, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn past_deadline_shows_zero_countdown() {
    let mut content = SiteContent::default();
    content.deadline = Deadline::new(Utc::now() - chrono::Duration::days(3));
    let (site, _) = site_with(content);

    sleep(Duration::from_secs(3)).await;
    match site.snapshot().view {
        SectionView::Home(home) => {
            assert!(home.remaining.is_zero());
            assert!(home.ended);
        }
        other => panic!("expected home view, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn presale_bar_fills_after_half_a_second_of_visibility() {
    let (site, viewport) = site();
    site.select(Section::Presale);

    let progress = |site: &SiteState| match site.snapshot().view {
        SectionView::Presale(view) => view,
        other => panic!("expected presale view, got {:?}", other),
    };

    sleep(Duration::from_secs(5)).await;
    assert_eq!(progress(&site).phase, RevealPhase::Dormant);
    assert_eq!(progress(&site).progress.displayed, 0);

    assert_eq!(scroll_to(&viewport, Section::Presale, 0.5), 1);
    assert_eq!(progress(&site).phase, RevealPhase::Triggered);

    sleep(Duration::from_millis(499)).await;
    assert_eq!(progress(&site).progress.displayed, 0);
    sleep(Duration::from_millis(2)).await;
    assert_eq!(progress(&site).progress.displayed, 67);
    assert!(progress(&site).progress.started);
}

#[tokio::test(start_paused = true)]
async fn tokenomics_bars_follow_their_rows() {
    let (site, viewport) = site();
    site.select(Section::Tokenomics);
    scroll_to(&viewport, Section::Tokenomics, 0.3);

    let view = |site: &SiteState| match site.snapshot().view {
        SectionView::Tokenomics(view) => view,
        other => panic!("expected tokenomics view, got {:?}", other),
    };

    sleep(Duration::from_millis(1)).await;
    let first = view(&site);
    assert!(first.allocations[0].revealed);
    assert_eq!(first.allocations[0].bar.displayed, 100);
    assert!(!first.allocations[1].revealed);
    assert_eq!(first.allocations[1].bar.displayed, 0);

    sleep(Duration::from_millis(200)).await; // t = 201
    let second = view(&site);
    assert!(second.allocations[1].revealed);
    assert_eq!(second.allocations[1].bar.displayed, 40);
    assert!(!second.allocations[2].revealed);

    sleep(Duration::from_secs(2)).await;
    let done = view(&site);
    assert!(done.allocations.iter().all(|row| row.revealed));
    assert!(done.allocations.iter().all(|row| row.bar.displayed == row.bar.target));
}

#[tokio::test(start_paused = true)]
async fn roadmap_bar_lags_its_phase() {
    let (site, viewport) = site();
    site.select(Section::Roadmap);

    // Below the roadmap threshold of 0.2
    assert_eq!(scroll_to(&viewport, Section::Roadmap, 0.1), 0);
    assert_eq!(scroll_to(&viewport, Section::Roadmap, 0.2), 1);

    let view = |site: &SiteState| match site.snapshot().view {
        SectionView::Roadmap(view) => view,
        other => panic!("expected roadmap view, got {:?}", other),
    };

    sleep(Duration::from_millis(201)).await;
    let roadmap = view(&site);
    let phase_two = &roadmap.phases[1];
    assert!(phase_two.revealed);
    assert_eq!(phase_two.bar.displayed, 0);

    sleep(Duration::from_millis(300)).await; // t = 501
    assert_eq!(view(&site).phases[1].bar.displayed, 75);
}

#[tokio::test(start_paused = true)]
async fn leaving_a_section_cancels_its_pending_work() {
    let (site, viewport) = site();
    site.select(Section::Announcements);
    scroll_to(&viewport, Section::Announcements, 1.0);
    sleep(Duration::from_millis(160)).await;

    site.select(Section::Roadmap);
    let revision = site.snapshot().revision;

    sleep(Duration::from_secs(2)).await;
    assert_eq!(site.snapshot().revision, revision);
    match site.snapshot().view {
        SectionView::Roadmap(view) => assert_eq!(view.phase, RevealPhase::Dormant),
        other => panic!("expected roadmap view, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn returning_to_a_section_mounts_it_fresh() {
    let (site, viewport) = site();
    site.select(Section::Presale);
    scroll_to(&viewport, Section::Presale, 0.5);
    sleep(Duration::from_secs(1)).await;

    site.select(Section::Home);
    site.select(Section::Presale);
    assert_eq!(viewport.ratio(&ContainerId::new(Section::Presale.id())), 0.0);

    match site.snapshot().view {
        SectionView::Presale(view) => {
            assert_eq!(view.phase, RevealPhase::Dormant);
            assert_eq!(view.progress.displayed, 0);
        }
        other => panic!("expected presale view, got {:?}", other),
    }

    // A fresh visibility report is needed to replay the reveal
    assert_eq!(scroll_to(&viewport, Section::Presale, 0.5), 1);
    sleep(Duration::from_millis(501)).await;
    match site.snapshot().view {
        SectionView::Presale(view) => assert_eq!(view.progress.displayed, 67),
        other => panic!("expected presale view, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn reselecting_the_active_section_keeps_its_state() {
    let (site, viewport) = site();
    site.select(Section::Presale);
    scroll_to(&viewport, Section::Presale, 0.5);
    sleep(Duration::from_secs(1)).await;

    site.select(Section::Presale);
    match site.snapshot().view {
        SectionView::Presale(view) => assert_eq!(view.progress.displayed, 67),
        other => panic!("expected presale view, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn host_without_viewport_reveals_everything() {
    let site = SiteState::new(
        SiteContent::default(),
        Arc::new(TokioScheduler::current()),
        Arc::new(NoViewport),
    );
    site.select(Section::Announcements);
    sleep(Duration::from_secs(1)).await;

    match site.snapshot().view {
        SectionView::Announcements(view) => {
            assert_eq!(view.phase, RevealPhase::Triggered);
            assert!(view.cards.iter().all(|card| card.revealed));
        }
        other => panic!("expected announcements view, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn announcement_filter_and_expansion() {
    let (site, _) = site();

    assert!(matches!(
        site.set_announcement_filter("security"),
        Err(StageError::SectionNotMounted(Section::Home))
    ));

    site.select(Section::Announcements);
    site.set_announcement_filter("security").unwrap();
    assert!(matches!(
        site.set_announcement_filter("rumors"),
        Err(StageError::UnknownFilter(_))
    ));

    assert_eq!(site.toggle_announcement(3).unwrap(), Some(3));
    assert_eq!(site.toggle_announcement(3).unwrap(), None);
    assert_eq!(site.toggle_announcement(3).unwrap(), Some(3));
    // Card 1 is a giveaway and hidden by the security filter
    assert!(matches!(
        site.toggle_announcement(1),
        Err(StageError::UnknownAnnouncement(1))
    ));
    assert!(matches!(
        site.toggle_announcement(9),
        Err(StageError::UnknownAnnouncement(9))
    ));

    match site.snapshot().view {
        SectionView::Announcements(view) => {
            assert_eq!(view.cards.len(), 1);
            assert_eq!(view.cards[0].index, 3);
            assert_eq!(view.cards[0].title, "Smart Contract Audit Completed");
        }
        other => panic!("expected announcements view, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn invalid_section_id_leaves_site_untouched() {
    let (site, _) = site();
    let err = site.select_id("staking").unwrap_err();
    assert!(matches!(err, StageError::InvalidSection(id) if id == "staking"));
    assert_eq!(site.current(), Section::Home);

    assert_eq!(site.select_id("roadmap").unwrap(), Section::Roadmap);
    assert_eq!(site.current(), Section::Roadmap);
}
