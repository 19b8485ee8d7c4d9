//! Detail session tests against the in-memory API with paused time

use crate::support::{
    broken_links, record_with_broken, record_with_status, Calls, FakeApi, WAIT,
};
use crawl_deck::detail::{DetailSession, DetailSettings};
use crawl_deck::model::{BrokenLinksField, CrawlStatus, RecordId};
use crawl_deck::poll::{LoadState, Severity};
use crawl_deck::CrawlApi;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

async fn mount(api: &Arc<FakeApi>, id: i64) -> DetailSession {
    let session = DetailSession::mount(
        Arc::clone(api) as Arc<dyn CrawlApi>,
        RecordId::Number(id),
        DetailSettings {
            poll_interval: Duration::from_secs(2),
        },
    );
    timeout(
        WAIT,
        session.wait_until(|c| c.load_state().is_resolved() && !c.broken_loading()),
    )
    .await
    .expect("detail load never resolved");
    session
}

#[tokio::test(start_paused = true)]
async fn test_broken_link_count_triggers_single_follow_up() {
    let api = FakeApi::with_records(vec![record_with_broken(7, BrokenLinksField::Count(3))]);
    api.set_broken_links(7, broken_links(7, 3));
    let session = mount(&api, 7).await;

    assert_eq!(Calls::get(&api.calls.detail), 1);
    assert_eq!(Calls::get(&api.calls.broken), 1);
    session.read(|c| {
        assert_eq!(c.broken_link_count(), 3);
        assert_eq!(c.broken_links().unwrap().len(), 3);
        assert!(c.broken_error().is_none());
    });

    // Done records are not polled, so no further follow-ups happen
    sleep(Duration::from_secs(10)).await;
    assert_eq!(Calls::get(&api.calls.detail), 1);
    assert_eq!(Calls::get(&api.calls.broken), 1);
}

#[tokio::test(start_paused = true)]
async fn test_embedded_broken_links_need_no_follow_up() {
    let links = broken_links(8, 2);
    let api = FakeApi::with_records(vec![record_with_broken(8, BrokenLinksField::List(links))]);
    let session = mount(&api, 8).await;

    assert_eq!(Calls::get(&api.calls.broken), 0);
    session.read(|c| {
        assert_eq!(c.broken_link_count(), 2);
        assert_eq!(c.broken_links().unwrap().len(), 2);
        assert_eq!(
            c.record().unwrap().broken_links,
            BrokenLinksField::Count(2)
        );
    });
}

#[tokio::test(start_paused = true)]
async fn test_zero_broken_links_need_no_follow_up() {
    let api = FakeApi::with_records(vec![record_with_broken(9, BrokenLinksField::Count(0))]);
    let session = mount(&api, 9).await;

    assert_eq!(Calls::get(&api.calls.broken), 0);
    assert_eq!(session.read(|c| c.broken_links().map(<[_]>::len)), Some(0));
}

#[tokio::test(start_paused = true)]
async fn test_polls_running_record_until_done() {
    let api = FakeApi::with_records(vec![record_with_status(3, CrawlStatus::Running)]);
    let session = mount(&api, 3).await;
    assert!(session.read(|c| c.needs_poll()));

    sleep(Duration::from_millis(2100)).await;
    assert_eq!(Calls::get(&api.calls.detail), 2);

    api.set_status(3, CrawlStatus::Done);
    sleep(Duration::from_millis(2100)).await;
    assert_eq!(Calls::get(&api.calls.detail), 3);
    assert_eq!(session.read(|c| c.status()), Some(CrawlStatus::Done));

    sleep(Duration::from_secs(10)).await;
    assert_eq!(Calls::get(&api.calls.detail), 3);
}

#[tokio::test(start_paused = true)]
async fn test_rerun_flips_status_before_response() {
    let api = FakeApi::with_records(vec![record_with_status(4, CrawlStatus::Error)]);
    let session = mount(&api, 4).await;
    assert!(!session.read(|c| c.needs_poll()));

    let gate = api.gate_start();
    let (outcome, ()) = tokio::join!(session.rerun(), async {
        // The start request is still held at the gate here
        assert_eq!(Calls::get(&api.calls.start), 1);
        assert_eq!(session.read(|c| c.status()), Some(CrawlStatus::Running));
        assert!(session.read(|c| c.needs_poll()));
        gate.notify_one();
    });

    outcome.unwrap();
    assert_eq!(
        session.read(|c| c.notice().map(|n| n.severity)),
        Some(Severity::Info)
    );

    // Polling resumes after the reload and reads the server-side status
    sleep(Duration::from_millis(2100)).await;
    assert_eq!(Calls::get(&api.calls.detail), 3);
    assert_eq!(session.read(|c| c.status()), Some(CrawlStatus::Running));
}

#[tokio::test(start_paused = true)]
async fn test_accepted_rerun_reloads_detail_immediately() {
    let api = FakeApi::with_records(vec![record_with_status(4, CrawlStatus::Error)]);
    let session = mount(&api, 4).await;
    assert_eq!(Calls::get(&api.calls.detail), 1);

    session.rerun().await.unwrap();

    assert_eq!(Calls::get(&api.calls.detail), 2);
    session.read(|c| {
        assert_eq!(c.load_state(), LoadState::Settled);
        assert_eq!(c.status(), Some(CrawlStatus::Running));
    });
}

#[tokio::test(start_paused = true)]
async fn test_rerun_recovers_view_after_failed_load() {
    let api = FakeApi::with_records(vec![]);
    let session = mount(&api, 3).await;
    assert_eq!(session.read(|c| c.load_state()), LoadState::Error);

    api.set_records(vec![record_with_status(3, CrawlStatus::Error)]);
    session.rerun().await.unwrap();

    assert_eq!(Calls::get(&api.calls.start), 1);
    session.read(|c| {
        assert_eq!(c.load_state(), LoadState::Settled);
        assert!(c.record().is_some());
        assert_eq!(c.status(), Some(CrawlStatus::Running));
        assert!(c.needs_poll());
    });

    // The reloaded running record keeps the view polling
    sleep(Duration::from_millis(2100)).await;
    assert_eq!(Calls::get(&api.calls.detail), 3);
}

#[tokio::test(start_paused = true)]
async fn test_failed_rerun_keeps_flip_and_raises_notice() {
    let api = FakeApi::with_records(vec![record_with_status(5, CrawlStatus::Error)]);
    let session = mount(&api, 5).await;

    api.fail_mutations(true);
    assert!(session.rerun().await.is_err());

    session.read(|c| {
        assert_eq!(c.status(), Some(CrawlStatus::Running));
        assert!(c.notice().unwrap().is_error());
    });

    // The next poll corrects the optimistic status
    sleep(Duration::from_millis(2100)).await;
    assert_eq!(session.read(|c| c.status()), Some(CrawlStatus::Error));
}

#[tokio::test(start_paused = true)]
async fn test_failed_reload_keeps_prior_detail() {
    let api = FakeApi::with_records(vec![record_with_status(6, CrawlStatus::Done)]);
    let session = mount(&api, 6).await;

    api.remove(6);
    assert!(session.refresh().await);

    session.read(|c| {
        assert_eq!(c.load_state(), LoadState::Error);
        assert!(c.error().unwrap().contains("URL not found"));
        assert_eq!(c.status(), Some(CrawlStatus::Done));
    });
}

#[tokio::test(start_paused = true)]
async fn test_missing_record_reports_error() {
    let api = FakeApi::with_records(vec![]);
    let session = mount(&api, 42).await;

    session.read(|c| {
        assert_eq!(c.load_state(), LoadState::Error);
        assert!(c.record().is_none());
        assert!(!c.needs_poll());
    });
}

#[tokio::test(start_paused = true)]
async fn test_unmount_stops_detail_polling() {
    let api = FakeApi::with_records(vec![record_with_status(2, CrawlStatus::Queued)]);
    let session = mount(&api, 2).await;

    drop(session);
    sleep(Duration::from_secs(10)).await;
    assert_eq!(Calls::get(&api.calls.detail), 1);
}
