//! List session tests against the in-memory API with paused time

use crate::support::{done_record, record_with_status, Calls, FakeApi, WAIT};
use crawl_deck::model::{CrawlStatus, RecordId};
use crawl_deck::poll::{ListSession, ListSettings, LoadState, Severity};
use crawl_deck::{ApiError, CrawlApi};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

fn settings(page_size: usize) -> ListSettings {
    ListSettings {
        page_size,
        poll_interval: Duration::from_secs(5),
    }
}

async fn mount(api: &Arc<FakeApi>, page_size: usize) -> ListSession {
    let session = ListSession::mount(Arc::clone(api) as Arc<dyn CrawlApi>, settings(page_size));
    timeout(WAIT, session.wait_until(|c| c.load_state().is_resolved()))
        .await
        .expect("initial load never resolved");
    session
}

#[tokio::test(start_paused = true)]
async fn test_initial_load_without_active_jobs_does_not_poll() {
    let api = FakeApi::with_records(vec![done_record(1, "Alpha"), done_record(2, "Beta")]);
    let session = mount(&api, 10).await;

    assert_eq!(session.read(|c| c.load_state()), LoadState::Settled);
    assert_eq!(session.read(|c| c.view().records().len()), 2);

    sleep(Duration::from_secs(30)).await;
    assert_eq!(Calls::get(&api.calls.list), 1);
}

#[tokio::test(start_paused = true)]
async fn test_polls_while_queued_and_stops_when_done() {
    let api = FakeApi::with_records(vec![
        done_record(1, "Alpha"),
        record_with_status(2, CrawlStatus::Queued),
    ]);
    let session = mount(&api, 10).await;
    assert!(session.read(|c| c.needs_poll()));
    assert_eq!(Calls::get(&api.calls.list), 1);

    sleep(Duration::from_millis(5100)).await;
    assert_eq!(Calls::get(&api.calls.list), 2);

    api.set_status(2, CrawlStatus::Done);
    sleep(Duration::from_millis(5100)).await;
    assert_eq!(Calls::get(&api.calls.list), 3);
    assert!(!session.read(|c| c.needs_poll()));

    sleep(Duration::from_secs(30)).await;
    assert_eq!(Calls::get(&api.calls.list), 3);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_status_is_not_polled() {
    let api = FakeApi::with_records(vec![record_with_status(1, CrawlStatus::Unknown)]);
    let _session = mount(&api, 10).await;

    sleep(Duration::from_secs(30)).await;
    assert_eq!(Calls::get(&api.calls.list), 1);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_refreshes_apply_only_the_latest() {
    let api = FakeApi::with_records(vec![done_record(1, "Old")]);
    let session = mount(&api, 10).await;

    // First refresh answers slowly with the old snapshot, second answers at once
    api.queue_list_delays([Duration::from_millis(500), Duration::ZERO]);
    let (first, second) = tokio::join!(session.refresh(), async {
        api.set_records(vec![done_record(1, "New"), done_record(2, "Added")]);
        session.refresh().await
    });

    assert!(!first);
    assert!(second);
    let titles = session.read(|c| {
        c.view()
            .records()
            .iter()
            .map(|r| r.title.clone())
            .collect::<Vec<_>>()
    });
    assert_eq!(titles, vec!["New".to_string(), "Added".to_string()]);
    assert_eq!(session.read(|c| c.load_state()), LoadState::Settled);
}

#[tokio::test(start_paused = true)]
async fn test_failed_refresh_keeps_rows_and_reports_error() {
    let api = FakeApi::with_records(vec![done_record(1, "Alpha"), done_record(2, "Beta")]);
    let session = mount(&api, 10).await;

    api.fail_list(true);
    assert!(session.refresh().await);

    session.read(|c| {
        assert_eq!(c.load_state(), LoadState::Error);
        assert!(c.error().unwrap().contains("database unavailable"));
        assert_eq!(c.view().records().len(), 2);
    });

    api.fail_list(false);
    session.refresh().await;
    assert!(session.read(|c| c.error().is_none()));
}

#[tokio::test(start_paused = true)]
async fn test_bulk_delete_on_last_page_clamps_page() {
    let records = (1..=12)
        .map(|i| done_record(i, &format!("Page {:02}", i)))
        .collect();
    let api = FakeApi::with_records(records);
    let session = mount(&api, 10).await;

    session.update(|view| {
        view.set_page(1);
        assert!(view.set_selected(&RecordId::Number(11), true));
        assert!(view.set_selected(&RecordId::Number(12), true));
    });
    assert_eq!(session.read(|c| c.view().visible_page().len()), 2);

    session.delete_selected().await.unwrap();

    assert_eq!(Calls::get(&api.calls.bulk_delete), 1);
    session.read(|c| {
        let view = c.view();
        assert_eq!(view.records().len(), 10);
        assert_eq!(view.page(), 0);
        assert_eq!(view.page_count(), 1);
        assert!(view.selection().is_empty());
        assert_eq!(c.notice().unwrap().severity, Severity::Success);
    });
}

#[tokio::test(start_paused = true)]
async fn test_bulk_actions_with_empty_selection_are_noops() {
    let api = FakeApi::with_records(vec![done_record(1, "Alpha")]);
    let session = mount(&api, 10).await;

    session.delete_selected().await.unwrap();
    session.rerun_selected().await.unwrap();

    assert_eq!(Calls::get(&api.calls.bulk_delete), 0);
    assert_eq!(Calls::get(&api.calls.bulk_rerun), 0);
    assert_eq!(Calls::get(&api.calls.list), 1);
    assert!(session.read(|c| c.notice().is_none()));
}

#[tokio::test(start_paused = true)]
async fn test_bulk_rerun_refreshes_and_resumes_polling() {
    let api = FakeApi::with_records(vec![done_record(1, "Alpha"), done_record(2, "Beta")]);
    let session = mount(&api, 10).await;

    session.update(|view| view.select_page(true));
    session.rerun_selected().await.unwrap();

    assert_eq!(Calls::get(&api.calls.list), 2);
    assert!(session.read(|c| c.needs_poll()));
    assert_eq!(session.read(|c| c.view().selection().len()), 2);

    sleep(Duration::from_millis(5100)).await;
    assert_eq!(Calls::get(&api.calls.list), 3);
}

#[tokio::test(start_paused = true)]
async fn test_failed_delete_leaves_list_untouched() {
    let api = FakeApi::with_records(vec![done_record(1, "Alpha"), done_record(2, "Beta")]);
    let session = mount(&api, 10).await;
    session.update(|view| view.set_selected(&RecordId::Number(1), true));

    api.fail_mutations(true);
    let err = session.delete(&RecordId::Number(1)).await.unwrap_err();
    assert_eq!(err.status(), Some(500));

    session.read(|c| {
        assert_eq!(c.view().records().len(), 2);
        assert!(c.view().selection().contains(&RecordId::Number(1)));
        let notice = c.notice().unwrap();
        assert!(notice.is_error());
        assert!(notice.message.contains("database unavailable"));
    });
    // No refetch after a failed mutation
    assert_eq!(Calls::get(&api.calls.list), 1);

    assert!(session.dismiss_notice().is_some());
    assert!(session.read(|c| c.notice().is_none()));
}

#[tokio::test(start_paused = true)]
async fn test_create_rejects_invalid_input_without_request() {
    let api = FakeApi::with_records(vec![]);
    let session = mount(&api, 10).await;

    let err = session.create("   ").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidRequest(_)));
    assert!(session.create("not a url").await.is_err());

    assert_eq!(Calls::get(&api.calls.create), 0);
    assert!(session.read(|c| c.notice().unwrap().is_error()));
}

#[tokio::test(start_paused = true)]
async fn test_create_submits_trimmed_url_and_refreshes() {
    let api = FakeApi::with_records(vec![done_record(1, "Alpha")]);
    let session = mount(&api, 10).await;

    let created = session
        .create("  https://new.example/page  ")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.url, "https://new.example/page");

    assert_eq!(Calls::get(&api.calls.list), 2);
    session.read(|c| {
        assert_eq!(c.view().records().len(), 2);
        assert!(c.needs_poll());
        assert_eq!(c.notice().unwrap().severity, Severity::Success);
    });
}

#[tokio::test(start_paused = true)]
async fn test_start_and_stop_refresh_list() {
    let api = FakeApi::with_records(vec![done_record(1, "Alpha")]);
    let session = mount(&api, 10).await;

    session.start(&RecordId::Number(1)).await.unwrap();
    assert_eq!(
        session.read(|c| c.view().records()[0].status),
        CrawlStatus::Running
    );

    session.stop(&RecordId::Number(1)).await.unwrap();
    assert_eq!(
        session.read(|c| c.view().records()[0].status),
        CrawlStatus::Error
    );
    assert_eq!(Calls::get(&api.calls.list), 3);
}

#[tokio::test(start_paused = true)]
async fn test_unmount_stops_polling() {
    let api = FakeApi::with_records(vec![record_with_status(1, CrawlStatus::Running)]);
    let session = mount(&api, 10).await;

    session.unmount();
    sleep(Duration::from_secs(30)).await;
    assert_eq!(Calls::get(&api.calls.list), 1);
}

#[tokio::test(start_paused = true)]
async fn test_filters_and_sort_apply_to_loaded_rows() {
    let mut with_login = done_record(3, "Login page");
    with_login.has_login_form = true;
    let api = FakeApi::with_records(vec![
        done_record(1, "beta"),
        done_record(2, "Alpha"),
        with_login,
    ]);
    let session = mount(&api, 10).await;

    let titles = |session: &ListSession| {
        session.read(|c| {
            c.view()
                .visible_page()
                .iter()
                .map(|r| r.title.clone())
                .collect::<Vec<_>>()
        })
    };
    assert_eq!(titles(&session), vec!["Alpha", "beta", "Login page"]);

    session.update(|view| view.toggle_sort(crawl_deck::SortKey::Title));
    assert_eq!(titles(&session), vec!["Login page", "beta", "Alpha"]);

    session.update(|view| view.set_search("LOGIN"));
    assert_eq!(titles(&session), vec!["Login page"]);
}
