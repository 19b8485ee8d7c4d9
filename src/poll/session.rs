//! Mounted list view with background polling
//!
//! A `ListSession` owns one [`ListController`] and a spawned poll task. The
//! task performs the initial fetch on mount, then re-fetches after the poll
//! interval for as long as any record is queued or running. User actions
//! (create, delete, start, stop, re-run) refresh immediately once the
//! mutation succeeds and restart the poll timer.
//!
//! State sits behind a `std::sync::Mutex` that is never held across an
//! `.await`; request ordering is enforced by fetch tickets, not by the lock.
//! Dropping the session closes the controller and aborts the poll task, so
//! nothing touches the view after it is gone.

use crate::api::CrawlApi;
use crate::config::Config;
use crate::model::{Record, RecordId};
use crate::poll::controller::ListController;
use crate::poll::state::Notice;
use crate::view::ListView;
use crate::{ApiError, ApiResult};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use url::Url;

/// Settings for a mounted list view
#[derive(Debug, Clone)]
pub struct ListSettings {
    pub page_size: usize,
    pub poll_interval: Duration,
}

impl ListSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            page_size: config.view.page_size,
            poll_interval: config.polling.list_interval(),
        }
    }
}

impl Default for ListSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// State shared between the session handle and its poll task
struct Shared {
    api: Arc<dyn CrawlApi>,
    controller: Mutex<ListController>,
    poll_interval: Duration,
    /// Restarts the poll timer after a fetch settles or on unmount
    wake: Notify,
    /// Bumped on every state change observers may care about
    revision: watch::Sender<u64>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ListController> {
        self.controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }

    /// Fetches the list and applies it unless a newer fetch started meanwhile
    async fn refresh(&self) -> bool {
        let ticket = {
            let mut controller = self.lock();
            if controller.is_closed() {
                return false;
            }
            controller.begin_fetch()
        };
        self.bump();

        let result = self.api.list_records().await;

        let applied = self.lock().apply_fetch(ticket, result);
        if applied {
            self.bump();
            self.wake.notify_one();
        }
        applied
    }
}

/// Background task: initial fetch, then timed re-fetches while jobs are active
async fn poll_loop(shared: Arc<Shared>) {
    shared.refresh().await;

    loop {
        let due = {
            let controller = shared.lock();
            if controller.is_closed() {
                break;
            }
            controller.needs_poll()
        };

        if due {
            tokio::select! {
                _ = tokio::time::sleep(shared.poll_interval) => {
                    tracing::debug!("Poll interval elapsed, refreshing list");
                    shared.refresh().await;
                }
                _ = shared.wake.notified() => {}
            }
        } else {
            shared.wake.notified().await;
        }
    }

    tracing::debug!("List poll task finished");
}

/// A mounted, self-refreshing record list
pub struct ListSession {
    shared: Arc<Shared>,
    poller: JoinHandle<()>,
}

impl ListSession {
    /// Mounts the view and starts polling
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(api: Arc<dyn CrawlApi>, settings: ListSettings) -> Self {
        let (revision, _) = watch::channel(0);
        let shared = Arc::new(Shared {
            api,
            controller: Mutex::new(ListController::new(settings.page_size)),
            poll_interval: settings.poll_interval,
            wake: Notify::new(),
            revision,
        });

        tracing::debug!(
            "Mounting list view (poll every {:?})",
            settings.poll_interval
        );
        let poller = tokio::spawn(poll_loop(Arc::clone(&shared)));

        Self { shared, poller }
    }

    /// Fetches the list now, outside the poll schedule
    ///
    /// Returns false if the result was superseded or the view is closed.
    pub async fn refresh(&self) -> bool {
        self.shared.refresh().await
    }

    /// Reads controller state
    pub fn read<R>(&self, f: impl FnOnce(&ListController) -> R) -> R {
        let controller = self.shared.lock();
        f(&controller)
    }

    /// Changes filter, sort, page or selection
    pub fn update<R>(&self, f: impl FnOnce(&mut ListView) -> R) -> R {
        let result = {
            let mut controller = self.shared.lock();
            f(controller.view_mut())
        };
        self.shared.bump();
        result
    }

    /// Receiver that changes whenever the view state does
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    /// Waits until `predicate` holds for the controller
    pub async fn wait_until(&self, mut predicate: impl FnMut(&ListController) -> bool) {
        let mut changes = self.subscribe();
        loop {
            let done = {
                let controller = self.shared.lock();
                predicate(&controller)
            };
            if done || changes.changed().await.is_err() {
                return;
            }
        }
    }

    pub fn dismiss_notice(&self) -> Option<Notice> {
        let notice = self.shared.lock().dismiss_notice();
        self.shared.bump();
        notice
    }

    // ===== Actions =====

    /// Submits a new URL for crawling
    ///
    /// Empty or non-http(s) input is rejected without a request.
    pub async fn create(&self, raw_url: &str) -> ApiResult<Option<Record>> {
        let url = match validate_submission(raw_url) {
            Ok(url) => url,
            Err(e) => return Err(self.failed("Add URL", e)),
        };

        match self.shared.api.create_record(&url).await {
            Ok(created) => {
                self.succeeded("Add URL", Notice::success("URL added. Crawl queued."))
                    .await;
                Ok(created)
            }
            Err(e) => Err(self.failed("Add URL", e)),
        }
    }

    /// Deletes one record
    pub async fn delete(&self, id: &RecordId) -> ApiResult<()> {
        match self.shared.api.delete_record(id).await {
            Ok(()) => {
                self.shared
                    .lock()
                    .view_mut()
                    .deselect(std::slice::from_ref(id));
                self.succeeded("Delete", Notice::success(format!("Deleted URL {}.", id)))
                    .await;
                Ok(())
            }
            Err(e) => Err(self.failed("Delete", e)),
        }
    }

    /// Deletes every selected record; no-op when nothing is selected
    pub async fn delete_selected(&self) -> ApiResult<()> {
        let ids = self.selected_ids();
        if ids.is_empty() {
            tracing::debug!("Bulk delete skipped: nothing selected");
            return Ok(());
        }

        match self.shared.api.bulk_delete(&ids).await {
            Ok(()) => {
                self.shared.lock().view_mut().deselect(&ids);
                let notice = Notice::success(format!("Deleted {} selected URLs.", ids.len()));
                self.succeeded("Bulk delete", notice).await;
                Ok(())
            }
            Err(e) => Err(self.failed("Bulk delete", e)),
        }
    }

    /// Re-runs analysis for every selected record; no-op when nothing is selected
    pub async fn rerun_selected(&self) -> ApiResult<()> {
        let ids = self.selected_ids();
        if ids.is_empty() {
            tracing::debug!("Bulk re-run skipped: nothing selected");
            return Ok(());
        }

        match self.shared.api.bulk_rerun(&ids).await {
            Ok(()) => {
                let notice = Notice::info(format!("Re-running analysis for {} URLs.", ids.len()));
                self.succeeded("Bulk re-run", notice).await;
                Ok(())
            }
            Err(e) => Err(self.failed("Bulk re-run", e)),
        }
    }

    /// Starts (or re-runs) one crawl
    pub async fn start(&self, id: &RecordId) -> ApiResult<()> {
        match self.shared.api.start(id).await {
            Ok(()) => {
                self.succeeded("Start", Notice::info(format!("Started crawl for {}.", id)))
                    .await;
                Ok(())
            }
            Err(e) => Err(self.failed("Start", e)),
        }
    }

    /// Stops one crawl
    pub async fn stop(&self, id: &RecordId) -> ApiResult<()> {
        match self.shared.api.stop(id).await {
            Ok(()) => {
                self.succeeded("Stop", Notice::info(format!("Stopped crawl for {}.", id)))
                    .await;
                Ok(())
            }
            Err(e) => Err(self.failed("Stop", e)),
        }
    }

    /// Closes the view; equivalent to dropping it
    pub fn unmount(self) {}

    fn selected_ids(&self) -> Vec<RecordId> {
        self.shared.lock().view().selection().to_vec()
    }

    async fn succeeded(&self, action: &str, notice: Notice) {
        tracing::info!("{} succeeded", action);
        self.shared.lock().set_notice(notice);
        self.shared.bump();
        self.shared.refresh().await;
    }

    fn failed(&self, action: &str, error: ApiError) -> ApiError {
        tracing::warn!("{} failed: {}", action, error);
        self.shared
            .lock()
            .set_notice(Notice::error(format!("{} failed: {}", action, error)));
        self.shared.bump();
        error
    }
}

impl Drop for ListSession {
    fn drop(&mut self) {
        self.shared.lock().close();
        self.shared.wake.notify_one();
        self.poller.abort();
        tracing::debug!("List view unmounted");
    }
}

/// Checks user input for the add-URL action and returns it trimmed
pub fn validate_submission(raw: &str) -> ApiResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidRequest("URL cannot be empty".to_string()));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| ApiError::InvalidRequest(format!("'{}' is not a valid URL: {}", trimmed, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ApiError::InvalidRequest(format!(
            "'{}' must use http or https",
            trimmed
        )));
    }

    Ok(trimmed.to_string())
}
