//! Mounted detail view with background polling

use crate::api::CrawlApi;
use crate::config::Config;
use crate::detail::controller::{DetailController, DetailUpdate};
use crate::model::RecordId;
use crate::poll::Notice;
use crate::ApiResult;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct DetailSettings {
    pub poll_interval: Duration,
}

impl DetailSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll_interval: config.polling.detail_interval(),
        }
    }
}

impl Default for DetailSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

struct Shared {
    api: Arc<dyn CrawlApi>,
    id: RecordId,
    controller: Mutex<DetailController>,
    poll_interval: Duration,
    wake: Notify,
    revision: watch::Sender<u64>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, DetailController> {
        self.controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }

    /// Loads the record, then its broken links when only a count came back
    async fn refresh(&self) -> bool {
        let ticket = {
            let mut controller = self.lock();
            if controller.is_closed() {
                return false;
            }
            controller.begin_fetch()
        };
        self.bump();

        let result = self.api.get_record(&self.id).await;
        let update = self.lock().apply_detail(ticket, result);

        match update {
            DetailUpdate::Stale => return false,
            DetailUpdate::Applied => {}
            DetailUpdate::NeedsBrokenLinks(links_ticket) => {
                self.bump();
                let links = self.api.list_broken_links(&self.id).await;
                self.lock().apply_broken_links(links_ticket, links);
            }
        }

        self.bump();
        self.wake.notify_one();
        true
    }
}

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
                    tracing::debug!("Poll interval elapsed, refreshing record {}", shared.id);
                    shared.refresh().await;
                }
                _ = shared.wake.notified() => {}
            }
        } else {
            shared.wake.notified().await;
        }
    }

    tracing::debug!("Detail poll task for {} finished", shared.id);
}

/// A mounted, self-refreshing view of one record
pub struct DetailSession {
    shared: Arc<Shared>,
    poller: JoinHandle<()>,
}

impl DetailSession {
    /// Mounts the view for `id` and starts loading it
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(api: Arc<dyn CrawlApi>, id: RecordId, settings: DetailSettings) -> Self {
        let (revision, _) = watch::channel(0);
        let shared = Arc::new(Shared {
            api,
            controller: Mutex::new(DetailController::new(id.clone())),
            id,
            poll_interval: settings.poll_interval,
            wake: Notify::new(),
            revision,
        });

        tracing::debug!("Mounting detail view for {}", shared.id);
        let poller = tokio::spawn(poll_loop(Arc::clone(&shared)));

        Self { shared, poller }
    }

    pub fn id(&self) -> &RecordId {
        &self.shared.id
    }

    pub async fn refresh(&self) -> bool {
        self.shared.refresh().await
    }

    pub fn read<R>(&self, f: impl FnOnce(&DetailController) -> R) -> R {
        let controller = self.shared.lock();
        f(&controller)
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    pub async fn wait_until(&self, mut predicate: impl FnMut(&DetailController) -> bool) {
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

    /// Re-runs analysis for this record
    ///
    /// The local status becomes `running` before the request is sent, which
    /// also re-arms polling. An accepted rerun is followed by a reload, so a
    /// view whose first load failed recovers too. A failed request leaves the
    /// flip in place and raises an error notice; the next poll corrects the
    /// status.
    pub async fn rerun(&self) -> ApiResult<()> {
        if self.shared.lock().mark_rerun() {
            self.shared.bump();
            self.shared.wake.notify_one();
        }

        let outcome = self.shared.api.start(&self.shared.id).await;
        let notice = match &outcome {
            Ok(()) => {
                tracing::info!("Rerun of {} accepted", self.shared.id);
                Notice::info("Re-running analysis.")
            }
            Err(e) => {
                tracing::warn!("Rerun of {} failed: {}", self.shared.id, e);
                Notice::error(format!("Rerun failed: {}", e))
            }
        };
        self.shared.lock().set_notice(notice);
        self.shared.bump();

        if outcome.is_ok() {
            self.shared.refresh().await;
        }
        outcome
    }

    /// Closes the view; equivalent to dropping it
    pub fn unmount(self) {}
}

impl Drop for DetailSession {
    fn drop(&mut self) {
        self.shared.lock().close();
        self.shared.wake.notify_one();
        self.poller.abort();
        tracing::debug!("Detail view for {} unmounted", self.shared.id);
    }
}
