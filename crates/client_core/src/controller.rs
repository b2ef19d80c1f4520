use std::sync::Arc;

use shared::domain::{PreparedRoute, RouteId, Screen};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    download::RouteDownloadCoordinator, error::DownloadError, fetcher::PreparedRouteFetcher,
    preview::RoutePreview, ScreenNavigator, TokenProvider,
};

/// What the choose-cargo screen renders. Listing and downloading are
/// independent: a list can be loading while nothing downloads and vice versa.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    pub routes: Vec<PreparedRoute>,
    pub loading: bool,
    pub downloading: Option<RouteId>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    Committed,
    Failed,
    /// A download was already in progress; nothing was sent.
    Ignored,
}

struct ControllerInner {
    state: WorkflowState,
    entered: bool,
    /// Bumped on every enter/exit so results from an earlier screen instance
    /// can be recognized and dropped.
    generation: u64,
}

pub struct WorkflowController {
    fetcher: PreparedRouteFetcher,
    downloads: RouteDownloadCoordinator,
    navigator: Arc<dyn ScreenNavigator>,
    tokens: Arc<dyn TokenProvider>,
    inner: Mutex<ControllerInner>,
}

impl WorkflowController {
    pub fn new(
        fetcher: PreparedRouteFetcher,
        downloads: RouteDownloadCoordinator,
        navigator: Arc<dyn ScreenNavigator>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            fetcher,
            downloads,
            navigator,
            tokens,
            inner: Mutex::new(ControllerInner {
                state: WorkflowState::default(),
                entered: false,
                generation: 0,
            }),
        }
    }

    pub async fn state(&self) -> WorkflowState {
        self.inner.lock().await.state.clone()
    }

    pub async fn previews(&self) -> Vec<RoutePreview> {
        let guard = self.inner.lock().await;
        guard
            .state
            .routes
            .iter()
            .map(RoutePreview::from_route)
            .collect()
    }

    /// Whether the download trigger for `route_id` should be enabled. Every
    /// trigger is disabled while any download runs, including one started by
    /// an earlier screen instance.
    pub async fn is_download_enabled(&self, route_id: &RouteId) -> bool {
        let guard = self.inner.lock().await;
        guard.state.downloading.is_none()
            && !self.downloads.is_busy()
            && guard.state.routes.iter().any(|route| &route.id == route_id)
    }

    /// Starts a screen instance and loads the prepared routes. Calling it
    /// again before [`on_exit`](Self::on_exit) does nothing.
    pub async fn on_enter(&self) {
        let generation = {
            let mut guard = self.inner.lock().await;
            if guard.entered {
                debug!("choose-cargo workflow already entered");
                return;
            }
            guard.entered = true;
            guard.generation += 1;
            guard.state = WorkflowState {
                loading: true,
                ..WorkflowState::default()
            };
            guard.generation
        };

        let token = self.tokens.bearer_token();
        let result = self.fetcher.fetch_available(token.as_deref()).await;

        let mut guard = self.inner.lock().await;
        if !guard.entered || guard.generation != generation {
            debug!(generation, "discarding prepared routes for a screen that was left");
            return;
        }

        guard.state.loading = false;
        match result {
            Ok(routes) => {
                guard.state.routes = routes;
                guard.state.error = None;
            }
            Err(err) => {
                // Listing failures stay off screen; the list renders empty.
                warn!(error = %err, "failed to fetch prepared routes");
                guard.state.routes.clear();
            }
        }
    }

    /// Marks the screen as left. The state is dropped and any fetch still in
    /// flight is discarded when it settles.
    pub async fn on_exit(&self) {
        let mut guard = self.inner.lock().await;
        guard.entered = false;
        guard.generation += 1;
        guard.state = WorkflowState::default();
        debug!("choose-cargo workflow exited");
    }

    pub async fn on_select_route(&self, route_id: RouteId) -> SelectOutcome {
        let generation = {
            let mut guard = self.inner.lock().await;
            if let Some(active) = &guard.state.downloading {
                debug!(%route_id, %active, "ignoring selection while a download is in progress");
                return SelectOutcome::Ignored;
            }
            if self.downloads.is_busy() {
                debug!(%route_id, "ignoring selection while an earlier download is in progress");
                return SelectOutcome::Ignored;
            }
            guard.state.downloading = Some(route_id.clone());
            guard.state.error = None;
            guard.generation
        };

        info!(%route_id, "downloading prepared route");
        let token = self.tokens.bearer_token();
        let result = self.downloads.download(&route_id, token.as_deref()).await;

        let mut guard = self.inner.lock().await;
        let current = guard.generation == generation;
        if current {
            guard.state.downloading = None;
        }

        match result {
            Ok(_) => {
                if current {
                    guard.state.error = None;
                }
                SelectOutcome::Committed
            }
            Err(DownloadError::AlreadyInFlight) => SelectOutcome::Ignored,
            Err(err) => {
                if current {
                    guard.state.error = err.user_message();
                }
                SelectOutcome::Failed
            }
        }
    }

    /// Hands off to manual sorting. Always available, whatever the download
    /// state.
    pub fn on_manual_sort(&self) {
        info!("switching to manual sorting");
        self.navigator.go_to(Screen::Destinations);
    }

    pub fn on_back(&self) {
        self.navigator.go_to(Screen::Origin);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
