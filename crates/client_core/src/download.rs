use std::sync::Arc;

use shared::domain::{RouteId, Screen};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::{api::RoutesApi, error::DownloadError, ActiveRouteStore, ScreenNavigator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    pub route_id: RouteId,
}

/// Downloads a prepared route into the active-route store and moves the
/// driver to the active route screen.
///
/// Only one download runs at a time across the whole workflow. A call made
/// while another is in flight fails with [`DownloadError::AlreadyInFlight`]
/// before any request is sent.
pub struct RouteDownloadCoordinator {
    api: Arc<dyn RoutesApi>,
    store: Arc<dyn ActiveRouteStore>,
    navigator: Arc<dyn ScreenNavigator>,
    in_flight: Semaphore,
}

impl RouteDownloadCoordinator {
    pub fn new(
        api: Arc<dyn RoutesApi>,
        store: Arc<dyn ActiveRouteStore>,
        navigator: Arc<dyn ScreenNavigator>,
    ) -> Self {
        Self {
            api,
            store,
            navigator,
            in_flight: Semaphore::new(1),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.available_permits() == 0
    }

    /// Server commit, then store load, then navigation. Any failure stops the
    /// sequence and leaves the current screen in place.
    pub async fn download(
        &self,
        route_id: &RouteId,
        token: Option<&str>,
    ) -> Result<Committed, DownloadError> {
        let _permit = self.in_flight.try_acquire().map_err(|_| {
            warn!(%route_id, "route download refused, another one is in flight");
            DownloadError::AlreadyInFlight
        })?;

        if let Err(err) = self.api.mark_downloaded(route_id, token).await {
            warn!(%route_id, error = %err, "route download failed");
            return Err(err);
        }

        if let Err(source) = self.store.load(route_id).await {
            error!(
                %route_id,
                error = %source,
                "server marked route as downloaded but loading it locally failed"
            );
            return Err(DownloadError::StoreCommit {
                route_id: route_id.clone(),
                source,
            });
        }

        self.navigator.go_to(Screen::ActiveRoute);
        info!(%route_id, "route downloaded and loaded as active route");

        Ok(Committed {
            route_id: route_id.clone(),
        })
    }
}

#[cfg(test)]
#[path = "tests/download_tests.rs"]
mod tests;
