use std::{collections::HashSet, sync::Arc};

use shared::domain::PreparedRoute;
use tracing::{info, warn};

use crate::{api::RoutesApi, error::FetchError};

/// Lists the prepared routes available to the current driver. A single
/// attempt per call; retrying is up to whoever re-enters the workflow.
pub struct PreparedRouteFetcher {
    api: Arc<dyn RoutesApi>,
}

impl PreparedRouteFetcher {
    pub fn new(api: Arc<dyn RoutesApi>) -> Self {
        Self { api }
    }

    pub async fn fetch_available(
        &self,
        token: Option<&str>,
    ) -> Result<Vec<PreparedRoute>, FetchError> {
        let routes = self.api.list_prepared_routes(token).await?;
        let received = routes.len();
        let routes = retain_valid_batch(routes);
        info!(received, kept = routes.len(), "fetched prepared routes");
        Ok(routes)
    }
}

/// Drops routes with an empty id and repeats of an id already seen, keeping
/// the first occurrence and the server's order.
fn retain_valid_batch(routes: Vec<PreparedRoute>) -> Vec<PreparedRoute> {
    let mut seen = HashSet::new();
    routes
        .into_iter()
        .filter(|route| {
            if route.id.as_str().trim().is_empty() {
                warn!("dropping prepared route with empty id");
                return false;
            }
            if !seen.insert(route.id.clone()) {
                warn!(route_id = %route.id, "dropping duplicate prepared route");
                return false;
            }
            true
        })
        .collect()
}
