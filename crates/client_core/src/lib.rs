//! Client-side workflow for the "choose cargo" step: list the routes the
//! server prepared for the driver, download one of them into the active
//! route, or hand off to manual sorting.

use anyhow::Result;
use async_trait::async_trait;
use shared::domain::{RouteId, Screen};

pub mod api;
pub mod controller;
pub mod download;
pub mod error;
pub mod fetcher;
pub mod preview;
pub mod tags;

pub use api::{HttpRoutesApi, RoutesApi};
pub use controller::{SelectOutcome, WorkflowController, WorkflowState};
pub use download::{Committed, RouteDownloadCoordinator};
pub use error::{DownloadError, FetchError};
pub use fetcher::PreparedRouteFetcher;
pub use preview::{BoxChip, RoutePreview, StopChip, PREVIEW_LIMIT};
pub use tags::{resolve_tag_color, TagColor};

/// Source of the driver's bearer token. `None` means unauthenticated;
/// requests are still sent and expected to fail server-side.
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

pub struct StaticToken(pub Option<String>);

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// The application's active-route state. `load` must be a single atomic
/// "load this route" call.
#[async_trait]
pub trait ActiveRouteStore: Send + Sync {
    async fn load(&self, route_id: &RouteId) -> Result<()>;
}

pub trait ScreenNavigator: Send + Sync {
    fn go_to(&self, screen: Screen);
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
