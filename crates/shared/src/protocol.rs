use serde::{Deserialize, Serialize};

use crate::domain::PreparedRoute;

/// Path segments of `GET /api/rotas/preparadas`.
pub const PREPARED_ROUTES_SEGMENTS: [&str; 3] = ["api", "rotas", "preparadas"];

/// `GET /api/rotas/preparadas` envelope. A missing `rotas` field is an
/// empty list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreparedRoutesResponse {
    #[serde(default)]
    pub rotas: Option<Vec<PreparedRoute>>,
}

impl PreparedRoutesResponse {
    pub fn new(routes: Vec<PreparedRoute>) -> Self {
        Self {
            rotas: Some(routes),
        }
    }

    pub fn into_routes(self) -> Vec<PreparedRoute> {
        self.rotas.unwrap_or_default()
    }
}

/// Path segments of `POST /api/rotas/{routeId}/baixar`, kept separate so the
/// route id can be percent-encoded as a single segment.
pub fn download_route_segments(route_id: &str) -> [&str; 4] {
    ["api", "rotas", route_id, "baixar"]
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
