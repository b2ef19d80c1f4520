use shared::domain::RouteId;
use thiserror::Error;

pub const DOWNLOAD_FALLBACK_MESSAGE: &str = "Erro ao baixar rota";
pub const CONNECTION_ERROR_MESSAGE: &str = "Erro de conexão. Verifique sua internet e tente novamente.";
pub const STORE_COMMIT_ERROR_MESSAGE: &str = "Erro ao carregar a rota baixada. Tente novamente.";

/// Failure while listing prepared routes. Never shown to the driver; the
/// controller logs it and renders an empty list.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("prepared routes request returned HTTP {status}")]
    Status { status: u16 },
    #[error("prepared routes request failed: {0}")]
    Transport(String),
    #[error("invalid prepared routes payload: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("server rejected route download: {reason}")]
    Rejected { reason: String },
    #[error("route download request failed: {0}")]
    Transport(String),
    #[error("server acknowledged route {route_id} but the active-route store failed: {source}")]
    StoreCommit {
        route_id: RouteId,
        #[source]
        source: anyhow::Error,
    },
    #[error("another route download is already in flight")]
    AlreadyInFlight,
}

impl DownloadError {
    /// Text surfaced to the driver, or `None` when the failure is not
    /// user-visible.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Rejected { reason } => Some(reason.clone()),
            Self::Transport(_) => Some(CONNECTION_ERROR_MESSAGE.to_string()),
            Self::StoreCommit { .. } => Some(STORE_COMMIT_ERROR_MESSAGE.to_string()),
            Self::AlreadyInFlight => None,
        }
    }
}
