//! Terminal implementations of the workflow's external collaborators.

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use client_core::{ActiveRouteStore, ScreenNavigator};
use serde::{Deserialize, Serialize};
use shared::domain::{RouteId, Screen};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRouteRecord {
    pub route_id: RouteId,
    pub loaded_at: DateTime<Utc>,
}

/// Keeps the active route as a small JSON record on disk. The record is
/// written to a sibling temp file and renamed into place.
pub struct FileActiveRouteStore {
    path: PathBuf,
}

impl FileActiveRouteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn current(&self) -> Result<Option<ActiveRouteRecord>> {
        match tokio::fs::read(&self.path).await {
            Ok(raw) => {
                let record = serde_json::from_slice(&raw).with_context(|| {
                    format!("invalid active route record '{}'", self.path.display())
                })?;
                Ok(Some(record))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| {
                format!("failed to read active route '{}'", self.path.display())
            }),
        }
    }
}

#[async_trait]
impl ActiveRouteStore for FileActiveRouteStore {
    async fn load(&self, route_id: &RouteId) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!(
                    "failed to create parent directory '{}' for active route",
                    parent.display()
                )
            })?;
        }

        let record = ActiveRouteRecord {
            route_id: route_id.clone(),
            loaded_at: Utc::now(),
        };
        let bytes = serde_json::to_vec_pretty(&record)?;
        let tmp = temp_path(&self.path);
        tokio::fs::write(&tmp, bytes)
            .await
            .with_context(|| format!("failed to write '{}'", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("failed to replace '{}'", self.path.display()))?;

        info!(%route_id, path = %self.path.display(), "active route stored");
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Records the requested screen; the terminal has nowhere else to go.
#[derive(Default)]
pub struct TerminalNavigator {
    last: Mutex<Option<Screen>>,
}

impl TerminalNavigator {
    pub fn last_screen(&self) -> Option<Screen> {
        self.last.lock().ok().and_then(|guard| *guard)
    }
}

impl ScreenNavigator for TerminalNavigator {
    fn go_to(&self, screen: Screen) {
        info!(%screen, "navigating");
        if let Ok(mut guard) = self.last.lock() {
            *guard = Some(screen);
        }
    }
}
