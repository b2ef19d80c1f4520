//! Recording fakes for the workflow collaborators.

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shared::domain::{BoxId, PreparedRoute, RouteBox, RouteId, Screen, Stop, StopId};
use tokio::sync::Notify;

use crate::{
    api::RoutesApi,
    error::{DownloadError, FetchError},
    ActiveRouteStore, ScreenNavigator,
};

/// Ordered log of every side effect, shared by all fakes of one test.
pub type EffectLog = Arc<Mutex<Vec<String>>>;

pub fn effects(log: &EffectLog) -> Vec<String> {
    log.lock().expect("effect log").clone()
}

#[derive(Clone)]
pub enum ListBehavior {
    Routes(Vec<PreparedRoute>),
    Status(u16),
}

#[derive(Clone)]
pub enum DownloadBehavior {
    Accept,
    Reject(String),
    Transport,
}

pub struct FakeRoutesApi {
    log: EffectLog,
    list: Mutex<ListBehavior>,
    download: Mutex<DownloadBehavior>,
    list_gate: Option<Arc<Notify>>,
    download_gate: Option<Arc<Notify>>,
    pub list_calls: AtomicUsize,
    pub download_calls: AtomicUsize,
    pub seen_tokens: Mutex<Vec<Option<String>>>,
}

impl FakeRoutesApi {
    pub fn new(log: EffectLog, list: ListBehavior, download: DownloadBehavior) -> Self {
        Self {
            log,
            list: Mutex::new(list),
            download: Mutex::new(download),
            list_gate: None,
            download_gate: None,
            list_calls: AtomicUsize::new(0),
            download_calls: AtomicUsize::new(0),
            seen_tokens: Mutex::new(Vec::new()),
        }
    }

    /// Holds every list request until the returned handle is notified.
    pub fn hold_list(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.list_gate = Some(gate.clone());
        (self, gate)
    }

    /// Holds every download request until the returned handle is notified.
    pub fn hold_download(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.download_gate = Some(gate.clone());
        (self, gate)
    }

    pub fn set_list(&self, behavior: ListBehavior) {
        *self.list.lock().expect("list behavior") = behavior;
    }

    pub fn set_download(&self, behavior: DownloadBehavior) {
        *self.download.lock().expect("download behavior") = behavior;
    }
}

#[async_trait]
impl RoutesApi for FakeRoutesApi {
    async fn list_prepared_routes(
        &self,
        token: Option<&str>,
    ) -> std::result::Result<Vec<PreparedRoute>, FetchError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_tokens
            .lock()
            .expect("tokens")
            .push(token.map(str::to_string));
        if let Some(gate) = &self.list_gate {
            gate.notified().await;
        }

        let behavior = self.list.lock().expect("list behavior").clone();
        match behavior {
            ListBehavior::Routes(routes) => Ok(routes),
            ListBehavior::Status(status) => Err(FetchError::Status { status }),
        }
    }

    async fn mark_downloaded(
        &self,
        route_id: &RouteId,
        token: Option<&str>,
    ) -> std::result::Result<(), DownloadError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_tokens
            .lock()
            .expect("tokens")
            .push(token.map(str::to_string));
        if let Some(gate) = &self.download_gate {
            gate.notified().await;
        }

        self.log
            .lock()
            .expect("effect log")
            .push(format!("server:baixar:{route_id}"));

        let behavior = self.download.lock().expect("download behavior").clone();
        match behavior {
            DownloadBehavior::Accept => Ok(()),
            DownloadBehavior::Reject(reason) => Err(DownloadError::Rejected { reason }),
            DownloadBehavior::Transport => {
                Err(DownloadError::Transport("connection refused".to_string()))
            }
        }
    }
}

pub struct RecordingStore {
    log: EffectLog,
    fail: bool,
}

impl RecordingStore {
    pub fn new(log: EffectLog) -> Self {
        Self { log, fail: false }
    }

    pub fn failing(log: EffectLog) -> Self {
        Self { log, fail: true }
    }
}

#[async_trait]
impl ActiveRouteStore for RecordingStore {
    async fn load(&self, route_id: &RouteId) -> Result<()> {
        self.log
            .lock()
            .expect("effect log")
            .push(format!("store:load:{route_id}"));
        if self.fail {
            return Err(anyhow!("disk full"));
        }
        Ok(())
    }
}

/// Store for a host that never wired one up.
pub struct MissingActiveRouteStore;

#[async_trait]
impl ActiveRouteStore for MissingActiveRouteStore {
    async fn load(&self, route_id: &RouteId) -> Result<()> {
        Err(anyhow!(
            "active-route store unavailable; cannot load route {route_id}"
        ))
    }
}

pub struct RecordingNavigator {
    log: EffectLog,
}

impl RecordingNavigator {
    pub fn new(log: EffectLog) -> Self {
        Self { log }
    }
}

impl ScreenNavigator for RecordingNavigator {
    fn go_to(&self, screen: Screen) {
        self.log
            .lock()
            .expect("effect log")
            .push(format!("nav:{screen}"));
    }
}

pub fn route_with(id: &str, stops: usize, boxes: usize) -> PreparedRoute {
    PreparedRoute {
        id: RouteId::from(id),
        name: Some(format!("Rota {id}")),
        prepared_at: Utc
            .with_ymd_and_hms(2024, 5, 2, 8, 30, 0)
            .single()
            .expect("timestamp"),
        stops: (0..stops)
            .map(|n| Stop {
                id: StopId::new(format!("{id}-s{n}")),
                name: format!("Parada {n}"),
                address: format!("Rua {n}, 100"),
                city: "Campinas".to_string(),
                tag_label: None,
                tag_color: None,
            })
            .collect(),
        boxes: (0..boxes)
            .map(|n| RouteBox {
                id: BoxId::new(format!("{id}-b{n}")),
                order_ref: Some(format!("PED-{n}")),
                shipment_ref: None,
                recipient: None,
                tag_label: None,
                tag_color: Some((n as i64 % 8) + 1),
                box_index: None,
                box_count: None,
            })
            .collect(),
    }
}

/// Polls `condition` until it holds, failing the test after two seconds.
pub async fn wait_until(condition: impl Fn() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
