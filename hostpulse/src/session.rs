//! Per-host connection session: WebSocket lifecycle, event dispatch into
//! the throttle and history buffer, bounded reconnection.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures_util::StreamExt;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, warn};
use url::Url;

use crate::history::RingBuffer;
use crate::throttle::{UpdateThrottle, UPDATE_INTERVAL_MS};
use crate::types::{Snapshot, StaticInfo};

/// Snapshots retained per host.
pub const HISTORY_CAPACITY: usize = 120;
/// Consecutive failed connect attempts before the session gives up.
pub const RECONNECT_ATTEMPTS: u32 = 5;

const BACKOFF_BASE: Duration = Duration::from_millis(500);
const BACKOFF_CAP: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid host address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },
}

/// Session tunables. Defaults are the production constants; tests shrink
/// the intervals to keep runs fast.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub history_capacity: usize,
    pub throttle_interval_ms: u64,
    pub reconnect_attempts: u32,
    pub backoff_base: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_capacity: HISTORY_CAPACITY,
            throttle_interval_ms: UPDATE_INTERVAL_MS,
            reconnect_attempts: RECONNECT_ATTEMPTS,
            backoff_base: BACKOFF_BASE,
        }
    }
}

// Tagged JSON frames sent by the agent. connect/disconnect are transport
// facts, not frames.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
enum WireEvent {
    StaticInfo(StaticInfo),
    Metrics(Snapshot),
}

#[derive(Debug)]
enum SessionEvent {
    Connected,
    Disconnected,
    StaticInfo(StaticInfo),
    Metrics(Snapshot),
}

#[derive(Debug)]
struct SessionState {
    state: ConnectionState,
    static_info: Option<StaticInfo>,
    current: Option<Snapshot>,
    history: RingBuffer<Snapshot>,
    throttle: UpdateThrottle,
    connect_attempts: u64,
    closed: bool,
}

impl SessionState {
    fn new(config: &SessionConfig) -> Self {
        Self {
            state: ConnectionState::Connecting,
            static_info: None,
            current: None,
            history: RingBuffer::new(config.history_capacity),
            throttle: UpdateThrottle::new(config.throttle_interval_ms),
            connect_attempts: 0,
            closed: false,
        }
    }

    // Single dispatch point for protocol events, in arrival order. A
    // closed session ignores everything, so a late event can never
    // repopulate a cleared buffer.
    fn apply(&mut self, event: SessionEvent, now_ms: u64) {
        if self.closed {
            return;
        }
        match event {
            SessionEvent::Connected => self.state = ConnectionState::Connected,
            // Keep the last snapshot: consumers treat staleness via the
            // Connected flag, not value presence, so brief blips don't
            // blank the display.
            SessionEvent::Disconnected => self.state = ConnectionState::Disconnected,
            SessionEvent::StaticInfo(info) => self.static_info = Some(info),
            SessionEvent::Metrics(snapshot) => {
                if self.throttle.accept(now_ms) {
                    self.history.push(snapshot.clone());
                    self.current = Some(snapshot);
                }
            }
        }
    }

    fn close(&mut self) {
        self.closed = true;
        self.state = ConnectionState::Disconnected;
        self.history.clear();
        self.current = None;
        self.static_info = None;
    }
}

/// Handle to one host's streaming session. Cheap accessors snapshot the
/// state; `close` (or drop) tears the connection down.
pub struct HostSession {
    address: String,
    shared: Arc<Mutex<SessionState>>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl HostSession {
    /// Open a session to `host:port` with default tunables. Returns
    /// immediately; connection progress is visible via
    /// [`connection_state`](Self::connection_state). Must be called from
    /// within a tokio runtime.
    pub fn open(address: &str) -> Result<Self, SessionError> {
        Self::open_with(address, SessionConfig::default())
    }

    pub fn open_with(address: &str, config: SessionConfig) -> Result<Self, SessionError> {
        let url = endpoint_url(address)?;
        let shared = Arc::new(Mutex::new(SessionState::new(&config)));
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run(url, Arc::clone(&shared), config, shutdown_rx));
        Ok(Self {
            address: address.to_string(),
            shared,
            shutdown,
            task,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.lock().state
    }

    pub fn static_info(&self) -> Option<StaticInfo> {
        self.lock().static_info.clone()
    }

    pub fn current_metrics(&self) -> Option<Snapshot> {
        self.lock().current.clone()
    }

    /// Retained history, oldest to newest. Empty after `close`.
    pub fn history(&self) -> Vec<Snapshot> {
        self.lock().history.to_vec()
    }

    /// Total connect attempts made so far (resets never; budget counting
    /// is internal and consecutive).
    pub fn connect_attempts(&self) -> u64 {
        self.lock().connect_attempts
    }

    /// Idempotent teardown, safe even if the transport never connected.
    /// Marks the session closed (late events become no-ops) and clears
    /// retained state under one lock, then stops the I/O task.
    pub fn close(&self) {
        {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.close();
        }
        let _ = self.shutdown.send(true);
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.shared.lock().unwrap()
    }
}

impl Drop for HostSession {
    fn drop(&mut self) {
        self.close();
        self.task.abort();
    }
}

fn endpoint_url(address: &str) -> Result<Url, SessionError> {
    Url::parse(&format!("ws://{address}/ws")).map_err(|source| SessionError::InvalidAddress {
        address: address.to_string(),
        source,
    })
}

fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

fn dispatch(shared: &Mutex<SessionState>, event: SessionEvent) {
    shared.lock().unwrap().apply(event, now_ms());
}

fn backoff_delay(base: Duration, failures: u32) -> Duration {
    base.saturating_mul(1 << failures.saturating_sub(1).min(8)).min(BACKOFF_CAP)
}

async fn run(
    url: Url,
    shared: Arc<Mutex<SessionState>>,
    config: SessionConfig,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut failures: u32 = 0;
    while failures < config.reconnect_attempts {
        if *shutdown.borrow() {
            return;
        }
        {
            let mut state = shared.lock().unwrap();
            if state.closed {
                return;
            }
            state.state = ConnectionState::Connecting;
            state.connect_attempts += 1;
        }

        let connected = tokio::select! {
            res = connect_async(url.as_str()) => res,
            _ = shutdown.changed() => return,
        };

        match connected {
            Ok((mut ws, _)) => {
                failures = 0;
                debug!(url = %url, "connected");
                dispatch(&shared, SessionEvent::Connected);

                loop {
                    let msg = tokio::select! {
                        m = ws.next() => m,
                        _ = shutdown.changed() => {
                            let _ = ws.close(None).await;
                            return;
                        }
                    };
                    match msg {
                        Some(Ok(Message::Text(text))) => match serde_json::from_str(&text) {
                            Ok(WireEvent::StaticInfo(info)) => {
                                dispatch(&shared, SessionEvent::StaticInfo(info));
                            }
                            Ok(WireEvent::Metrics(snapshot)) => {
                                dispatch(&shared, SessionEvent::Metrics(snapshot));
                            }
                            // Malformed frames are dropped, never fatal.
                            Err(err) => debug!(%err, "dropping malformed frame"),
                        },
                        Some(Ok(Message::Close(_))) | None => break,
                        // Binary/ping/pong are not part of the protocol.
                        Some(Ok(_)) => {}
                        Some(Err(err)) => {
                            warn!(url = %url, %err, "websocket error");
                            break;
                        }
                    }
                }

                debug!(url = %url, "disconnected");
                dispatch(&shared, SessionEvent::Disconnected);
                // Breather before re-dialing so a flapping server can't
                // spin us in a tight connect loop.
                tokio::select! {
                    _ = tokio::time::sleep(config.backoff_base) => {}
                    _ = shutdown.changed() => return,
                }
            }
            Err(err) => {
                failures += 1;
                debug!(url = %url, %err, failures, "connect failed");
                dispatch(&shared, SessionEvent::Disconnected);
                if failures >= config.reconnect_attempts {
                    break;
                }
                let delay = backoff_delay(config.backoff_base, failures);
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = shutdown.changed() => return,
                }
            }
        }
    }
    warn!(url = %url, "reconnect budget exhausted; staying disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CpuMetrics, RamMetrics};

    fn snapshot(ts: u64, cpu: f32) -> Snapshot {
        Snapshot {
            ts,
            cpu: CpuMetrics {
                percent: cpu,
                cores: vec![cpu, cpu],
                temperature: None,
            },
            ram: RamMetrics {
                percent: 40.0,
                used: 4 << 30,
                total: 16 << 30,
            },
            gpu: vec![],
            processes: None,
        }
    }

    fn state_with_interval(interval_ms: u64) -> SessionState {
        SessionState::new(&SessionConfig {
            throttle_interval_ms: interval_ms,
            ..SessionConfig::default()
        })
    }

    #[test]
    fn connect_and_disconnect_drive_state() {
        let mut s = state_with_interval(0);
        assert_eq!(s.state, ConnectionState::Connecting);
        s.apply(SessionEvent::Connected, 0);
        assert_eq!(s.state, ConnectionState::Connected);
        s.apply(SessionEvent::Disconnected, 1);
        assert_eq!(s.state, ConnectionState::Disconnected);
    }

    #[test]
    fn disconnect_retains_last_metrics() {
        let mut s = state_with_interval(0);
        s.apply(SessionEvent::Connected, 0);
        s.apply(SessionEvent::Metrics(snapshot(1, 10.0)), 1);
        s.apply(SessionEvent::Disconnected, 2);
        assert_eq!(s.state, ConnectionState::Disconnected);
        assert!(s.current.is_some());
        assert_eq!(s.history.len(), 1);
    }

    #[test]
    fn throttle_gates_both_current_and_history() {
        let mut s = state_with_interval(500);
        s.apply(SessionEvent::Metrics(snapshot(0, 1.0)), 0);
        s.apply(SessionEvent::Metrics(snapshot(100, 2.0)), 100);
        s.apply(SessionEvent::Metrics(snapshot(500, 3.0)), 500);
        assert_eq!(s.history.len(), 2);
        // The rejected snapshot updated neither history nor current.
        assert_eq!(s.current.as_ref().map(|m| m.cpu.percent), Some(3.0));
        let kept: Vec<u64> = s.history.to_vec().iter().map(|m| m.ts).collect();
        assert_eq!(kept, vec![0, 500]);
    }

    #[test]
    fn static_info_replaced_wholesale() {
        let mut s = state_with_interval(0);
        let a: StaticInfo = serde_json::from_value(static_info_json("one")).unwrap();
        let b: StaticInfo = serde_json::from_value(static_info_json("two")).unwrap();
        s.apply(SessionEvent::StaticInfo(a), 0);
        s.apply(SessionEvent::StaticInfo(b), 1);
        assert_eq!(s.static_info.as_ref().map(|i| i.cpu.brand.as_str()), Some("two"));
    }

    #[test]
    fn closed_session_ignores_late_events() {
        let mut s = state_with_interval(0);
        s.apply(SessionEvent::Connected, 0);
        s.apply(SessionEvent::Metrics(snapshot(1, 10.0)), 1);
        s.close();
        assert!(s.history.is_empty());
        assert!(s.current.is_none());
        assert!(s.static_info.is_none());
        // A buffered event arriving after teardown must not mutate state.
        s.apply(SessionEvent::Metrics(snapshot(2, 20.0)), 2);
        s.apply(SessionEvent::Connected, 3);
        assert!(s.history.is_empty());
        assert!(s.current.is_none());
        assert_eq!(s.state, ConnectionState::Disconnected);
    }

    #[test]
    fn history_capped_at_configured_capacity() {
        let mut s = SessionState::new(&SessionConfig {
            history_capacity: 3,
            throttle_interval_ms: 0,
            ..SessionConfig::default()
        });
        for i in 0..10 {
            s.apply(SessionEvent::Metrics(snapshot(i, i as f32)), i);
        }
        let kept: Vec<u64> = s.history.to_vec().iter().map(|m| m.ts).collect();
        assert_eq!(kept, vec![7, 8, 9]);
    }

    #[test]
    fn wire_frames_decode_by_event_tag() {
        let metrics = r#"{"event":"metrics","data":{"ts":5,"cpu":{"percent":12.5,"cores":[10.0,15.0],"temperature":48.5},"ram":{"percent":33.0,"used":1024,"total":4096},"gpu":[{"id":0,"load":0.5,"temperature":60.0,"memoryUtil":0.25,"memoryUsed":2048}]}}"#;
        match serde_json::from_str::<WireEvent>(metrics) {
            Ok(WireEvent::Metrics(m)) => {
                assert_eq!(m.ts, 5);
                assert_eq!(m.gpu[0].memory_used, 2048);
                assert!(m.processes.is_none());
            }
            other => panic!("unexpected decode: {other:?}"),
        }

        let info = serde_json::json!({ "event": "static-info", "data": static_info_json("x") });
        assert!(matches!(
            serde_json::from_value::<WireEvent>(info),
            Ok(WireEvent::StaticInfo(_))
        ));
    }

    #[test]
    fn malformed_frames_fail_to_decode() {
        for bad in [
            "not json",
            r#"{"event":"metrics","data":{"ts":"notanumber"}}"#,
            r#"{"event":"unknown","data":{}}"#,
            r#"{"data":{"ts":5}}"#,
        ] {
            assert!(serde_json::from_str::<WireEvent>(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn endpoint_url_builds_ws_path() {
        let url = endpoint_url("10.0.0.7:4000").unwrap();
        assert_eq!(url.as_str(), "ws://10.0.0.7:4000/ws");
        assert!(endpoint_url("not a host").is_err());
    }

    #[test]
    fn backoff_grows_and_caps() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(500));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(1000));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(2000));
        assert_eq!(backoff_delay(base, 10), BACKOFF_CAP);
    }

    fn static_info_json(brand: &str) -> serde_json::Value {
        serde_json::json!({
            "cpu": {
                "manufacturer": "ACME",
                "brand": brand,
                "speed": 3.6,
                "cores": 16,
                "physicalCores": 8
            },
            "os": {
                "platform": "linux",
                "distro": "Debian",
                "release": "12",
                "arch": "x86_64"
            },
            "mem": {
                "total": 34359738368u64,
                "layout": [{ "size": 17179869184u64, "type": "DDR4", "clockSpeed": 3200 }]
            },
            "gpus": [{ "id": 0, "name": "RTX 4070", "uuid": "GPU-123", "memoryTotal": 12288 }],
            "storage": [{ "name": "/dev/nvme0n1", "type": "NVMe", "total": 1000000000000u64, "used": 250000000000u64 }]
        })
    }
}
