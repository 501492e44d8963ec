//! hostpulse: live host telemetry client over WebSocket.
//!
//! Per monitored host the pipeline is: connection session → update
//! throttle → bounded history buffer → series downsampler → rendering
//! consumers. Sessions are fully independent across hosts.

pub mod app;
pub mod downsample;
pub mod history;
pub mod hosts;
pub mod session;
pub mod throttle;
pub mod types;
pub mod ui;

pub use downsample::{downsample, AlignedSeries, MAX_CHART_POINTS};
pub use history::RingBuffer;
pub use session::{
    ConnectionState, HostSession, SessionConfig, SessionError, HISTORY_CAPACITY,
    RECONNECT_ATTEMPTS,
};
pub use throttle::{UpdateThrottle, UPDATE_INTERVAL_MS};
pub use types::{Snapshot, StaticInfo};
