//! Types that mirror the agent's JSON schema. Wire names are camelCase.

use serde::Deserialize;

/// One timestamped telemetry reading for a host. Immutable once
/// deserialized; cloned by consumers, never mutated.
#[derive(Debug, Deserialize, Clone)]
pub struct Snapshot {
    /// Milliseconds since epoch, stamped by the agent.
    pub ts: u64,
    pub cpu: CpuMetrics,
    pub ram: RamMetrics,
    pub gpu: Vec<GpuMetric>,
    /// Present only when the agent samples processes.
    #[serde(default)]
    pub processes: Option<Vec<ProcessInfo>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CpuMetrics {
    pub percent: f32,
    pub cores: Vec<f32>,
    /// Not every host exposes a CPU temperature sensor.
    pub temperature: Option<f32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RamMetrics {
    pub percent: f32,
    pub used: u64,
    pub total: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GpuMetric {
    pub id: u32,
    /// Fractional load in [0, 1].
    pub load: f32,
    pub temperature: f32,
    pub memory_util: f32,
    pub memory_used: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    #[serde(rename = "memMB")]
    pub mem_mb: f32,
}

/// Rarely-changing hardware/OS descriptor for a host. Sent once per
/// connection (re-sent on reconnect) and replaced wholesale, never merged.
#[derive(Debug, Deserialize, Clone)]
pub struct StaticInfo {
    pub cpu: CpuInfo,
    pub os: OsInfo,
    pub mem: MemInfo,
    pub gpus: Vec<GpuInfo>,
    pub storage: Vec<StorageInfo>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfo {
    pub manufacturer: String,
    pub brand: String,
    /// Base clock in GHz.
    pub speed: f32,
    pub cores: u32,
    pub physical_cores: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OsInfo {
    pub platform: String,
    pub distro: String,
    pub release: String,
    pub arch: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MemInfo {
    pub total: u64,
    #[serde(default)]
    pub layout: Vec<MemStick>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MemStick {
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub clock_speed: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GpuInfo {
    pub id: u32,
    pub name: String,
    pub uuid: String,
    /// MB, as reported by the agent.
    pub memory_total: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub total: u64,
    pub used: u64,
}
