//! Monitored host list: load/save a simple JSON file of { name, address }
//! entries, unique by address.
//! Stored under the XDG config dir: $XDG_CONFIG_HOME/hostpulse/hosts.json
//! (fallback ~/.config/hostpulse/hosts.json)

use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostEntry {
    pub name: String,
    /// `host:port`, the session's dial target. Unique within the file.
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HostsFile {
    #[serde(default)]
    pub hosts: Vec<HostEntry>,
    #[serde(default)]
    pub version: u32,
}

impl HostsFile {
    /// Add a host. Rejects an empty address and duplicates by address; an
    /// empty name falls back to the address.
    pub fn add(&mut self, name: &str, address: &str) -> bool {
        if address.is_empty() || self.hosts.iter().any(|h| h.address == address) {
            return false;
        }
        let name = if name.is_empty() { address } else { name };
        self.hosts.push(HostEntry {
            name: name.to_string(),
            address: address.to_string(),
        });
        true
    }

    /// Remove by address; true if an entry was dropped.
    pub fn remove(&mut self, address: &str) -> bool {
        let before = self.hosts.len();
        self.hosts.retain(|h| h.address != address);
        self.hosts.len() != before
    }
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("hostpulse")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hostpulse")
    }
}

pub fn hosts_path() -> PathBuf {
    config_dir().join("hosts.json")
}

pub fn load_hosts() -> HostsFile {
    let path = hosts_path();
    match fs::read_to_string(&path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_else(|err| {
            warn!(path = %path.display(), %err, "unreadable hosts file, starting empty");
            HostsFile::default()
        }),
        Err(_) => HostsFile::default(),
    }
}

pub fn save_hosts(hosts: &HostsFile) -> std::io::Result<()> {
    let path = hosts_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(hosts).expect("serialize hosts");
    fs::write(path, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_rejects_duplicate_address() {
        let mut file = HostsFile::default();
        assert!(file.add("web-1", "10.0.0.1:4000"));
        assert!(!file.add("web-1-again", "10.0.0.1:4000"));
        assert_eq!(file.hosts.len(), 1);
        assert_eq!(file.hosts[0].name, "web-1");
    }

    #[test]
    fn add_rejects_empty_address_and_defaults_name() {
        let mut file = HostsFile::default();
        assert!(!file.add("nameless", ""));
        assert!(file.add("", "10.0.0.2:4000"));
        assert_eq!(file.hosts[0].name, "10.0.0.2:4000");
    }

    #[test]
    fn remove_by_address() {
        let mut file = HostsFile::default();
        file.add("a", "10.0.0.1:4000");
        file.add("b", "10.0.0.2:4000");
        assert!(file.remove("10.0.0.1:4000"));
        assert!(!file.remove("10.0.0.1:4000"));
        assert_eq!(file.hosts.len(), 1);
        assert_eq!(file.hosts[0].address, "10.0.0.2:4000");
    }
}
