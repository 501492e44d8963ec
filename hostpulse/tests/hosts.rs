//! Tests for hosts-file persistence and the uniqueness-by-address rule.

use std::fs;
use std::sync::Mutex;

use hostpulse::hosts::{config_dir, hosts_path, load_hosts, save_hosts, HostsFile};

// Global lock to serialize tests that mutate process-wide environment variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn save_and_reload_round_trips() {
    let _guard = ENV_LOCK.lock().unwrap();
    let td = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", td.path());

    let mut file = HostsFile::default();
    assert!(file.add("web-1", "10.0.0.1:4000"));
    assert!(file.add("db-1", "10.0.0.2:4000"));
    save_hosts(&file).expect("save hosts");

    let loaded = load_hosts();
    assert_eq!(loaded.hosts, file.hosts);
}

#[test]
fn duplicate_address_not_added_or_persisted() {
    let _guard = ENV_LOCK.lock().unwrap();
    let td = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", td.path());

    let mut file = HostsFile::default();
    assert!(file.add("first", "10.0.0.1:4000"));
    assert!(!file.add("second", "10.0.0.1:4000"));
    save_hosts(&file).expect("save hosts");

    let loaded = load_hosts();
    assert_eq!(loaded.hosts.len(), 1);
    assert_eq!(loaded.hosts[0].name, "first");
}

#[test]
fn remove_round_trips_through_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    let td = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", td.path());

    let mut file = HostsFile::default();
    file.add("web-1", "10.0.0.1:4000");
    file.add("db-1", "10.0.0.2:4000");
    save_hosts(&file).expect("save hosts");

    let mut loaded = load_hosts();
    assert!(loaded.remove("10.0.0.1:4000"));
    save_hosts(&loaded).expect("save hosts");

    let reloaded = load_hosts();
    assert_eq!(reloaded.hosts.len(), 1);
    assert_eq!(reloaded.hosts[0].address, "10.0.0.2:4000");
}

#[test]
fn corrupt_file_loads_empty() {
    let _guard = ENV_LOCK.lock().unwrap();
    let td = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", td.path());

    fs::create_dir_all(config_dir()).unwrap();
    fs::write(hosts_path(), b"{ not json").unwrap();
    let loaded = load_hosts();
    assert!(loaded.hosts.is_empty());
}

#[test]
fn missing_file_loads_empty() {
    let _guard = ENV_LOCK.lock().unwrap();
    let td = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", td.path());

    let loaded = load_hosts();
    assert!(loaded.hosts.is_empty());
}
