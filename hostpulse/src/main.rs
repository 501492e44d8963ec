//! Entry point for the hostpulse TUI. Parses args, resolves the host
//! list, and runs the App.

use std::env;

use tracing_subscriber::EnvFilter;

use hostpulse::app::App;
use hostpulse::hosts::{load_hosts, save_hosts, HostEntry};

#[derive(Debug)]
struct ParsedArgs {
    addresses: Vec<String>,
    name: Option<String>,
    save: bool,
}

fn usage(prog: &str) -> String {
    format!("Usage: {prog} [--name LABEL|-n LABEL] [--save] [HOST:PORT ...]")
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "hostpulse".into());
    let mut addresses: Vec<String> = Vec::new();
    let mut name: Option<String> = None;
    let mut save = false; // --save

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                return Err(usage(&prog));
            }
            "--name" | "-n" => {
                name = it.next();
            }
            "--save" => {
                save = true;
            }
            _ if arg.starts_with("--name=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        name = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with('-') => {
                return Err(format!("Unknown flag {arg}. {}", usage(&prog)));
            }
            _ => addresses.push(arg),
        }
    }
    Ok(ParsedArgs {
        addresses,
        name,
        save,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Quiet unless RUST_LOG is set, so traces don't fight the TUI.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    let mut registry = load_hosts();
    let monitored: Vec<HostEntry> = if parsed.addresses.is_empty() {
        if registry.hosts.is_empty() {
            eprintln!("No hosts given and none saved. {}", usage("hostpulse"));
            return Ok(());
        }
        registry.hosts.clone()
    } else {
        let single = parsed.addresses.len() == 1;
        let entries: Vec<HostEntry> = parsed
            .addresses
            .iter()
            .map(|addr| {
                // A --name label only makes sense for a single host.
                let name = match (&parsed.name, single) {
                    (Some(n), true) => n.clone(),
                    _ => addr.clone(),
                };
                HostEntry {
                    name,
                    address: addr.clone(),
                }
            })
            .collect();
        if parsed.save {
            for entry in &entries {
                registry.add(&entry.name, &entry.address);
            }
            save_hosts(&registry)?;
        }
        entries
    };

    let mut app = App::new(monitored, registry)?;
    app.run().await
}
