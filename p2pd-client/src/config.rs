//! Load config from file and environment.

use serde::Deserialize;
use std::path::PathBuf;

/// Client configuration. File: ~/.config/p2pd-client/config.toml or
/// /etc/p2pd-client/config.toml.
/// Env overrides: P2PD_CONTROL_MADDR, P2PD_LISTEN_MADDR.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Control endpoint of the daemon (default `/unix/tmp/p2pd.sock`).
    #[serde(default = "default_control_maddr")]
    pub control_maddr: String,
    /// Listener endpoint; synthesized from the control family when unset.
    #[serde(default)]
    pub listen_maddr: Option<String>,
}

fn default_control_maddr() -> String {
    "/unix/tmp/p2pd.sock".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            control_maddr: default_control_maddr(),
            listen_maddr: None,
        }
    }
}

/// Load config: merge default, then config file (if present), then env vars.
pub fn load() -> Config {
    let mut c = load_file().unwrap_or_default();
    if let Ok(s) = std::env::var("P2PD_CONTROL_MADDR") {
        if !s.is_empty() {
            c.control_maddr = s;
        }
    }
    if let Ok(s) = std::env::var("P2PD_LISTEN_MADDR") {
        if !s.is_empty() {
            c.listen_maddr = Some(s);
        }
    }
    c
}

fn config_paths() -> Vec<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let mut out = Vec::new();
    if let Some(h) = home {
        out.push(h.join(".config/p2pd-client/config.toml"));
    }
    out.push(PathBuf::from("/etc/p2pd-client/config.toml"));
    out
}

fn load_file() -> Option<Config> {
    for p in config_paths() {
        if p.exists() {
            if let Ok(s) = std::fs::read_to_string(&p) {
                if let Ok(c) = toml::from_str::<Config>(&s) {
                    return Some(c);
                }
            }
            break;
        }
    }
    None
}
