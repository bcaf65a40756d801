use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

pub const POOL_ID_ENV: &str = "AZ_BATCH_POOL_ID";
pub const NODE_ID_ENV: &str = "AZ_BATCH_NODE_ID";
pub const TELEMETRY_KEY_ENV: &str = "APP_INSIGHT_KEY";

/// Placeholders used when running outside a pool
pub const LOCAL_POOL_ID: &str = "_test-pool-1";
pub const LOCAL_NODE_ID: &str = "_test-node-1";

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

#[cfg(windows)]
const PRIMARY_VOLUME: &str = "C:\\";
#[cfg(windows)]
const FALLBACK_VOLUME: &str = "C:\\";

#[cfg(not(windows))]
const PRIMARY_VOLUME: &str = "/mnt/resources";
#[cfg(not(windows))]
const FALLBACK_VOLUME: &str = "/mnt";

/// Pool and node the agent reports for. Fixed for the agent's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIdentity {
    pub pool_id: String,
    pub node_id: String,
}

impl NodeIdentity {
    pub fn new<P: Into<String>, N: Into<String>>(pool_id: P, node_id: N) -> Self {
        Self {
            pool_id: pool_id.into(),
            node_id: node_id.into(),
        }
    }

    /// Resolve from the batch environment, falling back to local placeholders
    pub fn from_env() -> Self {
        Self::resolve(env::var(POOL_ID_ENV).ok(), env::var(NODE_ID_ENV).ok())
    }

    fn resolve(pool_id: Option<String>, node_id: Option<String>) -> Self {
        match (pool_id, node_id) {
            (Some(pool_id), Some(node_id)) if !pool_id.is_empty() && !node_id.is_empty() => {
                Self { pool_id, node_id }
            }
            _ => {
                warn!(
                    "{} / {} not set, using local identity {}/{}",
                    POOL_ID_ENV, NODE_ID_ENV, LOCAL_POOL_ID, LOCAL_NODE_ID
                );
                Self::new(LOCAL_POOL_ID, LOCAL_NODE_ID)
            }
        }
    }
}

impl std::fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pool={} node={}", self.pool_id, self.node_id)
    }
}

/// Settings handed to an emitter at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitterConfig {
    pub identity: NodeIdentity,
    pub telemetry_key: Option<String>,
    /// Also forward the full record, not just the derived memory metrics
    pub emit_records: bool,
}

/// Complete agent configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub identity: NodeIdentity,
    pub telemetry_key: Option<String>,
    pub interval: Duration,
    pub monitored_volume: PathBuf,
    pub cleanup_on_exit: bool,
    pub emit_records: bool,
}

impl AgentConfig {
    pub fn from_env() -> Self {
        let telemetry_key = env::var(TELEMETRY_KEY_ENV).ok().filter(|k| !k.is_empty());
        if telemetry_key.is_none() {
            warn!("{} not set, records will be emitted without a telemetry key", TELEMETRY_KEY_ENV);
        }

        Self {
            identity: NodeIdentity::from_env(),
            telemetry_key,
            interval: DEFAULT_INTERVAL,
            monitored_volume: default_monitored_volume(),
            cleanup_on_exit: true,
            emit_records: true,
        }
    }

    pub fn emitter_config(&self) -> EmitterConfig {
        EmitterConfig {
            identity: self.identity.clone(),
            telemetry_key: self.telemetry_key.clone(),
            emit_records: self.emit_records,
        }
    }
}

/// Volume whose usage is reported as the node's disk usage
pub fn default_monitored_volume() -> PathBuf {
    select_monitored_volume(Path::new(PRIMARY_VOLUME), Path::new(FALLBACK_VOLUME))
}

/// Prefer `primary`, use `fallback` when it does not exist
pub fn select_monitored_volume(primary: &Path, fallback: &Path) -> PathBuf {
    if primary.exists() {
        primary.to_path_buf()
    } else {
        fallback.to_path_buf()
    }
}
