//! Telemetry sinks for finished metric records.

use std::io::{self, Write};

use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use super::record::{MetricRecord, RECORD_SCHEMA_VERSION};
use crate::core::config::{EmitterConfig, NodeIdentity};
use crate::error::{NodeStatsError, Result};

pub const MEMORY_USED_METRIC: &str = "memory-used";
pub const MEMORY_AVAILABLE_METRIC: &str = "memory-available";

/// Trait for telemetry transports
///
/// Delivery is best-effort: callers log failures and move on, nothing is
/// retried.
pub trait Emitter: Send {
    /// Track a single named metric value
    fn emit(&mut self, metric_name: &str, value: f64) -> Result<()>;

    /// Store a full record. Transports without structured storage may ignore it.
    fn emit_record(&mut self, _record: &MetricRecord) -> Result<()> {
        Ok(())
    }

    /// Announce the node to the pool's registration store
    fn register_node(&mut self, _identity: &NodeIdentity) -> Result<()> {
        Ok(())
    }

    /// Remove any per-node registration left by `register_node`
    fn unregister_node(&mut self, _identity: &NodeIdentity) -> Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    time: String,
    #[serde(rename = "iKey", skip_serializing_if = "Option::is_none")]
    key: Option<&'a str>,
    kind: &'static str,
    pool_id: &'a str,
    node_id: &'a str,
    data: serde_json::Value,
}

/// Emitter writing one JSON envelope per line.
pub struct JsonLinesEmitter<W: Write + Send> {
    writer: W,
    config: EmitterConfig,
}

impl JsonLinesEmitter<io::Stdout> {
    pub fn stdout(config: EmitterConfig) -> Self {
        Self::new(io::stdout(), config)
    }
}

impl<W: Write + Send> JsonLinesEmitter<W> {
    pub fn new(writer: W, config: EmitterConfig) -> Self {
        Self { writer, config }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_envelope(&mut self, kind: &'static str, data: serde_json::Value) -> Result<()> {
        let envelope = Envelope {
            time: Utc::now().to_rfc3339(),
            key: self.config.telemetry_key.as_deref(),
            kind,
            pool_id: &self.config.identity.pool_id,
            node_id: &self.config.identity.node_id,
            data,
        };

        let line = serde_json::to_string(&envelope)?;
        writeln!(self.writer, "{}", line)
            .and_then(|_| self.writer.flush())
            .map_err(|e| NodeStatsError::transport(format!("failed to write {} event: {}", kind, e)))
    }
}

impl<W: Write + Send> Emitter for JsonLinesEmitter<W> {
    fn emit(&mut self, metric_name: &str, value: f64) -> Result<()> {
        self.write_envelope("metric", json!({ "name": metric_name, "value": value }))
    }

    fn emit_record(&mut self, record: &MetricRecord) -> Result<()> {
        if !self.config.emit_records {
            return Ok(());
        }

        self.write_envelope(
            "node_stats",
            json!({ "schema": RECORD_SCHEMA_VERSION, "record": record }),
        )
    }

    fn register_node(&mut self, identity: &NodeIdentity) -> Result<()> {
        self.write_envelope(
            "register",
            json!({ "pool_id": identity.pool_id, "node_id": identity.node_id }),
        )
    }

    fn unregister_node(&mut self, identity: &NodeIdentity) -> Result<()> {
        self.write_envelope(
            "unregister",
            json!({ "pool_id": identity.pool_id, "node_id": identity.node_id }),
        )
    }
}
