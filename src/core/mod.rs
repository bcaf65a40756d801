// Core business logic module

pub mod config;
pub mod node_stats;

// Re-export commonly used items
pub use config::{AgentConfig, EmitterConfig, NodeIdentity};
pub use node_stats::{CounterProvider, Emitter, PeriodicRunner, Sampler};
