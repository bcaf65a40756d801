//! Node statistics sampling pipeline.
//!
//! A [`PeriodicRunner`] drives a [`Sampler`] on a fixed cadence. Each cycle
//! reads a [`CounterProvider`] into a [`CounterSnapshot`], encodes it into a
//! [`MetricRecord`] with tick timestamps and hands it to an [`Emitter`].

pub mod emitter;
pub mod provider;
pub mod record;
mod runner;
mod sampler;
pub mod snapshot;
pub mod time_codec;

pub use emitter::{Emitter, JsonLinesEmitter, MEMORY_AVAILABLE_METRIC, MEMORY_USED_METRIC};
pub use provider::CounterProvider;
pub use record::{encode, MetricRecord, RECORD_SCHEMA_VERSION};
pub use runner::{PeriodicRunner, RunnerConfig, RunnerState};
pub use sampler::Sampler;
pub use snapshot::{
    CounterSnapshot, DiskIoCounters, MemoryReading, NetIoCounters, SubReading, VolumeUsage,
};
