//! Periodic sampling lifecycle for one node identity.
//!
//! `register` warms the provider up and spawns a single timer loop; each tick
//! samples, encodes and emits before the loop waits again, so cycles never
//! overlap. `unregister` signals the loop and waits for it to hand the sampler
//! back, which lets the runner be registered again later.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, trace, warn};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::emitter::{Emitter, MEMORY_AVAILABLE_METRIC, MEMORY_USED_METRIC};
use super::provider::CounterProvider;
use super::sampler::Sampler;
use crate::core::config::{NodeIdentity, DEFAULT_INTERVAL};
use crate::error::{NodeStatsError, Result};

/// Timing for the sampling loop
#[derive(Debug, Clone, Copy)]
pub struct RunnerConfig {
    pub interval: Duration,
    /// Pause between the CPU baseline reading and the first sample
    pub warmup_settle: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            warmup_settle: sysinfo::MINIMUM_CPU_UPDATE_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Unregistered,
    Running,
}

struct ActiveLoop<P: CounterProvider> {
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<Sampler<P>>,
}

pub struct PeriodicRunner<P: CounterProvider + 'static, E: Emitter + 'static> {
    identity: NodeIdentity,
    config: RunnerConfig,
    emitter: Arc<Mutex<E>>,
    /// Present while unregistered; owned by the loop task while running
    sampler: Option<Sampler<P>>,
    active: Option<ActiveLoop<P>>,
    cycles: Arc<AtomicU64>,
}

impl<P: CounterProvider + 'static, E: Emitter + 'static> PeriodicRunner<P, E> {
    pub fn new(identity: NodeIdentity, sampler: Sampler<P>, emitter: E, config: RunnerConfig) -> Self {
        Self {
            identity,
            config,
            emitter: Arc::new(Mutex::new(emitter)),
            sampler: Some(sampler),
            active: None,
            cycles: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn identity(&self) -> &NodeIdentity {
        &self.identity
    }

    /// `Running` only while the sampling task is alive
    pub fn state(&self) -> RunnerState {
        match &self.active {
            Some(active) if !active.handle.is_finished() => RunnerState::Running,
            _ => RunnerState::Unregistered,
        }
    }

    pub fn emitter(&self) -> Arc<Mutex<E>> {
        Arc::clone(&self.emitter)
    }

    /// Number of completed sampling cycles across all registrations
    pub fn cycles_completed(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Start periodic sampling. Does nothing if already running.
    pub async fn register(&mut self) -> Result<()> {
        if let Some(active) = &self.active {
            if !active.handle.is_finished() {
                debug!("stats sampler already running for {}", self.identity);
                return Ok(());
            }
            warn!("stats sampler for {} stopped on its own, reaping it", self.identity);
            self.unregister(false).await;
        }

        info!("registering stats for {}", self.identity);

        let sampler = self.sampler.as_mut().ok_or_else(|| {
            NodeStatsError::config("sampler was lost when a previous sampling task failed")
        })?;
        sampler.warm_up();
        tokio::time::sleep(self.config.warmup_settle).await;

        if let Err(e) = self.emitter.lock().register_node(&self.identity) {
            warn!("could not register node {}: {}", self.identity, e);
        }

        let Some(sampler) = self.sampler.take() else {
            return Err(NodeStatsError::config("sampler disappeared during warm-up"));
        };

        let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
        let handle = tokio::spawn(sampling_loop(
            sampler,
            Arc::clone(&self.emitter),
            self.identity.clone(),
            self.config.interval,
            Arc::clone(&self.cycles),
            shutdown_rx,
        ));

        self.active = Some(ActiveLoop { shutdown_tx, handle });
        info!(
            "stats sampler started for {} every {:?}",
            self.identity, self.config.interval
        );
        Ok(())
    }

    /// Stop periodic sampling and, with `cleanup`, remove the node's
    /// registration. A cycle already in progress finishes first. Calling
    /// this while unregistered does nothing.
    pub async fn unregister(&mut self, cleanup: bool) {
        let Some(active) = self.active.take() else {
            debug!("stats sampler not running for {}", self.identity);
            return;
        };

        info!("unregistering stats for {}", self.identity);
        debug!("attempting to cancel stats sampler");

        if active.shutdown_tx.send(()).is_err() {
            warn!("stats sampler for {} had already stopped", self.identity);
        }

        match active.handle.await {
            Ok(sampler) => {
                self.sampler = Some(sampler);
                info!("stats sampler cancelled for {}", self.identity);
            }
            Err(e) => {
                let err = NodeStatsError::cancellation(format!("sampling task failed: {}", e));
                error!("{}", err);
            }
        }

        if cleanup {
            if let Err(e) = self.emitter.lock().unregister_node(&self.identity) {
                warn!("could not remove registration for {}: {}", self.identity, e);
            }
        }
    }
}

impl<P: CounterProvider + 'static, E: Emitter + 'static> Drop for PeriodicRunner<P, E> {
    fn drop(&mut self) {
        if let Some(active) = &self.active {
            let _ = active.shutdown_tx.send(());
        }
    }
}

async fn sampling_loop<P: CounterProvider, E: Emitter>(
    mut sampler: Sampler<P>,
    emitter: Arc<Mutex<E>>,
    identity: NodeIdentity,
    period: Duration,
    cycles: Arc<AtomicU64>,
    mut shutdown: broadcast::Receiver<()>,
) -> Sampler<P> {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.recv() => {
                debug!("stats sampler for {} shutting down", identity);
                break;
            }
            _ = ticker.tick() => {
                let cycle = panic::catch_unwind(AssertUnwindSafe(|| {
                    run_cycle(&mut sampler, &emitter, &identity)
                }));
                match cycle {
                    Ok(()) => {
                        cycles.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(_) => error!("stats cycle for {} panicked, skipping it", identity),
                }
            }
        }
    }

    sampler
}

/// One sample, encode and emit pass. Failures are logged, never raised.
fn run_cycle<P: CounterProvider, E: Emitter>(
    sampler: &mut Sampler<P>,
    emitter: &Mutex<E>,
    identity: &NodeIdentity,
) {
    let snapshot = sampler.sample();
    debug!(
        "node stats sample: {} ts={} degraded={:?}",
        identity, snapshot.sample_time, snapshot.degraded
    );

    let record = match sampler.encode(&snapshot) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("could not encode node stats sample: {}", e);
            None
        }
    };

    let mut emitter = emitter.lock();

    let used = snapshot.memory.used_bytes() as f64;
    if let Err(e) = emitter.emit(MEMORY_USED_METRIC, used) {
        warn!("could not emit {}: {}", MEMORY_USED_METRIC, e);
    }

    let available = snapshot.memory.available_bytes as f64;
    if let Err(e) = emitter.emit(MEMORY_AVAILABLE_METRIC, available) {
        warn!("could not emit {}: {}", MEMORY_AVAILABLE_METRIC, e);
    }

    if let Some(record) = record {
        trace!("inserting node stats: {:?}", record);
        if let Err(e) = emitter.emit_record(&record) {
            warn!("could not emit node stats record: {}", e);
        }
    }
}
