//! Processing engine
//!
//! The engine owns the import work loop. The host only starts and stops it;
//! everything else happens behind the trait.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};
use wireup::{Construct, ConstructorEntry, Result, CONSTRUCTORS};

use crate::bus::ServiceBus;

/// Drives the import work loop
pub trait Engine: Send + Sync {
    fn start(&self) -> Result<()>;
    fn stop(&self) -> Result<()>;
    fn is_running(&self) -> bool;
}

/// Default engine backed by the service bus
pub struct EngineManager {
    bus: Arc<dyn ServiceBus>,
    running: AtomicBool,
}

impl EngineManager {
    pub fn new(bus: Arc<dyn ServiceBus>) -> Self {
        Self {
            bus,
            running: AtomicBool::new(false),
        }
    }
}

impl Construct<(Arc<dyn ServiceBus>,)> for EngineManager {
    fn construct((bus,): (Arc<dyn ServiceBus>,)) -> Self {
        EngineManager::new(bus)
    }
}

#[linkme::distributed_slice(CONSTRUCTORS)]
static ENGINE_MANAGER_CTOR: ConstructorEntry =
    ConstructorEntry::of::<EngineManager, (Arc<dyn ServiceBus>,)>();

impl Engine for EngineManager {
    fn start(&self) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("engine already running, start ignored");
            return Ok(());
        }
        self.bus.publish("engine.started", b"")?;
        info!("engine started");
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        self.bus.publish("engine.stopped", b"")?;
        info!("engine stopped");
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
