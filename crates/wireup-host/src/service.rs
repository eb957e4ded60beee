//! Service lifecycle
//!
//! [`ProcessorService`] adapts the engine to the host's lifecycle surface.
//! Lifecycle callbacks must never unwind into the host control loop, so
//! engine failures are logged here and swallowed.

use std::sync::Arc;

use tracing::{error, info};
use wireup::{Construct, ConstructorEntry, Result, CONSTRUCTORS};

use crate::engine::Engine;

/// Lifecycle surface the host drives
pub trait ServiceLifecycle: Send + Sync {
    fn start(&self);
    fn stop(&self);
    fn pause(&self);
    fn resume(&self);
    fn shutdown(&self);
}

/// Lifecycle adapter that delegates to the engine
pub struct ProcessorService {
    engine: Arc<dyn Engine>,
}

impl ProcessorService {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self { engine }
    }

    /// Run one lifecycle operation, containing any engine failure
    fn execute(&self, operation: &str, action: impl FnOnce() -> Result<()>) {
        info!(operation, "service lifecycle");
        if let Err(err) = action() {
            error!(operation, error = %err, "lifecycle operation failed");
        }
    }
}

impl Construct<(Arc<dyn Engine>,)> for ProcessorService {
    fn construct((engine,): (Arc<dyn Engine>,)) -> Self {
        ProcessorService::new(engine)
    }
}

#[linkme::distributed_slice(CONSTRUCTORS)]
static PROCESSOR_SERVICE_CTOR: ConstructorEntry =
    ConstructorEntry::of::<ProcessorService, (Arc<dyn Engine>,)>();

impl ServiceLifecycle for ProcessorService {
    fn start(&self) {
        self.execute("start", || self.engine.start());
    }

    fn stop(&self) {
        self.execute("stop", || self.engine.stop());
    }

    // Pause parks the engine entirely; resume restarts it.
    fn pause(&self) {
        self.execute("pause", || self.engine.stop());
    }

    fn resume(&self) {
        self.execute("resume", || self.engine.start());
    }

    fn shutdown(&self) {
        self.execute("shutdown", || self.engine.stop());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use wireup::Error;

    use super::*;

    #[derive(Default)]
    struct RecordingEngine {
        calls: Mutex<Vec<&'static str>>,
        fail: bool,
    }

    impl RecordingEngine {
        fn record(&self, call: &'static str) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                Err(Error::registration("engine", "broken"))
            } else {
                Ok(())
            }
        }
    }

    impl Engine for RecordingEngine {
        fn start(&self) -> Result<()> {
            self.record("start")
        }

        fn stop(&self) -> Result<()> {
            self.record("stop")
        }

        fn is_running(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_lifecycle_maps_to_engine_calls() {
        let engine = Arc::new(RecordingEngine::default());
        let service = ProcessorService::new(engine.clone());

        service.start();
        service.pause();
        service.resume();
        service.stop();
        service.shutdown();

        assert_eq!(
            *engine.calls.lock().unwrap(),
            vec!["start", "stop", "start", "stop", "stop"]
        );
    }

    #[test]
    fn test_engine_failures_do_not_unwind() {
        let engine = Arc::new(RecordingEngine {
            calls: Mutex::new(Vec::new()),
            fail: true,
        });
        let service = ProcessorService::new(engine.clone());

        // Every operation fails inside the engine; none may panic.
        service.start();
        service.stop();
        service.shutdown();

        assert_eq!(engine.calls.lock().unwrap().len(), 3);
    }
}
