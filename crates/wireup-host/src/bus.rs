//! Service bus seam
//!
//! The import pipeline talks to the outside world through a bus abstraction.
//! The default implementation only logs; a real transport plugs in behind
//! the same trait.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;
use wireup::{Construct, ConstructorEntry, Result, CONSTRUCTORS};

/// Outbound messaging seam
pub trait ServiceBus: Send + Sync {
    /// Connect to the bus endpoint
    fn start(&self, endpoint: &str) -> Result<()>;

    /// Publish a payload under a topic
    fn publish(&self, topic: &str, payload: &[u8]) -> Result<()>;
}

/// Bus implementation that records publishes in the log stream
#[derive(Default)]
pub struct LoggingServiceBus {
    published: AtomicUsize,
}

impl LoggingServiceBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages published so far
    pub fn published(&self) -> usize {
        self.published.load(Ordering::Relaxed)
    }
}

impl Construct<()> for LoggingServiceBus {
    fn construct(_: ()) -> Self {
        LoggingServiceBus::new()
    }
}

#[linkme::distributed_slice(CONSTRUCTORS)]
static LOGGING_BUS_CTOR: ConstructorEntry = ConstructorEntry::of::<LoggingServiceBus, ()>();

impl ServiceBus for LoggingServiceBus {
    fn start(&self, endpoint: &str) -> Result<()> {
        debug!(endpoint, "bus started");
        Ok(())
    }

    fn publish(&self, topic: &str, payload: &[u8]) -> Result<()> {
        self.published.fetch_add(1, Ordering::Relaxed);
        debug!(topic, bytes = payload.len(), "bus publish");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_counts_messages() {
        let bus = LoggingServiceBus::new();
        bus.publish("import.batch", b"{}").unwrap();
        bus.publish("import.batch", b"{}").unwrap();
        assert_eq!(bus.published(), 2);
    }
}
