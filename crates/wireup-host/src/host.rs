//! Service host
//!
//! Owns the process control loop: start the service, wait for a shutdown
//! signal, then stop and shut the service down in order.

use std::sync::Arc;

use tracing::info;
use wireup::{Error, Result};

use crate::config::ServiceConfig;
use crate::service::ServiceLifecycle;

pub struct ServiceHost {
    name: String,
    service: Arc<dyn ServiceLifecycle>,
}

impl ServiceHost {
    pub fn new(config: &ServiceConfig, service: Arc<dyn ServiceLifecycle>) -> Self {
        Self {
            name: config.name.clone(),
            service,
        }
    }

    /// Run until the process receives ctrl-c
    pub async fn run(&self) -> Result<()> {
        info!(service = %self.name, "service host starting");
        self.service.start();

        tokio::signal::ctrl_c()
            .await
            .map_err(|err| Error::Generic(Box::new(err)))?;

        info!(service = %self.name, "shutdown signal received");
        self.service.stop();
        self.service.shutdown();
        Ok(())
    }
}
