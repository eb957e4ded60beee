//! Processor service host
//!
//! Composition root: loads configuration, installs logging, walks the module
//! graph into the container, assembles the service object graph through the
//! factory cache and hands it to the host control loop.

mod bus;
mod config;
mod engine;
mod host;
mod logging;
mod modules;
mod service;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use wireup::{
    register_shared, Error, FactoryCache, Lifetime, MemoryContainer, ModuleId, ModuleRegistrar,
};

use crate::bus::ServiceBus;
use crate::config::{AppConfig, ConfigLoader};
use crate::engine::{Engine, EngineManager};
use crate::host::ServiceHost;
use crate::logging::init_logging;
use crate::modules::HostModule;
use crate::service::{ProcessorService, ServiceLifecycle};

#[derive(Parser, Debug)]
#[command(name = "wireup-host")]
#[command(about = "Processor service host", version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load()?;
    init_logging(&config.logging)?;

    run(config).await?;
    Ok(())
}

/// Walk the module graph into a fresh container
///
/// `ConfigModule` registers a default-loaded config during the walk; the
/// caller's config carries the CLI-selected file, so it is re-registered
/// afterwards and wins under the container's overwrite semantics.
fn bootstrap(config: &AppConfig) -> wireup::Result<(MemoryContainer, Arc<FactoryCache>)> {
    let factories = Arc::new(FactoryCache::new());
    let registrar = ModuleRegistrar::new(factories.clone());
    let mut container = MemoryContainer::new();

    let applied = registrar.register(&mut container, ModuleId::of::<HostModule>())?;
    info!(modules = applied.len(), "registration modules applied");

    register_shared::<AppConfig>(
        &mut container,
        Arc::new(config.clone()),
        Lifetime::Singleton,
    );

    Ok((container, factories))
}

async fn run(config: AppConfig) -> wireup::Result<()> {
    let (container, factories) = bootstrap(&config)?;

    // Resolve the registered pieces into the running object graph.
    let bus = container
        .service::<dyn ServiceBus>()
        .ok_or_else(|| Error::configuration("service bus missing from container"))?;
    bus.start(&config.bus.endpoint)?;

    let engine: Arc<dyn Engine> = Arc::new(
        factories
            .get_or_build::<EngineManager, (Arc<dyn ServiceBus>,)>()?
            .invoke((bus,)),
    );
    let service: Arc<dyn ServiceLifecycle> = Arc::new(
        factories
            .get_or_build::<ProcessorService, (Arc<dyn Engine>,)>()?
            .invoke((engine,)),
    );

    ServiceHost::new(&config.service, service).run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_config_matches_the_loaded_config() {
        let mut config = AppConfig::default();
        config.service.name = "renamed-importer".to_string();
        config.bus.endpoint = "amqp://broker:5672".to_string();

        let (container, _) = bootstrap(&config).unwrap();

        // The singleton in the container is the config the host runs with,
        // not a default reload.
        let registered = container.service::<AppConfig>().unwrap();
        assert_eq!(registered.service.name, "renamed-importer");
        assert_eq!(registered.bus.endpoint, "amqp://broker:5672");
    }
}
