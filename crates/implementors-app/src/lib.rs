//! Implementors application shell.
//!
//! Thin binary layer: reads configuration, sets up logging, builds the
//! implementor registry and delivers it to a console host. All registry
//! logic lives in `implementors-registry`.

mod host;

pub use host::ConsoleHost;

use anyhow::Context;
use implementors_core::{AppConfig, TraitPath};
use implementors_registry::{
    deliver, Delivery, HostEnvironment, ImplementorLoader, ImplementorRegistry, TraitImplementors,
};
use std::sync::Arc;
use tracing::info;

/// Initialize tracing subscriber for logging.
///
/// `RUST_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

/// Build the implementor table the configuration points at.
///
/// Without a docs directory the embedded table is used.
pub fn build_table(config: &AppConfig) -> anyhow::Result<TraitImplementors> {
    let table = match &config.source.docs_dir {
        Some(dir) => {
            let trait_path = TraitPath::new(config.source.trait_path.as_str())
                .context("invalid source.trait_path")?;
            let loader = ImplementorLoader::new(dir)
                .with_context(|| format!("opening implementors directory {}", dir.display()))?;
            loader
                .load(&trait_path)
                .with_context(|| format!("loading implementors of {trait_path}"))?
        }
        None => ImplementorLoader::embedded().context("parsing embedded implementors")?,
    };

    info!(
        trait_path = %table.trait_path(),
        libraries = table.registry().len(),
        implementors = table.registry().descriptor_count(),
        "built implementor registry"
    );

    Ok(table)
}

/// The environment the registry is delivered into.
///
/// With deferred registration the host is not installed yet.
pub fn environment_for(config: &AppConfig, host: Arc<ConsoleHost>) -> HostEnvironment {
    if config.host.defer_registration {
        HostEnvironment::new()
    } else {
        HostEnvironment::with_host(host)
    }
}

/// Deliver the registry, then let a late host pick up anything pending.
pub fn deliver_to(
    registry: ImplementorRegistry,
    environment: &HostEnvironment,
    host: &Arc<ConsoleHost>,
) -> Delivery {
    let delivery = deliver(registry, environment);

    if delivery == Delivery::Pending {
        environment.install_host(host.clone());
        if let Some(pending) = environment.take_pending() {
            info!("host picked up pending implementors");
            host.accept(pending);
        }
    }

    delivery
}

/// Application entry point.
pub fn run() -> anyhow::Result<()> {
    let config = AppConfig::load_with_env().context("loading configuration")?;
    init_tracing(&config.logging.filter);

    info!("Starting implementors v{}", env!("CARGO_PKG_VERSION"));

    let table = build_table(&config)?;
    let host = Arc::new(ConsoleHost::new(table.trait_path().clone()));
    let environment = environment_for(&config, host.clone());

    let delivery = deliver_to(table.into_registry(), &environment, &host);
    info!(?delivery, "implementors delivered");

    print!("{}", host.report());
    Ok(())
}
