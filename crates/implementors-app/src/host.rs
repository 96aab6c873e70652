//! Console registration host.

use implementors_core::TraitPath;
use implementors_registry::{ImplementorHost, ImplementorRegistry};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Host that keeps what it was given and renders it as text.
#[derive(Debug)]
pub struct ConsoleHost {
    trait_path: TraitPath,
    received: Mutex<Vec<ImplementorRegistry>>,
}

impl ConsoleHost {
    /// Create a host for the implementors of one trait.
    #[must_use]
    pub fn new(trait_path: TraitPath) -> Self {
        Self {
            trait_path,
            received: Mutex::new(Vec::new()),
        }
    }

    /// Take ownership of a registry.
    pub fn accept(&self, registry: ImplementorRegistry) {
        debug!(libraries = registry.len(), "console host received implementors");
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(registry);
    }

    /// How many registries this host has received.
    #[must_use]
    pub fn registrations(&self) -> usize {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// A heading naming the trait, then one line per library followed by
    /// its implementations in plain text. Empty until something is received.
    #[must_use]
    pub fn report(&self) -> String {
        let received = self.received.lock().unwrap_or_else(PoisonError::into_inner);
        let mut out = String::new();

        for registry in received.iter() {
            out.push_str(&format!(
                "{} implementors ({})\n",
                self.trait_path.name(),
                self.trait_path
            ));
            for (library, implementors) in registry.iter() {
                out.push_str(&format!("{library} ({} implementors)\n", implementors.len()));
                for descriptor in implementors {
                    out.push_str(&format!("  {}\n", descriptor.plain_text()));
                }
            }
        }

        out
    }
}

impl ImplementorHost for ConsoleHost {
    fn register_implementors(&self, registry: ImplementorRegistry) {
        self.accept(registry);
    }
}
