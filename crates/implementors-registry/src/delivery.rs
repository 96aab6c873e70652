//! Handing a built registry to whoever is ready for it.
//!
//! A registry is delivered exactly once. If the ambient environment has a
//! registration host, the registry is moved into it; otherwise it is parked
//! in the environment's pending slot until a host initializes and takes it.

use crate::{error::Result, loader::ImplementorLoader, registry::ImplementorRegistry};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, warn};

/// A host-provided registration capability.
///
/// The registry is passed by value, so nothing is retained on the
/// delivering side once the call returns.
pub trait ImplementorHost: Send + Sync {
    /// Accept the registry.
    fn register_implementors(&self, registry: ImplementorRegistry);
}

impl<F> ImplementorHost for F
where
    F: Fn(ImplementorRegistry) + Send + Sync,
{
    fn register_implementors(&self, registry: ImplementorRegistry) {
        self(registry);
    }
}

/// Which of the two delivery arms ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The host's registration capability was invoked.
    Registered,
    /// The registry was stored in the pending slot.
    Pending,
}

/// Well-known slot holding a registry nobody has picked up yet.
#[derive(Debug, Default)]
pub struct PendingSlot {
    registry: Mutex<Option<ImplementorRegistry>>,
}

impl PendingSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a registry in the slot, replacing anything already there.
    pub fn store(&self, registry: ImplementorRegistry) {
        let mut slot = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            warn!("pending implementors overwritten before pickup");
        }
        *slot = Some(registry);
    }

    /// Pick up the parked registry, leaving the slot empty.
    pub fn take(&self) -> Option<ImplementorRegistry> {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Whether a registry is waiting for pickup.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

/// The ambient environment a registry is delivered into.
///
/// Holds the optional registration host and the pending slot.
#[derive(Default)]
pub struct HostEnvironment {
    host: RwLock<Option<Arc<dyn ImplementorHost>>>,
    pending: PendingSlot,
}

impl HostEnvironment {
    /// An environment with no host installed yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An environment whose host is already available.
    #[must_use]
    pub fn with_host(host: Arc<dyn ImplementorHost>) -> Self {
        Self {
            host: RwLock::new(Some(host)),
            pending: PendingSlot::new(),
        }
    }

    /// Install the registration host.
    ///
    /// Does not drain the pending slot; a late host picks that up itself
    /// through [`HostEnvironment::take_pending`].
    pub fn install_host(&self, host: Arc<dyn ImplementorHost>) {
        *self.host.write().unwrap_or_else(PoisonError::into_inner) = Some(host);
        debug!("implementors host installed");
    }

    /// Whether a registration host is available.
    #[must_use]
    pub fn has_host(&self) -> bool {
        self.host
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The pending slot.
    #[must_use]
    pub fn pending(&self) -> &PendingSlot {
        &self.pending
    }

    /// Pick up a registry that was delivered before any host existed.
    pub fn take_pending(&self) -> Option<ImplementorRegistry> {
        self.pending.take()
    }

    fn host(&self) -> Option<Arc<dyn ImplementorHost>> {
        self.host
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for HostEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostEnvironment")
            .field("has_host", &self.has_host())
            .field("pending", &self.pending.is_pending())
            .finish()
    }
}

/// Deliver a registry to the environment.
///
/// Exactly one of the two arms runs: the host is invoked with the registry,
/// or the registry is stored in the pending slot. The host call is made
/// synchronously and without holding any lock.
pub fn deliver(registry: ImplementorRegistry, environment: &HostEnvironment) -> Delivery {
    let libraries = registry.len();
    let implementors = registry.descriptor_count();

    if let Some(host) = environment.host() {
        debug!(libraries, implementors, "registering implementors with host");
        host.register_implementors(registry);
        Delivery::Registered
    } else {
        debug!(libraries, implementors, "no host available, implementors pending");
        environment.pending.store(registry);
        Delivery::Pending
    }
}

/// Build the embedded registry and deliver it.
///
/// Meant to run once per process.
///
/// # Errors
/// Returns error only if the embedded table is malformed; delivery itself
/// cannot fail.
pub fn load_and_deliver(environment: &HostEnvironment) -> Result<Delivery> {
    let registry = ImplementorLoader::embedded()?.into_registry();
    Ok(deliver(registry, environment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ImplementorDescriptor;
    use implementors_core::LibraryName;

    #[derive(Default)]
    struct RecordingHost {
        received: Mutex<Vec<ImplementorRegistry>>,
    }

    impl ImplementorHost for RecordingHost {
        fn register_implementors(&self, registry: ImplementorRegistry) {
            self.received.lock().expect("lock received").push(registry);
        }
    }

    fn small_registry() -> ImplementorRegistry {
        ImplementorRegistry::from_entries([(
            LibraryName::new("syn").expect("valid name"),
            vec![ImplementorDescriptor::new(
                "impl DerefMut for Tilde",
                false,
                vec!["syn::token::Tilde".to_string()],
            )],
        )])
        .expect("build registry")
    }

    #[test]
    fn test_deliver_to_host() {
        let host = Arc::new(RecordingHost::default());
        let environment = HostEnvironment::with_host(host.clone());

        let delivery = deliver(small_registry(), &environment);

        assert_eq!(delivery, Delivery::Registered);
        assert_eq!(*host.received.lock().expect("lock received"), [small_registry()]);
        assert!(!environment.pending().is_pending());
    }

    #[test]
    fn test_deliver_without_host_parks_registry() {
        let environment = HostEnvironment::new();

        let delivery = deliver(small_registry(), &environment);

        assert_eq!(delivery, Delivery::Pending);
        assert!(environment.pending().is_pending());
        assert_eq!(environment.take_pending(), Some(small_registry()));
        assert!(!environment.pending().is_pending());
        assert_eq!(environment.take_pending(), None);
    }

    #[test]
    fn test_closure_host() {
        let seen = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&seen);
        let environment = HostEnvironment::with_host(Arc::new(move |registry: ImplementorRegistry| {
            *counter.lock().expect("lock counter") += registry.descriptor_count();
        }));

        assert_eq!(deliver(small_registry(), &environment), Delivery::Registered);
        assert_eq!(*seen.lock().expect("lock counter"), 1);
    }

    #[test]
    fn test_late_host_does_not_drain_slot() {
        let environment = HostEnvironment::new();
        deliver(small_registry(), &environment);

        let host = Arc::new(RecordingHost::default());
        environment.install_host(host.clone());

        assert!(environment.has_host());
        assert!(host.received.lock().expect("lock received").is_empty());
        assert_eq!(environment.take_pending(), Some(small_registry()));
    }

    #[test]
    fn test_pending_slot_overwrite_keeps_latest() {
        let slot = PendingSlot::new();
        slot.store(ImplementorRegistry::default());
        slot.store(small_registry());
        assert_eq!(slot.take(), Some(small_registry()));
    }

    #[test]
    fn test_environment_debug() {
        let environment = HostEnvironment::new();
        let rendered = format!("{environment:?}");
        assert!(rendered.contains("has_host: false"));
        assert!(rendered.contains("pending: false"));
    }
}
