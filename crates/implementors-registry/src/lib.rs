//! Implementors Registry - Trait implementor tables for documentation hosts.
//!
//! Rustdoc emits, for every trait, a table mapping each library to the
//! implementations of that trait it provides. This crate parses those tables,
//! keeps them as an immutable [`ImplementorRegistry`], and delivers a registry
//! exactly once to a registration host, or parks it in a pending slot when no
//! host exists yet.
//!
//! # Architecture
//!
//! - **Descriptors** ([`descriptor`]): One rendered implementation record
//! - **Registry** ([`registry`]): Immutable library-to-descriptors map with queries
//! - **Fragments** ([`fragment`]): The generated script format tables ship in
//! - **Loader** ([`loader`]): Embedded table and `implementors/` directory loading
//! - **Delivery** ([`delivery`]): Host capability, pending slot, and the delivery branch
//! - **Errors** ([`error`]): Registry-specific error types
//!
//! # Example
//!
//! ```rust
//! use implementors_registry::{load_and_deliver, Delivery, HostEnvironment};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // No host yet: the registry waits in the pending slot
//! let environment = HostEnvironment::new();
//! assert_eq!(load_and_deliver(&environment)?, Delivery::Pending);
//!
//! let registry = environment.take_pending().expect("registry is pending");
//! for (library, implementors) in registry.iter() {
//!     println!("{library}: {} implementors", implementors.len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod delivery;
pub mod descriptor;
pub mod error;
pub mod fragment;
pub mod loader;
pub mod registry;

// Re-export commonly used types
pub use delivery::{
    deliver, load_and_deliver, Delivery, HostEnvironment, ImplementorHost, PendingSlot,
};
pub use descriptor::ImplementorDescriptor;
pub use error::{RegistryError, Result};
pub use fragment::{parse_fragment, render_fragment};
pub use loader::{ImplementorLoader, EMBEDDED_TRAIT_PATH};
pub use registry::{ImplementorRegistry, TraitImplementors};
