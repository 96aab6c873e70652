//! Implementors Core - Foundation crate for the implementor registry workspace.
//!
//! This crate provides the shared identifiers, error handling, and configuration
//! management that the registry and the application shell depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Validated newtypes (`LibraryName`, `TypePath`, `TraitPath`)
//!
//! # Example
//!
//! ```rust
//! use implementors_core::{AppConfig, LibraryName, TraitPath};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert!(config.source.docs_dir.is_none());
//!
//! let library = LibraryName::new("raylib")?;
//! let trait_path = TraitPath::new("core::ops::deref::DerefMut")?;
//! println!("{library} implements {}", trait_path.name());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, HostConfig, LoggingConfig, SourceConfig};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use types::{LibraryName, TraitPath, TypePath};
