//! Shared identifier types.
//!
//! This module defines validated newtypes for the names that appear in
//! generated implementor tables: library (crate) names, fully-qualified type
//! paths, and the trait a table belongs to.

use crate::error::CoreError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

/// File-name prefix rustdoc uses for per-trait implementor fragments.
const FRAGMENT_PREFIX: &str = "trait.";

/// File-name suffix rustdoc uses for per-trait implementor fragments.
const FRAGMENT_SUFFIX: &str = ".js";

fn path_regex() -> &'static Regex {
    static PATH_REGEX: OnceLock<Regex> = OnceLock::new();
    PATH_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*$").expect("valid regex")
    })
}

/// Newtype for library identifiers with validation.
///
/// Library names follow crate naming: an ASCII letter or underscore, then
/// letters, digits, underscores or hyphens, 1-64 characters in total.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LibraryName(String);

impl LibraryName {
    /// Create a new `LibraryName` from a string.
    ///
    /// # Errors
    /// Returns error if the name doesn't match crate naming rules.
    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(name: &str) -> Result<(), CoreError> {
        static LIBRARY_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = LIBRARY_REGEX
            .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("valid regex"));

        if name.is_empty() || name.len() > 64 {
            return Err(CoreError::Validation(format!(
                "invalid library name: must be 1-64 characters, got {} characters",
                name.len()
            )));
        }

        if regex.is_match(name) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "invalid library name: must be a crate name, got '{name}'"
            )))
        }
    }
}

impl fmt::Display for LibraryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for LibraryName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LibraryName {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LibraryName> for String {
    fn from(value: LibraryName) -> Self {
        value.0
    }
}

/// Newtype for fully-qualified type paths such as `syn::token::Tilde`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypePath(String);

impl TypePath {
    /// Create a new `TypePath` from a string.
    ///
    /// # Errors
    /// Returns error if the string is not a `::`-separated identifier path.
    pub fn new(path: impl Into<String>) -> Result<Self, CoreError> {
        let path = path.into();
        if path_regex().is_match(&path) {
            Ok(Self(path))
        } else {
            Err(CoreError::Validation(format!(
                "invalid type path: expected `::`-separated identifiers, got '{path}'"
            )))
        }
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TypePath {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TypePath> for String {
    fn from(value: TypePath) -> Self {
        value.0
    }
}

/// Fully-qualified path of the trait an implementor table belongs to.
///
/// Rustdoc writes one fragment per trait at
/// `implementors/<module dirs>/trait.<Name>.js`, so a trait path maps to and
/// from a relative fragment path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TraitPath(String);

impl TraitPath {
    /// Create a new `TraitPath` from a string.
    ///
    /// # Errors
    /// Returns error if the path is malformed or has no module segment.
    pub fn new(path: impl Into<String>) -> Result<Self, CoreError> {
        let path = path.into();
        if !path_regex().is_match(&path) || !path.contains("::") {
            return Err(CoreError::Validation(format!(
                "invalid trait path: expected `crate::module::Trait`, got '{path}'"
            )));
        }
        Ok(Self(path))
    }

    /// Derive the trait path from a fragment path relative to the
    /// `implementors/` directory, e.g. `core/ops/deref/trait.DerefMut.js`.
    ///
    /// # Errors
    /// Returns error if the file name is not a trait fragment or a directory
    /// component is not a plain name.
    pub fn from_fragment_path(relative: &Path) -> Result<Self, CoreError> {
        let invalid = || {
            CoreError::Validation(format!(
                "not a trait fragment path: {}",
                relative.display()
            ))
        };

        let file_name = relative
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(invalid)?;
        let name = file_name
            .strip_prefix(FRAGMENT_PREFIX)
            .and_then(|s| s.strip_suffix(FRAGMENT_SUFFIX))
            .ok_or_else(invalid)?;

        let mut segments = Vec::new();
        if let Some(parent) = relative.parent() {
            for component in parent.components() {
                match component {
                    Component::Normal(part) => {
                        segments.push(part.to_str().ok_or_else(invalid)?.to_string());
                    }
                    Component::CurDir => {}
                    _ => return Err(invalid()),
                }
            }
        }
        segments.push(name.to_string());

        Self::new(segments.join("::"))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The unqualified trait name (last path segment).
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rsplit("::").next().unwrap_or(&self.0)
    }

    /// The fragment path relative to the `implementors/` directory.
    #[must_use]
    pub fn fragment_path(&self) -> PathBuf {
        let mut segments: Vec<&str> = self.0.split("::").collect();
        let name = segments.pop().unwrap_or_default();

        let mut path: PathBuf = segments.into_iter().collect();
        path.push(format!("{FRAGMENT_PREFIX}{name}{FRAGMENT_SUFFIX}"));
        path
    }
}

impl fmt::Display for TraitPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TraitPath {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TraitPath> for String {
    fn from(value: TraitPath) -> Self {
        value.0
    }
}
