//! Implementor descriptor records.
//!
//! One descriptor describes one implementation of the table's trait, exactly
//! as the documentation generator rendered it.

use crate::error::{RegistryError, Result};
use implementors_core::TypePath;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A single implementation of a trait by a library type.
///
/// Descriptors are immutable once built; the serialized form is
/// `{"text": ..., "synthetic": ..., "types": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementorDescriptor {
    text: String,
    synthetic: bool,
    types: Vec<String>,
}

impl ImplementorDescriptor {
    /// Create a descriptor from its rendered markup, synthetic flag, and
    /// involved type paths.
    #[must_use]
    pub fn new(text: impl Into<String>, synthetic: bool, types: Vec<String>) -> Self {
        Self {
            text: text.into(),
            synthetic,
            types,
        }
    }

    /// Rendered markup describing the implementation.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the generator synthesized this implementation (auto traits
    /// and the like) rather than finding it written in source.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Fully-qualified names of the types involved, in generator order.
    #[must_use]
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Whether `type_path` is one of the involved types.
    #[must_use]
    pub fn involves(&self, type_path: &str) -> bool {
        self.types.iter().any(|t| t == type_path)
    }

    /// The rendered text with markup removed.
    ///
    /// ```rust
    /// use implementors_registry::ImplementorDescriptor;
    ///
    /// let descriptor = ImplementorDescriptor::new(
    ///     "impl <a href=\"x.html\">DerefMut</a> for <a>Wave</a>",
    ///     false,
    ///     vec!["raylib::core::audio::Wave".to_string()],
    /// );
    /// assert_eq!(descriptor.plain_text(), "impl DerefMut for Wave");
    /// ```
    #[must_use]
    pub fn plain_text(&self) -> String {
        static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid regex"));

        regex
            .replace_all(&self.text, "")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
    }

    /// Validate the descriptor for completeness and correctness.
    pub fn validate(&self, library: &str) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(RegistryError::ValidationError {
                library: library.to_string(),
                reason: "descriptor text cannot be empty".to_string(),
            });
        }

        for type_path in &self.types {
            TypePath::new(type_path.as_str()).map_err(|e| RegistryError::ValidationError {
                library: library.to_string(),
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave() -> ImplementorDescriptor {
        ImplementorDescriptor::new(
            "impl <a class=\"trait\" href=\"https://doc.rust-lang.org/1.55.0/core/ops/deref/trait.DerefMut.html\" title=\"trait core::ops::deref::DerefMut\">DerefMut</a> for <a class=\"struct\" href=\"raylib/core/audio/struct.Wave.html\" title=\"struct raylib::core::audio::Wave\">Wave</a>",
            false,
            vec!["raylib::core::audio::Wave".to_string()],
        )
    }

    #[test]
    fn test_accessors() {
        let descriptor = wave();
        assert!(!descriptor.is_synthetic());
        assert_eq!(descriptor.types(), ["raylib::core::audio::Wave"]);
        assert!(descriptor.text().starts_with("impl <a class=\"trait\""));
    }

    #[test]
    fn test_involves() {
        let descriptor = wave();
        assert!(descriptor.involves("raylib::core::audio::Wave"));
        assert!(!descriptor.involves("raylib::core::audio::Sound"));
        assert!(!descriptor.involves("Wave"));
    }

    #[test]
    fn test_plain_text_strips_markup() {
        assert_eq!(wave().plain_text(), "impl DerefMut for Wave");
    }

    #[test]
    fn test_plain_text_decodes_entities() {
        let descriptor = ImplementorDescriptor::new(
            "impl&lt;'a&gt; <a>Trait</a> for &amp;'a <a>Foo</a>",
            true,
            vec!["demo::Foo".to_string()],
        );
        assert_eq!(descriptor.plain_text(), "impl<'a> Trait for &'a Foo");
    }

    #[test]
    fn test_validate() {
        assert!(wave().validate("raylib").is_ok());

        let empty = ImplementorDescriptor::new("  ", false, vec![]);
        assert!(matches!(
            empty.validate("raylib"),
            Err(RegistryError::ValidationError { .. })
        ));

        let bad_type = ImplementorDescriptor::new("impl X for Y", false, vec!["not a path".to_string()]);
        assert!(matches!(
            bad_type.validate("raylib"),
            Err(RegistryError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(wave()).expect("serialize descriptor");
        assert_eq!(json["synthetic"], serde_json::Value::Bool(false));
        assert_eq!(json["types"][0], "raylib::core::audio::Wave");
        assert!(json["text"].is_string());
    }
}
