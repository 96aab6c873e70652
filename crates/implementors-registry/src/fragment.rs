//! Rustdoc implementors fragment format.
//!
//! Rustdoc emits one script per trait under `implementors/`. Each library's
//! table sits on its own assignment line:
//!
//! ```text
//! (function() {var implementors = {};
//! implementors["syn"] = [{"text":"...","synthetic":false,"types":["syn::token::Add"]}];
//! if (window.register_implementors) {window.register_implementors(implementors);} else {window.pending_implementors = implementors;}})()
//! ```
//!
//! Only the assignment lines carry data; the wrapper and trailer are ignored.

use crate::{
    descriptor::ImplementorDescriptor,
    error::{RegistryError, Result},
    registry::ImplementorRegistry,
};
use implementors_core::LibraryName;
use tracing::debug;

const ASSIGNMENT_PREFIX: &str = "implementors[\"";
const ASSIGNMENT_SEPARATOR: &str = "\"] = ";

const FRAGMENT_HEADER: &str = "(function() {var implementors = {};";
const FRAGMENT_TRAILER: &str = "if (window.register_implementors) {window.register_implementors(implementors);} else {window.pending_implementors = implementors;}})()";

/// Parse a fragment into a registry.
///
/// `origin` names the fragment in errors and logs (usually its path).
///
/// # Errors
/// Returns error on a malformed assignment line, a library assigned twice,
/// or an invalid descriptor.
pub fn parse_fragment(source: &str, origin: &str) -> Result<ImplementorRegistry> {
    let mut entries = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let Some(rest) = line.trim().strip_prefix(ASSIGNMENT_PREFIX) else {
            continue;
        };
        let line_number = index + 1;
        let malformed = |reason: String| RegistryError::Fragment {
            path: origin.to_string(),
            line: line_number,
            reason,
        };

        let (library, value) = rest
            .split_once(ASSIGNMENT_SEPARATOR)
            .ok_or_else(|| malformed("expected `implementors[\"<library>\"] = [...];`".to_string()))?;

        let library = LibraryName::new(library).map_err(|e| malformed(e.to_string()))?;

        let value = value.trim_end();
        let value = value.strip_suffix(';').unwrap_or(value);
        let descriptors: Vec<ImplementorDescriptor> =
            serde_json::from_str(value).map_err(|e| malformed(e.to_string()))?;

        debug!(
            origin,
            library = %library,
            count = descriptors.len(),
            "parsed implementors assignment"
        );

        entries.push((library, descriptors));
    }

    ImplementorRegistry::from_entries(entries)
}

/// Render a registry in the fragment format rustdoc emits.
pub fn render_fragment(registry: &ImplementorRegistry) -> Result<String> {
    let mut out = String::new();
    out.push_str(FRAGMENT_HEADER);
    out.push('\n');

    for (library, descriptors) in registry.iter() {
        let json = serde_json::to_string(descriptors)?;
        out.push_str(&format!(
            "{ASSIGNMENT_PREFIX}{library}{ASSIGNMENT_SEPARATOR}{json};\n"
        ));
    }

    out.push_str(FRAGMENT_TRAILER);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"(function() {var implementors = {};
implementors["syn"] = [{"text":"impl <a class=\"trait\">DerefMut</a> for <a class=\"struct\">Add</a>","synthetic":false,"types":["syn::token::Add"]},{"text":"impl <a class=\"trait\">DerefMut</a> for <a class=\"struct\">Sub</a>","synthetic":false,"types":["syn::token::Sub"]}];
implementors["raylib"] = [{"text":"impl <a class=\"trait\">DerefMut</a> for <a class=\"struct\">Wave</a>","synthetic":false,"types":["raylib::core::audio::Wave"]}];
if (window.register_implementors) {window.register_implementors(implementors);} else {window.pending_implementors = implementors;}})()"#;

    #[test]
    fn test_parse_sample() {
        let registry = parse_fragment(SAMPLE, "sample.js").expect("parse sample");

        assert_eq!(registry.len(), 2);
        let syn = registry.get("syn").expect("get syn");
        assert_eq!(syn.len(), 2);
        assert_eq!(syn[0].types(), ["syn::token::Add"]);
        assert_eq!(syn[1].types(), ["syn::token::Sub"]);
        assert_eq!(syn[1].plain_text(), "impl DerefMut for Sub");
        assert_eq!(registry.get("raylib").expect("get raylib").len(), 1);
    }

    #[test]
    fn test_parse_ignores_wrapper_only() {
        let source = format!("{FRAGMENT_HEADER}\n\n{FRAGMENT_TRAILER}");
        let registry = parse_fragment(&source, "empty.js").expect("parse empty fragment");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_parse_reports_line_of_bad_json() {
        let source = format!("{FRAGMENT_HEADER}\nimplementors[\"syn\"] = [{{\"text\":}}];\n");
        let err = parse_fragment(&source, "bad.js").expect_err("reject bad json");
        assert!(matches!(
            err,
            RegistryError::Fragment { line: 2, ref path, .. } if path == "bad.js"
        ));
    }

    #[test]
    fn test_parse_reports_missing_separator() {
        let err = parse_fragment("implementors[\"syn\"] [];", "bad.js").expect_err("reject line");
        assert!(matches!(err, RegistryError::Fragment { line: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_bad_library_name() {
        let err = parse_fragment("implementors[\"two words\"] = [];", "bad.js")
            .expect_err("reject library name");
        assert!(matches!(err, RegistryError::Fragment { line: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_duplicate_library() {
        let source = "implementors[\"syn\"] = [];\nimplementors[\"syn\"] = [];";
        let err = parse_fragment(source, "dup.js").expect_err("reject duplicate");
        assert!(matches!(err, RegistryError::DuplicateLibrary { .. }));
    }

    #[test]
    fn test_parse_tolerates_missing_semicolon() {
        let registry =
            parse_fragment("implementors[\"syn\"] = []", "loose.js").expect("parse loose line");
        assert_eq!(registry.get("syn").expect("get syn").len(), 0);
    }

    #[test]
    fn test_render_matches_generator_layout() {
        let registry = parse_fragment(SAMPLE, "sample.js").expect("parse sample");
        let rendered = render_fragment(&registry).expect("render fragment");

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], FRAGMENT_HEADER);
        assert!(lines[1].starts_with("implementors[\"raylib\"] = [{"));
        assert!(lines[2].starts_with("implementors[\"syn\"] = [{"));
        assert_eq!(lines[3], FRAGMENT_TRAILER);

        assert_eq!(
            parse_fragment(&rendered, "rendered.js").expect("reparse"),
            registry
        );
    }
}
