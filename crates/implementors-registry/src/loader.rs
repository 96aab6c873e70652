//! Implementor table loading.
//!
//! Tables come either from the fragment compiled into this crate or from a
//! generated `implementors/` directory on disk.

use crate::{
    error::{RegistryError, Result},
    fragment::parse_fragment,
    registry::{ImplementorRegistry, TraitImplementors},
};
use implementors_core::TraitPath;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Trait whose implementor table is compiled into the crate.
pub const EMBEDDED_TRAIT_PATH: &str = "core::ops::deref::DerefMut";

const EMBEDDED_FRAGMENT: &str =
    include_str!("../assets/implementors/core/ops/deref/trait.DerefMut.js");

/// Loader for implementor fragments.
pub struct ImplementorLoader {
    /// Base `implementors/` directory
    implementors_dir: PathBuf,
}

impl ImplementorLoader {
    /// Create a new loader over the given `implementors/` directory.
    ///
    /// # Errors
    /// Returns error if the directory doesn't exist or isn't a directory.
    pub fn new(implementors_dir: impl Into<PathBuf>) -> Result<Self> {
        let implementors_dir = implementors_dir.into();

        if !implementors_dir.is_dir() {
            return Err(RegistryError::DirectoryNotFound {
                path: implementors_dir.display().to_string(),
            });
        }

        Ok(Self { implementors_dir })
    }

    /// The directory this loader reads from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.implementors_dir
    }

    /// Parse the implementor table compiled into the crate.
    ///
    /// # Errors
    /// Returns error only if the embedded asset is malformed.
    pub fn embedded() -> Result<TraitImplementors> {
        let trait_path = TraitPath::new(EMBEDDED_TRAIT_PATH)?;
        let registry = parse_fragment(EMBEDDED_FRAGMENT, "<embedded>")?;

        debug!(
            trait_path = %trait_path,
            libraries = registry.len(),
            implementors = registry.descriptor_count(),
            "loaded embedded implementors"
        );

        Ok(TraitImplementors::new(trait_path, registry))
    }

    /// Load the table of a single trait.
    ///
    /// # Errors
    /// Returns error if the fragment doesn't exist, can't be read, or is invalid.
    pub fn load(&self, trait_path: &TraitPath) -> Result<TraitImplementors> {
        let path = self.implementors_dir.join(trait_path.fragment_path());

        if !path.is_file() {
            return Err(RegistryError::NotFound {
                name: trait_path.to_string(),
            });
        }

        let registry = Self::load_from_path(&path)?;

        debug!(
            trait_path = %trait_path,
            libraries = registry.len(),
            "loaded implementors fragment"
        );

        Ok(TraitImplementors::new(trait_path.clone(), registry))
    }

    /// Load every trait fragment below the directory, sorted by trait path.
    ///
    /// Fragments that fail to load are logged as warnings and skipped.
    ///
    /// # Errors
    /// Returns error if the directory can't be read.
    pub fn load_all(&self) -> Result<Vec<TraitImplementors>> {
        let mut tables = Vec::new();

        self.walk_and_load_recursive(&self.implementors_dir, &mut tables)?;
        tables.sort_by(|a, b| a.trait_path().cmp(b.trait_path()));

        info!(
            count = tables.len(),
            dir = %self.implementors_dir.display(),
            "loaded implementors fragments"
        );

        Ok(tables)
    }

    /// Recursively walk a directory and load all trait fragments.
    fn walk_and_load_recursive(
        &self,
        dir: &Path,
        tables: &mut Vec<TraitImplementors>,
    ) -> Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                self.walk_and_load_recursive(&path, tables)?;
                continue;
            }

            let Ok(relative) = path.strip_prefix(&self.implementors_dir) else {
                continue;
            };
            // Anything that isn't `trait.<Name>.js` is not ours.
            let Ok(trait_path) = TraitPath::from_fragment_path(relative) else {
                continue;
            };

            match Self::load_from_path(&path) {
                Ok(registry) => tables.push(TraitImplementors::new(trait_path, registry)),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "skipping invalid implementors fragment"
                    );
                }
            }
        }

        Ok(())
    }

    /// Load a fragment from a specific file path.
    fn load_from_path(path: &Path) -> Result<ImplementorRegistry> {
        let contents = std::fs::read_to_string(path).map_err(|e| RegistryError::LoadError {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        parse_fragment(&contents, &path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_fragment(dir: &Path, relative: &str, body: &str) -> PathBuf {
        let path = dir.join(relative);
        let parent = path.parent().expect("fragment has parent");
        std::fs::create_dir_all(parent).expect("create fragment dir");
        std::fs::write(&path, body).expect("write fragment");
        path
    }

    fn fragment_for(library: &str, type_path: &str) -> String {
        format!(
            "(function() {{var implementors = {{}};\nimplementors[\"{library}\"] = [{{\"text\":\"impl X for Y\",\"synthetic\":false,\"types\":[\"{type_path}\"]}}];\n}})()"
        )
    }

    #[test]
    fn test_loader_new_with_existing_dir() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let loader = ImplementorLoader::new(temp_dir.path()).expect("create loader");
        assert_eq!(loader.dir(), temp_dir.path());
    }

    #[test]
    fn test_loader_new_with_nonexistent_dir() {
        let loader = ImplementorLoader::new("/nonexistent/path/to/implementors");
        assert!(matches!(loader, Err(RegistryError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_loader_new_with_file() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let file = write_fragment(temp_dir.path(), "trait.Foo.js", "");
        assert!(ImplementorLoader::new(file).is_err());
    }

    #[test]
    fn test_embedded_table() {
        let table = ImplementorLoader::embedded().expect("parse embedded fragment");
        assert_eq!(table.trait_path().as_str(), EMBEDDED_TRAIT_PATH);

        let registry = table.registry();
        let names: Vec<&str> = registry.libraries().map(|l| l.as_str()).collect();
        assert_eq!(names, ["raylib", "syn"]);
        assert!(registry.synthetic().is_empty());
    }

    #[test]
    fn test_load_single_trait() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write_fragment(
            temp_dir.path(),
            "core/ops/deref/trait.DerefMut.js",
            &fragment_for("demo", "demo::Buffer"),
        );

        let loader = ImplementorLoader::new(temp_dir.path()).expect("create loader");
        let trait_path = TraitPath::new("core::ops::deref::DerefMut").expect("valid trait path");
        let table = loader.load(&trait_path).expect("load trait");

        assert_eq!(table.trait_path(), &trait_path);
        assert_eq!(table.registry().find_by_type("demo::Buffer").len(), 1);
    }

    #[test]
    fn test_load_nonexistent_trait() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let loader = ImplementorLoader::new(temp_dir.path()).expect("create loader");
        let trait_path = TraitPath::new("core::clone::Clone").expect("valid trait path");

        let result = loader.load(&trait_path);
        assert!(matches!(result, Err(RegistryError::NotFound { .. })));
    }

    #[test]
    fn test_load_all_nested_and_sorted() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write_fragment(
            temp_dir.path(),
            "core/ops/deref/trait.DerefMut.js",
            &fragment_for("demo", "demo::Buffer"),
        );
        write_fragment(
            temp_dir.path(),
            "core/clone/trait.Clone.js",
            &fragment_for("demo", "demo::Handle"),
        );
        write_fragment(temp_dir.path(), "core/clone/README.md", "not a fragment");

        let loader = ImplementorLoader::new(temp_dir.path()).expect("create loader");
        let tables = loader.load_all().expect("load all fragments");

        let traits: Vec<&str> = tables.iter().map(|t| t.trait_path().as_str()).collect();
        assert_eq!(traits, ["core::clone::Clone", "core::ops::deref::DerefMut"]);
    }

    #[test]
    fn test_load_all_skips_invalid() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write_fragment(
            temp_dir.path(),
            "core/clone/trait.Clone.js",
            &fragment_for("demo", "demo::Handle"),
        );
        write_fragment(
            temp_dir.path(),
            "core/fmt/trait.Debug.js",
            "implementors[\"demo\"] = [[[",
        );

        let loader = ImplementorLoader::new(temp_dir.path()).expect("create loader");
        let tables = loader.load_all().expect("load all fragments");

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].trait_path().as_str(), "core::clone::Clone");
    }
}
