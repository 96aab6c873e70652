//! Immutable library-to-implementors registry with query support.

use crate::{
    descriptor::ImplementorDescriptor,
    error::{RegistryError, Result},
};
use implementors_core::{LibraryName, TraitPath};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::{btree_map::Entry, BTreeMap};
use std::fmt;

/// Mapping from library name to the ordered implementors it provides.
///
/// Built once, then only read. Serializes as a plain JSON object keyed by
/// library, the same shape the generator emits. Deserializing goes through
/// [`ImplementorRegistry::from_entries`], so repeated keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImplementorRegistry {
    libraries: BTreeMap<LibraryName, Vec<ImplementorDescriptor>>,
}

impl ImplementorRegistry {
    /// Build a registry from `(library, descriptors)` entries.
    ///
    /// Descriptor order within a library is preserved.
    ///
    /// # Errors
    /// Returns error if a library appears twice or a descriptor is invalid.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (LibraryName, Vec<ImplementorDescriptor>)>,
    {
        let mut libraries = BTreeMap::new();

        for (library, descriptors) in entries {
            for descriptor in &descriptors {
                descriptor.validate(library.as_str())?;
            }

            match libraries.entry(library) {
                Entry::Occupied(entry) => {
                    return Err(RegistryError::DuplicateLibrary {
                        library: entry.key().to_string(),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(descriptors);
                }
            }
        }

        Ok(Self { libraries })
    }

    /// Decode a registry from its JSON object form and validate it.
    ///
    /// # Errors
    /// Returns `DuplicateLibrary` if the object repeats a key, `Json` if it
    /// isn't a well-formed table.
    pub fn from_json(json: &str) -> Result<Self> {
        let RawEntries(entries) = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Encode the registry as its JSON object form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Get the implementors provided by a library.
    ///
    /// # Errors
    /// Returns error if the library is not in the registry.
    pub fn get(&self, library: &str) -> Result<&[ImplementorDescriptor]> {
        self.libraries
            .get(library)
            .map(Vec::as_slice)
            .ok_or_else(|| RegistryError::NotFound {
                name: library.to_string(),
            })
    }

    /// Check if a library exists in the registry.
    #[must_use]
    pub fn contains(&self, library: &str) -> bool {
        self.libraries.contains_key(library)
    }

    /// Number of libraries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    /// Whether the registry has no libraries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Total number of descriptors across all libraries.
    #[must_use]
    pub fn descriptor_count(&self) -> usize {
        self.libraries.values().map(Vec::len).sum()
    }

    /// Library names, sorted.
    pub fn libraries(&self) -> impl Iterator<Item = &LibraryName> {
        self.libraries.keys()
    }

    /// `(library, descriptors)` pairs, sorted by library.
    pub fn iter(&self) -> impl Iterator<Item = (&LibraryName, &[ImplementorDescriptor])> {
        self.libraries
            .iter()
            .map(|(library, descriptors)| (library, descriptors.as_slice()))
    }

    /// Every descriptor that involves the given fully-qualified type.
    #[must_use]
    pub fn find_by_type(&self, type_path: &str) -> Vec<(&LibraryName, &ImplementorDescriptor)> {
        self.iter()
            .flat_map(|(library, descriptors)| descriptors.iter().map(move |d| (library, d)))
            .filter(|(_, descriptor)| descriptor.involves(type_path))
            .collect()
    }

    /// Every descriptor the generator synthesized.
    #[must_use]
    pub fn synthetic(&self) -> Vec<(&LibraryName, &ImplementorDescriptor)> {
        self.iter()
            .flat_map(|(library, descriptors)| descriptors.iter().map(move |d| (library, d)))
            .filter(|(_, descriptor)| descriptor.is_synthetic())
            .collect()
    }

    /// Descriptor count per library.
    #[must_use]
    pub fn count_by_library(&self) -> BTreeMap<&LibraryName, usize> {
        self.libraries
            .iter()
            .map(|(library, descriptors)| (library, descriptors.len()))
            .collect()
    }
}

impl<'de> Deserialize<'de> for ImplementorRegistry {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let RawEntries(entries) = RawEntries::deserialize(deserializer)?;
        Self::from_entries(entries).map_err(de::Error::custom)
    }
}

/// Every `(library, descriptors)` pair of a map, repeated keys included.
struct RawEntries(Vec<(LibraryName, Vec<ImplementorDescriptor>)>);

impl<'de> Deserialize<'de> for RawEntries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from library name to implementor descriptors")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<RawEntries, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(RawEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// The implementor table of a single trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitImplementors {
    trait_path: TraitPath,
    registry: ImplementorRegistry,
}

impl TraitImplementors {
    /// Pair a trait with its registry.
    #[must_use]
    pub fn new(trait_path: TraitPath, registry: ImplementorRegistry) -> Self {
        Self {
            trait_path,
            registry,
        }
    }

    /// The trait this table belongs to.
    #[must_use]
    pub fn trait_path(&self) -> &TraitPath {
        &self.trait_path
    }

    /// The registry for this trait.
    #[must_use]
    pub fn registry(&self) -> &ImplementorRegistry {
        &self.registry
    }

    /// Give up the trait path and keep the registry.
    #[must_use]
    pub fn into_registry(self) -> ImplementorRegistry {
        self.registry
    }
}
