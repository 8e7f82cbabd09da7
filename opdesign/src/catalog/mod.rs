//! Circuit archetype catalog
//!
//! The catalog is loaded once and never mutated afterwards. Each entry's
//! [`ArchetypeKind`] is resolved at construction so later stages dispatch on
//! the enum instead of re-matching names.

pub mod builtin;
pub mod schema;

use std::path::Path;

pub use builtin::CatalogError;
pub use schema::{Archetype, ArchetypeKind};

use crate::matcher::normalize::Language;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    archetypes: Vec<Archetype>,
}

impl Catalog {
    pub fn new(archetypes: Vec<Archetype>) -> Self {
        let archetypes = archetypes
            .into_iter()
            .map(|mut archetype| {
                if archetype.kind.is_none() {
                    archetype.kind = ArchetypeKind::from_name(&archetype.name);
                }
                if archetype.kind.is_none() {
                    tracing::warn!(
                        "No formula family for catalog entry {} ({})",
                        archetype.id,
                        archetype.name
                    );
                }
                archetype
            })
            .collect();
        Self { archetypes }
    }

    /// The catalog compiled into the library.
    pub fn embedded(language: Language) -> Self {
        let catalog = Self::new(builtin::embedded_archetypes(language));
        tracing::info!("Loaded {} embedded archetypes", catalog.len());
        catalog
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let catalog = Self::new(builtin::load_archetypes_from_file(path)?);
        tracing::info!("Loaded {} archetypes from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Load from `path`, falling back to an empty catalog on any error.
    pub fn from_file_or_empty(path: &Path) -> Self {
        Self::new(builtin::load_archetypes_or_empty(path))
    }

    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Archetype> {
        self.archetypes.iter()
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Archetype> {
        self.archetypes.iter().find(|a| a.id == id)
    }

    pub fn by_kind(&self, kind: ArchetypeKind) -> Option<&Archetype> {
        self.archetypes.iter().find(|a| a.kind == Some(kind))
    }
}

/// Load a catalog file (convenience wrapper).
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    Catalog::from_file(path)
}

/// Load a catalog file, or an empty catalog if it cannot be read.
pub fn load_catalog_or_empty(path: &Path) -> Catalog {
    Catalog::from_file_or_empty(path)
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Archetype;
    type IntoIter = std::slice::Iter<'a, Archetype>;

    fn into_iter(self) -> Self::IntoIter {
        self.archetypes.iter()
    }
}
