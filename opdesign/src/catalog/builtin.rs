//! Built-in and external archetype catalogs
//!
//! The default catalogs are embedded JSON files compiled into the binary.
//! A user-supplied JSON file with the same record layout replaces them.

use std::path::Path;

use thiserror::Error;

use crate::catalog::schema::Archetype;
use crate::matcher::normalize::Language;

const EMBEDDED_EN: &str = include_str!("../../catalogs/en.json");
const EMBEDDED_TR: &str = include_str!("../../catalogs/tr.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Archetypes embedded for `language`.
pub fn embedded_archetypes(language: Language) -> Vec<Archetype> {
    let json = match language {
        Language::En => EMBEDDED_EN,
        Language::Tr => EMBEDDED_TR,
    };
    match serde_json::from_str::<Vec<Archetype>>(json) {
        Ok(archetypes) => archetypes,
        Err(e) => {
            tracing::warn!("Failed to parse embedded catalog: {}", e);
            Vec::new()
        }
    }
}

/// Load archetype records from a JSON file.
pub fn load_archetypes_from_file(path: &Path) -> Result<Vec<Archetype>, CatalogError> {
    let content = std::fs::read_to_string(path)?;
    let archetypes = serde_json::from_str(&content)?;
    Ok(archetypes)
}

/// Like [`load_archetypes_from_file`], but a failure yields an empty list.
pub fn load_archetypes_or_empty(path: &Path) -> Vec<Archetype> {
    match load_archetypes_from_file(path) {
        Ok(archetypes) => archetypes,
        Err(e) => {
            tracing::warn!("Catalog load failed for {}: {}", path.display(), e);
            Vec::new()
        }
    }
}
