//! opdesign - op-amp circuit design from a text description
//!
//! A free-text query is matched against a catalog of op-amp circuit
//! archetypes, the matched circuit is sized from a few design targets, and
//! the resulting component values can be filled into a LaTeX template.
//!
//! # Quick Start
//!
//! ```no_run
//! use opdesign::{DesignConfig, DesignCore, DesignTargets, SelectionStrategy};
//!
//! let core = DesignCore::with_embedded_catalog(DesignConfig::default());
//! let result = core
//!     .design(
//!         "inverting amplifier",
//!         SelectionStrategy::Similarity,
//!         DesignTargets::new().with_gain(10.0),
//!     )
//!     .unwrap();
//!
//! for (key, value) in result.values.display_rows() {
//!     println!("{}: {}", key, value);
//! }
//! ```
//!
//! # Features
//!
//! - **Matching**: exact, TF-IDF similarity and strict substring selection
//! - **Engineering notation**: `10k`, `4.7u`, `1ms` and friends
//! - **Formulas**: ten op-amp circuit families with range checks
//! - **Templates**: `<<KEY>>` substitution into per-circuit LaTeX files

pub mod catalog;
pub mod config;
pub mod core;
pub mod formula;
pub mod matcher;
pub mod template;
pub mod units;

// Re-export main types
pub use crate::core::{DesignCore, DesignError, DesignResult, SelectionStrategy};
pub use catalog::{load_catalog, load_catalog_or_empty, Archetype, ArchetypeKind, Catalog};
pub use config::DesignConfig;
pub use formula::{DerivedValue, DerivedValues, DesignTargets, FormulaEngine, TargetField};
pub use matcher::normalize::Language;
pub use matcher::{Confidence, Match, MatchKind, Matcher};
pub use template::TemplateStore;
pub use units::{
    format_capacitance, format_frequency, format_resistance, format_time, format_voltage,
    parse_value, NumericParser, ParsePolicy,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        ArchetypeKind, DesignConfig, DesignCore, DesignError, DesignResult, DesignTargets,
        SelectionStrategy,
    };
}
