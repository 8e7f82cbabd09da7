//! Core design flow shared by every front end.
//! Query → archetype → targets → derived values → document.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::{Archetype, ArchetypeKind, Catalog, CatalogError};
use crate::config::{ConfigError, DesignConfig};
use crate::formula::{DerivedValues, DesignTargets, FormulaEngine, FormulaError};
use crate::matcher::normalize::build_normalizer;
use crate::matcher::{Confidence, Match, MatchError, MatchKind, Matcher};
use crate::template::{file_stem, TemplateError, TemplateStore};
use crate::units::ParseValueError;

#[derive(Debug, thiserror::Error)]
pub enum DesignError {
    #[error("Search text is empty")]
    InvalidQuery,
    #[error("No circuit matches {0:?}")]
    NoMatch(String),
    #[error(transparent)]
    Parse(#[from] ParseValueError),
    #[error(transparent)]
    Formula(#[from] FormulaError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MatchError> for DesignError {
    fn from(e: MatchError) -> Self {
        match e {
            MatchError::InvalidQuery => DesignError::InvalidQuery,
        }
    }
}

/// How a query is turned into an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Exact match, then TF-IDF similarity.
    #[default]
    Similarity,
    /// Exact match, then substring. No linguistic processing.
    Strict,
}

/// Everything one design run produced.
#[derive(Debug, Clone, Serialize)]
pub struct DesignResult {
    pub archetype: Archetype,
    pub kind: ArchetypeKind,
    pub match_kind: MatchKind,
    pub score: f64,
    pub confidence: Confidence,
    pub targets: DesignTargets,
    pub values: DerivedValues,
}

impl DesignResult {
    pub fn is_low_confidence(&self) -> bool {
        self.confidence == Confidence::Low
    }
}

/// Matcher and formula engine over one catalog and configuration.
pub struct DesignCore {
    matcher: Matcher,
    engine: FormulaEngine,
}

impl DesignCore {
    pub fn new(catalog: Catalog, config: DesignConfig) -> Self {
        let normalizer = build_normalizer(config.normalizer, config.language);
        let matcher = Matcher::new(catalog, normalizer)
            .with_low_confidence_threshold(config.low_confidence_threshold);
        Self {
            matcher,
            engine: FormulaEngine::new(config),
        }
    }

    /// Use the embedded catalog for the configured language.
    pub fn with_embedded_catalog(config: DesignConfig) -> Self {
        let catalog = Catalog::embedded(config.language);
        Self::new(catalog, config)
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn engine(&self) -> &FormulaEngine {
        &self.engine
    }

    pub fn catalog(&self) -> &Catalog {
        self.matcher.catalog()
    }

    pub fn config(&self) -> &DesignConfig {
        self.engine.config()
    }

    /// Pick the archetype for `query`.
    pub fn select(&self, query: &str, strategy: SelectionStrategy) -> Result<Match<'_>, DesignError> {
        let found = match strategy {
            SelectionStrategy::Similarity => self.matcher.find(query)?,
            SelectionStrategy::Strict => self.matcher.find_strict(query)?,
        };
        found.ok_or_else(|| DesignError::NoMatch(query.trim().to_string()))
    }

    /// Size `archetype`; missing targets are taken from configuration.
    pub fn compute(
        &self,
        archetype: &Archetype,
        targets: DesignTargets,
    ) -> Result<(DesignTargets, DerivedValues), DesignError> {
        let kind = formula_kind(archetype)?;
        let targets = targets.fill_defaults(kind, self.config())?;
        let values = self.engine.compute(kind, &targets)?;
        Ok((targets, values))
    }

    /// Select, then compute.
    pub fn design(
        &self,
        query: &str,
        strategy: SelectionStrategy,
        targets: DesignTargets,
    ) -> Result<DesignResult, DesignError> {
        let selected = self.select(query, strategy)?;
        self.design_match(&selected, targets)
    }

    /// Compute for an archetype already chosen by [`DesignCore::select`].
    pub fn design_match(
        &self,
        selected: &Match<'_>,
        targets: DesignTargets,
    ) -> Result<DesignResult, DesignError> {
        let archetype = selected.archetype;
        let kind = formula_kind(archetype)?;
        let (targets, values) = self.compute(archetype, targets)?;
        tracing::info!(
            "Designed {} ({} values, score {:.2})",
            archetype.name,
            values.len(),
            selected.score
        );
        Ok(DesignResult {
            archetype: archetype.clone(),
            kind,
            match_kind: selected.kind,
            score: selected.score,
            confidence: selected.confidence,
            targets,
            values,
        })
    }

    pub fn templates(&self) -> TemplateStore {
        TemplateStore::new(self.config().templates_dir.clone())
    }

    /// Fill the circuit's template with the result's values.
    pub fn render_document(&self, result: &DesignResult) -> Result<String, DesignError> {
        Ok(self.templates().render(&result.archetype.name, &result.values)?)
    }

    /// Render and write `<output_dir>/<circuit>.tex`, returning its path.
    pub fn write_document(&self, result: &DesignResult) -> Result<PathBuf, DesignError> {
        let document = self.render_document(result)?;
        let output_dir = &self.config().output_dir;
        std::fs::create_dir_all(output_dir)?;
        let path = output_dir.join(format!("{}.tex", file_stem(&result.archetype.name)));
        std::fs::write(&path, document)?;
        tracing::info!("Wrote {}", path.display());
        Ok(path)
    }
}

fn formula_kind(archetype: &Archetype) -> Result<ArchetypeKind, DesignError> {
    archetype
        .kind
        .ok_or_else(|| FormulaError::UnsupportedArchetype(archetype.name.clone()).into())
}
