//! Archetype matcher
//!
//! Maps a free-text request onto one catalog entry. Two strategies exist:
//!
//! - [`Matcher::find`]: exact normalized match first, then TF-IDF cosine
//!   similarity over the catalog texts. Weak winners are still returned but
//!   flagged with [`Confidence::Low`].
//! - [`Matcher::find_strict`]: exact match, then substring match against the
//!   query text or display name. Case folding only, no similarity fallback.

pub mod normalize;
pub mod tfidf;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{Archetype, Catalog};
use normalize::{fold_case, TextNormalizer};

/// Similarity below which a match is reported as low confidence.
pub const DEFAULT_LOW_CONFIDENCE_THRESHOLD: f64 = 0.3;

/// Scores closer than this are treated as a tie.
const SCORE_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("Search text is empty")]
    InvalidQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Similarity,
    Substring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Low,
}

/// A selected archetype together with how it was found.
#[derive(Debug, Clone, Serialize)]
pub struct Match<'a> {
    pub archetype: &'a Archetype,
    pub score: f64,
    pub kind: MatchKind,
    pub confidence: Confidence,
}

impl Match<'_> {
    pub fn is_low_confidence(&self) -> bool {
        self.confidence == Confidence::Low
    }
}

pub struct Matcher {
    catalog: Catalog,
    normalizer: Box<dyn TextNormalizer>,
    low_confidence_threshold: f64,
    /// Catalog query texts through `normalizer`, in catalog order.
    normalized: Vec<String>,
    /// Case-folded query texts and names for the strict strategy.
    folded_inputs: Vec<String>,
    folded_names: Vec<String>,
}

impl Matcher {
    pub fn new(catalog: Catalog, normalizer: Box<dyn TextNormalizer>) -> Self {
        let normalized = catalog
            .iter()
            .map(|a| normalizer.normalize(&a.query_text))
            .collect();
        let folded_inputs = catalog.iter().map(|a| fold_case(a.query_text.trim())).collect();
        let folded_names = catalog.iter().map(|a| fold_case(a.name.trim())).collect();

        Self {
            catalog,
            normalizer,
            low_confidence_threshold: DEFAULT_LOW_CONFIDENCE_THRESHOLD,
            normalized,
            folded_inputs,
            folded_names,
        }
    }

    pub fn with_low_confidence_threshold(mut self, threshold: f64) -> Self {
        self.low_confidence_threshold = threshold;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn normalizer_name(&self) -> &str {
        self.normalizer.name()
    }

    pub fn low_confidence_threshold(&self) -> f64 {
        self.low_confidence_threshold
    }

    /// Exact match, then best cosine similarity.
    ///
    /// Returns `Ok(None)` for an empty catalog or when no archetype shares a
    /// single term with the query.
    pub fn find(&self, query: &str) -> Result<Option<Match<'_>>, MatchError> {
        if query.trim().is_empty() {
            return Err(MatchError::InvalidQuery);
        }
        if self.catalog.is_empty() {
            return Ok(None);
        }

        let normalized_query = self.normalizer.normalize(query);
        let wanted = normalized_query.trim();

        if !wanted.is_empty() {
            if let Some(index) = self.normalized.iter().position(|text| text.trim() == wanted) {
                return Ok(Some(Match {
                    archetype: &self.catalog.archetypes()[index],
                    score: 1.0,
                    kind: MatchKind::Exact,
                    confidence: Confidence::High,
                }));
            }
        }

        let mut documents: Vec<&str> = Vec::with_capacity(self.normalized.len() + 1);
        documents.push(&normalized_query);
        documents.extend(self.normalized.iter().map(String::as_str));

        let vectors = tfidf::fit_transform(&documents);
        let Some((query_vector, archetype_vectors)) = vectors.split_first() else {
            return Ok(None);
        };

        let mut best: Option<(usize, f64)> = None;
        for (index, vector) in archetype_vectors.iter().enumerate() {
            let score = query_vector.cosine(vector);
            tracing::debug!("similarity {:.4} for {}", score, self.catalog.archetypes()[index].name);
            if best.map_or(true, |(_, top)| score > top + SCORE_EPSILON) {
                best = Some((index, score));
            }
        }

        match best {
            Some((index, score)) if score > 0.0 => {
                let archetype = &self.catalog.archetypes()[index];
                let confidence = if score < self.low_confidence_threshold {
                    tracing::warn!(
                        "Low similarity score {:.2} for {:?}, using closest match {}",
                        score,
                        query,
                        archetype.name
                    );
                    Confidence::Low
                } else {
                    Confidence::High
                };
                Ok(Some(Match {
                    archetype,
                    score,
                    kind: MatchKind::Similarity,
                    confidence,
                }))
            }
            _ => Ok(None),
        }
    }

    /// Exact match, then substring of query text or display name.
    pub fn find_strict(&self, query: &str) -> Result<Option<Match<'_>>, MatchError> {
        if query.trim().is_empty() {
            return Err(MatchError::InvalidQuery);
        }

        let wanted = fold_case(query.trim());
        let archetypes = self.catalog.archetypes();

        if let Some(index) = self.folded_inputs.iter().position(|text| *text == wanted) {
            return Ok(Some(Match {
                archetype: &archetypes[index],
                score: 1.0,
                kind: MatchKind::Exact,
                confidence: Confidence::High,
            }));
        }

        let hit = self
            .folded_inputs
            .iter()
            .zip(&self.folded_names)
            .position(|(input, name)| input.contains(&wanted) || name.contains(&wanted));

        Ok(hit.map(|index| Match {
            archetype: &archetypes[index],
            score: 1.0,
            kind: MatchKind::Substring,
            confidence: Confidence::High,
        }))
    }
}
