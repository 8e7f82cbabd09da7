//! TF-IDF vector space and cosine similarity
//!
//! Tokens are runs of two or more word characters. Weights are raw term
//! counts times the smoothed inverse document frequency
//! `ln((1 + n) / (1 + df)) + 1`, and every row is L2-normalized, so the
//! cosine similarity of two rows is their dot product.

use std::collections::{BTreeMap, HashMap};

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !is_word_char(c))
        .filter(|token| token.chars().count() >= 2)
        .collect()
}

/// Sparse L2-normalized document vector.
#[derive(Debug, Clone, Default)]
pub struct TfIdfVector {
    weights: BTreeMap<usize, f64>,
}

impl TfIdfVector {
    pub fn is_zero(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn cosine(&self, other: &TfIdfVector) -> f64 {
        let (small, large) = if self.weights.len() <= other.weights.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .weights
            .iter()
            .filter_map(|(term, w)| large.weights.get(term).map(|v| w * v))
            .sum()
    }
}

/// Fit a vocabulary over `documents` and return one vector per document.
pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> Vec<TfIdfVector> {
    let mut vocabulary: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<BTreeMap<usize, f64>> = Vec::with_capacity(documents.len());

    for doc in documents {
        let mut tf = BTreeMap::new();
        for token in tokenize(doc.as_ref()) {
            let next = vocabulary.len();
            let id = *vocabulary.entry(token).or_insert(next);
            *tf.entry(id).or_insert(0.0) += 1.0;
        }
        counts.push(tf);
    }

    let mut document_frequency = vec![0usize; vocabulary.len()];
    for tf in &counts {
        for id in tf.keys() {
            document_frequency[*id] += 1;
        }
    }

    let n = documents.len() as f64;
    let idf: Vec<f64> = document_frequency
        .iter()
        .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
        .collect();

    counts
        .into_iter()
        .map(|tf| {
            let mut weights: BTreeMap<usize, f64> =
                tf.into_iter().map(|(id, count)| (id, count * idf[id])).collect();
            let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for w in weights.values_mut() {
                    *w /= norm;
                }
            }
            TfIdfVector { weights }
        })
        .collect()
}
