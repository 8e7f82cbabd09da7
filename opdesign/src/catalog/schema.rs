//! Circuit archetype records

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::matcher::normalize::fold_case;

/// The ten circuit families the formula engine knows how to size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchetypeKind {
    Inverting,
    NonInverting,
    LowPass,
    HighPass,
    Summing,
    SchmittTrigger,
    VoltageFollower,
    Differentiator,
    Integrator,
    Difference,
}

impl ArchetypeKind {
    /// Dispatch order used when resolving a kind from a display name.
    pub const PRIORITY: [ArchetypeKind; 10] = [
        ArchetypeKind::Inverting,
        ArchetypeKind::NonInverting,
        ArchetypeKind::LowPass,
        ArchetypeKind::HighPass,
        ArchetypeKind::Summing,
        ArchetypeKind::SchmittTrigger,
        ArchetypeKind::VoltageFollower,
        ArchetypeKind::Differentiator,
        ArchetypeKind::Integrator,
        ArchetypeKind::Difference,
    ];

    /// Name fragments, already case folded, that identify this kind.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            ArchetypeKind::Inverting => &["tersleyici", "inverting"],
            ArchetypeKind::NonInverting => &["terslemeyen", "non-inverting", "noninverting", "non inverting"],
            ArchetypeKind::LowPass => &["alçak geçiren", "low-pass", "low pass", "lowpass"],
            ArchetypeKind::HighPass => &["yüksek geçiren", "high-pass", "high pass", "highpass"],
            ArchetypeKind::Summing => &["toplayici", "summing", "adder"],
            ArchetypeKind::SchmittTrigger => &["schmitt"],
            ArchetypeKind::VoltageFollower => &["gerilim izleyici", "voltage follower", "buffer"],
            ArchetypeKind::Differentiator => &["türev alici", "differentiator"],
            ArchetypeKind::Integrator => &["integral alici", "integrator"],
            ArchetypeKind::Difference => &["fark yükselteci", "difference", "differential amplifier"],
        }
    }

    /// Resolve a kind from a circuit name such as "Alçak Geçiren Filtre" or
    /// "Non-Inverting Amplifier". The first kind in [`Self::PRIORITY`] with a
    /// keyword starting a word of the name wins.
    pub fn from_name(name: &str) -> Option<Self> {
        let folded = fold_case(name);
        Self::PRIORITY
            .into_iter()
            .find(|kind| kind.keywords().iter().any(|kw| keyword_starts_word(&folded, kw)))
    }

    pub fn label(&self) -> &'static str {
        match self {
            ArchetypeKind::Inverting => "inverting amplifier",
            ArchetypeKind::NonInverting => "non-inverting amplifier",
            ArchetypeKind::LowPass => "low-pass filter",
            ArchetypeKind::HighPass => "high-pass filter",
            ArchetypeKind::Summing => "summing amplifier",
            ArchetypeKind::SchmittTrigger => "schmitt trigger",
            ArchetypeKind::VoltageFollower => "voltage follower",
            ArchetypeKind::Differentiator => "differentiator",
            ArchetypeKind::Integrator => "integrator",
            ArchetypeKind::Difference => "difference amplifier",
        }
    }
}

impl fmt::Display for ArchetypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// True when `keyword` occurs in `text` at the start of a word that is not
/// negated by a `non` prefix.
fn keyword_starts_word(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(i, _)| {
        let before = &text[..i];
        match before.chars().last() {
            None => true,
            Some(c) if c.is_alphanumeric() || c == '-' => false,
            Some(_) => before.split_whitespace().last() != Some("non"),
        }
    })
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    pub id: u32,
    /// Representative free text, used only for matching.
    #[serde(rename = "input")]
    pub query_text: String,
    /// Canonical display name.
    #[serde(rename = "circuit_type")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Explicit formula family; derived from `name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ArchetypeKind>,
}

impl Archetype {
    pub fn new(id: u32, query_text: &str, name: &str, description: &str) -> Self {
        Self {
            id,
            query_text: query_text.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            kind: ArchetypeKind::from_name(name),
        }
    }
}
