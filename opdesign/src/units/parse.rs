//! Engineering-notation value parser
//!
//! Turns strings such as `10k`, `4.7n`, `1u` or `1ms` into plain SI floats.
//! Characters outside the accepted alphabet are dropped before matching, so
//! `"10 kΩ"` and `"10k"` parse to the same value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseValueError {
    #[error("Invalid numeric format: {0:?}")]
    InvalidNumericFormat(String),
}

/// What to do when a value has no leading number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsePolicy {
    /// Report `InvalidNumericFormat`.
    #[default]
    Strict,
    /// Log a warning and yield `0.0`.
    Lenient,
}

/// Multiplier for a single-letter unit suffix. Unknown letters count as 1.
fn suffix_multiplier(suffix: Option<char>) -> f64 {
    match suffix {
        Some('p') => 1e-12,
        Some('n') => 1e-9,
        Some('u') | Some('μ') | Some('µ') => 1e-6,
        Some('m') => 1e-3,
        Some('k') | Some('K') => 1e3,
        Some('M') => 1e6,
        _ => 1.0,
    }
}

fn is_accepted(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '.' | 'p' | 'n' | 'u' | 'μ' | 'µ' | 'm' | 'k' | 'K' | 'M')
}

/// Parser for engineering-notation strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericParser {
    policy: ParsePolicy,
}

impl NumericParser {
    pub fn new(policy: ParsePolicy) -> Self {
        Self { policy }
    }

    pub fn strict() -> Self {
        Self::new(ParsePolicy::Strict)
    }

    pub fn lenient() -> Self {
        Self::new(ParsePolicy::Lenient)
    }

    pub fn policy(&self) -> ParsePolicy {
        self.policy
    }

    /// Parse an unsigned value such as `"2.2M"`.
    ///
    /// A sign is not part of the accepted alphabet and is dropped with the
    /// other stray characters, so `"-1000"` parses as `1000.0`. Use
    /// [`NumericParser::parse_signed`] where the sign matters.
    pub fn parse(&self, text: &str) -> Result<f64, ParseValueError> {
        match parse_unsigned(text) {
            Some(value) => Ok(value),
            None => self.fallback(text),
        }
    }

    /// Parse a value that may carry a leading `+` or `-`, e.g. a gain of `-10`.
    pub fn parse_signed(&self, text: &str) -> Result<f64, ParseValueError> {
        let trimmed = text.trim();
        let (sign, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (-1.0, rest),
            None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        match parse_unsigned(rest) {
            Some(value) => Ok(sign * value),
            None => self.fallback(text),
        }
    }

    fn fallback(&self, text: &str) -> Result<f64, ParseValueError> {
        match self.policy {
            ParsePolicy::Strict => Err(ParseValueError::InvalidNumericFormat(text.to_string())),
            ParsePolicy::Lenient => {
                tracing::warn!("Could not parse {:?} as a number, using 0", text);
                Ok(0.0)
            }
        }
    }
}

/// Parse `text` with the strict policy.
pub fn parse_value(text: &str) -> Result<f64, ParseValueError> {
    NumericParser::strict().parse(text)
}

/// Remove spelled-out `ohm` unit words (any case) so their `m` is not read
/// as a milli suffix.
fn strip_ohm(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(ch) = rest.chars().next() {
        if rest.get(..3).map_or(false, |head| head.eq_ignore_ascii_case("ohm")) {
            rest = &rest[3..];
        } else {
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }
    out
}

fn parse_unsigned(text: &str) -> Option<f64> {
    let cleaned: String = strip_ohm(text).chars().filter(|&c| is_accepted(c)).collect();

    let number_len = cleaned
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map(|(i, _)| i)
        .unwrap_or(cleaned.len());
    if number_len == 0 {
        return None;
    }

    let (number, rest) = cleaned.split_at(number_len);
    let magnitude = number.parse::<f64>().ok()?;
    Some(magnitude * suffix_multiplier(rest.chars().next()))
}
