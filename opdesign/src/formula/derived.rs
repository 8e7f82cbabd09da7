//! Derived component values

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::units::{
    format_capacitance, format_resistance, format_voltage, template_capacitance,
    template_resistance, template_voltage,
};

/// A computed quantity or a ready-made text fragment.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DerivedValue {
    /// Ohms.
    Resistance(f64),
    /// Farads.
    Capacitance(f64),
    /// Volts.
    Voltage(f64),
    /// Display text or a LaTeX formula fragment, used as is.
    Text(String),
}

impl DerivedValue {
    pub fn number(&self) -> Option<f64> {
        match self {
            DerivedValue::Resistance(v) | DerivedValue::Capacitance(v) | DerivedValue::Voltage(v) => {
                Some(*v)
            }
            DerivedValue::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            DerivedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Two-decimal rendering with plain unit symbols.
    pub fn display(&self) -> String {
        match self {
            DerivedValue::Resistance(v) => format_resistance(*v),
            DerivedValue::Capacitance(v) => format_capacitance(*v),
            DerivedValue::Voltage(v) => format_voltage(*v),
            DerivedValue::Text(s) => s.clone(),
        }
    }

    /// One-decimal rendering with escaped units for template substitution.
    pub fn template(&self) -> String {
        match self {
            DerivedValue::Resistance(v) => template_resistance(*v),
            DerivedValue::Capacitance(v) => template_capacitance(*v),
            DerivedValue::Voltage(v) => template_voltage(*v),
            DerivedValue::Text(s) => s.clone(),
        }
    }
}

/// Label → value mapping in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedValues {
    entries: Vec<(String, DerivedValue)>,
}

impl DerivedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`.
    pub fn insert(&mut self, key: &str, value: DerivedValue) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&DerivedValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(DerivedValue::number)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(DerivedValue::text)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DerivedValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn display_rows(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.display()))
            .collect()
    }

    /// Values keyed for `<<KEY>>` placeholder substitution.
    pub fn template_values(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.template()))
            .collect()
    }
}

impl Serialize for DerivedValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
