//! User-supplied design targets

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::ArchetypeKind;
use crate::config::DesignConfig;
use crate::units::{NumericParser, ParseValueError};

/// One free input of a circuit family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetField {
    Gain,
    Gain2,
    CutoffHz,
    UpperThresholdV,
    TimeConstantS,
}

impl TargetField {
    pub fn name(&self) -> &'static str {
        match self {
            TargetField::Gain => "gain",
            TargetField::Gain2 => "gain2",
            TargetField::CutoffHz => "cutoff_hz",
            TargetField::UpperThresholdV => "upper_threshold_v",
            TargetField::TimeConstantS => "time_constant_s",
        }
    }

    /// Question shown to the user for this field.
    pub fn prompt(&self, kind: ArchetypeKind) -> &'static str {
        match (self, kind) {
            (TargetField::Gain, ArchetypeKind::Summing) => "Gain for the first input",
            (TargetField::Gain, _) => "Desired gain",
            (TargetField::Gain2, _) => "Gain for the second input",
            (TargetField::CutoffHz, _) => "Desired cutoff frequency (Hz)",
            (TargetField::UpperThresholdV, _) => "Desired upper threshold (V)",
            (TargetField::TimeConstantS, _) => "Desired time constant (RC)",
        }
    }

    /// Gains and thresholds keep their sign; frequencies and times do not
    /// have one.
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            TargetField::Gain | TargetField::Gain2 | TargetField::UpperThresholdV
        )
    }

    /// The configured default for this field, as the user would type it.
    pub fn default_text(&self, kind: ArchetypeKind, config: &DesignConfig) -> String {
        match (self, kind) {
            (TargetField::Gain | TargetField::Gain2, ArchetypeKind::Summing) => {
                format!("-{}", config.default_gain.trim_start_matches('-'))
            }
            (TargetField::Gain | TargetField::Gain2, _) => config.default_gain.clone(),
            (TargetField::CutoffHz, _) => config.default_cutoff.clone(),
            (TargetField::UpperThresholdV, _) => config.default_upper_threshold.clone(),
            (TargetField::TimeConstantS, _) => config.default_time_constant.clone(),
        }
    }

    pub fn parse(&self, parser: &NumericParser, text: &str) -> Result<f64, ParseValueError> {
        if self.is_signed() {
            parser.parse_signed(text)
        } else {
            parser.parse(text)
        }
    }
}

impl fmt::Display for TargetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inputs for one compute call. The engine never fills in missing fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignTargets {
    pub gain: Option<f64>,
    pub gain2: Option<f64>,
    pub cutoff_hz: Option<f64>,
    pub upper_threshold_v: Option<f64>,
    pub time_constant_s: Option<f64>,
}

impl DesignTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = Some(gain);
        self
    }

    pub fn with_gains(mut self, first: f64, second: f64) -> Self {
        self.gain = Some(first);
        self.gain2 = Some(second);
        self
    }

    pub fn with_cutoff(mut self, hz: f64) -> Self {
        self.cutoff_hz = Some(hz);
        self
    }

    pub fn with_upper_threshold(mut self, volts: f64) -> Self {
        self.upper_threshold_v = Some(volts);
        self
    }

    pub fn with_time_constant(mut self, seconds: f64) -> Self {
        self.time_constant_s = Some(seconds);
        self
    }

    pub fn get(&self, field: TargetField) -> Option<f64> {
        match field {
            TargetField::Gain => self.gain,
            TargetField::Gain2 => self.gain2,
            TargetField::CutoffHz => self.cutoff_hz,
            TargetField::UpperThresholdV => self.upper_threshold_v,
            TargetField::TimeConstantS => self.time_constant_s,
        }
    }

    pub fn set(&mut self, field: TargetField, value: f64) {
        let slot = match field {
            TargetField::Gain => &mut self.gain,
            TargetField::Gain2 => &mut self.gain2,
            TargetField::CutoffHz => &mut self.cutoff_hz,
            TargetField::UpperThresholdV => &mut self.upper_threshold_v,
            TargetField::TimeConstantS => &mut self.time_constant_s,
        };
        *slot = Some(value);
    }

    /// Fields `kind` needs, in prompting order.
    pub fn required(kind: ArchetypeKind) -> &'static [TargetField] {
        match kind {
            ArchetypeKind::Inverting | ArchetypeKind::NonInverting | ArchetypeKind::Difference => {
                &[TargetField::Gain]
            }
            ArchetypeKind::LowPass | ArchetypeKind::HighPass => &[TargetField::CutoffHz],
            ArchetypeKind::Summing => &[TargetField::Gain, TargetField::Gain2],
            ArchetypeKind::SchmittTrigger => &[TargetField::UpperThresholdV],
            ArchetypeKind::VoltageFollower => &[],
            ArchetypeKind::Differentiator | ArchetypeKind::Integrator => {
                &[TargetField::TimeConstantS]
            }
        }
    }

    /// Fill every field `kind` needs and `self` lacks from configuration.
    pub fn fill_defaults(
        mut self,
        kind: ArchetypeKind,
        config: &DesignConfig,
    ) -> Result<Self, ParseValueError> {
        let parser = NumericParser::new(config.parse_policy);
        for field in Self::required(kind) {
            if self.get(*field).is_none() {
                let value = field.parse(&parser, &field.default_text(kind, config))?;
                self.set(*field, value);
            }
        }
        Ok(self)
    }

    /// Targets made only of configured defaults.
    pub fn defaults_for(kind: ArchetypeKind, config: &DesignConfig) -> Result<Self, ParseValueError> {
        Self::new().fill_defaults(kind, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_each_kind() {
        let config = DesignConfig::default();

        let t = DesignTargets::defaults_for(ArchetypeKind::Inverting, &config).unwrap();
        assert_eq!(t.gain, Some(10.0));
        assert_eq!(t.cutoff_hz, None);

        let t = DesignTargets::defaults_for(ArchetypeKind::Summing, &config).unwrap();
        assert_eq!(t.gain, Some(-10.0));
        assert_eq!(t.gain2, Some(-10.0));

        let t = DesignTargets::defaults_for(ArchetypeKind::LowPass, &config).unwrap();
        assert_eq!(t.cutoff_hz, Some(1000.0));

        let t = DesignTargets::defaults_for(ArchetypeKind::SchmittTrigger, &config).unwrap();
        assert_eq!(t.upper_threshold_v, Some(5.0));

        let t = DesignTargets::defaults_for(ArchetypeKind::Integrator, &config).unwrap();
        assert!((t.time_constant_s.unwrap() - 1e-3).abs() < 1e-15);

        let t = DesignTargets::defaults_for(ArchetypeKind::VoltageFollower, &config).unwrap();
        assert_eq!(t, DesignTargets::default());
    }

    #[test]
    fn test_fill_keeps_user_values() {
        let config = DesignConfig::default();
        let t = DesignTargets::new()
            .with_gain(3.0)
            .fill_defaults(ArchetypeKind::Summing, &config)
            .unwrap();
        assert_eq!(t.gain, Some(3.0));
        assert_eq!(t.gain2, Some(-10.0));
    }

    #[test]
    fn test_bad_configured_default_is_reported() {
        let config = DesignConfig {
            default_cutoff: "fast".to_string(),
            ..DesignConfig::default()
        };
        assert!(DesignTargets::defaults_for(ArchetypeKind::HighPass, &config).is_err());
    }
}
