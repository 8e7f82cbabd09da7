//! Component value derivation
//!
//! One closed-form sizing rule per [`ArchetypeKind`]. Fixed parts (the
//! reference resistor, capacitor and supply voltage) come from
//! [`DesignConfig`]; the free inputs come from [`DesignTargets`].
//!
//! | Kind | Derived |
//! |---|---|
//! | Inverting | R1 = R, R2 = R1·\|A\| |
//! | Non-inverting | R1 = R, R2 = R1·(A − 1) |
//! | Low/high-pass | C = C, R = 1/(2π·fc·C) |
//! | Summing | Rf = R, R1 = Rf/\|A1\|, R2 = Rf/\|A2\| |
//! | Schmitt trigger | R1 = R, R2 = R1·Vut/(Vcc − Vut) |
//! | Voltage follower | gain 1 |
//! | Differentiator | R = R, C = τ/R |
//! | Integrator | R = R, C = τ/R, Rf = 10·R |
//! | Difference | R1 = R2 = R, R3 = R4 = R1·A |

pub mod derived;
pub mod targets;

use std::f64::consts::PI;

use thiserror::Error;

use crate::catalog::{Archetype, ArchetypeKind};
use crate::config::DesignConfig;
use crate::units::{format_frequency, format_time, format_voltage, NumericParser, ParseValueError};

pub use derived::{DerivedValue, DerivedValues};
pub use targets::{DesignTargets, TargetField};

const INVERTING_GAIN_FORMULA: &str = r"-\frac{R_2}{R_1}";
const NON_INVERTING_GAIN_FORMULA: &str = r"1 + \frac{R_2}{R_1}";
const FILTER_FORMULA: &str = r"f_c = \frac{1}{2 \pi R C}";
const SUMMING_FORMULA: &str = r"-\left(\frac{R_f}{R_1}V_1 + \frac{R_f}{R_2}V_2\right)";
const DIFFERENTIATOR_FORMULA: &str = r"V_{out} = -RC\frac{dV_{in}}{dt}";
const INTEGRATOR_FORMULA: &str = r"V_{out} = -\frac{1}{RC}\int V_{in}dt";
const DIFFERENCE_GAIN_FORMULA: &str = r"\frac{R3}{R1}";

/// Integrator DC bleed resistor relative to the input resistor.
const INTEGRATOR_BLEED_RATIO: f64 = 10.0;

#[derive(Debug, Error)]
pub enum ComputationError {
    #[error(transparent)]
    InvalidNumericFormat(#[from] ParseValueError),
    #[error("Domain error: {0}")]
    Domain(String),
    #[error("Missing design target: {0}")]
    MissingTarget(TargetField),
}

#[derive(Debug, Error)]
pub enum FormulaError {
    #[error("No formula for circuit type {0:?}")]
    UnsupportedArchetype(String),
    #[error("Computation failed for {kind}: {source}")]
    Computation {
        kind: ArchetypeKind,
        source: ComputationError,
    },
}

fn domain(message: impl Into<String>) -> ComputationError {
    ComputationError::Domain(message.into())
}

fn require(targets: &DesignTargets, field: TargetField) -> Result<f64, ComputationError> {
    let value = targets.get(field).ok_or(ComputationError::MissingTarget(field))?;
    if !value.is_finite() {
        return Err(domain(format!("{} must be a finite number", field)));
    }
    Ok(value)
}

fn non_zero_gain(targets: &DesignTargets, field: TargetField) -> Result<f64, ComputationError> {
    let gain = require(targets, field)?;
    if gain == 0.0 {
        return Err(domain(format!("{} must be non-zero", field)));
    }
    Ok(gain)
}

fn positive(targets: &DesignTargets, field: TargetField) -> Result<f64, ComputationError> {
    let value = require(targets, field)?;
    if value <= 0.0 {
        return Err(domain(format!("{} must be positive, got {}", field, value)));
    }
    Ok(value)
}

/// Stateless sizing engine bound to one configuration.
#[derive(Debug, Clone)]
pub struct FormulaEngine {
    config: DesignConfig,
    parser: NumericParser,
}

impl FormulaEngine {
    pub fn new(config: DesignConfig) -> Self {
        let parser = NumericParser::new(config.parse_policy);
        Self { config, parser }
    }

    pub fn config(&self) -> &DesignConfig {
        &self.config
    }

    pub fn parser(&self) -> &NumericParser {
        &self.parser
    }

    /// Size the circuit of `kind` for `targets`.
    pub fn compute(
        &self,
        kind: ArchetypeKind,
        targets: &DesignTargets,
    ) -> Result<DerivedValues, FormulaError> {
        let values = self
            .derive(kind, targets)
            .map_err(|source| FormulaError::Computation { kind, source })?;
        tracing::debug!("Derived {} values for {}", values.len(), kind);
        Ok(values)
    }

    /// Resolve the kind from a circuit name, then [`FormulaEngine::compute`].
    pub fn compute_by_name(
        &self,
        name: &str,
        targets: &DesignTargets,
    ) -> Result<DerivedValues, FormulaError> {
        let kind = ArchetypeKind::from_name(name)
            .ok_or_else(|| FormulaError::UnsupportedArchetype(name.to_string()))?;
        self.compute(kind, targets)
    }

    pub fn compute_for(
        &self,
        archetype: &Archetype,
        targets: &DesignTargets,
    ) -> Result<DerivedValues, FormulaError> {
        let kind = archetype
            .kind
            .ok_or_else(|| FormulaError::UnsupportedArchetype(archetype.name.clone()))?;
        self.compute(kind, targets)
    }

    fn reference_resistor(&self) -> Result<f64, ComputationError> {
        let ohms = self.parser.parse(&self.config.default_resistor)?;
        if ohms <= 0.0 {
            return Err(domain("default resistor must be positive"));
        }
        Ok(ohms)
    }

    fn reference_capacitor(&self) -> Result<f64, ComputationError> {
        let farads = self.parser.parse(&self.config.default_capacitor)?;
        if farads <= 0.0 {
            return Err(domain("default capacitor must be positive"));
        }
        Ok(farads)
    }

    fn supply_voltage(&self) -> Result<f64, ComputationError> {
        Ok(self.parser.parse_signed(&self.config.default_voltage)?)
    }

    fn derive(
        &self,
        kind: ArchetypeKind,
        targets: &DesignTargets,
    ) -> Result<DerivedValues, ComputationError> {
        use DerivedValue::{Capacitance, Resistance, Text, Voltage};

        let mut values = DerivedValues::new();

        match kind {
            ArchetypeKind::Inverting => {
                let gain = non_zero_gain(targets, TargetField::Gain)?;
                let r1 = self.reference_resistor()?;
                values.insert("R1", Resistance(r1));
                values.insert("R2", Resistance(r1 * gain.abs()));
                values.insert("GainFormula", Text(INVERTING_GAIN_FORMULA.to_string()));
                values.insert("GainValue", Text(format!("{:.2}", -gain.abs())));
            }
            ArchetypeKind::NonInverting => {
                let gain = require(targets, TargetField::Gain)?;
                if gain < 1.0 {
                    return Err(domain(format!(
                        "non-inverting gain must be at least 1, got {}",
                        gain
                    )));
                }
                let r1 = self.reference_resistor()?;
                values.insert("R1", Resistance(r1));
                values.insert("R2", Resistance(r1 * (gain - 1.0)));
                values.insert("GainFormula", Text(NON_INVERTING_GAIN_FORMULA.to_string()));
                values.insert("GainValue", Text(format!("{:.2}", gain)));
            }
            ArchetypeKind::LowPass | ArchetypeKind::HighPass => {
                let cutoff = positive(targets, TargetField::CutoffHz)?;
                let c = self.reference_capacitor()?;
                values.insert("C", Capacitance(c));
                values.insert("R", Resistance(1.0 / (2.0 * PI * cutoff * c)));
                values.insert("Cutoff", Text(format_frequency(cutoff)));
                values.insert("Formula", Text(FILTER_FORMULA.to_string()));
            }
            ArchetypeKind::Summing => {
                let gain1 = non_zero_gain(targets, TargetField::Gain)?;
                let gain2 = non_zero_gain(targets, TargetField::Gain2)?;
                let rf = self.reference_resistor()?;
                values.insert("Rf", Resistance(rf));
                values.insert("R1", Resistance(rf / gain1.abs()));
                values.insert("R2", Resistance(rf / gain2.abs()));
                values.insert("GainFormula", Text(SUMMING_FORMULA.to_string()));
            }
            ArchetypeKind::SchmittTrigger => {
                let vut = require(targets, TargetField::UpperThresholdV)?;
                let vcc = self.supply_voltage()?;
                if !(vut > 0.0 && vut < vcc) {
                    return Err(domain(format!(
                        "upper threshold {} V must lie strictly between 0 and Vcc = {} V",
                        vut, vcc
                    )));
                }
                let r1 = self.reference_resistor()?;
                values.insert("Vcc", Voltage(vcc));
                values.insert("R1", Resistance(r1));
                values.insert("R2", Resistance(r1 * (vut / (vcc - vut))));
                values.insert("Vut", Text(format_voltage(vut)));
                values.insert("Vlt", Text(format_voltage(-vut)));
            }
            ArchetypeKind::VoltageFollower => {
                values.insert("GainFormula", Text("1".to_string()));
                values.insert("GainValue", Text("1.00".to_string()));
            }
            ArchetypeKind::Differentiator | ArchetypeKind::Integrator => {
                let tau = positive(targets, TargetField::TimeConstantS)?;
                let r = self.reference_resistor()?;
                values.insert("R", Resistance(r));
                values.insert("C", Capacitance(tau / r));
                if kind == ArchetypeKind::Integrator {
                    values.insert("Rf", Resistance(r * INTEGRATOR_BLEED_RATIO));
                    values.insert("Formula", Text(INTEGRATOR_FORMULA.to_string()));
                } else {
                    values.insert("Formula", Text(DIFFERENTIATOR_FORMULA.to_string()));
                }
                values.insert("TimeConstant", Text(format_time(tau)));
            }
            ArchetypeKind::Difference => {
                let gain = positive(targets, TargetField::Gain)?;
                let r1 = self.reference_resistor()?;
                let r3 = r1 * gain;
                values.insert("R1", Resistance(r1));
                values.insert("R3", Resistance(r3));
                values.insert("R2", Resistance(r1));
                values.insert("R4", Resistance(r3));
                values.insert("GainFormula", Text(DIFFERENCE_GAIN_FORMULA.to_string()));
                values.insert("GainValue", Text(format!("{:.2}", gain)));
            }
        }

        check_components(&values)?;
        Ok(values)
    }
}

/// Every resistance and capacitance must be a finite, non-negative number.
fn check_components(values: &DerivedValues) -> Result<(), ComputationError> {
    for (key, value) in values.iter() {
        if let DerivedValue::Resistance(v) | DerivedValue::Capacitance(v) = value {
            if !v.is_finite() || *v < 0.0 {
                return Err(domain(format!("{} evaluated to {}", key, v)));
            }
        }
    }
    Ok(())
}
