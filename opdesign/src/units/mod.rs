pub mod format;
pub mod parse;

// Re-export for convenience
pub use format::{
    format_capacitance, format_frequency, format_resistance, format_time, format_voltage,
    template_capacitance, template_resistance, template_voltage, CapacitanceUnit, ResistanceUnit,
};
pub use parse::{parse_value, NumericParser, ParsePolicy, ParseValueError};
