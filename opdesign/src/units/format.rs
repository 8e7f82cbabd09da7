//! Engineering-notation formatting
//!
//! Two renderings share one unit selection: a display form with two decimals
//! (`"10.00 kΩ"`) and a template form with one decimal and LaTeX-escaped units
//! (`"10.0\\ k\\Ohm"`).

/// Resistance display scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResistanceUnit {
    MegaOhm,
    KiloOhm,
    Ohm,
}

impl ResistanceUnit {
    pub fn select(ohms: f64) -> Self {
        if ohms >= 1e6 {
            ResistanceUnit::MegaOhm
        } else if ohms >= 1e3 {
            ResistanceUnit::KiloOhm
        } else {
            ResistanceUnit::Ohm
        }
    }

    pub fn scale(&self) -> f64 {
        match self {
            ResistanceUnit::MegaOhm => 1e6,
            ResistanceUnit::KiloOhm => 1e3,
            ResistanceUnit::Ohm => 1.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ResistanceUnit::MegaOhm => "MΩ",
            ResistanceUnit::KiloOhm => "kΩ",
            ResistanceUnit::Ohm => "Ω",
        }
    }

    pub fn escaped(&self) -> &'static str {
        match self {
            ResistanceUnit::MegaOhm => r"\\ M\\Ohm",
            ResistanceUnit::KiloOhm => r"\\ k\\Ohm",
            ResistanceUnit::Ohm => r"\\ \\Ohm",
        }
    }
}

/// Capacitance display scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacitanceUnit {
    MilliFarad,
    MicroFarad,
    NanoFarad,
    PicoFarad,
}

impl CapacitanceUnit {
    pub fn select(farads: f64) -> Self {
        if farads >= 1e-3 {
            CapacitanceUnit::MilliFarad
        } else if farads >= 1e-6 {
            CapacitanceUnit::MicroFarad
        } else if farads >= 1e-9 {
            CapacitanceUnit::NanoFarad
        } else {
            CapacitanceUnit::PicoFarad
        }
    }

    pub fn scale(&self) -> f64 {
        match self {
            CapacitanceUnit::MilliFarad => 1e-3,
            CapacitanceUnit::MicroFarad => 1e-6,
            CapacitanceUnit::NanoFarad => 1e-9,
            CapacitanceUnit::PicoFarad => 1e-12,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CapacitanceUnit::MilliFarad => "mF",
            CapacitanceUnit::MicroFarad => "μF",
            CapacitanceUnit::NanoFarad => "nF",
            CapacitanceUnit::PicoFarad => "pF",
        }
    }

    pub fn escaped(&self) -> &'static str {
        match self {
            CapacitanceUnit::MilliFarad => r"\\ mF",
            CapacitanceUnit::MicroFarad => r"\\ \\mu F",
            CapacitanceUnit::NanoFarad => r"\\ nF",
            CapacitanceUnit::PicoFarad => r"\\ pF",
        }
    }
}

pub fn format_resistance(ohms: f64) -> String {
    let unit = ResistanceUnit::select(ohms);
    format!("{:.2} {}", ohms / unit.scale(), unit.symbol())
}

pub fn format_capacitance(farads: f64) -> String {
    let unit = CapacitanceUnit::select(farads);
    format!("{:.2} {}", farads / unit.scale(), unit.symbol())
}

pub fn format_voltage(volts: f64) -> String {
    format!("{:.2} V", volts)
}

pub fn format_frequency(hz: f64) -> String {
    format!("{:.2} Hz", hz)
}

/// Time in s, ms or μs, whichever keeps the magnitude at or above 1.
pub fn format_time(seconds: f64) -> String {
    if seconds >= 1.0 {
        format!("{:.2} s", seconds)
    } else if seconds >= 1e-3 {
        format!("{:.2} ms", seconds * 1e3)
    } else {
        format!("{:.2} μs", seconds * 1e6)
    }
}

pub fn template_resistance(ohms: f64) -> String {
    let unit = ResistanceUnit::select(ohms);
    format!("{:.1}{}", ohms / unit.scale(), unit.escaped())
}

pub fn template_capacitance(farads: f64) -> String {
    let unit = CapacitanceUnit::select(farads);
    format!("{:.1}{}", farads / unit.scale(), unit.escaped())
}

pub fn template_voltage(volts: f64) -> String {
    format!(r"{:.1}\\ V", volts)
}
