/// Pressure at which the leak and energy terms reach their maximum, in PSI.
pub const REFERENCE_PRESSURE_PSI: f64 = 1000.0;

/// Fraction of an ion that passes a pore wider than the ion.
pub const OPEN_PORE_PASSAGE: f64 = 0.95;

/// Fraction of an oversized ion that leaks through at the reference pressure.
pub const MAX_LEAK_PASSAGE: f64 = 0.05;

/// Hardness as CaCO3 equivalent (mg/L) per ppm of magnesium.
pub const HARDNESS_PER_MG_PPM: f64 = 4.12;

/// Specific energy at the reference pressure, in kWh/m³.
pub const MAX_SPECIFIC_ENERGY: f64 = 5.0;

/// Displayed permeate hardness above this value is flagged.
pub const HIGH_HARDNESS_THRESHOLD: u64 = 120;

/// Displayed permeate TDS below this value is flagged as low.
pub const LOW_PERMEATE_TDS_THRESHOLD: u64 = 100;
