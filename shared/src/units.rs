//! Unit conversions
//!
//! Body measurements are captured in inches while metric formulas expect
//! centimetres and kilograms.

/// Centimetres per inch
pub const CM_PER_INCH: f64 = 2.54;

/// Convert inches to centimetres
pub fn inches_to_cm(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

/// Convert centimetres to inches
pub fn cm_to_inches(cm: f64) -> f64 {
    cm / CM_PER_INCH
}
