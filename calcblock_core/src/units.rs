//! # Unit Types
//!
//! Type-safe wrappers for the metric units used on a Mexican job site.
//! These are plain `f64` newtypes: they serialize as bare numbers and cost
//! nothing at runtime, but keep centimeters and meters from being mixed up.
//!
//! ## Conventions
//!
//! - Piece dimensions and joints: centimeters (cm)
//! - Wall dimensions: meters (m), areas in m²
//! - Binder volumes: cubic meters (m³)
//! - Weights: kilograms (kg)
//!
//! ## Example
//!
//! ```rust
//! use calcblock_core::units::{Centimeters, CubicCentimeters, CubicMeters, Meters};
//!
//! let thickness = Centimeters(15.0);
//! let meters: Meters = thickness.into();
//! assert!((meters.value() - 0.15).abs() < 1e-12);
//!
//! let block = CubicCentimeters(40.0 * 20.0 * 15.0);
//! let m3: CubicMeters = block.into();
//! assert!((m3.value() - 0.012).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

/// Centimeters in one meter
pub const CM_PER_M: f64 = 100.0;

/// Square centimeters in one square meter
pub const CM2_PER_M2: f64 = 10_000.0;

/// Cubic centimeters in one cubic meter
pub const CM3_PER_M3: f64 = 1_000_000.0;

// ============================================================================
// Length Units
// ============================================================================

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Centimeters> for Meters {
    fn from(cm: Centimeters) -> Self {
        Meters(cm.0 / CM_PER_M)
    }
}

// ============================================================================
// Volume Units
// ============================================================================

/// Volume in cubic centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicCentimeters(pub f64);

/// Volume in cubic meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMeters(pub f64);

impl From<CubicCentimeters> for CubicMeters {
    fn from(cm3: CubicCentimeters) -> Self {
        CubicMeters(cm3.0 / CM3_PER_M3)
    }
}

// ============================================================================
// Mass Units
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

impl Kilograms {
    /// Convert to metric tonnes (1 t = 1000 kg)
    pub fn tonnes(self) -> f64 {
        self.0 / 1000.0
    }
}

macro_rules! impl_value {
    ($($type:ty),*) => {
        $(
            impl $type {
                /// Get the raw f64 value
                pub fn value(self) -> f64 {
                    self.0
                }
            }
        )*
    };
}

impl_value!(Meters, CubicMeters);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centimeters_to_meters() {
        let cm = Centimeters(250.0);
        let m: Meters = cm.into();
        assert_eq!(m.value(), 2.5);
    }

    #[test]
    fn test_cubic_conversion() {
        // One 40x20x15 block
        let cm3 = CubicCentimeters(40.0 * 20.0 * 15.0);
        let m3: CubicMeters = cm3.into();
        assert!((m3.value() - 0.012).abs() < 1e-12);
    }

    #[test]
    fn test_tonnes() {
        assert_eq!(Kilograms(2500.0).tonnes(), 2.5);
    }

    #[test]
    fn test_serialization() {
        let m = Meters(12.5);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "12.5");

        let roundtrip: Meters = serde_json::from_str(&json).unwrap();
        assert_eq!(m, roundtrip);
    }
}
