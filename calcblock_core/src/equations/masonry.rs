//! # Masonry Quantity Formulas
//!
//! Fundamental equations for estimating pieces and binder in a single-wythe
//! masonry wall. Each function is a single formula; the estimator in
//! [`crate::calculations::estimate`] chains them.
//!
//! ## Notation
//!
//! - `L`, `H`, `T` = Piece length, height, thickness (cm)
//! - `j` = Joint width (cm)
//! - `A` = Wall area (m²)
//! - `N` = Net piece count (continuous)
//! - `w` = Waste fraction
//! - `V_m` = Binder (mortar) volume (m³)
//! - `Y` = Bag yield (m³/bag)
//! - `c : s` = Cement to sand part ratio
//!
//! ## Rounding
//!
//! Only quantities that are purchased as whole units (pieces, bags) are
//! rounded, always up, and only once. Volumes stay continuous.

use crate::units::{Centimeters, CubicCentimeters, CubicMeters, Meters, CM2_PER_M2};

/// Binder volumes below this fraction of the wall volume are floating-point
/// residue, not material.
pub const VOLUME_RELATIVE_TOLERANCE: f64 = 1e-12;

// =============================================================================
// PIECE COUNT
// =============================================================================

/// Modular (as-built) dimension of a piece: nominal size plus one joint.
///
/// # Formula
/// L_mod = L + j
#[inline]
pub fn modular_dimension(nominal_cm: f64, joint_cm: f64) -> f64 {
    nominal_cm + joint_cm
}

/// Pieces needed to cover one square meter of wall face.
///
/// ```text
///   ┌──────────┬┬──────────┐
///   │  piece   ││  piece   │  H + j
///   ├──────────┴┴──────────┤
///   └── L + j ──┘
/// ```
///
/// # Formula
/// n = 10000 / ((L + j)(H + j))
///
/// # Example
/// ```rust
/// use calcblock_core::equations::masonry::pieces_per_square_meter;
///
/// // 40x20 block with 1 cm joint: 10000 / (41 * 21)
/// let n = pieces_per_square_meter(40.0, 20.0, 1.0);
/// assert!((n - 11.614).abs() < 0.001);
/// ```
#[inline]
pub fn pieces_per_square_meter(length_cm: f64, height_cm: f64, joint_cm: f64) -> f64 {
    let footprint_cm2 = modular_dimension(length_cm, joint_cm) * modular_dimension(height_cm, joint_cm);
    CM2_PER_M2 / footprint_cm2
}

/// Net (pre-waste) piece count for a wall. Continuous, not rounded.
///
/// # Formula
/// N = n × A
#[inline]
pub fn net_piece_count(pieces_per_m2: f64, area_m2: f64) -> f64 {
    pieces_per_m2 * area_m2
}

/// Pieces to purchase: net count plus waste, rounded up to a whole piece.
///
/// # Formula
/// N_total = ⌈N (1 + w)⌉
///
/// # Example
/// ```rust
/// use calcblock_core::equations::masonry::piece_count_with_waste;
///
/// assert_eq!(piece_count_with_waste(116.144, 0.07), 125);
/// assert_eq!(piece_count_with_waste(0.0, 0.07), 0);
/// ```
#[inline]
pub fn piece_count_with_waste(net_pieces: f64, waste_fraction: f64) -> u64 {
    round_up_units(net_pieces * (1.0 + waste_fraction))
}

// =============================================================================
// VOLUMES
// =============================================================================

/// Gross wall volume: face area times piece thickness.
///
/// # Formula
/// V_wall = A × T / 100
#[inline]
pub fn wall_volume_m3(area_m2: f64, thickness_cm: f64) -> f64 {
    let thickness: Meters = Centimeters(thickness_cm).into();
    area_m2 * thickness.value()
}

/// Solid volume of one piece.
///
/// # Formula
/// V_piece = L × H × T / 1,000,000
#[inline]
pub fn piece_volume_m3(length_cm: f64, height_cm: f64, thickness_cm: f64) -> f64 {
    let volume: CubicMeters = CubicCentimeters(length_cm * height_cm * thickness_cm).into();
    volume.value()
}

/// Binder volume: what is left of the wall after the net pieces.
///
/// Uses the net piece count, never the purchased count with waste. Results
/// within [`VOLUME_RELATIVE_TOLERANCE`] of the wall volume (and negatives)
/// clamp to zero.
///
/// # Formula
/// V_m = V_wall − N × V_piece
#[inline]
pub fn binder_volume_m3(wall_volume_m3: f64, net_pieces: f64, piece_volume_m3: f64) -> f64 {
    let volume = wall_volume_m3 - net_pieces * piece_volume_m3;
    if volume <= wall_volume_m3 * VOLUME_RELATIVE_TOLERANCE {
        0.0
    } else {
        volume
    }
}

// =============================================================================
// BINDER
// =============================================================================

/// Whole bags needed to supply a volume at a given yield per bag.
///
/// # Formula
/// bags = ⌈V / Y⌉
///
/// # Example
/// ```rust
/// use calcblock_core::equations::masonry::bags_required;
///
/// // 0.2 m³ of cement at 0.035 m³ per bag
/// assert_eq!(bags_required(0.2, 0.035), 6);
/// assert_eq!(bags_required(0.0, 0.035), 0);
/// ```
#[inline]
pub fn bags_required(volume_m3: f64, yield_m3_per_bag: f64) -> u64 {
    round_up_units(volume_m3 / yield_m3_per_bag)
}

/// Split a binder volume by a cement:sand part ratio.
///
/// # Formulas
/// - V_c = V_m × c / (c + s)
/// - V_s = V_m × s / (c + s)
///
/// # Returns
/// (cement_volume_m3, sand_volume_m3)
#[inline]
pub fn ratio_split(volume_m3: f64, cement_parts: f64, sand_parts: f64) -> (f64, f64) {
    let total_parts = cement_parts + sand_parts;
    (
        volume_m3 * (cement_parts / total_parts),
        volume_m3 * (sand_parts / total_parts),
    )
}

/// Split a binder volume into two equal halves (mortar half, cement+sand half).
#[inline]
pub fn half_split(volume_m3: f64) -> (f64, f64) {
    let half = volume_m3 / 2.0;
    (half, half)
}

/// Round a non-negative continuous quantity up to whole purchasable units.
#[inline]
fn round_up_units(quantity: f64) -> u64 {
    if quantity <= 0.0 {
        0
    } else {
        quantity.ceil() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_modular_dimension() {
        assert_eq!(modular_dimension(40.0, 1.0), 41.0);
        assert_eq!(modular_dimension(20.0, 0.0), 20.0);
    }

    #[test]
    fn test_pieces_per_square_meter() {
        let n = pieces_per_square_meter(40.0, 20.0, 1.0);
        assert!((n - 10000.0 / 861.0).abs() < EPSILON);
    }

    #[test]
    fn test_piece_count_with_waste_scenario() {
        // 40x20x15 block, 1 cm joint, 7% waste, 10 m²
        let n = pieces_per_square_meter(40.0, 20.0, 1.0);
        let net = net_piece_count(n, 10.0);
        assert!((net - 116.144).abs() < 0.001);
        assert_eq!(piece_count_with_waste(net, 0.07), 125);
    }

    #[test]
    fn test_piece_count_rounds_up_partial_piece() {
        assert_eq!(piece_count_with_waste(10.01, 0.0), 11);
        assert_eq!(piece_count_with_waste(10.0, 0.0), 10);
    }

    #[test]
    fn test_wall_volume() {
        // 10 m² of 15 cm wall
        assert!((wall_volume_m3(10.0, 15.0) - 1.5).abs() < EPSILON);
    }

    #[test]
    fn test_piece_volume() {
        assert!((piece_volume_m3(40.0, 20.0, 15.0) - 0.012).abs() < EPSILON);
    }

    #[test]
    fn test_binder_volume_uses_given_count() {
        let net = net_piece_count(pieces_per_square_meter(40.0, 20.0, 1.0), 10.0);
        let v = binder_volume_m3(1.5, net, 0.012);
        // 1.5 - 116.144 * 0.012
        assert!((v - (1.5 - net * 0.012)).abs() < EPSILON);
        assert!(v > 0.10 && v < 0.11);
    }

    #[test]
    fn test_binder_volume_zero_joint_clamps_to_zero() {
        let n = pieces_per_square_meter(40.0, 20.0, 0.0);
        let net = net_piece_count(n, 7.3);
        let v = binder_volume_m3(wall_volume_m3(7.3, 15.0), net, piece_volume_m3(40.0, 20.0, 15.0));
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_binder_volume_kept_on_tiny_wall() {
        let area = 1e-8;
        let net = net_piece_count(pieces_per_square_meter(40.0, 20.0, 1.0), area);
        let v = binder_volume_m3(wall_volume_m3(area, 15.0), net, piece_volume_m3(40.0, 20.0, 15.0));
        assert!(v > 1.0e-10 && v < 1.1e-10);
        assert_eq!(bags_required(v, 0.02), 1);
    }

    #[test]
    fn test_binder_volume_negative_clamps_to_zero() {
        assert_eq!(binder_volume_m3(1.0, 100.0, 0.02), 0.0);
    }

    #[test]
    fn test_bags_required() {
        assert_eq!(bags_required(0.2, 0.035), 6);
        assert_eq!(bags_required(0.13, 0.013), 10);
        assert_eq!(bags_required(0.1301, 0.013), 11);
        assert_eq!(bags_required(0.0, 0.013), 0);
    }

    #[test]
    fn test_ratio_split() {
        let (cement, sand) = ratio_split(1.0, 1.0, 4.0);
        assert!((cement - 0.2).abs() < EPSILON);
        assert!((sand - 0.8).abs() < EPSILON);
    }

    #[test]
    fn test_half_split_conserves_volume() {
        let (a, b) = half_split(0.37);
        assert_eq!(a + b, 0.37);
    }
}
