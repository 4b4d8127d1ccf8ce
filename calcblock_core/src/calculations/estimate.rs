//! # Wall Materials Estimate
//!
//! Computes the pieces and binder needed for a masonry wall, with cost and
//! weight. This is a single-pass pure function: no state is kept between
//! calls and identical inputs give bit-identical results.
//!
//! ## Pipeline
//!
//! 1. Modular footprint and pieces per m²
//! 2. Net piece count, then purchased count with waste (rounded up once)
//! 3. Wall volume minus net piece volume gives the binder volume
//! 4. Binder volume becomes mortar bags, cement bags and sand per the
//!    selected [`BinderConfig`]
//! 5. Cost and weight from the purchased quantities
//!
//! ## Example
//!
//! ```rust
//! use calcblock_core::calculations::estimate::{estimate, JointConfig, WallSpec};
//! use calcblock_core::materials::{BinderConfig, PieceSpec, PieceType, PremixedMortar};
//!
//! let piece = PieceSpec::from_type(PieceType::Block15).unwrap();
//! let joint = JointConfig::new(1.0, 0.07);
//! let wall = WallSpec::area(10.0);
//! let binder = BinderConfig::PremixedMortar(PremixedMortar::default());
//!
//! let result = estimate(&piece, &joint, &wall, &binder).unwrap();
//! assert_eq!(result.total_pieces, 125);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::equations::masonry::{
    bags_required, binder_volume_m3, half_split, net_piece_count, piece_count_with_waste,
    piece_volume_m3, pieces_per_square_meter, ratio_split, wall_volume_m3,
};
use crate::equations::registry::{equations_for_binder, EquationTracker};
use crate::errors::{CalcError, CalcResult};
use crate::materials::{
    BinderConfig, CementSandMix, PieceSpec, PremixedMortar, CEMENT_BAG_WEIGHT_KG, CEMENT_BAG_YIELD_M3,
    MORTAR_BAG_WEIGHT_KG, SAND_DENSITY_KG_PER_M3,
};

/// Joint width and purchase waste.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointConfig {
    /// Mortar joint width (cm)
    pub joint_width_cm: f64,
    /// Extra purchase margin as a fraction (0.07 = 7%)
    pub waste_fraction: f64,
}

impl Default for JointConfig {
    fn default() -> Self {
        JointConfig {
            joint_width_cm: 1.0,
            waste_fraction: 0.07,
        }
    }
}

impl JointConfig {
    pub fn new(joint_width_cm: f64, waste_fraction: f64) -> Self {
        JointConfig {
            joint_width_cm,
            waste_fraction,
        }
    }

    /// Build from a waste percentage as entered on the form (7.0 = 7%)
    pub fn with_waste_percent(joint_width_cm: f64, waste_percent: f64) -> Self {
        JointConfig::new(joint_width_cm, waste_percent / 100.0)
    }

    /// Waste as a percentage for display
    pub fn waste_percent(&self) -> f64 {
        self.waste_fraction * 100.0
    }

    fn validate(&self) -> CalcResult<()> {
        if !self.joint_width_cm.is_finite() || self.joint_width_cm < 0.0 {
            return Err(CalcError::invalid_configuration(
                "joint.joint_width_cm",
                self.joint_width_cm.to_string(),
                "Joint width cannot be negative",
            ));
        }
        if !self.waste_fraction.is_finite() || !(0.0..=1.0).contains(&self.waste_fraction) {
            return Err(CalcError::invalid_configuration(
                "joint.waste_fraction",
                self.waste_fraction.to_string(),
                "Waste fraction must be between 0 and 1",
            ));
        }
        Ok(())
    }
}

/// Wall face, entered either as an area or as length x height.
///
/// ## JSON Example
///
/// ```json
/// { "mode": "Area", "area_m2": 10.0 }
/// { "mode": "Dimensions", "length_m": 5.0, "height_m": 2.5 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum WallSpec {
    /// Face area given directly (m²)
    Area { area_m2: f64 },
    /// Face area derived from length and height (m)
    Dimensions { length_m: f64, height_m: f64 },
}

impl Default for WallSpec {
    fn default() -> Self {
        WallSpec::Area { area_m2: 10.0 }
    }
}

impl WallSpec {
    /// Wall given by area
    pub fn area(area_m2: f64) -> Self {
        WallSpec::Area { area_m2 }
    }

    /// Wall given by length and height
    pub fn dimensions(length_m: f64, height_m: f64) -> Self {
        WallSpec::Dimensions { length_m, height_m }
    }

    /// Face area in m²
    pub fn area_m2(&self) -> f64 {
        match *self {
            WallSpec::Area { area_m2 } => area_m2,
            WallSpec::Dimensions { length_m, height_m } => length_m * height_m,
        }
    }

    fn validate(&self) -> CalcResult<()> {
        let fields = match *self {
            WallSpec::Area { area_m2 } => vec![("wall.area_m2", area_m2)],
            WallSpec::Dimensions { length_m, height_m } => {
                vec![("wall.length_m", length_m), ("wall.height_m", height_m)]
            }
        };
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::invalid_configuration(
                    field,
                    value.to_string(),
                    "Wall measurements cannot be negative",
                ));
            }
        }
        let area_m2 = self.area_m2();
        if !area_m2.is_finite() {
            return Err(CalcError::invalid_configuration(
                "wall.area_m2",
                area_m2.to_string(),
                "Wall area is out of range",
            ));
        }
        Ok(())
    }
}

/// All inputs for one estimate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateInput {
    /// User label (e.g. "Muro lindero norte")
    #[serde(default)]
    pub label: String,
    pub piece: PieceSpec,
    #[serde(default)]
    pub joint: JointConfig,
    pub wall: WallSpec,
    #[serde(default)]
    pub binder: BinderConfig,
}

impl EstimateInput {
    /// Validate every input record. Returns the first problem found.
    pub fn validate(&self) -> CalcResult<()> {
        validate_parts(&self.piece, &self.joint, &self.wall, &self.binder)
    }
}

/// Purchased binder quantities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BinderQuantities {
    /// Premixed mortar bags (25 kg)
    pub mortar_bags: u64,
    /// Cement bags (50 kg)
    pub cement_bags: u64,
    /// Cement share of the binder volume (m³)
    pub cement_volume_m3: f64,
    /// Loose sand (m³)
    pub sand_m3: f64,
}

/// Cost per material. All contributions are additive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub pieces: f64,
    pub mortar: f64,
    pub cement: f64,
    pub sand: f64,
    pub total: f64,
}

/// Weight per material (kg).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightBreakdown {
    pub pieces_kg: f64,
    pub mortar_kg: f64,
    pub cement_kg: f64,
    pub sand_kg: f64,
    pub total_kg: f64,
}

/// Results of an estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "wall_area_m2": 10.0,
///   "pieces_per_m2": 11.614,
///   "net_pieces": 116.14,
///   "total_pieces": 125,
///   "wall_volume_m3": 1.5,
///   "piece_volume_m3": 0.012,
///   "binder_volume_m3": 0.106,
///   "binder": { "mortar_bags": 9, "cement_bags": 0, "cement_volume_m3": 0.0, "sand_m3": 0.0 },
///   "cost": { "pieces": 2250.0, "mortar": 1080.0, "cement": 0.0, "sand": 0.0, "total": 3330.0 },
///   "weight": { "pieces_kg": 1562.5, "mortar_kg": 225.0, "cement_kg": 0.0, "sand_kg": 0.0, "total_kg": 1787.5 }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Wall face area (m²)
    pub wall_area_m2: f64,
    /// Pieces per square meter with joints
    pub pieces_per_m2: f64,
    /// Pieces needed before waste (continuous)
    pub net_pieces: f64,
    /// Pieces to buy, waste included, rounded up
    pub total_pieces: u64,
    /// Gross wall volume (m³)
    pub wall_volume_m3: f64,
    /// Volume of one piece (m³)
    pub piece_volume_m3: f64,
    /// Binder volume filling the joints (m³)
    pub binder_volume_m3: f64,
    pub binder: BinderQuantities,
    pub cost: CostBreakdown,
    pub weight: WeightBreakdown,
}

/// Estimate materials for a wall.
///
/// # Arguments
///
/// * `piece` - Piece geometry, weight and price
/// * `joint` - Joint width and waste fraction
/// * `wall` - Wall area or dimensions
/// * `binder` - Binder selection and its parameters
///
/// # Returns
///
/// * `Ok(EstimationResult)` - Complete quantities, cost and weight
/// * `Err(CalcError::InvalidConfiguration)` - If any input is out of range
pub fn estimate(
    piece: &PieceSpec,
    joint: &JointConfig,
    wall: &WallSpec,
    binder: &BinderConfig,
) -> CalcResult<EstimationResult> {
    validate_parts(piece, joint, wall, binder)?;

    let wall_area_m2 = wall.area_m2();

    // Piece count
    let pieces_per_m2 = pieces_per_square_meter(piece.length_cm, piece.height_cm, joint.joint_width_cm);
    let net_pieces = net_piece_count(pieces_per_m2, wall_area_m2);
    let total_pieces = piece_count_with_waste(net_pieces, joint.waste_fraction);
    debug!(pieces_per_m2, net_pieces, total_pieces, "piece count");

    // Volume balance on the net count; waste is a purchasing margin only
    let wall_volume = wall_volume_m3(wall_area_m2, piece.thickness_cm);
    let piece_volume = piece_volume_m3(piece.length_cm, piece.height_cm, piece.thickness_cm);
    let binder_volume = binder_volume_m3(wall_volume, net_pieces, piece_volume);
    debug!(wall_volume, piece_volume, binder_volume, "volume balance");

    let quantities = binder_quantities(binder, binder_volume);
    debug!(
        mortar_bags = quantities.mortar_bags,
        cement_bags = quantities.cement_bags,
        sand_m3 = quantities.sand_m3,
        "binder quantities"
    );

    let cost = cost_breakdown(piece, binder, total_pieces, &quantities);
    let weight = weight_breakdown(piece, total_pieces, &quantities);

    Ok(EstimationResult {
        wall_area_m2,
        pieces_per_m2,
        net_pieces,
        total_pieces,
        wall_volume_m3: wall_volume,
        piece_volume_m3: piece_volume,
        binder_volume_m3: binder_volume,
        binder: quantities,
        cost,
        weight,
    })
}

/// Estimate from a bundled input record.
pub fn calculate(input: &EstimateInput) -> CalcResult<EstimationResult> {
    estimate(&input.piece, &input.joint, &input.wall, &input.binder)
}

/// Estimate and record the formulas applied, for the report appendix.
pub fn calculate_tracked(input: &EstimateInput, tracker: &mut EquationTracker) -> CalcResult<EstimationResult> {
    let result = calculate(input)?;
    let context = if input.label.is_empty() { "Muro" } else { input.label.as_str() };
    for equation in equations_for_binder(input.binder.binder_type()) {
        tracker.record(equation, context);
    }
    Ok(result)
}

fn validate_parts(piece: &PieceSpec, joint: &JointConfig, wall: &WallSpec, binder: &BinderConfig) -> CalcResult<()> {
    piece.validate()?;
    joint.validate()?;

    // Division safety on the modular footprint
    let effective_length = piece.length_cm + joint.joint_width_cm;
    let effective_height = piece.height_cm + joint.joint_width_cm;
    if effective_length <= 0.0 || effective_height <= 0.0 {
        return Err(CalcError::invalid_configuration(
            "joint.joint_width_cm",
            joint.joint_width_cm.to_string(),
            "Piece plus joint must be positive",
        ));
    }

    wall.validate()?;
    binder.validate()
}

fn mortar_bags(mortar: &PremixedMortar, volume_m3: f64) -> u64 {
    bags_required(volume_m3, mortar.bag_yield_m3)
}

fn cement_sand_quantities(mix: &CementSandMix, volume_m3: f64) -> (u64, f64, f64) {
    let (cement_volume, sand_volume) = ratio_split(volume_m3, mix.cement_parts, mix.sand_parts);
    (bags_required(cement_volume, CEMENT_BAG_YIELD_M3), cement_volume, sand_volume)
}

fn binder_quantities(binder: &BinderConfig, binder_volume: f64) -> BinderQuantities {
    match binder {
        BinderConfig::PremixedMortar(mortar) => BinderQuantities {
            mortar_bags: mortar_bags(mortar, binder_volume),
            ..BinderQuantities::default()
        },
        BinderConfig::CementSand(mix) => {
            let (cement_bags, cement_volume_m3, sand_m3) = cement_sand_quantities(mix, binder_volume);
            BinderQuantities {
                mortar_bags: 0,
                cement_bags,
                cement_volume_m3,
                sand_m3,
            }
        }
        BinderConfig::Both { mortar, cement_sand } => {
            let (mortar_half, mix_half) = half_split(binder_volume);
            let (cement_bags, cement_volume_m3, sand_m3) = cement_sand_quantities(cement_sand, mix_half);
            BinderQuantities {
                mortar_bags: mortar_bags(mortar, mortar_half),
                cement_bags,
                cement_volume_m3,
                sand_m3,
            }
        }
    }
}

fn cost_breakdown(
    piece: &PieceSpec,
    binder: &BinderConfig,
    total_pieces: u64,
    quantities: &BinderQuantities,
) -> CostBreakdown {
    let pieces = total_pieces as f64 * piece.unit_cost;
    let mortar = binder
        .mortar()
        .map_or(0.0, |m| quantities.mortar_bags as f64 * m.bag_cost);
    let (cement, sand) = binder.cement_sand().map_or((0.0, 0.0), |mix| {
        (
            quantities.cement_bags as f64 * mix.cement_bag_cost,
            quantities.sand_m3 * mix.sand_cost_per_m3,
        )
    });

    CostBreakdown {
        pieces,
        mortar,
        cement,
        sand,
        total: pieces + mortar + cement + sand,
    }
}

fn weight_breakdown(piece: &PieceSpec, total_pieces: u64, quantities: &BinderQuantities) -> WeightBreakdown {
    let pieces_kg = total_pieces as f64 * piece.unit_weight_kg;
    let mortar_kg = quantities.mortar_bags as f64 * MORTAR_BAG_WEIGHT_KG;
    let cement_kg = quantities.cement_bags as f64 * CEMENT_BAG_WEIGHT_KG;
    let sand_kg = quantities.sand_m3 * SAND_DENSITY_KG_PER_M3;

    WeightBreakdown {
        pieces_kg,
        mortar_kg,
        cement_kg,
        sand_kg,
        total_kg: pieces_kg + mortar_kg + cement_kg + sand_kg,
    }
}
