//! Masonry Pieces
//!
//! Catalog of the piece types commonly laid in Mexico with their canonical
//! nominal dimensions, plus [`PieceSpec`], the geometry and price record the
//! estimator consumes.
//!
//! ## Canonical Dimensions (L x H x T, cm)
//!
//! - Block 12: 40 x 20 x 12
//! - Block 15: 40 x 20 x 15
//! - Block 20: 40 x 20 x 20
//! - Ladrillo rojo / tabique: 23 x 5 x 7
//!
//! Every catalog value is only a default; the user may override any
//! dimension, weight, or price.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Default unit price for a piece (MXN)
pub const DEFAULT_UNIT_COST: f64 = 18.0;

/// Named piece type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PieceType {
    /// Concrete block 12 cm thick
    Block12,
    /// Concrete block 15 cm thick
    #[default]
    Block15,
    /// Concrete block 20 cm thick
    Block20,
    /// Red fired clay brick (tabique)
    RedBrick,
    /// Custom piece - user specifies all dimensions
    Custom,
}

impl PieceType {
    /// All piece types for selection (catalog order)
    pub const ALL: [PieceType; 5] = [
        PieceType::Block12,
        PieceType::Block15,
        PieceType::Block20,
        PieceType::RedBrick,
        PieceType::Custom,
    ];

    /// Display name as used on site
    pub fn display_name(&self) -> &'static str {
        match self {
            PieceType::Block12 => "Block 12",
            PieceType::Block15 => "Block 15",
            PieceType::Block20 => "Block 20",
            PieceType::RedBrick => "Ladrillo rojo / tabique",
            PieceType::Custom => "Pieza personalizada",
        }
    }

    /// Nominal dimensions (length, height, thickness) in cm.
    ///
    /// Returns `None` for `Custom`.
    pub fn nominal_dimensions(&self) -> Option<(f64, f64, f64)> {
        match self {
            PieceType::Block12 => Some((40.0, 20.0, 12.0)),
            PieceType::Block15 => Some((40.0, 20.0, 15.0)),
            PieceType::Block20 => Some((40.0, 20.0, 20.0)),
            PieceType::RedBrick => Some((23.0, 5.0, 7.0)),
            PieceType::Custom => None,
        }
    }

    /// Typical weight of one piece (kg). Zero for `Custom`.
    pub fn typical_weight_kg(&self) -> f64 {
        match self {
            PieceType::Block12 => 10.0,
            PieceType::Block15 => 12.5,
            PieceType::Block20 => 15.0,
            PieceType::RedBrick => 1.5,
            PieceType::Custom => 0.0,
        }
    }

    /// Check if this is a custom piece
    pub fn is_custom(&self) -> bool {
        matches!(self, PieceType::Custom)
    }
}

impl std::fmt::Display for PieceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Geometry, weight, and price of one masonry piece.
///
/// ## JSON Example
///
/// ```json
/// {
///   "piece_type": "block15",
///   "length_cm": 40.0,
///   "height_cm": 20.0,
///   "thickness_cm": 15.0,
///   "unit_weight_kg": 12.5,
///   "unit_cost": 18.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieceSpec {
    /// Catalog type (informational; dimensions below are authoritative)
    #[serde(default = "custom_piece_type")]
    pub piece_type: PieceType,
    /// Nominal length (cm)
    pub length_cm: f64,
    /// Nominal height (cm)
    pub height_cm: f64,
    /// Thickness, which is also the wall thickness (cm)
    pub thickness_cm: f64,
    /// Weight of one piece (kg)
    #[serde(default)]
    pub unit_weight_kg: f64,
    /// Price of one piece
    #[serde(default)]
    pub unit_cost: f64,
}

fn custom_piece_type() -> PieceType {
    PieceType::Custom
}

impl Default for PieceSpec {
    fn default() -> Self {
        PieceSpec {
            piece_type: PieceType::Block15,
            length_cm: 40.0,
            height_cm: 20.0,
            thickness_cm: 15.0,
            unit_weight_kg: PieceType::Block15.typical_weight_kg(),
            unit_cost: DEFAULT_UNIT_COST,
        }
    }
}

impl PieceSpec {
    /// Piece with catalog defaults. Returns `None` for `PieceType::Custom`.
    pub fn from_type(piece_type: PieceType) -> Option<Self> {
        let (length_cm, height_cm, thickness_cm) = piece_type.nominal_dimensions()?;
        Some(PieceSpec {
            piece_type,
            length_cm,
            height_cm,
            thickness_cm,
            unit_weight_kg: piece_type.typical_weight_kg(),
            unit_cost: DEFAULT_UNIT_COST,
        })
    }

    /// Custom piece with no weight and no price until set.
    pub fn custom(length_cm: f64, height_cm: f64, thickness_cm: f64) -> Self {
        PieceSpec {
            piece_type: PieceType::Custom,
            length_cm,
            height_cm,
            thickness_cm,
            unit_weight_kg: 0.0,
            unit_cost: 0.0,
        }
    }

    /// Set the unit price
    pub fn with_unit_cost(mut self, unit_cost: f64) -> Self {
        self.unit_cost = unit_cost;
        self
    }

    /// Set the unit weight
    pub fn with_unit_weight(mut self, unit_weight_kg: f64) -> Self {
        self.unit_weight_kg = unit_weight_kg;
        self
    }

    /// Dimensions as "L x H x T cm"
    pub fn dimensions_label(&self) -> String {
        format!("{} x {} x {} cm", self.length_cm, self.height_cm, self.thickness_cm)
    }

    /// Validate piece geometry and price.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("piece.length_cm", self.length_cm),
            ("piece.height_cm", self.height_cm),
            ("piece.thickness_cm", self.thickness_cm),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalcError::invalid_configuration(
                    field,
                    value.to_string(),
                    "Piece dimensions must be positive",
                ));
            }
        }
        if !self.unit_weight_kg.is_finite() || self.unit_weight_kg < 0.0 {
            return Err(CalcError::invalid_configuration(
                "piece.unit_weight_kg",
                self.unit_weight_kg.to_string(),
                "Weight cannot be negative",
            ));
        }
        if !self.unit_cost.is_finite() || self.unit_cost < 0.0 {
            return Err(CalcError::invalid_configuration(
                "piece.unit_cost",
                self.unit_cost.to_string(),
                "Price must be zero or positive",
            ));
        }
        Ok(())
    }
}
