//! # Masonry Formulas
//!
//! All formulas used by the estimator live here, in one place, so they can
//! be checked against site practice and listed in reports.
//!
//! ## Modules
//!
//! - [`masonry`] - Piece count, volume and binder formulas
//! - [`registry`] - Formula metadata and tracking for the PDF appendix
//!
//! ## Units
//!
//! - Piece dimensions and joints in centimeters
//! - Wall areas in m², volumes in m³
//! - Bag and piece counts are whole numbers, rounded up

pub mod masonry;
pub mod registry;

pub use masonry::{
    bags_required, binder_volume_m3, half_split, modular_dimension, net_piece_count, piece_count_with_waste,
    piece_volume_m3, pieces_per_square_meter, ratio_split, wall_volume_m3, VOLUME_RELATIVE_TOLERANCE,
};

pub use registry::{
    equations_for_binder, generate_formulas_markdown, Equation, EquationCategory, EquationMetadata,
    EquationTracker, EquationUsage, FormulaSource, Variable, ALL_EQUATIONS,
};
