//! # Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`estimate`] - Pieces, binder, cost and weight for a masonry wall

pub mod estimate;

// Re-export commonly used types
pub use estimate::{
    calculate, calculate_tracked, estimate, BinderQuantities, CostBreakdown, EstimateInput, EstimationResult,
    JointConfig, WallSpec, WeightBreakdown,
};
