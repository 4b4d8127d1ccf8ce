//! # calcblock_core - Masonry Materials Estimation Engine
//!
//! `calcblock_core` estimates the pieces, binder, cost and weight needed to
//! build a masonry wall, following common site practice in Mexico. All
//! inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use calcblock_core::calculations::estimate::{calculate, EstimateInput};
//!
//! // Block 15, 1 cm joint, 7% waste, 10 m², premixed mortar
//! let input = EstimateInput::default();
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.total_pieces, 125);
//!
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - The wall estimate
//! - [`equations`] - Masonry formulas and the formula registry
//! - [`materials`] - Piece catalog and binder configurations
//! - [`report`] - Fixed-layout report of an estimate
//! - [`pdf`] - PDF export of reports
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod equations;
pub mod errors;
pub mod materials;
pub mod pdf;
pub mod report;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, estimate, EstimateInput, EstimationResult, JointConfig, WallSpec};
pub use errors::{CalcError, CalcResult};
pub use materials::{BinderConfig, BinderType, PieceSpec, PieceType};
pub use pdf::{export_estimate, render_estimate_pdf, ExportedDocument};
pub use report::{build_document_report, build_report, EstimateReport};
