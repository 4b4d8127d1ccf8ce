//! # Materials
//!
//! Definitions of the materials a masonry wall is built from.
//!
//! ## Material Types
//!
//! - **Pieces**: blocks and bricks with canonical catalog dimensions
//! - **Binder**: premixed mortar, cement + sand, or both
//!
//! ## Example
//!
//! ```rust
//! use calcblock_core::materials::{BinderConfig, CementSandMix, PieceSpec, PieceType};
//!
//! let piece = PieceSpec::from_type(PieceType::Block15).unwrap();
//! let binder = BinderConfig::CementSand(CementSandMix::default());
//!
//! assert_eq!(piece.thickness_cm, 15.0);
//! assert!(binder.validate().is_ok());
//! ```

pub mod binder;
pub mod pieces;

pub use binder::{
    BinderConfig, BinderType, CementSandMix, PremixedMortar, CEMENT_BAG_WEIGHT_KG, CEMENT_BAG_YIELD_M3,
    MORTAR_BAG_WEIGHT_KG, SAND_DENSITY_KG_PER_M3,
};
pub use pieces::{PieceSpec, PieceType, DEFAULT_UNIT_COST};
