//! Binder Materials
//!
//! The material that fills the joints between pieces. Three mutually
//! exclusive configurations are supported, matching how binder is bought on
//! site: premixed mortar in 25 kg bags, cement (50 kg bags) mixed with sand
//! by part ratio, or both with the volume split in half.
//!
//! ## JSON Serialization
//!
//! ```json
//! { "type": "PremixedMortar", "bag_yield_m3": 0.013, "bag_cost": 120.0 }
//!
//! { "type": "CementSand", "cement_parts": 1.0, "sand_parts": 4.0,
//!   "cement_bag_cost": 280.0, "sand_cost_per_m3": 450.0 }
//!
//! { "type": "Both",
//!   "mortar": { "bag_yield_m3": 0.013, "bag_cost": 120.0 },
//!   "cement_sand": { "cement_parts": 1.0, "sand_parts": 4.0,
//!                    "cement_bag_cost": 280.0, "sand_cost_per_m3": 450.0 } }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Volume of mix contributed by one 50 kg cement bag (m³). Fixed by practice.
pub const CEMENT_BAG_YIELD_M3: f64 = 0.035;

/// Weight of one premixed mortar bag (kg)
pub const MORTAR_BAG_WEIGHT_KG: f64 = 25.0;

/// Weight of one cement bag (kg)
pub const CEMENT_BAG_WEIGHT_KG: f64 = 50.0;

/// Bulk density of sand (kg/m³)
pub const SAND_DENSITY_KG_PER_M3: f64 = 1600.0;

/// Premixed mortar sold in 25 kg bags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PremixedMortar {
    /// Binder volume produced by one bag (m³/bag)
    pub bag_yield_m3: f64,
    /// Price of one bag
    pub bag_cost: f64,
}

impl Default for PremixedMortar {
    fn default() -> Self {
        PremixedMortar {
            bag_yield_m3: 0.013,
            bag_cost: 120.0,
        }
    }
}

impl PremixedMortar {
    fn validate(&self, prefix: &str) -> CalcResult<()> {
        if !self.bag_yield_m3.is_finite() || self.bag_yield_m3 <= 0.0 {
            return Err(CalcError::invalid_configuration(
                format!("{prefix}.bag_yield_m3"),
                self.bag_yield_m3.to_string(),
                "Bag yield must be positive",
            ));
        }
        non_negative_price(&format!("{prefix}.bag_cost"), self.bag_cost)
    }
}

/// Site-mixed binder: cement bags plus loose sand by part ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CementSandMix {
    /// Parts of cement in the mix (e.g. 1 in 1:4)
    pub cement_parts: f64,
    /// Parts of sand in the mix (e.g. 4 in 1:4)
    pub sand_parts: f64,
    /// Price of one 50 kg cement bag
    pub cement_bag_cost: f64,
    /// Price of sand per m³
    pub sand_cost_per_m3: f64,
}

impl Default for CementSandMix {
    fn default() -> Self {
        CementSandMix {
            cement_parts: 1.0,
            sand_parts: 4.0,
            cement_bag_cost: 280.0,
            sand_cost_per_m3: 450.0,
        }
    }
}

impl CementSandMix {
    /// Sum of both parts; the denominator of the ratio split
    pub fn total_parts(&self) -> f64 {
        self.cement_parts + self.sand_parts
    }

    /// Ratio as shown on site, e.g. "1:4"
    pub fn ratio_label(&self) -> String {
        format!("{}:{}", self.cement_parts, self.sand_parts)
    }

    fn validate(&self, prefix: &str) -> CalcResult<()> {
        for (name, parts) in [("cement_parts", self.cement_parts), ("sand_parts", self.sand_parts)] {
            if !parts.is_finite() || parts < 0.0 {
                return Err(CalcError::invalid_configuration(
                    format!("{prefix}.{name}"),
                    parts.to_string(),
                    "Ratio parts cannot be negative",
                ));
            }
        }
        if self.total_parts() <= 0.0 {
            return Err(CalcError::invalid_configuration(
                format!("{prefix}.cement_parts"),
                self.ratio_label(),
                "Ratio parts must sum to a positive number",
            ));
        }
        non_negative_price(&format!("{prefix}.cement_bag_cost"), self.cement_bag_cost)?;
        non_negative_price(&format!("{prefix}.sand_cost_per_m3"), self.sand_cost_per_m3)
    }
}

/// Binder configuration. Exactly one variant is selected per estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BinderConfig {
    /// All binder volume supplied as premixed mortar bags
    PremixedMortar(PremixedMortar),
    /// All binder volume mixed on site from cement and sand
    CementSand(CementSandMix),
    /// Half premixed mortar, half cement and sand
    Both {
        mortar: PremixedMortar,
        cement_sand: CementSandMix,
    },
}

impl Default for BinderConfig {
    fn default() -> Self {
        BinderConfig::PremixedMortar(PremixedMortar::default())
    }
}

impl BinderConfig {
    /// The selector value this configuration corresponds to
    pub fn binder_type(&self) -> BinderType {
        match self {
            BinderConfig::PremixedMortar(_) => BinderType::PremixedMortar,
            BinderConfig::CementSand(_) => BinderType::CementSand,
            BinderConfig::Both { .. } => BinderType::Both,
        }
    }

    /// Premixed mortar parameters, if this configuration buys mortar bags
    pub fn mortar(&self) -> Option<&PremixedMortar> {
        match self {
            BinderConfig::PremixedMortar(m) | BinderConfig::Both { mortar: m, .. } => Some(m),
            BinderConfig::CementSand(_) => None,
        }
    }

    /// Cement and sand parameters, if this configuration mixes on site
    pub fn cement_sand(&self) -> Option<&CementSandMix> {
        match self {
            BinderConfig::CementSand(c) | BinderConfig::Both { cement_sand: c, .. } => Some(c),
            BinderConfig::PremixedMortar(_) => None,
        }
    }

    /// Validate all parameters of the selected variant.
    pub fn validate(&self) -> CalcResult<()> {
        if let Some(mortar) = self.mortar() {
            mortar.validate("binder.mortar")?;
        }
        if let Some(mix) = self.cement_sand() {
            mix.validate("binder.cement_sand")?;
        }
        Ok(())
    }
}

/// Binder selector as offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BinderType {
    /// "Mortero (bultos 25 kg)"
    #[default]
    PremixedMortar,
    /// "Cemento + arena"
    CementSand,
    /// "Ambos (mortero + cemento)"
    Both,
}

impl BinderType {
    /// All selector options in display order
    pub const ALL: [BinderType; 3] = [BinderType::PremixedMortar, BinderType::CementSand, BinderType::Both];

    /// Label used on the form and in reports
    pub fn display_name(&self) -> &'static str {
        match self {
            BinderType::PremixedMortar => "Mortero (bultos 25 kg)",
            BinderType::CementSand => "Cemento + arena",
            BinderType::Both => "Ambos (mortero + cemento)",
        }
    }

    /// Build a configuration of this type from mortar and mix parameters.
    ///
    /// Parameters not used by the selected type are ignored.
    pub fn config(&self, mortar: PremixedMortar, cement_sand: CementSandMix) -> BinderConfig {
        match self {
            BinderType::PremixedMortar => BinderConfig::PremixedMortar(mortar),
            BinderType::CementSand => BinderConfig::CementSand(cement_sand),
            BinderType::Both => BinderConfig::Both { mortar, cement_sand },
        }
    }
}

fn non_negative_price(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid_configuration(
            field,
            value.to_string(),
            "Price must be zero or positive",
        ));
    }
    Ok(())
}
