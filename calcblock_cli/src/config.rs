//! Job file loading and form value resolution.
//!
//! Precedence (lowest to highest): form defaults → job file → CLI flags.
//! Both the job file and the CLI flags are reduced to [`FormOverrides`] and
//! applied in order to [`FormValues`].
//!
//! ```toml
//! label = "Muro lindero norte"
//!
//! [piece]
//! type = "block20"
//! unit_cost = 21.5
//!
//! [joint]
//! waste_pct = 5.0
//!
//! [wall]
//! length_m = 12.0
//! height_m = 2.4
//!
//! [binder]
//! type = "cement-sand"
//! cement_parts = 1
//! sand_parts = 5
//! ```

use std::path::{Path, PathBuf};

use calcblock_core::calculations::estimate::{EstimateInput, JointConfig, WallSpec};
use calcblock_core::materials::{BinderType, CementSandMix, PieceSpec, PieceType, PremixedMortar, DEFAULT_UNIT_COST};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a job file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read the job file.
    #[error("Failed to read job file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    /// Job file content does not parse.
    #[error("Invalid {format} in {path}: {reason}")]
    ParseError {
        path: PathBuf,
        format: &'static str,
        reason: String,
    },

    /// Job file extension is neither .toml nor .json.
    #[error("Unsupported job file format: {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    /// Wall given both as an area and as length x height.
    #[error("Wall in {source_name} is given both as area and as length x height")]
    ConflictingWall { source_name: String },
}

// ============================================================================
// Choices shared by the job file and the CLI
// ============================================================================

/// Piece selection as typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PieceChoice {
    Block12,
    #[default]
    Block15,
    Block20,
    Brick,
    Custom,
}

impl PieceChoice {
    pub const ALL: [PieceChoice; 5] = [
        PieceChoice::Block12,
        PieceChoice::Block15,
        PieceChoice::Block20,
        PieceChoice::Brick,
        PieceChoice::Custom,
    ];

    pub fn piece_type(self) -> PieceType {
        match self {
            PieceChoice::Block12 => PieceType::Block12,
            PieceChoice::Block15 => PieceType::Block15,
            PieceChoice::Block20 => PieceType::Block20,
            PieceChoice::Brick => PieceType::RedBrick,
            PieceChoice::Custom => PieceType::Custom,
        }
    }
}

/// Binder selection as typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BinderChoice {
    #[default]
    Mortar,
    CementSand,
    Both,
}

impl BinderChoice {
    pub const ALL: [BinderChoice; 3] = [BinderChoice::Mortar, BinderChoice::CementSand, BinderChoice::Both];

    pub fn binder_type(self) -> BinderType {
        match self {
            BinderChoice::Mortar => BinderType::PremixedMortar,
            BinderChoice::CementSand => BinderType::CementSand,
            BinderChoice::Both => BinderType::Both,
        }
    }
}

// ============================================================================
// Job file
// ============================================================================

/// Job file structure. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct JobFile {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub piece: Option<PieceSection>,
    #[serde(default)]
    pub joint: Option<JointSection>,
    #[serde(default)]
    pub wall: Option<WallSection>,
    #[serde(default)]
    pub binder: Option<BinderSection>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PieceSection {
    #[serde(default, rename = "type")]
    pub kind: Option<PieceChoice>,
    #[serde(default)]
    pub length_cm: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub thickness_cm: Option<f64>,
    #[serde(default)]
    pub unit_weight_kg: Option<f64>,
    #[serde(default)]
    pub unit_cost: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct JointSection {
    #[serde(default)]
    pub joint_cm: Option<f64>,
    #[serde(default)]
    pub waste_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WallSection {
    #[serde(default)]
    pub area_m2: Option<f64>,
    #[serde(default)]
    pub length_m: Option<f64>,
    #[serde(default)]
    pub height_m: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BinderSection {
    #[serde(default, rename = "type")]
    pub kind: Option<BinderChoice>,
    #[serde(default)]
    pub mortar_bag_cost: Option<f64>,
    #[serde(default)]
    pub mortar_yield_m3: Option<f64>,
    #[serde(default)]
    pub cement_bag_cost: Option<f64>,
    #[serde(default)]
    pub sand_cost: Option<f64>,
    #[serde(default)]
    pub cement_parts: Option<f64>,
    #[serde(default)]
    pub sand_parts: Option<f64>,
}

/// Load a job file. The format follows the extension (.toml or .json).
///
/// # Errors
///
/// Returns error if the file cannot be read, has an unknown extension, or
/// does not parse.
pub fn load_job_file(path: &Path) -> Result<JobFile, ConfigError> {
    let format = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => "TOML",
        Some(ext) if ext.eq_ignore_ascii_case("json") => "JSON",
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    parse_job(&contents, format).map_err(|reason| ConfigError::ParseError {
        path: path.to_path_buf(),
        format,
        reason,
    })
}

fn parse_job(contents: &str, format: &str) -> Result<JobFile, String> {
    if format == "TOML" {
        toml::from_str(contents).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(contents).map_err(|e| e.to_string())
    }
}

// ============================================================================
// Overrides and resolved values
// ============================================================================

/// One layer of user-supplied values. `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormOverrides {
    pub label: Option<String>,
    pub piece: Option<PieceChoice>,
    pub length_cm: Option<f64>,
    pub height_cm: Option<f64>,
    pub thickness_cm: Option<f64>,
    pub unit_weight_kg: Option<f64>,
    pub unit_cost: Option<f64>,
    pub joint_cm: Option<f64>,
    pub waste_pct: Option<f64>,
    pub area_m2: Option<f64>,
    pub wall_length_m: Option<f64>,
    pub wall_height_m: Option<f64>,
    pub binder: Option<BinderChoice>,
    pub mortar_bag_cost: Option<f64>,
    pub mortar_yield_m3: Option<f64>,
    pub cement_bag_cost: Option<f64>,
    pub sand_cost: Option<f64>,
    pub cement_parts: Option<f64>,
    pub sand_parts: Option<f64>,
}

impl FormOverrides {
    /// Reject a layer that gives the wall both ways.
    pub fn check_wall(&self, source_name: &str) -> Result<(), ConfigError> {
        if self.area_m2.is_some() && (self.wall_length_m.is_some() || self.wall_height_m.is_some()) {
            return Err(ConfigError::ConflictingWall {
                source_name: source_name.to_string(),
            });
        }
        Ok(())
    }
}

impl From<JobFile> for FormOverrides {
    fn from(job: JobFile) -> Self {
        let piece = job.piece.unwrap_or_default();
        let joint = job.joint.unwrap_or_default();
        let wall = job.wall.unwrap_or_default();
        let binder = job.binder.unwrap_or_default();

        FormOverrides {
            label: job.label,
            piece: piece.kind,
            length_cm: piece.length_cm,
            height_cm: piece.height_cm,
            thickness_cm: piece.thickness_cm,
            unit_weight_kg: piece.unit_weight_kg,
            unit_cost: piece.unit_cost,
            joint_cm: joint.joint_cm,
            waste_pct: joint.waste_pct,
            area_m2: wall.area_m2,
            wall_length_m: wall.length_m,
            wall_height_m: wall.height_m,
            binder: binder.kind,
            mortar_bag_cost: binder.mortar_bag_cost,
            mortar_yield_m3: binder.mortar_yield_m3,
            cement_bag_cost: binder.cement_bag_cost,
            sand_cost: binder.sand_cost,
            cement_parts: binder.cement_parts,
            sand_parts: binder.sand_parts,
        }
    }
}

/// How the wall was entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WallEntry {
    Area { area_m2: f64 },
    Dimensions { length_m: f64, height_m: f64 },
}

/// Fully resolved form: every field the estimate needs.
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    pub label: String,
    pub piece: PieceChoice,
    pub length_cm: f64,
    pub height_cm: f64,
    pub thickness_cm: f64,
    pub unit_weight_kg: f64,
    pub unit_cost: f64,
    pub joint_cm: f64,
    pub waste_pct: f64,
    pub wall: WallEntry,
    pub binder: BinderChoice,
    pub mortar_bag_cost: f64,
    pub mortar_yield_m3: f64,
    pub cement_bag_cost: f64,
    pub sand_cost: f64,
    pub cement_parts: f64,
    pub sand_parts: f64,
}

/// Waste as shown on the form (percent)
pub const DEFAULT_WASTE_PCT: f64 = 7.0;

/// Default wall dimensions when switching from area to length x height
pub const DEFAULT_WALL_LENGTH_M: f64 = 5.0;
pub const DEFAULT_WALL_HEIGHT_M: f64 = 2.5;

impl Default for FormValues {
    fn default() -> Self {
        let piece = PieceSpec::default();
        let mortar = PremixedMortar::default();
        let mix = CementSandMix::default();
        let joint = JointConfig::default();

        Self {
            label: String::new(),
            piece: PieceChoice::default(),
            length_cm: piece.length_cm,
            height_cm: piece.height_cm,
            thickness_cm: piece.thickness_cm,
            unit_weight_kg: piece.unit_weight_kg,
            unit_cost: DEFAULT_UNIT_COST,
            joint_cm: joint.joint_width_cm,
            waste_pct: DEFAULT_WASTE_PCT,
            wall: WallEntry::Area {
                area_m2: WallSpec::default().area_m2(),
            },
            binder: BinderChoice::default(),
            mortar_bag_cost: mortar.bag_cost,
            mortar_yield_m3: mortar.bag_yield_m3,
            cement_bag_cost: mix.cement_bag_cost,
            sand_cost: mix.sand_cost_per_m3,
            cement_parts: mix.cement_parts,
            sand_parts: mix.sand_parts,
        }
    }
}

impl FormValues {
    /// Select a piece. Catalog pieces reset dimensions and weight; custom
    /// keeps the current values.
    pub fn select_piece(&mut self, choice: PieceChoice) {
        self.piece = choice;
        if let Some(spec) = PieceSpec::from_type(choice.piece_type()) {
            self.length_cm = spec.length_cm;
            self.height_cm = spec.height_cm;
            self.thickness_cm = spec.thickness_cm;
            self.unit_weight_kg = spec.unit_weight_kg;
        }
    }

    /// Apply one override layer.
    pub fn apply(mut self, overrides: FormOverrides) -> Self {
        if let Some(label) = overrides.label {
            self.label = label;
        }
        if let Some(choice) = overrides.piece {
            self.select_piece(choice);
        }

        let set = |target: &mut f64, value: Option<f64>| {
            if let Some(v) = value {
                *target = v;
            }
        };
        set(&mut self.length_cm, overrides.length_cm);
        set(&mut self.height_cm, overrides.height_cm);
        set(&mut self.thickness_cm, overrides.thickness_cm);
        set(&mut self.unit_weight_kg, overrides.unit_weight_kg);
        set(&mut self.unit_cost, overrides.unit_cost);
        set(&mut self.joint_cm, overrides.joint_cm);
        set(&mut self.waste_pct, overrides.waste_pct);
        set(&mut self.mortar_bag_cost, overrides.mortar_bag_cost);
        set(&mut self.mortar_yield_m3, overrides.mortar_yield_m3);
        set(&mut self.cement_bag_cost, overrides.cement_bag_cost);
        set(&mut self.sand_cost, overrides.sand_cost);
        set(&mut self.cement_parts, overrides.cement_parts);
        set(&mut self.sand_parts, overrides.sand_parts);

        if let Some(area_m2) = overrides.area_m2 {
            self.wall = WallEntry::Area { area_m2 };
        } else if overrides.wall_length_m.is_some() || overrides.wall_height_m.is_some() {
            let (length_m, height_m) = match self.wall {
                WallEntry::Dimensions { length_m, height_m } => (length_m, height_m),
                WallEntry::Area { .. } => (DEFAULT_WALL_LENGTH_M, DEFAULT_WALL_HEIGHT_M),
            };
            self.wall = WallEntry::Dimensions {
                length_m: overrides.wall_length_m.unwrap_or(length_m),
                height_m: overrides.wall_height_m.unwrap_or(height_m),
            };
        }

        if let Some(choice) = overrides.binder {
            self.binder = choice;
        }
        self
    }

    /// Build the estimator input. Range checks happen in the estimator.
    pub fn to_input(&self) -> EstimateInput {
        let piece = PieceSpec {
            piece_type: self.piece.piece_type(),
            length_cm: self.length_cm,
            height_cm: self.height_cm,
            thickness_cm: self.thickness_cm,
            unit_weight_kg: self.unit_weight_kg,
            unit_cost: self.unit_cost,
        };
        let wall = match self.wall {
            WallEntry::Area { area_m2 } => WallSpec::area(area_m2),
            WallEntry::Dimensions { length_m, height_m } => WallSpec::dimensions(length_m, height_m),
        };
        let mortar = PremixedMortar {
            bag_yield_m3: self.mortar_yield_m3,
            bag_cost: self.mortar_bag_cost,
        };
        let mix = CementSandMix {
            cement_parts: self.cement_parts,
            sand_parts: self.sand_parts,
            cement_bag_cost: self.cement_bag_cost,
            sand_cost_per_m3: self.sand_cost,
        };

        EstimateInput {
            label: self.label.clone(),
            piece,
            joint: JointConfig::with_waste_percent(self.joint_cm, self.waste_pct),
            wall,
            binder: self.binder.binder_type().config(mortar, mix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calcblock_core::materials::BinderConfig;

    #[test]
    fn defaults_match_form() {
        let values = FormValues::default();
        assert_eq!(values.piece, PieceChoice::Block15);
        assert_eq!(values.joint_cm, 1.0);
        assert_eq!(values.waste_pct, 7.0);
        assert_eq!(values.wall, WallEntry::Area { area_m2: 10.0 });
        assert_eq!(values.unit_cost, 18.0);
        assert_eq!(values.mortar_yield_m3, 0.013);
        assert_eq!(values.sand_cost, 450.0);
    }

    #[test]
    fn default_input_is_reference_wall() {
        let input = FormValues::default().to_input();
        assert_eq!(input.piece, PieceSpec::default());
        assert_eq!(input.joint, JointConfig::default());
        assert_eq!(input.wall, WallSpec::area(10.0));
        assert_eq!(input.binder, BinderConfig::PremixedMortar(PremixedMortar::default()));
    }

    #[test]
    fn parses_toml_job() {
        let toml = r#"
label = "Muro norte"

[piece]
type = "block20"
unit_cost = 21.5

[wall]
length_m = 12.0
height_m = 2.4

[binder]
type = "cement-sand"
sand_parts = 5
"#;
        let job = parse_job(toml, "TOML").unwrap();
        let values = FormValues::default().apply(job.into());

        assert_eq!(values.label, "Muro norte");
        assert_eq!(values.piece, PieceChoice::Block20);
        assert_eq!(values.thickness_cm, 20.0);
        assert_eq!(values.unit_weight_kg, 15.0);
        assert_eq!(values.unit_cost, 21.5);
        assert_eq!(values.wall, WallEntry::Dimensions { length_m: 12.0, height_m: 2.4 });
        assert_eq!(values.binder, BinderChoice::CementSand);
        assert_eq!(values.sand_parts, 5.0);
        assert_eq!(values.cement_parts, 1.0);
    }

    #[test]
    fn parses_json_job() {
        let json = r#"{ "piece": { "type": "brick" }, "joint": { "waste_pct": 10 } }"#;
        let job = parse_job(json, "JSON").unwrap();
        let values = FormValues::default().apply(job.into());
        assert_eq!(values.piece, PieceChoice::Brick);
        assert_eq!(values.length_cm, 23.0);
        assert_eq!(values.waste_pct, 10.0);
    }

    #[test]
    fn unknown_fields_rejected() {
        let toml = "[piece]\ncolour = \"red\"\n";
        assert!(parse_job(toml, "TOML").is_err());
    }

    #[test]
    fn later_layer_wins() {
        let job = FormOverrides {
            piece: Some(PieceChoice::Brick),
            unit_cost: Some(4.0),
            area_m2: Some(20.0),
            ..FormOverrides::default()
        };
        let cli = FormOverrides {
            unit_cost: Some(5.0),
            wall_height_m: Some(3.0),
            ..FormOverrides::default()
        };
        let values = FormValues::default().apply(job).apply(cli);

        assert_eq!(values.piece, PieceChoice::Brick);
        assert_eq!(values.unit_cost, 5.0);
        assert_eq!(
            values.wall,
            WallEntry::Dimensions {
                length_m: DEFAULT_WALL_LENGTH_M,
                height_m: 3.0
            }
        );
    }

    #[test]
    fn custom_piece_keeps_dimensions() {
        let overrides = FormOverrides {
            piece: Some(PieceChoice::Custom),
            length_cm: Some(30.0),
            ..FormOverrides::default()
        };
        let values = FormValues::default().apply(overrides);
        assert_eq!(values.length_cm, 30.0);
        assert_eq!(values.height_cm, 20.0);
        assert_eq!(values.to_input().piece.piece_type, PieceType::Custom);
    }

    #[test]
    fn conflicting_wall_rejected() {
        let overrides = FormOverrides {
            area_m2: Some(10.0),
            wall_length_m: Some(4.0),
            ..FormOverrides::default()
        };
        let err = overrides.check_wall("job.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingWall { .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = load_job_file(Path::new("/nonexistent/calcblock/job.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn unknown_extension_rejected() {
        let err = load_job_file(Path::new("job.yaml")).unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedFormat(PathBuf::from("job.yaml")));
    }

    #[test]
    fn loads_job_from_disk() {
        let path = std::env::temp_dir().join("calcblock_config_test_job.json");
        std::fs::write(&path, r#"{ "label": "Barda", "wall": { "area_m2": 32.5 } }"#).unwrap();
        let job = load_job_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(job.label.as_deref(), Some("Barda"));
        assert_eq!(job.wall.and_then(|w| w.area_m2), Some(32.5));
    }
}
