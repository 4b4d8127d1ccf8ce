//! # Estimate Report
//!
//! Fixed-layout summary of one estimate, shared by the text display and the
//! PDF export. The report is plain data: ordered sections of labeled,
//! already-formatted values.
//!
//! ## Layout
//!
//! 1. Title and timestamp (`dd/mm/yyyy HH:MM`)
//! 2. Datos de entrada (inputs echo)
//! 3. Resultados (pieces and binder; the on-screen report omits unused
//!    binders, the exported document always lists them)
//! 4. Costo
//! 5. Peso
//! 6. Disclaimer footer

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::calculations::estimate::{EstimateInput, EstimationResult, WallSpec};
use crate::units::Kilograms;

/// Report title
pub const REPORT_TITLE: &str = "CALCULADORA DE MATERIALES – OBRA (MX)";

/// Footer printed at the end of every report
pub const REPORT_DISCLAIMER: &str = "Cálculo aproximado conforme a práctica común de obra en México.";

/// File name offered for the exported document
pub const REPORT_FILE_NAME: &str = "calculo_materiales_obra_MX.pdf";

/// Content type of the exported document
pub const REPORT_CONTENT_TYPE: &str = "application/pdf";

/// Timestamp format (day/month/year hour:minute)
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// One labeled value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportField {
    pub label: String,
    pub value: String,
}

impl ReportField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Titled group of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    pub fields: Vec<ReportField>,
}

impl ReportSection {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
        }
    }

    fn field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(ReportField::new(label, value));
        self
    }

    fn field_if(self, include: bool, label: impl Into<String>, value: impl Into<String>) -> Self {
        if include {
            self.field(label, value)
        } else {
            self
        }
    }
}

/// Complete report for one estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateReport {
    pub title: String,
    /// Wall label; empty when the user gave none
    pub label: String,
    /// Formatted timestamp
    pub generated_at: String,
    pub sections: Vec<ReportSection>,
    pub disclaimer: String,
}

impl EstimateReport {
    /// Find a section by title
    pub fn section(&self, title: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// Flat ordered list of (label, value) pairs across all sections.
    ///
    /// The timestamp comes first, as "Fecha".
    pub fn flat_fields(&self) -> Vec<(String, String)> {
        std::iter::once(("Fecha".to_string(), self.generated_at.clone()))
            .chain(
                self.sections
                    .iter()
                    .flat_map(|s| s.fields.iter().map(|f| (f.label.clone(), f.value.clone()))),
            )
            .collect()
    }

    /// Plain-text rendering for terminal display.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        if !self.label.is_empty() {
            out.push_str(&self.label);
            out.push('\n');
        }
        out.push_str(&format!("Fecha: {}\n", self.generated_at));

        for section in &self.sections {
            out.push('\n');
            out.push_str(&section.title);
            out.push('\n');
            for field in &section.fields {
                out.push_str(&format!("- {}: {}\n", field.label, field.value));
            }
        }

        out.push('\n');
        out.push_str(&self.disclaimer);
        out.push('\n');
        out
    }
}

/// Section titles
pub mod sections {
    pub const INPUTS: &str = "Datos de entrada";
    pub const RESULTS: &str = "Resultados";
    pub const COST: &str = "Costo";
    pub const WEIGHT: &str = "Peso";
}

/// Build the report for an estimate.
///
/// # Example
///
/// ```rust
/// use calcblock_core::calculations::estimate::{calculate, EstimateInput};
/// use calcblock_core::report::{build_report, sections};
///
/// let input = EstimateInput::default();
/// let result = calculate(&input).unwrap();
/// let generated_at = chrono::NaiveDate::from_ymd_opt(2025, 3, 14)
///     .unwrap()
///     .and_hms_opt(9, 30, 0)
///     .unwrap();
///
/// let report = build_report(&input, &result, generated_at);
/// assert_eq!(report.generated_at, "14/03/2025 09:30");
/// assert!(report.section(sections::COST).is_some());
/// ```
pub fn build_report(input: &EstimateInput, result: &EstimationResult, generated_at: NaiveDateTime) -> EstimateReport {
    assemble(input, result, generated_at, false)
}

/// Build the report for the exported document. Mortar, cement and sand lines
/// are listed in the results even when zero.
pub fn build_document_report(
    input: &EstimateInput,
    result: &EstimationResult,
    generated_at: NaiveDateTime,
) -> EstimateReport {
    assemble(input, result, generated_at, true)
}

fn assemble(
    input: &EstimateInput,
    result: &EstimationResult,
    generated_at: NaiveDateTime,
    keep_zero_binder: bool,
) -> EstimateReport {
    EstimateReport {
        title: REPORT_TITLE.to_string(),
        label: input.label.clone(),
        generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
        sections: vec![
            inputs_section(input),
            results_section(result, keep_zero_binder),
            cost_section(result),
            weight_section(result),
        ],
        disclaimer: REPORT_DISCLAIMER.to_string(),
    }
}

fn inputs_section(input: &EstimateInput) -> ReportSection {
    let piece = &input.piece;
    let mut section = ReportSection::new(sections::INPUTS)
        .field("Pieza", piece.piece_type.display_name())
        .field("Medidas de pieza", piece.dimensions_label())
        .field("Junta", format!("{} cm", format_number(input.joint.joint_width_cm)))
        .field("Desperdicio", format!("{} %", format_number(input.joint.waste_percent())));

    if let WallSpec::Dimensions { length_m, height_m } = input.wall {
        section = section.field("Largo x alto del muro", format!("{:.2} x {:.2} m", length_m, height_m));
    }

    section = section
        .field("Área del muro (m²)", format!("{:.2}", input.wall.area_m2()))
        .field("Material para pegar", input.binder.binder_type().display_name());

    if let Some(mix) = input.binder.cement_sand() {
        section = section.field("Proporción cemento : arena", mix.ratio_label());
    }

    section.field("Costo por pieza", format_currency(piece.unit_cost))
}

fn results_section(result: &EstimationResult, keep_zero_binder: bool) -> ReportSection {
    let binder = &result.binder;
    ReportSection::new(sections::RESULTS)
        .field("Piezas por m²", format!("{:.2}", result.pieces_per_m2))
        .field("Piezas", result.total_pieces.to_string())
        .field("Volumen de junta (m³)", format!("{:.2}", result.binder_volume_m3))
        .field_if(
            keep_zero_binder || binder.mortar_bags > 0,
            "Mortero (25 kg)",
            format!("{} bultos", binder.mortar_bags),
        )
        .field_if(
            keep_zero_binder || binder.cement_bags > 0,
            "Cemento (50 kg)",
            format!("{} bultos", binder.cement_bags),
        )
        .field_if(
            keep_zero_binder || binder.sand_m3 > 0.0,
            "Arena (m³)",
            format!("{:.2}", binder.sand_m3),
        )
}

fn cost_section(result: &EstimationResult) -> ReportSection {
    let cost = &result.cost;
    ReportSection::new(sections::COST)
        .field("Piezas", format_currency(cost.pieces))
        .field_if(cost.mortar > 0.0, "Mortero", format_currency(cost.mortar))
        .field_if(cost.cement > 0.0, "Cemento", format_currency(cost.cement))
        .field_if(cost.sand > 0.0, "Arena", format_currency(cost.sand))
        .field("Costo total", format_currency(cost.total))
}

fn weight_section(result: &EstimationResult) -> ReportSection {
    let weight = &result.weight;
    ReportSection::new(sections::WEIGHT)
        .field("Piezas", format!("{} kg", group_thousands(weight.pieces_kg)))
        .field_if(
            weight.mortar_kg + weight.cement_kg + weight.sand_kg > 0.0,
            "Material para pegar",
            format!(
                "{} kg",
                group_thousands(weight.mortar_kg + weight.cement_kg + weight.sand_kg)
            ),
        )
        .field("Peso total", format!("{} kg", group_thousands(weight.total_kg)))
        .field("Toneladas", format!("{:.2} t", Kilograms(weight.total_kg).tonnes()))
}

/// Format money as `$1,234` (no decimals, comma thousands separator).
pub fn format_currency(amount: f64) -> String {
    format!("${}", group_thousands(amount))
}

/// Round to an integer and insert comma thousands separators.
fn group_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, digit) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if value < 0.0 && rounded.chars().any(|c| c != '0') {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Shortest display for user-entered numbers: "1", "1.5", "0.75"
fn format_number(value: f64) -> String {
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::estimate::{calculate, JointConfig};
    use crate::materials::{BinderConfig, CementSandMix, PieceSpec, PieceType};
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 5).unwrap().and_hms_opt(14, 7, 0).unwrap()
    }

    fn report_for(binder: BinderConfig) -> EstimateReport {
        let input = EstimateInput {
            label: "Muro norte".to_string(),
            piece: PieceSpec::from_type(PieceType::Block15).unwrap(),
            joint: JointConfig::new(1.0, 0.07),
            wall: WallSpec::area(10.0),
            binder,
        };
        let result = calculate(&input).unwrap();
        build_report(&input, &result, timestamp())
    }

    fn value<'a>(section: &'a ReportSection, label: &str) -> Option<&'a str> {
        section.fields.iter().find(|f| f.label == label).map(|f| f.value.as_str())
    }

    #[test]
    fn test_layout_order() {
        let report = report_for(BinderConfig::default());
        assert_eq!(report.title, REPORT_TITLE);
        assert_eq!(report.generated_at, "05/01/2025 14:07");
        let titles: Vec<&str> = report.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec![sections::INPUTS, sections::RESULTS, sections::COST, sections::WEIGHT]);
        assert_eq!(report.disclaimer, REPORT_DISCLAIMER);
    }

    #[test]
    fn test_mortar_only_omits_cement_and_sand() {
        let report = report_for(BinderConfig::default());
        let results = report.section(sections::RESULTS).unwrap();
        assert_eq!(value(results, "Piezas"), Some("125"));
        assert!(value(results, "Mortero (25 kg)").is_some());
        assert!(value(results, "Cemento (50 kg)").is_none());
        assert!(value(results, "Arena (m³)").is_none());

        let cost = report.section(sections::COST).unwrap();
        assert_eq!(value(cost, "Piezas"), Some("$2,250"));
        assert!(value(cost, "Arena").is_none());
    }

    #[test]
    fn test_document_report_keeps_zero_binder_lines() {
        let input = EstimateInput {
            piece: PieceSpec::from_type(PieceType::Block15).unwrap(),
            wall: WallSpec::area(10.0),
            ..EstimateInput::default()
        };
        let result = calculate(&input).unwrap();
        let report = build_document_report(&input, &result, timestamp());
        let results = report.section(sections::RESULTS).unwrap();
        assert!(value(results, "Mortero (25 kg)").is_some());
        assert_eq!(value(results, "Cemento (50 kg)"), Some("0 bultos"));
        assert_eq!(value(results, "Arena (m³)"), Some("0.00"));

        // Costs still only list what is bought
        let cost = report.section(sections::COST).unwrap();
        assert!(value(cost, "Cemento").is_none());
    }

    #[test]
    fn test_cement_sand_echoes_ratio() {
        let report = report_for(BinderConfig::CementSand(CementSandMix::default()));
        let inputs = report.section(sections::INPUTS).unwrap();
        assert_eq!(value(inputs, "Proporción cemento : arena"), Some("1:4"));
        assert_eq!(value(inputs, "Junta"), Some("1 cm"));
        assert_eq!(value(inputs, "Desperdicio"), Some("7 %"));

        let results = report.section(sections::RESULTS).unwrap();
        assert!(value(results, "Mortero (25 kg)").is_none());
        assert!(value(results, "Arena (m³)").is_some());
    }

    #[test]
    fn test_flat_fields_start_with_date() {
        let report = report_for(BinderConfig::default());
        let flat = report.flat_fields();
        assert_eq!(flat[0], ("Fecha".to_string(), "05/01/2025 14:07".to_string()));
        assert!(flat.iter().any(|(k, v)| k == "Área del muro (m²)" && v == "10.00"));
        assert!(flat.iter().any(|(k, _)| k == "Costo total"));
    }

    #[test]
    fn test_to_text() {
        let text = report_for(BinderConfig::default()).to_text();
        assert!(text.starts_with(REPORT_TITLE));
        assert!(text.contains("Muro norte"));
        assert!(text.contains("- Piezas: 125"));
        assert!(text.trim_end().ends_with(REPORT_DISCLAIMER));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(1234.0), "$1,234");
        assert_eq!(format_currency(3330.0), "$3,330");
        assert_eq!(format_currency(1_234_567.8), "$1,234,568");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(7.000000000000001), "7");
    }
}
