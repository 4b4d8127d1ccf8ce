//! # Formula Registry
//!
//! Central registry of every formula the estimator applies. Each formula has
//! metadata (names, Typst and plain formulas, variables, source) so that the
//! PDF report can list exactly what was used, and so that a Markdown
//! reference can be generated for auditing.
//!
//! ## Usage
//!
//! ```rust
//! use calcblock_core::equations::registry::{Equation, EquationTracker};
//!
//! let mut tracker = EquationTracker::new();
//! tracker.record(Equation::PiecesPerSquareMeter, "Muro 1");
//!
//! let meta = Equation::PiecesPerSquareMeter.metadata();
//! assert!(meta.formula_plain.contains("10000"));
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::materials::BinderType;

// ============================================================================
// Formula Sources
// ============================================================================

/// Where a formula comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormulaSource {
    /// Common site practice in Mexico (modular pieces, bag yields, ratios)
    FieldPractice,
    /// Plain geometry (areas, volumes)
    Geometry,
    /// SI unit conversion (cm to m, cm² to m², cm³ to m³)
    UnitConversion,
    /// Bookkeeping (sums of quantities times prices or weights)
    Accounting,
}

impl FormulaSource {
    /// Format the source for display in reports
    pub fn citation(&self) -> &'static str {
        match self {
            FormulaSource::FieldPractice => "Práctica común de obra (MX)",
            FormulaSource::Geometry => "Geometría",
            FormulaSource::UnitConversion => "Conversión de unidades SI",
            FormulaSource::Accounting => "Suma de partidas",
        }
    }
}

// ============================================================================
// Formula Categories
// ============================================================================

/// Categories for grouping formulas in the report appendix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    /// Modular footprint and piece counts
    PieceCount,
    /// Wall, piece and binder volumes
    Volumes,
    /// Mortar, cement and sand quantities
    Binder,
    /// Money
    Cost,
    /// Weight
    Weight,
}

impl EquationCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::PieceCount => "Piezas",
            EquationCategory::Volumes => "Volúmenes",
            EquationCategory::Binder => "Material para pegar",
            EquationCategory::Cost => "Costo",
            EquationCategory::Weight => "Peso",
        }
    }

    /// Sort order for the appendix (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::PieceCount => 1,
            EquationCategory::Volumes => 2,
            EquationCategory::Binder => 3,
            EquationCategory::Cost => 4,
            EquationCategory::Weight => 5,
        }
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// Definition of a variable used in a formula.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Symbol (e.g., "L", "j", "V_m")
    pub symbol: &'static str,
    /// Description
    pub description: &'static str,
    /// Units (e.g., "cm", "m²")
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

// ============================================================================
// Formula Metadata
// ============================================================================

/// Complete metadata for a formula.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    /// Human-readable name
    pub name: &'static str,
    /// Brief description of what this formula calculates
    pub description: &'static str,
    /// The formula in Typst math notation for PDF rendering
    pub formula_typst: &'static str,
    /// The formula in plain text for markdown
    pub formula_plain: &'static str,
    /// Where the formula comes from
    pub source: FormulaSource,
    /// Variable definitions
    pub variables: Vec<Variable>,
    /// Assumptions or limitations
    pub assumptions: Vec<&'static str>,
    /// Category for grouping in appendix
    pub category: EquationCategory,
    /// Source module where the formula implementation lives
    pub source_module: &'static str,
    /// Function name implementing the formula
    pub source_function: &'static str,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// Every formula used by the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Equation {
    /// L_m = L + j, H_m = H + j
    ModularFootprint,
    /// n = 10000 / ((L + j)(H + j))
    PiecesPerSquareMeter,
    /// N = n A
    NetPieceCount,
    /// N_total = ceil(N (1 + w))
    PieceCountWithWaste,
    /// V_wall = A T / 100
    WallVolume,
    /// V_piece = L H T / 10^6
    PieceVolume,
    /// V_m = V_wall - N V_piece
    BinderVolume,
    /// bags = ceil(V / Y)
    MortarBags,
    /// V_c = V_m c/(c+s), V_s = V_m s/(c+s)
    RatioSplit,
    /// cement bags = ceil(V_c / 0.035)
    CementBags,
    /// V_m / 2 to each binder
    HalfSplit,
    /// Sum of quantity times price
    MaterialCost,
    /// Sum of quantity times weight
    MaterialWeight,
}

impl Equation {
    /// Get the full metadata for this formula
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::ModularFootprint => EquationMetadata {
                name: "Medida modular de la pieza",
                description: "Dimensiones de la pieza más una junta de mortero",
                formula_typst: r#"$L_m = L + j$, $H_m = H + j$"#,
                formula_plain: "L_m = L + j, H_m = H + j",
                source: FormulaSource::FieldPractice,
                variables: vec![
                    Variable::new("L", "Largo de la pieza", "cm"),
                    Variable::new("H", "Alto de la pieza", "cm"),
                    Variable::new("j", "Ancho de junta", "cm"),
                ],
                assumptions: vec!["Una junta horizontal y una vertical por pieza"],
                category: EquationCategory::PieceCount,
                source_module: "equations/masonry.rs",
                source_function: "modular_dimension",
            },

            Equation::PiecesPerSquareMeter => EquationMetadata {
                name: "Piezas por metro cuadrado",
                description: "Número de piezas que cubren un metro cuadrado de muro",
                formula_typst: r#"$n = 10000 / ((L + j)(H + j))$"#,
                formula_plain: "n = 10000 / ((L + j)(H + j))",
                source: FormulaSource::UnitConversion,
                variables: vec![
                    Variable::new("n", "Piezas por metro cuadrado", "pzas/m²"),
                    Variable::new("L", "Largo de la pieza", "cm"),
                    Variable::new("H", "Alto de la pieza", "cm"),
                    Variable::new("j", "Ancho de junta", "cm"),
                ],
                assumptions: vec!["10000 cm² por m²", "Muro de un solo espesor de pieza"],
                category: EquationCategory::PieceCount,
                source_module: "equations/masonry.rs",
                source_function: "pieces_per_square_meter",
            },

            Equation::NetPieceCount => EquationMetadata {
                name: "Piezas netas",
                description: "Piezas necesarias para el área del muro, sin desperdicio",
                formula_typst: r#"$N = n A$"#,
                formula_plain: "N = n * A",
                source: FormulaSource::Geometry,
                variables: vec![
                    Variable::new("N", "Piezas netas", "pzas"),
                    Variable::new("A", "Área del muro", "m²"),
                ],
                assumptions: vec!["Sin descontar vanos"],
                category: EquationCategory::PieceCount,
                source_module: "equations/masonry.rs",
                source_function: "net_piece_count",
            },

            Equation::PieceCountWithWaste => EquationMetadata {
                name: "Piezas a comprar",
                description: "Piezas netas más desperdicio, redondeadas hacia arriba",
                formula_typst: r#"$N_"total" = ceil(N (1 + w))$"#,
                formula_plain: "N_total = ceil(N * (1 + w))",
                source: FormulaSource::FieldPractice,
                variables: vec![
                    Variable::new("N_\"total\"", "Piezas a comprar", "pzas"),
                    Variable::new("w", "Desperdicio (fracción)", "-"),
                ],
                assumptions: vec!["No se compran piezas fraccionadas"],
                category: EquationCategory::PieceCount,
                source_module: "equations/masonry.rs",
                source_function: "piece_count_with_waste",
            },

            Equation::WallVolume => EquationMetadata {
                name: "Volumen del muro",
                description: "Volumen bruto del muro con el espesor de la pieza",
                formula_typst: r#"$V_"muro" = A T / 100$"#,
                formula_plain: "V_muro = A * T / 100",
                source: FormulaSource::Geometry,
                variables: vec![
                    Variable::new("V_\"muro\"", "Volumen del muro", "m³"),
                    Variable::new("T", "Espesor de la pieza", "cm"),
                ],
                assumptions: vec!["Espesor del muro igual al de la pieza"],
                category: EquationCategory::Volumes,
                source_module: "equations/masonry.rs",
                source_function: "wall_volume_m3",
            },

            Equation::PieceVolume => EquationMetadata {
                name: "Volumen de una pieza",
                description: "Volumen de una pieza considerada maciza",
                formula_typst: r#"$V_"pieza" = L H T / 10^6$"#,
                formula_plain: "V_pieza = L * H * T / 1000000",
                source: FormulaSource::UnitConversion,
                variables: vec![
                    Variable::new("V_\"pieza\"", "Volumen de una pieza", "m³"),
                    Variable::new("T", "Espesor de la pieza", "cm"),
                ],
                assumptions: vec!["1000000 cm³ por m³"],
                category: EquationCategory::Volumes,
                source_module: "equations/masonry.rs",
                source_function: "piece_volume_m3",
            },

            Equation::BinderVolume => EquationMetadata {
                name: "Volumen de material para pegar",
                description: "Volumen del muro que no ocupan las piezas netas",
                formula_typst: r#"$V_m = V_"muro" - N V_"pieza"$"#,
                formula_plain: "V_m = V_muro - N * V_pieza",
                source: FormulaSource::Geometry,
                variables: vec![
                    Variable::new("V_m", "Volumen de junta", "m³"),
                    Variable::new("N", "Piezas netas (sin desperdicio)", "pzas"),
                ],
                assumptions: vec![
                    "El desperdicio sólo afecta la compra de piezas",
                    "Valores negativos o residuales se toman como cero",
                ],
                category: EquationCategory::Volumes,
                source_module: "equations/masonry.rs",
                source_function: "binder_volume_m3",
            },

            Equation::MortarBags => EquationMetadata {
                name: "Bultos de mortero",
                description: "Bultos de mortero premezclado de 25 kg",
                formula_typst: r#"$B_m = ceil(V_m / Y)$"#,
                formula_plain: "B_m = ceil(V_m / Y)",
                source: FormulaSource::FieldPractice,
                variables: vec![
                    Variable::new("B_m", "Bultos de mortero", "bultos"),
                    Variable::new("Y", "Rendimiento por bulto", "m³/bulto"),
                ],
                assumptions: vec!["No se compran bultos fraccionados"],
                category: EquationCategory::Binder,
                source_module: "equations/masonry.rs",
                source_function: "bags_required",
            },

            Equation::RatioSplit => EquationMetadata {
                name: "Proporción cemento : arena",
                description: "Reparto del volumen de junta según partes de cemento y arena",
                formula_typst: r#"$V_c = V_m c / (c + s)$, $V_s = V_m s / (c + s)$"#,
                formula_plain: "V_c = V_m * c/(c + s), V_s = V_m * s/(c + s)",
                source: FormulaSource::FieldPractice,
                variables: vec![
                    Variable::new("c", "Partes de cemento", "-"),
                    Variable::new("s", "Partes de arena", "-"),
                    Variable::new("V_c", "Volumen de cemento", "m³"),
                    Variable::new("V_s", "Volumen de arena", "m³"),
                ],
                assumptions: vec!["La suma de partes debe ser positiva"],
                category: EquationCategory::Binder,
                source_module: "equations/masonry.rs",
                source_function: "ratio_split",
            },

            Equation::CementBags => EquationMetadata {
                name: "Bultos de cemento",
                description: "Bultos de cemento de 50 kg",
                formula_typst: r#"$B_c = ceil(V_c / 0.035)$"#,
                formula_plain: "B_c = ceil(V_c / 0.035)",
                source: FormulaSource::FieldPractice,
                variables: vec![
                    Variable::new("B_c", "Bultos de cemento", "bultos"),
                    Variable::new("V_c", "Volumen de cemento", "m³"),
                ],
                assumptions: vec!["Un bulto de 50 kg aporta 0.035 m³"],
                category: EquationCategory::Binder,
                source_module: "equations/masonry.rs",
                source_function: "bags_required",
            },

            Equation::HalfSplit => EquationMetadata {
                name: "Reparto mortero / cemento",
                description: "Mitad del volumen de junta a cada material cuando se usan ambos",
                formula_typst: r#"$V_"mortero" = V_"mezcla" = V_m / 2$"#,
                formula_plain: "V_mortero = V_mezcla = V_m / 2",
                source: FormulaSource::FieldPractice,
                variables: vec![Variable::new("V_m", "Volumen de junta", "m³")],
                assumptions: vec!["Reparto 50/50 fijo"],
                category: EquationCategory::Binder,
                source_module: "equations/masonry.rs",
                source_function: "half_split",
            },

            Equation::MaterialCost => EquationMetadata {
                name: "Costo total",
                description: "Suma de piezas, bultos y arena por su precio unitario",
                formula_typst: r#"$C = N_"total" p + B_m p_m + B_c p_c + V_s p_s$"#,
                formula_plain: "C = N_total * p + B_m * p_m + B_c * p_c + V_s * p_s",
                source: FormulaSource::Accounting,
                variables: vec![
                    Variable::new("p", "Precio por pieza", "$"),
                    Variable::new("p_m", "Precio por bulto de mortero", "$"),
                    Variable::new("p_c", "Precio por bulto de cemento", "$"),
                    Variable::new("p_s", "Precio de arena", "$/m³"),
                ],
                assumptions: vec!["Materiales no usados aportan cero"],
                category: EquationCategory::Cost,
                source_module: "calculations/estimate.rs",
                source_function: "cost_breakdown",
            },

            Equation::MaterialWeight => EquationMetadata {
                name: "Peso total",
                description: "Peso de piezas, bultos y arena",
                formula_typst: r#"$P = N_"total" m + 25 B_m + 50 B_c + 1600 V_s$"#,
                formula_plain: "P = N_total * m + 25 * B_m + 50 * B_c + 1600 * V_s",
                source: FormulaSource::Accounting,
                variables: vec![
                    Variable::new("m", "Peso por pieza", "kg"),
                    Variable::new("P", "Peso total", "kg"),
                ],
                assumptions: vec!["Arena a 1600 kg/m³"],
                category: EquationCategory::Weight,
                source_module: "calculations/estimate.rs",
                source_function: "weight_breakdown",
            },
        }
    }

    /// Get all formulas in a specific category
    pub fn in_category(category: EquationCategory) -> Vec<Equation> {
        ALL_EQUATIONS
            .iter()
            .copied()
            .filter(|eq| eq.metadata().category == category)
            .collect()
    }

    /// Get all categories that have at least one formula, sorted
    pub fn all_categories() -> Vec<EquationCategory> {
        let mut categories: Vec<EquationCategory> = ALL_EQUATIONS
            .iter()
            .map(|eq| eq.metadata().category)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        categories.sort_by_key(|c| c.sort_order());
        categories
    }
}

/// All registered formulas
pub const ALL_EQUATIONS: &[Equation] = &[
    Equation::ModularFootprint,
    Equation::PiecesPerSquareMeter,
    Equation::NetPieceCount,
    Equation::PieceCountWithWaste,
    Equation::WallVolume,
    Equation::PieceVolume,
    Equation::BinderVolume,
    Equation::MortarBags,
    Equation::RatioSplit,
    Equation::CementBags,
    Equation::HalfSplit,
    Equation::MaterialCost,
    Equation::MaterialWeight,
];

/// Formulas applied by an estimate with the given binder selection.
pub fn equations_for_binder(binder: BinderType) -> Vec<Equation> {
    let mut equations = vec![
        Equation::ModularFootprint,
        Equation::PiecesPerSquareMeter,
        Equation::NetPieceCount,
        Equation::PieceCountWithWaste,
        Equation::WallVolume,
        Equation::PieceVolume,
        Equation::BinderVolume,
    ];
    match binder {
        BinderType::PremixedMortar => equations.push(Equation::MortarBags),
        BinderType::CementSand => {
            equations.extend([Equation::RatioSplit, Equation::CementBags]);
        }
        BinderType::Both => {
            equations.extend([
                Equation::HalfSplit,
                Equation::MortarBags,
                Equation::RatioSplit,
                Equation::CementBags,
            ]);
        }
    }
    equations.extend([Equation::MaterialCost, Equation::MaterialWeight]);
    equations
}

// ============================================================================
// Formula Usage Tracking
// ============================================================================

/// Record of a formula being used in a calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquationUsage {
    /// The formula that was used
    pub equation: Equation,
    /// Context describing where it was used (usually the wall label)
    pub context: String,
}

impl EquationUsage {
    pub fn new(equation: Equation, context: impl Into<String>) -> Self {
        Self {
            equation,
            context: context.into(),
        }
    }
}

/// Collector for formula usage during a calculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquationTracker {
    usages: Vec<EquationUsage>,
}

impl EquationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a formula was used
    pub fn record(&mut self, equation: Equation, context: impl Into<String>) {
        self.usages.push(EquationUsage::new(equation, context));
    }

    /// Get all recorded usages
    pub fn usages(&self) -> &[EquationUsage] {
        &self.usages
    }

    /// Get unique formulas used, in first-use order
    pub fn unique_equations(&self) -> Vec<Equation> {
        let mut seen = HashSet::new();
        self.usages
            .iter()
            .filter(|u| seen.insert(u.equation))
            .map(|u| u.equation)
            .collect()
    }

    /// Group usages by formula
    pub fn by_equation(&self) -> HashMap<Equation, Vec<&EquationUsage>> {
        let mut map: HashMap<Equation, Vec<&EquationUsage>> = HashMap::new();
        for usage in &self.usages {
            map.entry(usage.equation).or_default().push(usage);
        }
        map
    }

    /// Group unique formulas by category, categories sorted
    pub fn by_category(&self) -> Vec<(EquationCategory, Vec<Equation>)> {
        let mut by_cat: HashMap<EquationCategory, Vec<Equation>> = HashMap::new();
        for eq in self.unique_equations() {
            by_cat.entry(eq.metadata().category).or_default().push(eq);
        }

        let mut result: Vec<_> = by_cat.into_iter().collect();
        result.sort_by_key(|(cat, _)| cat.sort_order());
        result
    }
}

// ============================================================================
// Typst Appendix Generation
// ============================================================================

impl EquationTracker {
    /// Generate Typst markup for the "Fórmulas utilizadas" appendix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use calcblock_core::equations::registry::{Equation, EquationTracker};
    ///
    /// let mut tracker = EquationTracker::new();
    /// tracker.record(Equation::BinderVolume, "Muro 1");
    ///
    /// let typst = tracker.generate_appendix_typst();
    /// assert!(typst.contains("Volumen de material para pegar"));
    /// ```
    pub fn generate_appendix_typst(&self) -> String {
        let mut output = String::new();

        output.push_str(
            r##"
#pagebreak()

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 16pt, weight: "bold")[Anexo: Fórmulas utilizadas]
  ]
]

#v(12pt)
"##,
        );

        let by_category = self.by_category();

        if by_category.is_empty() {
            output.push_str("#text(style: \"italic\")[No se registraron fórmulas.]\n");
            return output;
        }

        let usage_by_eq = self.by_equation();

        for (category, equations) in by_category {
            output.push_str(&format!("\n== {}\n\n", category.display_name()));

            for equation in equations {
                let meta = equation.metadata();

                output.push_str(&format!("=== {}\n\n", meta.name));
                output.push_str(&format!("#text(size: 10pt)[{}]\n\n", meta.description));
                output.push_str(&format!("*Fórmula:* {}\n\n", meta.formula_typst));
                output.push_str(&format!("*Fuente:* {}\n\n", meta.source.citation()));

                if !meta.variables.is_empty() {
                    output.push_str("#table(\n");
                    output.push_str("  columns: (auto, 1fr, auto),\n");
                    output.push_str("  inset: 6pt,\n");
                    output.push_str("  stroke: 0.5pt,\n");
                    output.push_str("  table.header([*Símbolo*], [*Descripción*], [*Unidad*]),\n");
                    for var in &meta.variables {
                        output.push_str(&format!(
                            "  [${}$], [{}], [{}],\n",
                            escape_typst_math(var.symbol),
                            var.description,
                            escape_typst_text(var.units)
                        ));
                    }
                    output.push_str(")\n\n");
                }

                if let Some(usages) = usage_by_eq.get(&equation) {
                    let mut contexts: Vec<&str> = usages.iter().map(|u| u.context.as_str()).collect();
                    contexts.sort();
                    contexts.dedup();
                    let contexts: Vec<String> = contexts.into_iter().map(escape_typst_text).collect();
                    output.push_str(&format!("*Aplicada a:* {}\n\n", contexts.join(", ")));
                }

                if !meta.assumptions.is_empty() {
                    output.push_str("*Supuestos:*\n");
                    for assumption in &meta.assumptions {
                        output.push_str(&format!("- {}\n", assumption));
                    }
                    output.push('\n');
                }

                output.push_str("#line(length: 100%, stroke: 0.25pt + gray)\n\n");
            }
        }

        output
    }
}

/// Escape special characters for Typst math mode
fn escape_typst_math(s: &str) -> String {
    s.replace('\\', "\\\\")
}

/// Escape markup characters in plain Typst text
fn escape_typst_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '*' | '_' | '#' | '$' | '@' | '<' | '>' | '\\' | '`' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ============================================================================
// Markdown Generation for FORMULAS.md
// ============================================================================

/// Generate a complete Markdown formula reference.
///
/// # Example
///
/// ```rust
/// use calcblock_core::equations::registry::generate_formulas_markdown;
///
/// let markdown = generate_formulas_markdown();
/// assert!(markdown.contains("CalcBlock"));
/// assert!(markdown.contains("## Piezas"));
/// ```
pub fn generate_formulas_markdown() -> String {
    let mut output = String::with_capacity(8_000);

    output.push_str(
        r#"# CalcBlock - Referencia de fórmulas

> **Generado desde el código fuente. No editar a mano.**
>
> Regenerar con: `cargo run --bin gen-formulas`

Fórmulas usadas para estimar piezas, material para pegar, costo y peso de
un muro. Las cantidades que se compran completas (piezas, bultos) se
redondean hacia arriba una sola vez; los volúmenes no se redondean.

---

"#,
    );

    let categories = Equation::all_categories();

    for category in &categories {
        let equations = Equation::in_category(*category);
        if equations.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for equation in equations {
            let meta = equation.metadata();

            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Fórmula:** `{}`\n\n", meta.formula_plain));

            if !meta.variables.is_empty() {
                output.push_str("| Símbolo | Descripción | Unidad |\n");
                output.push_str("|---------|-------------|--------|\n");
                for var in &meta.variables {
                    output.push_str(&format!("| {} | {} | {} |\n", var.symbol, var.description, var.units));
                }
                output.push('\n');
            }

            output.push_str(&format!("**Fuente:** {}\n\n", meta.source.citation()));
            output.push_str(&format!(
                "**Código:** [`{}`]({})\n\n",
                meta.source_function, meta.source_module
            ));

            if !meta.assumptions.is_empty() {
                output.push_str("**Supuestos:**\n");
                for assumption in &meta.assumptions {
                    output.push_str(&format!("- {}\n", assumption));
                }
                output.push('\n');
            }

            output.push_str("---\n\n");
        }
    }

    output.push_str(&format!(
        "## Estadísticas\n\n- **Fórmulas:** {}\n- **Categorías:** {}\n",
        ALL_EQUATIONS.len(),
        categories.len()
    ));

    output
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_equations_have_metadata() {
        assert_eq!(ALL_EQUATIONS.len(), 13);

        for eq in ALL_EQUATIONS {
            let meta = eq.metadata();
            assert!(!meta.name.is_empty(), "Equation {:?} has no name", eq);
            assert!(!meta.formula_typst.is_empty(), "Equation {:?} has no formula", eq);
            assert!(!meta.formula_plain.is_empty(), "Equation {:?} has no plain formula", eq);
            assert!(!meta.variables.is_empty(), "Equation {:?} has no variables", eq);
            assert!(!meta.source_function.is_empty(), "Equation {:?} has no source", eq);
        }

        assert!(Equation::CementBags.metadata().formula_plain.contains("0.035"));
        assert!(Equation::PiecesPerSquareMeter.metadata().formula_plain.contains("10000"));
    }

    #[test]
    fn test_categories_sorted() {
        let cats = Equation::all_categories();
        assert_eq!(cats.len(), 5);
        let orders: Vec<u8> = cats.iter().map(|c| c.sort_order()).collect();
        let mut sorted = orders.clone();
        sorted.sort();
        assert_eq!(orders, sorted);
    }

    #[test]
    fn test_equations_for_binder() {
        let mortar = equations_for_binder(BinderType::PremixedMortar);
        assert!(mortar.contains(&Equation::MortarBags));
        assert!(!mortar.contains(&Equation::CementBags));
        assert!(!mortar.contains(&Equation::HalfSplit));

        let cement = equations_for_binder(BinderType::CementSand);
        assert!(cement.contains(&Equation::RatioSplit));
        assert!(!cement.contains(&Equation::MortarBags));

        let both = equations_for_binder(BinderType::Both);
        assert!(both.contains(&Equation::HalfSplit));
        assert!(both.contains(&Equation::MortarBags));
        assert!(both.contains(&Equation::CementBags));
    }

    #[test]
    fn test_equation_tracker() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::PiecesPerSquareMeter, "Muro 1");
        tracker.record(Equation::BinderVolume, "Muro 1");
        tracker.record(Equation::PiecesPerSquareMeter, "Muro 2");

        assert_eq!(tracker.usages().len(), 3);
        assert_eq!(tracker.unique_equations().len(), 2);

        let by_cat = tracker.by_category();
        assert_eq!(by_cat.len(), 2);
        assert_eq!(by_cat[0].0, EquationCategory::PieceCount);
        assert_eq!(by_cat[1].0, EquationCategory::Volumes);
    }

    #[test]
    fn test_generate_appendix_typst() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::PieceCountWithWaste, "Muro_norte");
        tracker.record(Equation::CementBags, "Muro_norte");

        let typst = tracker.generate_appendix_typst();
        assert!(typst.contains("Anexo: Fórmulas utilizadas"));
        assert!(typst.contains("Piezas a comprar"));
        assert!(typst.contains("Bultos de cemento"));
        assert!(typst.contains("Práctica común de obra"));
        assert!(typst.contains("Muro\\_norte"));
    }

    #[test]
    fn test_generate_appendix_empty_tracker() {
        let typst = EquationTracker::new().generate_appendix_typst();
        assert!(typst.contains("No se registraron fórmulas"));
    }

    #[test]
    fn test_generate_formulas_markdown() {
        let markdown = generate_formulas_markdown();
        assert!(markdown.contains("# CalcBlock - Referencia de fórmulas"));
        assert!(markdown.contains("## Piezas"));
        assert!(markdown.contains("## Material para pegar"));
        assert!(markdown.contains("`n = 10000 / ((L + j)(H + j))`"));
        assert!(markdown.contains("equations/masonry.rs"));
        assert!(markdown.contains("**Fórmulas:** 13"));
        assert!(markdown.contains("**Categorías:** 5"));
    }

    #[test]
    fn test_escape_typst_text() {
        assert_eq!(escape_typst_text("a_b #1"), "a\\_b \\#1");
    }
}
