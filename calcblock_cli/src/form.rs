//! Interactive form.
//!
//! Prompts for each field in the order a site estimate is usually taken,
//! showing the current value as the default. Empty input keeps the default.

use std::io::{self, BufRead, Write};

use calcblock_core::materials::BinderType;

use crate::config::{
    BinderChoice, FormValues, PieceChoice, WallEntry, DEFAULT_WALL_HEIGHT_M, DEFAULT_WALL_LENGTH_M,
};

/// Line-oriented prompter over any reader/writer pair.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Read one trimmed line. `None` on end of input.
    fn read_answer(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;

        let mut input = String::new();
        if self.reader.read_line(&mut input)? == 0 {
            return Ok(None);
        }
        Ok(Some(input.trim().to_string()))
    }

    /// Prompt for a number. Empty input or end of input keeps the default.
    pub fn number(&mut self, label: &str, default: f64) -> io::Result<f64> {
        loop {
            let Some(answer) = self.read_answer(&format!("{} [{}]: ", label, default))? else {
                return Ok(default);
            };
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.replace(',', ".").parse::<f64>() {
                Ok(value) if value.is_finite() => return Ok(value),
                _ => writeln!(self.writer, "  Valor no válido: {}", answer)?,
            }
        }
    }

    /// Prompt for text. Empty input keeps the default.
    pub fn text(&mut self, label: &str, default: &str) -> io::Result<String> {
        let answer = self.read_answer(&format!("{} [{}]: ", label, default))?;
        Ok(match answer {
            Some(a) if !a.is_empty() => a,
            _ => default.to_string(),
        })
    }

    /// Prompt for one of a numbered list of options. Returns the index.
    pub fn choice(&mut self, label: &str, options: &[&str], default: usize) -> io::Result<usize> {
        writeln!(self.writer, "{}", label)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.writer, "  {}) {}", i + 1, option)?;
        }
        loop {
            let Some(answer) = self.read_answer(&format!("Opción [{}]: ", default + 1))? else {
                return Ok(default);
            };
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => writeln!(self.writer, "  Opción no válida: {}", answer)?,
            }
        }
    }

    fn section(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "== {} ==", title)
    }
}

/// Walk the user through every field, starting from `values`.
pub fn collect<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>, mut values: FormValues) -> io::Result<FormValues> {
    values.label = prompter.text("Nombre del muro", &values.label)?;

    prompter.section("Tipo de pieza")?;
    let pieces: Vec<&str> = PieceChoice::ALL
        .iter()
        .map(|c| c.piece_type().display_name())
        .collect();
    let current = PieceChoice::ALL.iter().position(|c| *c == values.piece).unwrap_or(0);
    let selected = PieceChoice::ALL[prompter.choice("Selecciona la pieza", &pieces, current)?];
    if selected != values.piece {
        values.select_piece(selected);
    }

    prompter.section("Dimensiones de la pieza")?;
    values.length_cm = prompter.number("Largo (cm)", values.length_cm)?;
    values.height_cm = prompter.number("Alto (cm)", values.height_cm)?;
    values.thickness_cm = prompter.number("Espesor (cm)", values.thickness_cm)?;
    values.unit_weight_kg = prompter.number("Peso por pieza (kg)", values.unit_weight_kg)?;

    prompter.section("Junta y desperdicio")?;
    values.joint_cm = prompter.number("Junta (cm)", values.joint_cm)?;
    values.waste_pct = prompter.number("Desperdicio (%)", values.waste_pct)?;

    prompter.section("Muro")?;
    let by_area = matches!(values.wall, WallEntry::Area { .. });
    let method = prompter.choice(
        "Cómo ingresar el muro",
        &["Área directa", "Medidas (largo × alto)"],
        if by_area { 0 } else { 1 },
    )?;
    values.wall = if method == 0 {
        let current = match values.wall {
            WallEntry::Area { area_m2 } => area_m2,
            WallEntry::Dimensions { length_m, height_m } => length_m * height_m,
        };
        WallEntry::Area {
            area_m2: prompter.number("Área del muro (m²)", current)?,
        }
    } else {
        let (length, height) = match values.wall {
            WallEntry::Dimensions { length_m, height_m } => (length_m, height_m),
            WallEntry::Area { .. } => (DEFAULT_WALL_LENGTH_M, DEFAULT_WALL_HEIGHT_M),
        };
        WallEntry::Dimensions {
            length_m: prompter.number("Largo del muro (m)", length)?,
            height_m: prompter.number("Alto del muro (m)", height)?,
        }
    };

    prompter.section("Material para pegar")?;
    let binders: Vec<&str> = BinderChoice::ALL
        .iter()
        .map(|c| c.binder_type().display_name())
        .collect();
    let current = BinderChoice::ALL.iter().position(|c| *c == values.binder).unwrap_or(0);
    values.binder = BinderChoice::ALL[prompter.choice("Selecciona el material", &binders, current)?];

    prompter.section("Configuración de materiales")?;
    values.sand_cost = prompter.number("Costo arena ($/m³)", values.sand_cost)?;
    values.cement_bag_cost = prompter.number("Costo bulto cemento 50 kg ($)", values.cement_bag_cost)?;
    values.mortar_bag_cost = prompter.number("Costo bulto de mortero 25 kg ($)", values.mortar_bag_cost)?;
    values.mortar_yield_m3 = prompter.number("Rendimiento por bulto de mortero (m³)", values.mortar_yield_m3)?;
    if values.binder.binder_type() != BinderType::PremixedMortar {
        values.cement_parts = prompter.number("Partes de cemento", values.cement_parts)?;
        values.sand_parts = prompter.number("Partes de arena", values.sand_parts)?;
    }

    prompter.section("Costo de la pieza")?;
    values.unit_cost = prompter.number("Costo unitario ($)", values.unit_cost)?;

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> (FormValues, String) {
        let mut output = Vec::new();
        let values = {
            let mut prompter = Prompter::new(input.as_bytes(), &mut output);
            collect(&mut prompter, FormValues::default()).unwrap()
        };
        (values, String::from_utf8(output).unwrap())
    }

    #[test]
    fn empty_answers_keep_defaults() {
        let (values, output) = run("");
        assert_eq!(values, FormValues::default());
        assert!(output.contains("Largo (cm) [40]: "));
        assert!(output.contains("Desperdicio (%) [7]: "));
    }

    #[test]
    fn selecting_brick_resets_dimensions() {
        // label, piece=4 (brick), then defaults for the rest
        let (values, _) = run("Barda\n4\n\n\n\n\n\n\n");
        assert_eq!(values.label, "Barda");
        assert_eq!(values.piece, PieceChoice::Brick);
        assert_eq!(values.length_cm, 23.0);
        assert_eq!(values.height_cm, 5.0);
        assert_eq!(values.thickness_cm, 7.0);
    }

    #[test]
    fn wall_by_dimensions_and_cement_sand() {
        let answers = [
            "",     // label
            "",     // piece
            "", "", "", "", // dimensions, weight
            "1.5",  // joint
            "5",    // waste
            "2",    // wall by dimensions
            "8",    // length
            "2,4",  // height, comma decimal
            "2",    // cement + sand
            "", "", "", "", // material costs and yield
            "1", "3", // ratio
            "20",   // unit cost
        ];
        let (values, _) = run(&answers.join("\n"));
        assert_eq!(values.joint_cm, 1.5);
        assert_eq!(values.waste_pct, 5.0);
        assert_eq!(values.wall, WallEntry::Dimensions { length_m: 8.0, height_m: 2.4 });
        assert_eq!(values.binder, BinderChoice::CementSand);
        assert_eq!(values.sand_parts, 3.0);
        assert_eq!(values.unit_cost, 20.0);
    }

    #[test]
    fn invalid_number_prompts_again() {
        let mut output = Vec::new();
        let value = {
            let mut prompter = Prompter::new("abc\n12.5\n".as_bytes(), &mut output);
            prompter.number("Área del muro (m²)", 10.0).unwrap()
        };
        assert_eq!(value, 12.5);
        assert!(String::from_utf8(output).unwrap().contains("Valor no válido: abc"));
    }

    #[test]
    fn out_of_range_choice_prompts_again() {
        let mut output = Vec::new();
        let index = {
            let mut prompter = Prompter::new("9\n2\n".as_bytes(), &mut output);
            prompter.choice("Material", &["a", "b"], 0).unwrap()
        };
        assert_eq!(index, 1);
    }
}
