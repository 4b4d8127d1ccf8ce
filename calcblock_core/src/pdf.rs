//! # PDF Export
//!
//! Renders an [`EstimateReport`] to PDF using Typst.
//!
//! ## Architecture
//!
//! - The Typst template is embedded as a string constant
//! - Report fields are escaped and injected before compilation
//! - Fonts come from `typst-assets` and are loaded once per process
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use calcblock_core::calculations::estimate::EstimateInput;
//! use calcblock_core::pdf::export_estimate;
//!
//! let input = EstimateInput::default();
//! let now = chrono::Local::now().naive_local();
//!
//! let document = export_estimate(&input, now).unwrap();
//! std::fs::write(&document.file_name, &document.bytes).unwrap();
//! ```

use chrono::{Datelike, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use tracing::info;
use typst::diag::{FileError, FileResult, SourceDiagnostic};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::estimate::{calculate_tracked, EstimateInput};
use crate::equations::registry::EquationTracker;
use crate::errors::{CalcError, CalcResult};
use crate::report::{build_document_report, EstimateReport, ReportSection, REPORT_CONTENT_TYPE, REPORT_FILE_NAME};

/// Fonts bundled with typst-assets, parsed once.
static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    typst_assets::fonts()
        .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
        .collect()
});

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(FontBook::from_fonts(FONTS.iter())),
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(now.year(), now.month() as u8, now.day() as u8)
    }
}

// ============================================================================
// PDF Template
// ============================================================================

const ESTIMATE_TEMPLATE: &str = r##"
#set page(
  paper: "us-letter",
  margin: (top: 0.8in, bottom: 0.8in, left: 0.8in, right: 0.8in),
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr),
      align(left)[#text(size: 9pt)[{{DATE}}]],
      align(right)[#text(size: 9pt)[Página #counter(page).display()]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 11pt, lang: "es")

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 16pt, weight: "bold")[{{TITLE}}]
    {{LABEL_LINE}}
  ]
]

#v(6pt)
#text(size: 10pt)[Fecha: {{DATE}}]

{{SECTIONS}}

#v(16pt)
#text(size: 8pt, style: "italic")[{{DISCLAIMER}}]
"##;

/// A rendered document ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Render a report to PDF bytes, with an appendix for the tracked formulas.
///
/// # Arguments
///
/// * `report` - The report to render
/// * `tracker` - Formulas to list in the appendix; an empty tracker adds none
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(CalcError::ReportFailed)` - If Typst compilation or PDF rendering fails
pub fn render_estimate_pdf(report: &EstimateReport, tracker: &EquationTracker) -> CalcResult<Vec<u8>> {
    let mut source = fill_template(report);

    if !tracker.usages().is_empty() {
        source.push_str(&tracker.generate_appendix_typst());
    }

    let world = PdfWorld::new(source);
    let warned = typst::compile(&world);

    let document = warned
        .output
        .map_err(|errors| CalcError::report_failed("typst compilation", join_messages(&errors)))?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default())
        .map_err(|errors| CalcError::report_failed("pdf rendering", join_messages(&errors)))?;

    info!(
        bytes = pdf_bytes.len(),
        formulas = tracker.unique_equations().len(),
        "rendered estimate pdf"
    );
    Ok(pdf_bytes)
}

/// Estimate, build the document report and render it with the formula appendix.
pub fn export_estimate(input: &EstimateInput, generated_at: NaiveDateTime) -> CalcResult<ExportedDocument> {
    let mut tracker = EquationTracker::new();
    let result = calculate_tracked(input, &mut tracker)?;
    let report = build_document_report(input, &result, generated_at);
    let bytes = render_estimate_pdf(&report, &tracker)?;

    Ok(ExportedDocument {
        file_name: REPORT_FILE_NAME.to_string(),
        content_type: REPORT_CONTENT_TYPE.to_string(),
        bytes,
    })
}

fn fill_template(report: &EstimateReport) -> String {
    let label_line = if report.label.is_empty() {
        String::new()
    } else {
        format!("#v(4pt)\n    #text(size: 13pt)[{}]", escape_typst(&report.label))
    };
    let sections: String = report.sections.iter().map(section_typst).collect();
    let date = escape_typst(&report.generated_at);

    ESTIMATE_TEMPLATE
        .replace("{{TITLE}}", &escape_typst(&report.title))
        .replace("{{LABEL_LINE}}", &label_line)
        .replace("{{DATE}}", &date)
        .replace("{{SECTIONS}}", &sections)
        .replace("{{DISCLAIMER}}", &escape_typst(&report.disclaimer))
}

fn section_typst(section: &ReportSection) -> String {
    let rows: Vec<String> = section
        .fields
        .iter()
        .map(|f| format!("  [{}], [{}],", escape_typst(&f.label), escape_typst(&f.value)))
        .collect();

    format!(
        "\n== {}\n\n#table(\n  columns: (1fr, auto),\n  inset: 6pt,\n  stroke: 0.5pt,\n{}\n)\n",
        escape_typst(&section.title),
        rows.join("\n")
    )
}

fn join_messages(errors: &[SourceDiagnostic]) -> String {
    errors
        .iter()
        .map(|e| e.message.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}
