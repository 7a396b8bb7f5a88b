mod block;
pub mod browse;
pub mod catalog;
mod config;
pub mod model;
mod parser;
pub mod text;
mod typst;

pub use block::{DisplayItem, InlineRun, Line, LineKind, Segment};
pub use config::{BackendConfig, Config, ExportConfig};
pub use parser::{classify_line, format_answer, format_inline, normalize_line_breaks, segment};
pub use typst::answer_to_typst;

use browse::StudySheet;
use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Typst compilation failed: {0}")]
    Compile(String),
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

/// Convert a study sheet to Typst markup.
pub fn sheet_to_typst(sheet: &StudySheet, config: &ExportConfig) -> String {
    typst::sheet_to_typst(sheet, config)
}

/// Convert a study sheet to PDF bytes.
pub fn sheet_to_pdf(sheet: &StudySheet, config: &ExportConfig) -> Result<Vec<u8>, RenderError> {
    use typst_library::layout::PagedDocument;

    let typst_content = sheet_to_typst(sheet, config);

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    let doc: PagedDocument = engine
        .compile()
        .output
        .map_err(|e| RenderError::Compile(format!("{e:?}")))?;

    tracing::debug!(pages = doc.pages.len(), "compiled study sheet");

    typst_pdf::pdf(&doc, &PdfOptions::default()).map_err(|e| RenderError::Pdf(format!("{e:?}")))
}
