//! # Foliate
//!
//! A structured-report layout and pagination engine.
//!
//! Most report generators lay content onto an infinite canvas and slice it
//! into pages afterwards, which is where tables get cut in half and
//! paragraphs lose their last line. Foliate does the opposite: **the page
//! is the fundamental unit of layout.** Every block (heading, labeled
//! field, wrapped paragraph, table) computes its full height first, asks
//! whether it fits, and only then draws. Blocks that don't fit start a new
//! page whole.
//!
//! ## Architecture
//!
//! ```text
//! Input (FormData + tasks, JSON or API)
//!       ↓
//!   [model]   — form record, task selection, page geometry
//!       ↓
//!   [report]  — fixed section order, footer stamp, filename
//!       ↓
//!   [layout]  — cursor, page-break rule, block renderers
//!       ↓
//!   [pdf]     — serialize to PDF bytes
//! ```
//!
//! Measurement ([`font`], [`text`]) is injected into layout; nothing above
//! the layout cursor mutates drawing state directly.

pub mod error;
pub mod font;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod report;
pub mod style;
pub mod text;

use chrono::{Local, NaiveDateTime};

pub use error::ReportError;
pub use model::{FormData, PageConfig, ReportRequest, TaskDetail};

use font::FontContext;
use pdf::PdfWriter;
use report::Report;
use style::Theme;

/// A finished artifact: the derived filename plus the PDF bytes.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Generate a report stamped with the current local date and time.
///
/// This is the primary entry point: one synchronous call that either
/// returns a complete artifact or fails with no partial output.
pub fn generate_report(form: &FormData, tasks: &[TaskDetail]) -> Result<Artifact, ReportError> {
    generate_report_at(form, tasks, Local::now().naive_local())
}

/// Generate a report stamped with an explicit timestamp. Same inputs and
/// timestamp produce identical filenames and page content.
pub fn generate_report_at(
    form: &FormData,
    tasks: &[TaskDetail],
    generated_at: NaiveDateTime,
) -> Result<Artifact, ReportError> {
    let font_context = FontContext::new();
    let composed = Report::new(form, tasks).compose(
        &font_context,
        &Theme::default(),
        PageConfig::default(),
        generated_at,
    );
    let bytes = PdfWriter::new().write(&composed.pages, form.effective_title(), &font_context)?;
    Ok(Artifact {
        filename: composed.filename,
        bytes,
    })
}

/// Generate a report from a JSON [`ReportRequest`].
pub fn generate_report_json(json: &str) -> Result<Artifact, ReportError> {
    let request: ReportRequest = serde_json::from_str(json)?;
    generate_report(&request.form, &request.tasks)
}
