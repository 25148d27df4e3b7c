//! # Report Assembly
//!
//! Renders the full document template in its fixed section order and
//! derives the artifact filename. The assembler never checks remaining
//! space itself; every placement decision is delegated to the composer's
//! per-block space checks.

use chrono::{NaiveDate, NaiveDateTime};

use crate::font::FontContext;
use crate::layout::{Composer, LayoutPage};
use crate::model::{FormData, PageConfig, TaskDetail, TaskSelection, DEFAULT_TITLE, NO_TASKS_SELECTED};
use crate::style::Theme;

/// Column titles of the tasks-affected table.
const TASK_TABLE_HEADERS: [&str; 4] = ["ID", "Task", "Date Range", "Duration"];

/// The laid-out report: pages ready for serialization, the derived
/// filename, and the timestamp stamped into every footer.
#[derive(Debug, Clone)]
pub struct ComposedReport {
    pub pages: Vec<LayoutPage>,
    pub filename: String,
    pub stamp: String,
}

/// Assembles one report. Owns the task selection for the duration of a
/// single composition call; nothing is shared across calls.
pub struct Report<'a> {
    form: &'a FormData,
    selection: TaskSelection,
}

impl<'a> Report<'a> {
    pub fn new(form: &'a FormData, tasks: &[TaskDetail]) -> Self {
        Self {
            form,
            selection: TaskSelection::from_form(form, tasks),
        }
    }

    /// Render every section in the fixed template order and stamp the
    /// footer onto each page.
    pub fn compose(
        &self,
        ctx: &FontContext,
        theme: &Theme,
        config: PageConfig,
        generated_at: NaiveDateTime,
    ) -> ComposedReport {
        let form = self.form;
        let mut c = Composer::new(ctx, theme, config);

        c.title_banner(form.effective_title());

        c.heading("Change Description");
        c.field("Title", &form.title);
        c.field("Description", &form.description);
        c.field("Reason", &form.reason);
        c.field("Priority", &form.priority);
        c.field("Importance", &form.importance);
        c.field("Milestone", &form.milestone);

        c.heading("Change Impact");
        if self.selection.is_empty() {
            c.paragraph(NO_TASKS_SELECTED);
        } else {
            let rows: Vec<Vec<String>> = self
                .selection
                .rows
                .iter()
                .map(|r| {
                    vec![
                        r.id.clone(),
                        r.name.clone(),
                        r.date_range.clone(),
                        r.duration.clone(),
                    ]
                })
                .collect();
            c.table(&TASK_TABLE_HEADERS, &rows);
        }

        c.heading("Impact Analysis");
        c.field("Impact on deliverables", &form.deliverable_impact);
        c.field("Impact of not responding", &form.non_response_impact);

        c.heading("Evaluation");
        c.field("Cost", &form.cost);
        c.field("Quality", &form.quality);
        c.field("Deadline impact", &form.deadline_impact_text());

        c.heading("Recommendations");
        c.field("Alternatives", &form.alternatives);
        c.field("Final comments", &form.final_comments);

        let stamp = generated_at.format("%Y-%m-%d %H:%M").to_string();
        c.stamp_footer(&format!("Generated on {stamp}"));

        ComposedReport {
            pages: c.finish(),
            filename: filename_for(&form.title, generated_at.date()),
            stamp,
        }
    }
}

/// Derive the artifact filename from the document title and generation
/// date: the lowercased title with every character outside `[a-z0-9]`
/// replaced by `-`, then `-YYYY-MM-DD.pdf`. An empty title falls back to
/// the default document title first. Pure; always yields a valid filename.
pub fn filename_for(title: &str, date: NaiveDate) -> String {
    let title = if title.trim().is_empty() {
        DEFAULT_TITLE
    } else {
        title
    };
    let sanitized: String = title
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("{sanitized}-{}.pdf", date.format("%Y-%m-%d"))
}
