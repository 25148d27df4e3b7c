//! # Report Model
//!
//! The input representation for the report engine. A report is generated
//! from a single flat record of field values ([`FormData`]) plus the list of
//! candidate tasks ([`TaskDetail`]) the caller may reference. This is
//! designed to be easily produced by a form frontend or direct JSON
//! construction.
//!
//! The task projection is validated here, at the document boundary: the
//! renderers only ever see a strongly-typed [`TaskSelection`], never a
//! loosely-typed row list.

use serde::{Deserialize, Serialize};

/// Fallback literal substituted for every empty or absent field value.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Fallback document title, used (before sanitization) when the form's
/// title is empty.
pub const DEFAULT_TITLE: &str = "Change Request";

/// Paragraph rendered in place of the tasks table when no tasks were
/// selected.
pub const NO_TASKS_SELECTED: &str = "No tasks selected";

/// The flat record of report field values.
///
/// Every string field may be empty; empty values render as
/// [`NOT_SPECIFIED`]. The record arrives already validated by the form
/// layer; this engine never rejects a field value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    pub title: String,
    pub description: String,
    pub reason: String,
    pub priority: String,
    pub importance: String,
    pub milestone: String,

    /// Ids of the tasks affected by this change. Ids not present in the
    /// candidate task list are silently excluded from the table.
    pub tasks_affected: Vec<String>,

    pub deliverable_impact: String,
    pub non_response_impact: String,

    pub cost: String,
    pub quality: String,
    /// Deadline impact in days. Rendered with singular/plural formatting.
    pub deadline_impact: i64,

    pub alternatives: String,
    pub final_comments: String,
}

impl FormData {
    /// The document title with the fallback applied, before sanitization.
    pub fn effective_title(&self) -> &str {
        if self.title.trim().is_empty() {
            DEFAULT_TITLE
        } else {
            &self.title
        }
    }

    /// Deadline impact with singular/plural day-count formatting:
    /// `1` → `"1 day"`, anything else (including 0 and negatives) →
    /// `"{n} days"`.
    pub fn deadline_impact_text(&self) -> String {
        if self.deadline_impact.abs() == 1 {
            format!("{} day", self.deadline_impact)
        } else {
            format!("{} days", self.deadline_impact)
        }
    }
}

/// A candidate task record supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    pub id: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    /// Task duration in days.
    pub duration_days: i64,
}

/// One row of the tasks-affected table: the typed projection of a selected
/// task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub id: String,
    pub name: String,
    pub date_range: String,
    pub duration: String,
}

impl TaskRow {
    fn from_detail(task: &TaskDetail) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            date_range: format!("{} - {}", task.start_date, task.end_date),
            duration: format!("{} d", task.duration_days),
        }
    }
}

/// The subset of candidate tasks whose id appears in the form's
/// `tasks_affected` list, in selection order.
#[derive(Debug, Clone, Default)]
pub struct TaskSelection {
    pub rows: Vec<TaskRow>,
}

impl TaskSelection {
    /// Project the selected tasks out of the candidate list. Unknown ids
    /// are skipped, not errors.
    pub fn from_form(form: &FormData, tasks: &[TaskDetail]) -> Self {
        let rows = form
            .tasks_affected
            .iter()
            .filter_map(|id| tasks.iter().find(|t| &t.id == id))
            .map(TaskRow::from_detail)
            .collect();
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The JSON entry format: form record plus candidate task list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    pub form: FormData,
    #[serde(default)]
    pub tasks: Vec<TaskDetail>,
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Edge values (top, right, bottom, left) used for page margins.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Configuration for a page: size and margins. Every page of one report
/// shares the same configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default)]
    pub size: PageSize,
    #[serde(default = "default_margin")]
    pub margin: Edges,
}

fn default_margin() -> Edges {
    Edges::uniform(54.0) // ~0.75 inch
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margin: default_margin(),
        }
    }
}
