//! Integration tests for the report generation pipeline.
//!
//! These exercise the full path from form data to PDF bytes, and the
//! compose level in between. They verify:
//! - fallback substitution for empty field values
//! - the empty-selection branch of the tasks section
//! - atomic block placement across page breaks
//! - deadline day/days formatting
//! - filename determinism and sanitization
//! - footer presence on every page
//! - PDF output is structurally valid

use chrono::{NaiveDate, NaiveDateTime};

use foliate::font::FontContext;
use foliate::layout::{Composer, LayoutPage, PageElement};
use foliate::model::{Edges, FormData, PageConfig, PageSize, TaskDetail};
use foliate::report::{ComposedReport, Report};
use foliate::style::Theme;

// ─── Helpers ────────────────────────────────────────────────────

fn generated_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 8, 7)
        .unwrap()
        .and_hms_opt(14, 5, 0)
        .unwrap()
}

fn sample_tasks() -> Vec<TaskDetail> {
    vec![
        task("t-104", "Carrier API integration", 15),
        task("t-117", "Warehouse label re-print", 5),
        task("t-120", "Customs paperwork review", 3),
    ]
}

fn task(id: &str, name: &str, days: i64) -> TaskDetail {
    TaskDetail {
        id: id.to_string(),
        name: name.to_string(),
        start_date: "2026-09-01".to_string(),
        end_date: "2026-09-19".to_string(),
        duration_days: days,
    }
}

fn compose(form: &FormData, tasks: &[TaskDetail]) -> ComposedReport {
    Report::new(form, tasks).compose(
        &FontContext::new(),
        &Theme::default(),
        PageConfig::default(),
        generated_at(),
    )
}

fn page_texts(page: &LayoutPage) -> Vec<String> {
    page.elements
        .iter()
        .filter_map(|e| match e {
            PageElement::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn all_texts(composed: &ComposedReport) -> Vec<String> {
    composed.pages.iter().flat_map(|p| page_texts(p)).collect()
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 50, "PDF too small to be valid");
    assert!(bytes.starts_with(b"%PDF-1.7"), "Missing PDF header");
    assert!(bytes.windows(5).any(|w| w == b"%%EOF"), "Missing %%EOF marker");
    assert!(bytes.windows(4).any(|w| w == b"xref"), "Missing xref table");
    assert!(bytes.windows(7).any(|w| w == b"trailer"), "Missing trailer");
}

// ─── Fallback substitution ──────────────────────────────────────

#[test]
fn empty_fields_render_fallback_literal() {
    let composed = compose(&FormData::default(), &[]);
    let texts = all_texts(&composed);
    for label in ["Description", "Reason", "Priority", "Cost", "Quality"] {
        let expected = format!("{label}: Not specified");
        assert!(
            texts.iter().any(|t| *t == expected),
            "missing fallback line {expected:?}"
        );
    }
}

#[test]
fn populated_fields_render_their_value() {
    let form = FormData {
        description: "Scope increase".to_string(),
        ..Default::default()
    };
    let composed = compose(&form, &[]);
    assert!(all_texts(&composed)
        .iter()
        .any(|t| t == "Description: Scope increase"));
}

// ─── Task selection branch ──────────────────────────────────────

#[test]
fn empty_selection_renders_fallback_paragraph() {
    let composed = compose(&FormData::default(), &sample_tasks());
    let texts = all_texts(&composed);
    assert!(texts.iter().any(|t| t == "No tasks selected"));
    assert!(
        !texts.iter().any(|t| t == "Carrier API integration"),
        "no task rows should render for an empty selection"
    );
}

#[test]
fn selection_renders_one_row_per_matching_id() {
    let form = FormData {
        tasks_affected: vec!["t-104".into(), "t-120".into(), "t-999".into()],
        ..Default::default()
    };
    let composed = compose(&form, &sample_tasks());
    let texts = all_texts(&composed);
    assert!(texts.iter().any(|t| t == "Carrier API integration"));
    assert!(texts.iter().any(|t| t == "Customs paperwork review"));
    assert!(
        !texts.iter().any(|t| t == "Warehouse label re-print"),
        "unselected task must not render"
    );
    assert!(
        !texts.iter().any(|t| t.contains("t-999")),
        "unknown ids are silently excluded"
    );
    assert!(!texts.iter().any(|t| t == "No tasks selected"));
}

// ─── Atomic placement ───────────────────────────────────────────

#[test]
fn table_never_splits_across_pages() {
    let ctx = FontContext::new();
    let theme = Theme::default();
    let config = PageConfig {
        size: PageSize::Custom {
            width: 400.0,
            height: 260.0,
        },
        margin: Edges::uniform(20.0),
    };
    let mut c = Composer::new(&ctx, &theme, config);
    // Eat most of the page so the table cannot fit below.
    c.paragraph("lead-in");
    while c.cursor().remaining() > 5.0 * theme.table_row_height && c.page_count() == 1 {
        c.paragraph("filler");
    }
    let rows: Vec<Vec<String>> = (0..6)
        .map(|i| {
            vec![
                format!("t-{i}"),
                "Task".to_string(),
                "Sep - Oct".to_string(),
                "5 d".to_string(),
            ]
        })
        .collect();
    c.table(&["ID", "Task", "Date Range", "Duration"], &rows);
    assert_eq!(c.page_count(), 2);
    let pages = c.finish();
    let on_page = |page: &LayoutPage| {
        page_texts(page)
            .iter()
            .filter(|t| t.starts_with("t-"))
            .count()
    };
    assert_eq!(on_page(&pages[0]), 0, "no table rows on page 1");
    assert_eq!(on_page(&pages[1]), 6, "all table rows on page 2");
}

#[test]
fn field_block_is_atomic() {
    let ctx = FontContext::new();
    let theme = Theme::default();
    let config = PageConfig {
        size: PageSize::Custom {
            width: 300.0,
            height: 200.0,
        },
        margin: Edges::uniform(20.0),
    };
    let mut c = Composer::new(&ctx, &theme, config);
    c.paragraph("lead-in");
    while c.cursor().remaining() > 2.0 * theme.body_line_height() && c.page_count() == 1 {
        c.paragraph("filler");
    }
    c.field(
        "Impact of not responding",
        "contract penalties apply and the rollout window shifts by a quarter",
    );
    assert_eq!(c.page_count(), 2);
    let pages = c.finish();
    assert!(
        !page_texts(&pages[0])
            .iter()
            .any(|t| t.starts_with("Impact of not responding")),
        "wrapped field must move to the next page whole"
    );
}

// ─── Evaluation formatting ──────────────────────────────────────

#[test]
fn deadline_singular_and_plural() {
    for (days, expected) in [(1, "Deadline impact: 1 day"), (2, "Deadline impact: 2 days"), (0, "Deadline impact: 0 days"), (-3, "Deadline impact: -3 days")] {
        let form = FormData {
            deadline_impact: days,
            ..Default::default()
        };
        let composed = compose(&form, &[]);
        assert!(
            all_texts(&composed).iter().any(|t| *t == expected),
            "deadline {days} should render {expected:?}"
        );
    }
}

// ─── Filename ───────────────────────────────────────────────────

#[test]
fn filename_is_deterministic_for_same_title_and_date() {
    let form = FormData {
        title: "Q3 Vendor Change!".to_string(),
        ..Default::default()
    };
    let a = foliate::generate_report_at(&form, &[], generated_at()).unwrap();
    let b = foliate::generate_report_at(&form, &[], generated_at()).unwrap();
    assert_eq!(a.filename, b.filename);
    assert_eq!(a.bytes, b.bytes, "identical inputs produce identical bytes");
    assert!(a.filename.starts_with("q3-vendor-change-"));
    assert!(a.filename.ends_with("2026-08-07.pdf"));
}

#[test]
fn empty_title_uses_fallback_in_filename() {
    let artifact = foliate::generate_report_at(&FormData::default(), &[], generated_at()).unwrap();
    assert!(artifact.filename.starts_with("change-request-"));
}

// ─── Footer ─────────────────────────────────────────────────────

#[test]
fn every_page_carries_exactly_one_footer() {
    let form = FormData {
        description: "scope and schedule impact ".repeat(160),
        alternatives: "fallback plan ".repeat(160),
        ..Default::default()
    };
    let composed = compose(&form, &[]);
    assert!(composed.pages.len() >= 2, "form should spill onto a second page");
    let footer = format!("Generated on {}", composed.stamp);
    for (i, page) in composed.pages.iter().enumerate() {
        let count = page_texts(page).iter().filter(|t| **t == footer).count();
        assert_eq!(count, 1, "page {} must carry exactly one footer", i + 1);
    }
    assert_eq!(composed.stamp, "2026-08-07 14:05");
}

// ─── Banner ─────────────────────────────────────────────────────

#[test]
fn first_page_has_full_width_banner() {
    let composed = compose(&FormData::default(), &[]);
    let page = &composed.pages[0];
    let banner = page.elements.iter().find_map(|e| match e {
        PageElement::Rect { x, y, width, .. } => Some((*x, *y, *width)),
        _ => None,
    });
    let (x, y, width) = banner.expect("page 1 should have a banner rect");
    assert_eq!(x, 0.0);
    assert_eq!(y, 0.0);
    assert!((width - page.width).abs() < 1e-9, "banner spans the full page width");
    let texts = page_texts(page);
    assert!(texts.iter().any(|t| t == "Change Request"), "banner shows the fallback title");
}

// ─── End-to-end ─────────────────────────────────────────────────

#[test]
fn scenario_empty_title_empty_selection() {
    let form = FormData {
        title: String::new(),
        description: "Scope increase".to_string(),
        tasks_affected: vec![],
        deadline_impact: 3,
        ..Default::default()
    };
    let composed = compose(&form, &sample_tasks());
    assert!(!composed.pages.is_empty());

    let texts = all_texts(&composed);
    assert!(texts.iter().any(|t| t == "Title: Not specified"));
    assert!(texts.iter().any(|t| t == "Description: Scope increase"));
    assert!(texts.iter().any(|t| t == "No tasks selected"));
    assert!(texts.iter().any(|t| t == "Deadline impact: 3 days"));
    assert!(composed.filename.starts_with("change-request-"));

    let artifact = foliate::generate_report_at(&form, &sample_tasks(), generated_at()).unwrap();
    assert_valid_pdf(&artifact.bytes);
    assert_eq!(artifact.filename, composed.filename);
}

#[test]
fn json_entry_point_round_trips() {
    let json = r#"{
        "form": {
            "title": "Q3 Vendor Change",
            "description": "Replace the current logistics vendor.",
            "tasksAffected": ["t-104"],
            "deadlineImpact": 5
        },
        "tasks": [
            {
                "id": "t-104",
                "name": "Carrier API integration",
                "startDate": "2026-09-01",
                "endDate": "2026-09-19",
                "durationDays": 15
            }
        ]
    }"#;
    let artifact = foliate::generate_report_json(json).unwrap();
    assert_valid_pdf(&artifact.bytes);
    assert!(artifact.filename.starts_with("q3-vendor-change-"));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = foliate::generate_report_json("{ not json").unwrap_err();
    assert!(matches!(err, foliate::ReportError::Parse { .. }));
}

#[test]
fn full_report_produces_valid_pdf() {
    let form = FormData {
        title: "Q3 Vendor Change".to_string(),
        description: "Replace the current logistics vendor with Northwind Freight.".to_string(),
        reason: "The current vendor cannot meet the revised delivery SLA.".to_string(),
        priority: "High".to_string(),
        importance: "Critical path".to_string(),
        milestone: "EU rollout".to_string(),
        tasks_affected: vec!["t-104".into(), "t-117".into()],
        deliverable_impact: "Shipping integration must be re-certified.".to_string(),
        non_response_impact: "SLA penalties accrue from October onward.".to_string(),
        cost: "EUR 24k one-off".to_string(),
        quality: "No regression expected.".to_string(),
        deadline_impact: 5,
        alternatives: "Renegotiate SLA with current vendor.".to_string(),
        final_comments: "Procurement has pre-approved the contract draft.".to_string(),
    };
    let artifact = foliate::generate_report_at(&form, &sample_tasks(), generated_at()).unwrap();
    assert_valid_pdf(&artifact.bytes);
    assert_eq!(artifact.filename, "q3-vendor-change-2026-08-07.pdf");
}
