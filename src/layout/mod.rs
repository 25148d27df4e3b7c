//! # Page-Aware Block Layout
//!
//! This is the heart of the engine and the reason it exists.
//!
//! Content never lands on an infinite canvas that gets sliced afterwards.
//! Every block (heading, labeled field, wrapped paragraph, table) computes
//! its full required height first, asks for space once, and only then draws.
//! If the block would overflow the current page, the page is finalized and
//! the block starts at the top margin of a fresh one. Blocks are atomic:
//! no block is ever split across a page boundary.
//!
//! The write position lives in a single [`Cursor`] owned by the
//! [`Composer`]; advancing the cursor is the only way y changes, and each
//! composition call owns its own cursor and page list, so concurrent
//! generations never share layout state.

use log::{debug, warn};

use crate::font::FontContext;
use crate::model::{PageConfig, NOT_SPECIFIED};
use crate::style::{Color, TextStyle, Theme};
use crate::text::wrap_to_width;

/// A finished page: fixed dimensions plus the ordered draw commands the
/// PDF writer will serialize.
#[derive(Debug, Clone)]
pub struct LayoutPage {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<PageElement>,
}

/// One draw command, in absolute page coordinates with the origin at the
/// top-left corner. The PDF writer flips y to PDF's bottom-left space.
#[derive(Debug, Clone)]
pub enum PageElement {
    /// A single line of text; `y` is the baseline offset from the page top.
    Text {
        x: f64,
        y: f64,
        text: String,
        style: TextStyle,
    },
    /// A filled rectangle.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    /// A stroked line segment.
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        color: Color,
    },
}

/// The mutable vertical write position for the page currently being drawn.
///
/// Created at top-of-page, mutated monotonically downward, reset (not
/// destroyed) on page break.
#[derive(Debug, Clone)]
pub struct Cursor {
    /// Offset of the next block's top edge from the page top.
    y: f64,
    /// Reset position: the top margin.
    top: f64,
    /// Left margin; the x origin for content.
    origin_x: f64,
    /// Usable content width between the margins.
    content_width: f64,
    /// Bottom boundary: content must end at or above this offset.
    bottom: f64,
}

impl Cursor {
    fn new(config: &PageConfig) -> Self {
        let (width, height) = config.size.dimensions();
        Self {
            y: config.margin.top,
            top: config.margin.top,
            origin_x: config.margin.left,
            content_width: width - config.margin.horizontal(),
            bottom: height - config.margin.bottom,
        }
    }

    /// Vertical space left on the current page.
    pub fn remaining(&self) -> f64 {
        self.bottom - self.y
    }

    /// Whether a block of `needed` height fits. The boundary is inclusive:
    /// a block whose height exactly equals the remaining space fits.
    pub fn fits(&self, needed: f64) -> bool {
        needed <= self.remaining()
    }

    pub fn x(&self) -> f64 {
        self.origin_x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn content_width(&self) -> f64 {
        self.content_width
    }

    fn advance(&mut self, dy: f64) {
        self.y += dy;
    }

    fn reset(&mut self) {
        self.y = self.top;
    }
}

/// Composes blocks into pages: owns the page list, the cursor, and the one
/// shared implementation of the page-break rule.
pub struct Composer<'a> {
    ctx: &'a FontContext,
    theme: &'a Theme,
    config: PageConfig,
    pages: Vec<LayoutPage>,
    cursor: Cursor,
    /// Set right after a page break, cleared once the next block completes.
    /// While set, the gap that normally precedes a block is suppressed so
    /// fresh pages start flush at the top margin.
    just_broke: bool,
}

impl<'a> Composer<'a> {
    pub fn new(ctx: &'a FontContext, theme: &'a Theme, config: PageConfig) -> Self {
        let cursor = Cursor::new(&config);
        let (width, height) = config.size.dimensions();
        Self {
            ctx,
            theme,
            config,
            pages: vec![LayoutPage {
                width,
                height,
                elements: Vec::new(),
            }],
            cursor,
            just_broke: true,
        }
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The page-break rule, shared by every block renderer. Returns `true`
    /// if a new page was started.
    ///
    /// A block taller than a whole empty page cannot be helped by breaking;
    /// it stays on the fresh page and overflows (the table-height estimate
    /// is a heuristic, and this keeps the failure bounded to one page).
    pub fn ensure_space(&mut self, needed: f64) -> bool {
        if self.cursor.fits(needed) {
            return false;
        }
        if self.cursor.y <= self.cursor.top {
            warn!(
                "block of height {needed:.1} exceeds an empty page ({:.1} available); drawing anyway",
                self.cursor.remaining()
            );
            return false;
        }
        debug!(
            "page break: block needs {needed:.1}, only {:.1} remaining on page {}",
            self.cursor.remaining(),
            self.pages.len()
        );
        self.break_page();
        true
    }

    fn break_page(&mut self) {
        let (width, height) = self.config.size.dimensions();
        self.pages.push(LayoutPage {
            width,
            height,
            elements: Vec::new(),
        });
        self.cursor.reset();
        self.just_broke = true;
    }

    /// One space check for a block of `height` preceded by `gap`. Returns
    /// the gap actually applied: zero when the block opens a fresh page.
    fn begin_block(&mut self, gap: f64, height: f64) -> f64 {
        let gap = if self.just_broke { 0.0 } else { gap };
        if self.ensure_space(gap + height) {
            0.0
        } else {
            gap
        }
    }

    fn push(&mut self, element: PageElement) {
        self.pages
            .last_mut()
            .expect("composer always has a current page")
            .elements
            .push(element);
    }

    fn push_line_of_text(&mut self, x: f64, top: f64, text: &str, style: &TextStyle) {
        // Baseline sits one em below the line's top edge.
        self.push(PageElement::Text {
            x,
            y: top + style.size,
            text: text.to_string(),
            style: style.clone(),
        });
    }

    // ── Block renderers ────────────────────────────────────────────

    /// A section heading: accent-colored bold text with a full-width rule
    /// beneath it, followed by a fixed gap.
    pub fn heading(&mut self, text: &str) {
        let style = TextStyle::bold(self.theme.heading_size, self.theme.accent);
        let line_h = style.line_height();
        let height = line_h + self.theme.rule_gap;

        let gap = self.begin_block(self.theme.section_gap, height);
        self.cursor.advance(gap);

        let top = self.cursor.y();
        let x = self.cursor.x();
        self.push_line_of_text(x, top, text, &style);
        self.push(PageElement::Line {
            x1: x,
            y1: top + line_h,
            x2: x + self.cursor.content_width(),
            y2: top + line_h,
            width: 0.8,
            color: self.theme.accent,
        });

        self.cursor.advance(height);
        self.just_broke = false;
    }

    /// A labeled field: `"{label}: {value}"` on one line, wrapping when the
    /// combined string exceeds the content width. Empty values render the
    /// fallback literal.
    pub fn field(&mut self, label: &str, value: &str) {
        let value = if value.trim().is_empty() {
            NOT_SPECIFIED
        } else {
            value
        };
        let style = TextStyle::body(self.theme.body_size, self.theme.ink);
        let line_h = style.line_height();
        let text = format!("{label}: {value}");
        let lines = wrap_to_width(self.ctx, &text, &style, self.cursor.content_width());
        let height = lines.len() as f64 * line_h;

        let gap = self.begin_block(self.theme.block_gap, height);
        self.cursor.advance(gap);

        let x = self.cursor.x();
        let top = self.cursor.y();
        for (i, line) in lines.iter().enumerate() {
            self.push_line_of_text(x, top + i as f64 * line_h, line, &style);
        }

        // Advance by the whole block height in one step: the space check
        // above covered all lines together.
        self.cursor.advance(height);
        self.just_broke = false;
    }

    /// A wrapped paragraph: wrapped once against the current content width,
    /// drawn line by line, cursor advanced by the full block height.
    pub fn paragraph(&mut self, text: &str) {
        let style = TextStyle::body(self.theme.body_size, self.theme.ink);
        let line_h = style.line_height();
        let lines = wrap_to_width(self.ctx, text, &style, self.cursor.content_width());
        let height = lines.len() as f64 * line_h + self.theme.para_gap;

        let gap = self.begin_block(self.theme.block_gap, height);
        self.cursor.advance(gap);

        let x = self.cursor.x();
        let top = self.cursor.y();
        for (i, line) in lines.iter().enumerate() {
            self.push_line_of_text(x, top + i as f64 * line_h, line, &style);
        }

        self.cursor.advance(height);
        self.just_broke = false;
    }

    /// A table with a filled header band and alternating-background data
    /// rows. Column widths are fixed fractions of the content width; the
    /// height estimate is `(rows + 1) × row_height + padding` and the whole
    /// table is placed atomically.
    pub fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) {
        let row_h = self.theme.table_row_height;
        let height = (rows.len() + 1) as f64 * row_h + self.theme.table_padding;

        let gap = self.begin_block(self.theme.block_gap, height);
        self.cursor.advance(gap);

        let x = self.cursor.x();
        let top = self.cursor.y();
        let width = self.cursor.content_width();
        let col_x = self.column_offsets(x, width);

        // Header band.
        self.push(PageElement::Rect {
            x,
            y: top,
            width,
            height: row_h,
            color: self.theme.band,
        });
        let header_style = TextStyle::bold(self.theme.body_size, Color::WHITE);
        for (ci, title) in headers.iter().enumerate().take(col_x.len()) {
            self.push_cell_text(col_x[ci], top, title, &header_style);
        }

        // Data rows, zebra-striped.
        let cell_style = TextStyle::body(self.theme.body_size, self.theme.ink);
        for (ri, row) in rows.iter().enumerate() {
            let row_top = top + (ri + 1) as f64 * row_h;
            if ri % 2 == 1 {
                self.push(PageElement::Rect {
                    x,
                    y: row_top,
                    width,
                    height: row_h,
                    color: self.theme.zebra,
                });
            }
            for (ci, cell) in row.iter().enumerate().take(col_x.len()) {
                self.push_cell_text(col_x[ci], row_top, cell, &cell_style);
            }
        }

        self.cursor.advance(height);
        self.just_broke = false;
    }

    fn column_offsets(&self, x: f64, width: f64) -> Vec<f64> {
        let mut offsets = Vec::with_capacity(self.theme.table_columns.len());
        let mut acc = 0.0;
        for fraction in self.theme.table_columns {
            offsets.push(x + acc * width);
            acc += fraction;
        }
        offsets
    }

    fn push_cell_text(&mut self, col_x: f64, row_top: f64, text: &str, style: &TextStyle) {
        let row_h = self.theme.table_row_height;
        // Vertically center the baseline within the row.
        self.push(PageElement::Text {
            x: col_x + self.theme.cell_inset,
            y: row_top + (row_h + style.size * 0.7) / 2.0,
            text: text.to_string(),
            style: style.clone(),
        });
    }

    // ── Page furniture (assembler-driven, not space-checked) ───────

    /// The page-1 title band: a full-page-width fill at the top edge with
    /// the title in bold light type. Positions the cursor below the band.
    pub fn title_banner(&mut self, title: &str) {
        let (page_width, _) = self.config.size.dimensions();
        let band_h = self.theme.banner_height;
        let style = TextStyle::bold(self.theme.title_size, Color::WHITE);

        self.push(PageElement::Rect {
            x: 0.0,
            y: 0.0,
            width: page_width,
            height: band_h,
            color: self.theme.accent,
        });
        self.push(PageElement::Text {
            x: self.cursor.x(),
            y: (band_h + style.size * 0.7) / 2.0,
            text: title.to_string(),
            style,
        });

        self.cursor.y = self.cursor.top.max(band_h + self.theme.section_gap);
        self.just_broke = true;
    }

    /// Stamp one footer line on every page, inside the bottom margin.
    pub fn stamp_footer(&mut self, text: &str) {
        let style = TextStyle::italic(self.theme.footer_size, self.theme.muted);
        let x = self.cursor.x();
        let baseline = {
            let (_, page_height) = self.config.size.dimensions();
            page_height - self.config.margin.bottom / 2.0
        };
        for page in &mut self.pages {
            page.elements.push(PageElement::Text {
                x,
                y: baseline,
                text: text.to_string(),
                style: style.clone(),
            });
        }
    }

    /// Finish composition and hand over the pages.
    pub fn finish(self) -> Vec<LayoutPage> {
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edges, PageSize};

    fn small_page() -> PageConfig {
        PageConfig {
            size: PageSize::Custom {
                width: 300.0,
                height: 200.0,
            },
            margin: Edges::uniform(20.0),
        }
    }

    fn compose<'a>(ctx: &'a FontContext, theme: &'a Theme) -> Composer<'a> {
        Composer::new(ctx, theme, small_page())
    }

    #[test]
    fn exact_fit_stays_on_page() {
        let ctx = FontContext::new();
        let theme = Theme::default();
        let mut c = compose(&ctx, &theme);
        let remaining = c.cursor().remaining();
        assert!(!c.ensure_space(remaining), "inclusive boundary: exact fit");
        assert_eq!(c.page_count(), 1);
    }

    #[test]
    fn epsilon_over_breaks_page() {
        let ctx = FontContext::new();
        let theme = Theme::default();
        let mut c = compose(&ctx, &theme);
        // A completed block clears the fresh-page state.
        c.paragraph("anchor");
        let remaining = c.cursor().remaining();
        assert!(c.ensure_space(remaining + 0.001));
        assert_eq!(c.page_count(), 2);
        assert!((c.cursor().remaining() - 160.0).abs() < 1e-9, "cursor reset to top margin");
    }

    #[test]
    fn oversize_block_on_fresh_page_does_not_loop() {
        let ctx = FontContext::new();
        let theme = Theme::default();
        let mut c = compose(&ctx, &theme);
        assert!(!c.ensure_space(10_000.0));
        assert_eq!(c.page_count(), 1);
    }

    #[test]
    fn paragraph_is_atomic_across_break() {
        let ctx = FontContext::new();
        let theme = Theme::default();
        let mut c = compose(&ctx, &theme);
        // Fill most of the page.
        c.paragraph("lead-in text");
        while c.cursor().remaining() > 3.0 * theme.body_line_height() && c.page_count() == 1 {
            c.paragraph("filler");
        }
        let long = "This paragraph has enough words to wrap onto several lines \
                    once measured against the narrow content width of the test page.";
        c.paragraph(long);
        assert_eq!(c.page_count(), 2, "long paragraph should have forced a break");
        let pages = c.finish();
        let first_word = "This";
        let page1_has = pages[0].elements.iter().any(|e| match e {
            PageElement::Text { text, .. } => text.starts_with(first_word),
            _ => false,
        });
        let page2_has = pages[1].elements.iter().any(|e| match e {
            PageElement::Text { text, .. } => text.starts_with(first_word),
            _ => false,
        });
        assert!(!page1_has && page2_has, "whole paragraph must move to page 2");
    }

    #[test]
    fn heading_draws_rule() {
        let ctx = FontContext::new();
        let theme = Theme::default();
        let mut c = compose(&ctx, &theme);
        c.heading("Evaluation");
        let pages = c.finish();
        let has_rule = pages[0]
            .elements
            .iter()
            .any(|e| matches!(e, PageElement::Line { .. }));
        assert!(has_rule);
    }

    #[test]
    fn field_substitutes_fallback() {
        let ctx = FontContext::new();
        let theme = Theme::default();
        let mut c = compose(&ctx, &theme);
        c.field("Priority", "");
        let pages = c.finish();
        let line = pages[0]
            .elements
            .iter()
            .find_map(|e| match e {
                PageElement::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(line, format!("Priority: {NOT_SPECIFIED}"));
    }

    #[test]
    fn table_has_band_and_zebra() {
        let ctx = FontContext::new();
        let theme = Theme::default();
        let mut c = compose(&ctx, &theme);
        let rows = vec![
            vec!["t1".into(), "Design".into(), "Jan - Feb".into(), "22 d".into()],
            vec!["t2".into(), "Build".into(), "Feb - Mar".into(), "30 d".into()],
            vec!["t3".into(), "Test".into(), "Mar - Apr".into(), "12 d".into()],
        ];
        c.table(&["ID", "Task", "Dates", "Duration"], &rows);
        let pages = c.finish();
        let rects = pages[0]
            .elements
            .iter()
            .filter(|e| matches!(e, PageElement::Rect { .. }))
            .count();
        // Header band + one zebra stripe for the middle row.
        assert_eq!(rects, 2);
        let texts = pages[0]
            .elements
            .iter()
            .filter(|e| matches!(e, PageElement::Text { .. }))
            .count();
        assert_eq!(texts, 4 + 3 * 4);
    }

    #[test]
    fn fresh_page_suppresses_leading_gap() {
        let ctx = FontContext::new();
        let theme = Theme::default();
        let mut c = compose(&ctx, &theme);
        c.paragraph("anchor");
        let remaining = c.cursor().remaining();
        c.ensure_space(remaining + 1.0);
        let top_before = c.cursor().y();
        c.heading("Recommendations");
        let pages = c.finish();
        let heading_baseline = pages[1]
            .elements
            .iter()
            .find_map(|e| match e {
                PageElement::Text { y, .. } => Some(*y),
                _ => None,
            })
            .unwrap();
        assert!((heading_baseline - (top_before + theme.heading_size)).abs() < 1e-9);
    }
}
