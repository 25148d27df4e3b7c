//! # Report Styling
//!
//! The fixed visual vocabulary of the report: one color type and a theme
//! struct holding the type scale, spacing, and palette shared by all block
//! renderers. This is intentionally not a general style system: the report
//! format is fixed, so the theme is a flat bag of constants with sensible
//! defaults.

use serde::{Deserialize, Serialize};

/// An RGB color with components in 0.0–1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rgb` or `#rrggbb` hex color. Invalid input yields black.
    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let (r, g, b) = match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).unwrap_or(0);
                (r, g, b)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                (r, g, b)
            }
            _ => (0, 0, 0),
        };
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }
}

/// The full text style a draw command carries: face selection plus size and
/// color. Weight snaps to 400/700 at font resolution time.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub family: String,
    pub size: f64,
    pub weight: u32,
    pub italic: bool,
    pub color: Color,
}

impl TextStyle {
    pub fn body(size: f64, color: Color) -> Self {
        Self {
            family: "Helvetica".to_string(),
            size,
            weight: 400,
            italic: false,
            color,
        }
    }

    pub fn bold(size: f64, color: Color) -> Self {
        Self {
            weight: 700,
            ..Self::body(size, color)
        }
    }

    pub fn italic(size: f64, color: Color) -> Self {
        Self {
            italic: true,
            ..Self::body(size, color)
        }
    }

    /// Line height in points for this style.
    pub fn line_height(&self) -> f64 {
        self.size * 1.4
    }
}

/// Fixed visual parameters of the report.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Body text size in points.
    pub body_size: f64,
    /// Section heading text size in points.
    pub heading_size: f64,
    /// Title text size in the page-1 banner.
    pub title_size: f64,
    /// Footer text size in points.
    pub footer_size: f64,

    /// Gap between the heading rule and the first block of a section.
    pub rule_gap: f64,
    /// Vertical gap appended after a paragraph block.
    pub para_gap: f64,
    /// Vertical gap inserted before each block (suppressed at the top of a
    /// fresh page).
    pub block_gap: f64,
    /// Extra gap before a section heading.
    pub section_gap: f64,

    /// Height of the page-1 title banner.
    pub banner_height: f64,
    /// Fixed height of one table row (header and data alike).
    pub table_row_height: f64,
    /// Fixed padding added to the table height estimate.
    pub table_padding: f64,
    /// Cell inset from the column's left edge.
    pub cell_inset: f64,
    /// Column widths as fractions of the usable content width:
    /// id, name, date range, duration.
    pub table_columns: [f64; 4],

    /// Banner fill and heading text color.
    pub accent: Color,
    /// Table header band fill.
    pub band: Color,
    /// Alternating data-row fill.
    pub zebra: Color,
    /// Body text color.
    pub ink: Color,
    /// Footer and secondary text color.
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            body_size: 10.0,
            heading_size: 13.0,
            title_size: 20.0,
            footer_size: 8.0,

            rule_gap: 6.0,
            para_gap: 4.0,
            block_gap: 4.0,
            section_gap: 14.0,

            banner_height: 64.0,
            table_row_height: 18.0,
            table_padding: 8.0,
            cell_inset: 4.0,
            table_columns: [0.12, 0.40, 0.30, 0.18],

            accent: Color::hex("#1f2937"),
            band: Color::hex("#1f2937"),
            zebra: Color::hex("#f3f4f6"),
            ink: Color::hex("#111827"),
            muted: Color::hex("#6b7280"),
        }
    }
}

impl Theme {
    /// Body line height in points.
    pub fn body_line_height(&self) -> f64 {
        self.body_size * 1.4
    }
}
