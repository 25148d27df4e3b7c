//! Advance-width tables for the built-in Type1 faces.
//!
//! Widths are in 1/1000 em (AFM units) for the printable ASCII range
//! 0x20-0x7E. Characters outside the table measure as the space width;
//! line wrapping operates on measured Latin-script runs, so that is the
//! only regime these tables need to be exact in.

/// Metrics for one built-in face.
pub struct StandardFontMetrics {
    widths: &'static [u16; 95],
}

/// Helvetica / Helvetica-Oblique.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold / Helvetica-BoldOblique.
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

pub static HELVETICA_METRICS: StandardFontMetrics = StandardFontMetrics {
    widths: &HELVETICA,
};
pub static HELVETICA_BOLD_METRICS: StandardFontMetrics = StandardFontMetrics {
    widths: &HELVETICA_BOLD,
};

impl StandardFontMetrics {
    /// Advance width of a single character in points at `font_size`.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let units = match ch as u32 {
            0x20..=0x7E => self.widths[ch as usize - 0x20],
            _ => self.widths[0],
        };
        units as f64 / 1000.0 * font_size
    }

    /// Width of a string in points at `font_size`.
    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }
}
