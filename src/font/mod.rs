//! # Font Management
//!
//! The measurement backend: maps a (family, weight, italic) request to a
//! face and answers width queries against it.
//!
//! The four Helvetica variants ship built in with Type1 AFM metrics and
//! need no embedding. Callers can register their own TrueType faces, whose
//! metrics are parsed with `ttf-parser` at registration time; a face that
//! fails to parse is rejected there, so measurement itself never fails
//! mid-generation.

pub mod metrics;

pub use metrics::StandardFontMetrics;
use std::collections::HashMap;

use crate::error::ReportError;

/// A font registry that maps font family + weight + style to font data.
pub struct FontRegistry {
    fonts: HashMap<FontKey, FontData>,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub family: String,
    pub weight: u32,
    pub italic: bool,
}

#[derive(Debug, Clone)]
pub enum FontData {
    /// A built-in Type1 face. No embedding needed.
    Standard(StandardFont),
    /// A caller-registered TrueType face.
    Custom { metrics: CustomFontMetrics },
}

/// Parsed metrics for a registered TrueType face.
#[derive(Debug, Clone)]
pub struct CustomFontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
}

impl CustomFontMetrics {
    /// Advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    /// Parse metrics from raw font data.
    pub fn from_font_data(data: &[u8]) -> Result<Self, ReportError> {
        let face = ttf_parser::Face::parse(data, 0)
            .map_err(|e| ReportError::Font(format!("failed to parse font: {e}")))?;
        let units_per_em = face.units_per_em();

        let mut advance_widths = HashMap::new();
        let mut default_advance = 0u16;

        // Sample the Basic Multilingual Plane for width and glyph maps.
        for code in 32u32..=0xFFFF {
            if let Some(ch) = char::from_u32(code) {
                if let Some(glyph_id) = face.glyph_index(ch) {
                    let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                    advance_widths.insert(ch, advance);
                    if ch == ' ' {
                        default_advance = advance;
                    }
                }
            }
        }

        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        Ok(CustomFontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
        })
    }
}

/// The built-in Type1 faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
}

impl StandardFont {
    /// The PDF BaseFont name for this face.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
        }
    }

    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica | Self::HelveticaOblique => &metrics::HELVETICA_METRICS,
            Self::HelveticaBold | Self::HelveticaBoldOblique => &metrics::HELVETICA_BOLD_METRICS,
        }
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        let mut fonts = HashMap::new();

        let standard_mappings = [
            (("Helvetica", 400, false), StandardFont::Helvetica),
            (("Helvetica", 700, false), StandardFont::HelveticaBold),
            (("Helvetica", 400, true), StandardFont::HelveticaOblique),
            (("Helvetica", 700, true), StandardFont::HelveticaBoldOblique),
        ];

        for ((family, weight, italic), font) in standard_mappings {
            fonts.insert(
                FontKey {
                    family: family.to_string(),
                    weight,
                    italic,
                },
                FontData::Standard(font),
            );
        }

        Self { fonts }
    }

    /// Look up a font, falling back to Helvetica if not found.
    pub fn resolve(&self, family: &str, weight: u32, italic: bool) -> &FontData {
        // Snap to the two weights the registry distinguishes.
        let snapped_weight = if weight >= 600 { 700 } else { 400 };
        let key = FontKey {
            family: family.to_string(),
            weight: snapped_weight,
            italic,
        };
        if let Some(font) = self.fonts.get(&key) {
            return font;
        }

        let key = FontKey {
            family: "Helvetica".to_string(),
            weight: snapped_weight,
            italic,
        };
        self.fonts.get(&key).unwrap_or_else(|| {
            self.fonts
                .get(&FontKey {
                    family: "Helvetica".to_string(),
                    weight: 400,
                    italic: false,
                })
                .expect("Helvetica must be registered")
        })
    }

    /// Register a custom TrueType face. Fails if the data cannot be parsed:
    /// a broken measurement backend is fatal before generation starts.
    pub fn register(
        &mut self,
        family: &str,
        weight: u32,
        italic: bool,
        data: &[u8],
    ) -> Result<(), ReportError> {
        let metrics = CustomFontMetrics::from_font_data(data)?;
        self.fonts.insert(
            FontKey {
                family: family.to_string(),
                weight,
                italic,
            },
            FontData::Custom { metrics },
        );
        Ok(())
    }
}

/// Shared measurement context used by layout and PDF serialization.
/// Read-only during composition, so it is safe to share across concurrent
/// generation calls.
pub struct FontContext {
    registry: FontRegistry,
}

impl Default for FontContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FontContext {
    pub fn new() -> Self {
        Self {
            registry: FontRegistry::new(),
        }
    }

    /// Advance width of a single character in points.
    pub fn char_width(
        &self,
        ch: char,
        family: &str,
        weight: u32,
        italic: bool,
        font_size: f64,
    ) -> f64 {
        match self.registry.resolve(family, weight, italic) {
            FontData::Standard(std_font) => std_font.metrics().char_width(ch, font_size),
            FontData::Custom { metrics } => metrics.char_width(ch, font_size),
        }
    }

    /// Width of a string in points. An empty string measures zero.
    pub fn measure_string(
        &self,
        text: &str,
        family: &str,
        weight: u32,
        italic: bool,
        font_size: f64,
    ) -> f64 {
        match self.registry.resolve(family, weight, italic) {
            FontData::Standard(std_font) => std_font.metrics().measure_string(text, font_size),
            FontData::Custom { metrics } => text
                .chars()
                .map(|ch| metrics.char_width(ch, font_size))
                .sum(),
        }
    }

    /// Resolve a face request to its font data.
    pub fn resolve(&self, family: &str, weight: u32, italic: bool) -> &FontData {
        self.registry.resolve(family, weight, italic)
    }

    /// Access the underlying font registry mutably (for registration).
    pub fn registry_mut(&mut self) -> &mut FontRegistry {
        &mut self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_space_width() {
        let ctx = FontContext::new();
        let w = ctx.char_width(' ', "Helvetica", 400, false, 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn bold_wider_than_regular() {
        let ctx = FontContext::new();
        let regular = ctx.char_width('A', "Helvetica", 400, false, 12.0);
        let bold = ctx.char_width('A', "Helvetica", 700, false, 12.0);
        assert!(bold > regular, "Bold A should be wider than regular A");
    }

    #[test]
    fn oblique_shares_upright_widths() {
        let ctx = FontContext::new();
        let upright = ctx.measure_string("Generated", "Helvetica", 400, false, 8.0);
        let oblique = ctx.measure_string("Generated", "Helvetica", 400, true, 8.0);
        assert!((upright - oblique).abs() < 1e-9);
    }

    #[test]
    fn unknown_family_falls_back_to_helvetica() {
        let ctx = FontContext::new();
        let w1 = ctx.char_width('A', "Helvetica", 400, false, 12.0);
        let w2 = ctx.char_width('A', "UnknownFont", 400, false, 12.0);
        assert!((w1 - w2).abs() < 0.001);
    }

    #[test]
    fn weight_snapping() {
        let ctx = FontContext::new();
        let w700 = ctx.char_width('A', "Helvetica", 700, false, 12.0);
        let w800 = ctx.char_width('A', "Helvetica", 800, false, 12.0);
        assert!((w700 - w800).abs() < 0.001);
    }

    #[test]
    fn garbage_font_data_is_rejected() {
        let mut ctx = FontContext::new();
        let err = ctx.registry_mut().register("Broken", 400, false, b"not a font");
        assert!(matches!(err, Err(ReportError::Font(_))));
    }
}
