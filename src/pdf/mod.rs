//! # PDF Serializer
//!
//! Takes the composed pages and writes a valid PDF file.
//!
//! This is a from-scratch PDF 1.7 writer. We write the raw bytes ourselves
//! because it gives us full control over the output and makes the engine
//! self-contained. The PDF spec is verbose but the subset needed for
//! report pages (text, filled rectangles, rules) is manageable.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (fonts, pages, content streams, etc.)
//! 2 0 obj ... endobj
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use crate::error::ReportError;
use crate::font::{FontContext, FontData, FontKey};
use crate::layout::{LayoutPage, PageElement};
use miniz_oxide::deflate::compress_to_vec_zlib;

pub struct PdfWriter;

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<PdfObject>,
    /// Maps (family, weight, italic) -> object id, in /F-index order.
    font_objects: Vec<(FontKey, usize)>,
}

struct PdfObject {
    data: Vec<u8>,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write composed pages to a PDF byte vector. Failure here is fatal to
    /// the whole generation; no partial artifact is emitted.
    pub fn write(
        &self,
        pages: &[LayoutPage],
        title: &str,
        font_context: &FontContext,
    ) -> Result<Vec<u8>, ReportError> {
        let mut builder = PdfBuilder {
            objects: Vec::new(),
            font_objects: Vec::new(),
        };

        // Reserve object IDs:
        // 0 = placeholder (PDF objects are 1-indexed)
        // 1 = Catalog
        // 2 = Pages (page tree root)
        // 3+ = fonts, then page objects, then content streams
        builder.objects.push(PdfObject { data: vec![] });
        builder.objects.push(PdfObject { data: vec![] });
        builder.objects.push(PdfObject { data: vec![] });

        self.register_fonts(&mut builder, pages, font_context);

        let mut page_obj_ids: Vec<usize> = Vec::new();

        for page in pages {
            let content = self.build_content_stream(page, &builder.font_objects);
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);

            let content_obj_id = builder.objects.len();
            let mut content_data: Vec<u8> = Vec::new();
            write!(
                content_data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            )
            .map_err(|e| ReportError::Render(format!("content stream header: {e}")))?;
            content_data.extend_from_slice(&compressed);
            content_data.extend_from_slice(b"\nendstream");
            builder.objects.push(PdfObject { data: content_data });

            let page_obj_id = builder.objects.len();
            let font_resources = self.build_font_resource_dict(&builder.font_objects);
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << /Font << {} >> >> >>",
                page.width, page.height, content_obj_id, font_resources
            );
            builder.objects.push(PdfObject {
                data: page_dict.into_bytes(),
            });
            page_obj_ids.push(page_obj_id);
        }

        // Catalog (object 1)
        builder.objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        // Pages tree (object 2)
        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        // Info dictionary
        let info_obj_id = {
            let id = builder.objects.len();
            let info = format!(
                "<< /Title ({}) /Producer (foliate 0.1) /Creator (foliate) >>",
                Self::escape_pdf_string(title)
            );
            builder.objects.push(PdfObject {
                data: info.into_bytes(),
            });
            id
        };

        Ok(self.serialize(&builder, info_obj_id))
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream(&self, page: &LayoutPage, font_objects: &[(FontKey, usize)]) -> String {
        let mut stream = String::new();
        let page_height = page.height;

        for element in &page.elements {
            self.write_element(&mut stream, element, page_height, font_objects);
        }

        stream
    }

    /// Write a single page element as PDF operators. Layout coordinates
    /// have the origin at the top-left; PDF's origin is bottom-left.
    fn write_element(
        &self,
        stream: &mut String,
        element: &PageElement,
        page_height: f64,
        font_objects: &[(FontKey, usize)],
    ) {
        match element {
            PageElement::Rect {
                x,
                y,
                width,
                height,
                color,
            } => {
                let pdf_y = page_height - y - height;
                let _ = write!(
                    stream,
                    "q\n{:.3} {:.3} {:.3} rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
                    color.r, color.g, color.b, x, pdf_y, width, height
                );
            }

            PageElement::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                let _ = write!(
                    stream,
                    "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
                    color.r,
                    color.g,
                    color.b,
                    width,
                    x1,
                    page_height - y1,
                    x2,
                    page_height - y2
                );
            }

            PageElement::Text { x, y, text, style } => {
                let idx = self.font_index(&style.family, style.weight, style.italic, font_objects);
                let pdf_y = page_height - y;
                let _ = write!(
                    stream,
                    "BT\n{:.3} {:.3} {:.3} rg\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
                    style.color.r,
                    style.color.g,
                    style.color.b,
                    idx,
                    style.size,
                    x,
                    pdf_y,
                    Self::escape_pdf_string(text)
                );
            }
        }
    }

    /// Register fonts used across all pages: each unique
    /// (family, weight, italic) combination gets its own PDF font object.
    fn register_fonts(
        &self,
        builder: &mut PdfBuilder,
        pages: &[LayoutPage],
        font_context: &FontContext,
    ) {
        let mut keys: Vec<FontKey> = Vec::new();

        for page in pages {
            for element in &page.elements {
                if let PageElement::Text { style, .. } = element {
                    let key = FontKey {
                        family: style.family.clone(),
                        weight: if style.weight >= 600 { 700 } else { 400 },
                        italic: style.italic,
                    };
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
            }
        }

        // Sort for deterministic ordering, then dedup.
        keys.sort_by(|a, b| {
            a.family
                .cmp(&b.family)
                .then(a.weight.cmp(&b.weight))
                .then(a.italic.cmp(&b.italic))
        });
        keys.dedup();

        // Always have at least Helvetica.
        if keys.is_empty() {
            keys.push(FontKey {
                family: "Helvetica".to_string(),
                weight: 400,
                italic: false,
            });
        }

        for key in &keys {
            let font_data = font_context.resolve(&key.family, key.weight, key.italic);
            let font_dict = match font_data {
                FontData::Standard(std_font) => {
                    format!(
                        "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
                         /Encoding /WinAnsiEncoding >>",
                        std_font.pdf_name()
                    )
                }
                FontData::Custom { .. } => {
                    // TODO: embed registered TrueType faces as CIDFontType2
                    // instead of aliasing them to Helvetica.
                    "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
                     /Encoding /WinAnsiEncoding >>"
                        .to_string()
                }
            };

            let obj_id = builder.objects.len();
            builder.objects.push(PdfObject {
                data: font_dict.into_bytes(),
            });
            builder.font_objects.push((key.clone(), obj_id));
        }
    }

    fn build_font_resource_dict(&self, font_objects: &[(FontKey, usize)]) -> String {
        font_objects
            .iter()
            .enumerate()
            .map(|(i, (_, obj_id))| format!("/F{} {} 0 R", i, obj_id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Look up the font index (/F0, /F1, etc.) for a given face request.
    fn font_index(
        &self,
        family: &str,
        weight: u32,
        italic: bool,
        font_objects: &[(FontKey, usize)],
    ) -> usize {
        let snapped_weight = if weight >= 600 { 700 } else { 400 };

        for (i, (key, _)) in font_objects.iter().enumerate() {
            if key.family == family && key.weight == snapped_weight && key.italic == italic {
                return i;
            }
        }

        // Fallback: Helvetica with the same weight/style.
        for (i, (key, _)) in font_objects.iter().enumerate() {
            if key.family == "Helvetica" && key.weight == snapped_weight && key.italic == italic {
                return i;
            }
        }

        0
    }

    /// Escape special characters in a PDF string.
    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)")
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        // Header
        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let header = format!("{} 0 obj\n", i);
            output.extend_from_slice(header.as_bytes());
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for i in 1..builder.objects.len() {
            let _ = write!(output, "{:010} 00000 n \n", offsets[i]);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            builder.objects.len(),
            info_obj_id,
            xref_offset
        );

        output
    }
}
