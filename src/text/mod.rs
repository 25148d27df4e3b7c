//! # Text Wrapping
//!
//! Greedy line breaking over UAX#14 break opportunities, measured against
//! the font context. This is the wrap half of the measurement adapter: the
//! paragraph and field renderers call [`wrap_to_width`] exactly once per
//! block and size the block from the returned line count.

use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::font::FontContext;
use crate::style::TextStyle;

/// Break `text` into lines that fit within `max_width` points.
///
/// Empty input yields a single empty line. A segment that is wider than
/// `max_width` on its own is split at the character that overflows;
/// nothing is ever silently dropped.
pub fn wrap_to_width(
    ctx: &FontContext,
    text: &str,
    style: &TextStyle,
    max_width: f64,
) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0;

    let measure = |s: &str| ctx.measure_string(s, &style.family, style.weight, style.italic, style.size);

    let mut push_line = |lines: &mut Vec<String>, line: &mut String| {
        lines.push(line.trim_end().to_string());
        line.clear();
    };

    for (segment, opportunity) in segments(text) {
        let visible = segment.trim_end_matches(['\n', '\r']);
        let fit_width = measure(visible.trim_end());

        if !current.is_empty() && current_width + fit_width > max_width {
            push_line(&mut lines, &mut current);
            current_width = 0.0;
        }

        if current.is_empty() && fit_width > max_width {
            // Unbreakable segment wider than the content area: hard-split.
            for ch in visible.chars() {
                let w = ctx.char_width(ch, &style.family, style.weight, style.italic, style.size);
                if !current.is_empty() && current_width + w > max_width {
                    push_line(&mut lines, &mut current);
                    current_width = 0.0;
                }
                current.push(ch);
                current_width += w;
            }
        } else {
            current.push_str(visible);
            current_width += measure(visible);
        }

        if opportunity == BreakOpportunity::Mandatory {
            push_line(&mut lines, &mut current);
            current_width = 0.0;
        }
    }

    if !current.is_empty() {
        lines.push(current.trim_end().to_string());
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Split `text` into UAX#14 segments. Each segment carries the break
/// opportunity at its end; the final boundary reported by `linebreaks` is
/// always the end of the text.
fn segments(text: &str) -> impl Iterator<Item = (&str, BreakOpportunity)> + '_ {
    let mut start = 0;
    linebreaks(text).map(move |(end, opportunity)| {
        let seg = &text[start..end];
        start = end;
        (seg, opportunity)
    })
}
