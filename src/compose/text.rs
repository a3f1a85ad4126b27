//! Word wrapping and measurement for text elements.
//!
//! Wrapping is measurement-driven: words accumulate into a line while the
//! candidate still measures strictly narrower than the element width, and a
//! word that would overflow starts the next line. Measurement sits behind a
//! small trait so layout stays testable without font files.

use crate::compose::plan::TextLine;

/// Measured extents of a single line of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineExtents {
    /// Advance width in pixels.
    pub width: f64,
    /// Ascent above the baseline.
    pub ascent: f64,
    /// Descent below the baseline.
    pub descent: f64,
}

/// Text measurement seam used by the wrapper.
pub trait TextMeasurer {
    /// Measure one line at the given size and letter spacing.
    fn measure(&self, text: &str, font_px: f32, letter_spacing: f64) -> LineExtents;
}

/// [`TextMeasurer`] backed by a parsed font.
pub struct FontMeasurer<'a> {
    font: &'a fontdue::Font,
}

impl<'a> FontMeasurer<'a> {
    /// Measure with the given font.
    pub fn new(font: &'a fontdue::Font) -> Self {
        Self { font }
    }
}

impl TextMeasurer for FontMeasurer<'_> {
    fn measure(&self, text: &str, font_px: f32, letter_spacing: f64) -> LineExtents {
        let mut width = 0.0f64;
        for ch in text.chars() {
            let metrics = self.font.metrics(ch, font_px);
            width += metrics.advance_width as f64 + letter_spacing;
        }
        let (ascent, descent) = match self.font.horizontal_line_metrics(font_px) {
            Some(m) => (m.ascent as f64, (-m.descent) as f64),
            None => (font_px as f64 * 0.8, font_px as f64 * 0.2),
        };
        LineExtents {
            width,
            ascent,
            descent,
        }
    }
}

/// Wrap text into measured lines that fit `max_width`.
///
/// A single word wider than the box still gets its own line; wrapping never
/// breaks inside a word.
pub fn wrap_lines(
    measurer: &dyn TextMeasurer,
    text: &str,
    max_width: f64,
    font_px: f32,
    letter_spacing: f64,
) -> Vec<TextLine> {
    let mut words = text.split(' ');
    let mut current = words.next().unwrap_or("").to_owned();
    let mut lines = Vec::new();

    let push = |lines: &mut Vec<TextLine>, line: String| {
        let extents = measurer.measure(&line, font_px, letter_spacing);
        lines.push(TextLine {
            text: line,
            width: extents.width,
            ascent: extents.ascent,
            descent: extents.descent,
        });
    };

    for word in words {
        let candidate = format!("{current} {word}");
        if measurer.measure(&candidate, font_px, letter_spacing).width < max_width {
            current = candidate;
        } else {
            push(&mut lines, std::mem::replace(&mut current, word.to_owned()));
        }
    }
    push(&mut lines, current);
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/compose/text.rs"]
mod tests;
