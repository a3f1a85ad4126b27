//! CPU execution of a [`FramePlan`].
//!
//! Draw ops execute in order into a premultiplied RGBA8 frame. Transformed
//! blits walk the destination bounding box and inverse-map into the source
//! with nearest sampling; text rasterizes its block into a scratch bitmap
//! first so rotation and scale reuse the same blit path.

use kurbo::Point;

use crate::{
    compose::plan::{DrawOp, FramePlan, Placement, TextLine},
    foundation::pixel::{Bitmap, Rgba8},
    render::composite::{blend_pixel, over, scale_premul},
    timeline::model::{TextAlign, TextProps},
};

/// Padding around each text line's background rectangle.
const TEXT_BACKGROUND_PADDING: f64 = 12.0;
/// Horizontal shear applied per pixel above the baseline for synthetic
/// italics (roughly a 12 degree slant).
const ITALIC_SKEW: f64 = 0.21;

/// Execute a plan into pixels.
#[tracing::instrument(skip(plan), fields(ops = plan.ops.len()))]
pub fn rasterize(plan: &FramePlan) -> Bitmap {
    let mut frame = Bitmap::new(plan.width, plan.height);
    frame.fill(plan.background);
    for op in &plan.ops {
        match op {
            DrawOp::Bitmap { source, placement } => {
                let Some(src) = source.bitmap() else {
                    continue;
                };
                blit(&mut frame, src, placement, (
                    placement.width / src.width().max(1) as f64,
                    placement.height / src.height().max(1) as f64,
                ), (src.width() as f64 / 2.0, src.height() as f64 / 2.0));
            }
            DrawOp::FillRect {
                origin,
                size,
                color,
                alpha,
            } => fill_rect(&mut frame, *origin, *size, color.premultiplied_with(alpha_u8(*alpha))),
            DrawOp::StrokeRect {
                origin,
                size,
                color,
                line_width,
            } => stroke_rect(&mut frame, *origin, *size, *color, *line_width),
            DrawOp::FillCircle {
                center,
                radius,
                color,
            } => fill_circle(&mut frame, *center, *radius, color.premultiplied()),
            DrawOp::FillPolygon {
                points,
                color,
                alpha,
            } => fill_polygon(&mut frame, points, color.premultiplied_with(alpha_u8(*alpha))),
            DrawOp::Text {
                font,
                props,
                lines,
                placement,
            } => draw_text(&mut frame, font, props, lines, placement),
        }
    }
    frame
}

fn alpha_u8(alpha: f64) -> u8 {
    (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn fill_rect(frame: &mut Bitmap, origin: Point, size: (f64, f64), px: [u8; 4]) {
    let x0 = origin.x.round() as i64;
    let y0 = origin.y.round() as i64;
    let x1 = (origin.x + size.0).round() as i64;
    let y1 = (origin.y + size.1).round() as i64;
    for y in y0..y1 {
        for x in x0..x1 {
            blend_pixel(frame, x, y, px);
        }
    }
}

fn stroke_rect(frame: &mut Bitmap, origin: Point, size: (f64, f64), color: Rgba8, line_width: f64) {
    let px = color.premultiplied();
    let half = line_width / 2.0;
    let (x, y) = (origin.x, origin.y);
    let (w, h) = size;
    // Stroke centered on the rectangle edges, like canvas strokeRect.
    fill_rect(frame, Point::new(x - half, y - half), (w + line_width, line_width), px);
    fill_rect(frame, Point::new(x - half, y + h - half), (w + line_width, line_width), px);
    fill_rect(frame, Point::new(x - half, y + half), (line_width, h - line_width), px);
    fill_rect(frame, Point::new(x + w - half, y + half), (line_width, h - line_width), px);
}

fn fill_circle(frame: &mut Bitmap, center: Point, radius: f64, px: [u8; 4]) {
    let x0 = (center.x - radius).floor() as i64;
    let x1 = (center.x + radius).ceil() as i64;
    let y0 = (center.y - radius).floor() as i64;
    let y1 = (center.y + radius).ceil() as i64;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f64 + 0.5 - center.x;
            let dy = y as f64 + 0.5 - center.y;
            if dx * dx + dy * dy <= radius * radius {
                blend_pixel(frame, x, y, px);
            }
        }
    }
}

/// Even-odd scanline polygon fill.
fn fill_polygon(frame: &mut Bitmap, points: &[Point], px: [u8; 4]) {
    if points.len() < 3 {
        return;
    }
    let y0 = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min).floor() as i64;
    let y1 = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max).ceil() as i64;
    for y in y0..y1 {
        let fy = y as f64 + 0.5;
        let mut xs: Vec<f64> = Vec::new();
        for i in 0..points.len() {
            let p = points[i];
            let q = points[(i + 1) % points.len()];
            if (p.y <= fy && q.y > fy) || (q.y <= fy && p.y > fy) {
                let t = (fy - p.y) / (q.y - p.y);
                xs.push(p.x + t * (q.x - p.x));
            }
        }
        xs.sort_by(|a, b| a.total_cmp(b));
        for pair in xs.chunks_exact(2) {
            for x in pair[0].round() as i64..pair[1].round() as i64 {
                blend_pixel(frame, x, y, px);
            }
        }
    }
}

/// Inverse-mapped blit of `src` under a placement.
///
/// `box_scale` maps source pixels into the placement box; `anchor` is the
/// source point that lands on the box center. The placement's uniform scale
/// and rotation apply about that center.
fn blit(
    frame: &mut Bitmap,
    src: &Bitmap,
    placement: &Placement,
    box_scale: (f64, f64),
    anchor: (f64, f64),
) {
    if src.width() == 0 || src.height() == 0 || placement.alpha <= 0.0 {
        return;
    }
    let alpha = alpha_u8(placement.alpha);
    let center = (
        placement.x + placement.width / 2.0,
        placement.y + placement.height / 2.0,
    );
    let angle = placement.rotation_deg.to_radians();
    let (sin, cos) = angle.sin_cos();
    let s = placement.scale;

    // Forward-map the source corners to find the destination bounds.
    let corners = [
        (0.0, 0.0),
        (src.width() as f64, 0.0),
        (0.0, src.height() as f64),
        (src.width() as f64, src.height() as f64),
    ];
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for (px, py) in corners {
        let lx = (px - anchor.0) * box_scale.0 * s;
        let ly = (py - anchor.1) * box_scale.1 * s;
        let qx = center.0 + lx * cos - ly * sin;
        let qy = center.1 + lx * sin + ly * cos;
        min_x = min_x.min(qx);
        min_y = min_y.min(qy);
        max_x = max_x.max(qx);
        max_y = max_y.max(qy);
    }

    let x0 = (min_x.floor() as i64).max(0);
    let y0 = (min_y.floor() as i64).max(0);
    let x1 = (max_x.ceil() as i64).min(frame.width() as i64);
    let y1 = (max_y.ceil() as i64).min(frame.height() as i64);

    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f64 + 0.5 - center.0;
            let dy = y as f64 + 0.5 - center.1;
            // Inverse rotation, then undo scale and box mapping.
            let lx = (dx * cos + dy * sin) / s;
            let ly = (-dx * sin + dy * cos) / s;
            let sx = lx / box_scale.0 + anchor.0;
            let sy = ly / box_scale.1 + anchor.1;
            if sx < 0.0 || sy < 0.0 || sx >= src.width() as f64 || sy >= src.height() as f64 {
                continue;
            }
            let px = src.pixel(sx as u32, sy as u32);
            blend_pixel(frame, x, y, scale_premul(px, alpha));
        }
    }
}

struct TextLayout {
    scratch: Bitmap,
    // Source point that lands on the placement box center.
    anchor: (f64, f64),
}

fn draw_text(
    frame: &mut Bitmap,
    font: &fontdue::Font,
    props: &TextProps,
    lines: &[TextLine],
    placement: &Placement,
) {
    let Some(layout) = rasterize_text_block(font, props, lines, placement) else {
        return;
    };
    blit(frame, &layout.scratch, placement, (1.0, 1.0), layout.anchor);
}

/// Rasterize the whole text block into a scratch bitmap.
///
/// Baselines start at the font size and advance by the element height per
/// line; backgrounds pad each measured line box by a fixed margin.
fn rasterize_text_block(
    font: &fontdue::Font,
    props: &TextProps,
    lines: &[TextLine],
    placement: &Placement,
) -> Option<TextLayout> {
    if lines.is_empty() {
        return None;
    }
    let pad = TEXT_BACKGROUND_PADDING;
    let advance = placement.height;

    // Extents of all line boxes in element-local space.
    let (mut left, mut top) = (0.0f64, 0.0f64);
    let (mut right, mut bottom) = (placement.width, 0.0f64);
    for (i, line) in lines.iter().enumerate() {
        let baseline = props.font_px + i as f64 * advance;
        let start_x = line_start_x(props.align, placement.width, line.width);
        left = left.min(start_x - pad);
        right = right.max(start_x + line.width + pad);
        top = top.min(baseline - line.ascent - pad);
        bottom = bottom.max(baseline + line.descent + pad);
    }

    let width = (right - left).ceil().max(1.0) as u32;
    let height = (bottom - top).ceil().max(1.0) as u32;
    let mut scratch = Bitmap::new(width, height);
    let offset = (-left, -top);

    for (i, line) in lines.iter().enumerate() {
        let baseline = props.font_px + i as f64 * advance + offset.1;
        let start_x = line_start_x(props.align, placement.width, line.width) + offset.0;

        if props.background.enable {
            fill_rect(
                &mut scratch,
                Point::new(start_x - pad, baseline - line.ascent - pad),
                (line.width + pad * 2.0, line.ascent + line.descent + pad * 2.0),
                props.background.color.premultiplied(),
            );
        }

        if props.outline.enable {
            let r = (props.outline.size / 2.0).max(1.0);
            for (dx, dy) in [
                (-r, 0.0),
                (r, 0.0),
                (0.0, -r),
                (0.0, r),
                (-r, -r),
                (r, -r),
                (-r, r),
                (r, r),
            ] {
                draw_line_glyphs(
                    &mut scratch,
                    font,
                    props,
                    &line.text,
                    start_x + dx,
                    baseline + dy,
                    props.outline.color,
                );
            }
        }

        draw_line_glyphs(&mut scratch, font, props, &line.text, start_x, baseline, props.color);
    }

    Some(TextLayout {
        scratch,
        anchor: (placement.width / 2.0 + offset.0, placement.height / 2.0 + offset.1),
    })
}

fn line_start_x(align: TextAlign, box_width: f64, line_width: f64) -> f64 {
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Center => (box_width - line_width) / 2.0,
        TextAlign::Right => box_width - line_width,
    }
}

/// Rasterize one line of glyphs onto a scratch bitmap.
fn draw_line_glyphs(
    scratch: &mut Bitmap,
    font: &fontdue::Font,
    props: &TextProps,
    text: &str,
    start_x: f64,
    baseline_y: f64,
    color: Rgba8,
) {
    let px = props.font_px as f32;
    let mut pen_x = start_x;
    for ch in text.chars() {
        let (metrics, coverage) = font.rasterize(ch, px);
        let glyph_left = pen_x + metrics.xmin as f64;
        let glyph_top = baseline_y - (metrics.height as i32 + metrics.ymin) as f64;
        for gy in 0..metrics.height {
            let row_y = glyph_top + gy as f64;
            let skew = if props.italic {
                (baseline_y - row_y) * ITALIC_SKEW
            } else {
                0.0
            };
            for gx in 0..metrics.width {
                let value = coverage[gy * metrics.width + gx];
                if value == 0 {
                    continue;
                }
                let src = color.premultiplied_with(value);
                let x = (glyph_left + skew + gx as f64).round() as i64;
                let y = row_y.round() as i64;
                blend_glyph_pixel(scratch, x, y, src);
                if props.bold {
                    blend_glyph_pixel(scratch, x + 1, y, src);
                }
            }
        }
        pen_x += metrics.advance_width as f64 + props.letter_spacing;
        if props.bold {
            pen_x += 1.0;
        }
    }
}

fn blend_glyph_pixel(scratch: &mut Bitmap, x: i64, y: i64, src: [u8; 4]) {
    if x < 0 || y < 0 || x >= scratch.width() as i64 || y >= scratch.height() as i64 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    let blended = over(scratch.pixel(x, y), src);
    scratch.put_pixel(x, y, blended);
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
