//! Pixel-level drawing into RGBA layer buffers.
//!
//! Strokes are rasterized with tiny-skia directly into the layer's bytes.
//! Layer buffers only ever hold fully transparent or fully opaque pixels,
//! so they are valid premultiplied RGBA as tiny-skia expects.

use image::{Rgba, RgbaImage};
use tiny_skia::{
    BlendMode, FillRule, LineCap, LineJoin, Paint, PathBuilder, PixmapMut, Stroke, Transform,
};

use crate::Point;

/// Fully transparent pixel.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Create a fully transparent buffer of the given size.
#[must_use]
pub fn transparent_buffer(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, TRANSPARENT)
}

/// Reset every pixel of `buffer` to fully transparent.
pub fn clear(buffer: &mut RgbaImage) {
    buffer.fill(0);
}

/// Paint a round-capped line segment of the given width.
///
/// Rasterization is hard-edged: a pixel is written with the opaque color
/// when its center falls inside the stroke outline, and left alone
/// otherwise. A zero-length segment paints a dot. Anything outside the
/// buffer is clipped.
///
/// Returns whether a shape was drawn. Degenerate input (an empty buffer,
/// a non-positive width or non-finite coordinates) draws nothing.
pub fn stroke_segment(
    buffer: &mut RgbaImage,
    from: Point,
    to: Point,
    width: f32,
    color: [u8; 4],
) -> bool {
    if width.is_nan() || width <= 0.0 {
        return false;
    }
    let (buf_w, buf_h) = buffer.dimensions();
    let Some(mut pixmap) = PixmapMut::from_bytes(&mut **buffer, buf_w, buf_h) else {
        return false;
    };

    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = false;
    paint.blend_mode = BlendMode::Source;

    let drawn = if from == to {
        // tiny-skia drops zero-length paths, so a dot is filled explicitly.
        match PathBuilder::from_circle(from.x, from.y, width / 2.0) {
            Some(dot) => {
                pixmap.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
                true
            }
            None => false,
        }
    } else {
        let mut builder = PathBuilder::new();
        builder.move_to(from.x, from.y);
        builder.line_to(to.x, to.y);
        match builder.finish() {
            Some(path) => {
                let stroke = Stroke {
                    width,
                    line_cap: LineCap::Round,
                    line_join: LineJoin::Round,
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
                true
            }
            None => false,
        }
    };

    tracing::trace!(
        "Stroke segment ({}, {}) -> ({}, {}) width {width}: drawn={drawn}",
        from.x,
        from.y,
        to.x,
        to.y
    );
    drawn
}
