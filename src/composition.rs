//! Pixel-level compositing: pasting sprites onto the canvas, alpha blending,
//! resizing and auto-trim.
//!
//! Coordinates are signed so that sprites may start above or left of the
//! canvas; anything outside the canvas is clipped.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Canvas background: fully transparent white.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Per-channel difference from the background above which a pixel counts as
/// content when trimming.
pub const TRIM_THRESHOLD: u8 = 100;

/// Create a canvas filled with [`BACKGROUND`].
pub fn blank_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, BACKGROUND)
}

/// Visit every sprite pixel that lands on the canvas.
fn for_each_visible<F>(
    canvas: &mut RgbaImage,
    sprite: &RgbaImage,
    x: i64,
    y: i64,
    mut f: F,
) where
    F: FnMut(&mut Rgba<u8>, &Rgba<u8>),
{
    let (canvas_width, canvas_height) = (canvas.width() as i64, canvas.height() as i64);

    for (sx, sy, src) in sprite.enumerate_pixels() {
        let dest_x = x + sx as i64;
        let dest_y = y + sy as i64;
        if dest_x < 0 || dest_y < 0 || dest_x >= canvas_width || dest_y >= canvas_height {
            continue;
        }
        f(canvas.get_pixel_mut(dest_x as u32, dest_y as u32), src);
    }
}

/// Copy a sprite onto the canvas, replacing the pixels underneath
/// (transparency included).
pub fn paste(canvas: &mut RgbaImage, sprite: &RgbaImage, x: i64, y: i64) {
    for_each_visible(canvas, sprite, x, y, |dst, src| *dst = *src);
}

/// Draw a sprite over the canvas using its alpha channel.
pub fn overlay(canvas: &mut RgbaImage, sprite: &RgbaImage, x: i64, y: i64) {
    for_each_visible(canvas, sprite, x, y, |dst, src| match src[3] {
        0 => {}
        255 => *dst = *src,
        _ => *dst = alpha_blend(src, dst),
    });
}

/// Blend a single colour onto one canvas pixel, ignoring out-of-bounds
/// coordinates.
pub fn blend_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    *dst = alpha_blend(&color, dst);
}

/// Alpha blend source over destination
pub fn alpha_blend(src: &Rgba<u8>, dst: &Rgba<u8>) -> Rgba<u8> {
    let src_a = src[3] as f32 / 255.0;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let s_f = s as f32 / 255.0;
        let d_f = d as f32 / 255.0;
        let out = (s_f * src_a + d_f * dst_a * (1.0 - src_a)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

/// Resize to an exact size with bilinear filtering (thumbnails).
pub fn resize_bilinear(sprite: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if sprite.dimensions() == (width, height) {
        return sprite.clone();
    }
    imageops::resize(sprite, width, height, FilterType::Triangle)
}

/// Resize to an exact size with nearest-neighbour filtering (icons that are
/// not drawn at their native size).
pub fn resize_nearest(sprite: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if sprite.dimensions() == (width, height) {
        return sprite.clone();
    }
    imageops::resize(sprite, width, height, FilterType::Nearest)
}

fn is_content(pixel: &Rgba<u8>) -> bool {
    pixel
        .0
        .iter()
        .zip(BACKGROUND.0.iter())
        .any(|(p, b)| p.abs_diff(*b) > TRIM_THRESHOLD)
}

/// Bounding box `(x, y, width, height)` of every pixel that differs from the
/// background by more than [`TRIM_THRESHOLD`] in any channel.
pub fn content_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;

    for (x, y, pixel) in image.enumerate_pixels() {
        if !is_content(pixel) {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    bounds.map(|(x0, y0, x1, y1)| (x0, y0, x1 - x0 + 1, y1 - y0 + 1))
}

/// Crop an image to its content; `None` when nothing is left.
pub fn trim(image: &RgbaImage) -> Option<RgbaImage> {
    let (x, y, width, height) = content_bounds(image)?;
    Some(imageops::crop_imm(image, x, y, width, height).to_image())
}
