//! Caption text: a built-in 5x7 bitmap font and optional TrueType faces
//!
//! Bitmap glyphs cover printable ASCII. Each glyph is five column bytes, least
//! significant bit at the top. A point size is mapped to an integer pixel
//! scale so the renderer can keep the familiar 12/14/18/24 sizes.
//!
//! [`Typeface`] picks between the bitmap font and a font file loaded from
//! disk, rasterized with `ab_glyph`.

use ab_glyph::{point, Font, FontArc, GlyphId, InvalidFont, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::composition::blend_pixel;

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;

/// Blank column between glyphs, in unscaled pixels.
const GLYPH_SPACING: u32 = 1;

const FIRST_GLYPH: char = ' ';

/// Printable ASCII `' '..='~'`.
#[rustfmt::skip]
const GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x56, 0x20, 0x50], // &
    [0x00, 0x08, 0x07, 0x03, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x2A, 0x1C, 0x7F, 0x1C, 0x2A], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x02, 0x01, 0x02, 0x04, 0x02], // ~
];

fn glyph(c: char) -> &'static [u8; 5] {
    let index = (c as u32).wrapping_sub(FIRST_GLYPH as u32) as usize;
    GLYPHS.get(index).unwrap_or(&GLYPHS[('?' as u32 - FIRST_GLYPH as u32) as usize])
}

/// Pixel scale used for a point size: 12 → 1, 14 and 18 → 2, 24 → 3.
pub fn scale_for(size: u32) -> u32 {
    ((size + 3) / 8).max(1)
}

/// Rendered width of `text` in pixels.
pub fn text_width(text: &str, size: u32) -> u32 {
    let count = text.chars().count() as u32;
    if count == 0 {
        return 0;
    }
    let scale = scale_for(size);
    count * (GLYPH_WIDTH + GLYPH_SPACING) * scale - GLYPH_SPACING * scale
}

/// Rendered height of a line in pixels.
pub fn text_height(size: u32) -> u32 {
    GLYPH_HEIGHT * scale_for(size)
}

/// Draw `text` with its top-left corner at `(x, y)`.
///
/// Characters outside printable ASCII are drawn as `?`.
pub fn draw_text(canvas: &mut RgbaImage, x: i64, y: i64, text: &str, size: u32, color: Rgba<u8>) {
    let scale = scale_for(size) as i64;
    let advance = (GLYPH_WIDTH + GLYPH_SPACING) as i64 * scale;

    for (i, c) in text.chars().enumerate() {
        let origin_x = x + i as i64 * advance;
        for (col, bits) in glyph(c).iter().enumerate() {
            for row in 0..GLYPH_HEIGHT as i64 {
                if bits & (1 << row) == 0 {
                    continue;
                }
                let px = origin_x + col as i64 * scale;
                let py = y + row * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        blend_pixel(canvas, px + dx, py + dy, color);
                    }
                }
            }
        }
    }
}

/// Draw `text` with a one-pixel outline: the outline colour at the four
/// diagonal offsets, then the fill on top.
pub fn outline_text(
    canvas: &mut RgbaImage,
    x: i64,
    y: i64,
    text: &str,
    size: u32,
    fill: Rgba<u8>,
    outline: Rgba<u8>,
) {
    for (dx, dy) in [(-1, -1), (1, -1), (-1, 1), (1, 1)] {
        draw_text(canvas, x + dx, y + dy, text, size, outline);
    }
    draw_text(canvas, x, y, text, size, fill);
}

/// Error returned when a font file cannot be used.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("Failed to read font '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid font file '{}'", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: InvalidFont,
    },
}

/// Face used for every caption.
#[derive(Clone, Default)]
pub enum Typeface {
    /// The built-in bitmap font
    #[default]
    Bitmap,
    /// A TrueType or OpenType font
    TrueType(FontArc),
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Typeface::Bitmap => write!(f, "Typeface::Bitmap"),
            Typeface::TrueType(_) => write!(f, "Typeface::TrueType"),
        }
    }
}

impl Typeface {
    /// Load a font file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not a font.
    pub fn load(path: &Path) -> Result<Self, FontError> {
        let bytes = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = FontArc::try_from_vec(bytes).map_err(|source| FontError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            path = %path.display(),
            glyphs = font.glyph_count(),
            "loaded font"
        );
        Ok(Typeface::TrueType(font))
    }

    /// The configured font, or the bitmap font when none is set.
    pub fn from_config(path: Option<&Path>) -> Result<Self, FontError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Typeface::Bitmap),
        }
    }

    /// Rendered width of `text` in pixels.
    pub fn text_width(&self, text: &str, size: u32) -> u32 {
        match self {
            Typeface::Bitmap => text_width(text, size),
            Typeface::TrueType(font) => {
                let scaled = font.as_scaled(PxScale::from(size as f32));
                let mut width = 0.0f32;
                let mut previous: Option<GlyphId> = None;
                for c in text.chars() {
                    let id = scaled.glyph_id(c);
                    if let Some(prev) = previous {
                        width += scaled.kern(prev, id);
                    }
                    width += scaled.h_advance(id);
                    previous = Some(id);
                }
                width.ceil().max(0.0) as u32
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    pub fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        x: i64,
        y: i64,
        text: &str,
        size: u32,
        color: Rgba<u8>,
    ) {
        match self {
            Typeface::Bitmap => draw_text(canvas, x, y, text, size, color),
            Typeface::TrueType(font) => draw_glyphs(font, canvas, x, y, text, size, color),
        }
    }

    /// Draw `text` with a one-pixel outline, as [`outline_text`] does.
    pub fn outline_text(
        &self,
        canvas: &mut RgbaImage,
        x: i64,
        y: i64,
        text: &str,
        size: u32,
        fill: Rgba<u8>,
        outline: Rgba<u8>,
    ) {
        for (dx, dy) in [(-1, -1), (1, -1), (-1, 1), (1, 1)] {
            self.draw_text(canvas, x + dx, y + dy, text, size, outline);
        }
        self.draw_text(canvas, x, y, text, size, fill);
    }
}

/// Rasterize `text` from a font file, the line's ascent below `y`.
fn draw_glyphs(
    font: &FontArc,
    canvas: &mut RgbaImage,
    x: i64,
    y: i64,
    text: &str,
    size: u32,
    color: Rgba<u8>,
) {
    let scaled = font.as_scaled(PxScale::from(size as f32));
    let baseline = y as f32 + scaled.ascent();
    let mut caret = x as f32;
    let mut previous: Option<GlyphId> = None;

    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scaled.scale(), point(caret, baseline));
        caret += scaled.h_advance(id);
        previous = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        let (left, top) = (bounds.min.x as i64, bounds.min.y as i64);
        outlined.draw(|gx, gy, coverage| {
            let alpha = (coverage.clamp(0.0, 1.0) * color[3] as f32).round() as u8;
            if alpha > 0 {
                let tinted = Rgba([color[0], color[1], color[2], alpha]);
                blend_pixel(canvas, left + gx as i64, top + gy as i64, tinted);
            }
        });
    }
}
