//! PNG output and file path generation

use image::imageops::FilterType;
use image::{ImageOutputFormat, RgbaImage};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use crate::parser::DEFAULT_BUILD_NAME;

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image encoding error
    Image(image::ImageError),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(path, encode_png(image)?)?;
    Ok(())
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, OutputError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    Ok(bytes)
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// A factor of 0 or 1 returns the image unchanged.
pub fn scale_image(image: RgbaImage, factor: u8) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(
        &image,
        w * factor as u32,
        h * factor as u32,
        FilterType::Nearest,
    )
}

/// Turn a build name into a safe file stem.
///
/// Anything other than ASCII letters, digits, `-` and `_` becomes `_`; an
/// empty name falls back to the default build name.
pub fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        DEFAULT_BUILD_NAME.to_string()
    } else {
        stem
    }
}

/// Generate the output path for a rendered build.
///
/// | Scenario | Output |
/// |----------|--------|
/// | No `-o` | `{output_dir}/{name}.png` |
/// | `-o card.png` | `card.png` |
/// | `-o dir/` or an existing directory | `dir/{name}.png` |
pub fn generate_output_path(
    build_name: &str,
    output_arg: Option<&Path>,
    output_dir: &Path,
) -> PathBuf {
    let file_name = format!("{}.png", file_stem(build_name));
    match output_arg {
        Some(output) => {
            let is_dir = output.as_os_str().to_string_lossy().ends_with('/') || output.is_dir();
            if is_dir {
                output.join(file_name)
            } else {
                output.to_path_buf()
            }
        }
        None => output_dir.join(file_name),
    }
}
