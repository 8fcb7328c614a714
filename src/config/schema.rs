//! Configuration schema types for `teamcard.toml`
//!
//! Defines the structure and validation rules for renderer configuration.

use image::Rgba;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::color::parse_color;
use crate::font::{FontError, Typeface};
use crate::renderer::{RenderParams, TextPalette};

/// Tile and strip dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Width and height of a portrait tile
    #[serde(default = "default_portrait_width")]
    pub portrait_width: u32,
    /// Gap between teams and column groups
    #[serde(default = "default_padding")]
    pub padding: u32,
    /// Width of a single-slot latent icon
    #[serde(default = "default_latents_width")]
    pub latents_width: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            portrait_width: default_portrait_width(),
            padding: default_padding(),
            latents_width: default_latents_width(),
        }
    }
}

fn default_portrait_width() -> u32 {
    100
}

fn default_padding() -> u32 {
    10
}

fn default_latents_width() -> u32 {
    25
}

/// Where sprites are read from and images written to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Latent icons, badges and the delay-buffer placeholder
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
    /// Portraits named `<id>.png`
    #[serde(default = "default_portrait_dir")]
    pub portrait_dir: PathBuf,
    /// Directory rendered images are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
            portrait_dir: default_portrait_dir(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_portrait_dir() -> PathBuf {
    PathBuf::from("assets/portraits")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Entity catalog location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("catalog.json")
}

/// Caption font and text overlay colours, as hex or CSS colour names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextConfig {
    /// TrueType/OpenType font file; the built-in bitmap font when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,
    #[serde(default = "default_plus")]
    pub plus: String,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_skill")]
    pub skill: String,
    #[serde(default = "default_id")]
    pub id: String,
    /// Awakening count on the in-progress badge
    #[serde(default = "default_count")]
    pub count: String,
    #[serde(default = "default_outline")]
    pub outline: String,
    #[serde(default = "default_instruction")]
    pub instruction: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font: None,
            plus: default_plus(),
            level: default_level(),
            skill: default_skill(),
            id: default_id(),
            count: default_count(),
            outline: default_outline(),
            instruction: default_instruction(),
        }
    }
}

fn default_plus() -> String {
    "yellow".to_string()
}

fn default_level() -> String {
    "white".to_string()
}

fn default_skill() -> String {
    "pink".to_string()
}

fn default_id() -> String {
    "lightblue".to_string()
}

fn default_count() -> String {
    "yellow".to_string()
}

fn default_outline() -> String {
    "black".to_string()
}

fn default_instruction() -> String {
    "white".to_string()
}

impl TextConfig {
    fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("plus", &self.plus),
            ("level", &self.level),
            ("skill", &self.skill),
            ("id", &self.id),
            ("count", &self.count),
            ("outline", &self.outline),
            ("instruction", &self.instruction),
        ]
    }

    /// Resolve every colour; unparseable entries keep the default colour.
    pub fn palette(&self) -> TextPalette {
        let fallback = TextPalette::default();
        let resolve = |s: &str, default: Rgba<u8>| parse_color(s).unwrap_or(default);
        TextPalette {
            plus: resolve(&self.plus, fallback.plus),
            level: resolve(&self.level, fallback.level),
            skill: resolve(&self.skill, fallback.skill),
            id: resolve(&self.id, fallback.id),
            count: resolve(&self.count, fallback.count),
            outline: resolve(&self.outline, fallback.outline),
            instruction: resolve(&self.instruction, fallback.instruction),
        }
    }
}

/// Complete teamcard.toml configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamcardConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub text: TextConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "text.plus")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "teamcard.toml: '{}' {}", self.field, self.message)
    }
}

impl TeamcardConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        let sizes = [
            ("layout.portrait_width", self.layout.portrait_width),
            ("layout.latents_width", self.layout.latents_width),
        ];
        for (field, value) in sizes {
            if value == 0 {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "must be a positive integer".to_string(),
                });
            }
        }

        for (name, value) in self.text.entries() {
            if let Err(e) = parse_color(value) {
                errors.push(ConfigValidationError {
                    field: format!("text.{}", name),
                    message: format!("is not a colour: {}", e),
                });
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// The caption typeface: the configured font file, else the bitmap font.
    ///
    /// # Errors
    ///
    /// Fails when the configured font cannot be read or parsed.
    pub fn typeface(&self) -> Result<Typeface, FontError> {
        Typeface::from_config(self.text.font.as_deref())
    }

    /// Layout and colours for the renderer.
    pub fn render_params(&self) -> RenderParams {
        RenderParams {
            portrait_width: self.layout.portrait_width,
            padding: self.layout.padding,
            latents_width: self.layout.latents_width,
            text: self.text.palette(),
        }
    }
}
