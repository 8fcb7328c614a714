//! Sprite stores: where portraits, latent icons and badges come from
//!
//! The renderer only talks to [`SpriteStore`]. [`AssetDir`] reads PNGs from
//! disk on every request; [`SpriteRegistry`] holds images in memory and is
//! what tests and embedders use.

use image::RgbaImage;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::latent::Latent;
use crate::models::CardId;

/// Awakening badge drawn in a tile's top-right corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    /// Star shown when every regular awakening is unlocked
    FullyAwakened,
    /// Circle the awakening count is written on
    InProgress,
}

/// Error returned when a sprite cannot be produced.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to load '{}': {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Missing sprite: {0}")]
    Missing(String),
}

/// Source of every image the renderer composites.
pub trait SpriteStore: Sync {
    fn portrait(&self, id: CardId) -> Result<RgbaImage, AssetError>;
    fn latent_icon(&self, latent: Latent) -> Result<RgbaImage, AssetError>;
    /// Super-awakening icon by translated slot number
    fn awakening_badge(&self, slot: u32) -> Result<RgbaImage, AssetError>;
    fn badge(&self, badge: Badge) -> Result<RgbaImage, AssetError>;
}

/// Sprites laid out on disk:
///
/// ```text
/// <assets_dir>/lat/<name>.png
/// <assets_dir>/awk/<slot>.png
/// <assets_dir>/star.png
/// <assets_dir>/circle.png
/// <assets_dir>/delay_buffer.png
/// <portrait_dir>/<id>.png
/// ```
#[derive(Debug, Clone)]
pub struct AssetDir {
    assets_dir: PathBuf,
    portrait_dir: PathBuf,
}

impl AssetDir {
    pub fn new(assets_dir: impl Into<PathBuf>, portrait_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            portrait_dir: portrait_dir.into(),
        }
    }

    pub fn portrait_path(&self, id: CardId) -> PathBuf {
        match id {
            CardId::Entity(n) => self.portrait_dir.join(format!("{}.png", n)),
            CardId::DelayBuffer => self.assets_dir.join("delay_buffer.png"),
        }
    }

    /// Latent icons are keyed by their shorthand name, e.g. `lat/hp+.png`.
    pub fn latent_path(&self, latent: Latent) -> PathBuf {
        self.assets_dir.join("lat").join(format!("{}.png", latent.name()))
    }

    pub fn awakening_path(&self, slot: u32) -> PathBuf {
        self.assets_dir.join("awk").join(format!("{}.png", slot))
    }

    pub fn badge_path(&self, badge: Badge) -> PathBuf {
        match badge {
            Badge::FullyAwakened => self.assets_dir.join("star.png"),
            Badge::InProgress => self.assets_dir.join("circle.png"),
        }
    }

    fn load(path: &Path) -> Result<RgbaImage, AssetError> {
        if !path.exists() {
            return Err(AssetError::Missing(path.display().to_string()));
        }
        debug!(path = %path.display(), "loading sprite");
        let image = image::open(path).map_err(|source| AssetError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(image.to_rgba8())
    }
}

impl SpriteStore for AssetDir {
    fn portrait(&self, id: CardId) -> Result<RgbaImage, AssetError> {
        Self::load(&self.portrait_path(id))
    }

    fn latent_icon(&self, latent: Latent) -> Result<RgbaImage, AssetError> {
        Self::load(&self.latent_path(latent))
    }

    fn awakening_badge(&self, slot: u32) -> Result<RgbaImage, AssetError> {
        Self::load(&self.awakening_path(slot))
    }

    fn badge(&self, badge: Badge) -> Result<RgbaImage, AssetError> {
        Self::load(&self.badge_path(badge))
    }
}

/// Key for an in-memory sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    Portrait(CardId),
    Latent(Latent),
    Awakening(u32),
    Badge(Badge),
}

impl fmt::Display for SpriteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpriteKey::Portrait(id) => write!(f, "portrait {}", id),
            SpriteKey::Latent(latent) => write!(f, "latent '{}'", latent.name()),
            SpriteKey::Awakening(slot) => write!(f, "awakening {}", slot),
            SpriteKey::Badge(badge) => write!(f, "badge {:?}", badge),
        }
    }
}

/// In-memory sprite store.
#[derive(Debug, Clone, Default)]
pub struct SpriteRegistry {
    sprites: HashMap<SpriteKey, RgbaImage>,
}

impl SpriteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sprite, replacing any previous image under the same key.
    pub fn register(&mut self, key: SpriteKey, image: RgbaImage) {
        self.sprites.insert(key, image);
    }

    pub fn with(mut self, key: SpriteKey, image: RgbaImage) -> Self {
        self.register(key, image);
        self
    }

    pub fn contains(&self, key: SpriteKey) -> bool {
        self.sprites.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    fn get(&self, key: SpriteKey) -> Result<RgbaImage, AssetError> {
        self.sprites
            .get(&key)
            .cloned()
            .ok_or_else(|| AssetError::Missing(key.to_string()))
    }
}

impl SpriteStore for SpriteRegistry {
    fn portrait(&self, id: CardId) -> Result<RgbaImage, AssetError> {
        self.get(SpriteKey::Portrait(id))
    }

    fn latent_icon(&self, latent: Latent) -> Result<RgbaImage, AssetError> {
        self.get(SpriteKey::Latent(latent))
    }

    fn awakening_badge(&self, slot: u32) -> Result<RgbaImage, AssetError> {
        self.get(SpriteKey::Awakening(slot))
    }

    fn badge(&self, badge: Badge) -> Result<RgbaImage, AssetError> {
        self.get(SpriteKey::Badge(badge))
    }
}
