//! Shared fixtures for integration tests: a small entity catalog and a
//! sprite registry covering every sprite the renderer can ask for.

#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use teamcard::catalog::Catalog;
use teamcard::latent::LATENTS;
use teamcard::models::CardId;
use teamcard::registry::{Badge, SpriteKey, SpriteRegistry};

pub const CATALOG_JSON: &str = r#"[
    {"id": 2657, "name": "Blue Jeanne", "aliases": ["bj"], "types": ["God", "Devil"],
     "limit_break": 1.5, "skill_cooldown": {"min": 8, "max": 22},
     "awakenings": [1, 2, 3, 4, 5, 6, 7, 8, 9, 2765, 2770], "super_awakening_count": 2,
     "attribute": "water"},
    {"id": 3264, "name": "Weld", "aliases": ["weld"], "types": ["Physical"],
     "awakenings": [10, 11, 12], "attribute": "water"},
    {"id": 4019, "name": "Chocolate", "aliases": ["chocolate"], "types": ["Balance"],
     "awakenings": [10], "attribute": "fire"},
    {"id": 3140, "name": "Eir", "aliases": ["eir"], "types": ["Attacker"],
     "max_level": 99, "awakenings": [1, 2, 3, 4, 5], "attribute": "light"},
    {"id": 3490, "name": "Zela", "aliases": ["zela"], "types": ["Dragon", "Physical"],
     "awakenings": [1, 2, 3, 4, 5, 6, 7, 8, 9], "attribute": "dark"},
    {"id": 2130, "name": "Green Light Medjed", "aliases": ["g/l medjed"], "types": ["God"],
     "awakenings": [1, 2], "attribute": "wood"},
    {"id": 1000, "name": "Locked Evo", "aliases": ["locked"], "inheritable": false,
     "types": ["Evolve"], "max_level": 30}
]"#;

pub fn catalog() -> Catalog {
    Catalog::from_reader(CATALOG_JSON.as_bytes()).expect("fixture catalog parses")
}

pub const PORTRAIT_IDS: [u32; 7] = [2657, 3264, 4019, 3140, 3490, 2130, 1000];

/// Sprite colours, one per kind of tile.
pub const PLACEHOLDER: Rgba<u8> = Rgba([90, 90, 90, 255]);
pub const LATENT: Rgba<u8> = Rgba([0, 120, 0, 255]);
pub const STAR: Rgba<u8> = Rgba([255, 215, 0, 255]);
pub const CIRCLE: Rgba<u8> = Rgba([60, 60, 60, 255]);
pub const SUPER: Rgba<u8> = Rgba([200, 0, 200, 255]);

/// A distinct opaque colour per portrait id.
pub fn portrait_color(id: u32) -> Rgba<u8> {
    Rgba([(id % 251) as u8, (id % 13) as u8 * 10, 200, 255])
}

fn latent_icon(two_slot: bool) -> RgbaImage {
    let width = if two_slot { 50 } else { 25 };
    RgbaImage::from_pixel(width, 25, LATENT)
}

pub fn sprites() -> SpriteRegistry {
    let mut registry = SpriteRegistry::new();
    for id in PORTRAIT_IDS {
        registry.register(
            SpriteKey::Portrait(CardId::Entity(id)),
            RgbaImage::from_pixel(100, 100, portrait_color(id)),
        );
    }
    registry.register(
        SpriteKey::Portrait(CardId::DelayBuffer),
        RgbaImage::from_pixel(100, 100, PLACEHOLDER),
    );
    for (latent, _) in LATENTS {
        registry.register(SpriteKey::Latent(latent), latent_icon(latent.is_two_slot()));
    }
    registry.register(
        SpriteKey::Badge(Badge::FullyAwakened),
        RgbaImage::from_pixel(20, 20, STAR),
    );
    registry.register(
        SpriteKey::Badge(Badge::InProgress),
        RgbaImage::from_pixel(20, 20, CIRCLE),
    );
    for slot in 3..=66 {
        registry.register(
            SpriteKey::Awakening(slot),
            RgbaImage::from_pixel(24, 24, SUPER),
        );
    }
    registry
}

/// Lay out `assets/` and `portraits/` under `root` the way the binary
/// expects them, and write the fixture catalog to `root/catalog.json`.
pub fn write_asset_tree(root: &std::path::Path) {
    let assets = root.join("assets");
    let portraits = root.join("portraits");
    std::fs::create_dir_all(assets.join("lat")).unwrap();
    std::fs::create_dir_all(assets.join("awk")).unwrap();
    std::fs::create_dir_all(&portraits).unwrap();

    let save = |image: RgbaImage, path: std::path::PathBuf| image.save(path).unwrap();
    for id in PORTRAIT_IDS {
        let path = portraits.join(format!("{}.png", id));
        save(RgbaImage::from_pixel(100, 100, portrait_color(id)), path);
    }
    save(
        RgbaImage::from_pixel(100, 100, PLACEHOLDER),
        assets.join("delay_buffer.png"),
    );
    save(RgbaImage::from_pixel(20, 20, STAR), assets.join("star.png"));
    save(
        RgbaImage::from_pixel(20, 20, CIRCLE),
        assets.join("circle.png"),
    );
    for (latent, _) in LATENTS {
        let path = assets.join("lat").join(format!("{}.png", latent.name()));
        save(latent_icon(latent.is_two_slot()), path);
    }
    for slot in 3..=66 {
        let path = assets.join("awk").join(format!("{}.png", slot));
        save(RgbaImage::from_pixel(24, 24, SUPER), path);
    }

    std::fs::write(root.join("catalog.json"), CATALOG_JSON).unwrap();
}
