//! Criterion benchmarks for teamcard critical paths
//!
//! Benchmarks the operations a bot hits on every request:
//! - Tokenizer: single slot strings
//! - Parser: whole builds against a catalog
//! - Color: text colour parsing (hex and CSS)
//! - Renderer: builds to trimmed images
//! - Composition: trimming and portrait resizing

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgba, RgbaImage};
use teamcard::catalog::Catalog;
use teamcard::color::parse_color;
use teamcard::composition::{resize_bilinear, trim};
use teamcard::latent::LATENTS;
use teamcard::models::{CardId, Entity, EntityType, Instruction};
use teamcard::parser::parse;
use teamcard::registry::{Badge, SpriteKey, SpriteRegistry};
use teamcard::renderer::render;
use teamcard::tokenizer::tokenize;

// =============================================================================
// Test Data Generators
// =============================================================================

const NAMES: [&str; 8] = [
    "bj", "weld", "zela", "amen", "eir", "dios", "tengu", "mnoah",
];

/// A catalog of eight plain entities with ids 1..=8.
fn make_catalog() -> Catalog {
    let entities = NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| Entity {
            id: i as u32 + 1,
            name: name.to_string(),
            aliases: vec![],
            inheritable: true,
            types: vec![EntityType::God, EntityType::Attacker],
            max_level: 99,
            limit_break: Some(1.5),
            skill_cooldown: None,
            awakenings: vec![1, 2, 3, 4, 5, 6, 7, 8, 9],
            super_awakening_count: 0,
            attribute: None,
        })
        .collect();
    Catalog::new(entities)
}

/// Every sprite the renderer can ask for, as solid colour tiles.
fn make_sprites() -> SpriteRegistry {
    let mut registry = SpriteRegistry::new();
    for id in 1..=NAMES.len() as u32 {
        let shade = (id * 30) as u8;
        registry.register(
            SpriteKey::Portrait(CardId::Entity(id)),
            RgbaImage::from_pixel(100, 100, Rgba([shade, 100, 255 - shade, 255])),
        );
    }
    registry.register(
        SpriteKey::Portrait(CardId::DelayBuffer),
        RgbaImage::from_pixel(100, 100, Rgba([90, 90, 90, 255])),
    );
    for (latent, _) in LATENTS {
        let width = if latent.is_two_slot() { 50 } else { 25 };
        registry.register(
            SpriteKey::Latent(latent),
            RgbaImage::from_pixel(width, 25, Rgba([0, 120, 0, 255])),
        );
    }
    registry.register(
        SpriteKey::Badge(Badge::FullyAwakened),
        RgbaImage::from_pixel(20, 20, Rgba([255, 215, 0, 255])),
    );
    registry.register(
        SpriteKey::Badge(Badge::InProgress),
        RgbaImage::from_pixel(20, 20, Rgba([60, 60, 60, 255])),
    );
    registry
}

/// A team of `slots` cards, each with an assist and a latent list.
fn make_team(slots: usize) -> String {
    (0..slots)
        .map(|i| {
            format!(
                "{}({}|lv110)[sdr*2, dek]|lv110 slv5 +297",
                NAMES[i % NAMES.len()],
                NAMES[(i + 1) % NAMES.len()]
            )
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn make_build(teams: usize) -> String {
    (0..teams)
        .map(|_| make_team(5))
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Tokenizer Benchmarks
// =============================================================================

fn bench_tokenizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenizer");

    group.bench_function("tokenize_name_only", |b| {
        b.iter(|| tokenize(black_box("blue jeanne")))
    });

    group.bench_function("tokenize_full_slot", |b| {
        b.iter(|| {
            tokenize(black_box(
                "dmeta(uruka|lv110+297slvmax)[sdr*4,dek]|+h33+a66+r99lv110slv15",
            ))
        })
    });

    group.bench_function("tokenize_unknown_text", |b| {
        b.iter(|| tokenize(black_box("bj(weld)lv110 ??? trailing")))
    });

    group.finish();
}

// =============================================================================
// Parser Benchmarks
// =============================================================================

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");
    let catalog = make_catalog();

    for teams in [1, 2, 3] {
        let input = make_build(teams);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_teams", teams), &input, |b, input| {
            b.iter(|| parse(black_box(input), &catalog))
        });
    }

    group.bench_function("parse_repeat", |b| {
        b.iter(|| {
            parse(
                black_box("zela(amen)*3/bj*2/zela; zela(amen)*4/zela; zela*6"),
                &catalog,
            )
        })
    });

    group.finish();
}

// =============================================================================
// Color Parsing Benchmarks
// =============================================================================

fn bench_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("color");

    group.bench_function("parse_hex_6", |b| {
        b.iter(|| parse_color(black_box("#FFD700")))
    });
    group.bench_function("parse_named", |b| {
        b.iter(|| parse_color(black_box("lightblue")))
    });
    group.bench_function("parse_rgb_modern", |b| {
        b.iter(|| parse_color(black_box("rgb(255 192 203 / 80%)")))
    });

    group.finish();
}

// =============================================================================
// Renderer Benchmarks
// =============================================================================

fn bench_renderer(c: &mut Criterion) {
    let mut group = c.benchmark_group("renderer");
    let catalog = make_catalog();
    let sprites = make_sprites();

    for teams in [1, 3] {
        let build = match parse(&make_build(teams), &catalog) {
            Ok(build) => build,
            Err(e) => panic!("benchmark build should parse: {}", e),
        };
        group.bench_with_input(BenchmarkId::new("render_teams", teams), &build, |b, build| {
            b.iter(|| render(black_box(build), &sprites, false))
        });
    }

    let mut build = match parse(&make_build(1), &catalog) {
        Ok(build) => build,
        Err(e) => panic!("benchmark build should parse: {}", e),
    };
    build.instructions = Some(
        (0..4)
            .map(|floor| Instruction {
                floor,
                player: floor % 2,
                active: Some(vec![vec![0, 2, 4]]),
                action: "Burst and clear".to_string(),
            })
            .collect(),
    );
    group.bench_function("render_with_instructions", |b| {
        b.iter(|| render(black_box(&build), &sprites, true))
    });

    group.finish();
}

// =============================================================================
// Composition Benchmarks
// =============================================================================

fn bench_composition(c: &mut Criterion) {
    let mut group = c.benchmark_group("composition");

    let mut canvas = RgbaImage::from_pixel(620, 510, Rgba([255, 255, 255, 0]));
    for x in 40..500 {
        for y in 30..400 {
            canvas.put_pixel(x, y, Rgba([10, 20, 30, 255]));
        }
    }
    group.bench_function("trim_620x510", |b| b.iter(|| trim(black_box(&canvas))));

    let portrait = RgbaImage::from_pixel(100, 100, Rgba([200, 50, 50, 255]));
    group.bench_function("resize_thumbnail", |b| {
        b.iter(|| resize_bilinear(black_box(&portrait), 50, 50))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_tokenizer,
    bench_parser,
    bench_color,
    bench_renderer,
    bench_composition
);
criterion_main!(benches);
