//! End-to-end rendering tests
//!
//! Parse a build, render it against an in-memory sprite registry and check
//! the trimmed image dimensions and a few sampled pixels.

mod common;

use image::{Rgba, RgbaImage};
use teamcard::composition::BACKGROUND;
use teamcard::models::{Build, Instruction};
use teamcard::{parse, render, RenderError};

fn render_shorthand(input: &str) -> RgbaImage {
    let build = parse(input, &common::catalog()).unwrap();
    render(&build, &common::sprites(), false)
        .unwrap()
        .expect("build should produce an image")
}

fn step(active: Vec<Vec<usize>>, action: &str) -> Instruction {
    Instruction {
        floor: 1,
        player: 0,
        active: Some(active),
        action: action.to_string(),
    }
}

#[test]
fn test_single_card() {
    let image = render_shorthand("bj");
    assert_eq!(image.dimensions(), (100, 100));
    assert_eq!(*image.get_pixel(50, 50), common::portrait_color(2657));
}

#[test]
fn test_two_teams_stack_vertically() {
    let image = render_shorthand("bj/weld; zela");
    // Two columns plus one padding gap; second team starts after PW + 2*PAD
    assert_eq!(image.dimensions(), (210, 220));
    assert_eq!(*image.get_pixel(50, 50), common::portrait_color(2657));
    assert_eq!(*image.get_pixel(160, 50), common::portrait_color(3264));
    assert_eq!(*image.get_pixel(105, 50), BACKGROUND);
    assert_eq!(*image.get_pixel(50, 110), BACKGROUND);
    assert_eq!(*image.get_pixel(50, 170), common::portrait_color(3490));
}

#[test]
fn test_assists_sit_above_mains() {
    let image = render_shorthand("bj(weld)*2");
    assert_eq!(image.dimensions(), (210, 200));
    assert_eq!(*image.get_pixel(50, 50), common::portrait_color(3264));
    assert_eq!(*image.get_pixel(50, 150), common::portrait_color(2657));
    assert_eq!(*image.get_pixel(160, 50), common::portrait_color(3264));
}

#[test]
fn test_empty_assist_renders_placeholder() {
    let image = render_shorthand("bj()");
    assert_eq!(*image.get_pixel(50, 50), common::PLACEHOLDER);
}

#[test]
fn test_latent_strip_under_main() {
    let image = render_shorthand("eir[sdr, dek]");
    // Tile plus one row of latent icons
    assert_eq!(image.dimensions(), (100, 125));
    assert_eq!(*image.get_pixel(10, 110), common::LATENT);
    assert_eq!(*image.get_pixel(70, 110), common::LATENT);
    assert_eq!(*image.get_pixel(90, 110), BACKGROUND);
}

#[test]
fn test_star_badge_on_fully_awakened_card() {
    let image = render_shorthand("bj");
    // 20px badge inset 5px from the top-right corner
    assert_eq!(*image.get_pixel(76, 6), common::STAR);
    assert_eq!(*image.get_pixel(93, 23), common::STAR);
    assert_eq!(*image.get_pixel(97, 23), common::portrait_color(2657));
}

#[test]
fn test_circle_badge_when_partly_awakened() {
    let image = render_shorthand("bj|aw3");
    assert_eq!(*image.get_pixel(93, 23), common::CIRCLE);
    assert!(
        (83..93).any(|x| (5..18).any(|y| {
            let p = image.get_pixel(x, y);
            *p != common::CIRCLE && *p != Rgba([0, 0, 0, 255])
        })),
        "the awakening count should be drawn on the circle"
    );
}

#[test]
fn test_no_badge_without_awakenings() {
    let image = render_shorthand("locked");
    assert_eq!(*image.get_pixel(93, 23), common::portrait_color(1000));
    assert_eq!(*image.get_pixel(76, 6), common::portrait_color(1000));
}

#[test]
fn test_super_badge_only_on_single_team_builds() {
    let single = render_shorthand("bj|sa1");
    assert_eq!(single.dimensions(), (100, 100));
    assert_eq!(*single.get_pixel(83, 50), common::SUPER);

    let two = render_shorthand("bj|sa1; weld");
    assert_eq!(*two.get_pixel(83, 50), common::portrait_color(2657));
    assert_eq!(*two.get_pixel(93, 23), common::STAR);
}

#[test]
fn test_full_width_team() {
    let image = render_shorthand("bj*6");
    assert_eq!(image.dimensions(), (620, 100));
    // A second padding gap opens before the sixth column
    assert_eq!(*image.get_pixel(515, 50), BACKGROUND);
    assert_eq!(*image.get_pixel(570, 50), common::portrait_color(2657));
}

#[test]
fn test_instructions_extend_the_image() {
    let mut build = parse("bj*6", &common::catalog()).unwrap();
    build.instructions = Some(vec![step(vec![vec![0]], "attack")]);

    let without = render(&build, &common::sprites(), false).unwrap().unwrap();
    assert_eq!(without.dimensions(), (620, 100));

    let with = render(&build, &common::sprites(), true).unwrap().unwrap();
    assert_eq!(with.dimensions(), (620, 150));
    assert_eq!(with.get_pixel(185, 125)[3], 255);
}

#[test]
fn test_instruction_reference_out_of_range() {
    let mut build = parse("bj", &common::catalog()).unwrap();
    build.instructions = Some(vec![
        step(vec![vec![0]], "ok"),
        step(vec![vec![], vec![0]], "bad"),
    ]);

    let err = render(&build, &common::sprites(), true).unwrap_err();
    match err {
        RenderError::InstructionRef { step, team, index } => {
            assert_eq!((step, team, index), (1, 1, 0));
        }
        other => panic!("expected instruction error, got {:?}", other),
    }
}

#[test]
fn test_empty_build_has_no_image() {
    let build = Build::new("nothing");
    assert!(render(&build, &common::sprites(), false).unwrap().is_none());

    let build = parse("  ;  ", &common::catalog()).unwrap();
    assert!(build.is_empty());
    assert!(render(&build, &common::sprites(), false).unwrap().is_none());
}

#[test]
fn test_missing_sprite_is_an_error() {
    let build = parse("bj", &common::catalog()).unwrap();
    let empty = teamcard::registry::SpriteRegistry::new();
    let err = render(&build, &empty, false).unwrap_err();
    assert!(matches!(err, RenderError::Asset(_)));
}
