//! Build shorthand parsing tests
//!
//! Parse complete builds against a small fixture catalog and check the
//! normalized card records that come out.

mod common;

use teamcard::latent::Latent;
use teamcard::models::{CardId, PlusStats, Role};
use teamcard::{parse, parse_named, ParseError};

#[test]
fn test_main_with_assist_and_level() {
    let build = parse("bj(weld)lv110", &common::catalog()).unwrap();
    assert_eq!(build.teams.len(), 1);

    let slot = &build.teams[0].slots[0];
    assert_eq!(slot.main.id, CardId::Entity(2657));
    assert_eq!(slot.main.role, Role::Main);
    assert_eq!(slot.main.level, 110);
    assert_eq!(slot.main.plus, PlusStats::MAXED);

    let assist = slot.assist.as_ref().unwrap();
    assert_eq!(assist.id, CardId::Entity(3264));
    assert_eq!(assist.role, Role::Assist);
    assert_eq!(assist.level, 1);
    assert_eq!(assist.plus, PlusStats::ZERO);
    assert!(assist.on_color);
}

#[test]
fn test_level_capped_without_limit_break() {
    let build = parse("weld|lv110; eir|lv110", &common::catalog()).unwrap();
    assert_eq!(build.teams[0].slots[0].main.level, 99);
    assert_eq!(build.teams[1].slots[0].main.level, 99);
}

#[test]
fn test_unrelated_killers_dropped() {
    let build = parse("eir[drk,drk,sdr]", &common::catalog()).unwrap();
    assert_eq!(
        build.teams[0].slots[0].main.latents,
        vec![Latent::SkillDelayResist]
    );
}

#[test]
fn test_matching_killers_kept() {
    let build = parse("eir[sdr *4, dek]", &common::catalog()).unwrap();
    let latents = &build.teams[0].slots[0].main.latents;
    assert_eq!(latents.len(), 5);
    assert_eq!(latents[4], Latent::DevilKiller);
}

#[test]
fn test_balance_type_allows_any_killer() {
    let build = parse("chocolate[drk, gok, mak]", &common::catalog()).unwrap();
    assert_eq!(build.teams[0].slots[0].main.latents.len(), 3);
}

#[test]
fn test_fourth_team_is_never_parsed() {
    // An unresolvable fourth team would be a lookup error if it were read
    let build = parse("bj; weld; zela; nobody at all", &common::catalog()).unwrap();
    assert_eq!(build.teams.len(), 3);
    assert_eq!(build.teams[2].slots[0].main.id, CardId::Entity(3490));
}

#[test]
fn test_newline_separates_teams() {
    let build = parse("bj/weld\n\nzela", &common::catalog()).unwrap();
    assert_eq!(build.teams.len(), 2);
    assert_eq!(build.teams[0].slots.len(), 2);
}

#[test]
fn test_repeat_places_pairs() {
    let build = parse("bj(weld)*3", &common::catalog()).unwrap();
    let team = &build.teams[0];
    assert_eq!(team.slots.len(), 3);
    assert_eq!(team.placement_count(), 6);
    for index in 0..6 {
        let card = team.card_at(index).unwrap();
        let expected = if index % 2 == 0 { 2657 } else { 3264 };
        assert_eq!(card.id, CardId::Entity(expected), "placement {}", index);
    }
}

#[test]
fn test_odd_team_count_keeps_six_slots() {
    let build = parse("zela*6/bj", &common::catalog()).unwrap();
    assert_eq!(build.teams[0].slots.len(), 6);
}

#[test]
fn test_even_team_count_truncates_to_five_slots() {
    let build = parse("zela*6/bj; weld", &common::catalog()).unwrap();
    assert_eq!(build.teams[0].slots.len(), 5);
    assert_eq!(build.teams[1].slots.len(), 1);
}

#[test]
fn test_quoted_slot_with_separator() {
    let build = parse(r#""g/l medjed(weld)" / bj"#, &common::catalog()).unwrap();
    let team = &build.teams[0];
    assert_eq!(team.slots.len(), 2);
    assert_eq!(team.slots[0].main.id, CardId::Entity(2130));

    let assist = team.slots[0].assist.as_ref().unwrap();
    assert_eq!(assist.id, CardId::Entity(3264));
    assert!(!assist.on_color, "wood main with a water assist");
    assert_eq!(team.slots[1].main.id, CardId::Entity(2657));
}

#[test]
fn test_empty_assist_is_placeholder() {
    let build = parse("bj()", &common::catalog()).unwrap();
    let assist = build.teams[0].slots[0].assist.as_ref().unwrap();
    assert!(assist.is_placeholder());
    assert!(assist.latents.is_empty());
}

#[test]
fn test_delay_buffer_main() {
    let build = parse("sdr/bj", &common::catalog()).unwrap();
    assert_eq!(build.teams[0].slots[0].main.id, CardId::DelayBuffer);
}

#[test]
fn test_empty_slots_are_skipped() {
    let build = parse("bj//|lv50/weld", &common::catalog()).unwrap();
    assert_eq!(build.teams[0].slots.len(), 2);
}

#[test]
fn test_non_inheritable_cards() {
    let build = parse("locked/bj(locked)", &common::catalog()).unwrap();
    let team = &build.teams[0];
    assert!(!team.slots[0].main.gold_star);
    assert!(team.slots[1].assist.is_none());
}

#[test]
fn test_super_awakening_raises_level() {
    let build = parse("bj|sa2|lv90", &common::catalog()).unwrap();
    let main = &build.teams[0].slots[0].main;
    assert_eq!(main.super_awakening, 8);
    assert_eq!(main.level, 100);
}

#[test]
fn test_plus_all_snaps_stats() {
    let build = parse("bj|+h50 +150 / bj|+297|+h10", &common::catalog()).unwrap();
    assert_eq!(build.teams[0].slots[0].main.plus, PlusStats::ZERO);
    assert_eq!(build.teams[0].slots[1].main.plus, PlusStats::MAXED);
}

#[test]
fn test_lookup_error_aborts_build() {
    let err = parse("bj/weld; nobody", &common::catalog()).unwrap_err();
    match err {
        ParseError::Lookup { name, .. } => assert_eq!(name, "nobody"),
        other => panic!("expected lookup error, got {:?}", other),
    }
}

#[test]
fn test_unknown_text_aborts_build() {
    let err = parse("bj(weld)%%", &common::catalog()).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnknownText {
            text: "%%".to_string(),
            position: 8
        }
    );
}

#[test]
fn test_named_build_serializes() {
    let build = parse_named("bj(weld)", "floor 3", &common::catalog()).unwrap();
    assert_eq!(build.name, "floor 3");

    let json = serde_json::to_value(&build).unwrap();
    assert_eq!(json["name"], "floor 3");
    assert!(json.get("instructions").is_none());
    assert_eq!(json["teams"][0]["slots"][0]["main"]["level"], 99);
}
