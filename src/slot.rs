//! Slot parsing: tokens to normalized card records
//!
//! A slot resolves to zero or more [`Slot`]s. Empty or nameless slots yield
//! nothing, lexical and lookup failures are errors, and everything else is
//! clamped into range silently.

use tracing::{debug, warn};

use crate::catalog::EntityLookup;
use crate::latent::{validate_latents, Latent};
use crate::models::{
    Attribute, CardId, CardRecord, Entity, PlusStats, Role, Slot, LIMIT_BREAK_LEVEL,
    SUPER_AWAKENING_LEVEL,
};
use crate::parser::ParseError;
use crate::tokenizer::{tokenize, TokenKind};

/// Card name reserved for the delay-buffer placeholder.
pub const DELAY_BUFFER_NAME: &str = "sdr";

/// Awakening effect id to the slot number of its badge graphic.
const SUPER_AWAKENING_SLOTS: [(u32, u32); 64] = [
    (2765, 3), (2766, 4), (2767, 5), (2768, 6), (2769, 7), (2770, 8), (2771, 9), (2772, 10),
    (2773, 11), (2774, 12), (2775, 13), (2776, 14), (2777, 15), (2778, 16), (2779, 17),
    (2780, 18), (2781, 19), (2782, 20), (2783, 21), (2784, 22), (2785, 23), (2786, 24),
    (2787, 25), (2788, 26), (2789, 27), (2790, 28), (2791, 29), (3897, 30), (7593, 31),
    (7878, 33), (7879, 35), (7880, 36), (7881, 34), (7882, 32), (9024, 37), (9025, 38),
    (9026, 39), (9113, 40), (9224, 41), (9397, 43), (9481, 42), (10261, 44), (11353, 45),
    (11619, 46), (12490, 47), (12735, 48), (12736, 49), (13057, 50), (13567, 51), (13764, 52),
    (13765, 53), (13898, 54), (13899, 55), (13900, 56), (13901, 57), (13902, 58), (14073, 59),
    (14074, 60), (14075, 61), (14076, 62), (14950, 63), (15821, 64), (15822, 65), (15823, 66),
];

/// Slot number of the badge for an awakening effect id.
pub fn super_awakening_slot(effect_id: u32) -> Option<u32> {
    SUPER_AWAKENING_SLOTS
        .iter()
        .find(|(id, _)| *id == effect_id)
        .map(|(_, slot)| *slot)
}

/// One parsed card before it is paired with its assist.
#[derive(Debug)]
struct ParsedCard {
    record: CardRecord,
    attribute: Option<Attribute>,
    assist: Option<String>,
    repeat: u32,
}

/// Parse one slot string into the slots it places.
///
/// The (main, assist) pair is repeated as many times as the slot's `*N`
/// marker asks. An empty result means the slot places nothing.
///
/// # Errors
///
/// Lexical errors from the tokenizer and lookup failures for any named card,
/// assist included, abort with a [`ParseError`].
pub fn parse_slot(text: &str, lookup: &dyn EntityLookup) -> Result<Vec<Slot>, ParseError> {
    let main = match parse_card(text, Role::Main, lookup)? {
        Some(card) => card,
        None => return Ok(Vec::new()),
    };

    let assist = match main.assist.as_deref() {
        Some(assist_text) => parse_card(assist_text, Role::Assist, lookup)?.map(|mut assist| {
            if let (Some(main_attr), Some(assist_attr)) = (main.attribute, assist.attribute) {
                assist.record.on_color = main_attr == assist_attr;
            }
            assist.record
        }),
        None => None,
    };

    let slot = Slot {
        main: main.record,
        assist,
    };
    Ok(vec![slot; main.repeat as usize])
}

/// Parse a single card in the given role.
///
/// `Ok(None)` means "no card": a nameless main card, or an assist that is not
/// allowed to be attached.
fn parse_card(
    text: &str,
    role: Role,
    lookup: &dyn EntityLookup,
) -> Result<Option<ParsedCard>, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(match role {
            Role::Assist => Some(ParsedCard {
                record: CardRecord::delay_buffer(role),
                attribute: None,
                assist: None,
                repeat: 1,
            }),
            Role::Main => None,
        });
    }

    let mut record = CardRecord::new(role);
    let mut entity: Option<Entity> = None;
    let mut named = false;
    let mut assist = None;
    let mut repeat = 1;
    let mut plus_all = None;
    let mut latents = Vec::new();

    for token in tokenize(text)? {
        match token.kind {
            TokenKind::Name(name) => {
                named = true;
                if name.eq_ignore_ascii_case(DELAY_BUFFER_NAME) {
                    record.id = CardId::DelayBuffer;
                    continue;
                }
                let found = lookup.find(&name).map_err(|e| ParseError::Lookup {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
                debug!(query = %name, id = found.id, "resolved card");
                if !found.inheritable {
                    match role {
                        Role::Assist => {
                            debug!(
                                id = found.id,
                                "card cannot be an assist, leaving slot empty"
                            );
                            return Ok(None);
                        }
                        Role::Main => record.gold_star = false,
                    }
                }
                record.id = CardId::Entity(found.id);
                entity = Some(found);
            }
            TokenKind::AssistModifier(inner) => assist = Some(inner),
            TokenKind::LatentList(list) => latents = list,
            TokenKind::LevelStat(level) => record.level = level,
            TokenKind::SkillLevelStat(level) => record.skill_level = level,
            TokenKind::AwakeningStat(count) => record.awakenings = count,
            TokenKind::SuperAwakeningStat(selector) => record.super_awakening = selector,
            TokenKind::PlusAll(total) => plus_all = Some(total),
            TokenKind::PlusHp(value) => record.plus.hp = value,
            TokenKind::PlusAtk(value) => record.plus.atk = value,
            TokenKind::PlusRcv(value) => record.plus.rcv = value,
            TokenKind::RepeatCount(count) => repeat = count,
        }
    }

    if !named {
        return Ok(None);
    }
    if let Some(total) = plus_all {
        record.plus = PlusStats::from_total(total);
    }

    let attribute = match &entity {
        Some(entity) => {
            apply_entity_limits(&mut record, entity, &latents);
            entity.attribute
        }
        None => {
            record.level = record.level.min(LIMIT_BREAK_LEVEL).max(1);
            record.super_awakening = 0;
            None
        }
    };

    Ok(Some(ParsedCard {
        record,
        attribute,
        assist,
        repeat,
    }))
}

/// Clamp a card's stats to what its entity supports.
fn apply_entity_limits(record: &mut CardRecord, entity: &Entity, latents: &[Latent]) {
    record.latents = validate_latents(latents, Some(&entity.types));

    let cap = entity.level_cap();
    if record.level > cap {
        debug!(id = entity.id, level = record.level, cap, "clamping level");
    }
    record.level = record.level.min(cap).max(1);

    record.skill_level_max = entity.skill_level_bound();
    if record.skill_level_max > 0 {
        record.skill_level = record.skill_level.min(record.skill_level_max);
    }

    let bound = entity.awakening_bound();
    match record.role {
        Role::Assist => {
            record.awakenings_max = if record.awakenings > 0 { bound } else { 0 };
            record.awakenings = record.awakenings_max;
            record.super_awakening = 0;
        }
        Role::Main => {
            record.awakenings_max = bound;
            record.awakenings = record.awakenings.min(bound);
            record.super_awakening = resolve_super_awakening(entity, record.super_awakening);
            if record.super_awakening > 0 {
                record.level = record.level.max(SUPER_AWAKENING_LEVEL);
            }
        }
    }
}

/// Translate a 1-based super-awakening selector into a badge slot number.
fn resolve_super_awakening(entity: &Entity, selector: u32) -> u32 {
    let pool = entity.super_awakenings();
    let selector = (selector as usize).min(pool.len());
    if selector == 0 {
        return 0;
    }
    let effect = pool[selector - 1];
    match super_awakening_slot(effect) {
        Some(slot) => slot,
        None => {
            warn!(
                id = entity.id,
                effect,
                "unknown super awakening effect, ignoring selection"
            );
            0
        }
    }
}
