//! Latent effect catalog and type-based latent validation

use serde::{Deserialize, Serialize};

use crate::models::EntityType;

/// A latent effect from the fixed catalog of 31 codes.
///
/// Codes below 22 occupy two display slots, the remaining ones a single slot.
/// The first eight codes are killer effects subject to type validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
#[repr(u8)]
pub enum Latent {
    BalancedKiller = 1,
    PhysicalKiller = 2,
    HealerKiller = 3,
    DragonKiller = 4,
    GodKiller = 5,
    AttackerKiller = 6,
    DevilKiller = 7,
    MachineKiller = 8,
    EvoKiller = 9,
    RedeemableKiller = 10,
    AwokenKiller = 11,
    EnhanceKiller = 12,
    AllStats = 13,
    HpPlus = 14,
    AtkPlus = 15,
    RcvPlus = 16,
    FireResistPlus = 17,
    WaterResistPlus = 18,
    WoodResistPlus = 19,
    LightResistPlus = 20,
    DarkResistPlus = 21,
    Hp = 22,
    Atk = 23,
    Rcv = 24,
    FireResist = 25,
    WaterResist = 26,
    WoodResist = 27,
    LightResist = 28,
    DarkResist = 29,
    AutoHeal = 30,
    SkillDelayResist = 31,
}

/// Every latent paired with its shorthand name, in code order.
pub const LATENTS: [(Latent, &str); 31] = [
    (Latent::BalancedKiller, "bak"),
    (Latent::PhysicalKiller, "phk"),
    (Latent::HealerKiller, "hek"),
    (Latent::DragonKiller, "drk"),
    (Latent::GodKiller, "gok"),
    (Latent::AttackerKiller, "aak"),
    (Latent::DevilKiller, "dek"),
    (Latent::MachineKiller, "mak"),
    (Latent::EvoKiller, "evk"),
    (Latent::RedeemableKiller, "rek"),
    (Latent::AwokenKiller, "awk"),
    (Latent::EnhanceKiller, "enk"),
    (Latent::AllStats, "all"),
    (Latent::HpPlus, "hp+"),
    (Latent::AtkPlus, "atk+"),
    (Latent::RcvPlus, "rcv+"),
    (Latent::FireResistPlus, "rres+"),
    (Latent::WaterResistPlus, "bres+"),
    (Latent::WoodResistPlus, "gres+"),
    (Latent::LightResistPlus, "lres+"),
    (Latent::DarkResistPlus, "dres+"),
    (Latent::Hp, "hp"),
    (Latent::Atk, "atk"),
    (Latent::Rcv, "rcv"),
    (Latent::FireResist, "rres"),
    (Latent::WaterResist, "bres"),
    (Latent::WoodResist, "gres"),
    (Latent::LightResist, "lres"),
    (Latent::DarkResist, "dres"),
    (Latent::AutoHeal, "ah"),
    (Latent::SkillDelayResist, "sdr"),
];

/// Maximum number of latents a card can carry.
pub const MAX_LATENTS: usize = 6;

impl Latent {
    /// Look up a latent by its shorthand name (exact, lowercase).
    pub fn from_name(name: &str) -> Option<Latent> {
        LATENTS.iter().find(|(_, n)| *n == name).map(|(l, _)| *l)
    }

    pub fn name(self) -> &'static str {
        LATENTS[self.code() as usize - 1].1
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_killer(self) -> bool {
        self.code() <= 8
    }

    /// Whether the latent takes two slots in the display strip.
    pub fn is_two_slot(self) -> bool {
        self.code() < 22
    }
}

impl From<Latent> for &'static str {
    fn from(latent: Latent) -> Self {
        latent.name()
    }
}

impl TryFrom<String> for Latent {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Latent::from_name(&s).ok_or_else(|| format!("unknown latent '{}'", s))
    }
}

/// Killer latents a type tag makes eligible. Tags not listed grant none.
fn killers_for(entity_type: EntityType) -> &'static [Latent] {
    match entity_type {
        EntityType::God => &[Latent::DevilKiller],
        EntityType::Devil => &[Latent::GodKiller],
        EntityType::Machine => &[Latent::GodKiller, Latent::BalancedKiller],
        EntityType::Dragon => &[Latent::MachineKiller, Latent::HealerKiller],
        EntityType::Physical => &[Latent::MachineKiller, Latent::HealerKiller],
        EntityType::Attacker => &[Latent::DevilKiller, Latent::PhysicalKiller],
        EntityType::Healer => &[Latent::DragonKiller, Latent::AttackerKiller],
        _ => &[],
    }
}

/// Filter candidate latents against an entity's type tags.
///
/// Returns an empty list ("no latents") when the types are unknown or there
/// are no candidates. A `Balance` tag lets everything through; otherwise a
/// killer latent survives only when one of the tags grants it. Non-killer
/// latents always pass.
///
/// # Examples
///
/// ```
/// use teamcard::latent::{validate_latents, Latent};
/// use teamcard::models::EntityType;
///
/// let candidates = [Latent::DragonKiller, Latent::DragonKiller, Latent::SkillDelayResist];
/// let kept = validate_latents(&candidates, Some(&[EntityType::God]));
/// assert_eq!(kept, vec![Latent::SkillDelayResist]);
/// ```
pub fn validate_latents(candidates: &[Latent], types: Option<&[EntityType]>) -> Vec<Latent> {
    let types = match types {
        Some(t) => t,
        None => return Vec::new(),
    };
    if candidates.is_empty() {
        return Vec::new();
    }
    if types.contains(&EntityType::Balance) {
        return candidates.iter().copied().take(MAX_LATENTS).collect();
    }

    candidates
        .iter()
        .copied()
        .filter(|latent| {
            !latent.is_killer() || types.iter().any(|t| killers_for(*t).contains(latent))
        })
        .take(MAX_LATENTS)
        .collect()
}
