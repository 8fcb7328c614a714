//! Data models for team builds (cards, slots, teams, instructions) and the
//! entities cards are resolved from.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::latent::Latent;

/// Level cap for entities that can be limit broken.
pub const LIMIT_BREAK_LEVEL: u32 = 110;

/// Super awakenings only display meaningfully at or above this level.
pub const SUPER_AWAKENING_LEVEL: u32 = 100;

/// Maximum number of teams in a build; extra teams are dropped.
pub const MAX_TEAMS: usize = 3;

/// Maximum value of a single plus stat.
pub const MAX_PLUS: u32 = 99;

/// Sum of all three plus stats when fully maxed.
pub const MAX_PLUS_TOTAL: u32 = MAX_PLUS * 3;

/// Identifier drawn on a tile: an entity number or the delay-buffer placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardId {
    Entity(u32),
    DelayBuffer,
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardId::Entity(id) => write!(f, "{}", id),
            CardId::DelayBuffer => write!(f, "delay_buffer"),
        }
    }
}

/// Whether a card is parsed as the main card of a slot or as its assist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Main,
    Assist,
}

/// Per-stat plus values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlusStats {
    pub hp: u32,
    pub atk: u32,
    pub rcv: u32,
}

impl PlusStats {
    pub const ZERO: PlusStats = PlusStats {
        hp: 0,
        atk: 0,
        rcv: 0,
    };
    pub const MAXED: PlusStats = PlusStats {
        hp: MAX_PLUS,
        atk: MAX_PLUS,
        rcv: MAX_PLUS,
    };

    /// Snap all three stats from a plus-all total: anything short of the full
    /// total resets every stat to zero.
    pub fn from_total(total: u32) -> Self {
        if total >= MAX_PLUS_TOTAL {
            Self::MAXED
        } else {
            Self::ZERO
        }
    }

    pub fn total(&self) -> u32 {
        self.hp + self.atk + self.rcv
    }
}

/// A normalized description of one placed card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: CardId,
    pub role: Role,
    pub level: u32,
    pub skill_level: u32,
    /// Number of skill levels the entity's active skill has (0 if none)
    pub skill_level_max: u32,
    pub awakenings: u32,
    pub awakenings_max: u32,
    /// Translated super-awakening slot number, 0 when none is selected
    pub super_awakening: u32,
    pub plus: PlusStats,
    pub latents: Vec<Latent>,
    /// Cosmetic "fully powered" star, cleared for non-assistable main cards
    pub gold_star: bool,
    /// Whether the stat overlay is drawn (assists only when sharing the main's attribute)
    pub on_color: bool,
}

impl CardRecord {
    /// Create a record with the defaults for the given role.
    pub fn new(role: Role) -> Self {
        match role {
            Role::Main => Self {
                id: CardId::Entity(0),
                role,
                level: 99,
                skill_level: 0,
                skill_level_max: 0,
                awakenings: 9,
                awakenings_max: 9,
                super_awakening: 0,
                plus: PlusStats::MAXED,
                latents: Vec::new(),
                gold_star: true,
                on_color: true,
            },
            Role::Assist => Self {
                id: CardId::Entity(0),
                role,
                level: 1,
                skill_level: 0,
                skill_level_max: 0,
                awakenings: 0,
                awakenings_max: 0,
                super_awakening: 0,
                plus: PlusStats::ZERO,
                latents: Vec::new(),
                gold_star: true,
                on_color: false,
            },
        }
    }

    /// A delay-buffer placeholder record.
    pub fn delay_buffer(role: Role) -> Self {
        Self {
            id: CardId::DelayBuffer,
            ..Self::new(role)
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == CardId::DelayBuffer
    }

    pub fn is_fully_awakened(&self) -> bool {
        self.awakenings >= self.awakenings_max
    }

    pub fn is_skill_maxed(&self) -> bool {
        self.skill_level >= self.skill_level_max
    }
}

/// One position in a team: a main card and its optional assist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub main: CardRecord,
    pub assist: Option<CardRecord>,
}

/// An ordered sequence of slots, flattened after repeat expansion.
///
/// Placement indices interleave main and assist cards: slot `n` places its
/// main card at index `2n` and its assist at `2n + 1`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Team {
    pub slots: Vec<Slot>,
}

impl Team {
    /// Number of placement indices the team occupies (two per slot).
    pub fn placement_count(&self) -> usize {
        self.slots.len() * 2
    }

    /// The card at a placement index, if any.
    pub fn card_at(&self, index: usize) -> Option<&CardRecord> {
        let slot = self.slots.get(index / 2)?;
        if index % 2 == 0 {
            Some(&slot.main)
        } else {
            slot.assist.as_ref()
        }
    }

    pub fn has_assist(&self) -> bool {
        self.slots.iter().any(|s| s.assist.is_some())
    }

    /// Whether any main card in the team carries latents.
    pub fn has_latents(&self) -> bool {
        self.slots.iter().any(|s| !s.main.latents.is_empty())
    }

    /// Drop placements beyond `capacity` indices.
    pub fn truncate(&mut self, capacity: usize) {
        self.slots.truncate(capacity / 2);
    }
}

/// One annotated step of a build walkthrough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub floor: u32,
    /// Zero-based player index, shown one-based
    pub player: u32,
    /// Per team index, the placement indices whose abilities were used
    #[serde(default)]
    pub active: Option<Vec<Vec<usize>>>,
    pub action: String,
}

/// A complete parsed build: up to three teams plus optional instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    pub name: String,
    pub teams: Vec<Team>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<Instruction>>,
}

impl Build {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            teams: Vec::new(),
            instructions: None,
        }
    }

    /// Placement indices available per team: two rows of six columns, or
    /// five columns when teams pair up side by side.
    pub fn placement_capacity(team_count: usize) -> usize {
        if team_count % 2 == 0 {
            10
        } else {
            12
        }
    }

    /// True when no team holds a card.
    pub fn is_empty(&self) -> bool {
        self.teams.iter().all(|t| t.slots.is_empty())
    }
}

/// Type tags an entity can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum EntityType {
    Evolve,
    Balance,
    Physical,
    Healer,
    Dragon,
    God,
    Attacker,
    Devil,
    Machine,
    Awoken,
    Enhance,
    Redeemable,
    Other,
}

impl From<String> for EntityType {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "evolve" | "evo material" => EntityType::Evolve,
            "balance" | "balanced" => EntityType::Balance,
            "physical" => EntityType::Physical,
            "healer" => EntityType::Healer,
            "dragon" => EntityType::Dragon,
            "god" => EntityType::God,
            "attacker" => EntityType::Attacker,
            "devil" => EntityType::Devil,
            "machine" => EntityType::Machine,
            "awoken" | "awaken material" => EntityType::Awoken,
            "enhance" | "enhance material" => EntityType::Enhance,
            "redeemable" => EntityType::Redeemable,
            _ => EntityType::Other,
        }
    }
}

/// Elemental attribute of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Fire,
    Water,
    Wood,
    Light,
    Dark,
}

/// Cooldown range of an active skill, in turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCooldown {
    pub min: u32,
    pub max: u32,
}

impl SkillCooldown {
    /// Number of skill levels between the slowest and fastest cooldown.
    pub fn levels(&self) -> u32 {
        self.max.saturating_sub(self.min) + 1
    }
}

fn default_true() -> bool {
    true
}

fn default_max_level() -> u32 {
    99
}

/// An entity as returned by an [`EntityLookup`](crate::catalog::EntityLookup).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Whether the entity may be attached as an assist
    #[serde(default = "default_true")]
    pub inheritable: bool,
    #[serde(default)]
    pub types: Vec<EntityType>,
    #[serde(default = "default_max_level")]
    pub max_level: u32,
    /// Limit-break stat multiplier; values above 1 allow level 110
    #[serde(default)]
    pub limit_break: Option<f64>,
    #[serde(default)]
    pub skill_cooldown: Option<SkillCooldown>,
    /// Awakening effect identifiers, super awakenings last
    #[serde(default)]
    pub awakenings: Vec<u32>,
    #[serde(default)]
    pub super_awakening_count: usize,
    #[serde(default)]
    pub attribute: Option<Attribute>,
}

impl Entity {
    /// Highest level this entity can reach.
    pub fn level_cap(&self) -> u32 {
        let cap = match self.limit_break {
            Some(threshold) if threshold > 1.0 => LIMIT_BREAK_LEVEL,
            _ => self.max_level,
        };
        cap.min(LIMIT_BREAK_LEVEL)
    }

    pub fn skill_level_bound(&self) -> u32 {
        self.skill_cooldown.map(|c| c.levels()).unwrap_or(0)
    }

    /// Count of regular (non-super) awakenings.
    pub fn awakening_bound(&self) -> u32 {
        self.awakenings.len().saturating_sub(self.super_awakening_count) as u32
    }

    /// The trailing super-awakening pool, in list order.
    pub fn super_awakenings(&self) -> &[u32] {
        let start = self.awakenings.len().saturating_sub(self.super_awakening_count);
        &self.awakenings[start..]
    }
}
