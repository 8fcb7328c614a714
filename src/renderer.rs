//! Team card rendering
//!
//! Lays out every team of a [`Build`] on a transparent canvas: portrait tiles
//! with their captions and badges, a latent strip under each main card, and
//! optional instruction rows. The canvas is trimmed to its content at the end.

use image::{Rgba, RgbaImage};
use thiserror::Error;
use tracing::debug;

use crate::composition::{blank_canvas, overlay, paste, resize_bilinear, resize_nearest, trim};
use crate::font::Typeface;
use crate::latent::{Latent, MAX_LATENTS};
use crate::models::{Build, CardRecord, Instruction, Team, MAX_PLUS_TOTAL};
use crate::registry::{AssetError, Badge, SpriteStore};

/// Font sizes used on tiles and instruction rows.
const PLUS_SIZE: u32 = 14;
const PLUS_BANNER_SIZE: u32 = 18;
const LEVEL_SIZE: u32 = 18;
const SKILL_SIZE: u32 = 12;
const ID_SIZE: u32 = 12;
const COUNT_SIZE: u32 = 18;
const INSTRUCTION_SIZE: u32 = 24;

/// Skill label row when a level label is drawn, and when it is not.
const SKILL_ROW_WITH_LEVEL: i64 = 65;
const SKILL_ROW_ALONE: i64 = 80;

/// Inset of captions and badges from the tile edges.
const TILE_INSET: i64 = 5;

/// Error type for rendering failures.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    /// An instruction names a team or placement that does not exist
    #[error("Instruction {step}: no card at team {team}, position {index}")]
    InstructionRef {
        step: usize,
        team: usize,
        index: usize,
    },
}

/// Colours of every text overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPalette {
    pub plus: Rgba<u8>,
    pub level: Rgba<u8>,
    pub skill: Rgba<u8>,
    pub id: Rgba<u8>,
    pub count: Rgba<u8>,
    pub outline: Rgba<u8>,
    pub instruction: Rgba<u8>,
}

impl Default for TextPalette {
    fn default() -> Self {
        Self {
            plus: Rgba([255, 255, 0, 255]),
            level: Rgba([255, 255, 255, 255]),
            skill: Rgba([255, 192, 203, 255]),
            id: Rgba([173, 216, 230, 255]),
            count: Rgba([255, 255, 0, 255]),
            outline: Rgba([0, 0, 0, 255]),
            instruction: Rgba([255, 255, 255, 255]),
        }
    }
}

/// Layout dimensions and text colours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    /// Width and height of a portrait tile
    pub portrait_width: u32,
    pub padding: u32,
    /// Width of a single-slot latent icon; the strip is twice this high
    pub latents_width: u32,
    pub text: TextPalette,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            portrait_width: 100,
            padding: 10,
            latents_width: 25,
            text: TextPalette::default(),
        }
    }
}

impl RenderParams {
    /// Canvas width for a team of `placements` indices.
    pub fn canvas_width(&self, placements: usize) -> u32 {
        let columns = placements.div_ceil(2) as u32;
        let gaps = placements.div_ceil(10) as u32;
        self.portrait_width * columns + self.padding * gaps
    }

    /// Height reserved for one team.
    pub fn team_height(&self, has_assist: bool) -> u32 {
        let row = self.portrait_width + 2 * self.latents_width + 2 * self.padding;
        if has_assist {
            row * 2
        } else {
            row
        }
    }

    /// Height reserved for one instruction step.
    pub fn instruction_height(&self) -> u32 {
        self.portrait_width / 2 + self.padding
    }

    /// Tile origin for a placement index relative to the team origin.
    ///
    /// Column advances every two indices; odd indices sit one tile above
    /// their main card. A padding gap opens after every four columns.
    pub fn tile_origin(&self, index: usize) -> (i64, i64) {
        let column = (index / 2) as i64;
        let row = -((index % 2) as i64);
        let pw = self.portrait_width as i64;
        let gap = self.padding as i64 * ((column + 3) / 4);
        (gap + column * pw, row * pw)
    }

    fn text_center_pad(&self, size: u32) -> i64 {
        ((self.portrait_width / 2) as i64 - size as i64).div_euclid(3)
    }
}

/// Renders builds using a sprite store.
pub struct BuildRenderer<'a> {
    params: RenderParams,
    store: &'a dyn SpriteStore,
    typeface: Typeface,
}

impl<'a> BuildRenderer<'a> {
    /// A renderer drawing captions with the built-in bitmap font.
    pub fn new(params: RenderParams, store: &'a dyn SpriteStore) -> Self {
        Self {
            params,
            store,
            typeface: Typeface::Bitmap,
        }
    }

    /// Draw captions with `typeface` instead.
    pub fn with_typeface(mut self, typeface: Typeface) -> Self {
        self.typeface = typeface;
        self
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    /// Render a build to a trimmed image.
    ///
    /// Returns `Ok(None)` when there is nothing to draw. Instructions are
    /// drawn only when requested and present.
    ///
    /// # Errors
    ///
    /// Fails when a sprite cannot be loaded or an instruction refers to a
    /// card that does not exist.
    pub fn render(
        &self,
        build: &Build,
        include_instructions: bool,
    ) -> Result<Option<RgbaImage>, RenderError> {
        let capacity = Build::placement_capacity(build.teams.len());
        let placements = build
            .teams
            .iter()
            .map(|t| t.placement_count().min(capacity))
            .max()
            .unwrap_or(0);
        if placements == 0 {
            return Ok(None);
        }

        let instructions = build.instructions.as_deref().filter(|_| include_instructions);

        let width = self.params.canvas_width(placements);
        let mut height: u32 = build
            .teams
            .iter()
            .map(|t| self.params.team_height(t.has_assist()))
            .sum();
        if let Some(steps) = instructions {
            height += steps.len() as u32 * self.params.instruction_height();
        }
        debug!(
            width,
            height,
            teams = build.teams.len(),
            "rendering build '{}'",
            build.name
        );

        let mut canvas = blank_canvas(width, height);
        let show_supers = build.teams.len() == 1;
        let mut y = 0i64;

        for team in &build.teams {
            y = self.draw_team(&mut canvas, team, y, capacity, show_supers)?;
        }

        if let Some(steps) = instructions {
            self.draw_instructions(&mut canvas, build, steps, y)?;
        }

        Ok(trim(&canvas))
    }

    /// Draw one team starting at `y`; returns the y of the next team.
    fn draw_team(
        &self,
        canvas: &mut RgbaImage,
        team: &Team,
        mut y: i64,
        capacity: usize,
        show_supers: bool,
    ) -> Result<i64, RenderError> {
        let pw = self.params.portrait_width as i64;
        let has_latents = team.has_latents();
        if team.has_assist() {
            y += pw;
        }

        for index in 0..team.placement_count().min(capacity) {
            let Some(card) = team.card_at(index) else {
                continue;
            };
            let (tx, ty) = self.params.tile_origin(index);
            let tile = self.combine_portrait(card, show_supers)?;
            paste(canvas, &tile, tx, y + ty);

            if has_latents && index % 2 == 0 && !card.latents.is_empty() {
                let strip = self.combine_latents(&card.latents)?;
                paste(canvas, &strip, tx, y + ty + pw);
            }
        }

        y += pw + 2 * self.params.padding as i64;
        if has_latents {
            y += 2 * self.params.latents_width as i64;
        }
        Ok(y)
    }

    /// Outlined text in the configured outline colour.
    fn caption(
        &self,
        canvas: &mut RgbaImage,
        at: (i64, i64),
        text: &str,
        size: u32,
        fill: Rgba<u8>,
    ) {
        let outline = self.params.text.outline;
        self.typeface.outline_text(canvas, at.0, at.1, text, size, fill, outline);
    }

    /// A portrait scaled to the tile size, with its captions and badges.
    ///
    /// Placeholders are returned as the bare placeholder sprite.
    pub fn combine_portrait(
        &self,
        card: &CardRecord,
        show_supers: bool,
    ) -> Result<RgbaImage, RenderError> {
        let pw = self.params.portrait_width;
        let mut portrait = resize_bilinear(&self.store.portrait(card.id)?, pw, pw);
        if card.is_placeholder() {
            return Ok(portrait);
        }

        let text = &self.params.text;
        let pw = pw as i64;

        if card.on_color {
            let total = card.plus.total();
            if total >= MAX_PLUS_TOTAL {
                self.caption(
                    &mut portrait,
                    (TILE_INSET, 0),
                    "+297",
                    PLUS_BANNER_SIZE,
                    text.plus,
                );
            } else if total > 0 {
                let lines = [
                    format!("+{} HP", card.plus.hp),
                    format!("+{} ATK", card.plus.atk),
                    format!("+{} RCV", card.plus.rcv),
                ];
                for (line, row) in lines.iter().zip([2, 14, 26]) {
                    self.caption(&mut portrait, (TILE_INSET, row), line, PLUS_SIZE, text.plus);
                }
            }
        }

        let mut skill_row = SKILL_ROW_ALONE;
        if card.level > 0 {
            let label = format!("Lv.{}", card.level);
            self.caption(
                &mut portrait,
                (TILE_INSET, 75),
                &label,
                LEVEL_SIZE,
                text.level,
            );
            skill_row = SKILL_ROW_WITH_LEVEL;
        }

        if card.skill_level > 0 {
            let label = if card.is_skill_maxed() {
                "SLv.max".to_string()
            } else {
                format!("SLv.{}", card.skill_level)
            };
            self.caption(
                &mut portrait,
                (TILE_INSET, skill_row),
                &label,
                SKILL_SIZE,
                text.skill,
            );
        }

        let id = card.id.to_string();
        self.caption(&mut portrait, (67, 82), &id, ID_SIZE, text.id);

        if card.awakenings_max > 0 {
            let badge = if card.is_fully_awakened() {
                self.store.badge(Badge::FullyAwakened)?
            } else {
                let mut circle = self.store.badge(Badge::InProgress)?;
                let count = card.awakenings.to_string();
                self.typeface.draw_text(&mut circle, 8, -2, &count, COUNT_SIZE, text.count);
                circle
            };
            let bx = pw - badge.width() as i64 - TILE_INSET;
            overlay(&mut portrait, &badge, bx, TILE_INSET);
        }

        if show_supers && card.super_awakening > 0 {
            let badge = self.store.awakening_badge(card.super_awakening)?;
            let offset = pw - badge.width() as i64;
            overlay(&mut portrait, &badge, offset - TILE_INSET, offset / 2);
        }

        Ok(portrait)
    }

    /// Pack latent icons into a strip one tile wide and two icons high.
    ///
    /// Icons are scaled to one or two latent widths by one latent width.
    /// Two-slot and one-slot icons are grouped; the larger group goes first
    /// (two-slot on a tie). Icons wrap to a second row when the tile width is
    /// exceeded and packing stops once the second row is two icons wide.
    pub fn combine_latents(&self, latents: &[Latent]) -> Result<RgbaImage, RenderError> {
        let pw = self.params.portrait_width;
        let icon_height = self.params.latents_width;
        let lw = icon_height as i64;
        let mut strip = blank_canvas(pw, icon_height * 2);

        let latents = &latents[..latents.len().min(MAX_LATENTS)];
        let (two_slot, one_slot): (Vec<Latent>, Vec<Latent>) =
            latents.iter().partition(|l| l.is_two_slot());
        let ordered = if one_slot.len() > two_slot.len() {
            one_slot.into_iter().chain(two_slot)
        } else {
            two_slot.into_iter().chain(one_slot)
        };

        let (mut x, mut y, mut row, mut last_height) = (0i64, 0i64, 0u32, 0i64);
        for latent in ordered {
            let span = if latent.is_two_slot() { 2 } else { 1 };
            let icon = self.store.latent_icon(latent)?;
            let icon = resize_nearest(&icon, span * icon_height, icon_height);
            if x + icon.width() as i64 > pw as i64 {
                row += 1;
                x = 0;
                y += last_height;
            }
            paste(&mut strip, &icon, x, y);
            last_height = icon.height() as i64;
            x += icon.width() as i64;
            if row == 1 && x >= 2 * lw {
                break;
            }
        }

        Ok(strip)
    }

    fn draw_instructions(
        &self,
        canvas: &mut RgbaImage,
        build: &Build,
        steps: &[Instruction],
        mut y: i64,
    ) -> Result<(), RenderError> {
        let pw = self.params.portrait_width as i64;
        let pad = self.params.padding as i64;
        let thumb = self.params.portrait_width / 2;
        let text_pad = self.params.text_center_pad(25);
        let text = &self.params.text;

        y -= 2 * pad;
        for (step_index, step) in steps.iter().enumerate() {
            let mut x = pad;
            let label = format!("F{} - P{} ", step.floor, step.player + 1);
            self.caption(
                canvas,
                (x, y + text_pad),
                &label,
                INSTRUCTION_SIZE,
                text.instruction,
            );
            let label_width = self.typeface.text_width(&label, INSTRUCTION_SIZE) as i64;
            x += pw.max(label_width + pad);

            if let Some(active) = &step.active {
                for (team_index, indices) in active.iter().enumerate() {
                    for &index in indices {
                        let card = build
                            .teams
                            .get(team_index)
                            .and_then(|t| t.card_at(index))
                            .ok_or(RenderError::InstructionRef {
                                step: step_index,
                                team: team_index,
                                index,
                            })?;
                        let portrait = self.store.portrait(card.id)?;
                        paste(canvas, &resize_bilinear(&portrait, thumb, thumb), x, y);
                        x += thumb as i64;
                    }
                }
                x += pad;
            }

            let action = &step.action;
            self.caption(
                canvas,
                (x, y + text_pad),
                action,
                INSTRUCTION_SIZE,
                text.instruction,
            );
            y += thumb as i64;
        }
        Ok(())
    }
}

/// Render a build with default parameters.
pub fn render(
    build: &Build,
    store: &dyn SpriteStore,
    include_instructions: bool,
) -> Result<Option<RgbaImage>, RenderError> {
    BuildRenderer::new(RenderParams::default(), store).render(build, include_instructions)
}
