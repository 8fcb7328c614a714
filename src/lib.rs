//! teamcard - Library for parsing team shorthand and rendering team cards
//!
//! This library provides functionality to:
//! - Parse build shorthand (`name(assist)[latents]*repeat|stats`) into teams
//! - Resolve card names through an [`EntityLookup`](catalog::EntityLookup)
//! - Render builds to trimmed RGBA images from a [`SpriteStore`](registry::SpriteStore)

pub mod catalog;
pub mod cli;
pub mod color;
pub mod composition;
pub mod config;
pub mod font;
pub mod latent;
pub mod models;
pub mod output;
pub mod parser;
pub mod registry;
pub mod renderer;
pub mod slot;
pub mod tokenizer;

pub use parser::{parse, parse_named, ParseError};
pub use renderer::{render, BuildRenderer, RenderError, RenderParams};
