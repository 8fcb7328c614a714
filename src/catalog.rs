//! Entity lookup: the "find entity by name" seam and a JSON-backed catalog

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

use crate::models::Entity;

/// Error returned when an entity cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no card matches '{0}'")]
    NotFound(String),
    #[error("'{query}' is ambiguous between {candidates}")]
    Ambiguous { query: String, candidates: String },
}

/// Resolves card names to entities.
///
/// Implementations must be shareable across threads so that independent
/// builds can be parsed concurrently.
pub trait EntityLookup: Sync {
    fn find(&self, name: &str) -> Result<Entity, LookupError>;
}

/// Error loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An in-memory list of entities searchable by name or alias.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entities: Vec<Entity>,
}

impl Catalog {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    /// Load a catalog from a JSON array of entities.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let entities: Vec<Entity> = serde_json::from_reader(reader)?;
        Ok(Self::new(entities))
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn names(entity: &Entity) -> impl Iterator<Item = &str> {
        std::iter::once(entity.name.as_str())
            .chain(entity.aliases.iter().map(String::as_str))
    }
}

impl EntityLookup for Catalog {
    /// Exact name or alias match (case-insensitive) first, then a unique
    /// substring match.
    fn find(&self, name: &str) -> Result<Entity, LookupError> {
        let query = name.trim().to_lowercase();
        if query.is_empty() {
            return Err(LookupError::NotFound(name.to_string()));
        }

        if let Ok(id) = query.parse::<u32>() {
            if let Some(entity) = self.entities.iter().find(|e| e.id == id) {
                return Ok(entity.clone());
            }
        }

        if let Some(entity) = self
            .entities
            .iter()
            .find(|e| Self::names(e).any(|n| n.to_lowercase() == query))
        {
            return Ok(entity.clone());
        }

        let partial: Vec<&Entity> = self
            .entities
            .iter()
            .filter(|e| {
                Self::names(e).any(|n| n.to_lowercase().contains(&query))
            })
            .collect();

        match partial.as_slice() {
            [] => Err(LookupError::NotFound(name.to_string())),
            [entity] => Ok((*entity).clone()),
            many => Err(LookupError::Ambiguous {
                query: name.to_string(),
                candidates: many
                    .iter()
                    .take(5)
                    .map(|e| e.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}
