//! Card registry for definition lookup.
//!
//! The `CardRegistry` stores all card definitions for a game and
//! validates them on registration, so a malformed card is reported at
//! load time rather than discovered mid-game.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::definition::{CardDefinition, CardId};
use crate::abilities::{AbilityRole, CardAbility};

/// Card data that cannot be loaded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("card id {0} is already registered")]
    DuplicateId(CardId),

    #[error("creature '{name}' has no {role:?} ability")]
    MissingRole { name: String, role: AbilityRole },

    #[error("card '{name}' declares more than one {role:?} ability")]
    DuplicateRole { name: String, role: AbilityRole },

    #[error("card id {0} is not registered")]
    UnknownCard(CardId),
}

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use keyforge_pipeline::abilities::AbilityRole;
/// use keyforge_pipeline::cards::{CardDefinition, CardId, CardRegistry, House};
///
/// let mut registry = CardRegistry::new();
/// registry
///     .register(CardDefinition::creature(CardId::new(1), "Troll", House::Brobnar, 8))
///     .unwrap();
///
/// assert_eq!(registry.get(CardId::new(1)).unwrap().name, "Troll");
/// assert!(registry.ability(CardId::new(1), AbilityRole::Fight).is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a card definition.
    pub fn register(&mut self, card: CardDefinition) -> Result<(), CatalogError> {
        if self.cards.contains_key(&card.id) {
            return Err(CatalogError::DuplicateId(card.id));
        }

        let mut seen: Vec<AbilityRole> = Vec::new();
        for ability in card.abilities() {
            if seen.contains(&ability.role) {
                return Err(CatalogError::DuplicateRole {
                    name: card.name.clone(),
                    role: ability.role,
                });
            }
            seen.push(ability.role);
        }

        if card.is_creature() {
            for role in [AbilityRole::Fight, AbilityRole::RemoveStun] {
                if !seen.contains(&role) {
                    return Err(CatalogError::MissingRole {
                        name: card.name.clone(),
                        role,
                    });
                }
            }
        }

        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Look up a card's ability by role.
    #[must_use]
    pub fn ability(&self, id: CardId, role: AbilityRole) -> Option<Arc<CardAbility>> {
        self.cards.get(&id)?.ability(role).cloned()
    }

    /// Find a definition by exact name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&CardDefinition> {
        self.cards.values().find(|c| c.name == name)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }
}
