//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card type: name,
//! house, kind, printed power and abilities. Instance-specific data
//! (tokens, stun, location) is stored separately in `CardInstance`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::house::{CardKind, House};
use crate::abilities::{AbilityRole, CardAbility};

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card (e.g., "Troll"), not a specific
/// instance in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use keyforge_pipeline::abilities::AbilityRole;
/// use keyforge_pipeline::cards::{CardDefinition, CardId, House};
///
/// let troll = CardDefinition::creature(CardId::new(1), "Troll", House::Brobnar, 8);
///
/// assert!(troll.ability(AbilityRole::Fight).is_some());
/// assert!(troll.ability(AbilityRole::RemoveStun).is_some());
/// assert!(troll.ability(AbilityRole::Play).is_none());
/// ```
#[derive(Clone, Debug)]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Card name, used in spectator messages.
    pub name: String,

    pub house: House,

    pub kind: CardKind,

    /// Printed power; zero for non-creatures.
    pub power: i64,

    abilities: Vec<Arc<CardAbility>>,
}

impl CardDefinition {
    /// Create a definition with no abilities.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, house: House, kind: CardKind) -> Self {
        Self {
            id,
            name: name.into(),
            house,
            kind,
            power: 0,
            abilities: Vec::new(),
        }
    }

    /// Create a creature carrying the standard fight, reap and remove-stun
    /// abilities.
    #[must_use]
    pub fn creature(id: CardId, name: impl Into<String>, house: House, power: i64) -> Self {
        let mut card = Self::new(id, name, house, CardKind::Creature);
        card.power = power;
        card.with_ability(CardAbility::fight())
            .with_ability(CardAbility::reap())
            .with_ability(CardAbility::remove_stun())
    }

    /// Add an ability (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, ability: CardAbility) -> Self {
        self.abilities.push(Arc::new(ability));
        self
    }

    /// The first ability with the given role.
    #[must_use]
    pub fn ability(&self, role: AbilityRole) -> Option<&Arc<CardAbility>> {
        self.abilities.iter().find(|a| a.role == role)
    }

    /// All abilities in declaration order.
    #[must_use]
    pub fn abilities(&self) -> &[Arc<CardAbility>] {
        &self.abilities
    }

    #[must_use]
    pub fn is_creature(&self) -> bool {
        self.kind == CardKind::Creature
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::GameAction;
    use crate::abilities::AbilityEffect;

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
    }

    #[test]
    fn test_creature_roles() {
        let card = CardDefinition::creature(CardId::new(1), "Bumpsy", House::Brobnar, 5);
        let roles: Vec<_> = card.abilities().iter().map(|a| a.role).collect();

        assert_eq!(
            roles,
            vec![AbilityRole::Fight, AbilityRole::Reap, AbilityRole::RemoveStun]
        );
        assert_eq!(card.power, 5);
        assert!(card.is_creature());
    }

    #[test]
    fn test_action_card_builder() {
        let card = CardDefinition::new(CardId::new(2), "Windfall", House::Sanctum, CardKind::Action)
            .with_ability(CardAbility::play(AbilityEffect::new(GameAction::gain_amber(2))));

        assert!(!card.is_creature());
        assert_eq!(card.power, 0);
        assert!(card.ability(AbilityRole::Play).is_some());
    }
}
