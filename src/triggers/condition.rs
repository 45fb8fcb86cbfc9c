//! Filters a trigger applies after its event name matches.
//!
//! Conditions are checked against an event record and the live game
//! state. They are plain data so cards can declare them statically.

use serde::{Deserialize, Serialize};

use crate::cards::{CardKind, House};
use crate::core::{EntityId, GameState, PlayerId};
use crate::pipeline::EventRecord;

/// Predicate over an event record and the live game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerCondition {
    /// The event's card must be this entity.
    CardIs(EntityId),

    /// The event's card must be controlled by this player.
    CardControlledBy(PlayerId),

    /// The event's card must belong to this house.
    CardHouse(House),

    /// The event's card must be of this kind.
    CardKind(CardKind),

    /// The event's player must be this player.
    PlayerIs(PlayerId),

    /// Damage, amber or card count of at least this much.
    AmountAtLeast(i64),

    All(Vec<TriggerCondition>),

    Any(Vec<TriggerCondition>),

    Not(Box<TriggerCondition>),

    /// Default for triggers keyed only on the event name.
    Always,

    /// Parks a trigger without unregistering it.
    Never,
}

impl TriggerCondition {
    pub fn all(conditions: impl IntoIterator<Item = TriggerCondition>) -> Self {
        Self::All(conditions.into_iter().collect())
    }

    pub fn any(conditions: impl IntoIterator<Item = TriggerCondition>) -> Self {
        Self::Any(conditions.into_iter().collect())
    }

    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Conjunction, flattening into an existing `All`.
    #[must_use]
    pub fn and(self, other: TriggerCondition) -> Self {
        match self {
            Self::All(mut conditions) => {
                conditions.push(other);
                Self::All(conditions)
            }
            _ => Self::All(vec![self, other]),
        }
    }

    /// Evaluate against an event. Card filters fail for card-less events.
    #[must_use]
    pub fn evaluate(&self, event: &EventRecord, game: &GameState) -> bool {
        match self {
            Self::CardIs(id) => event.card == Some(*id),
            Self::CardControlledBy(player) => event
                .card
                .and_then(|c| game.card(c))
                .is_some_and(|c| c.controller == *player),
            Self::CardHouse(house) => event
                .card
                .and_then(|c| game.definition(c))
                .is_some_and(|d| d.house == *house),
            Self::CardKind(kind) => event
                .card
                .and_then(|c| game.definition(c))
                .is_some_and(|d| d.kind == *kind),
            Self::PlayerIs(player) => event.player == Some(*player),
            Self::AmountAtLeast(min) => event.amount >= *min,
            Self::All(conditions) => conditions.iter().all(|c| c.evaluate(event, game)),
            Self::Any(conditions) => conditions.iter().any(|c| c.evaluate(event, game)),
            Self::Not(inner) => !inner.evaluate(event, game),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cards::{CardDefinition, CardId, CardRegistry};
    use crate::core::EngineConfig;
    use crate::pipeline::{EventId, EventName, WindowId};
    use crate::zones::Location;

    fn setup() -> (GameState, EntityId) {
        let mut registry = CardRegistry::new();
        registry
            .register(CardDefinition::creature(CardId::new(1), "Zorg", House::Mars, 7))
            .unwrap();
        let mut game =
            GameState::new(EngineConfig::default(), Arc::new(registry), &["Alice", "Bob"], 0);
        let zorg = game.create_card(CardId::new(1), PlayerId::new(1), Location::PlayArea);
        (game, zorg)
    }

    fn record(card: Option<EntityId>, amount: i64) -> EventRecord {
        EventRecord {
            id: EventId(0),
            window: WindowId(0),
            name: EventName::Damage,
            card,
            player: None,
            amount,
            resolved: true,
            cancelled: false,
        }
    }

    #[test]
    fn test_card_filters() {
        let (game, zorg) = setup();
        let event = record(Some(zorg), 3);

        assert!(TriggerCondition::CardIs(zorg).evaluate(&event, &game));
        assert!(TriggerCondition::CardControlledBy(PlayerId::new(1)).evaluate(&event, &game));
        assert!(!TriggerCondition::CardControlledBy(PlayerId::new(0)).evaluate(&event, &game));
        assert!(TriggerCondition::CardHouse(House::Mars).evaluate(&event, &game));
        assert!(TriggerCondition::CardKind(CardKind::Creature).evaluate(&event, &game));
    }

    #[test]
    fn test_card_filters_fail_without_card() {
        let (game, _) = setup();
        let event = record(None, 3);
        assert!(!TriggerCondition::CardHouse(House::Mars).evaluate(&event, &game));
        assert!(TriggerCondition::CardHouse(House::Mars).negate().evaluate(&event, &game));
    }

    #[test]
    fn test_combinators() {
        let (game, zorg) = setup();
        let event = record(Some(zorg), 2);

        let big_hit = TriggerCondition::CardIs(zorg).and(TriggerCondition::AmountAtLeast(3));
        assert!(!big_hit.evaluate(&event, &game));

        let either = TriggerCondition::any([TriggerCondition::Never, TriggerCondition::AmountAtLeast(2)]);
        assert!(either.evaluate(&event, &game));
    }
}
