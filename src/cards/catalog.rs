//! A handful of core-set cards.
//!
//! Enough to exercise every part of the engine in tests and demos; the
//! full card pool is data supplied by the host.

use super::definition::{CardDefinition, CardId};
use super::house::{CardKind, House};
use super::registry::{CardRegistry, CatalogError};
use crate::abilities::{AbilityEffect, CardAbility};
use crate::actions::{Amount, CardFilter, GameAction};

pub const KEY_ABDUCTION: CardId = CardId::new(1);
pub const ANGER: CardId = CardId::new(2);
pub const PUNCH: CardId = CardId::new(3);
pub const ZORG: CardId = CardId::new(10);
pub const MINDWARPER: CardId = CardId::new(11);
pub const TROLL: CardId = CardId::new(12);
pub const BUMPSY: CardId = CardId::new(13);
pub const DEXTRE: CardId = CardId::new(14);

/// Hand size at which Key Abduction's forge costs nothing extra.
const KEY_ABDUCTION_HAND: i64 = 9;

/// Play: return each Mars creature to its owner's hand. Then you may
/// forge a key at +9 current cost, reduced by 1 for each card in your
/// hand.
#[must_use]
pub fn key_abduction() -> CardDefinition {
    let return_mars = GameAction::return_to_hand()
        .targeting_matching(CardFilter::creature().and(CardFilter::House(House::Mars)));
    let forge = GameAction::forge_key().with_modifier(Amount::computed(|context, game| {
        KEY_ABDUCTION_HAND - game.hand(context.player).len() as i64
    }));

    CardDefinition::new(KEY_ABDUCTION, "Key Abduction", House::Mars, CardKind::Action).with_ability(
        CardAbility::play(
            AbilityEffect::new(return_mars)
                .then(AbilityEffect::new(forge).optional("forge a key")),
        ),
    )
}

/// Play: a friendly creature fights.
#[must_use]
pub fn anger() -> CardDefinition {
    CardDefinition::new(ANGER, "Anger", House::Brobnar, CardKind::Action).with_ability(
        CardAbility::play(AbilityEffect::new(GameAction::fight()))
            .with_target("Choose a creature to fight with", CardFilter::friendly_creature()),
    )
}

/// Play: deal 3 damage to a creature.
#[must_use]
pub fn punch() -> CardDefinition {
    CardDefinition::new(PUNCH, "Punch", House::Brobnar, CardKind::Action).with_ability(
        CardAbility::play(AbilityEffect::new(GameAction::deal_damage(3)))
            .with_target("Choose a creature to damage", CardFilter::creature()),
    )
}

/// The sample cards, validated.
///
/// ```
/// use keyforge_pipeline::cards::catalog;
///
/// let registry = catalog::core_set().unwrap();
/// assert_eq!(registry.find_by_name("Troll").unwrap().power, 8);
/// ```
pub fn core_set() -> Result<CardRegistry, CatalogError> {
    let mut registry = CardRegistry::new();
    for card in [
        key_abduction(),
        anger(),
        punch(),
        CardDefinition::creature(ZORG, "Zorg", House::Mars, 7),
        CardDefinition::creature(MINDWARPER, "Mindwarper", House::Mars, 3),
        CardDefinition::creature(TROLL, "Troll", House::Brobnar, 8),
        CardDefinition::creature(BUMPSY, "Bumpsy", House::Brobnar, 5),
        CardDefinition::creature(DEXTRE, "Dextre", House::Logos, 3),
    ] {
        registry.register(card)?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::AbilityRole;

    #[test]
    fn test_core_set_loads() {
        let registry = core_set().unwrap();
        assert_eq!(registry.len(), 8);
        assert!(registry.ability(KEY_ABDUCTION, AbilityRole::Play).is_some());
        assert!(registry.ability(DEXTRE, AbilityRole::RemoveStun).is_some());
    }

    #[test]
    fn test_key_abduction_follow_up_is_optional() {
        let card = key_abduction();
        let play = card.ability(AbilityRole::Play).unwrap();
        let then = play.effect.then.as_ref().unwrap();
        assert_eq!(then.may.as_deref(), Some("forge a key"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut registry = core_set().unwrap();
        assert_eq!(
            registry.register(punch()),
            Err(CatalogError::DuplicateId(PUNCH))
        );
    }
}
