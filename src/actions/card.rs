//! Actions that affect cards.
//!
//! Without explicit targets these act on the context's chosen target,
//! falling back to its source card. Handlers re-check the card's
//! location and flags before mutating, so a card that moved or changed
//! after its event was created is left alone.

use smallvec::SmallVec;

use super::context::Context;
use super::target::{ResolvedProperties, TargetFn, TargetKind, TargetSource, Targets};
use super::{Action, ActionKind, Amount, GameAction};
use crate::cards::TokenKind;
use crate::core::{EntityId, GameState};
use crate::pipeline::{Event, EventName};
use crate::zones::Location;

const CREATURE: &[TargetKind] = &[TargetKind::Creature];
const ANY_CARD: &[TargetKind] = &[
    TargetKind::Creature,
    TargetKind::Artifact,
    TargetKind::Upgrade,
    TargetKind::Action,
];

pub(super) fn chosen_or_source(context: &Context) -> Targets {
    context.target.or(context.source).into_iter().collect()
}

fn source_only(context: &Context) -> Targets {
    context.source.into_iter().collect()
}

pub(super) fn kind_allowed(kinds: &[TargetKind], card: EntityId, game: &GameState) -> bool {
    game.definition(card)
        .is_some_and(|d| kinds.contains(&TargetKind::from(d.kind)))
}

macro_rules! card_targeting {
    ($kinds:expr) => {
        fn target_kinds(&self) -> &'static [TargetKind] {
            $kinds
        }

        fn set_target(&mut self, targets: Targets) {
            self.target = TargetSource::Fixed(targets);
        }

        fn set_default_target(&mut self, resolver: TargetFn) {
            self.target = TargetSource::Dynamic(resolver);
        }
    };
}

/// Move cards to their owner's hand.
#[derive(Clone, Debug)]
pub struct ReturnToHandAction {
    pub target: TargetSource,
    /// Where the cards must be.
    pub location: Location,
}

impl Default for ReturnToHandAction {
    fn default() -> Self {
        Self {
            target: TargetSource::Natural,
            location: Location::PlayArea,
        }
    }
}

impl Action for ReturnToHandAction {
    card_targeting!(ANY_CARD);

    fn kind(&self) -> ActionKind {
        ActionKind::ReturnToHand
    }

    fn effect_template(&self) -> &str {
        "return {0} to hand"
    }

    fn update(&self, context: &Context, game: &GameState) -> ResolvedProperties {
        ResolvedProperties {
            targets: self.target.resolve(context, game, || chosen_or_source(context)),
            amount: 0,
        }
    }

    fn can_affect(&self, target: EntityId, _context: &Context, game: &GameState) -> bool {
        kind_allowed(ANY_CARD, target, game)
            && game.card(target).is_some_and(|c| c.location == self.location)
    }

    fn event(&self, card: EntityId, context: &Context, _game: &GameState) -> Event {
        let from = self.location;
        Event::new(EventName::ReturnToHand, context.clone(), move |_, game| {
            if !game.card(card).is_some_and(|c| c.location == from) {
                return false;
            }
            game.move_card(card, Location::Hand, None);
            true
        })
        .with_card(card)
    }
}

/// Stun a creature.
#[derive(Clone, Debug, Default)]
pub struct StunAction {
    pub target: TargetSource,
}

impl Action for StunAction {
    card_targeting!(CREATURE);

    fn kind(&self) -> ActionKind {
        ActionKind::Stun
    }

    fn effect_template(&self) -> &str {
        "stun {0}"
    }

    fn update(&self, context: &Context, game: &GameState) -> ResolvedProperties {
        ResolvedProperties {
            targets: self.target.resolve(context, game, || chosen_or_source(context)),
            amount: 0,
        }
    }

    fn can_affect(&self, target: EntityId, _context: &Context, game: &GameState) -> bool {
        game.is_creature_in_play(target) && game.card(target).is_some_and(|c| !c.is_stunned())
    }

    fn event(&self, card: EntityId, context: &Context, _game: &GameState) -> Event {
        Event::new(EventName::Stun, context.clone(), move |_, game| {
            if !game.is_creature_in_play(card) {
                return false;
            }
            match game.card_mut(card) {
                Some(instance) if !instance.is_stunned() => {
                    instance.set_stunned(true);
                    true
                }
                _ => false,
            }
        })
        .with_card(card)
    }
}

/// Clear a creature's stun.
#[derive(Clone, Debug, Default)]
pub struct RemoveStunAction {
    pub target: TargetSource,
}

impl Action for RemoveStunAction {
    card_targeting!(CREATURE);

    fn kind(&self) -> ActionKind {
        ActionKind::RemoveStun
    }

    fn effect_template(&self) -> &str {
        "remove the stun from {0}"
    }

    fn update(&self, context: &Context, game: &GameState) -> ResolvedProperties {
        ResolvedProperties {
            targets: self.target.resolve(context, game, || chosen_or_source(context)),
            amount: 0,
        }
    }

    fn can_affect(&self, target: EntityId, _context: &Context, game: &GameState) -> bool {
        game.is_creature_in_play(target) && game.card(target).is_some_and(|c| c.is_stunned())
    }

    fn event(&self, card: EntityId, context: &Context, _game: &GameState) -> Event {
        Event::new(EventName::RemoveStun, context.clone(), move |_, game| {
            match game.card_mut(card) {
                Some(instance) if instance.in_play() && instance.is_stunned() => {
                    instance.set_stunned(false);
                    true
                }
                _ => false,
            }
        })
        .with_card(card)
    }
}

/// Exhaust a card in play. Defaults to the context's source, since it is
/// mostly used as an ability cost.
#[derive(Clone, Debug, Default)]
pub struct ExhaustAction {
    pub target: TargetSource,
}

impl Action for ExhaustAction {
    card_targeting!(ANY_CARD);

    fn kind(&self) -> ActionKind {
        ActionKind::Exhaust
    }

    fn effect_template(&self) -> &str {
        "exhaust {0}"
    }

    fn update(&self, context: &Context, game: &GameState) -> ResolvedProperties {
        ResolvedProperties {
            targets: self.target.resolve(context, game, || source_only(context)),
            amount: 0,
        }
    }

    fn can_affect(&self, target: EntityId, _context: &Context, game: &GameState) -> bool {
        game.card(target).is_some_and(|c| c.in_play() && !c.exhausted)
    }

    fn event(&self, card: EntityId, context: &Context, _game: &GameState) -> Event {
        Event::new(EventName::Exhaust, context.clone(), move |_, game| {
            match game.card_mut(card) {
                Some(instance) if instance.in_play() && !instance.exhausted => {
                    instance.exhausted = true;
                    true
                }
                _ => false,
            }
        })
        .with_card(card)
    }
}

/// Put damage on creatures. A creature whose damage reaches its power is
/// destroyed in a follow-up window.
#[derive(Clone, Debug)]
pub struct DealDamageAction {
    pub target: TargetSource,
    pub amount: Amount,
}

impl DealDamageAction {
    #[must_use]
    pub fn new(amount: Amount) -> Self {
        Self {
            target: TargetSource::Natural,
            amount,
        }
    }
}

impl Action for DealDamageAction {
    card_targeting!(CREATURE);

    fn kind(&self) -> ActionKind {
        ActionKind::DealDamage
    }

    fn effect_template(&self) -> &str {
        "deal {1} damage to {0}"
    }

    fn update(&self, context: &Context, game: &GameState) -> ResolvedProperties {
        ResolvedProperties {
            targets: self.target.resolve(context, game, || chosen_or_source(context)),
            amount: self.amount.resolve(context, game),
        }
    }

    fn can_affect(&self, target: EntityId, context: &Context, game: &GameState) -> bool {
        game.is_creature_in_play(target) && self.amount.resolve(context, game) > 0
    }

    fn event(&self, card: EntityId, context: &Context, game: &GameState) -> Event {
        let amount = self.amount.resolve(context, game).max(0);
        let ctx = context.clone();
        Event::new(EventName::Damage, context.clone(), move |pipeline, game| {
            if !game.is_creature_in_play(card) {
                return false;
            }
            let damage = match game.card_mut(card) {
                Some(instance) => {
                    instance.add_tokens(TokenKind::Damage, amount);
                    instance.tokens(TokenKind::Damage)
                }
                None => return false,
            };
            if damage >= game.power(card) {
                let events = GameAction::destroy().targeting([card]).event_array(&ctx, game);
                pipeline.open_event_window(events);
            }
            true
        })
        .with_card(card)
        .with_amount(amount)
    }
}

/// Put cards in play into their owner's discard pile.
#[derive(Clone, Debug, Default)]
pub struct DestroyAction {
    pub target: TargetSource,
}

impl Action for DestroyAction {
    card_targeting!(ANY_CARD);

    fn kind(&self) -> ActionKind {
        ActionKind::Destroy
    }

    fn effect_template(&self) -> &str {
        "destroy {0}"
    }

    fn update(&self, context: &Context, game: &GameState) -> ResolvedProperties {
        ResolvedProperties {
            targets: self.target.resolve(context, game, || chosen_or_source(context)),
            amount: 0,
        }
    }

    fn can_affect(&self, target: EntityId, _context: &Context, game: &GameState) -> bool {
        game.card(target).is_some_and(|c| c.in_play())
    }

    fn event(&self, card: EntityId, context: &Context, _game: &GameState) -> Event {
        Event::new(EventName::Destroy, context.clone(), move |_, game| {
            if !game.card(card).is_some_and(|c| c.in_play()) {
                return false;
            }
            game.move_card(card, Location::Discard, None);
            game.triggers.remove_for_source(card);
            game.add_message("{0} is destroyed", &[card.into()]);
            true
        })
        .with_card(card)
    }
}

/// Shared by combinators: union of several target lists, first
/// occurrence wins.
pub(super) fn merge_targets(lists: impl IntoIterator<Item = Targets>) -> Targets {
    let mut merged: Targets = SmallVec::new();
    for target in lists.into_iter().flatten() {
        if !merged.contains(&target) {
            merged.push(target);
        }
    }
    merged
}
