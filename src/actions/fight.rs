//! Fighting.
//!
//! `FightAction` is the "use this creature to fight" action. Its event
//! decides at execution time whether the creature fights or only shakes
//! off its stun, because the stun may have changed since the event was
//! created. `ResolveFightAction` is the fight itself.

use super::card::chosen_or_source;
use super::context::Context;
use super::target::{ResolvedProperties, TargetFn, TargetKind, TargetSource, Targets};
use super::{Action, ActionKind, GameAction};
use crate::abilities::{AbilityRole, Requirement};
use crate::core::{EntityId, GameState};
use crate::pipeline::{Event, EventName};

const CREATURE: &[TargetKind] = &[TargetKind::Creature];

/// Use a creature: fight if it can, remove its stun if it is stunned.
#[derive(Clone, Debug, Default)]
pub struct FightAction {
    pub target: TargetSource,
}

impl Action for FightAction {
    fn kind(&self) -> ActionKind {
        ActionKind::Fight
    }

    fn target_kinds(&self) -> &'static [TargetKind] {
        CREATURE
    }

    fn effect_template(&self) -> &str {
        "fight with {0}"
    }

    fn set_target(&mut self, targets: Targets) {
        self.target = TargetSource::Fixed(targets);
    }

    fn set_default_target(&mut self, resolver: TargetFn) {
        self.target = TargetSource::Dynamic(resolver);
    }

    fn update(&self, context: &Context, game: &GameState) -> ResolvedProperties {
        ResolvedProperties {
            targets: self.target.resolve(context, game, || chosen_or_source(context)),
            amount: 0,
        }
    }

    fn can_affect(&self, target: EntityId, context: &Context, game: &GameState) -> bool {
        let Some(card) = game.card(target) else {
            return false;
        };
        if !game.is_creature_in_play(target) {
            return false;
        }
        let Some(fight) = game.registry().ability(card.card_id, AbilityRole::Fight) else {
            return false;
        };

        // A stunned creature may always be used; using it removes the stun.
        let ignored: &[Requirement] = if card.is_stunned() {
            &[Requirement::Stunned, Requirement::Targets]
        } else {
            &[Requirement::Stunned]
        };
        let fight_context = fight.create_context(context.player, target).ignoring_house();
        fight.unmet_requirement(&fight_context, game, ignored).is_none()
    }

    fn event(&self, card: EntityId, context: &Context, _game: &GameState) -> Event {
        let player = context.player;
        Event::new(EventName::Unnamed, context.clone(), move |pipeline, game| {
            let Some(instance) = game.card(card) else {
                return false;
            };
            if !instance.in_play() {
                return false;
            }
            let role = if instance.is_stunned() {
                AbilityRole::RemoveStun
            } else {
                AbilityRole::Fight
            };
            let Some(ability) = game.registry().ability(instance.card_id, role) else {
                return false;
            };

            // Once committed, the fight's target prompt cannot be declined.
            pipeline.resolve_ability(
                ability.create_context(player, card).ignoring_house().uncancellable(),
            );
            true
        })
        .with_card(card)
        .with_player(player)
    }
}

/// The fight ability's effect: the context's source and the defender
/// deal damage equal to their power to each other.
#[derive(Clone, Debug, Default)]
pub struct ResolveFightAction {
    pub target: TargetSource,
}

impl Action for ResolveFightAction {
    fn kind(&self) -> ActionKind {
        ActionKind::ResolveFight
    }

    fn target_kinds(&self) -> &'static [TargetKind] {
        CREATURE
    }

    fn effect_template(&self) -> &str {
        "fight {0}"
    }

    fn set_target(&mut self, targets: Targets) {
        self.target = TargetSource::Fixed(targets);
    }

    fn set_default_target(&mut self, resolver: TargetFn) {
        self.target = TargetSource::Dynamic(resolver);
    }

    fn update(&self, context: &Context, game: &GameState) -> ResolvedProperties {
        ResolvedProperties {
            targets: self
                .target
                .resolve(context, game, || context.target.into_iter().collect()),
            amount: 0,
        }
    }

    fn can_affect(&self, target: EntityId, context: &Context, game: &GameState) -> bool {
        context.source.is_some_and(|attacker| {
            attacker != target
                && game.is_creature_in_play(attacker)
                && game.is_creature_in_play(target)
        })
    }

    fn event(&self, defender: EntityId, context: &Context, _game: &GameState) -> Event {
        let ctx = context.clone();
        Event::new(EventName::Fight, context.clone(), move |pipeline, game| {
            let Some(attacker) = ctx.source else {
                return false;
            };
            if !game.is_creature_in_play(attacker) || !game.is_creature_in_play(defender) {
                return false;
            }
            game.add_message("{0} fights {1}", &[attacker.into(), defender.into()]);

            let mut events = GameAction::deal_damage(game.power(attacker))
                .targeting([defender])
                .event_array(&ctx, game);
            events.extend(
                GameAction::deal_damage(game.power(defender))
                    .targeting([attacker])
                    .event_array(&ctx, game),
            );
            pipeline.open_event_window(events);
            true
        })
        .with_card(defender)
    }
}
