//! Game actions.
//!
//! An action is a reusable, stateless description of an effect. Given a
//! `Context` and the live `GameState` it can say whether it has anything
//! to do, which entities it would affect, and produce the `Event`s that
//! perform the mutation when the pipeline runs them.
//!
//! ## Design
//!
//! The action kinds form a closed set: [`GameAction`] is an enum over the
//! concrete action structs, each implementing [`Action`]. Combinators
//! (`SequentialForEach`, `Sequential`, `Conditional`) own their inner
//! actions by composition and delegate targeting to them.
//!
//! Nothing resolution-specific is cached on an action. `update` derives
//! targets and amounts from the context and state each time it is called.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use keyforge_pipeline::actions::{Action, Context, GameAction};
//! use keyforge_pipeline::cards::CardRegistry;
//! use keyforge_pipeline::core::{EngineConfig, GameState, PlayerId};
//!
//! let game = GameState::new(EngineConfig::default(), Arc::new(CardRegistry::new()), &["A", "B"], 0);
//! let context = Context::new(PlayerId::new(0));
//!
//! let gain = GameAction::gain_amber(2);
//! assert!(gain.has_legal_target(&context, &game));
//! assert_eq!(gain.effect_message(&context, &game), "make A gain 2 amber");
//!
//! // Forging needs amber the player does not have yet.
//! assert!(!GameAction::forge_key().has_legal_target(&context, &game));
//! ```

mod card;
mod combinator;
mod context;
mod fight;
mod filter;
mod player;
mod target;

use std::fmt;

use tracing::debug;

pub use card::{
    DealDamageAction, DestroyAction, ExhaustAction, RemoveStunAction, ReturnToHandAction,
    StunAction,
};
pub use combinator::{ConditionalAction, SequentialAction, SequentialForEachAction};
pub use context::Context;
pub use fight::{FightAction, ResolveFightAction};
pub use filter::CardFilter;
pub use player::{DiscardAtRandomAction, DrawAction, ForgeKeyAction, GainAmberAction};
pub use target::{Amount, AmountFn, ResolvedProperties, TargetFn, TargetKind, TargetSource, Targets};

use crate::core::{EntityId, GameState, MessageArg};
use crate::pipeline::{Event, Pipeline};
use crate::zones::Location;

/// Action kind tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Draw,
    DiscardAtRandom,
    ReturnToHand,
    ForgeKey,
    GainAmber,
    Stun,
    RemoveStun,
    Exhaust,
    DealDamage,
    Destroy,
    Fight,
    ResolveFight,
    SequentialForEach,
    Sequential,
    Conditional,
}

impl ActionKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Draw => "draw",
            ActionKind::DiscardAtRandom => "discardAtRandom",
            ActionKind::ReturnToHand => "returnToHand",
            ActionKind::ForgeKey => "forgeKey",
            ActionKind::GainAmber => "gainAmber",
            ActionKind::Stun => "stun",
            ActionKind::RemoveStun => "removeStun",
            ActionKind::Exhaust => "exhaust",
            ActionKind::DealDamage => "dealDamage",
            ActionKind::Destroy => "destroy",
            ActionKind::Fight => "fight",
            ActionKind::ResolveFight => "resolveFight",
            ActionKind::SequentialForEach => "sequentialForEach",
            ActionKind::Sequential => "sequential",
            ActionKind::Conditional => "conditional",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The contract every action kind satisfies.
///
/// Only event handlers mutate the game; every other method reads.
pub trait Action {
    fn kind(&self) -> ActionKind;

    /// Entity kinds this action may affect.
    fn target_kinds(&self) -> &'static [TargetKind];

    /// Message template: `{0}` is the target list, `{1}` the amount.
    fn effect_template(&self) -> &str;

    /// Affect exactly these entities.
    fn set_target(&mut self, targets: Targets);

    /// Compute targets per resolution.
    fn set_default_target(&mut self, resolver: TargetFn);

    /// Derive this resolution's targets and amount.
    fn update(&self, context: &Context, game: &GameState) -> ResolvedProperties;

    /// Can this action affect `target` right now?
    fn can_affect(&self, target: EntityId, context: &Context, game: &GameState) -> bool;

    /// Is there at least one target this action can affect?
    fn has_legal_target(&self, context: &Context, game: &GameState) -> bool {
        self.update(context, game)
            .targets
            .iter()
            .any(|&target| self.can_affect(target, context, game))
    }

    /// Hook run in its own step before the event window opens.
    fn pre_event(&self, _context: &Context, _pipeline: &mut Pipeline, _game: &mut GameState) {}

    /// The event affecting one target.
    fn event(&self, target: EntityId, context: &Context, game: &GameState) -> Event;

    /// One event per affectable target.
    fn event_array(&self, context: &Context, game: &GameState) -> Vec<Event> {
        self.update(context, game)
            .targets
            .iter()
            .copied()
            .filter(|&target| self.can_affect(target, context, game))
            .map(|target| self.event(target, context, game))
            .collect()
    }

    /// Spectator description of what this action would do.
    fn effect_message(&self, context: &Context, game: &GameState) -> String {
        let properties = self.update(context, game);
        game.render(
            self.effect_template(),
            &[
                MessageArg::Entities(properties.targets.to_vec()),
                MessageArg::Number(properties.amount),
            ],
        )
    }
}

/// Every action kind the engine knows.
#[derive(Clone, Debug)]
pub enum GameAction {
    Draw(DrawAction),
    DiscardAtRandom(DiscardAtRandomAction),
    ReturnToHand(ReturnToHandAction),
    ForgeKey(ForgeKeyAction),
    GainAmber(GainAmberAction),
    Stun(StunAction),
    RemoveStun(RemoveStunAction),
    Exhaust(ExhaustAction),
    DealDamage(DealDamageAction),
    Destroy(DestroyAction),
    Fight(FightAction),
    ResolveFight(ResolveFightAction),
    SequentialForEach(SequentialForEachAction),
    Sequential(SequentialAction),
    Conditional(ConditionalAction),
}

macro_rules! dispatch {
    ($action:expr, $inner:ident => $body:expr) => {
        match $action {
            GameAction::Draw($inner) => $body,
            GameAction::DiscardAtRandom($inner) => $body,
            GameAction::ReturnToHand($inner) => $body,
            GameAction::ForgeKey($inner) => $body,
            GameAction::GainAmber($inner) => $body,
            GameAction::Stun($inner) => $body,
            GameAction::RemoveStun($inner) => $body,
            GameAction::Exhaust($inner) => $body,
            GameAction::DealDamage($inner) => $body,
            GameAction::Destroy($inner) => $body,
            GameAction::Fight($inner) => $body,
            GameAction::ResolveFight($inner) => $body,
            GameAction::SequentialForEach($inner) => $body,
            GameAction::Sequential($inner) => $body,
            GameAction::Conditional($inner) => $body,
        }
    };
}

impl Action for GameAction {
    fn kind(&self) -> ActionKind {
        dispatch!(self, a => a.kind())
    }

    fn target_kinds(&self) -> &'static [TargetKind] {
        dispatch!(self, a => a.target_kinds())
    }

    fn effect_template(&self) -> &str {
        dispatch!(self, a => a.effect_template())
    }

    fn set_target(&mut self, targets: Targets) {
        dispatch!(self, a => a.set_target(targets))
    }

    fn set_default_target(&mut self, resolver: TargetFn) {
        dispatch!(self, a => a.set_default_target(resolver))
    }

    fn update(&self, context: &Context, game: &GameState) -> ResolvedProperties {
        dispatch!(self, a => a.update(context, game))
    }

    fn can_affect(&self, target: EntityId, context: &Context, game: &GameState) -> bool {
        dispatch!(self, a => a.can_affect(target, context, game))
    }

    fn has_legal_target(&self, context: &Context, game: &GameState) -> bool {
        dispatch!(self, a => a.has_legal_target(context, game))
    }

    fn pre_event(&self, context: &Context, pipeline: &mut Pipeline, game: &mut GameState) {
        dispatch!(self, a => a.pre_event(context, pipeline, game))
    }

    fn event(&self, target: EntityId, context: &Context, game: &GameState) -> Event {
        dispatch!(self, a => a.event(target, context, game))
    }

    fn event_array(&self, context: &Context, game: &GameState) -> Vec<Event> {
        dispatch!(self, a => a.event_array(context, game))
    }

    fn effect_message(&self, context: &Context, game: &GameState) -> String {
        dispatch!(self, a => a.effect_message(context, game))
    }
}

impl GameAction {
    // === Constructors ===

    #[must_use]
    pub fn draw(amount: i64) -> Self {
        GameAction::Draw(DrawAction::new(Amount::Fixed(amount)))
    }

    #[must_use]
    pub fn discard_at_random(amount: i64) -> Self {
        GameAction::DiscardAtRandom(DiscardAtRandomAction::new(Amount::Fixed(amount)))
    }

    #[must_use]
    pub fn gain_amber(amount: i64) -> Self {
        GameAction::GainAmber(GainAmberAction::new(Amount::Fixed(amount)))
    }

    /// Forge a key at the configured cost.
    #[must_use]
    pub fn forge_key() -> Self {
        GameAction::ForgeKey(ForgeKeyAction::new(Amount::Fixed(0)))
    }

    /// Return cards in play to their owner's hand.
    #[must_use]
    pub fn return_to_hand() -> Self {
        GameAction::ReturnToHand(ReturnToHandAction::default())
    }

    #[must_use]
    pub fn stun() -> Self {
        GameAction::Stun(StunAction::default())
    }

    #[must_use]
    pub fn remove_stun() -> Self {
        GameAction::RemoveStun(RemoveStunAction::default())
    }

    /// Exhaust the context's source card unless targeted otherwise.
    #[must_use]
    pub fn exhaust() -> Self {
        GameAction::Exhaust(ExhaustAction::default())
    }

    #[must_use]
    pub fn deal_damage(amount: i64) -> Self {
        GameAction::DealDamage(DealDamageAction::new(Amount::Fixed(amount)))
    }

    #[must_use]
    pub fn destroy() -> Self {
        GameAction::Destroy(DestroyAction::default())
    }

    /// Make a creature fight (or shake off its stun).
    #[must_use]
    pub fn fight() -> Self {
        GameAction::Fight(FightAction::default())
    }

    /// The fight itself: the context's source and target damage each other.
    #[must_use]
    pub fn resolve_fight() -> Self {
        GameAction::ResolveFight(ResolveFightAction::default())
    }

    /// Repeat `inner` a fixed number of times.
    #[must_use]
    pub fn sequential_for_each(count: i64, inner: GameAction) -> Self {
        GameAction::SequentialForEach(
            SequentialForEachAction::new(Amount::Fixed(count)).with_inner(inner),
        )
    }

    /// Repeat `inner` once per entity `source` yields.
    pub fn for_each(
        source: impl Fn(&Context, &GameState) -> Targets + 'static,
        inner: GameAction,
    ) -> Self {
        GameAction::SequentialForEach(
            SequentialForEachAction::over(std::sync::Arc::new(source)).with_inner(inner),
        )
    }

    /// Resolve several actions one after the other.
    #[must_use]
    pub fn sequential(actions: Vec<GameAction>) -> Self {
        GameAction::Sequential(SequentialAction::new(actions))
    }

    /// Choose between two actions on a live predicate.
    pub fn conditional(
        condition: impl Fn(&Context, &GameState) -> bool + 'static,
        if_true: GameAction,
        if_false: Option<GameAction>,
    ) -> Self {
        GameAction::Conditional(ConditionalAction::new(condition, if_true, if_false))
    }

    // === Builders ===

    /// Affect exactly these entities.
    #[must_use]
    pub fn targeting(mut self, targets: impl IntoIterator<Item = EntityId>) -> Self {
        self.set_target(targets.into_iter().collect());
        self
    }

    /// Affect whatever `resolver` yields at resolution time.
    #[must_use]
    pub fn targeting_with(
        mut self,
        resolver: impl Fn(&Context, &GameState) -> Targets + 'static,
    ) -> Self {
        self.set_default_target(std::sync::Arc::new(resolver));
        self
    }

    /// Affect every card matching `filter` at resolution time.
    #[must_use]
    pub fn targeting_matching(self, filter: CardFilter) -> Self {
        self.targeting_with(move |context, game| filter.select(context, game))
    }

    /// Replace the magnitude of actions that have one (draw, discard,
    /// gain amber, damage, repetition count). Other kinds ignore it.
    #[must_use]
    pub fn with_amount(mut self, amount: Amount) -> Self {
        match &mut self {
            GameAction::Draw(a) => a.amount = amount,
            GameAction::DiscardAtRandom(a) => a.amount = amount,
            GameAction::GainAmber(a) => a.amount = amount,
            GameAction::DealDamage(a) => a.amount = amount,
            GameAction::SequentialForEach(a) => a.count = amount,
            _ => {}
        }
        self
    }

    /// Adjust a key forge's cost. Other kinds ignore it.
    #[must_use]
    pub fn with_modifier(mut self, modifier: Amount) -> Self {
        if let GameAction::ForgeKey(a) = &mut self {
            a.modifier = modifier;
        }
        self
    }

    /// Take cards from `location` instead of the play area when returning
    /// to hand. Other kinds ignore it.
    #[must_use]
    pub fn from_location(mut self, location: Location) -> Self {
        if let GameAction::ReturnToHand(a) = &mut self {
            a.location = location;
        }
        self
    }

    // === Resolution ===

    /// Queue this action: a legality gate, then the pre-event hook and
    /// the event window in separate steps.
    pub fn resolve(&self, context: Context, pipeline: &mut Pipeline) {
        let action = self.clone();
        pipeline.queue_labelled_step(format!("resolve {}", self.kind()), move |p, g| {
            if !action.has_legal_target(&context, g) {
                debug!(action = %action.kind(), "no legal target");
                return;
            }
            action.queue_window(context, p);
        });
    }

    /// Queue the pre-event and window steps without a legality gate.
    pub(crate) fn queue_window(self, context: Context, pipeline: &mut Pipeline) {
        let kind = self.kind();
        let (action, ctx) = (self.clone(), context.clone());
        pipeline.queue_labelled_step(format!("{kind}: pre-event"), move |p, g| {
            action.pre_event(&ctx, p, g);
        });
        pipeline.queue_labelled_step(format!("{kind}: window"), move |p, g| {
            let events = self.event_array(&context, g);
            p.open_event_window(events);
        });
    }
}

/// Shared helper: the entity as a player, if it is one.
fn as_player(target: EntityId, game: &GameState) -> Option<crate::core::PlayerId> {
    target.as_player(game.player_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cards::{CardDefinition, CardId, CardRegistry, House};
    use crate::core::{EngineConfig, PlayerId};

    const P0: PlayerId = PlayerId::new(0);

    fn game() -> GameState {
        let mut registry = CardRegistry::new();
        registry
            .register(CardDefinition::creature(CardId::new(1), "Zorg", House::Mars, 7))
            .unwrap();
        GameState::new(EngineConfig::default(), Arc::new(registry), &["Alice", "Bob"], 0)
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(GameAction::return_to_hand().kind().name(), "returnToHand");
        assert_eq!(GameAction::sequential_for_each(2, GameAction::stun()).kind().to_string(), "sequentialForEach");
    }

    #[test]
    fn test_last_target_call_wins() {
        let mut game = game();
        let a = game.create_card(CardId::new(1), P0, Location::PlayArea);
        let b = game.create_card(CardId::new(1), P0, Location::PlayArea);
        let context = Context::new(P0);

        let fixed_then_dynamic = GameAction::stun()
            .targeting([a])
            .targeting_with(move |_, _| [b].into_iter().collect());
        assert_eq!(fixed_then_dynamic.update(&context, &game).targets.as_slice(), &[b]);

        let dynamic_then_fixed = GameAction::stun()
            .targeting_with(move |_, _| [b].into_iter().collect())
            .targeting([a]);
        assert_eq!(dynamic_then_fixed.update(&context, &game).targets.as_slice(), &[a]);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut game = game();
        game.create_card(CardId::new(1), P0, Location::PlayArea);
        game.create_card(CardId::new(1), P0, Location::PlayArea);
        let context = Context::new(P0);

        let action = GameAction::for_each(
            |c, g| CardFilter::friendly_creature().select(c, g),
            GameAction::gain_amber(1),
        );
        let first = action.update(&context, &game);
        let second = action.update(&context, &game);
        assert_eq!(first, second);
        assert_eq!(first.amount, 2);
    }

    #[test]
    fn test_resolve_skips_illegal_actions() {
        let mut game = game();
        let mut pipeline = Pipeline::new();
        GameAction::forge_key().resolve(Context::new(P0), &mut pipeline);
        pipeline.drain(&mut game);

        assert_eq!(pipeline.history(), ["resolve forgeKey"]);
        assert_eq!(game.player(P0).keys, 0);
    }

    #[test]
    fn test_resolve_runs_pre_event_then_window() {
        let mut game = game();
        let mut pipeline = Pipeline::new();
        GameAction::gain_amber(3).resolve(Context::new(P0), &mut pipeline);
        pipeline.drain(&mut game);

        assert_eq!(game.player(P0).amber, 3);
        assert_eq!(
            &pipeline.history()[..3],
            ["resolve gainAmber", "gainAmber: pre-event", "gainAmber: window"]
        );
    }
}
