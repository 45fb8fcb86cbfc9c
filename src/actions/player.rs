//! Actions that affect players.
//!
//! Each defaults to the acting player.

use smallvec::smallvec;

use super::context::Context;
use super::target::{Amount, ResolvedProperties, TargetFn, TargetKind, TargetSource, Targets};
use super::{as_player, Action, ActionKind};
use crate::core::{EntityId, GameState, MessageArg};
use crate::pipeline::{Event, EventName};
use crate::zones::Location;

const PLAYER: &[TargetKind] = &[TargetKind::Player];

fn acting_player(context: &Context) -> Targets {
    smallvec![EntityId::player(context.player)]
}

macro_rules! player_targeting {
    () => {
        fn target_kinds(&self) -> &'static [TargetKind] {
            PLAYER
        }

        fn set_target(&mut self, targets: Targets) {
            self.target = TargetSource::Fixed(targets);
        }

        fn set_default_target(&mut self, resolver: TargetFn) {
            self.target = TargetSource::Dynamic(resolver);
        }
    };
}

/// Draw cards.
#[derive(Clone, Debug)]
pub struct DrawAction {
    pub target: TargetSource,
    pub amount: Amount,
}

impl DrawAction {
    #[must_use]
    pub fn new(amount: Amount) -> Self {
        Self {
            target: TargetSource::Natural,
            amount,
        }
    }
}

impl Action for DrawAction {
    player_targeting!();

    fn kind(&self) -> ActionKind {
        ActionKind::Draw
    }

    fn effect_template(&self) -> &str {
        "make {0} draw {1} cards"
    }

    fn update(&self, context: &Context, game: &GameState) -> ResolvedProperties {
        ResolvedProperties {
            targets: self.target.resolve(context, game, || acting_player(context)),
            amount: self.amount.resolve(context, game),
        }
    }

    fn can_affect(&self, target: EntityId, context: &Context, game: &GameState) -> bool {
        as_player(target, game).is_some() && self.amount.resolve(context, game) > 0
    }

    fn event(&self, target: EntityId, context: &Context, game: &GameState) -> Event {
        let player = as_player(target, game).unwrap_or(context.player);
        let count = self.amount.resolve(context, game).max(0);
        Event::new(EventName::Draw, context.clone(), move |_, game| {
            game.draw_cards(player, u32::try_from(count).unwrap_or(0)) > 0
        })
        .with_player(player)
        .with_amount(count)
    }
}

/// Discard random cards from hand.
#[derive(Clone, Debug)]
pub struct DiscardAtRandomAction {
    pub target: TargetSource,
    pub amount: Amount,
}

impl DiscardAtRandomAction {
    #[must_use]
    pub fn new(amount: Amount) -> Self {
        Self {
            target: TargetSource::Natural,
            amount,
        }
    }
}

impl Action for DiscardAtRandomAction {
    player_targeting!();

    fn kind(&self) -> ActionKind {
        ActionKind::DiscardAtRandom
    }

    fn effect_template(&self) -> &str {
        "make {0} discard {1} cards at random"
    }

    fn update(&self, context: &Context, game: &GameState) -> ResolvedProperties {
        ResolvedProperties {
            targets: self.target.resolve(context, game, || acting_player(context)),
            amount: self.amount.resolve(context, game),
        }
    }

    fn can_affect(&self, target: EntityId, context: &Context, game: &GameState) -> bool {
        as_player(target, game).is_some_and(|p| !game.hand(p).is_empty())
            && self.amount.resolve(context, game) > 0
    }

    fn event(&self, target: EntityId, context: &Context, game: &GameState) -> Event {
        let player = as_player(target, game).unwrap_or(context.player);
        let count = self.amount.resolve(context, game).max(0);
        Event::new(EventName::Discard, context.clone(), move |_, game| {
            let hand = game.hand(player).to_vec();
            let picked = game
                .rng
                .sample(&hand, usize::try_from(count).unwrap_or(0));
            for &card in &picked {
                game.move_card(card, Location::Discard, None);
            }
            if picked.is_empty() {
                return false;
            }
            game.add_message(
                "{0} discards {1} at random",
                &[player.into(), MessageArg::Entities(picked)],
            );
            true
        })
        .with_player(player)
        .with_amount(count)
    }
}

/// Add amber to a player's pool.
#[derive(Clone, Debug)]
pub struct GainAmberAction {
    pub target: TargetSource,
    pub amount: Amount,
}

impl GainAmberAction {
    #[must_use]
    pub fn new(amount: Amount) -> Self {
        Self {
            target: TargetSource::Natural,
            amount,
        }
    }
}

impl Action for GainAmberAction {
    player_targeting!();

    fn kind(&self) -> ActionKind {
        ActionKind::GainAmber
    }

    fn effect_template(&self) -> &str {
        "make {0} gain {1} amber"
    }

    fn update(&self, context: &Context, game: &GameState) -> ResolvedProperties {
        ResolvedProperties {
            targets: self.target.resolve(context, game, || acting_player(context)),
            amount: self.amount.resolve(context, game),
        }
    }

    fn can_affect(&self, target: EntityId, context: &Context, game: &GameState) -> bool {
        as_player(target, game).is_some() && self.amount.resolve(context, game) > 0
    }

    fn event(&self, target: EntityId, context: &Context, game: &GameState) -> Event {
        let player = as_player(target, game).unwrap_or(context.player);
        let amount = self.amount.resolve(context, game).max(0);
        Event::new(EventName::GainAmber, context.clone(), move |_, game| {
            let gained = u32::try_from(amount).unwrap_or(0);
            let state = game.player_mut(player);
            state.amber = state.amber.saturating_add(gained);
            gained > 0
        })
        .with_player(player)
        .with_amount(amount)
    }
}

/// Spend amber to forge a key.
///
/// The cost is the configured key cost plus `modifier`, never below zero.
/// Both legality and the handler read the player's pool at the time they
/// run.
#[derive(Clone, Debug)]
pub struct ForgeKeyAction {
    pub target: TargetSource,
    pub modifier: Amount,
}

impl ForgeKeyAction {
    #[must_use]
    pub fn new(modifier: Amount) -> Self {
        Self {
            target: TargetSource::Natural,
            modifier,
        }
    }

    /// Amber needed right now.
    #[must_use]
    pub fn cost(&self, context: &Context, game: &GameState) -> i64 {
        (game.config().key_cost + self.modifier.resolve(context, game)).max(0)
    }
}

impl Action for ForgeKeyAction {
    player_targeting!();

    fn kind(&self) -> ActionKind {
        ActionKind::ForgeKey
    }

    fn effect_template(&self) -> &str {
        "forge a key at a cost of {1} amber"
    }

    fn update(&self, context: &Context, game: &GameState) -> ResolvedProperties {
        ResolvedProperties {
            targets: self.target.resolve(context, game, || acting_player(context)),
            amount: self.cost(context, game),
        }
    }

    fn can_affect(&self, target: EntityId, context: &Context, game: &GameState) -> bool {
        as_player(target, game)
            .is_some_and(|p| i64::from(game.player(p).amber) >= self.cost(context, game))
    }

    fn event(&self, target: EntityId, context: &Context, game: &GameState) -> Event {
        let player = as_player(target, game).unwrap_or(context.player);
        let cost = self.cost(context, game);
        Event::new(EventName::ForgeKey, context.clone(), move |_, game| {
            let cost = u32::try_from(cost).unwrap_or(u32::MAX);
            let state = game.player_mut(player);
            if state.amber < cost {
                return false;
            }
            state.amber -= cost;
            state.keys += 1;
            game.add_message(
                "{0} forges a key, paying {1} amber",
                &[player.into(), cost.into()],
            );
            true
        })
        .with_player(player)
        .with_amount(cost)
    }
}
