//! Target sources and amounts.
//!
//! Both are recomputed from the live game on every `update`, so an action
//! value can be shared across resolutions without carrying stale state.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use super::context::Context;
use crate::cards::CardKind;
use crate::core::{EntityId, GameState};

/// Resolved targets. Most actions touch a handful of entities.
pub type Targets = SmallVec<[EntityId; 4]>;

/// Computes targets from the live game.
pub type TargetFn = Arc<dyn Fn(&Context, &GameState) -> Targets>;

/// Computes an amount from the live game.
pub type AmountFn = Arc<dyn Fn(&Context, &GameState) -> i64>;

/// Entity kinds an action may affect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Player,
    Creature,
    Artifact,
    Upgrade,
    Action,
}

impl From<CardKind> for TargetKind {
    fn from(kind: CardKind) -> Self {
        match kind {
            CardKind::Creature => TargetKind::Creature,
            CardKind::Artifact => TargetKind::Artifact,
            CardKind::Upgrade => TargetKind::Upgrade,
            CardKind::Action => TargetKind::Action,
        }
    }
}

/// How an action finds its targets. The last `set_*` call wins.
#[derive(Clone, Default)]
pub enum TargetSource {
    /// The action's own default (acting player, or the context's card).
    #[default]
    Natural,
    /// Fixed entities.
    Fixed(Targets),
    /// Recomputed per resolution.
    Dynamic(TargetFn),
}

impl TargetSource {
    /// Resolve, falling back to `natural` for `Natural`.
    pub fn resolve(
        &self,
        context: &Context,
        game: &GameState,
        natural: impl FnOnce() -> Targets,
    ) -> Targets {
        match self {
            TargetSource::Natural => natural(),
            TargetSource::Fixed(targets) => targets.clone(),
            TargetSource::Dynamic(f) => f(context, game),
        }
    }
}

impl fmt::Debug for TargetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSource::Natural => f.write_str("Natural"),
            TargetSource::Fixed(targets) => f.debug_tuple("Fixed").field(targets).finish(),
            TargetSource::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// A magnitude: fixed, or computed when the action updates.
#[derive(Clone)]
pub enum Amount {
    Fixed(i64),
    Computed(AmountFn),
}

impl Amount {
    pub fn computed(f: impl Fn(&Context, &GameState) -> i64 + 'static) -> Self {
        Amount::Computed(Arc::new(f))
    }

    #[must_use]
    pub fn resolve(&self, context: &Context, game: &GameState) -> i64 {
        match self {
            Amount::Fixed(n) => *n,
            Amount::Computed(f) => f(context, game),
        }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount::Fixed(0)
    }
}

impl From<i64> for Amount {
    fn from(n: i64) -> Self {
        Amount::Fixed(n)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Fixed(n) => f.debug_tuple("Fixed").field(n).finish(),
            Amount::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Resolution-scoped fields derived by `Action::update`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedProperties {
    pub targets: Targets,
    pub amount: i64,
}
