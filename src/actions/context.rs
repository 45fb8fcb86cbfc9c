//! Resolution context.

use std::sync::Arc;

use crate::abilities::CardAbility;
use crate::core::{EntityId, PlayerId};

/// Who is resolving what.
///
/// Built once per activation and passed by reference to every action and
/// event. The game state is not part of the context; it travels
/// alongside as an explicit argument.
#[derive(Clone, Debug)]
pub struct Context {
    /// The acting player.
    pub player: PlayerId,
    /// Card whose ability is resolving.
    pub source: Option<EntityId>,
    pub ability: Option<Arc<CardAbility>>,
    /// Card chosen by the ability's target prompt.
    pub target: Option<EntityId>,
    /// Lets card abilities be used outside the active house.
    pub ignore_house_restriction: bool,
    /// Whether prompts raised during this resolution may be declined.
    pub cancellable: bool,
}

impl Context {
    /// A context for `player` with no source.
    #[must_use]
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            source: None,
            ability: None,
            target: None,
            ignore_house_restriction: false,
            cancellable: true,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: Arc<CardAbility>) -> Self {
        self.ability = Some(ability);
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn ignoring_house(mut self) -> Self {
        self.ignore_house_restriction = true;
        self
    }

    #[must_use]
    pub fn uncancellable(mut self) -> Self {
        self.cancellable = false;
        self
    }
}
