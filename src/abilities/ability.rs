//! Ability data.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::actions::{CardFilter, Context, GameAction};
use crate::core::{EntityId, PlayerId};

/// What an ability is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AbilityRole {
    /// Resolves when the card is played from hand.
    Play,
    /// An "Action:" ability of a card in play.
    Action,
    Fight,
    Reap,
    /// Using a stunned creature clears its stun instead.
    RemoveStun,
}

impl AbilityRole {
    /// Roles used on a card that is already in play.
    #[must_use]
    pub fn needs_play_area(self) -> bool {
        !matches!(self, AbilityRole::Play)
    }
}

impl fmt::Display for AbilityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AbilityRole::Play => "play",
            AbilityRole::Action => "action",
            AbilityRole::Fight => "fight",
            AbilityRole::Reap => "reap",
            AbilityRole::RemoveStun => "remove-stun",
        };
        f.write_str(name)
    }
}

/// A cost paid before the effect resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityCost {
    /// Exhaust the source card.
    Exhaust,
}

/// A card the player picks before the ability resolves. The chosen card
/// becomes `Context::target`.
#[derive(Clone, Debug)]
pub struct AbilityTarget {
    pub prompt: String,
    pub filter: CardFilter,
}

/// One link of an effect chain.
///
/// `then` resolves only if at least one event of this link's window
/// resolved. `may` turns a link into an optional one: the acting player
/// is asked before it resolves, and only when it would do something.
#[derive(Clone, Debug)]
pub struct AbilityEffect {
    pub action: GameAction,
    /// Overrides the spectator message; `{0}` is the player, `{1}` the
    /// source card, `{2}` the action's targets.
    pub message: Option<String>,
    /// Question asked before an optional link, e.g. "forge a key".
    pub may: Option<String>,
    pub then: Option<Arc<AbilityEffect>>,
}

impl AbilityEffect {
    #[must_use]
    pub fn new(action: GameAction) -> Self {
        Self {
            action,
            message: None,
            may: None,
            then: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.message = Some(template.into());
        self
    }

    /// Make this link optional.
    #[must_use]
    pub fn optional(mut self, question: impl Into<String>) -> Self {
        self.may = Some(question.into());
        self
    }

    #[must_use]
    pub fn then(mut self, next: AbilityEffect) -> Self {
        self.then = Some(Arc::new(next));
        self
    }
}

/// An ability printed on a card.
///
/// ```
/// use keyforge_pipeline::abilities::{AbilityEffect, AbilityRole, CardAbility};
/// use keyforge_pipeline::actions::GameAction;
///
/// let reap = CardAbility::reap();
/// assert_eq!(reap.role, AbilityRole::Reap);
/// assert!(reap.exhausts());
///
/// let play = CardAbility::play(AbilityEffect::new(GameAction::draw(2)));
/// assert!(!play.exhausts());
/// assert!(play.target.is_none());
/// ```
#[derive(Clone, Debug)]
pub struct CardAbility {
    pub role: AbilityRole,
    pub title: String,
    pub target: Option<AbilityTarget>,
    pub costs: SmallVec<[AbilityCost; 1]>,
    pub effect: Arc<AbilityEffect>,
}

impl CardAbility {
    fn new(role: AbilityRole, title: impl Into<String>, effect: AbilityEffect) -> Self {
        Self {
            role,
            title: title.into(),
            target: None,
            costs: SmallVec::new(),
            effect: Arc::new(effect),
        }
    }

    /// Standard fight: exhaust, pick an enemy creature, fight it.
    #[must_use]
    pub fn fight() -> Self {
        let mut ability = Self::new(
            AbilityRole::Fight,
            "Fight with this creature",
            AbilityEffect::new(GameAction::resolve_fight()),
        )
        .with_target("Choose a creature to attack", CardFilter::enemy_creature());
        ability.costs = smallvec![AbilityCost::Exhaust];
        ability
    }

    /// Standard reap: exhaust, gain one amber.
    #[must_use]
    pub fn reap() -> Self {
        let mut ability = Self::new(
            AbilityRole::Reap,
            "Reap with this creature",
            AbilityEffect::new(GameAction::gain_amber(1)),
        );
        ability.costs = smallvec![AbilityCost::Exhaust];
        ability
    }

    /// Standard stun removal: exhaust, clear the stun.
    #[must_use]
    pub fn remove_stun() -> Self {
        let mut ability = Self::new(
            AbilityRole::RemoveStun,
            "Remove this creature's stun",
            AbilityEffect::new(GameAction::remove_stun()),
        );
        ability.costs = smallvec![AbilityCost::Exhaust];
        ability
    }

    /// A "Play:" ability.
    #[must_use]
    pub fn play(effect: AbilityEffect) -> Self {
        Self::new(AbilityRole::Play, "Play", effect)
    }

    /// An "Action:" ability; using it exhausts the card.
    #[must_use]
    pub fn action(title: impl Into<String>, effect: AbilityEffect) -> Self {
        let mut ability = Self::new(AbilityRole::Action, title, effect);
        ability.costs = smallvec![AbilityCost::Exhaust];
        ability
    }

    /// Require a card choice before resolving.
    #[must_use]
    pub fn with_target(mut self, prompt: impl Into<String>, filter: CardFilter) -> Self {
        self.target = Some(AbilityTarget {
            prompt: prompt.into(),
            filter,
        });
        self
    }

    #[must_use]
    pub fn exhausts(&self) -> bool {
        self.costs.contains(&AbilityCost::Exhaust)
    }

    /// A fresh context for `player` using this ability of `source`.
    #[must_use]
    pub fn create_context(self: &Arc<Self>, player: PlayerId, source: EntityId) -> Context {
        Context::new(player)
            .with_source(source)
            .with_ability(Arc::clone(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_abilities() {
        let fight = CardAbility::fight();
        assert_eq!(fight.role, AbilityRole::Fight);
        assert!(fight.exhausts());
        assert!(fight.target.is_some());

        assert_eq!(CardAbility::remove_stun().role, AbilityRole::RemoveStun);
        assert!(CardAbility::action("Shout", AbilityEffect::new(GameAction::stun())).exhausts());
    }

    #[test]
    fn test_effect_chain() {
        let effect = AbilityEffect::new(GameAction::return_to_hand())
            .then(AbilityEffect::new(GameAction::forge_key()).optional("forge a key"));

        let then = effect.then.as_ref().unwrap();
        assert_eq!(then.may.as_deref(), Some("forge a key"));
        assert!(then.then.is_none());
        assert!(effect.may.is_none());
    }

    #[test]
    fn test_create_context() {
        let ability = Arc::new(CardAbility::reap());
        let context = ability.create_context(PlayerId::new(1), EntityId(5));

        assert_eq!(context.player, PlayerId::new(1));
        assert_eq!(context.source, Some(EntityId(5)));
        assert!(context.cancellable);
        assert_eq!(context.ability.unwrap().role, AbilityRole::Reap);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(AbilityRole::RemoveStun.to_string(), "remove-stun");
        assert!(!AbilityRole::Play.needs_play_area());
        assert!(AbilityRole::Reap.needs_play_area());
    }
}
