//! Ability requirements.
//!
//! Checked in a fixed order; the first failure is reported so callers can
//! explain why an ability is unavailable.

use serde::{Deserialize, Serialize};

use super::ability::{AbilityRole, CardAbility};
use crate::actions::Context;
use crate::core::GameState;
use crate::zones::Location;

/// A condition an ability's use must satisfy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Requirement {
    /// In play for in-play roles, in hand for play abilities.
    Location,
    /// The acting player controls the card.
    Controller,
    /// The card's house is the acting player's active house.
    House,
    /// Abilities that exhaust need a ready card.
    Exhausted,
    /// Stunned creatures cannot fight, reap or use actions; only a
    /// stunned creature can have its stun removed.
    Stunned,
    /// A targeted ability needs at least one candidate.
    Targets,
}

impl CardAbility {
    /// The first requirement not met by `context`, skipping `ignored`.
    #[must_use]
    pub fn unmet_requirement(
        &self,
        context: &Context,
        game: &GameState,
        ignored: &[Requirement],
    ) -> Option<Requirement> {
        let checks = [
            Requirement::Location,
            Requirement::Controller,
            Requirement::House,
            Requirement::Exhausted,
            Requirement::Stunned,
            Requirement::Targets,
        ];
        checks
            .into_iter()
            .filter(|requirement| !ignored.contains(requirement))
            .find(|&requirement| !self.meets(requirement, context, game))
    }

    fn meets(&self, requirement: Requirement, context: &Context, game: &GameState) -> bool {
        let card = context.source.and_then(|id| game.card(id));

        match requirement {
            Requirement::Location => card.is_some_and(|card| {
                if self.role.needs_play_area() {
                    card.location == Location::PlayArea
                } else {
                    card.location == Location::Hand
                }
            }),
            Requirement::Controller => card.is_some_and(|card| card.controller == context.player),
            Requirement::House => {
                context.ignore_house_restriction
                    || card
                        .and_then(|card| game.registry().get(card.card_id))
                        .is_some_and(|definition| {
                            game.player(context.player)
                                .active_house
                                .is_some_and(|active| active.allows(definition.house))
                        })
            }
            Requirement::Exhausted => !self.exhausts() || card.is_some_and(|card| !card.exhausted),
            Requirement::Stunned => match self.role {
                AbilityRole::Fight | AbilityRole::Reap | AbilityRole::Action => {
                    card.is_some_and(|card| !card.is_stunned())
                }
                AbilityRole::RemoveStun => card.is_some_and(|card| card.is_stunned()),
                AbilityRole::Play => true,
            },
            Requirement::Targets => self
                .target
                .as_ref()
                .map_or(true, |target| !target.filter.select(context, game).is_empty()),
        }
    }
}
