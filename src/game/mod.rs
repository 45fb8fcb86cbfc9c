//! Top-level game facade.
//!
//! `Game` owns the state and the pipeline and exposes the entry points a
//! session layer calls: activate a card, answer a prompt, run a chat
//! command. Each entry point drains the pipeline before returning, so the
//! caller only ever sees a finished resolution or a pending prompt.

mod builder;

pub use builder::{GameBuilder, SetupError};

use thiserror::Error;
use tracing::info;

use crate::abilities::{AbilityRole, Requirement};
use crate::actions::{Context, GameAction};
use crate::cards::CardKind;
use crate::commands;
use crate::core::{EntityId, GameState, MessageArg, PlayerId};
use crate::pipeline::{Pipeline, PromptError, PromptResponse, ResolutionStatus};
use crate::zones::Location;

/// Why a card cannot be used.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActivationError {
    #[error("{0} does not exist")]
    UnknownCard(EntityId),

    #[error("{card} has no {role} ability")]
    MissingAbility { card: EntityId, role: AbilityRole },

    #[error("requirement not met: {0:?}")]
    Unmet(Requirement),

    #[error("waiting for {0} to answer a prompt")]
    PromptPending(PlayerId),

    #[error("{0} is not seated at this game")]
    UnknownPlayer(PlayerId),
}

/// A game in progress.
#[derive(Debug)]
pub struct Game {
    pub state: GameState,
    pub pipeline: Pipeline,
}

impl Game {
    #[must_use]
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            pipeline: Pipeline::new(),
        }
    }

    /// Current resolution status without draining.
    #[must_use]
    pub fn status(&self) -> ResolutionStatus {
        self.pipeline.status()
    }

    /// Use `card`'s ability with `role` on behalf of `player`.
    ///
    /// Requirements are checked up front. Playing a card moves it from
    /// hand to the play area first; action cards are discarded once
    /// their ability has resolved.
    pub fn activate(
        &mut self,
        player: PlayerId,
        card: EntityId,
        role: AbilityRole,
    ) -> Result<ResolutionStatus, ActivationError> {
        if !self.state.has_player(player) {
            return Err(ActivationError::UnknownPlayer(player));
        }
        if let ResolutionStatus::WaitingForPrompt(waiting) = self.pipeline.status() {
            return Err(ActivationError::PromptPending(waiting));
        }
        let instance = self.state.card(card).ok_or(ActivationError::UnknownCard(card))?;
        let ability = self
            .state
            .registry()
            .ability(instance.card_id, role)
            .ok_or(ActivationError::MissingAbility { card, role })?;

        let context = ability.create_context(player, card);
        if let Some(requirement) = ability.unmet_requirement(&context, &self.state, &[]) {
            return Err(ActivationError::Unmet(requirement));
        }
        info!(player = player.0, card = card.0, %role, "activating ability");

        if role == AbilityRole::Play {
            self.state
                .add_message("{0} plays {1}", &[MessageArg::from(player), card.into()]);
            self.state.move_card(card, Location::PlayArea, None);
        }
        self.pipeline.resolve_ability(context);

        let is_action_card = self
            .state
            .definition(card)
            .is_some_and(|definition| definition.kind == CardKind::Action);
        if role == AbilityRole::Play && is_action_card {
            self.pipeline.queue_labelled_step("discard played action", move |_, game| {
                if game.card(card).is_some_and(|c| c.location == Location::PlayArea) {
                    game.move_card(card, Location::Discard, None);
                }
            });
        }

        Ok(self.pipeline.drain(&mut self.state))
    }

    /// Resolve an ability context directly, bypassing requirement checks.
    pub fn resolve_ability(&mut self, context: Context) -> ResolutionStatus {
        self.pipeline.resolve_ability(context);
        self.pipeline.drain(&mut self.state)
    }

    /// Resolve a standalone action.
    pub fn resolve_action(&mut self, action: &GameAction, context: Context) -> ResolutionStatus {
        self.pipeline.resolve_action(action, context);
        self.pipeline.drain(&mut self.state)
    }

    /// Answer the pending prompt.
    pub fn respond(
        &mut self,
        player: PlayerId,
        response: PromptResponse,
    ) -> Result<ResolutionStatus, PromptError> {
        self.pipeline.respond(player, response, &mut self.state)
    }

    /// Skip the pending prompt and continue resolving.
    pub fn cancel_step(&mut self) -> ResolutionStatus {
        self.pipeline.cancel_step();
        self.pipeline.drain(&mut self.state)
    }

    /// Run a chat command; see [`commands::execute_command`].
    pub fn execute_command(&mut self, player: PlayerId, text: &str) -> bool {
        let accepted = commands::execute_command(&mut self.state, &mut self.pipeline, player, text);
        if accepted {
            self.pipeline.drain(&mut self.state);
        }
        accepted
    }
}
