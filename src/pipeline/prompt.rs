//! Interactive prompts.
//!
//! A prompt suspends draining until the prompted player answers. Card
//! selection candidates are computed when the prompt reaches the front of
//! the queue, so they reflect everything resolved before it. A selection
//! prompt with no candidate is skipped.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::Pipeline;
use crate::cards::CardInstance;
use crate::core::{EntityId, GameState, PlayerId};

/// Which cards a selection prompt offers.
pub type CardCondition = Arc<dyn Fn(&CardInstance, &GameState) -> bool>;

type SelectHandler = Box<dyn FnOnce(EntityId, &mut Pipeline, &mut GameState)>;
type ChoiceHandler = Box<dyn FnOnce(usize, &mut Pipeline, &mut GameState)>;

/// A player's answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptResponse {
    Card(EntityId),
    Choice(usize),
    /// Decline; only allowed on cancellable prompts.
    Cancel,
}

/// Rejected responses. Nothing is mutated when one is returned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("no prompt is waiting for a response")]
    NoPendingPrompt,

    #[error("prompt is waiting for {expected}, not {actual}")]
    WrongPlayer { expected: PlayerId, actual: PlayerId },

    #[error("{0} is not a valid selection")]
    InvalidCard(EntityId),

    #[error("choice {0} is out of range")]
    InvalidChoice(usize),

    #[error("this prompt cannot be cancelled")]
    NotCancellable,
}

enum PromptKind {
    SelectCard {
        condition: CardCondition,
        candidates: Vec<EntityId>,
        on_select: SelectHandler,
    },
    Choice {
        options: Vec<String>,
        on_choose: ChoiceHandler,
    },
}

/// A decision owed by one player.
pub struct Prompt {
    pub player: PlayerId,
    pub title: String,
    pub cancellable: bool,
    kind: PromptKind,
}

impl Prompt {
    /// Ask `player` to pick a card matching `condition`.
    pub fn select_card(
        player: PlayerId,
        title: impl Into<String>,
        condition: impl Fn(&CardInstance, &GameState) -> bool + 'static,
        on_select: impl FnOnce(EntityId, &mut Pipeline, &mut GameState) + 'static,
    ) -> Self {
        Self {
            player,
            title: title.into(),
            cancellable: true,
            kind: PromptKind::SelectCard {
                condition: Arc::new(condition),
                candidates: Vec::new(),
                on_select: Box::new(on_select),
            },
        }
    }

    /// Ask `player` to pick one of several labelled options.
    pub fn choice<S: Into<String>>(
        player: PlayerId,
        title: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        on_choose: impl FnOnce(usize, &mut Pipeline, &mut GameState) + 'static,
    ) -> Self {
        Self {
            player,
            title: title.into(),
            cancellable: false,
            kind: PromptKind::Choice {
                options: options.into_iter().map(Into::into).collect(),
                on_choose: Box::new(on_choose),
            },
        }
    }

    #[must_use]
    pub fn cancellable(mut self, cancellable: bool) -> Self {
        self.cancellable = cancellable;
        self
    }

    /// Selectable cards, by id. Empty for choice prompts.
    #[must_use]
    pub fn candidates(&self) -> &[EntityId] {
        match &self.kind {
            PromptKind::SelectCard { candidates, .. } => candidates,
            PromptKind::Choice { .. } => &[],
        }
    }

    /// Option labels. Empty for selection prompts.
    #[must_use]
    pub fn options(&self) -> &[String] {
        match &self.kind {
            PromptKind::Choice { options, .. } => options,
            PromptKind::SelectCard { .. } => &[],
        }
    }

    /// Recompute candidates. Returns `false` if there is nothing to choose.
    pub(super) fn refresh(&mut self, game: &GameState) -> bool {
        match &mut self.kind {
            PromptKind::SelectCard {
                condition,
                candidates,
                ..
            } => {
                *candidates = game
                    .cards()
                    .filter(|card| condition(card, game))
                    .map(|card| card.entity_id)
                    .collect();
                candidates.sort();
                !candidates.is_empty()
            }
            PromptKind::Choice { options, .. } => !options.is_empty(),
        }
    }

    pub(super) fn validate(
        &self,
        player: PlayerId,
        response: PromptResponse,
        game: &GameState,
    ) -> Result<(), PromptError> {
        if player != self.player {
            return Err(PromptError::WrongPlayer {
                expected: self.player,
                actual: player,
            });
        }

        match (response, &self.kind) {
            (PromptResponse::Cancel, _) if !self.cancellable => Err(PromptError::NotCancellable),
            (PromptResponse::Cancel, _) => Ok(()),
            (
                PromptResponse::Card(id),
                PromptKind::SelectCard {
                    condition,
                    candidates,
                    ..
                },
            ) => {
                // State may have moved on (e.g. a chat command) since presentation.
                let still_valid = candidates.contains(&id)
                    && game.card(id).is_some_and(|card| condition(card, game));
                if still_valid {
                    Ok(())
                } else {
                    Err(PromptError::InvalidCard(id))
                }
            }
            (PromptResponse::Card(id), PromptKind::Choice { .. }) => {
                Err(PromptError::InvalidCard(id))
            }
            (PromptResponse::Choice(i), PromptKind::Choice { options, .. }) if i < options.len() => {
                Ok(())
            }
            (PromptResponse::Choice(i), _) => Err(PromptError::InvalidChoice(i)),
        }
    }

    /// Run the handler for a validated response.
    pub(super) fn answer(self, response: PromptResponse, pipeline: &mut Pipeline, game: &mut GameState) {
        match (response, self.kind) {
            (PromptResponse::Card(id), PromptKind::SelectCard { on_select, .. }) => {
                on_select(id, pipeline, game);
            }
            (PromptResponse::Choice(i), PromptKind::Choice { on_choose, .. }) => {
                on_choose(i, pipeline, game);
            }
            _ => {}
        }
    }
}

impl fmt::Debug for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prompt")
            .field("player", &self.player)
            .field("title", &self.title)
            .field("cancellable", &self.cancellable)
            .field("candidates", &self.candidates())
            .field("options", &self.options())
            .finish()
    }
}
