//! Command execution.

use std::str::FromStr;

use tracing::{info, warn};

use super::parser::Command;
use crate::actions::{Context, GameAction};
use crate::cards::{House, TokenKind};
use crate::core::{ActiveHouse, GameState, MessageArg, PlayerId};
use crate::pipeline::{Pipeline, Prompt};
use crate::zones::Location;

/// Parse and run one chat line for `player`.
///
/// Returns `false` for unknown seats, unknown verbs and invalid token
/// kinds, leaving the game untouched; every other command returns `true`, even when it ends
/// up doing nothing. Actions a command hands to the pipeline run the next
/// time it drains.
pub fn execute_command(
    game: &mut GameState,
    pipeline: &mut Pipeline,
    player: PlayerId,
    text: &str,
) -> bool {
    if !game.has_player(player) {
        warn!(player = player.0, "command from an unknown seat");
        return false;
    }
    let command = match Command::parse(text, game.config()) {
        Ok(command) => command,
        Err(err) => {
            warn!(player = player.0, %err, "command rejected");
            return false;
        }
    };

    info!(player = player.0, ?command, "executing command");
    command.execute(game, pipeline, player);
    true
}

impl Command {
    /// Run this command on behalf of `player`.
    pub fn execute(self, game: &mut GameState, pipeline: &mut Pipeline, player: PlayerId) {
        let who = MessageArg::from(player);
        match self {
            Command::Draw { count } => {
                game.add_message(
                    "{0} uses the /draw command to draw {1} cards to their hand",
                    &[who, count.into()],
                );
                game.draw_cards(player, count);
            }
            Command::Discard { count } => {
                let plural = if count > 1 { "s" } else { "" };
                game.add_message(
                    "{0} uses the /discard command to discard {1} card{2} at random",
                    &[who, count.into(), plural.into()],
                );
                GameAction::discard_at_random(i64::from(count)).resolve(Context::new(player), pipeline);
            }
            Command::CancelPrompt => {
                game.add_message("{0} uses the /cancel-prompt to skip the current step.", &[who]);
                pipeline.cancel_step();
                game.cancel_prompt_used = true;
            }
            Command::Token { kind, count } => pipeline.queue_prompt(token_prompt(player, kind, count)),
            Command::Forge => {
                game.add_message("{0} uses the /forge command to forge a key", &[who]);
                let state = game.player_mut(player);
                state.keys = state.keys.saturating_add(1);
            }
            Command::Unforge => {
                if game.player(player).keys == 0 {
                    return;
                }
                game.add_message("{0} uses the /unforge command to unforge a key", &[who]);
                game.player_mut(player).keys -= 1;
            }
            Command::ActiveHouse(house) => set_active_house(game, player, house),
            Command::StopClocks => {
                game.add_message("{0} stops the timers", &[who]);
                for p in game.players.values_mut() {
                    p.clock.pause();
                }
            }
            Command::StartClocks => {
                game.add_message("{0} restarts the timers", &[who]);
                for p in game.players.values_mut() {
                    p.clock.restart();
                }
            }
            Command::ModifyClock { seconds } => {
                game.add_message("{0} adds {1} seconds to their clock", &[who, seconds.into()]);
                game.player_mut(player).clock.modify(seconds);
            }
            Command::DisconnectMe => game.player_mut(player).disconnect_requested = true,
            Command::Manual => {
                game.manual_mode = !game.manual_mode;
                let state = if game.manual_mode { "on" } else { "off" };
                game.add_alert(&format!("{{0}} switches manual mode {state}"), &[who]);
            }
        }
    }
}

fn token_prompt(player: PlayerId, kind: TokenKind, count: i64) -> Prompt {
    Prompt::select_card(
        player,
        "Select a card",
        move |card, _| card.location == Location::PlayArea && card.controller == player,
        move |card, _, game| {
            if let Some(instance) = game.card_mut(card) {
                let current = instance.tokens(kind);
                instance.add_tokens(kind, count - current);
            }
            game.add_message(
                "{0} uses the /token command to set the {1} token count of {2} to {3}",
                &[player.into(), kind.name().into(), card.into(), count.into()],
            );
        },
    )
}

fn set_active_house(game: &mut GameState, player: PlayerId, house: Option<String>) {
    let Some(house) = house else {
        return;
    };
    let who = MessageArg::from(player);
    if game.player(player).active_house.is_none() {
        game.add_message(
            "{0} attempted to change their active house with /active-house, but they cannot have an active house currently",
            &[who, house.into()],
        );
        return;
    }

    let selection = if house.eq_ignore_ascii_case("none") {
        Some(ActiveHouse::Unaligned)
    } else {
        House::from_str(&house).ok().map(ActiveHouse::Chosen)
    };
    match selection {
        Some(selection) => {
            game.add_message(
                "{0} manually changed their active house to {1}",
                &[who, house.to_ascii_lowercase().into()],
            );
            game.player_mut(player).active_house = Some(selection);
        }
        None => game.add_message(
            "{0} attempted to change their active house with /active-house, but {1} is not a valid house",
            &[who, house.into()],
        ),
    }
}
