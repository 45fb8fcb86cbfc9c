//! Chat command integration tests, driven through `Game`.

use keyforge_pipeline::abilities::AbilityRole;
use keyforge_pipeline::actions::GameAction;
use keyforge_pipeline::cards::catalog::{DEXTRE, PUNCH, TROLL, ZORG};
use keyforge_pipeline::cards::{House, TokenKind};
use keyforge_pipeline::core::{ActiveHouse, ClockState, EngineConfig, PlayerId};
use keyforge_pipeline::game::{ActivationError, Game, GameBuilder};
use keyforge_pipeline::pipeline::{EventName, PromptError, PromptResponse, ResolutionStatus};
use keyforge_pipeline::triggers::Trigger;
use keyforge_pipeline::zones::Location;

const ALICE: PlayerId = PlayerId::new(0);
const BOB: PlayerId = PlayerId::new(1);

fn game() -> Game {
    let mut game = GameBuilder::new().players(["Alice", "Bob"]).build(3).unwrap();
    game.state.player_mut(ALICE).active_house = Some(ActiveHouse::Chosen(House::Brobnar));
    game
}

#[test]
fn test_cancel_prompt_skips_a_target_choice() {
    let mut game = game();
    let punch = game.state.create_card(PUNCH, ALICE, Location::Hand);
    let dextre = game.state.create_card(DEXTRE, BOB, Location::PlayArea);

    assert_eq!(
        game.activate(ALICE, punch, AbilityRole::Play),
        Ok(ResolutionStatus::WaitingForPrompt(ALICE))
    );
    assert!(game.execute_command(ALICE, "/cancel-prompt"));

    assert_eq!(game.status(), ResolutionStatus::Complete);
    assert!(game.state.cancel_prompt_used);
    assert_eq!(game.state.card(dextre).unwrap().tokens(TokenKind::Damage), 0);
    assert_eq!(game.state.cards_in(ALICE, Location::Discard), &[punch]);
    assert!(game
        .state
        .messages()
        .iter()
        .any(|m| m.text == "Alice uses the /cancel-prompt to skip the current step."));
}

#[test]
fn test_token_sets_the_count() {
    let mut game = game();
    let troll = game.state.create_card(TROLL, ALICE, Location::PlayArea);
    let zorg = game.state.create_card(ZORG, BOB, Location::PlayArea);

    assert!(game.execute_command(ALICE, "/token damage 3"));
    assert_eq!(game.status(), ResolutionStatus::WaitingForPrompt(ALICE));
    assert_eq!(
        game.respond(ALICE, PromptResponse::Card(zorg)),
        Err(PromptError::InvalidCard(zorg))
    );
    game.respond(ALICE, PromptResponse::Card(troll)).unwrap();
    assert_eq!(game.state.card(troll).unwrap().tokens(TokenKind::Damage), 3);
    assert_eq!(
        game.state.last_message(),
        Some("Alice uses the /token command to set the damage token count of Troll to 3")
    );

    game.execute_command(ALICE, "/token damage 1");
    game.respond(ALICE, PromptResponse::Card(troll)).unwrap();
    assert_eq!(game.state.card(troll).unwrap().tokens(TokenKind::Damage), 1);
}

#[test]
fn test_token_respects_configured_kinds() {
    let config = EngineConfig {
        allowed_tokens: vec![TokenKind::Damage],
        ..EngineConfig::default()
    };
    let mut game = GameBuilder::new().config(config).build(3).unwrap();
    game.state.create_card(TROLL, ALICE, Location::PlayArea);

    assert!(!game.execute_command(ALICE, "/token stun"));
    assert!(!game.execute_command(ALICE, "/token sparkle 2"));
    assert!(game.pipeline.is_empty());
    assert!(game.execute_command(ALICE, "/token damage"));
}

#[test]
fn test_active_house_unlocks_cards() {
    let mut game = game();
    let zorg = game.state.create_card(ZORG, ALICE, Location::PlayArea);
    assert!(game.activate(ALICE, zorg, AbilityRole::Reap).is_err());

    assert!(game.execute_command(ALICE, "/active-house Mars"));
    assert_eq!(
        game.state.last_message(),
        Some("Alice manually changed their active house to mars")
    );
    assert_eq!(game.activate(ALICE, zorg, AbilityRole::Reap), Ok(ResolutionStatus::Complete));
    assert_eq!(game.state.player(ALICE).amber, 1);
}

#[test]
fn test_active_house_outside_the_turn() {
    let mut game = game();
    assert!(game.execute_command(BOB, "/active-house logos"));
    assert_eq!(game.state.player(BOB).active_house, None);
    assert_eq!(
        game.state.last_message(),
        Some("Bob attempted to change their active house with /active-house, but they cannot have an active house currently")
    );
}

#[test]
fn test_discard_fires_reactions() {
    let mut game = game();
    for _ in 0..3 {
        game.state.create_card(TROLL, ALICE, Location::Hand);
    }
    game.state.triggers.register(Trigger::reaction(
        "Scavenge",
        EventName::Discard,
        BOB,
        GameAction::gain_amber(1),
    ));

    assert!(game.execute_command(ALICE, "/discard 2"));
    assert_eq!(game.state.hand(ALICE).len(), 1);
    assert_eq!(game.state.cards_in(ALICE, Location::Discard).len(), 2);
    assert_eq!(game.state.player(BOB).amber, 1);
}

#[test]
fn test_clocks() {
    let mut game = game();
    game.execute_command(ALICE, "/stop-clocks");
    for (_, player) in game.state.players.iter() {
        assert_eq!(player.clock.state(), ClockState::Paused);
    }

    let before = game.state.player(BOB).clock.remaining();
    game.execute_command(BOB, "/modify-clock 30");
    assert_eq!(game.state.player(BOB).clock.remaining(), before + 30);
    game.execute_command(BOB, "/modify-clock -5");
    assert_eq!(game.state.player(BOB).clock.remaining(), before + 90);

    game.execute_command(BOB, "/start-clocks");
    assert_eq!(game.state.player(ALICE).clock.state(), ClockState::Running);
    assert_eq!(game.state.last_message(), Some("Bob restarts the timers"));
}

#[test]
fn test_forge_and_unforge() {
    let mut game = game();
    game.execute_command(ALICE, "/unforge");
    assert_eq!(game.state.player(ALICE).keys, 0);
    assert!(game.state.messages().is_empty());

    game.execute_command(ALICE, "/forge");
    game.execute_command(ALICE, "/forge");
    game.execute_command(ALICE, "/unforge");
    assert_eq!(game.state.player(ALICE).keys, 1);
    assert_eq!(
        game.state.last_message(),
        Some("Alice uses the /unforge command to unforge a key")
    );
}

#[test]
fn test_negative_draw_uses_the_default_count() {
    let config = EngineConfig {
        default_draw: 2,
        ..EngineConfig::default()
    };
    let mut game = GameBuilder::new()
        .players(["Alice", "Bob"])
        .config(config)
        .deck(0, vec![TROLL, ZORG, TROLL, ZORG, TROLL])
        .build(3)
        .unwrap();

    assert!(game.execute_command(ALICE, "/draw -5"));
    assert_eq!(game.state.hand(ALICE).len(), 2);
    assert_eq!(game.state.cards_in(ALICE, Location::Deck).len(), 3);
    assert_eq!(
        game.state.last_message(),
        Some("Alice uses the /draw command to draw 2 cards to their hand")
    );
}

#[test]
fn test_huge_clock_change_saturates() {
    let mut game = game();
    assert!(game.execute_command(ALICE, "/modify-clock 9223372036854775807"));
    assert_eq!(game.state.player(ALICE).clock.remaining(), i64::MAX);
    game.execute_command(ALICE, "/modify-clock 30");
    assert_eq!(game.state.player(ALICE).clock.remaining(), i64::MAX);
}

#[test]
fn test_huge_token_count_survives_more_damage() {
    let mut game = game();
    let troll = game.state.create_card(TROLL, ALICE, Location::PlayArea);
    let punch = game.state.create_card(PUNCH, ALICE, Location::Hand);

    game.execute_command(ALICE, "/token damage 9223372036854775807");
    game.respond(ALICE, PromptResponse::Card(troll)).unwrap();
    assert_eq!(game.state.card(troll).unwrap().tokens(TokenKind::Damage), i64::MAX);

    game.activate(ALICE, punch, AbilityRole::Play).unwrap();
    let status = game.respond(ALICE, PromptResponse::Card(troll)).unwrap();
    assert_eq!(status, ResolutionStatus::Complete);
    assert!(game.state.cards_in(ALICE, Location::Discard).contains(&troll));
}

#[test]
fn test_unknown_seat_is_rejected() {
    let mut game = game();
    let stranger = PlayerId::new(7);
    let troll = game.state.create_card(TROLL, ALICE, Location::PlayArea);

    assert!(!game.execute_command(stranger, "/forge"));
    assert!(game.state.messages().is_empty());
    assert_eq!(
        game.activate(stranger, troll, AbilityRole::Reap),
        Err(ActivationError::UnknownPlayer(stranger))
    );
}

#[test]
fn test_unknown_commands_change_nothing() {
    let mut game = game();
    assert!(!game.execute_command(ALICE, "/reveal"));
    assert!(!game.execute_command(ALICE, "hello there"));
    assert!(game.state.messages().is_empty());
}
