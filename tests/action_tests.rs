//! Action legality, late binding and message integration tests.

use std::sync::Arc;

use keyforge_pipeline::actions::{Action, Amount, CardFilter, Context, GameAction};
use keyforge_pipeline::cards::catalog::{self, BUMPSY, DEXTRE, MINDWARPER, TROLL, ZORG};
use keyforge_pipeline::cards::{House, TokenKind};
use keyforge_pipeline::core::{EngineConfig, EntityId, GameState, PlayerId};
use keyforge_pipeline::pipeline::{Pipeline, PromptResponse, ResolutionStatus};
use keyforge_pipeline::zones::Location;

const P0: PlayerId = PlayerId::new(0);
const P1: PlayerId = PlayerId::new(1);

fn game() -> GameState {
    let registry = catalog::core_set().unwrap();
    GameState::new(EngineConfig::default(), Arc::new(registry), &["Alice", "Bob"], 5)
}

fn drain(action: GameAction, context: Context, game: &mut GameState) -> Pipeline {
    let mut pipeline = Pipeline::new();
    action.resolve(context, &mut pipeline);
    pipeline.drain(game);
    pipeline
}

#[test]
fn test_events_only_for_affectable_targets() {
    let mut game = game();
    let zorg = game.create_card(ZORG, P1, Location::PlayArea);
    let troll = game.create_card(TROLL, P1, Location::PlayArea);
    game.card_mut(zorg).unwrap().set_stunned(true);

    let stun = GameAction::stun().targeting([zorg, troll]);
    let context = Context::new(P0);
    assert!(stun.has_legal_target(&context, &game));
    let events = stun.event_array(&context, &game);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].card, Some(troll));
}

#[test]
fn test_queries_do_not_mutate_state() {
    let mut game = game();
    let zorg = game.create_card(ZORG, P1, Location::PlayArea);
    game.player_mut(P0).amber = 7;
    let before_messages = game.messages().len();

    let context = Context::new(P0).with_source(zorg);
    for action in [
        GameAction::deal_damage(10),
        GameAction::forge_key(),
        GameAction::sequential(vec![GameAction::stun(), GameAction::exhaust()]),
        GameAction::sequential_for_each(3, GameAction::draw(1)),
    ] {
        let _ = action.update(&context, &game);
        let _ = action.has_legal_target(&context, &game);
        let _ = action.effect_message(&context, &game);
        let _ = action.event_array(&context, &game);
    }

    assert_eq!(game.messages().len(), before_messages);
    assert_eq!(game.player(P0).amber, 7);
    assert_eq!(game.player(P0).keys, 0);
    let card = game.card(zorg).unwrap();
    assert_eq!(card.tokens(TokenKind::Damage), 0);
    assert!(!card.is_stunned());
    assert!(!card.exhausted);
    assert_eq!(card.location, Location::PlayArea);
}

#[test]
fn test_matching_targets_are_found_at_resolution() {
    let mut game = game();
    let stun_mars = GameAction::stun().targeting_matching(CardFilter::House(House::Mars));
    let context = Context::new(P0);
    assert!(!stun_mars.has_legal_target(&context, &game));

    let zorg = game.create_card(ZORG, P1, Location::PlayArea);
    let mindwarper = game.create_card(MINDWARPER, P0, Location::PlayArea);
    let troll = game.create_card(TROLL, P0, Location::PlayArea);

    drain(stun_mars, context, &mut game);
    assert!(game.card(zorg).unwrap().is_stunned());
    assert!(game.card(mindwarper).unwrap().is_stunned());
    assert!(!game.card(troll).unwrap().is_stunned());
}

#[test]
fn test_amount_is_computed_at_resolution() {
    let mut game = game();
    let zorg = game.create_card(ZORG, P1, Location::PlayArea);
    let damage = GameAction::deal_damage(0)
        .targeting([zorg])
        .with_amount(Amount::computed(|context, game| {
            i64::from(game.player(context.player).amber)
        }));

    game.player_mut(P0).amber = 4;
    drain(damage, Context::new(P0), &mut game);
    assert_eq!(game.card(zorg).unwrap().tokens(TokenKind::Damage), 4);
}

#[test]
fn test_effect_messages() {
    let mut game = game();
    let zorg = game.create_card(ZORG, P1, Location::PlayArea);
    let troll = game.create_card(TROLL, P0, Location::PlayArea);
    let context = Context::new(P0);

    assert_eq!(
        GameAction::deal_damage(2).targeting([zorg]).effect_message(&context, &game),
        "deal 2 damage to Zorg"
    );
    assert_eq!(
        GameAction::return_to_hand().targeting([zorg, troll]).effect_message(&context, &game),
        "return Zorg and Troll to hand"
    );
    assert_eq!(
        GameAction::sequential(vec![GameAction::gain_amber(1), GameAction::draw(2)])
            .effect_message(&context, &game),
        "make Alice gain 1 amber, then make Alice draw 2 cards"
    );
}

#[test]
fn test_destroyed_creature_loses_its_triggers() {
    use keyforge_pipeline::pipeline::EventName;
    use keyforge_pipeline::triggers::Trigger;

    let mut game = game();
    let dextre = game.create_card(DEXTRE, P1, Location::PlayArea);
    game.triggers.register(
        Trigger::reaction("Dextre's bounty", EventName::GainAmber, P1, GameAction::draw(1))
            .with_source(dextre),
    );
    assert_eq!(game.triggers.len(), 1);

    drain(GameAction::destroy().targeting([dextre]), Context::new(P0), &mut game);
    assert!(game.triggers.is_empty());
    assert_eq!(game.last_message(), Some("Dextre is destroyed"));
}

#[test]
fn test_fight_prompt_cannot_be_cancelled() {
    let mut game = game();
    let bumpsy = game.create_card(BUMPSY, P0, Location::PlayArea);
    let zorg = game.create_card(ZORG, P1, Location::PlayArea);

    let mut pipeline = Pipeline::new();
    GameAction::fight()
        .targeting([bumpsy])
        .resolve(Context::new(P0), &mut pipeline);
    assert_eq!(pipeline.drain(&mut game), ResolutionStatus::WaitingForPrompt(P0));
    assert!(pipeline.respond(P0, PromptResponse::Cancel, &mut game).is_err());

    pipeline
        .respond(P0, PromptResponse::Card(zorg), &mut game)
        .unwrap();
    assert!(game.messages().iter().any(|m| m.text == "Bumpsy fights Zorg"));
    // 5 power against 7: Bumpsy dies, Zorg survives with 5 damage.
    assert_eq!(game.cards_in(P0, Location::Discard), &[bumpsy]);
    assert_eq!(game.card(zorg).unwrap().tokens(TokenKind::Damage), 5);
}

#[test]
fn test_players_are_not_card_targets() {
    let game = game();
    let context = Context::new(P0);
    let stun = GameAction::stun().targeting([EntityId::player(P1)]);
    assert!(!stun.has_legal_target(&context, &game));
}
