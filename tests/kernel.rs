//! Kernel-level resolution tests: priority ordering, cancellation, and the
//! flat history trail.

use covenant::actor::ActorSpec;
use covenant::builtin::kill::MafiaKill;
use covenant::builtin::protect::Protect;
use covenant::builtin::vote::Vote;
use covenant::constraint::{LimitPerPhaseActor, NoSelfFactionTarget, SourceAlive, TargetAlive};
use covenant::event::ActivationArgs;
use covenant::game::Game;
use covenant::object::GameObject;
use covenant::queue::ActionOutcome;
use covenant::status::StatusValue;

fn fixture() -> Game {
    Game::builder("kernel-fixture")
        .faction(
            "Town",
            vec![
                ActorSpec::named("Alice"),
                ActorSpec::named("Bob").with_trigger(Box::new(Protect::new(vec![Box::new(SourceAlive)]))),
            ],
        )
        .faction(
            "Mafia",
            vec![ActorSpec::named("Mallory").with_ability(Box::new(MafiaKill::new(vec![
                Box::new(SourceAlive),
                Box::new(TargetAlive),
                Box::new(NoSelfFactionTarget),
            ])))],
        )
        .build()
}

fn find(game: &Game, name: &str) -> covenant::actor::ActorId {
    game.factions()
        .flat_map(|faction| faction.members().iter().copied())
        .find(|id| game.actor(*id).and_then(|a| a.name()) == Some(name))
        .expect("fixture actor exists")
}

#[test]
fn kill_sets_dead_status() {
    let mut game = fixture();
    let mallory = find(&game, "Mallory");
    let alice = find(&game, "Alice");
    game.activate(mallory, "mafia_kill", ActivationArgs::with_target(alice))
        .unwrap();
    assert!(game.actor(alice).unwrap().status().get("dead").unwrap().as_bool());
    assert!(!game.actor(alice).unwrap().is_alive());
}

#[test]
fn protect_trigger_cancels_kill_on_its_owner() {
    let mut game = fixture();
    let mallory = find(&game, "Mallory");
    let bob = find(&game, "Bob");
    game.activate(mallory, "mafia_kill", ActivationArgs::with_target(bob))
        .unwrap();
    assert!(game.actor(bob).unwrap().is_alive());
    let entries = game.history().entries();
    assert!(entries.iter().any(|entry| entry.outcome == ActionOutcome::Cancelled));
}

#[test]
fn history_records_every_resolved_action() {
    let mut game = fixture();
    let mallory = find(&game, "Mallory");
    let alice = find(&game, "Alice");
    game.activate(mallory, "mafia_kill", ActivationArgs::with_target(alice))
        .unwrap();
    assert!(!game.history().entries().is_empty());
    assert!(game
        .history()
        .entries()
        .iter()
        .any(|entry| entry.outcome == ActionOutcome::Ran));
}

#[test]
fn set_status_is_idempotent_for_equal_values() {
    let mut game = fixture();
    let alice = find(&game, "Alice");
    let before = game.history().entries().len();
    game.set_status(alice, "dead", StatusValue::Bool(false)).unwrap();
    assert_eq!(game.history().entries().len(), before);
}

#[test]
fn unknown_ability_is_reported() {
    let mut game = fixture();
    let alice = find(&game, "Alice");
    assert!(game.activate(alice, "nonexistent", ActivationArgs::new()).is_err());
}

#[test]
fn limit_per_phase_actor_rejects_second_activation() {
    let mut game = Game::builder("limited")
        .faction(
            "Town",
            vec![ActorSpec::named("Alice").with_ability(Box::new(Vote::new(vec![Box::new(LimitPerPhaseActor(1))])))],
        )
        .faction("Mafia", vec![ActorSpec::named("Mallory")])
        .build();
    let alice = find(&game, "Alice");
    let mallory = find(&game, "Mallory");
    game.activate(alice, "vote", ActivationArgs::with_target(mallory)).unwrap();
    assert!(game.activate(alice, "vote", ActivationArgs::with_target(mallory)).is_err());
}
