//! Aux object behavior exercised through the public `Game` API: the
//! built-in `PhaseCounters` reset and a user-supplied `Tally` wired in via
//! `GameBuilder::aux_object`.

use covenant::actor::ActorSpec;
use covenant::builtin::tally::{Tally, TALLY_KEY};
use covenant::builtin::vote::Vote;
use covenant::constraint::LimitPerPhaseActor;
use covenant::event::ActivationArgs;
use covenant::game::Game;

#[test]
fn phase_counters_reset_when_the_phase_changes() {
    let mut game = Game::builder("aux-fixture")
        .faction(
            "Town",
            vec![ActorSpec::named("Alice").with_ability(Box::new(Vote::new(vec![Box::new(LimitPerPhaseActor(1))])))],
        )
        .faction("Mafia", vec![ActorSpec::named("Mallory")])
        .build();
    let alice = game.factions().next().unwrap().members()[0];
    let mallory = game.factions().nth(1).unwrap().members()[0];

    game.activate(alice, "vote", ActivationArgs::with_target(mallory)).unwrap();
    let key = format!("{}/vote", alice);
    assert_eq!(game.phase_counters().count(&key), 1);

    game.advance_phase().unwrap();
    assert_eq!(game.phase_counters().count(&key), 0);
}

#[test]
fn custom_tally_tracks_votes_through_the_builder() {
    let mut game = Game::builder("aux-fixture")
        .faction(
            "Town",
            vec![
                ActorSpec::named("Alice").with_ability(Box::new(Vote::new(Vec::new()))),
                ActorSpec::named("Bob").with_ability(Box::new(Vote::new(Vec::new()))),
            ],
        )
        .faction("Mafia", vec![ActorSpec::named("Mallory")])
        .aux_object(Box::new(Tally::new()))
        .build();

    let alice = game.factions().next().unwrap().members()[0];
    let bob = game.factions().next().unwrap().members()[1];
    let mallory = game.factions().nth(1).unwrap().members()[0];

    game.activate(alice, "vote", ActivationArgs::with_target(mallory)).unwrap();
    game.activate(bob, "vote", ActivationArgs::with_target(mallory)).unwrap();

    let tally = game.aux().get_typed::<Tally>(TALLY_KEY).unwrap();
    assert_eq!(tally.leader(), Some(mallory));
}

#[test]
fn tally_resets_on_phase_change() {
    let mut game = Game::builder("aux-fixture")
        .faction("Town", vec![ActorSpec::named("Alice").with_ability(Box::new(Vote::new(Vec::new())))])
        .faction("Mafia", vec![ActorSpec::named("Mallory")])
        .aux_object(Box::new(Tally::new()))
        .build();
    let alice = game.factions().next().unwrap().members()[0];
    let mallory = game.factions().nth(1).unwrap().members()[0];

    game.activate(alice, "vote", ActivationArgs::with_target(mallory)).unwrap();
    assert!(game.aux().get_typed::<Tally>(TALLY_KEY).unwrap().leader().is_some());

    game.advance_phase().unwrap();
    assert!(game.aux().get_typed::<Tally>(TALLY_KEY).unwrap().leader().is_none());
}
