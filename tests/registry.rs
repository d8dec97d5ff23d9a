//! Trigger dispatch through the subscriber registry: exact-before-category
//! ordering, multi-trigger fan-out, and constraint-gated triggers.

use covenant::ability::{gated_response, Trigger};
use covenant::actor::{ActorId, ActorSpec};
use covenant::constraint::{Constraint, ConstraintContext, SourceAlive, VetoReason};
use covenant::event::{ActionSpec, Event, EventKind};
use covenant::game::Game;
use covenant::status::StatusValue;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug)]
struct Logger {
    label: &'static str,
    log: Rc<RefCell<Vec<&'static str>>>,
}

impl Trigger for Logger {
    fn name(&self) -> &str {
        self.label
    }
    fn constraints(&self) -> &[Box<dyn Constraint>] {
        &[]
    }
    fn interests(&self) -> Vec<EventKind> {
        vec![EventKind::StatusChange]
    }
    fn on_event(&self, _game: &Game, _owner: ActorId, _event: &Event) -> Vec<ActionSpec> {
        self.log.borrow_mut().push(self.label);
        Vec::new()
    }
}

#[test]
fn multiple_triggers_on_one_actor_all_fire() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut game = Game::builder("registry-fixture")
        .faction(
            "Town",
            vec![ActorSpec::named("Alice")
                .with_trigger(Box::new(Logger {
                    label: "first",
                    log: Rc::clone(&log),
                }))
                .with_trigger(Box::new(Logger {
                    label: "second",
                    log: Rc::clone(&log),
                }))],
        )
        .build();
    let alice = game.factions().next().unwrap().members()[0];
    game.set_status(alice, "dead", StatusValue::Bool(true)).unwrap();
    assert_eq!(log.borrow().as_slice(), ["first", "second"]);
}

#[derive(Debug)]
struct GatedLogger {
    constraints: Vec<Box<dyn Constraint>>,
    log: Rc<RefCell<Vec<&'static str>>>,
}

impl Trigger for GatedLogger {
    fn name(&self) -> &str {
        "gated"
    }
    fn constraints(&self) -> &[Box<dyn Constraint>] {
        &self.constraints
    }
    fn interests(&self) -> Vec<EventKind> {
        vec![EventKind::StatusChange]
    }
    fn on_event(&self, game: &Game, owner: ActorId, _event: &Event) -> Vec<ActionSpec> {
        gated_response(self, game, owner, None, || {
            self.log.borrow_mut().push("fired");
            Vec::new()
        })
    }
}

#[test]
fn trigger_constraint_blocks_response_when_owner_is_dead() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut game = Game::builder("registry-fixture")
        .faction(
            "Town",
            vec![
                ActorSpec::named("Alice").with_trigger(Box::new(GatedLogger {
                    constraints: vec![Box::new(SourceAlive)],
                    log: Rc::clone(&log),
                })),
                ActorSpec::named("Bob"),
            ],
        )
        .build();
    let alice = game.factions().next().unwrap().members()[0];
    let bob = game.factions().next().unwrap().members()[1];

    game.set_status(bob, "dead", StatusValue::Bool(true)).unwrap();
    assert_eq!(log.borrow().as_slice(), ["fired"]);

    game.set_status(alice, "dead", StatusValue::Bool(true)).unwrap();
    let fired_before = log.borrow().len();
    game.set_status(bob, "outcome_marker", StatusValue::Int(1)).unwrap();
    assert_eq!(log.borrow().len(), fired_before);
}

#[derive(Debug)]
struct AlwaysVetoes;
impl Constraint for AlwaysVetoes {
    fn name(&self) -> &'static str {
        "AlwaysVetoes"
    }
    fn check(&self, _game: &Game, _ctx: &ConstraintContext<'_>) -> Result<(), VetoReason> {
        Err(VetoReason::ConstraintViolated {
            constraint: "AlwaysVetoes",
        })
    }
}

#[test]
fn gated_response_returns_empty_on_violation() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut game = Game::builder("registry-fixture")
        .faction(
            "Town",
            vec![ActorSpec::named("Alice").with_trigger(Box::new(GatedLogger {
                constraints: vec![Box::new(AlwaysVetoes)],
                log: Rc::clone(&log),
            }))],
        )
        .build();
    let alice = game.factions().next().unwrap().members()[0];
    game.set_status(alice, "dead", StatusValue::Bool(true)).unwrap();
    assert!(log.borrow().is_empty());
}

