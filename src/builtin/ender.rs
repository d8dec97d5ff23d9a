//! Watches every faction's outcome and, once all of them have settled,
//! enqueues the terminal `EndTheGame` action.

use std::any::Any;
use std::cell::{Cell, RefCell};

use crate::aux::AuxObject;
use crate::event::{ActionSpec, Event, EventKind};
use crate::faction::FactionId;
use crate::game::Game;
use crate::object::ObjectId;
use crate::outcome::end_the_game_spec;

/// The well-known key `GameEnder` is always registered under.
pub const GAME_ENDER_KEY: &str = "game_ender";

/// Subscribes to `EOutcomeAchieved` and tracks which factions have
/// reported an outcome. Once every faction in the game has, it enqueues
/// `EndTheGame` at `i32::MIN` and never fires again.
#[derive(Debug, Default)]
pub struct GameEnder {
    settled: RefCell<Vec<FactionId>>,
    done: Cell<bool>,
}

impl GameEnder {
    /// Creates a fresh, unfired ender.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuxObject for GameEnder {
    fn key(&self) -> &str {
        GAME_ENDER_KEY
    }

    fn interests(&self) -> Vec<EventKind> {
        vec![EventKind::OutcomeAchieved]
    }

    fn on_event(&self, game: &Game, event: &Event) -> Vec<ActionSpec> {
        if self.done.get() {
            return Vec::new();
        }
        if let Event::OutcomeAchieved { faction, .. } = event {
            let mut settled = self.settled.borrow_mut();
            if !settled.contains(faction) {
                settled.push(*faction);
            }
        }
        let total = game.factions().count();
        if total > 0 && self.settled.borrow().len() >= total {
            self.done.set(true);
            vec![end_the_game_spec(ObjectId::new(0))]
        } else {
            Vec::new()
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
