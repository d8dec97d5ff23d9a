//! Per-faction outcome detection and the terminal `GameEnder`.

use std::cell::Cell;
use std::fmt;

use crate::event::{ActionBody, ActionKind, ActionSpec};
use crate::faction::FactionId;
use crate::game::Game;
use crate::object::ObjectId;

/// A terminal per-faction label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The faction achieved its win condition.
    Victory,
    /// The faction failed to achieve its win condition.
    Defeat,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Victory => write!(f, "victory"),
            Outcome::Defeat => write!(f, "defeat"),
        }
    }
}

/// A pure function of current game state deciding whether a faction's
/// outcome has been reached.
pub trait OutcomePredicate: fmt::Debug {
    /// Evaluates the predicate for `faction`. Returns the outcome if it has
    /// been reached, `None` otherwise.
    fn evaluate(&self, game: &Game, faction: FactionId) -> Option<Outcome>;
}

/// An `OutcomePredicate` that fires as soon as `watched` has no living
/// members, reporting `outcome` for whichever faction the checker is bound
/// to. Binding the same watched faction with `Victory` for the opposing
/// faction and `Defeat` for itself is how a standard two-faction elimination
/// win condition is expressed.
#[derive(Debug)]
pub struct EliminationPredicate {
    /// The faction whose elimination decides the outcome.
    pub watched: FactionId,
    /// The outcome to report once `watched` is eliminated.
    pub outcome: Outcome,
}

impl OutcomePredicate for EliminationPredicate {
    fn evaluate(&self, game: &Game, _faction: FactionId) -> Option<Outcome> {
        let watched = game.faction(self.watched)?;
        if watched.living_members(game).is_empty() {
            Some(self.outcome)
        } else {
            None
        }
    }
}

#[derive(Debug)]
struct OutcomeActionBody {
    faction: FactionId,
    outcome: Outcome,
}

impl ActionBody for OutcomeActionBody {
    fn kind(&self) -> ActionKind {
        ActionKind::Outcome
    }

    fn run(&self, game: &mut Game) {
        game.record_outcome(self.faction, self.outcome);
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// A trigger bound to one faction: subscribes to every `EPostAction` and,
/// after each one, evaluates its predicate. The first time the predicate
/// fires it enqueues an `OutcomeAction` at low priority (so it resolves
/// after the triggering action's post-phase) and never fires again.
#[derive(Debug)]
pub struct OutcomeChecker {
    id: ObjectId,
    faction: FactionId,
    predicate: Box<dyn OutcomePredicate>,
    achieved: Cell<bool>,
}

impl OutcomeChecker {
    /// Priority `OutcomeAction`s are enqueued at, low enough to resolve
    /// after the action whose post-phase triggered this check.
    pub const PRIORITY: i32 = -100;

    pub(crate) fn new(id: ObjectId, faction: FactionId, predicate: Box<dyn OutcomePredicate>) -> Self {
        Self {
            id,
            faction,
            predicate,
            achieved: Cell::new(false),
        }
    }

    /// The object id this checker was registered under.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The faction this checker watches.
    pub fn faction(&self) -> FactionId {
        self.faction
    }

    /// Evaluates the predicate and, on a first-time hit, returns the
    /// `OutcomeAction` spec to enqueue.
    pub fn on_event(&self, game: &Game) -> Vec<ActionSpec> {
        if self.achieved.get() {
            return Vec::new();
        }
        match self.predicate.evaluate(game, self.faction) {
            Some(outcome) => {
                self.achieved.set(true);
                vec![ActionSpec::with_priority(
                    self.id,
                    std::rc::Rc::new(OutcomeActionBody {
                        faction: self.faction,
                        outcome,
                    }),
                    Self::PRIORITY,
                )]
            }
            None => Vec::new(),
        }
    }
}

#[derive(Debug)]
struct EndTheGameActionBody;

impl ActionBody for EndTheGameActionBody {
    fn kind(&self) -> ActionKind {
        ActionKind::EndTheGame
    }

    fn run(&self, game: &mut Game) {
        game.shutdown();
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Builds the `EndTheGame` action spec the `GameEnder` aux object enqueues
/// once every faction has reached a terminal outcome.
pub(crate) fn end_the_game_spec(source: ObjectId) -> ActionSpec {
    ActionSpec::with_priority(source, std::rc::Rc::new(EndTheGameActionBody), i32::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_display() {
        assert_eq!(Outcome::Victory.to_string(), "victory");
        assert_eq!(Outcome::Defeat.to_string(), "defeat");
    }
}
