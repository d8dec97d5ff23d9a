//! Vote tally and lynch resolution: an aux object that observes cast votes,
//! reports who is currently in the lead, and — once a day phase ends —
//! enqueues a `KillActionBody` against the plurality leader. An example
//! built on the kernel, not part of it — nothing elsewhere depends on this
//! module existing.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::actor::ActorId;
use crate::aux::AuxObject;
use crate::event::{ActionKind, ActionSpec, Event, EventKind};
use crate::game::Game;
use crate::object::ObjectId;

use super::kill::KillActionBody;
use super::vote::VoteActionBody;

/// The well-known key `Tally` is conventionally registered under.
pub const TALLY_KEY: &str = "tally";

/// Records the most recent vote cast by each voter, reports the current
/// plurality leader, and resolves the lynch when a day phase ends: on the
/// `EPhaseChange` leaving any phase named `day N`, it enqueues a `Kill`
/// action against `leader()` (if any), then clears the ballot for the next
/// day. Resets (without resolving) on every other phase change too.
#[derive(Debug, Default)]
pub struct Tally {
    votes: RefCell<IndexMap<ActorId, ActorId>>,
}

impl Tally {
    /// Creates an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current plurality leader: the target with the most votes,
    /// ties broken by lowest actor id. `None` if no votes have been cast.
    pub fn leader(&self) -> Option<ActorId> {
        let votes = self.votes.borrow();
        let mut counts: IndexMap<ActorId, u32> = IndexMap::new();
        for target in votes.values() {
            *counts.entry(*target).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(target, _)| target)
    }

    fn reset(&self) {
        self.votes.borrow_mut().clear();
    }
}

impl AuxObject for Tally {
    fn key(&self) -> &str {
        TALLY_KEY
    }

    fn interests(&self) -> Vec<EventKind> {
        vec![
            EventKind::PostActionOf(ActionKind::Vote),
            EventKind::PhaseChange,
        ]
    }

    fn on_event(&self, _game: &Game, event: &Event) -> Vec<ActionSpec> {
        match event {
            Event::PostAction(action) => {
                if let Some(vote) = action.body().as_any().downcast_ref::<VoteActionBody>() {
                    self.votes.borrow_mut().insert(vote.voter, vote.target);
                }
                Vec::new()
            }
            Event::PhaseChange { from, .. } => {
                let lynch = if from.starts_with("day") {
                    self.leader().map(|target| {
                        ActionSpec::new(ObjectId::new(0), Rc::new(KillActionBody { actor: target, target }))
                    })
                } else {
                    None
                };
                self.reset();
                lynch.into_iter().collect()
            }
            _ => Vec::new(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectId;

    #[test]
    fn leader_is_the_plurality_target() {
        let tally = Tally::new();
        tally.votes.borrow_mut().insert(ObjectId::new(1), ObjectId::new(9));
        tally.votes.borrow_mut().insert(ObjectId::new(2), ObjectId::new(9));
        tally.votes.borrow_mut().insert(ObjectId::new(3), ObjectId::new(8));
        assert_eq!(tally.leader(), Some(ObjectId::new(9)));
    }

    #[test]
    fn ties_favor_lowest_target_id() {
        let tally = Tally::new();
        tally.votes.borrow_mut().insert(ObjectId::new(1), ObjectId::new(9));
        tally.votes.borrow_mut().insert(ObjectId::new(2), ObjectId::new(8));
        assert_eq!(tally.leader(), Some(ObjectId::new(8)));
    }

    #[test]
    fn reset_clears_votes() {
        let tally = Tally::new();
        tally.votes.borrow_mut().insert(ObjectId::new(1), ObjectId::new(9));
        tally.reset();
        assert_eq!(tally.leader(), None);
    }
}
