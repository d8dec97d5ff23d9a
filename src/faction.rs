//! Factions: named groups of actors sharing a win condition.

use crate::actor::ActorId;
use crate::game::Game;
use crate::object::{GameObject, ObjectId};
use crate::outcome::OutcomeChecker;

/// A faction is just a kind of game object; the alias exists so call sites
/// read as "this id names a faction" rather than "this id names anything".
pub type FactionId = ObjectId;

/// A named group of actors. Membership is direct state, not action-mediated
/// (joining or leaving a faction is not itself an in-game event); a
/// faction's outcome checkers are consulted after every action's
/// post-phase to decide whether the faction has won or lost.
#[derive(Debug)]
pub struct Faction {
    id: ObjectId,
    name: Option<String>,
    members: Vec<ActorId>,
    outcome_checkers: Vec<OutcomeChecker>,
}

impl Faction {
    pub(crate) fn new(id: ObjectId, name: Option<String>, members: Vec<ActorId>) -> Self {
        Self {
            id,
            name,
            members,
            outcome_checkers: Vec::new(),
        }
    }

    /// Every actor id belonging to this faction, living or dead.
    pub fn members(&self) -> &[ActorId] {
        &self.members
    }

    pub(crate) fn add_member(&mut self, actor: ActorId) {
        if !self.members.contains(&actor) {
            self.members.push(actor);
        }
    }

    /// The subset of `members` that are still alive.
    pub fn living_members(&self, game: &Game) -> Vec<ActorId> {
        self.members
            .iter()
            .copied()
            .filter(|id| game.actor(*id).map(|actor| actor.is_alive()).unwrap_or(false))
            .collect()
    }

    /// This faction's attached outcome checkers.
    pub fn outcome_checkers(&self) -> &[OutcomeChecker] {
        &self.outcome_checkers
    }

    pub(crate) fn attach_outcome_checker(&mut self, checker: OutcomeChecker) {
        self.outcome_checkers.push(checker);
    }
}

impl GameObject for Faction {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
