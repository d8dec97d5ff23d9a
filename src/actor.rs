//! Actors: the players of a game. An actor holds its faction memberships,
//! its attached abilities and triggers, and its status bag.

use indexmap::IndexMap;

use crate::ability::{AttachedAbility, AttachedTrigger};
use crate::faction::FactionId;
use crate::object::{GameObject, ObjectId};
use crate::status::StatusBag;

pub use crate::game::ActorSpec;

/// An actor is just a kind of game object; the alias exists so call sites
/// read as "this id names an actor" rather than "this id names anything".
pub type ActorId = ObjectId;

/// A single player. Abilities are keyed by name so `Game::activate` can
/// resolve `(actor, ability name)` pairs; triggers are unordered and all
/// consulted on every event they declare interest in.
#[derive(Debug)]
pub struct Actor {
    id: ObjectId,
    name: Option<String>,
    factions: Vec<FactionId>,
    abilities: IndexMap<String, AttachedAbility>,
    triggers: Vec<AttachedTrigger>,
    status: StatusBag,
}

impl Actor {
    pub(crate) fn new(id: ObjectId, name: Option<String>, factions: Vec<FactionId>) -> Self {
        Self {
            id,
            name,
            factions,
            abilities: IndexMap::new(),
            triggers: Vec::new(),
            status: StatusBag::new(),
        }
    }

    /// Whether `status["dead"]` is unset or `false`.
    pub fn is_alive(&self) -> bool {
        !self.status.get("dead").map(|value| value.as_bool()).unwrap_or(false)
    }

    /// The factions this actor belongs to.
    pub fn factions(&self) -> &[FactionId] {
        &self.factions
    }

    /// Whether this actor belongs to `faction`.
    pub fn is_member_of(&self, faction: FactionId) -> bool {
        self.factions.contains(&faction)
    }

    /// Read-only access to the status bag. Mutation goes through
    /// `Game::set_status`, never directly.
    pub fn status(&self) -> &StatusBag {
        &self.status
    }

    pub(crate) fn status_mut(&mut self) -> &mut StatusBag {
        &mut self.status
    }

    /// Every ability attached to this actor, keyed by name.
    pub fn abilities(&self) -> impl Iterator<Item = (&str, &AttachedAbility)> {
        self.abilities.iter().map(|(name, ability)| (name.as_str(), ability))
    }

    /// Looks up an attached ability by name.
    pub fn ability(&self, name: &str) -> Option<&AttachedAbility> {
        self.abilities.get(name)
    }

    pub(crate) fn attach_ability(&mut self, ability: AttachedAbility) {
        self.abilities
            .insert(ability.inner().name().to_string(), ability);
    }

    /// Every trigger attached to this actor.
    pub fn triggers(&self) -> &[AttachedTrigger] {
        &self.triggers
    }

    pub(crate) fn attach_trigger(&mut self, trigger: AttachedTrigger) {
        self.triggers.push(trigger);
    }
}

impl GameObject for Actor {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_actor_is_alive() {
        let actor = Actor::new(ObjectId::new(1), Some("Alice".to_string()), Vec::new());
        assert!(actor.is_alive());
    }

    #[test]
    fn dead_status_flips_is_alive() {
        let mut actor = Actor::new(ObjectId::new(1), None, Vec::new());
        actor
            .status_mut()
            .write("dead", crate::status::StatusValue::Bool(true));
        assert!(!actor.is_alive());
    }

    #[test]
    fn membership_checks_faction_list() {
        let faction = ObjectId::new(9);
        let actor = Actor::new(ObjectId::new(1), None, vec![faction]);
        assert!(actor.is_member_of(faction));
        assert!(!actor.is_member_of(ObjectId::new(10)));
    }
}
