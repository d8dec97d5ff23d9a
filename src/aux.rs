//! Auxiliary objects: free-form subscribers registered under a unique
//! string key, independent of the actor/faction lifetime. Used for
//! tallies, enders, and per-phase counters.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;

use indexmap::IndexMap;

use crate::error::EngineError;
use crate::event::{ActionSpec, Event, EventKind};
use crate::game::Game;

/// A subscriber with a unique string key instead of an object id. Like
/// `Ability`/`Trigger` handlers, `on_event` only reads `game`; any of an aux
/// object's own bookkeeping state it mutates in response (a tally's
/// vote map, a counter's per-phase totals) is private, interior-mutable
/// scratch state, not authoritative game state.
pub trait AuxObject: fmt::Debug {
    /// The unique key this object is registered under.
    fn key(&self) -> &str;

    /// The event kinds this object wants to observe.
    fn interests(&self) -> Vec<EventKind>;

    /// Reacts to an observed event, possibly producing actions.
    fn on_event(&self, game: &Game, event: &Event) -> Vec<ActionSpec>;

    /// Supports downcasting to a concrete aux object type, for built-ins
    /// like `PhaseCounters` whose callers need more than the trait surface
    /// (mirrors `Event::as_any` in `crate::event`).
    fn as_any(&self) -> &dyn Any;
}

/// Owns every registered `AuxObject`, keyed by its unique string key.
#[derive(Default)]
pub struct AuxRegistry {
    objects: IndexMap<String, Box<dyn AuxObject>>,
}

impl AuxRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            objects: IndexMap::new(),
        }
    }

    /// Registers `object` under its own key. Fails with `DuplicateKey` if
    /// the key is already taken.
    pub fn register(&mut self, object: Box<dyn AuxObject>) -> Result<(), EngineError> {
        let key = object.key().to_string();
        if self.objects.contains_key(&key) {
            return Err(EngineError::DuplicateKey(key));
        }
        self.objects.insert(key, object);
        Ok(())
    }

    /// Looks up an aux object by key.
    pub fn get(&self, key: &str) -> Option<&dyn AuxObject> {
        self.objects.get(key).map(|boxed| boxed.as_ref())
    }

    /// Looks up an aux object by key and downcasts it to `T`.
    pub fn get_typed<T: 'static>(&self, key: &str) -> Option<&T> {
        self.get(key).and_then(|object| object.as_any().downcast_ref::<T>())
    }

    /// Iterates every registered aux object, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn AuxObject> {
        self.objects.values().map(|boxed| boxed.as_ref())
    }
}

impl fmt::Debug for AuxRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuxRegistry")
            .field("keys", &self.objects.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The well-known key `PhaseCounters` is always registered under by
/// `GameBuilder::build`.
pub const PHASE_COUNTERS_KEY: &str = "phase_counters";

/// Backs `LimitPerPhaseActor` and `LimitPerPhaseKey`: a string-keyed
/// counter map that resets to empty on every `EPhaseChange`.
#[derive(Debug, Default)]
pub struct PhaseCounters {
    counts: RefCell<IndexMap<String, u32>>,
}

impl PhaseCounters {
    /// Creates an empty counter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current count for `key`, or 0 if it has never fired this phase.
    pub fn count(&self, key: &str) -> u32 {
        *self.counts.borrow().get(key).unwrap_or(&0)
    }

    /// Advances `key`'s counter by one.
    pub fn increment(&self, key: &str) {
        *self.counts.borrow_mut().entry(key.to_string()).or_insert(0) += 1;
    }
}

impl AuxObject for PhaseCounters {
    fn key(&self) -> &str {
        PHASE_COUNTERS_KEY
    }

    fn interests(&self) -> Vec<EventKind> {
        vec![EventKind::PhaseChange]
    }

    fn on_event(&self, _game: &Game, _event: &Event) -> Vec<ActionSpec> {
        self.counts.borrow_mut().clear();
        Vec::new()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_rejected() {
        let mut registry = AuxRegistry::new();
        registry.register(Box::new(PhaseCounters::new())).unwrap();
        let err = registry
            .register(Box::new(PhaseCounters::new()))
            .unwrap_err();
        assert_eq!(err, EngineError::DuplicateKey(PHASE_COUNTERS_KEY.to_string()));
    }

    #[test]
    fn phase_counters_reset_on_event() {
        let counters = PhaseCounters::new();
        counters.increment("mafia_kill");
        assert_eq!(counters.count("mafia_kill"), 1);
    }
}
