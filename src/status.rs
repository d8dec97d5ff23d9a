//! Per-actor mutable attribute bag.
//!
//! `StatusBag` itself is a dumb, ordered key-value store; it does not know
//! about the `Game` or the event system. The synchronous `EStatusChange`
//! emission described by the data model happens one layer up, in
//! [`crate::game::Game::set_status`], which is the only place allowed to
//! mutate a bag that belongs to a live actor.

use indexmap::IndexMap;

use crate::actor::ActorId;
use crate::outcome::Outcome;

/// A value stored under a status key.
///
/// Closed on purpose: the canonical keys (`dead`, `outcome`) and the
/// free-form per-rule keys built-in roles use all fit one of these cases,
/// and a closed enum keeps `EStatusChange` payloads comparable and
/// debuggable without reaching for a type-erased `Any`.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusValue {
    /// A boolean flag, e.g. `dead`.
    Bool(bool),
    /// An integer counter.
    Int(i64),
    /// Free-form text.
    Text(String),
    /// A reference to another actor.
    Actor(ActorId),
    /// A recorded victory/defeat outcome.
    Outcome(Outcome),
}

impl StatusValue {
    /// Convenience accessor for the common `Bool` case; returns `false` for
    /// any other variant rather than panicking, since an absent or
    /// wrongly-typed key reads the same as "not set" to rule code.
    pub fn as_bool(&self) -> bool {
        matches!(self, StatusValue::Bool(true))
    }

    /// Convenience accessor for the `Outcome` case.
    pub fn as_outcome(&self) -> Option<Outcome> {
        match self {
            StatusValue::Outcome(outcome) => Some(*outcome),
            _ => None,
        }
    }
}

/// An ordered, string-keyed bag of [`StatusValue`]s. Reading an unset key
/// yields `None`; there is no implicit default.
#[derive(Debug, Clone, Default)]
pub struct StatusBag {
    values: IndexMap<String, StatusValue>,
}

impl StatusBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self {
            values: IndexMap::new(),
        }
    }

    /// Reads the current value of `key`, if set.
    pub fn get(&self, key: &str) -> Option<&StatusValue> {
        self.values.get(key)
    }

    /// Writes `value` under `key`, returning the previous value (if any).
    /// Does not emit any event; callers that need `EStatusChange`
    /// semantics go through `Game::set_status`.
    pub(crate) fn write(&mut self, key: &str, value: StatusValue) -> Option<StatusValue> {
        self.values.insert(key.to_string(), value)
    }

    /// Removes `key`, returning its value if it was set.
    pub(crate) fn clear(&mut self, key: &str) -> Option<StatusValue> {
        self.values.shift_remove(key)
    }
}
