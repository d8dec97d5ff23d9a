//! Object identity: the stable integer ids every first-class entity is
//! known by, and the registry that allocates and resolves them.

use indexmap::IndexMap;
use std::fmt;

use crate::error::EngineError;

/// A stable integer id, unique within one [`crate::game::Game`], identifying
/// any [`GameObject`] (actor, faction, ability, trigger, ...). Ids are
/// assigned once, by the `Game`, and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(u64);

impl ObjectId {
    pub(crate) fn new(raw: u64) -> Self {
        ObjectId(raw)
    }

    /// The raw integer value. Exposed for drivers that need a stable
    /// serialization-free handle (e.g. for logging or UI labelling).
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Every first-class entity in the game implements `GameObject`: it has a
/// stable id assigned at creation and an optional human-readable name.
pub trait GameObject {
    /// The id assigned by the `Game` that owns this object.
    fn id(&self) -> ObjectId;

    /// The human-readable name given at creation, if any.
    fn name(&self) -> Option<&str>;
}

/// Allocates [`ObjectId`]s and resolves the optional string names objects
/// are created with. This is the registry a declarative prefab surface
/// uses to turn a role or ability name into the object that implements it.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    next_id: u64,
    names: IndexMap<ObjectId, Option<String>>,
    by_name: IndexMap<String, ObjectId>,
}

impl ObjectRegistry {
    /// Creates an empty registry. The first allocated id is `1`; `0` is
    /// reserved and never handed out, so it is safe to use as a sentinel.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            names: IndexMap::new(),
            by_name: IndexMap::new(),
        }
    }

    /// Allocates a fresh id, optionally bound to a name. Fails with
    /// `DuplicateName` if the name is already taken.
    pub fn allocate(&mut self, name: Option<String>) -> Result<ObjectId, EngineError> {
        if let Some(name) = &name {
            if self.by_name.contains_key(name) {
                return Err(EngineError::DuplicateName(name.clone()));
            }
        }
        let id = ObjectId::new(self.next_id);
        self.next_id += 1;
        if let Some(name) = &name {
            self.by_name.insert(name.clone(), id);
        }
        self.names.insert(id, name);
        Ok(id)
    }

    /// Returns the name bound to `id`, if any.
    pub fn name(&self, id: ObjectId) -> Option<&str> {
        self.names.get(&id).and_then(|n| n.as_deref())
    }

    /// Resolves a name back to its id.
    pub fn resolve(&self, name: &str) -> Option<ObjectId> {
        self.by_name.get(name).copied()
    }

    /// Whether `id` was allocated by this registry.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.names.contains_key(&id)
    }
}
