//! Subscriber registry: maps event kinds to handlers and dispatches events
//! to them in a deterministic order.

use std::panic::AssertUnwindSafe;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::diagnostics;
use crate::event::{ActionSpec, Event, EventKind};
use crate::game::Game;
use crate::object::ObjectId;

/// A handler registered against one `EventKind`. Handlers only ever read
/// `game`; all mutation happens when the actions they return eventually
/// run.
pub type Handler = Rc<dyn Fn(&Game, &Event) -> Vec<ActionSpec>>;

struct Registration {
    owner: ObjectId,
    handler: Handler,
}

/// Owns every `(kind, owner, handler)` registration and dispatches events
/// to the handlers that match.
///
/// Registration order within a kind is preserved (`IndexMap` + append-only
/// `Vec`), which is what makes dispatch order deterministic: handlers fire
/// in the order they were registered, and — because `Event::dispatch_keys`
/// lists the exact kind before the category kind — exact-kind handlers
/// always fire before category handlers for the same event.
#[derive(Default)]
pub struct SubscriberRegistry {
    handlers: IndexMap<EventKind, Vec<Registration>>,
}

impl SubscriberRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }

    /// Registers `handler` under `kind`, owned by `owner`.
    pub fn register(&mut self, kind: EventKind, owner: ObjectId, handler: Handler) {
        self.handlers
            .entry(kind)
            .or_insert_with(Vec::new)
            .push(Registration { owner, handler });
    }

    /// Removes every registration owned by `owner`, across every kind.
    pub fn unregister(&mut self, owner: ObjectId) {
        for registrations in self.handlers.values_mut() {
            registrations.retain(|registration| registration.owner != owner);
        }
    }

    /// Dispatches `event` to every handler matching one of its
    /// `dispatch_keys`, in key order, and within each key in registration
    /// order. Only handlers present at the start of this call are
    /// considered, even if a handler registers or unregisters more while
    /// dispatch is in progress. A handler that panics is treated as having
    /// returned no actions and is reported on the diagnostics channel.
    pub fn dispatch(&self, game: &Game, event: &Event) -> Vec<(ObjectId, ActionSpec)> {
        let mut results = Vec::new();
        for kind in event.dispatch_keys() {
            let snapshot: Vec<(ObjectId, Handler)> = match self.handlers.get(&kind) {
                Some(registrations) => registrations
                    .iter()
                    .map(|registration| (registration.owner, Rc::clone(&registration.handler)))
                    .collect(),
                None => continue,
            };
            for (owner, handler) in snapshot {
                let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| handler(game, event)));
                match outcome {
                    Ok(specs) => results.extend(specs.into_iter().map(|spec| (owner, spec))),
                    Err(payload) => {
                        diagnostics::handler_panicked(
                            owner.raw(),
                            &format!("{:?}", kind),
                            &diagnostics::describe_panic(&*payload),
                        );
                    }
                }
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Action, ActionBody, ActionKind, ActionSpec};
    use std::cell::RefCell;

    #[derive(Debug)]
    struct Noop;

    impl ActionBody for Noop {
        fn kind(&self) -> ActionKind {
            ActionKind::Custom("Noop")
        }
        fn run(&self, _game: &mut Game) {}
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[test]
    fn exact_kind_dispatches_before_category() {
        let mut registry = SubscriberRegistry::new();
        let order: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

        let category_order = Rc::clone(&order);
        registry.register(
            EventKind::PreAction,
            ObjectId::new(1),
            Rc::new(move |_game, _event| {
                category_order.borrow_mut().push("category");
                Vec::new()
            }),
        );
        let exact_order = Rc::clone(&order);
        registry.register(
            EventKind::PreActionOf(ActionKind::Custom("Noop")),
            ObjectId::new(2),
            Rc::new(move |_game, _event| {
                exact_order.borrow_mut().push("exact");
                Vec::new()
            }),
        );

        let game = crate::game::Game::builder("test").build();
        let spec = ActionSpec::new(ObjectId::new(3), Rc::new(Noop));
        let action = Action::new(1, spec);
        registry.dispatch(&game, &Event::PreAction(action));

        assert_eq!(order.borrow().as_slice(), ["exact", "category"]);
    }

    #[test]
    fn unregister_removes_handler_from_every_kind() {
        let mut registry = SubscriberRegistry::new();
        let owner = ObjectId::new(1);
        registry.register(
            EventKind::PhaseChange,
            owner,
            Rc::new(|_game, _event| Vec::new()),
        );
        registry.unregister(owner);
        let game = crate::game::Game::builder("test").build();
        let result = registry.dispatch(
            &game,
            &Event::PhaseChange {
                from: "startup".to_string(),
                to: "day 1".to_string(),
            },
        );
        assert!(result.is_empty());
    }
}
