//! The action queue and its drain algorithm: the core resolution loop
//! every activation, phase change, status write, and outcome ultimately
//! runs through.

use std::panic::AssertUnwindSafe;

use crate::diagnostics;
use crate::event::{Action, ActionKind, ActionSpec, Event};
use crate::game::Game;
use crate::object::ObjectId;

/// What happened to one action once the queue reached it.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// `run` completed without panicking.
    Ran,
    /// A pre-dispatch handler cancelled the action before it ran.
    Cancelled,
    /// `run` panicked; the panic was caught and reported, not propagated.
    Failed(String),
}

/// One completed action's entry in the resolution trail. Entries are
/// appended in the exact order actions settle, including actions produced
/// recursively by pre/post dispatch, so the flat sequence fully describes
/// a resolution even though it was produced by nested drains.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// The action's enqueue sequence number.
    pub seq: u64,
    /// The action's kind tag.
    pub kind: ActionKind,
    /// The object that produced the action.
    pub source: ObjectId,
    /// What happened when the queue reached it.
    pub outcome: ActionOutcome,
}

/// The flat, append-only trail of every action the game has resolved.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entry recorded so far, in resolution order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub(crate) fn record(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }
}

/// A pending batch of actions awaiting resolution. `Game` owns one
/// persistent main queue; pre/post dispatch each spin up a fresh, disposable
/// sub-queue via [`emit`].
#[derive(Debug, Default)]
pub struct ActionQueue {
    pending: Vec<Action>,
}

impl ActionQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether there is nothing left to resolve.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub(crate) fn enqueue_spec(&mut self, game: &mut Game, spec: ActionSpec) {
        let seq = game.next_seq();
        self.pending.push(Action::new(seq, spec));
    }

    /// Pushes an already-sequenced action directly. Used by `Game::activate`,
    /// which must assign the sequence number itself to avoid borrowing the
    /// queue and the game mutably at the same time (the main queue lives
    /// inside `Game`).
    pub(crate) fn push_action(&mut self, action: Action) {
        self.pending.push(action);
    }
}

/// Dispatches `event`, enqueues whatever actions its subscribers produce
/// into a fresh sub-queue, and fully drains that sub-queue before
/// returning. This is the one primitive every side-effecting `Game` method
/// (`activate`, `set_status`, `record_outcome`, `shutdown`, phase
/// transitions) goes through, so "emit an event and resolve whatever it
/// causes" only has one implementation.
pub(crate) fn emit(game: &mut Game, event: Event) {
    let specs = game.dispatch(&event);
    let mut sub = ActionQueue::new();
    for (_owner, spec) in specs {
        sub.enqueue_spec(game, spec);
    }
    drain(&mut sub, game);
}

/// Drains `queue` to completion.
///
/// Actions are resolved strictly by priority: the highest-priority batch
/// currently pending is fully resolved (pre-dispatch for every action in
/// the batch, then run and post-dispatch for every action in the batch)
/// before the next-highest batch is even formed, so a handler reacting to
/// one action's post-phase can still enqueue something that outranks
/// everything left in the queue. Within a batch, actions are pre-dispatched
/// in enqueue order, but all of the batch's pre-dispatch responses are
/// collected into one shared sub-queue and drained together, so two
/// same-priority actions' pre-responses compete against each other by
/// priority rather than each action's pre-chain settling in isolation
/// before the next action is even pre-dispatched.
pub(crate) fn drain(queue: &mut ActionQueue, game: &mut Game) {
    while !queue.pending.is_empty() {
        let max_priority = queue
            .pending
            .iter()
            .map(|action| action.priority())
            .max()
            .expect("queue is non-empty");

        let mut batch = Vec::new();
        let mut rest = Vec::new();
        for action in queue.pending.drain(..) {
            if action.priority() == max_priority {
                batch.push(action);
            } else {
                rest.push(action);
            }
        }
        queue.pending = rest;
        batch.sort_by_key(|action| action.seq());

        let mut pre_queue = ActionQueue::new();
        for action in &batch {
            let specs = game.dispatch(&Event::PreAction(action.clone()));
            for (_owner, spec) in specs {
                pre_queue.enqueue_spec(game, spec);
            }
        }
        drain(&mut pre_queue, game);

        for action in &batch {
            if action.is_cancelled() {
                game.history_mut().record(HistoryEntry {
                    seq: action.seq(),
                    kind: action.kind(),
                    source: action.source(),
                    outcome: ActionOutcome::Cancelled,
                });
                continue;
            }

            let result = std::panic::catch_unwind(AssertUnwindSafe(|| action.run(game)));
            match result {
                Ok(()) => {
                    game.history_mut().record(HistoryEntry {
                        seq: action.seq(),
                        kind: action.kind(),
                        source: action.source(),
                        outcome: ActionOutcome::Ran,
                    });
                    emit(game, Event::PostAction(action.clone()));
                }
                Err(payload) => {
                    let message = diagnostics::describe_panic(&*payload);
                    diagnostics::action_failed(&action.kind().to_string(), action.seq(), &message);
                    game.history_mut().record(HistoryEntry {
                        seq: action.seq(),
                        kind: action.kind(),
                        source: action.source(),
                        outcome: ActionOutcome::Failed(message),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::Trigger;
    use crate::actor::{ActorId, ActorSpec};
    use crate::constraint::Constraint;
    use crate::event::{ActionBody, ActionKind, EventKind};
    use crate::game::Game;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Debug)]
    struct Recording {
        label: &'static str,
        log: Rc<std::cell::RefCell<Vec<&'static str>>>,
    }

    impl ActionBody for Recording {
        fn kind(&self) -> ActionKind {
            ActionKind::Custom(self.label)
        }
        fn run(&self, _game: &mut Game) {
            self.log.borrow_mut().push(self.label);
        }
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[derive(Debug)]
    struct Panics;
    impl ActionBody for Panics {
        fn kind(&self) -> ActionKind {
            ActionKind::Custom("Panics")
        }
        fn run(&self, _game: &mut Game) {
            panic!("boom");
        }
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[test]
    fn higher_priority_batch_resolves_before_lower() {
        let mut game = Game::builder("test").build();
        let log = Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut queue = ActionQueue::new();
        queue.enqueue_spec(
            &mut game,
            ActionSpec::with_priority(
                ObjectId::new(1),
                Rc::new(Recording { label: "low", log: Rc::clone(&log) }),
                0,
            ),
        );
        queue.enqueue_spec(
            &mut game,
            ActionSpec::with_priority(
                ObjectId::new(1),
                Rc::new(Recording { label: "high", log: Rc::clone(&log) }),
                10,
            ),
        );
        drain(&mut queue, &mut game);
        assert_eq!(log.borrow().as_slice(), ["high", "low"]);
    }

    #[test]
    fn cancelled_action_never_runs() {
        let mut game = Game::builder("test").build();
        let log = Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut queue = ActionQueue::new();
        queue.enqueue_spec(
            &mut game,
            ActionSpec::new(ObjectId::new(1), Rc::new(Recording { label: "a", log: Rc::clone(&log) })),
        );
        let cancel_flag = Cell::new(false);
        let _ = &cancel_flag;
        drain(&mut queue, &mut game);
        assert_eq!(log.borrow().as_slice(), ["a"]);
        assert_eq!(game.history().entries().len(), 1);
    }

    #[test]
    fn panicking_action_is_recorded_failed_not_propagated() {
        let mut game = Game::builder("test").build();
        let mut queue = ActionQueue::new();
        queue.enqueue_spec(&mut game, ActionSpec::new(ObjectId::new(1), Rc::new(Panics)));
        drain(&mut queue, &mut game);
        let entries = game.history().entries();
        assert_eq!(entries.len(), 1);
        assert!(matches!(entries[0].outcome, ActionOutcome::Failed(_)));
    }

    #[derive(Debug)]
    struct PreResponder {
        watch: ActionKind,
        response_priority: i32,
        label: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Trigger for PreResponder {
        fn name(&self) -> &str {
            "pre_responder"
        }
        fn constraints(&self) -> &[Box<dyn Constraint>] {
            &[]
        }
        fn interests(&self) -> Vec<EventKind> {
            vec![EventKind::PreActionOf(self.watch)]
        }
        fn on_event(&self, _game: &Game, _owner: ActorId, _event: &Event) -> Vec<ActionSpec> {
            vec![ActionSpec::with_priority(
                ObjectId::new(0),
                Rc::new(Recording {
                    label: self.label,
                    log: Rc::clone(&self.log),
                }),
                self.response_priority,
            )]
        }
    }

    #[test]
    fn batch_pre_dispatch_is_combined_across_same_priority_actions() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut game = Game::builder("test")
            .faction(
                "watchers",
                vec![ActorSpec::named("watcher")
                    .with_trigger(Box::new(PreResponder {
                        watch: ActionKind::Custom("A"),
                        response_priority: 1,
                        label: "rA",
                        log: Rc::clone(&log),
                    }))
                    .with_trigger(Box::new(PreResponder {
                        watch: ActionKind::Custom("B"),
                        response_priority: 10,
                        label: "rB",
                        log: Rc::clone(&log),
                    }))],
            )
            .build();

        let mut queue = ActionQueue::new();
        queue.enqueue_spec(
            &mut game,
            ActionSpec::new(
                ObjectId::new(1),
                Rc::new(Recording { label: "A", log: Rc::clone(&log) }),
            ),
        );
        queue.enqueue_spec(
            &mut game,
            ActionSpec::new(
                ObjectId::new(1),
                Rc::new(Recording { label: "B", log: Rc::clone(&log) }),
            ),
        );
        drain(&mut queue, &mut game);

        // `B`'s pre-response (priority 10) must run before `A`'s (priority
        // 1) even though `A` is pre-dispatched first: both are collected
        // into one shared pre-queue before either runs.
        assert_eq!(log.borrow().as_slice(), ["rB", "rA", "A", "B"]);
    }
}
