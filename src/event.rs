//! Event and Action types: the closed, extensible tagged-union hierarchy
//! that the rest of the engine is built on.
//!
//! Events are immutable notifications assigned a sequence number at
//! emission time (see [`Game::process_event`](crate::game::Game)). Actions
//! are deferred mutations produced by subscribers in response to events;
//! the [`queue`](crate::queue) module is responsible for bracketing every
//! action's execution with `EPreAction`/`EPostAction` events.

use std::cell::Cell;
use std::fmt;
use std::fmt::Debug;
use std::rc::Rc;

use crate::actor::ActorId;
use crate::faction::FactionId;
use crate::object::ObjectId;
use crate::outcome::Outcome;
use crate::status::StatusValue;

/// Identifies the "shape" of an [`Action`]'s payload.
///
/// Built-in kinds are listed explicitly so constraints and subscribers can
/// match on them by name; rule authors extend the catalog with
/// `ActionKind::Custom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Sets `status["dead"] = true` on the target actor.
    Kill,
    /// Records a vote in a `Tally` aux object.
    Vote,
    /// Flips another action's `cancelled` flag.
    Cancel,
    /// Records that a faction achieved `victory` or `defeat`.
    Outcome,
    /// Transitions the game into `shutdown` and emits `EGameEnded`.
    EndTheGame,
    /// A rule-defined action kind, named by the rule author.
    Custom(&'static str),
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Kill => write!(f, "Kill"),
            ActionKind::Vote => write!(f, "Vote"),
            ActionKind::Cancel => write!(f, "Cancel"),
            ActionKind::Outcome => write!(f, "Outcome"),
            ActionKind::EndTheGame => write!(f, "EndTheGame"),
            ActionKind::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Identifies the "shape" of an [`Event`].
///
/// Some variants come in an exact/category pair (`PreActionOf(kind)` vs.
/// `PreAction`, `ActivateOf(ability)` vs. `Activate`): the exact variant
/// matches only events carrying that specific inner kind or ability id,
/// the category variant matches every event of that family. The
/// [`registry`](crate::registry) dispatches exact handlers before category
/// handlers for the same concrete event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Exact: fires only for `EPreAction` wrapping this particular
    /// [`ActionKind`].
    PreActionOf(ActionKind),
    /// Category: fires for every `EPreAction`, regardless of inner kind.
    PreAction,
    /// Exact: fires only for `EPostAction` wrapping this particular
    /// [`ActionKind`].
    PostActionOf(ActionKind),
    /// Category: fires for every `EPostAction`, regardless of inner kind.
    PostAction,
    /// `EPhaseChange{from, to}`.
    PhaseChange,
    /// `EStatusChange{actor, key, old, new}`.
    StatusChange,
    /// Exact: fires only when this particular ability (identified by its
    /// object id) is activated.
    ActivateOf(ObjectId),
    /// Category: fires for every activation, regardless of which ability.
    Activate,
    /// `EOutcomeAchieved{faction, outcome}`.
    OutcomeAchieved,
    /// `EGameEnded`.
    GameEnded,
}

/// A single, immutable notification dispatched through the subscriber
/// registry.
///
/// `Event` does not carry its own sequence number; the number assigned at
/// emission time lives alongside it in whatever history entry records the
/// dispatch (see [`crate::queue::HistoryEntry`] and
/// [`crate::game::Game::process_event`]).
#[derive(Debug, Clone)]
pub enum Event {
    /// Emitted immediately before an action is allowed to run.
    PreAction(Action),
    /// Emitted immediately after an action has run (never emitted for a
    /// cancelled action).
    PostAction(Action),
    /// Emitted when the game transitions from one named phase to another.
    PhaseChange {
        /// Name of the phase being left.
        from: String,
        /// Name of the phase being entered.
        to: String,
    },
    /// Emitted synchronously after any write to an actor's status bag.
    StatusChange {
        /// The actor whose status changed.
        actor: ActorId,
        /// The status key that was written.
        key: String,
        /// The value before the write, or `None` if the key was unset.
        old: Option<StatusValue>,
        /// The value after the write, or `None` if the key was cleared.
        new: Option<StatusValue>,
    },
    /// Emitted when `Game::activate` is invoked, whether or not the
    /// ability's constraints ultimately pass.
    Activate {
        /// The ability being activated.
        ability: ObjectId,
        /// Free-form activation arguments, interpreted by the ability.
        args: ActivationArgs,
    },
    /// Emitted when a faction's outcome checker determines the faction has
    /// won or lost.
    OutcomeAchieved {
        /// The faction the outcome was recorded for.
        faction: FactionId,
        /// The outcome recorded.
        outcome: Outcome,
    },
    /// Emitted once, when the game transitions into `shutdown`.
    GameEnded,
}

impl Event {
    /// Returns every [`EventKind`] this event matches, most specific first.
    /// The registry dispatches to handlers in this order, so exact-kind
    /// handlers always run before category handlers for the same event.
    pub fn dispatch_keys(&self) -> Vec<EventKind> {
        match self {
            Event::PreAction(action) => {
                vec![EventKind::PreActionOf(action.kind()), EventKind::PreAction]
            }
            Event::PostAction(action) => {
                vec![
                    EventKind::PostActionOf(action.kind()),
                    EventKind::PostAction,
                ]
            }
            Event::PhaseChange { .. } => vec![EventKind::PhaseChange],
            Event::StatusChange { .. } => vec![EventKind::StatusChange],
            Event::Activate { ability, .. } => {
                vec![EventKind::ActivateOf(*ability), EventKind::Activate]
            }
            Event::OutcomeAchieved { .. } => vec![EventKind::OutcomeAchieved],
            Event::GameEnded => vec![EventKind::GameEnded],
        }
    }
}

/// Free-form arguments passed to an ability or trigger activation.
///
/// Kept as a small closed value vector rather than an open `Any` bag,
/// matching the engine's preference (see [`crate::status::StatusValue`])
/// for closed value types wherever the value set is small and known.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivationArgs {
    targets: Vec<ActorId>,
}

impl ActivationArgs {
    /// Creates activation arguments naming no targets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates activation arguments naming a single target actor.
    pub fn with_target(target: ActorId) -> Self {
        Self {
            targets: vec![target],
        }
    }

    /// Returns the first named target, if any.
    pub fn target(&self) -> Option<ActorId> {
        self.targets.first().copied()
    }

    /// Returns every named target.
    pub fn targets(&self) -> &[ActorId] {
        &self.targets
    }
}

/// Behavior attached to an [`Action`]. Implementations describe a single
/// deferred mutation; the queue calls `run` at most once, after the
/// pre-dispatch batch has settled and the action was not cancelled.
pub trait ActionBody: Debug {
    /// The kind tag used for dispatch and for history/diagnostics output.
    fn kind(&self) -> ActionKind;

    /// Applies this action's mutation to the game. Called by the queue
    /// drain, never directly by a handler.
    fn run(&self, game: &mut crate::game::Game);

    /// Supports downcasting to a concrete body type, for handlers that
    /// need to inspect a specific action's fields (e.g. `Tally` reading a
    /// `VoteActionBody`'s voter and target).
    fn as_any(&self) -> &dyn std::any::Any;
}

/// A not-yet-enqueued action, as produced by a handler, ability, or
/// trigger. [`crate::game::Game`] turns specs into [`Action`]s by assigning
/// an enqueue sequence number and a fresh cancellation cell.
pub struct ActionSpec {
    /// Scheduling priority; higher runs first. Default is 0.
    pub priority: i32,
    /// The object that produced this action (an ability, trigger, or aux
    /// object).
    pub source: ObjectId,
    /// The mutation to perform once the action runs.
    pub body: Rc<dyn ActionBody>,
}

impl ActionSpec {
    /// Creates a spec at the default priority (0).
    pub fn new(source: ObjectId, body: Rc<dyn ActionBody>) -> Self {
        Self {
            priority: 0,
            source,
            body,
        }
    }

    /// Creates a spec at an explicit priority.
    pub fn with_priority(source: ObjectId, body: Rc<dyn ActionBody>, priority: i32) -> Self {
        Self {
            priority,
            source,
            body,
        }
    }
}

/// A deferred mutation sitting in an [`crate::queue::ActionQueue`].
///
/// `Action` is cheaply `Clone`: the body is reference-counted and the
/// cancellation flag lives behind a shared cell, so the very same `Action`
/// value can be embedded in an `Event::PreAction` payload *and* remain the
/// entry the queue will eventually run — a pre-response handler that wants
/// to cancel an action simply clones the `Action` out of the event payload
/// it observed and calls [`Action::cancel`] on it.
#[derive(Clone)]
pub struct Action {
    seq: u64,
    source: ObjectId,
    priority: i32,
    cancelled: Rc<Cell<bool>>,
    body: Rc<dyn ActionBody>,
}

impl Action {
    pub(crate) fn new(seq: u64, spec: ActionSpec) -> Self {
        Self {
            seq,
            source: spec.source,
            priority: spec.priority,
            cancelled: Rc::new(Cell::new(false)),
            body: spec.body,
        }
    }

    /// The enqueue sequence number; ties in priority are broken by this,
    /// smaller first.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The object that produced this action.
    pub fn source(&self) -> ObjectId {
        self.source
    }

    /// Scheduling priority; higher runs first.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// The kind tag of the wrapped payload.
    pub fn kind(&self) -> ActionKind {
        self.body.kind()
    }

    /// Whether this action has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Flips the cancellation flag. Idempotent; cancelling an already
    /// cancelled action has no further effect.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Downcasts the action body, for handlers that need to inspect a
    /// specific action's fields (e.g. a protection trigger reading a
    /// `KillAction`'s target).
    pub fn body(&self) -> &dyn ActionBody {
        &*self.body
    }

    pub(crate) fn run(&self, game: &mut crate::game::Game) {
        self.body.run(game);
    }
}

impl Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("seq", &self.seq)
            .field("source", &self.source)
            .field("priority", &self.priority)
            .field("cancelled", &self.cancelled.get())
            .field("kind", &self.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Noop;

    impl ActionBody for Noop {
        fn kind(&self) -> ActionKind {
            ActionKind::Custom("Noop")
        }

        fn run(&self, _game: &mut crate::game::Game) {}

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[test]
    fn clone_shares_cancellation_state() {
        let spec = ActionSpec::new(ObjectId::new(1), Rc::new(Noop));
        let action = Action::new(7, spec);
        let handle = action.clone();
        assert!(!handle.is_cancelled());
        handle.cancel();
        assert!(action.is_cancelled());
    }

    #[test]
    fn dispatch_keys_put_exact_before_category() {
        let spec = ActionSpec::new(ObjectId::new(1), Rc::new(Noop));
        let action = Action::new(1, spec);
        let event = Event::PreAction(action);
        let keys = event.dispatch_keys();
        assert_eq!(
            keys,
            vec![
                EventKind::PreActionOf(ActionKind::Custom("Noop")),
                EventKind::PreAction,
            ]
        );
    }
}
