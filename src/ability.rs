//! Abilities and triggers: subscriber specializations that produce actions
//! on activation or in passive response to arbitrary events.

use std::fmt;

use crate::actor::ActorId;
use crate::constraint::{check_all, Constraint, ConstraintContext, VetoReason};
use crate::event::{ActivationArgs, ActionSpec, Event, EventKind};
use crate::game::Game;
use crate::object::ObjectId;

/// An ability: handles its own `EActivate` and, if every attached
/// constraint passes, produces the actions the activation should cause.
pub trait Ability: fmt::Debug {
    /// The name this ability is known by, used as the `attachment` key for
    /// `LimitPerPhaseActor` counting and as the lookup key in
    /// `Game::activate`.
    fn name(&self) -> &str;

    /// Constraints gating this ability, checked in order.
    fn constraints(&self) -> &[Box<dyn Constraint>];

    /// Produces the actions this activation should enqueue. Only called
    /// after every constraint has passed; must not mutate `game`.
    fn make_actions(&self, game: &Game, owner: ActorId, args: &ActivationArgs) -> Vec<ActionSpec>;
}

/// A trigger: a passive subscriber analogue of an ability, fired by
/// arbitrary events rather than by a direct activation call.
pub trait Trigger: fmt::Debug {
    /// The name this trigger is known by, used as the `attachment` key for
    /// `LimitPerPhaseActor` counting.
    fn name(&self) -> &str;

    /// Constraints gating this trigger, checked in order before
    /// `on_event` is asked to produce actions.
    fn constraints(&self) -> &[Box<dyn Constraint>];

    /// The event kinds this trigger wants to observe.
    fn interests(&self) -> Vec<EventKind>;

    /// Reacts to an observed event. Implementations that need their
    /// constraints gated first should route through
    /// [`gated_response`] rather than reimplementing the check loop.
    fn on_event(&self, game: &Game, owner: ActorId, event: &Event) -> Vec<ActionSpec>;
}

/// Helper for `Trigger::on_event` implementations: runs the trigger's
/// constraints against `(owner, target)` and, if they all pass, calls
/// `respond` to produce the actual actions. Mirrors the gating
/// `Game::activate` performs for abilities, so both extension points share
/// one notion of "empty list on violation".
pub fn gated_response<F>(
    trigger: &dyn Trigger,
    game: &Game,
    owner: ActorId,
    target: Option<ActorId>,
    respond: F,
) -> Vec<ActionSpec>
where
    F: FnOnce() -> Vec<ActionSpec>,
{
    let ctx = ConstraintContext {
        owner,
        target,
        attachment: trigger.name(),
    };
    match check_all(trigger.constraints(), game, &ctx) {
        Ok(()) => respond(),
        Err(_) => Vec::new(),
    }
}

/// An ability attached to an actor, carrying the object id it was
/// registered under (its `EventKind::ActivateOf` key) alongside the
/// ability's own behavior.
pub struct AttachedAbility {
    pub(crate) id: ObjectId,
    pub(crate) inner: Box<dyn Ability>,
}

impl AttachedAbility {
    pub(crate) fn new(id: ObjectId, inner: Box<dyn Ability>) -> Self {
        Self { id, inner }
    }

    /// The object id this ability was registered under.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The underlying ability behavior.
    pub fn inner(&self) -> &dyn Ability {
        self.inner.as_ref()
    }

    /// The ability's attached constraints, exposed so `Game::activate` can
    /// advance `LimitPerPhase*` counters after a successful activation.
    pub fn constraints(&self) -> &[Box<dyn Constraint>] {
        self.inner.constraints()
    }

    /// Checks this ability's constraints and, if they pass, produces its
    /// actions. Returns the veto reason on rejection.
    pub(crate) fn activate(
        &self,
        game: &Game,
        owner: ActorId,
        args: &ActivationArgs,
    ) -> Result<Vec<ActionSpec>, VetoReason> {
        let ctx = ConstraintContext {
            owner,
            target: args.target(),
            attachment: self.inner.name(),
        };
        check_all(self.inner.constraints(), game, &ctx)?;
        Ok(self.inner.make_actions(game, owner, args))
    }
}

/// A trigger attached to an actor, carrying the object id it was
/// registered under.
pub struct AttachedTrigger {
    pub(crate) id: ObjectId,
    pub(crate) inner: Box<dyn Trigger>,
}

impl AttachedTrigger {
    pub(crate) fn new(id: ObjectId, inner: Box<dyn Trigger>) -> Self {
        Self { id, inner }
    }

    /// The object id this trigger was registered under.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The underlying trigger behavior.
    pub fn inner(&self) -> &dyn Trigger {
        self.inner.as_ref()
    }
}
