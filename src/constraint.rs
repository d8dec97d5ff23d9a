//! Constraints: the veto layer attached to abilities and triggers.
//!
//! A constraint is *not* a subscriber and is never registered in the event
//! registry — registering it there would double-count events and
//! complicate ordering (see the crate's design notes). Instead it is a
//! plain, synchronous gate consulted at the moment an ability or trigger
//! would otherwise produce actions.

use std::fmt;

use crate::actor::ActorId;
use crate::game::Game;

/// The reason an activation was rejected, surfaced to the driver inside
/// `EngineError::InvalidActivation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VetoReason {
    /// A named constraint's `check` returned a violation.
    ConstraintViolated {
        /// The constraint's own name, for diagnostics.
        constraint: &'static str,
    },
    /// A `LimitPerPhaseActor`/`LimitPerPhaseKey` counter has already reached
    /// its cap for the current phase.
    LimitReached,
}

impl fmt::Display for VetoReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VetoReason::ConstraintViolated { constraint } => {
                write!(f, "constraint {} violated", constraint)
            }
            VetoReason::LimitReached => write!(f, "per-phase limit reached"),
        }
    }
}

/// The inputs a constraint is checked against: the actor the ability or
/// trigger belongs to, an optional single target actor, and a counting key
/// used by the two `LimitPerPhase*` constraints to find their shared
/// counter in the game's `PhaseCounters` aux object.
pub struct ConstraintContext<'a> {
    /// The actor activating the ability, or owning the firing trigger.
    pub owner: ActorId,
    /// The single target named by the activation, if any.
    pub target: Option<ActorId>,
    /// A stable string identifying this particular ability/trigger
    /// attachment, used to key `LimitPerPhaseActor`'s counter.
    pub attachment: &'a str,
}

/// A gate attached to an ability or trigger. `check` is called synchronously
/// while the ability/trigger is producing actions; a violation causes the
/// empty action list to be returned instead (see `crate::ability`).
pub trait Constraint: fmt::Debug {
    /// Name used in diagnostics and in `VetoReason::ConstraintViolated`.
    fn name(&self) -> &'static str;

    /// Evaluates the constraint. Implementations must be pure functions of
    /// `game` and `ctx` — no mutation, including of the `PhaseCounters` aux
    /// object, happens here; counters are advanced by `Game::activate`
    /// after every constraint has passed.
    fn check(&self, game: &Game, ctx: &ConstraintContext<'_>) -> Result<(), VetoReason>;

    /// The `PhaseCounters` key this constraint would advance after a
    /// successful activation, if it is a rate-limiting constraint.
    /// `LimitPerPhaseActor` and `LimitPerPhaseKey` override this;
    /// everything else stays at the default of "does not count usage".
    fn usage_key(&self, _ctx: &ConstraintContext<'_>) -> Option<String> {
        None
    }
}

fn violated(name: &'static str) -> VetoReason {
    VetoReason::ConstraintViolated { constraint: name }
}

/// The owning actor must not be dead.
#[derive(Debug)]
pub struct SourceAlive;

impl Constraint for SourceAlive {
    fn name(&self) -> &'static str {
        "SourceAlive"
    }

    fn check(&self, game: &Game, ctx: &ConstraintContext<'_>) -> Result<(), VetoReason> {
        match game.actor(ctx.owner) {
            Some(actor) if actor.is_alive() => Ok(()),
            _ => Err(violated(self.name())),
        }
    }
}

/// The named target actor must not be dead. Vacuously satisfied if no
/// target was supplied.
#[derive(Debug)]
pub struct TargetAlive;

impl Constraint for TargetAlive {
    fn name(&self) -> &'static str {
        "TargetAlive"
    }

    fn check(&self, game: &Game, ctx: &ConstraintContext<'_>) -> Result<(), VetoReason> {
        match ctx.target {
            Some(target) => match game.actor(target) {
                Some(actor) if actor.is_alive() => Ok(()),
                _ => Err(violated(self.name())),
            },
            None => Ok(()),
        }
    }
}

/// The current phase's name must be one of the given names.
#[derive(Debug)]
pub struct PhaseIs(pub Vec<String>);

impl Constraint for PhaseIs {
    fn name(&self) -> &'static str {
        "PhaseIs"
    }

    fn check(&self, game: &Game, _ctx: &ConstraintContext<'_>) -> Result<(), VetoReason> {
        let current = game.phase().current().name().to_string();
        if self.0.iter().any(|name| name == &current) {
            Ok(())
        } else {
            Err(violated(self.name()))
        }
    }
}

/// This particular ability/trigger attachment may fire at most `n` times
/// per phase for its owning actor. Counted under the key
/// `"{owner}/{attachment}"` in the game's `PhaseCounters` aux object.
#[derive(Debug)]
pub struct LimitPerPhaseActor(pub u32);

impl Constraint for LimitPerPhaseActor {
    fn name(&self) -> &'static str {
        "LimitPerPhaseActor"
    }

    fn check(&self, game: &Game, ctx: &ConstraintContext<'_>) -> Result<(), VetoReason> {
        let key = per_actor_key(ctx.owner, ctx.attachment);
        if game.phase_counters().count(&key) < self.0 {
            Ok(())
        } else {
            Err(VetoReason::LimitReached)
        }
    }

    fn usage_key(&self, ctx: &ConstraintContext<'_>) -> Option<String> {
        Some(per_actor_key(ctx.owner, ctx.attachment))
    }
}

/// At most `n` total firings per phase across every attachment sharing
/// `key`, regardless of owning actor. This is how two mafiosi sharing
/// `LimitPerPhaseKey("mafia_kill", 1)` cap each other's activations.
#[derive(Debug)]
pub struct LimitPerPhaseKey {
    /// The shared counter key.
    pub key: String,
    /// The cap.
    pub limit: u32,
}

impl Constraint for LimitPerPhaseKey {
    fn name(&self) -> &'static str {
        "LimitPerPhaseKey"
    }

    fn check(&self, game: &Game, _ctx: &ConstraintContext<'_>) -> Result<(), VetoReason> {
        if game.phase_counters().count(&self.key) < self.limit {
            Ok(())
        } else {
            Err(VetoReason::LimitReached)
        }
    }

    fn usage_key(&self, _ctx: &ConstraintContext<'_>) -> Option<String> {
        Some(self.key.clone())
    }
}

/// The target actor must not share a faction with the owning actor.
#[derive(Debug)]
pub struct NoSelfFactionTarget;

impl Constraint for NoSelfFactionTarget {
    fn name(&self) -> &'static str {
        "NoSelfFactionTarget"
    }

    fn check(&self, game: &Game, ctx: &ConstraintContext<'_>) -> Result<(), VetoReason> {
        let target = match ctx.target {
            Some(target) => target,
            None => return Ok(()),
        };
        let owner = match game.actor(ctx.owner) {
            Some(actor) => actor,
            None => return Err(violated(self.name())),
        };
        let target = match game.actor(target) {
            Some(actor) => actor,
            None => return Err(violated(self.name())),
        };
        let shares_faction = owner
            .factions()
            .iter()
            .any(|faction| target.factions().contains(faction));
        if shares_faction {
            Err(violated(self.name()))
        } else {
            Ok(())
        }
    }
}

/// Returns the counting key `LimitPerPhaseActor` derives for a given
/// attachment, exposed so `Game::activate` can increment the same counter
/// it just checked.
pub(crate) fn per_actor_key(owner: ActorId, attachment: &str) -> String {
    format!("{}/{}", owner, attachment)
}

/// Runs every constraint in order against `ctx`, stopping at (and
/// returning) the first violation. A panicking `check` is treated as a
/// violation and logged to the diagnostics channel, matching the kernel's
/// failure semantics for handler/action panics.
pub(crate) fn check_all(
    constraints: &[Box<dyn Constraint>],
    game: &Game,
    ctx: &ConstraintContext<'_>,
) -> Result<(), VetoReason> {
    for constraint in constraints {
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            constraint.check(game, ctx)
        }));
        match outcome {
            Ok(Ok(())) => continue,
            Ok(Err(reason)) => return Err(reason),
            Err(payload) => {
                crate::diagnostics::constraint_panicked(
                    constraint.name(),
                    &crate::diagnostics::describe_panic(&*payload),
                );
                return Err(violated(constraint.name()));
            }
        }
    }
    Ok(())
}
