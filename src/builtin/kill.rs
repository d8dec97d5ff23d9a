//! The `Kill` action and an ability that enqueues it.

use std::rc::Rc;

use crate::ability::Ability;
use crate::actor::ActorId;
use crate::constraint::Constraint;
use crate::event::{ActionBody, ActionKind, ActionSpec, ActivationArgs};
use crate::game::Game;
use crate::status::StatusValue;

/// Sets `status["dead"] = true` on its target. Left un-cancelled, it kills;
/// a `Protect` trigger (or anything else) cancelling it during `EPreAction`
/// is how protection effects are expressed.
#[derive(Debug)]
pub struct KillActionBody {
    /// The actor who caused the kill, for diagnostics and history.
    pub actor: ActorId,
    /// The actor being killed.
    pub target: ActorId,
}

impl ActionBody for KillActionBody {
    fn kind(&self) -> ActionKind {
        ActionKind::Kill
    }

    fn run(&self, game: &mut Game) {
        let _ = game.set_status(self.target, "dead", StatusValue::Bool(true));
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// An ability that kills its named target outright. Typical wiring pairs
/// this with `PhaseIs(["night N"])`, `LimitPerPhaseKey("mafia_kill", 1)`,
/// `SourceAlive`, `TargetAlive`, and `NoSelfFactionTarget`.
#[derive(Debug)]
pub struct MafiaKill {
    constraints: Vec<Box<dyn Constraint>>,
}

impl MafiaKill {
    /// Builds the ability with the given constraint list.
    pub fn new(constraints: Vec<Box<dyn Constraint>>) -> Self {
        Self { constraints }
    }
}

impl Ability for MafiaKill {
    fn name(&self) -> &str {
        "mafia_kill"
    }

    fn constraints(&self) -> &[Box<dyn Constraint>] {
        &self.constraints
    }

    fn make_actions(&self, _game: &Game, owner: ActorId, args: &ActivationArgs) -> Vec<ActionSpec> {
        match args.target() {
            Some(target) => vec![ActionSpec::new(
                owner,
                Rc::new(KillActionBody { actor: owner, target }),
            )],
            None => Vec::new(),
        }
    }
}
