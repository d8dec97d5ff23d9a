//! The `Vote` action and an ability that casts one.

use std::rc::Rc;

use crate::ability::Ability;
use crate::actor::ActorId;
use crate::constraint::Constraint;
use crate::event::{ActionBody, ActionKind, ActionSpec, ActivationArgs};
use crate::game::Game;

/// A single cast vote. Carries no mutation of its own — `run` is a no-op —
/// it exists purely to be observed by `Tally` in `EPostAction`.
#[derive(Debug)]
pub struct VoteActionBody {
    /// The actor casting the vote.
    pub voter: ActorId,
    /// The actor being voted for.
    pub target: ActorId,
}

impl ActionBody for VoteActionBody {
    fn kind(&self) -> ActionKind {
        ActionKind::Vote
    }

    fn run(&self, _game: &mut Game) {}

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// An ability that casts a lynch vote for its named target. Typical wiring
/// pairs this with `PhaseIs(["day N"])` and `LimitPerPhaseActor(1)`.
#[derive(Debug)]
pub struct Vote {
    constraints: Vec<Box<dyn Constraint>>,
}

impl Vote {
    /// Builds the ability with the given constraint list.
    pub fn new(constraints: Vec<Box<dyn Constraint>>) -> Self {
        Self { constraints }
    }
}

impl Ability for Vote {
    fn name(&self) -> &str {
        "vote"
    }

    fn constraints(&self) -> &[Box<dyn Constraint>] {
        &self.constraints
    }

    fn make_actions(&self, _game: &Game, owner: ActorId, args: &ActivationArgs) -> Vec<ActionSpec> {
        match args.target() {
            Some(target) => vec![ActionSpec::new(
                owner,
                Rc::new(VoteActionBody { voter: owner, target }),
            )],
            None => Vec::new(),
        }
    }
}
