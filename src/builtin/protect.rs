//! A trigger that cancels any `Kill` action targeting its own owner.

use crate::ability::{gated_response, Trigger};
use crate::actor::ActorId;
use crate::constraint::Constraint;
use crate::event::{ActionKind, ActionSpec, Event, EventKind};
use crate::game::Game;

use super::kill::KillActionBody;

/// Cancels every `Kill` action whose target is this trigger's own owner,
/// for as long as its constraints hold (typically `SourceAlive` plus a
/// `LimitPerPhaseActor` cap so the protection can only be granted once a
/// phase).
#[derive(Debug)]
pub struct Protect {
    constraints: Vec<Box<dyn Constraint>>,
}

impl Protect {
    /// Builds the trigger with the given constraint list.
    pub fn new(constraints: Vec<Box<dyn Constraint>>) -> Self {
        Self { constraints }
    }
}

impl Trigger for Protect {
    fn name(&self) -> &str {
        "protect"
    }

    fn constraints(&self) -> &[Box<dyn Constraint>] {
        &self.constraints
    }

    fn interests(&self) -> Vec<EventKind> {
        vec![EventKind::PreActionOf(ActionKind::Kill)]
    }

    fn on_event(&self, game: &Game, owner: ActorId, event: &Event) -> Vec<ActionSpec> {
        gated_response(self, game, owner, Some(owner), || {
            if let Event::PreAction(action) = event {
                if let Some(kill) = action.body().as_any().downcast_ref::<KillActionBody>() {
                    if kill.target == owner {
                        action.cancel();
                    }
                }
            }
            Vec::new()
        })
    }
}
