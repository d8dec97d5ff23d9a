//! Named phases and the default cyclic day/night progression.

use std::fmt;

use crate::error::EngineError;

/// How an outgoing phase's accumulated main queue is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPolicy {
    /// Responses enqueued while this phase is active drain immediately.
    Instant,
    /// Responses accumulate until the phase ends, then drain as a batch.
    EndOfPhase,
}

/// Reserved initial phase name. Always `Instant`.
pub const STARTUP: &str = "startup";
/// Reserved terminal phase name. Always `Instant`; the only legal way in is
/// via the `GameEnder`'s `EndTheGame` action or an explicit admin call.
pub const SHUTDOWN: &str = "shutdown";

/// A single named interval with an action-resolution policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    name: String,
    policy: ResolutionPolicy,
}

impl Phase {
    /// Creates a phase with the given name and policy.
    pub fn new(name: impl Into<String>, policy: ResolutionPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
        }
    }

    /// The phase's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The phase's resolution policy.
    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Owns the ordered phase progression. The default system cycles
/// `startup -> day 1 -> night 1 -> day 2 -> night 2 -> ... -> shutdown`;
/// `day` is `Instant`, `night` is `EndOfPhase`.
#[derive(Debug)]
pub struct PhaseSystem {
    current: Phase,
    cycle: u32,
    ended: bool,
}

impl PhaseSystem {
    /// Creates a phase system sitting in `startup`.
    pub fn new() -> Self {
        Self {
            current: Phase::new(STARTUP, ResolutionPolicy::Instant),
            cycle: 0,
            ended: false,
        }
    }

    /// The currently active phase.
    pub fn current(&self) -> &Phase {
        &self.current
    }

    /// Whether the system has reached `shutdown`.
    pub fn has_ended(&self) -> bool {
        self.ended
    }

    /// Advances to the next phase in the default cyclic progression.
    /// Illegal once `shutdown` has been reached.
    pub fn advance(&mut self) -> Result<Phase, EngineError> {
        if self.ended {
            return Err(EngineError::InvalidPhaseTransition {
                from: self.current.name.clone(),
                to: "<advance>".to_string(),
            });
        }
        let next = match self.current.name.as_str() {
            STARTUP => {
                self.cycle = 1;
                Phase::new(format!("day {}", self.cycle), ResolutionPolicy::Instant)
            }
            name if name.starts_with("day ") => {
                Phase::new(format!("night {}", self.cycle), ResolutionPolicy::EndOfPhase)
            }
            name if name.starts_with("night ") => {
                self.cycle += 1;
                Phase::new(format!("day {}", self.cycle), ResolutionPolicy::Instant)
            }
            _ => {
                return Err(EngineError::InvalidPhaseTransition {
                    from: self.current.name.clone(),
                    to: "<advance>".to_string(),
                })
            }
        };
        self.current = next.clone();
        Ok(next)
    }

    /// Forces a transition to an explicit phase, bypassing the cyclic
    /// progression. Used by `EndTheGameAction` to enter `shutdown`, and
    /// available to admin/debug callers. The only legal forced target once
    /// the game has started is `shutdown`.
    pub fn set_to(&mut self, name: &str) -> Result<Phase, EngineError> {
        if name != SHUTDOWN {
            return Err(EngineError::InvalidPhaseTransition {
                from: self.current.name.clone(),
                to: name.to_string(),
            });
        }
        let phase = Phase::new(SHUTDOWN, ResolutionPolicy::Instant);
        self.current = phase.clone();
        self.ended = true;
        Ok(phase)
    }
}

impl Default for PhaseSystem {
    fn default() -> Self {
        Self::new()
    }
}
