//! Error and Result module.

use std::fmt;

use crate::constraint::VetoReason;

/// Alias for a `Result` returning an `EngineError`.
pub type EngineResult<T> = Result<T, EngineError>;

/// Error type for all kinds of errors generated by the engine.
///
/// Setup errors (`DuplicateName`, `DuplicateKey`, the `*NotFound` variants,
/// `InvalidPhaseTransition`) are raised synchronously from driver calls.
/// `InvalidActivation` reports a rejected `Game::activate` call, carrying the
/// `VetoReason` of the first failed constraint. `EngineBug` signals a kernel
/// invariant violation and is always a programming error, never a rule
/// violation.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// An actor, faction, or aux object was registered under a name/key
    /// already in use.
    DuplicateName(String),
    /// A prefab registry lookup used a string that no kind was registered
    /// under.
    UnknownKind(String),
    /// `Game::advance_phase` or `Game::set_phase` was asked to move to an
    /// illegal phase (e.g. into `shutdown` from a non-ender caller, or past
    /// `shutdown`).
    InvalidPhaseTransition {
        /// Name of the phase the game was in.
        from: String,
        /// Name of the phase transition was attempted to.
        to: String,
    },
    /// An aux object was registered under a key already occupied.
    DuplicateKey(String),
    /// `Game::activate` was rejected because an attached constraint did not
    /// hold.
    InvalidActivation(VetoReason),
    /// The referenced actor id does not exist in this game.
    UnknownActor(u64),
    /// The referenced faction id does not exist in this game.
    UnknownFaction(u64),
    /// The actor does not know the named ability.
    UnknownAbility(u64, String),
    /// A kernel invariant was violated. Always a programming error in a
    /// subscriber or in the kernel itself, never a rule violation.
    EngineBug(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use EngineError::*;
        match self {
            DuplicateName(name) => write!(f, "name {:?} is already in use", name),
            UnknownKind(name) => write!(f, "no kind registered under {:?}", name),
            InvalidPhaseTransition { from, to } => {
                write!(f, "can't transition from phase {:?} to {:?}", from, to)
            }
            DuplicateKey(key) => write!(f, "aux object key {:?} is already registered", key),
            InvalidActivation(reason) => write!(f, "activation rejected: {}", reason),
            UnknownActor(id) => write!(f, "actor {} not found", id),
            UnknownFaction(id) => write!(f, "faction {} not found", id),
            UnknownAbility(actor, name) => {
                write!(f, "actor {} doesn't know ability {:?}", actor, name)
            }
            EngineBug(msg) => write!(f, "engine bug: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}
