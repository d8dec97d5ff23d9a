#![deny(missing_docs)]

//!
//! covenant is a deterministic resolution kernel for Mafia/Werewolf-style
//! social deduction games.
//!
//! * Every rule — a night kill, a lynch vote, a protection effect, a win
//!   condition — is expressed as an [`ability`], a [`constraint`], or an
//!   aux object, never as a hardcoded special case in the kernel itself.
//! * Activations and the events they cause are resolved through one
//!   deterministic queue: same-priority work is batched, batches drain in
//!   strict priority order, and the full resolution trail (including
//!   cancelled and nested actions) is retained in [`Game::history`].
//! * Single-threaded, synchronous, reentrant-by-design: a handler reacting
//!   to one action is free to cause and fully resolve another before
//!   control returns to the handler that started it.
//!
//! ## How does it work?
//!
//! You build a [`Game`](game::Game) with [`Game::builder`](game::Game::builder),
//! declaring its factions and each actor's abilities and triggers up front.
//! From then on the driver interacts with the game through two calls:
//! [`Game::activate`](game::Game::activate), to spend an ability, and
//! [`Game::advance_phase`](game::Game::advance_phase), to move the game
//! from day to night and back.
//!
//! Everything else — who is still alive, who voted for whom, whether a
//! faction has won — is observed by registering an [`ability::Trigger`] or
//! an [`aux::AuxObject`], not by special-casing the kernel.
//!
//! ## Events and actions
//!
//! The kernel is built on a two-layer vocabulary:
//!
//! - An [`event::Event`] is an immutable notification: a phase changed, a
//!   status was written, an ability was activated, an action is about to
//!   run or just did.
//! - An [`event::ActionSpec`] is a handler's response to an event: a
//!   deferred mutation to enqueue. The queue itself is responsible for
//!   bracketing every action's execution with `EPreAction`/`EPostAction`
//!   events — action bodies never emit events directly.
//!
//! This split is what makes reentrancy safe: a handler only ever produces
//! *descriptions* of mutations, and the queue decides when they actually
//! run.
//!
//! ## Built-in rules
//!
//! The [`builtin`] module ships a lynch vote, a night kill, a protection
//! trigger, a vote tally, and the `GameEnder` every built game registers.
//! None of it is load-bearing for the kernel; it exists as a grounded
//! starting point for a rule author's own abilities and triggers.

pub use crate::error::{EngineError, EngineResult};
pub use crate::game::Game;

pub mod ability;
pub mod actor;
pub mod aux;
pub mod builtin;
pub mod constraint;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod faction;
pub mod game;
pub mod kinds;
pub mod object;
pub mod outcome;
pub mod phase;
pub mod queue;
pub mod registry;
pub mod status;
