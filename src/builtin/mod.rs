//! Built-in abilities, triggers, and aux objects covering the common
//! Mafia/Werewolf moves: a lynch vote, a night kill, a protection effect,
//! a vote tally, and the `GameEnder` every built game registers.
//!
//! None of the kernel (`event`, `queue`, `registry`, `game`, `constraint`,
//! `ability`, `aux`, `phase`, `outcome`) depends on this module; everything
//! here is a rule author's starting point, grounded in the same
//! extension points a custom rule set would use.

pub mod ender;
pub mod kill;
pub mod protect;
pub mod tally;
pub mod vote;
