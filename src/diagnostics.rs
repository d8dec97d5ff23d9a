//! Diagnostics channel.
//!
//! The kernel never lets a panicking handler, action, or constraint take the
//! whole game down with it (see the failure semantics in the crate's design
//! notes); instead it catches the panic at the boundary and reports it here.
//! This module is deliberately thin: it is not a bespoke event bus, just a
//! few formatting helpers over the `log` facade, so a driver observes
//! engine-internal failures the same way it already observes any other
//! `log`-instrumented dependency.

/// Reports that a subscriber's handler panicked while responding to an
/// event. The dispatch treats the handler as having produced no actions.
pub fn handler_panicked(owner: u64, event_kind: &str, payload: &str) {
    log::warn!(
        "subscriber {} panicked handling {}: {}",
        owner,
        event_kind,
        payload
    );
}

/// Reports that an action's `run` panicked. The action is recorded in
/// history as failed; no `EPostAction` is emitted for it.
pub fn action_failed(action_kind: &str, seq: u64, payload: &str) {
    log::error!(
        "action {} (seq {}) failed during run: {}",
        action_kind,
        seq,
        payload
    );
}

/// Reports that a constraint's `check` panicked. Treated as a violation.
pub fn constraint_panicked(constraint: &str, payload: &str) {
    log::warn!("constraint {} panicked during check: {}", constraint, payload);
}

/// Formats a caught panic payload into a human-readable string, mirroring
/// the pattern `std::panic::catch_unwind` callers typically need since the
/// payload is a type-erased `Box<dyn Any + Send>`.
pub fn describe_panic(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
