// Unit tests for the admission/promotion state machine.
//
// These drive `FlockCore` directly, without the mutex or the condition variable,
// so no ArchOps registration is needed.

use crate::policy::FlockCore;
use crate::{Acquired, FlockConfig, FlockError, FlockOp, FlockTicket};

const SH: FlockOp = FlockOp::LOCK_SH;
const EX: FlockOp = FlockOp::LOCK_EX;
const SH_NB: FlockOp = FlockOp::LOCK_SH.union(FlockOp::LOCK_NB);
const EX_NB: FlockOp = FlockOp::LOCK_EX.union(FlockOp::LOCK_NB);

fn new_core() -> FlockCore {
    FlockCore::new(FlockConfig::DEFAULT)
}

/// Unwraps a grant, panicking with the actual outcome otherwise.
fn granted(result: Result<Acquired, FlockError>) -> FlockTicket {
    match result {
        Ok(Acquired::Granted(ticket)) => ticket,
        other => panic!("expected Granted, got {:?}", other),
    }
}

/// Unwraps a queued request, panicking with the actual outcome otherwise.
fn blocked(result: Result<Acquired, FlockError>) -> FlockTicket {
    match result {
        Ok(Acquired::Blocked(ticket)) => ticket,
        other => panic!("expected Blocked, got {:?}", other),
    }
}

mod cancel;
mod release;
