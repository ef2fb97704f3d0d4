use super::*;
use crate::{FlockState, Promotion, TicketStatus};

#[test]
fn test_cancel_shared_waiter() {
    let mut core = new_core();
    let writer = granted(core.acquire(EX));
    let reader = blocked(core.acquire(SH));

    assert_eq!(core.cancel(reader), Ok(Promotion::None));
    assert_eq!(core.snapshot().waiting_shared, 0);
    assert_eq!(core.poll(reader), Err(FlockError::InvalidHolder));

    assert_eq!(core.release(writer), Ok(Promotion::None));
    assert_eq!(core.state(), FlockState::Inactive);
}

#[test]
fn test_cancel_last_writer_admits_blocked_readers() {
    let mut core = new_core();
    granted(core.acquire(SH));
    let writer = blocked(core.acquire(EX));
    let a = blocked(core.acquire(SH));
    let b = blocked(core.acquire(SH));

    assert_eq!(core.cancel(writer), Ok(Promotion::Shared(2)));

    let snap = core.snapshot();
    assert_eq!(snap.state, FlockState::Shared);
    assert_eq!(snap.active_shared, 3);
    assert_eq!(snap.waiting_shared, 0);
    assert_eq!(snap.waiting_exclusive, 0);
    assert_eq!(core.poll(a), Ok(TicketStatus::Granted));
    assert_eq!(core.poll(b), Ok(TicketStatus::Granted));
    assert!(core.is_consistent());
}

#[test]
fn test_cancel_writer_while_writer_holds() {
    let mut core = new_core();
    granted(core.acquire(EX));
    let writer = blocked(core.acquire(EX));
    let reader = blocked(core.acquire(SH));

    assert_eq!(core.cancel(writer), Ok(Promotion::None));
    assert_eq!(core.poll(reader), Ok(TicketStatus::Waiting));
    assert_eq!(core.snapshot().waiting_shared, 1);
}

#[test]
fn test_cancel_one_of_several_writers() {
    let mut core = new_core();
    let reader = granted(core.acquire(SH));
    let w1 = blocked(core.acquire(EX));
    let w2 = blocked(core.acquire(EX));
    blocked(core.acquire(SH));

    assert_eq!(core.cancel(w1), Ok(Promotion::None));
    assert_eq!(core.snapshot().waiting_shared, 1);
    assert_eq!(core.release(reader), Ok(Promotion::Exclusive(w2)));
}

#[test]
fn test_cancel_rejects_holders_and_strangers() {
    let mut core = new_core();
    let holder = granted(core.acquire(EX));

    assert_eq!(core.cancel(holder), Err(FlockError::InvalidHolder));
    assert_eq!(
        core.cancel(FlockTicket::new(holder.id() + 100)),
        Err(FlockError::InvalidHolder)
    );
    assert_eq!(core.state(), FlockState::Exclusive);
}
