use super::*;
use crate::{FlockSnapshot, FlockState, Promotion};

#[test]
fn test_release_unlocked() {
    let mut core = new_core();
    let ticket = granted(core.acquire(EX));
    core.release(ticket).unwrap();

    assert_eq!(core.release(ticket), Err(FlockError::NotHeld));
    assert_eq!(core.snapshot(), FlockSnapshot::IDLE);
}

#[test]
fn test_exclusive_release_without_waiters() {
    let mut core = new_core();
    let ticket = granted(core.acquire(EX));

    assert_eq!(core.release(ticket), Ok(Promotion::None));
    assert_eq!(core.snapshot(), FlockSnapshot::IDLE);
}

#[test]
fn test_shared_release_counts_down() {
    let mut core = new_core();
    let a = granted(core.acquire(SH));
    let b = granted(core.acquire(SH));

    assert_eq!(core.release(a), Ok(Promotion::None));
    let snap = core.snapshot();
    assert_eq!(snap.state, FlockState::Shared);
    assert_eq!(snap.active_shared, 1);
    assert!(snap.shared_active);

    assert_eq!(core.release(b), Ok(Promotion::None));
    assert_eq!(core.snapshot(), FlockSnapshot::IDLE);
}

#[test]
fn test_foreign_ticket_rejected() {
    let mut core = new_core();
    let writer = granted(core.acquire(EX));
    let waiter = blocked(core.acquire(SH));

    // 等待者的票据不是持有者
    assert_eq!(core.release(waiter), Err(FlockError::InvalidHolder));
    let snap = core.snapshot();
    assert_eq!(snap.state, FlockState::Exclusive);
    assert_eq!(snap.waiting_shared, 1);

    assert_eq!(core.release(writer), Ok(Promotion::Shared(1)));
    assert_eq!(core.release(writer), Err(FlockError::InvalidHolder));
    assert_eq!(core.snapshot().active_shared, 1);
}

#[test]
fn test_reader_cannot_release_twice() {
    let mut core = new_core();
    let a = granted(core.acquire(SH));
    let _b = granted(core.acquire(SH));

    core.release(a).unwrap();
    assert_eq!(core.release(a), Err(FlockError::InvalidHolder));
    assert_eq!(core.snapshot().active_shared, 1);
}

#[test]
fn test_quiescence_after_uncontended_pairs() {
    let mut core = new_core();
    for _ in 0..100 {
        let ticket = granted(core.acquire(EX));
        assert_eq!(core.release(ticket), Ok(Promotion::None));
    }
    assert_eq!(core.snapshot(), FlockSnapshot::IDLE);
    assert!(core.is_consistent());
}
