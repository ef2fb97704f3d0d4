use std::sync::Arc;
use std::thread;

use lock_api::RawMutex;
use sync::{RawSpinLock, SpinLock, SpinLockGuard};
use test_support::install_mock_arch;

#[test]
fn test_lock_and_modify() {
    install_mock_arch();
    let lock = SpinLock::new(0);
    {
        let mut guard = lock.lock();
        *guard += 1;
        assert!(lock.is_locked());
    }
    assert!(!lock.is_locked());
    assert_eq!(*lock.lock(), 1);
}

fn push_twice(guard: &mut SpinLockGuard<'_, Vec<u32>>, value: u32) {
    guard.push(value);
    guard.push(value);
}

#[test]
fn test_guard_passed_by_reference() {
    install_mock_arch();
    let lock = SpinLock::new(Vec::new());
    {
        let mut guard = lock.lock();
        push_twice(&mut guard, 7);
        assert!(lock.is_locked());
    }
    assert!(!lock.is_locked());
    assert_eq!(*lock.lock(), [7, 7]);
}

#[test]
fn test_try_lock_fails_while_held() {
    install_mock_arch();
    let lock = SpinLock::new(());
    let guard = lock.lock();
    assert!(lock.try_lock().is_none());
    drop(guard);
    assert!(lock.try_lock().is_some());
}

#[test]
fn test_raw_lock_unlock() {
    install_mock_arch();
    let raw = RawSpinLock::new();
    raw.lock();
    assert!(raw.is_locked());
    assert!(!raw.try_lock());
    unsafe { raw.unlock() };
    assert!(!raw.is_locked());
    assert!(raw.try_lock());
    unsafe { raw.unlock() };
}

#[test]
fn test_counter_under_contention() {
    install_mock_arch();
    let lock = Arc::new(SpinLock::new(0usize));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let lock = Arc::clone(&lock);
            thread::spawn(move || {
                for _ in 0..1000 {
                    *lock.lock() += 1;
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(*lock.lock(), 4000);
}
