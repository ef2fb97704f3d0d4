//! 条件变量
//!
//! 与 `lock_api::MutexGuard` 配合使用：`wait` 在等待期间释放互斥锁，
//! 被通知后重新获取。等待方式为自旋，不依赖调度器。

use core::hint;
use core::sync::atomic::{AtomicUsize, Ordering};

use lock_api::{MutexGuard, RawMutex};

/// 条件变量
///
/// 内部维护一个通知序号，每次通知都会使其递增；等待者自旋直到序号变化。
/// 因此 [`CondVar::notify_one`] 无法定向唤醒某一个等待者，
/// 所有等待者都可能被唤醒，调用方必须在循环中重新检查条件。
///
/// 通知方应在持有与等待方相同的互斥锁时调用通知，否则可能丢失唤醒。
#[derive(Debug)]
pub struct CondVar {
    seq: AtomicUsize,
    waiters: AtomicUsize,
}

impl CondVar {
    /// 创建一个新的条件变量
    pub const fn new() -> Self {
        Self {
            seq: AtomicUsize::new(0),
            waiters: AtomicUsize::new(0),
        }
    }

    /// 释放 `guard` 对应的锁并等待通知，返回前重新获取锁。
    ///
    /// 可能出现虚假唤醒。
    pub fn wait<R: RawMutex, T: ?Sized>(&self, guard: &mut MutexGuard<'_, R, T>) {
        let seq = self.seq.load(Ordering::Acquire);
        self.waiters.fetch_add(1, Ordering::Relaxed);

        MutexGuard::unlocked(guard, || {
            while self.seq.load(Ordering::Acquire) == seq {
                hint::spin_loop();
            }
        });

        self.waiters.fetch_sub(1, Ordering::Relaxed);
    }

    /// 在 `condition` 返回 true 期间持续等待。
    pub fn wait_while<R, T, F>(&self, guard: &mut MutexGuard<'_, R, T>, mut condition: F)
    where
        R: RawMutex,
        T: ?Sized,
        F: FnMut(&mut T) -> bool,
    {
        while condition(&mut **guard) {
            self.wait(guard);
        }
    }

    /// 唤醒至少一个等待者
    pub fn notify_one(&self) {
        self.notify_all();
    }

    /// 唤醒所有等待者
    pub fn notify_all(&self) {
        self.seq.fetch_add(1, Ordering::Release);
    }

    /// 当前处于等待中的执行流数量 (仅用于调试/测试)
    pub fn waiters(&self) -> usize {
        self.waiters.load(Ordering::Relaxed)
    }
}

impl Default for CondVar {
    fn default() -> Self {
        Self::new()
    }
}
