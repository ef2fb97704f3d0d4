//! 自旋锁实现
//!
//! 基于原子操作实现自旋锁，并实现 [`lock_api::RawMutex`]，
//! 从而可以直接作为 `lock_api::Mutex` 的底层锁使用。
//!
//! 与 Linux 的 `spin_lock_irqsave` 类似：加锁前禁用本地中断，
//! 进入前的中断状态保存在锁内部，解锁时恢复。

use core::hint;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use lock_api::{GuardNoSend, RawMutex};

use crate::arch_ops;

/// 自旋锁，提供互斥访问临界区的能力。
///
/// 不可重入 (即同一执行流不能嵌套加锁)。
///
/// # 示例
/// ```ignore
/// let lock: lock_api::Mutex<RawSpinLock, u32> = lock_api::Mutex::new(0);
/// {
///     let mut guard = lock.lock(); // 获取锁，禁用中断
///     *guard += 1;
/// } // 离开作用域，自动释放锁并恢复中断状态
/// ```
#[derive(Debug)]
pub struct RawSpinLock {
    locked: AtomicBool,
    /// 持锁者进入临界区前的中断状态，只由持锁者读写
    saved_flags: AtomicUsize,
}

impl RawSpinLock {
    /// 创建一个新的 RawSpinLock 实例。
    pub const fn new() -> Self {
        RawSpinLock {
            locked: AtomicBool::new(false),
            saved_flags: AtomicUsize::new(0),
        }
    }

    fn try_acquire(&self) -> bool {
        self.locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }
}

impl Default for RawSpinLock {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl RawMutex for RawSpinLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: RawSpinLock = RawSpinLock::new();

    // 中断状态属于当前 CPU，guard 不能跨线程转移
    type GuardMarker = GuardNoSend;

    fn lock(&self) {
        // SAFETY: 保存的状态在 unlock 中恢复
        let flags = unsafe { arch_ops().read_and_disable_interrupts() };

        while !self.try_acquire() {
            while self.locked.load(Ordering::Relaxed) {
                hint::spin_loop();
            }
        }

        self.saved_flags.store(flags, Ordering::Relaxed);
    }

    fn try_lock(&self) -> bool {
        // SAFETY: 获取失败时立即恢复，成功时在 unlock 中恢复
        let flags = unsafe { arch_ops().read_and_disable_interrupts() };

        if self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            self.saved_flags.store(flags, Ordering::Relaxed);
            true
        } else {
            // SAFETY: flags 刚由 read_and_disable_interrupts 返回
            unsafe { arch_ops().restore_interrupts(flags) };
            false
        }
    }

    unsafe fn unlock(&self) {
        let flags = self.saved_flags.load(Ordering::Relaxed);
        self.locked.store(false, Ordering::Release);
        // SAFETY: flags 是加锁时保存的状态
        unsafe { arch_ops().restore_interrupts(flags) };
    }

    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}
