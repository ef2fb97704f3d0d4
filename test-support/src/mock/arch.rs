//! 架构相关操作的 Mock 实现

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Once;

use sync::ArchOps;

/// Mock 架构操作
///
/// 用一个原子布尔值模拟本地中断使能位，并统计关中断次数。
pub struct MockArchOps {
    pub interrupt_state: AtomicBool,
    pub disable_count: AtomicUsize,
}

impl MockArchOps {
    pub const fn new() -> Self {
        Self {
            interrupt_state: AtomicBool::new(true),
            disable_count: AtomicUsize::new(0),
        }
    }

    /// 当前模拟的中断是否处于启用状态
    pub fn interrupts_enabled(&self) -> bool {
        self.interrupt_state.load(Ordering::SeqCst)
    }

    /// 累计关中断次数
    pub fn disable_count(&self) -> usize {
        self.disable_count.load(Ordering::SeqCst)
    }
}

impl ArchOps for MockArchOps {
    unsafe fn read_and_disable_interrupts(&self) -> usize {
        self.disable_count.fetch_add(1, Ordering::SeqCst);
        self.interrupt_state.swap(false, Ordering::SeqCst) as usize
    }

    unsafe fn restore_interrupts(&self, flags: usize) {
        self.interrupt_state.store(flags != 0, Ordering::SeqCst);
    }
}

/// 全局 Mock 实例
pub static MOCK_ARCH_OPS: MockArchOps = MockArchOps::new();

static INSTALL: Once = Once::new();

/// 向 sync 注册 [`MOCK_ARCH_OPS`]
///
/// 可被多个测试线程并发调用；只有第一次调用会真正注册，
/// 其余调用等待注册完成后返回。
pub fn install_mock_arch() {
    INSTALL.call_once(|| {
        // SAFETY: Once 保证只有一个线程执行注册
        unsafe { sync::register_arch_ops(&MOCK_ARCH_OPS) };
    });
}
