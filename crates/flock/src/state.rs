//! 锁状态与诊断快照

use core::fmt;

/// 锁当前的授予模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlockState {
    /// 无持有者
    Inactive,
    /// 一个或多个读者持有
    Shared,
    /// 唯一的写者持有
    Exclusive,
}

impl fmt::Display for FlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlockState::Inactive => f.write_str("INACTIVE"),
            FlockState::Shared => f.write_str("SHARED"),
            FlockState::Exclusive => f.write_str("EXCLUSIVE"),
        }
    }
}

/// 锁状态的只读快照
///
/// 由 [`crate::Flock::inspect`] 在持锁期间一次性采集。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlockSnapshot {
    /// 当前模式
    pub state: FlockState,
    /// 持有共享锁的读者数量
    pub active_shared: usize,
    /// 是否有写者持有
    pub exclusive_active: bool,
    /// 是否有读者持有
    pub shared_active: bool,
    /// 排队的共享请求数量
    pub waiting_shared: usize,
    /// 排队的独占请求数量
    pub waiting_exclusive: usize,
}

impl FlockSnapshot {
    /// 全新 (或已完全空闲) 的锁的快照
    pub const IDLE: Self = Self {
        state: FlockState::Inactive,
        active_shared: 0,
        exclusive_active: false,
        shared_active: false,
        waiting_shared: 0,
        waiting_exclusive: 0,
    };

    /// 锁是否空闲且没有等待者
    pub fn is_idle(&self) -> bool {
        *self == Self::IDLE
    }
}

impl fmt::Display for FlockSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "flock state: {}", self.state)?;
        writeln!(
            f,
            "  shared active:     {} ({})",
            self.active_shared, self.shared_active
        )?;
        writeln!(f, "  exclusive active:  {}", self.exclusive_active)?;
        writeln!(f, "  waiting shared:    {}", self.waiting_shared)?;
        write!(f, "  waiting exclusive: {}", self.waiting_exclusive)
    }
}
