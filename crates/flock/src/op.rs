//! flock 操作位掩码
//!
//! 取值与 `flock(2)` 保持一致。

use core::fmt;

use bitflags::bitflags;

use crate::FlockError;

bitflags! {
    /// flock 操作位掩码
    ///
    /// 一次获取请求必须且只能包含 `LOCK_SH` 与 `LOCK_EX` 之一，可附加 `LOCK_NB`。
    /// `LOCK_UN` 只能通过 [`crate::Flock::flock`] 使用。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FlockOp: u32 {
        /// 共享锁 (读者)
        const LOCK_SH = 0b0001;
        /// 独占锁 (写者)
        const LOCK_EX = 0b0010;
        /// 解锁
        const LOCK_UN = 0b0100;
        /// 非阻塞：无法立即获取时返回 WouldBlock 而不是排队
        const LOCK_NB = 0b1000;
    }
}

/// 获取模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// 共享 (读者)
    Shared,
    /// 独占 (写者)
    Exclusive,
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockMode::Shared => f.write_str("LOCK_SH"),
            LockMode::Exclusive => f.write_str("LOCK_EX"),
        }
    }
}

impl FlockOp {
    /// 从系统调用传入的原始整数解析
    ///
    /// 负数或包含未知位时返回 [`FlockError::InvalidArgument`]。
    pub fn from_raw(raw: i32) -> Result<Self, FlockError> {
        u32::try_from(raw)
            .ok()
            .and_then(Self::from_bits)
            .ok_or(FlockError::InvalidArgument)
    }

    /// 是否为非阻塞请求
    pub fn is_nonblocking(self) -> bool {
        self.contains(Self::LOCK_NB)
    }

    /// 是否为解锁请求
    pub fn is_unlock(self) -> bool {
        self.contains(Self::LOCK_UN)
    }

    /// 解析出获取模式
    ///
    /// 同时包含或都不包含 `LOCK_SH` / `LOCK_EX`，或包含 `LOCK_UN` 时返回
    /// [`FlockError::InvalidArgument`]。
    pub fn mode(self) -> Result<LockMode, FlockError> {
        if self.is_unlock() {
            return Err(FlockError::InvalidArgument);
        }
        match (self.contains(Self::LOCK_SH), self.contains(Self::LOCK_EX)) {
            (true, false) => Ok(LockMode::Shared),
            (false, true) => Ok(LockMode::Exclusive),
            _ => Err(FlockError::InvalidArgument),
        }
    }
}

impl From<LockMode> for FlockOp {
    fn from(mode: LockMode) -> Self {
        match mode {
            LockMode::Shared => FlockOp::LOCK_SH,
            LockMode::Exclusive => FlockOp::LOCK_EX,
        }
    }
}
