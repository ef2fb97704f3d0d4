//! flock 错误类型
//!
//! 可通过 [`FlockError::to_errno()`] 转换为系统调用错误码。

use core::fmt;

/// flock 错误类型
///
/// 所有错误都不会修改锁的状态。"已排队" 不是错误，见 [`crate::Acquired::Blocked`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlockError {
    /// 请求模式无效：未指定或同时指定了共享与独占 (-EINVAL)
    InvalidArgument,
    /// 非阻塞请求无法立即满足 (-EWOULDBLOCK)
    WouldBlock,
    /// 锁当前没有任何持有者 (-ENOLCK)
    NotHeld,
    /// 票据不是当前持有者或等待者 (-EPERM)
    InvalidHolder,
    /// 等待队列已满 (-ENOLCK)
    NoLocks,
}

impl FlockError {
    /// 转换为系统调用错误码（负数）
    pub fn to_errno(&self) -> isize {
        match self {
            FlockError::InvalidHolder => -1,
            FlockError::WouldBlock => -11,
            FlockError::InvalidArgument => -22,
            FlockError::NotHeld | FlockError::NoLocks => -37,
        }
    }
}

impl fmt::Display for FlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FlockError::InvalidArgument => "invalid lock operation",
            FlockError::WouldBlock => "operation would block",
            FlockError::NotHeld => "lock is not held",
            FlockError::InvalidHolder => "ticket does not hold or wait on this lock",
            FlockError::NoLocks => "too many waiters",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for FlockError {}
