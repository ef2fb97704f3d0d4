//! 配置常量

/// 每把锁默认允许的最大等待者数量 (共享与独占合计)
///
/// 默认不限制：阻塞请求总是排队并返回 `Blocked`。
pub const DEFAULT_MAX_WAITERS: usize = usize::MAX;

/// 单把锁的配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlockConfig {
    /// 最多同时排队的等待者数量，超出时阻塞请求返回 `NoLocks`
    pub max_waiters: usize,
}

impl FlockConfig {
    /// 默认配置
    pub const DEFAULT: Self = Self {
        max_waiters: DEFAULT_MAX_WAITERS,
    };

    /// 使用指定的等待者上限创建配置
    ///
    /// 排队数量达到上限后，阻塞请求返回 [`crate::FlockError::NoLocks`]。
    pub const fn with_max_waiters(max_waiters: usize) -> Self {
        Self { max_waiters }
    }
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
