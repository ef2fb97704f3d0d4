//! 持有者/等待者票据

use core::fmt;

/// 获取请求的票据
///
/// 请求被授予或排队时由锁签发，此后作为持有者/等待者的身份令牌。
/// 票据只在签发它的锁上有意义。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlockTicket(u64);

impl FlockTicket {
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }

    /// 票据编号，同一把锁上单调递增
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FlockTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
