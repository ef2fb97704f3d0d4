//! flock 的 RAII 保护器

use core::fmt;
use core::mem::ManuallyDrop;

use lock_api::RawMutex;
use log::warn;
use sync::RawSpinLock;

use crate::{Flock, FlockError, FlockTicket, LockMode, Promotion};

/// 持有 flock 期间的保护器
///
/// 离开作用域时自动释放锁；需要观察释放结果时使用 [`FlockGuard::unlock`]。
#[must_use = "if unused the Flock will immediately unlock"]
pub struct FlockGuard<'a, R: RawMutex = RawSpinLock> {
    flock: &'a Flock<R>,
    ticket: FlockTicket,
    mode: LockMode,
}

impl<'a, R: RawMutex> FlockGuard<'a, R> {
    pub(crate) fn new(flock: &'a Flock<R>, ticket: FlockTicket, mode: LockMode) -> Self {
        Self {
            flock,
            ticket,
            mode,
        }
    }

    /// 持有者票据
    pub fn ticket(&self) -> FlockTicket {
        self.ticket
    }

    /// 持有的模式
    pub fn mode(&self) -> LockMode {
        self.mode
    }

    /// 显式释放锁，返回释放引起的提升
    pub fn unlock(self) -> Result<Promotion, FlockError> {
        let this = ManuallyDrop::new(self);
        this.flock.release(this.ticket)
    }

    /// 放弃自动释放，返回票据
    ///
    /// 之后必须通过 [`Flock::release`] 手动释放。
    pub fn into_ticket(self) -> FlockTicket {
        let this = ManuallyDrop::new(self);
        this.ticket
    }
}

impl<R: RawMutex> Drop for FlockGuard<'_, R> {
    fn drop(&mut self) {
        if let Err(err) = self.flock.release(self.ticket) {
            warn!("flock: {} {} not released on drop: {}", self.mode, self.ticket, err);
        }
    }
}

impl<R: RawMutex> fmt::Debug for FlockGuard<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlockGuard")
            .field("ticket", &self.ticket)
            .field("mode", &self.mode)
            .finish()
    }
}
