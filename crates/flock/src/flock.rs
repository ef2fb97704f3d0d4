//! 由互斥锁保护的 flock
//!
//! [`Flock`] 将 `policy` 中的状态机放入 `lock_api::Mutex`，每次操作从读取、判定到修改
//! 都在同一次持锁期间完成，并在所有返回路径上释放互斥锁。

use lock_api::{Mutex, RawMutex};
use log::debug;
use sync::{CondVar, RawSpinLock};

use crate::policy::FlockCore;
use crate::{
    Acquired, FlockConfig, FlockError, FlockGuard, FlockOp, FlockSnapshot, FlockState,
    FlockTicket, Promotion, TicketStatus,
};

/// 读写咨询锁
///
/// 每个受保护资源持有一个实例。`R` 为保护内部状态的互斥原语，默认使用
/// [`sync::RawSpinLock`]。
///
/// # 示例
/// ```ignore
/// let lock: Flock = Flock::new();
///
/// let ticket = match lock.acquire(FlockOp::LOCK_EX)? {
///     Acquired::Granted(ticket) => ticket,
///     Acquired::Blocked(ticket) => {
///         // 由调用方决定如何等待，之后用 poll 确认已被提升
///         ticket
///     }
/// };
/// lock.release(ticket)?;
/// ```
pub struct Flock<R: RawMutex = RawSpinLock> {
    core: Mutex<R, FlockCore>,
    /// 每次提升后通知，供阻塞获取的调用者重新检查
    promoted: CondVar,
}

impl<R: RawMutex> Flock<R> {
    /// 使用默认配置创建一把空闲的锁
    pub const fn new() -> Self {
        Self::with_config(FlockConfig::DEFAULT)
    }

    /// 使用指定配置创建一把空闲的锁
    pub const fn with_config(config: FlockConfig) -> Self {
        Self {
            core: Mutex::const_new(R::INIT, FlockCore::new(config)),
            promoted: CondVar::new(),
        }
    }

    /// 请求获取锁，不会挂起调用者
    ///
    /// # 返回值
    /// - `Ok(Acquired::Granted)`：已持有锁
    /// - `Ok(Acquired::Blocked)`：已排队，之后通过 [`Flock::poll`] 确认提升，
    ///   或通过 [`Flock::cancel`] 放弃
    /// - `Err(WouldBlock)`：非阻塞请求无法立即满足，等待计数不变
    /// - `Err(InvalidArgument)`：模式无效
    /// - `Err(NoLocks)`：等待队列已满
    pub fn acquire(&self, op: FlockOp) -> Result<Acquired, FlockError> {
        let mut core = self.core.lock();
        let result = core.acquire(op);
        debug_assert!(core.is_consistent());
        result
    }

    /// 释放 `ticket` 持有的锁
    ///
    /// 可能同步提升排队的等待者；发生提升时唤醒所有阻塞在 [`Flock::lock`] 中的调用者。
    pub fn release(&self, ticket: FlockTicket) -> Result<Promotion, FlockError> {
        let mut core = self.core.lock();
        let promotion = core.release(ticket)?;
        debug_assert!(core.is_consistent());
        if promotion.is_some() {
            self.promoted.notify_all();
        }
        Ok(promotion)
    }

    /// 查询票据是否已持有锁
    pub fn poll(&self, ticket: FlockTicket) -> Result<TicketStatus, FlockError> {
        self.core.lock().poll(ticket)
    }

    /// 放弃排队中的请求
    pub fn cancel(&self, ticket: FlockTicket) -> Result<(), FlockError> {
        let mut core = self.core.lock();
        let promotion = core.cancel(ticket)?;
        debug_assert!(core.is_consistent());
        if promotion.is_some() {
            self.promoted.notify_all();
        }
        Ok(())
    }

    /// 采集当前状态快照
    pub fn inspect(&self) -> FlockSnapshot {
        self.core.lock().snapshot()
    }

    /// 当前模式
    pub fn state(&self) -> FlockState {
        self.core.lock().state()
    }

    /// 获取锁，必要时等待直到被提升
    ///
    /// 带 `LOCK_NB` 时行为与 [`Flock::acquire`] 相同，无法立即获取即返回
    /// [`FlockError::WouldBlock`]。返回的保护器在离开作用域时释放锁。
    pub fn lock(&self, op: FlockOp) -> Result<FlockGuard<'_, R>, FlockError> {
        let mode = op.mode()?;
        let ticket = self.lock_ticket(op)?;
        Ok(FlockGuard::new(self, ticket, mode))
    }

    /// 阻塞获取共享锁
    pub fn read(&self) -> Result<FlockGuard<'_, R>, FlockError> {
        self.lock(FlockOp::LOCK_SH)
    }

    /// 阻塞获取独占锁
    pub fn write(&self) -> Result<FlockGuard<'_, R>, FlockError> {
        self.lock(FlockOp::LOCK_EX)
    }

    /// 尝试立即获取共享锁
    pub fn try_read(&self) -> Result<FlockGuard<'_, R>, FlockError> {
        self.lock(FlockOp::LOCK_SH | FlockOp::LOCK_NB)
    }

    /// 尝试立即获取独占锁
    pub fn try_write(&self) -> Result<FlockGuard<'_, R>, FlockError> {
        self.lock(FlockOp::LOCK_EX | FlockOp::LOCK_NB)
    }

    /// `flock(2)` 风格的入口
    ///
    /// - `LOCK_UN`：释放 `held`，成功时返回 `Ok(None)`；
    /// - `LOCK_SH` / `LOCK_EX`（可带 `LOCK_NB`）：获取锁并返回新票据。若 `held` 不为空，
    ///   则先释放旧锁再重新获取 (与 `flock(2)` 一样，锁转换不是原子的)。
    ///
    /// 阻塞请求会一直等待到被提升。
    pub fn flock(
        &self,
        op: FlockOp,
        held: Option<FlockTicket>,
    ) -> Result<Option<FlockTicket>, FlockError> {
        if op.is_unlock() {
            if op.intersects(FlockOp::LOCK_SH | FlockOp::LOCK_EX) {
                return Err(FlockError::InvalidArgument);
            }
            return match held {
                Some(ticket) => self.release(ticket).map(|_| None),
                None if self.state() == FlockState::Inactive => Err(FlockError::NotHeld),
                None => Err(FlockError::InvalidHolder),
            };
        }

        let mode = op.mode()?;
        if let Some(ticket) = held {
            debug!("flock: converting {} to {}", ticket, mode);
            self.release(ticket)?;
        }
        self.lock_ticket(op).map(Some)
    }

    /// 获取锁并返回持有者票据，阻塞请求会在条件变量上等待提升
    fn lock_ticket(&self, op: FlockOp) -> Result<FlockTicket, FlockError> {
        let mut core = self.core.lock();
        let acquired = core.acquire(op)?;
        debug_assert!(core.is_consistent());

        let ticket = acquired.ticket();
        if !acquired.is_granted() {
            while core.poll(ticket)? == TicketStatus::Waiting {
                self.promoted.wait(&mut core);
            }
        }
        Ok(ticket)
    }
}

impl<R: RawMutex> Default for Flock<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RawMutex> core::fmt::Debug for Flock<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let snapshot = self.inspect();
        f.debug_struct("Flock")
            .field("state", &snapshot.state)
            .field("active_shared", &snapshot.active_shared)
            .field("waiting_shared", &snapshot.waiting_shared)
            .field("waiting_exclusive", &snapshot.waiting_exclusive)
            .finish()
    }
}
