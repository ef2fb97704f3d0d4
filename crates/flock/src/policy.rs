//! 准入与提升状态机
//!
//! [`FlockCore`] 只负责"谁现在可以持有锁"的判定与簿记，不包含互斥和等待：
//! 调用方 ([`crate::Flock`]) 负责在整个操作期间持有互斥锁，并在发生提升时通知等待者。
//!
//! 状态转换：
//!
//! | 当前状态 | 请求 | 条件 | 结果 |
//! |---|---|---|---|
//! | Inactive | EX | - | 授予，Exclusive |
//! | Shared | EX | - | 排队 / WouldBlock |
//! | Exclusive | EX | - | 排队 / WouldBlock |
//! | Exclusive | SH | - | 排队 / WouldBlock |
//! | Inactive/Shared | SH | 有独占等待者 | 排队 / WouldBlock |
//! | Inactive/Shared | SH | 无独占等待者 | 授予，Shared |
//!
//! 释放时若锁变为无人持有：优先提升队首的独占等待者，
//! 否则一次性提升全部共享等待者，否则回到 Inactive。

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use log::{debug, warn};

use crate::{
    FlockConfig, FlockError, FlockOp, FlockSnapshot, FlockState, FlockTicket, LockMode,
};

/// 获取请求的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquired {
    /// 已获得锁
    Granted(FlockTicket),
    /// 已排队等待；票据被提升后即持有锁
    Blocked(FlockTicket),
}

impl Acquired {
    /// 本次请求签发的票据
    pub fn ticket(&self) -> FlockTicket {
        match *self {
            Acquired::Granted(ticket) | Acquired::Blocked(ticket) => ticket,
        }
    }

    /// 是否已获得锁
    pub fn is_granted(&self) -> bool {
        matches!(self, Acquired::Granted(_))
    }
}

/// 释放或取消操作引起的提升
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Promotion {
    /// 没有等待者被提升
    None,
    /// 一个独占等待者成为持有者
    Exclusive(FlockTicket),
    /// 指定数量的共享等待者成为持有者
    Shared(usize),
}

impl Promotion {
    /// 是否有等待者被提升
    pub fn is_some(&self) -> bool {
        !matches!(self, Promotion::None)
    }
}

/// 票据当前的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    /// 正在持有锁
    Granted,
    /// 仍在等待队列中
    Waiting,
}

/// 当前持有者
///
/// 模式与持有者集合绑定在一起，读写互斥和计数一致性由类型本身保证。
#[derive(Debug)]
enum Holders {
    Inactive,
    /// 非空
    Shared(Vec<FlockTicket>),
    Exclusive(FlockTicket),
}

/// 单把锁的准入/提升状态
#[derive(Debug)]
pub(crate) struct FlockCore {
    holders: Holders,
    waiting_shared: VecDeque<FlockTicket>,
    waiting_exclusive: VecDeque<FlockTicket>,
    next_ticket: u64,
    config: FlockConfig,
}

impl FlockCore {
    pub(crate) const fn new(config: FlockConfig) -> Self {
        Self {
            holders: Holders::Inactive,
            waiting_shared: VecDeque::new(),
            waiting_exclusive: VecDeque::new(),
            next_ticket: 1,
            config,
        }
    }

    pub(crate) fn state(&self) -> FlockState {
        match self.holders {
            Holders::Inactive => FlockState::Inactive,
            Holders::Shared(_) => FlockState::Shared,
            Holders::Exclusive(_) => FlockState::Exclusive,
        }
    }

    pub(crate) fn snapshot(&self) -> FlockSnapshot {
        let active_shared = match &self.holders {
            Holders::Shared(readers) => readers.len(),
            _ => 0,
        };
        FlockSnapshot {
            state: self.state(),
            active_shared,
            exclusive_active: matches!(self.holders, Holders::Exclusive(_)),
            shared_active: active_shared > 0,
            waiting_shared: self.waiting_shared.len(),
            waiting_exclusive: self.waiting_exclusive.len(),
        }
    }

    /// 处理一次获取请求
    pub(crate) fn acquire(&mut self, op: FlockOp) -> Result<Acquired, FlockError> {
        let mode = op.mode()?;
        let nonblocking = op.is_nonblocking();

        match mode {
            LockMode::Exclusive => match self.holders {
                Holders::Shared(_) => self.defer(mode, nonblocking, "file is in shared use"),
                Holders::Exclusive(_) => {
                    self.defer(mode, nonblocking, "file is in exclusive use")
                }
                Holders::Inactive => {
                    let ticket = self.issue();
                    self.holders = Holders::Exclusive(ticket);
                    debug!("flock: LOCK_EX granted to {}", ticket);
                    Ok(Acquired::Granted(ticket))
                }
            },
            LockMode::Shared => {
                if let Holders::Exclusive(_) = self.holders {
                    return self.defer(mode, nonblocking, "file is in exclusive use");
                }
                if !self.waiting_exclusive.is_empty() {
                    return self.defer(mode, nonblocking, "writers are waiting");
                }

                let ticket = self.issue();
                let readers = match &mut self.holders {
                    Holders::Shared(readers) => {
                        readers.push(ticket);
                        readers.len()
                    }
                    _ => {
                        self.holders = Holders::Shared(alloc::vec![ticket]);
                        1
                    }
                };
                debug!("flock: LOCK_SH granted to {} ({} active)", ticket, readers);
                Ok(Acquired::Granted(ticket))
            }
        }
    }

    /// 释放 `ticket` 持有的锁，并按写者优先策略提升等待者
    pub(crate) fn release(&mut self, ticket: FlockTicket) -> Result<Promotion, FlockError> {
        match self.holders {
            Holders::Inactive => {
                warn!("flock: release by {} on an unlocked file", ticket);
                Err(FlockError::NotHeld)
            }
            Holders::Exclusive(holder) => {
                if holder != ticket {
                    warn!("flock: release by {} but LOCK_EX held by {}", ticket, holder);
                    return Err(FlockError::InvalidHolder);
                }
                debug!("flock: LOCK_EX released by {}", ticket);
                Ok(self.promote_idle())
            }
            Holders::Shared(ref mut readers) => {
                let Some(pos) = readers.iter().position(|r| *r == ticket) else {
                    warn!("flock: release by {} which holds no LOCK_SH", ticket);
                    return Err(FlockError::InvalidHolder);
                };
                readers.swap_remove(pos);
                let remaining = readers.len();
                debug!("flock: LOCK_SH released by {} ({} active)", ticket, remaining);

                if remaining > 0 {
                    return Ok(Promotion::None);
                }
                Ok(self.promote_idle())
            }
        }
    }

    /// 查询票据状态
    pub(crate) fn poll(&self, ticket: FlockTicket) -> Result<TicketStatus, FlockError> {
        if self.holds(ticket) {
            Ok(TicketStatus::Granted)
        } else if self.waiting_exclusive.contains(&ticket) || self.waiting_shared.contains(&ticket)
        {
            Ok(TicketStatus::Waiting)
        } else {
            Err(FlockError::InvalidHolder)
        }
    }

    /// 将排队中的 `ticket` 移出等待队列
    ///
    /// 若移除的是最后一个独占等待者且锁不处于 Exclusive，
    /// 之前仅因写者优先而排队的共享等待者会立即被提升。
    pub(crate) fn cancel(&mut self, ticket: FlockTicket) -> Result<Promotion, FlockError> {
        if let Some(pos) = self.waiting_exclusive.iter().position(|t| *t == ticket) {
            self.waiting_exclusive.remove(pos);
            debug!("flock: LOCK_EX wait cancelled by {}", ticket);

            let writer_active = matches!(self.holders, Holders::Exclusive(_));
            if self.waiting_exclusive.is_empty() && !writer_active && !self.waiting_shared.is_empty()
            {
                return Ok(Promotion::Shared(self.admit_waiting_readers()));
            }
            return Ok(Promotion::None);
        }

        if let Some(pos) = self.waiting_shared.iter().position(|t| *t == ticket) {
            self.waiting_shared.remove(pos);
            debug!("flock: LOCK_SH wait cancelled by {}", ticket);
            return Ok(Promotion::None);
        }

        warn!("flock: cancel by {} which is not waiting", ticket);
        Err(FlockError::InvalidHolder)
    }

    /// 检查内部不变量
    pub(crate) fn is_consistent(&self) -> bool {
        let holders_ok = match &self.holders {
            Holders::Shared(readers) => !readers.is_empty(),
            _ => true,
        };
        // 共享请求只会因为写者持有或写者排队而等待
        let readers_wait_for_writer = self.waiting_shared.is_empty()
            || matches!(self.holders, Holders::Exclusive(_))
            || !self.waiting_exclusive.is_empty();
        // 空闲的锁不会有等待者
        let idle_has_no_waiters = !matches!(self.holders, Holders::Inactive)
            || (self.waiting_shared.is_empty() && self.waiting_exclusive.is_empty());

        holders_ok && readers_wait_for_writer && idle_has_no_waiters
    }

    fn holds(&self, ticket: FlockTicket) -> bool {
        match &self.holders {
            Holders::Inactive => false,
            Holders::Shared(readers) => readers.contains(&ticket),
            Holders::Exclusive(holder) => *holder == ticket,
        }
    }

    fn issue(&mut self) -> FlockTicket {
        let ticket = FlockTicket::new(self.next_ticket);
        self.next_ticket += 1;
        ticket
    }

    fn waiting(&self) -> usize {
        self.waiting_shared.len() + self.waiting_exclusive.len()
    }

    /// 无法立即授予：非阻塞请求直接失败，阻塞请求排队
    fn defer(
        &mut self,
        mode: LockMode,
        nonblocking: bool,
        reason: &str,
    ) -> Result<Acquired, FlockError> {
        if nonblocking {
            debug!("flock: {}|LOCK_NB denied: {}", mode, reason);
            return Err(FlockError::WouldBlock);
        }
        if self.waiting() >= self.config.max_waiters {
            warn!(
                "flock: {} denied: {} waiters already queued",
                mode,
                self.waiting()
            );
            return Err(FlockError::NoLocks);
        }

        let ticket = self.issue();
        let queue = match mode {
            LockMode::Shared => &mut self.waiting_shared,
            LockMode::Exclusive => &mut self.waiting_exclusive,
        };
        queue.push_back(ticket);
        debug!(
            "flock: {} by {} waiting: {} ({} queued)",
            mode,
            ticket,
            reason,
            queue.len()
        );
        Ok(Acquired::Blocked(ticket))
    }

    /// 锁刚失去全部持有者时调用
    fn promote_idle(&mut self) -> Promotion {
        if let Some(next) = self.waiting_exclusive.pop_front() {
            self.holders = Holders::Exclusive(next);
            debug!("flock: promoted waiting LOCK_EX {}", next);
            return Promotion::Exclusive(next);
        }

        self.holders = Holders::Inactive;
        if self.waiting_shared.is_empty() {
            return Promotion::None;
        }
        Promotion::Shared(self.admit_waiting_readers())
    }

    /// 把全部共享等待者按到达顺序加入读者集合，返回提升的数量
    fn admit_waiting_readers(&mut self) -> usize {
        let count = self.waiting_shared.len();
        match &mut self.holders {
            Holders::Shared(readers) => readers.extend(self.waiting_shared.drain(..)),
            _ => self.holders = Holders::Shared(self.waiting_shared.drain(..).collect()),
        }
        debug!("flock: promoted {} waiting LOCK_SH", count);
        count
    }
}
