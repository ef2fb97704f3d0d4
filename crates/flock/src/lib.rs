//! 读写咨询锁管理器 (flock)
//!
//! 每个受保护的资源拥有一个 [`Flock`]。调用者以位掩码 [`FlockOp`] 请求共享 (读)
//! 或独占 (写) 锁，可选非阻塞修饰；释放时锁按**写者优先**策略提升排队的等待者。
//!
//! # 组件
//!
//! - [`op`] - `LOCK_SH` / `LOCK_EX` / `LOCK_UN` / `LOCK_NB` 位掩码
//! - [`error`] - 错误类型及 errno 转换
//! - [`config`] - 每把锁的配置 (等待队列容量)
//! - `policy` - 准入与提升状态机，不含任何互斥或等待逻辑
//! - `flock` - 由互斥锁保护的 [`Flock`]，以及阻塞获取
//! - `guard` - 持锁期间的 RAII 保护器 [`FlockGuard`]
//!
//! # 设计概览
//!
//! ## 准入策略与挂起机制分离
//!
//! 准入策略只会返回 [`Acquired::Granted`] 或 [`Acquired::Blocked`]，从不挂起调用者。
//! 被阻塞的调用者持有一张 [`FlockTicket`]，之后可以：
//!
//! 1. 通过 [`Flock::poll`] 查询自己是否已被提升；
//! 2. 通过 [`Flock::cancel`] 放弃等待；
//! 3. 或直接使用 [`Flock::lock`]，在锁内部的 [`sync::CondVar`] 上等待提升。
//!
//! ## 写者优先
//!
//! - 释放时，排队的独占请求总是先于共享请求被提升；
//! - 只要存在排队的独占请求，新到的共享请求就必须排队，防止写者饥饿；
//! - 没有独占等待者时，所有排队的共享请求一次性被提升。
//!
//! ## 持有者校验
//!
//! 获取成功 (或排队) 时签发的票据同时是持有者令牌：释放必须出示票据，
//! 未持有锁的票据会被拒绝并返回 [`FlockError::InvalidHolder`]。

#![no_std]

extern crate alloc;

pub mod config;
pub mod error;
pub mod op;

mod flock;
mod guard;
mod policy;
mod state;
mod ticket;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_MAX_WAITERS, FlockConfig};
pub use error::FlockError;
pub use flock::Flock;
pub use guard::FlockGuard;
pub use op::{FlockOp, LockMode};
pub use policy::{Acquired, Promotion, TicketStatus};
pub use state::{FlockSnapshot, FlockState};
pub use ticket::FlockTicket;
