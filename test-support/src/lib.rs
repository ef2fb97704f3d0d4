//! 测试支持 crate
//!
//! 提供宿主机测试所需的 Mock 实现

#![no_std]

extern crate std;

pub mod mock;

pub use mock::arch::{MOCK_ARCH_OPS, install_mock_arch};
