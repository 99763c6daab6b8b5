//! Freeze token ledger
//!
//! Freeze tokens are granted on a lazy weekly cadence (capped) and consumed
//! to retroactively cover a missed day. Streak recomputation consumes the
//! resulting coverage; activation itself never recomputes.

pub mod ports;
pub mod service;

pub use ports::{FreezeTokenRepository, UserCountersRepository};
pub use service::FreezeService;
