//! Streak recomputation

pub mod ports;
pub mod service;

pub use ports::StreakRepository;
pub use service::StreakService;
