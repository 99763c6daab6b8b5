//! Habit configuration management

pub mod ports;
pub mod service;

pub use ports::HabitRepository;
pub use service::HabitService;
