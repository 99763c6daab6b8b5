//! Daily analytics scoring

pub mod ports;
pub mod service;

pub use ports::AnalyticsRepository;
pub use service::AnalyticsService;
