//! Check-in and skip record ledger

pub mod ports;
pub mod service;

pub use ports::CheckinRepository;
pub use service::{CheckinInput, RecordService};
