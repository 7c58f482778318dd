//! 基础设施层

pub mod delivery;
pub mod metrics;
pub mod persistence;

pub use delivery::{LoggingEmailSender, LoggingSmsSender};
pub use persistence::InMemoryUserRepository;
