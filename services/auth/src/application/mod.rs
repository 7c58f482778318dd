//! 应用层

mod account_service;
mod commands;

pub use account_service::AccountService;
pub use commands::*;
