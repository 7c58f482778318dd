//! 领域层

mod delivery;
mod password;
mod repositories;
mod user;

pub use delivery::{EmailSender, OtpDispatcher, SmsSender};
pub use password::{HashedPassword, PasswordError};
pub use repositories::UserRepository;
pub use user::{Role, User};
