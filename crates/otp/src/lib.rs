//! zipper-otp - 一次性验证码注册表
//!
//! 按归一化的账号标识（邮箱或手机号）签发、校验并消费 6 位验证码

pub mod code;
mod identifier;
mod metrics;
mod record;
mod registry;

pub use identifier::{Identifier, IdentifierError, IdentifierKind};
pub use record::OtpRecord;
pub use registry::{
    DEFAULT_DEV_BYPASS_CODE, DEFAULT_TTL_SECONDS, OtpPolicy, OtpRegistry, VerifyOutcome,
};
