//! 账号命令与结果

use serde::Serialize;
use zipper_common::UserId;
use zipper_otp::Identifier;

use crate::domain::Role;

/// 注册
#[derive(Debug, Clone, Default)]
pub struct SignupCommand {
    pub name: String,
    pub identifier: String,
    pub password: String,
    pub role: String,
    pub bus_company: Option<String>,
    pub account_manager: Option<String>,
}

/// 校验验证码
#[derive(Debug, Clone, Default)]
pub struct VerifyOtpCommand {
    pub identifier: String,
    pub code: String,
}

/// 重发验证码
#[derive(Debug, Clone, Default)]
pub struct ResendOtpCommand {
    pub identifier: String,
}

/// 登录
#[derive(Debug, Clone, Default)]
pub struct LoginCommand {
    pub identifier: String,
    pub password: String,
}

/// 注册结果
#[derive(Debug, Clone)]
pub struct SignupResult {
    pub user_id: UserId,
    /// 规范化后的标识
    pub identifier: Identifier,
    /// 验证码有效期（秒）
    pub expires_in: i64,
}

/// 验证结果
#[derive(Debug, Clone)]
pub struct VerifyOtpResult {
    pub user_id: UserId,
    pub role: Role,
}

/// 登录结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus_company: Option<String>,
}
