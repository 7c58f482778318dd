//! 用户实体

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zipper_common::UserId;
use zipper_otp::Identifier;

use super::HashedPassword;

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Traveler,
    BusOwner,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Traveler => "traveler",
            Self::BusOwner => "busOwner",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// 忽略大小写，`busOwner` / `bus_owner` / `busowner` 均可
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "traveler" => Ok(Self::Traveler),
            "busowner" | "bus_owner" => Ok(Self::BusOwner),
            "admin" => Ok(Self::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// 登录标识（邮箱或手机号，已归一化）
    pub identifier: Identifier,
    pub password_hash: HashedPassword,
    pub role: Role,
    /// 是否已通过 OTP 验证
    pub verified: bool,
    /// 巴士公司（仅 BusOwner）
    pub bus_company: Option<String>,
    /// 客户经理（仅 BusOwner）
    pub account_manager: Option<String>,
    pub created_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

impl User {
    /// 创建未验证用户
    pub fn new(
        name: String,
        identifier: Identifier,
        password_hash: HashedPassword,
        role: Role,
        bus_company: Option<String>,
        account_manager: Option<String>,
    ) -> Self {
        let (bus_company, account_manager) = match role {
            Role::BusOwner => (bus_company, account_manager),
            _ => (None, None),
        };

        Self {
            id: UserId::new(),
            name,
            identifier,
            password_hash,
            role,
            verified: false,
            bus_company,
            account_manager,
            created_at: Utc::now(),
            verified_at: None,
        }
    }

    /// 标记为已验证（重复调用不改变首次验证时间）
    pub fn mark_verified(&mut self) {
        if !self.verified {
            self.verified = true;
            self.verified_at = Some(Utc::now());
        }
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }
}
