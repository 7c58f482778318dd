//! 账号标识（邮箱或手机号）
//!
//! 归一化规则：
//! - 含 `@` 视为邮箱，统一小写
//! - 否则视为手机号，缺少 `+` 时补齐
//!
//! 两个标识相等当且仅当归一化后相等

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 手机号数字位数范围（E.164 最长 15 位）
const PHONE_MIN_DIGITS: usize = 5;
const PHONE_MAX_DIGITS: usize = 15;

/// 标识类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Email,
    Phone,
}

impl IdentifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 归一化后的账号标识
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    value: String,
    kind: IdentifierKind,
}

impl Identifier {
    /// 解析并归一化
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::Empty);
        }

        if trimmed.contains('@') {
            let email = trimmed.to_lowercase();
            if !email_address::EmailAddress::is_valid(&email) {
                return Err(IdentifierError::InvalidEmail(trimmed.to_string()));
            }
            return Ok(Self {
                value: email,
                kind: IdentifierKind::Email,
            });
        }

        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let valid = (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len())
            && digits.chars().all(|c| c.is_ascii_digit());
        if !valid {
            return Err(IdentifierError::InvalidPhone(trimmed.to_string()));
        }

        Ok(Self {
            value: format!("+{}", digits),
            kind: IdentifierKind::Phone,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    pub fn is_email(&self) -> bool {
        self.kind == IdentifierKind::Email
    }

    pub fn is_phone(&self) -> bool {
        self.kind == IdentifierKind::Phone
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(identifier: Identifier) -> Self {
        identifier.value
    }
}

/// 标识错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("Identifier is empty")]
    Empty,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_lowercased() {
        let id = Identifier::parse("A@B.com").unwrap();
        assert_eq!(id.as_str(), "a@b.com");
        assert!(id.is_email());
        assert_eq!(id, Identifier::parse("a@b.com").unwrap());
    }

    #[test]
    fn test_phone_gets_plus_prefix() {
        let id = Identifier::parse("5551234").unwrap();
        assert_eq!(id.as_str(), "+5551234");
        assert!(id.is_phone());
        assert_eq!(id, Identifier::parse("+5551234").unwrap());
    }

    #[test]
    fn test_prefixed_phone_kept() {
        let id = Identifier::parse("+260971234567").unwrap();
        assert_eq!(id.as_str(), "+260971234567");
    }

    #[test]
    fn test_whitespace_trimmed() {
        let id = Identifier::parse("  User@Example.COM ").unwrap();
        assert_eq!(id.as_str(), "user@example.com");
    }

    #[test]
    fn test_invalid_identifiers() {
        assert_eq!(Identifier::parse(""), Err(IdentifierError::Empty));
        assert_eq!(Identifier::parse("   "), Err(IdentifierError::Empty));
        assert!(matches!(
            Identifier::parse("user@"),
            Err(IdentifierError::InvalidEmail(_))
        ));
        assert!(matches!(
            Identifier::parse("555-1234"),
            Err(IdentifierError::InvalidPhone(_))
        ));
        assert!(matches!(
            Identifier::parse("1234"),
            Err(IdentifierError::InvalidPhone(_))
        ));
        assert!(matches!(
            Identifier::parse("++5551234"),
            Err(IdentifierError::InvalidPhone(_))
        ));
    }

    #[test]
    fn test_serde_uses_normalized_string() {
        let id: Identifier = serde_json::from_str("\"5551234\"").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"+5551234\"");

        let bad: Result<Identifier, _> = serde_json::from_str("\"not a phone\"");
        assert!(bad.is_err());
    }
}
