//! Password 值对象

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};

/// 明文密码最大长度
const MAX_PASSWORD_LENGTH: usize = 128;

/// 哈希后的密码
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// 从明文密码创建哈希密码
    pub fn from_plain(plain_password: &str) -> Result<Self, PasswordError> {
        if plain_password.is_empty() {
            return Err(PasswordError::Empty);
        }
        if plain_password.chars().count() > MAX_PASSWORD_LENGTH {
            return Err(PasswordError::TooLong(MAX_PASSWORD_LENGTH));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(plain_password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
            .to_string();

        Ok(Self(password_hash))
    }

    /// 验证明文密码是否匹配
    pub fn verify(&self, plain_password: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(&self.0).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(plain_password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// 从已有的哈希字符串创建
    pub fn from_hash(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 密码错误
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password must not be empty")]
    Empty,

    #[error("Password must be at most {0} characters")]
    TooLong(usize),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash: {0}")]
    InvalidHash(String),
}
