//! OTP 记录

use chrono::{DateTime, Utc};

use crate::Identifier;

/// 待验证的一次性验证码
#[derive(Debug, Clone)]
pub struct OtpRecord {
    /// 验证码
    pub code: String,
    /// 接收方
    pub issued_to: Identifier,
    /// 签发时间
    pub issued_at: DateTime<Utc>,
    /// 过期时间
    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    pub fn new(
        issued_to: Identifier,
        code: String,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code,
            issued_to,
            issued_at,
            expires_at,
        }
    }

    /// `now > expires_at` 即过期，恰好等于过期时间时仍有效
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn matches(&self, code: &str) -> bool {
        self.code == code
    }

    /// 剩余有效时间（秒，向上取整）
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        let millis = (self.expires_at - now).num_milliseconds().max(0);
        (millis + 999) / 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(now: DateTime<Utc>) -> OtpRecord {
        OtpRecord::new(
            Identifier::parse("+5551234").unwrap(),
            "482913".to_string(),
            now,
            now + Duration::minutes(5),
        )
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let record = record(now);

        assert!(!record.is_expired_at(now));
        assert!(!record.is_expired_at(now + Duration::minutes(5)));
        assert!(record.is_expired_at(now + Duration::minutes(5) + Duration::milliseconds(1)));
    }

    #[test]
    fn test_remaining_seconds() {
        let now = Utc::now();
        let record = record(now);

        assert_eq!(record.remaining_seconds(now), 300);
        assert_eq!(record.remaining_seconds(now + Duration::milliseconds(1)), 300);
        assert_eq!(record.remaining_seconds(now + Duration::seconds(299)), 1);
        assert_eq!(record.remaining_seconds(now + Duration::minutes(10)), 0);
    }

    #[test]
    fn test_matches() {
        let record = record(Utc::now());
        assert!(record.matches("482913"));
        assert!(!record.matches("000000"));
    }
}
