//! OTP 注册表
//!
//! 每个归一化标识最多持有一条未消费的验证码：
//!
//! ```text
//! NoRecord --issue--> Pending --(verify 成功 | 再次 issue | 观察到过期)--> NoRecord
//! ```
//!
//! 再次 issue 会直接覆盖为新的 Pending。过期记录只在下次 verify 时惰性删除，
//! 不启动后台清理任务，需要时可由调用方执行 [`OtpRegistry::purge_expired`]。
//!
//! 存储按标识哈希分片，每个分片一把锁：同一标识上的检查-删除是原子的，
//! 不同标识之间互不阻塞。

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tracing::{debug, info};
use zipper_common::{Clock, SystemClock};

use crate::code::generate_code;
use crate::metrics;
use crate::{Identifier, OtpRecord};

const SHARD_COUNT: usize = 16;

/// 默认有效期（5 分钟）
pub const DEFAULT_TTL_SECONDS: i64 = 300;

/// 默认开发万能码
pub const DEFAULT_DEV_BYPASS_CODE: &str = "123456";

/// 签发与校验策略
#[derive(Debug, Clone)]
pub struct OtpPolicy {
    /// 有效期
    pub ttl: Duration,
    /// 开发模式万能码；`None` 表示生产模式
    pub dev_bypass: Option<String>,
}

impl OtpPolicy {
    /// 生产模式：随机验证码，无万能码
    pub fn production(ttl: Duration) -> Self {
        Self {
            ttl,
            dev_bypass: None,
        }
    }

    /// 开发模式：签发固定验证码，且万能码始终通过
    pub fn development(ttl: Duration, bypass_code: impl Into<String>) -> Self {
        Self {
            ttl,
            dev_bypass: Some(bypass_code.into()),
        }
    }

    pub fn is_development(&self) -> bool {
        self.dev_bypass.is_some()
    }
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self::production(Duration::seconds(DEFAULT_TTL_SECONDS))
    }
}

/// 校验结果
///
/// 对外只暴露布尔值，不区分失败原因，避免泄露哪些标识已注册
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// 验证码匹配且未过期
    Verified,
    /// 命中开发万能码
    Bypassed,
    /// 没有待验证记录
    NotFound,
    /// 验证码不匹配，记录保留
    Mismatch,
    /// 记录已过期，已删除
    Expired,
}

impl VerifyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Verified | Self::Bypassed)
    }

    /// 该结果是否消费（删除）记录
    fn consumes_record(&self) -> bool {
        matches!(self, Self::Verified | Self::Bypassed | Self::Expired)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Bypassed => "bypassed",
            Self::NotFound => "not_found",
            Self::Mismatch => "mismatch",
            Self::Expired => "expired",
        }
    }
}

/// OTP 注册表
pub struct OtpRegistry {
    shards: Box<[Mutex<HashMap<Identifier, OtpRecord>>]>,
    policy: OtpPolicy,
    clock: Arc<dyn Clock>,
}

impl OtpRegistry {
    pub fn new(policy: OtpPolicy, clock: Arc<dyn Clock>) -> Self {
        if policy.is_development() {
            info!(
                ttl_seconds = policy.ttl.num_seconds(),
                "OTP registry running in development mode, bypass code is accepted"
            );
        }

        let shards = (0..SHARD_COUNT)
            .map(|_| Mutex::new(HashMap::new()))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            shards,
            policy,
            clock,
        }
    }

    /// 使用系统时钟
    pub fn with_system_clock(policy: OtpPolicy) -> Self {
        Self::new(policy, Arc::new(SystemClock))
    }

    pub fn policy(&self) -> &OtpPolicy {
        &self.policy
    }

    /// 签发验证码
    ///
    /// 覆盖该标识上任何未消费的验证码，返回新验证码供投递
    pub fn issue(&self, identifier: &Identifier) -> String {
        let code = match &self.policy.dev_bypass {
            Some(bypass) => bypass.clone(),
            None => generate_code(),
        };

        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.policy.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let record = OtpRecord::new(identifier.clone(), code.clone(), now, expires_at);

        let replaced = self
            .shard(identifier)
            .lock()
            .insert(identifier.clone(), record)
            .is_some();

        metrics::record_issued(identifier.kind(), replaced);

        if self.policy.is_development() {
            info!(identifier = %identifier, code = %code, "Development OTP issued");
        } else {
            debug!(identifier = %identifier, replaced, expires_at = %expires_at, "OTP issued");
        }

        code
    }

    /// 校验并消费验证码
    ///
    /// 成功（精确匹配且未过期，或命中开发万能码）时删除记录并返回 `true`；
    /// 过期时删除记录并返回 `false`；不匹配时保留记录
    pub fn verify(&self, identifier: &Identifier, submitted_code: &str) -> bool {
        let outcome = {
            let mut shard = self.shard(identifier).lock();
            let now = self.clock.now();

            let outcome = match shard.get(identifier) {
                None => VerifyOutcome::NotFound,
                Some(_) if self.is_bypass(submitted_code) => VerifyOutcome::Bypassed,
                Some(record) if record.is_expired_at(now) => VerifyOutcome::Expired,
                Some(record) if !record.matches(submitted_code) => VerifyOutcome::Mismatch,
                Some(_) => VerifyOutcome::Verified,
            };

            if outcome.consumes_record() {
                shard.remove(identifier);
            }

            outcome
        };

        metrics::record_verification(outcome);
        debug!(identifier = %identifier, outcome = outcome.as_str(), "OTP verification");

        outcome.is_success()
    }

    /// 是否存在记录（不考虑是否过期）
    pub fn peek_exists(&self, identifier: &Identifier) -> bool {
        self.shard(identifier).lock().contains_key(identifier)
    }

    /// 待验证记录的剩余有效时间（秒），无记录时为 `None`
    pub fn remaining_seconds(&self, identifier: &Identifier) -> Option<i64> {
        let now = self.clock.now();
        self.shard(identifier)
            .lock()
            .get(identifier)
            .map(|record| record.remaining_seconds(now))
    }

    /// 清理所有已过期记录，返回删除数量
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;

        for shard in self.shards.iter() {
            let mut shard = shard.lock();
            let before = shard.len();
            shard.retain(|_, record| !record.is_expired_at(now));
            removed += before - shard.len();
        }

        if removed > 0 {
            info!(removed, "Expired OTP records purged");
        }

        removed
    }

    /// 当前记录数（包括尚未被观察到的过期记录）
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_bypass(&self, submitted_code: &str) -> bool {
        self.policy.dev_bypass.as_deref() == Some(submitted_code)
    }

    fn shard(&self, identifier: &Identifier) -> &Mutex<HashMap<Identifier, OtpRecord>> {
        let mut hasher = DefaultHasher::new();
        identifier.hash(&mut hasher);
        let index = (hasher.finish() as usize) % self.shards.len();
        &self.shards[index]
    }
}
