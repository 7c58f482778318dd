//! 服务装配

use std::sync::Arc;

use axum::Router;
use chrono::Duration;
use secrecy::ExposeSecret;
use tracing::warn;
use zipper_common::{Clock, SystemClock};
use zipper_config::{AppConfig, OtpConfig};
use zipper_errors::{AppError, AppResult};
use zipper_otp::{OtpPolicy, OtpRegistry};

use crate::api::http;
use crate::application::AccountService;
use crate::domain::OtpDispatcher;
use crate::infrastructure::{InMemoryUserRepository, LoggingEmailSender, LoggingSmsSender};

/// 由配置生成验证码策略
pub fn otp_policy(config: &OtpConfig) -> AppResult<OtpPolicy> {
    let ttl = i64::try_from(config.ttl_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| AppError::validation("otp.ttl_seconds is out of range"))?;

    if config.dev_mode {
        Ok(OtpPolicy::development(
            ttl,
            config.dev_bypass_code.expose_secret().clone(),
        ))
    } else {
        Ok(OtpPolicy::production(ttl))
    }
}

/// 装配账号服务
pub fn build_service(config: &AppConfig, clock: Arc<dyn Clock>) -> AppResult<Arc<AccountService>> {
    let policy = otp_policy(&config.otp)?;
    if policy.is_development() {
        warn!(app_env = %config.app_env, "OTP development mode is enabled");
    }

    let dispatcher = OtpDispatcher::new(
        Arc::new(LoggingSmsSender::from_config(&config.delivery)),
        Arc::new(LoggingEmailSender::from_config(&config.delivery)),
    );

    Ok(Arc::new(AccountService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(OtpRegistry::new(policy, clock)),
        Arc::new(dispatcher),
    )))
}

/// 构建业务路由
pub fn build_router(config: &AppConfig) -> AppResult<Router> {
    let service = build_service(config, Arc::new(SystemClock))?;
    Ok(http::routes(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    #[test]
    fn test_otp_policy_production() {
        let policy = otp_policy(&OtpConfig::default()).unwrap();
        assert!(!policy.is_development());
        assert_eq!(policy.ttl.num_seconds(), 300);
    }

    #[test]
    fn test_otp_policy_development() {
        let config = OtpConfig {
            ttl_seconds: 60,
            dev_mode: true,
            dev_bypass_code: Secret::new("654321".to_string()),
        };

        let policy = otp_policy(&config).unwrap();
        assert_eq!(policy.dev_bypass.as_deref(), Some("654321"));
        assert_eq!(policy.ttl.num_seconds(), 60);
    }

    #[test]
    fn test_otp_policy_rejects_overflowing_ttl() {
        let config = OtpConfig {
            ttl_seconds: u64::MAX,
            ..OtpConfig::default()
        };

        assert!(matches!(otp_policy(&config), Err(AppError::Validation(_))));
    }
}
