//! 账号服务
//!
//! 注册、OTP 验证、重发与登录。验证码投递失败时已签发的验证码保持有效，
//! 注册与重发都向调用方返回 `ExternalService` 错误，用户可再次请求重发。

use std::sync::Arc;

use tracing::{debug, info, warn};
use zipper_errors::{AppError, AppResult};
use zipper_otp::code::is_well_formed;
use zipper_otp::{Identifier, OtpRegistry};

use super::commands::{
    LoginCommand, LoginResult, ResendOtpCommand, SignupCommand, SignupResult, VerifyOtpCommand,
    VerifyOtpResult,
};
use crate::domain::{HashedPassword, OtpDispatcher, PasswordError, Role, User, UserRepository};
use crate::infrastructure::metrics;

pub struct AccountService {
    user_repo: Arc<dyn UserRepository>,
    otp_registry: Arc<OtpRegistry>,
    dispatcher: Arc<OtpDispatcher>,
}

impl AccountService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        otp_registry: Arc<OtpRegistry>,
        dispatcher: Arc<OtpDispatcher>,
    ) -> Self {
        Self {
            user_repo,
            otp_registry,
            dispatcher,
        }
    }

    /// 注册并发送验证码
    pub async fn signup(&self, cmd: SignupCommand) -> AppResult<SignupResult> {
        let name = cmd.name.trim();
        if name.is_empty()
            || cmd.identifier.trim().is_empty()
            || cmd.password.is_empty()
            || cmd.role.trim().is_empty()
        {
            return Err(AppError::validation("Please fill all required fields"));
        }

        let identifier =
            Identifier::parse(&cmd.identifier).map_err(|e| AppError::validation(e.to_string()))?;
        let role: Role = cmd.role.parse().map_err(AppError::validation)?;

        debug!(identifier = %identifier, role = %role, "Signing up account");

        if self.user_repo.exists(&identifier).await? {
            warn!(identifier = %identifier, "Signup rejected, account already exists");
            return Err(AppError::conflict("This account is already in the system."));
        }

        let password_hash = HashedPassword::from_plain(&cmd.password).map_err(password_error)?;
        let user = User::new(
            name.to_string(),
            identifier.clone(),
            password_hash,
            role,
            non_blank(cmd.bus_company),
            non_blank(cmd.account_manager),
        );

        self.user_repo.save(&user).await?;
        metrics::record_signup(identifier.kind().as_str());

        info!(
            user_id = %user.id,
            identifier = %identifier,
            role = %role,
            "Account created, pending OTP verification"
        );

        self.issue_and_dispatch(&identifier).await?;

        Ok(SignupResult {
            user_id: user.id,
            expires_in: self.expires_in(&identifier),
            identifier,
        })
    }

    /// 校验验证码并标记账号已验证
    pub async fn verify_otp(&self, cmd: VerifyOtpCommand) -> AppResult<VerifyOtpResult> {
        let code = cmd.code.trim();
        if cmd.identifier.trim().is_empty() || code.is_empty() {
            return Err(AppError::validation("Identifier and OTP required"));
        }

        // 标识格式错误与验证码错误返回同一错误
        let Ok(identifier) = Identifier::parse(&cmd.identifier) else {
            return Err(invalid_otp());
        };

        if !is_well_formed(code) || !self.otp_registry.verify(&identifier, code) {
            warn!(identifier = %identifier, "OTP verification failed");
            return Err(invalid_otp());
        }

        let mut user = self
            .user_repo
            .find_by_identifier(&identifier)
            .await?
            .ok_or_else(|| {
                warn!(identifier = %identifier, "OTP verified but no account found");
                AppError::not_found("User not found")
            })?;

        user.mark_verified();
        self.user_repo.update(&user).await?;

        info!(user_id = %user.id, identifier = %identifier, "Account verified");

        Ok(VerifyOtpResult {
            user_id: user.id,
            role: user.role,
        })
    }

    /// 重发验证码，覆盖未消费的旧验证码
    ///
    /// 返回新验证码的有效期（秒）
    pub async fn resend_otp(&self, cmd: ResendOtpCommand) -> AppResult<i64> {
        if cmd.identifier.trim().is_empty() {
            return Err(AppError::validation("Identifier required"));
        }

        let identifier =
            Identifier::parse(&cmd.identifier).map_err(|e| AppError::validation(e.to_string()))?;

        let user = self
            .user_repo
            .find_by_identifier(&identifier)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if user.is_verified() {
            return Err(AppError::failed_precondition("Account already verified"));
        }

        let replacing = self.otp_registry.peek_exists(&identifier);
        self.issue_and_dispatch(&identifier).await?;

        info!(user_id = %user.id, identifier = %identifier, replacing, "OTP resent");

        Ok(self.expires_in(&identifier))
    }

    /// 登录
    ///
    /// 不签发令牌，只返回账号概要
    pub async fn login(&self, cmd: LoginCommand) -> AppResult<LoginResult> {
        if cmd.identifier.trim().is_empty() || cmd.password.is_empty() {
            return Err(AppError::validation("Please provide identifier and password"));
        }

        let result = self.authenticate(&cmd).await;
        metrics::record_login(result.is_ok());

        let user = result?;
        info!(user_id = %user.id, "Login succeeded");

        Ok(LoginResult {
            id: user.id,
            name: user.name,
            role: user.role,
            bus_company: user.bus_company,
        })
    }

    async fn authenticate(&self, cmd: &LoginCommand) -> AppResult<User> {
        let Ok(identifier) = Identifier::parse(&cmd.identifier) else {
            return Err(invalid_credentials());
        };

        let Some(user) = self.user_repo.find_by_identifier(&identifier).await? else {
            warn!(identifier = %identifier, "Login failed, unknown identifier");
            return Err(invalid_credentials());
        };

        if !user
            .password_hash
            .verify(&cmd.password)
            .map_err(password_error)?
        {
            warn!(user_id = %user.id, "Login failed, wrong password");
            return Err(invalid_credentials());
        }

        if !user.is_verified() {
            warn!(user_id = %user.id, "Login rejected, account not verified");
            return Err(AppError::forbidden(
                "Account not verified. Please verify your OTP.",
            ));
        }

        Ok(user)
    }

    async fn issue_and_dispatch(&self, identifier: &Identifier) -> AppResult<()> {
        let code = self.otp_registry.issue(identifier);
        let channel = identifier.kind().as_str();

        match self.dispatcher.dispatch(identifier, &code).await {
            Ok(()) => {
                metrics::record_otp_delivery(channel, true);
                Ok(())
            }
            Err(e) => {
                metrics::record_otp_delivery(channel, false);
                warn!(identifier = %identifier, channel, error = %e, "OTP delivery failed");
                Err(AppError::external_service(format!(
                    "Failed to send OTP via {}. Please request a new code.",
                    channel
                )))
            }
        }
    }

    fn expires_in(&self, identifier: &Identifier) -> i64 {
        self.otp_registry
            .remaining_seconds(identifier)
            .unwrap_or_else(|| self.otp_registry.policy().ttl.num_seconds())
    }
}

fn invalid_otp() -> AppError {
    AppError::validation("Invalid or expired OTP")
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid credentials")
}

fn password_error(err: PasswordError) -> AppError {
    match err {
        PasswordError::Empty | PasswordError::TooLong(_) => AppError::validation(err.to_string()),
        PasswordError::HashingFailed(_) | PasswordError::InvalidHash(_) => {
            AppError::internal(err.to_string())
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
