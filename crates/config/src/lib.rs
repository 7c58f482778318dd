//! zipper-config - 配置加载库

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// 验证码有效期上限（1 天）
pub const MAX_OTP_TTL_SECONDS: u64 = 86_400;

/// OTP 配置
///
/// 对应环境变量 `ZIPPER_OTP__TTL_SECONDS`、`ZIPPER_OTP__DEV_MODE`、`ZIPPER_OTP__DEV_BYPASS_CODE`
#[derive(Debug, Clone, Deserialize)]
pub struct OtpConfig {
    /// 验证码有效期（秒）
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    /// 开发模式：固定验证码，且万能码始终通过
    #[serde(default)]
    pub dev_mode: bool,
    /// 开发模式下的万能码
    ///
    /// 环境变量中的纯数字会被解析为整数，按 6 位补零还原
    #[serde(
        default = "default_dev_bypass_code",
        deserialize_with = "deserialize_bypass_code"
    )]
    pub dev_bypass_code: Secret<String>,
}

fn default_ttl_seconds() -> u64 {
    300
}

fn default_dev_bypass_code() -> Secret<String> {
    Secret::new("123456".to_string())
}

fn deserialize_bypass_code<'de, D>(deserializer: D) -> Result<Secret<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCode {
        Text(String),
        Number(u64),
    }

    let code = match RawCode::deserialize(deserializer)? {
        RawCode::Text(text) => text,
        RawCode::Number(number) => format!("{:06}", number),
    };
    Ok(Secret::new(code))
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            dev_mode: false,
            dev_bypass_code: default_dev_bypass_code(),
        }
    }
}

/// 验证码投递配置
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    /// 短信发送方标识
    #[serde(default = "default_sms_sender_id")]
    pub sms_sender_id: String,
    /// 邮件发件人
    #[serde(default = "default_email_from")]
    pub email_from: String,
    /// 邮件主题
    #[serde(default = "default_email_subject")]
    pub email_subject: String,
}

fn default_sms_sender_id() -> String {
    "Zipper".to_string()
}

fn default_email_from() -> String {
    "noreply@zipper.local".to_string()
}

fn default_email_subject() -> String {
    "Your OTP for Zipper".to_string()
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            sms_sender_id: default_sms_sender_id(),
            email_from: default_email_from(),
            email_subject: default_email_subject(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub otp: OtpConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

fn default_app_env() -> String {
    "development".to_string()
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| default_app_env());

        let figment = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(("app_env", env))
            .merge(Env::prefixed("ZIPPER_").split("__"));

        Self::from_figment(figment)
    }

    /// 从任意 Figment 提取并校验
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.otp.ttl_seconds == 0 || self.otp.ttl_seconds > MAX_OTP_TTL_SECONDS {
            return Err(ConfigError::Invalid(format!(
                "otp.ttl_seconds must be between 1 and {}",
                MAX_OTP_TTL_SECONDS
            )));
        }

        let bypass = self.otp.dev_bypass_code.expose_secret();
        if bypass.len() != 6 || !bypass.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::Invalid(
                "otp.dev_bypass_code must be exactly 6 digits".to_string(),
            ));
        }

        // 万能码不允许出现在生产环境
        if self.otp.dev_mode && self.is_production() {
            return Err(ConfigError::Invalid(
                "otp.dev_mode must not be enabled in production".to_string(),
            ));
        }

        Ok(())
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}
