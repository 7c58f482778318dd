//! 日志投递实现
//!
//! 不接入真实短信/邮件服务商，仅记录投递事件

use async_trait::async_trait;
use tracing::info;
use zipper_config::DeliveryConfig;
use zipper_errors::AppResult;

use crate::domain::{EmailSender, SmsSender};

pub struct LoggingSmsSender {
    sender_id: String,
}

impl LoggingSmsSender {
    pub fn new(sender_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
        }
    }

    pub fn from_config(config: &DeliveryConfig) -> Self {
        Self::new(config.sms_sender_id.clone())
    }
}

#[async_trait]
impl SmsSender for LoggingSmsSender {
    async fn send_code(&self, phone: &str, code: &str) -> AppResult<()> {
        let body = format!("Your OTP for Zipper is: {}", code);
        info!(
            to = %phone,
            sender_id = %self.sender_id,
            body_len = body.len(),
            "SMS OTP dispatched"
        );
        Ok(())
    }
}

pub struct LoggingEmailSender {
    from: String,
    subject: String,
}

impl LoggingEmailSender {
    pub fn new(from: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            subject: subject.into(),
        }
    }

    pub fn from_config(config: &DeliveryConfig) -> Self {
        Self::new(config.email_from.clone(), config.email_subject.clone())
    }
}

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send_code(&self, email: &str, code: &str) -> AppResult<()> {
        let body = format!("Your OTP is: {}", code);
        info!(
            to = %email,
            from = %self.from,
            subject = %self.subject,
            body_len = body.len(),
            "Email OTP dispatched"
        );
        Ok(())
    }
}
