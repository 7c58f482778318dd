//! 验证码投递接口

use std::sync::Arc;

use async_trait::async_trait;
use zipper_errors::AppResult;
use zipper_otp::{Identifier, IdentifierKind};

/// 短信发送器接口
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// 发送验证码短信
    async fn send_code(&self, phone: &str, code: &str) -> AppResult<()>;
}

/// 邮件发送器接口
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// 发送验证码邮件
    async fn send_code(&self, email: &str, code: &str) -> AppResult<()>;
}

/// 按标识类型选择投递渠道
pub struct OtpDispatcher {
    sms_sender: Arc<dyn SmsSender>,
    email_sender: Arc<dyn EmailSender>,
}

impl OtpDispatcher {
    pub fn new(sms_sender: Arc<dyn SmsSender>, email_sender: Arc<dyn EmailSender>) -> Self {
        Self {
            sms_sender,
            email_sender,
        }
    }

    pub async fn dispatch(&self, to: &Identifier, code: &str) -> AppResult<()> {
        match to.kind() {
            IdentifierKind::Email => self.email_sender.send_code(to.as_str(), code).await,
            IdentifierKind::Phone => self.sms_sender.send_code(to.as_str(), code).await,
        }
    }
}
