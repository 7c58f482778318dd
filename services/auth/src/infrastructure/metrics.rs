//! 账号业务指标

use metrics::counter;

/// 记录注册
pub fn record_signup(channel: &'static str) {
    counter!("account_signups_total", "channel" => channel).increment(1);
}

/// 记录登录尝试
pub fn record_login(success: bool) {
    counter!("account_logins_total", "success" => success.to_string()).increment(1);
}

/// 记录验证码投递
pub fn record_otp_delivery(channel: &'static str, success: bool) {
    counter!(
        "otp_deliveries_total",
        "channel" => channel,
        "success" => success.to_string()
    )
    .increment(1);
}
