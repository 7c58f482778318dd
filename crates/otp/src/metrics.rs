//! OTP 指标

use metrics::counter;

use crate::{IdentifierKind, VerifyOutcome};

/// 记录签发
pub fn record_issued(kind: IdentifierKind, replaced: bool) {
    counter!(
        "otp_issued_total",
        "channel" => kind.as_str(),
        "replaced" => replaced.to_string()
    )
    .increment(1);
}

/// 记录校验结果
pub fn record_verification(outcome: VerifyOutcome) {
    counter!("otp_verifications_total", "outcome" => outcome.as_str()).increment(1);
}
