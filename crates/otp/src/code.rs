//! 验证码生成

use rand::Rng;

/// 验证码位数
pub const CODE_LENGTH: usize = 6;

/// 生成6位数字验证码（000000-999999，补零）
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    format!("{:06}", rng.gen_range(0..1_000_000))
}

/// 是否为合法格式的验证码
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_are_six_digits() {
        for _ in 0..1000 {
            let code = generate_code();
            assert!(is_well_formed(&code), "unexpected code {code}");
        }
    }

    #[test]
    fn test_is_well_formed() {
        assert!(is_well_formed("000000"));
        assert!(is_well_formed("482913"));
        assert!(!is_well_formed("12345"));
        assert!(!is_well_formed("1234567"));
        assert!(!is_well_formed("12a456"));
    }
}
