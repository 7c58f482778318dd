//! zipper-auth - 账号注册与 OTP 验证服务

pub mod api;
pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
