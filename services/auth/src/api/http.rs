//! HTTP 接口
//!
//! 请求字段均为可选，缺失字段交由应用层返回统一的校验错误

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use zipper_common::UserId;
use zipper_errors::AppResult;

use super::JsonBody;
use crate::application::{
    AccountService, LoginCommand, LoginResult, ResendOtpCommand, SignupCommand, VerifyOtpCommand,
};
use crate::domain::Role;

pub fn routes(service: Arc<AccountService>) -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/verify-otp", post(verify_otp))
        .route("/resend-otp", post(resend_otp))
        .route("/login", post(login))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: Option<String>,
    pub identifier: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub bus_company: Option<String>,
    #[serde(alias = "handlerName")]
    pub account_manager: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub message: String,
    pub identifier: String,
    pub expires_in: i64,
}

async fn signup(
    State(service): State<Arc<AccountService>>,
    JsonBody(req): JsonBody<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    let result = service
        .signup(SignupCommand {
            name: req.name.unwrap_or_default(),
            identifier: req.identifier.unwrap_or_default(),
            password: req.password.unwrap_or_default(),
            role: req.role.unwrap_or_default(),
            bus_company: req.bus_company,
            account_manager: req.account_manager,
        })
        .await?;

    Ok(Json(SignupResponse {
        message: "OTP sent, please verify your account.".to_string(),
        identifier: result.identifier.into(),
        expires_in: result.expires_in,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyOtpRequest {
    pub identifier: Option<String>,
    #[serde(alias = "otp")]
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub message: String,
    pub role: Role,
    pub user_id: UserId,
}

async fn verify_otp(
    State(service): State<Arc<AccountService>>,
    JsonBody(req): JsonBody<VerifyOtpRequest>,
) -> AppResult<Json<VerifyOtpResponse>> {
    let result = service
        .verify_otp(VerifyOtpCommand {
            identifier: req.identifier.unwrap_or_default(),
            code: req.code.unwrap_or_default(),
        })
        .await?;

    Ok(Json(VerifyOtpResponse {
        message: "Account verified successfully".to_string(),
        role: result.role,
        user_id: result.user_id,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ResendOtpRequest {
    pub identifier: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendOtpResponse {
    pub message: String,
    pub expires_in: i64,
}

async fn resend_otp(
    State(service): State<Arc<AccountService>>,
    JsonBody(req): JsonBody<ResendOtpRequest>,
) -> AppResult<Json<ResendOtpResponse>> {
    let expires_in = service
        .resend_otp(ResendOtpCommand {
            identifier: req.identifier.unwrap_or_default(),
        })
        .await?;

    Ok(Json(ResendOtpResponse {
        message: "OTP resent successfully".to_string(),
        expires_in,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub identifier: Option<String>,
    pub password: Option<String>,
}

async fn login(
    State(service): State<Arc<AccountService>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AppResult<Json<LoginResult>> {
    let result = service
        .login(LoginCommand {
            identifier: req.identifier.unwrap_or_default(),
            password: req.password.unwrap_or_default(),
        })
        .await?;

    Ok(Json(result))
}
