//! 请求体提取器

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use tracing::debug;
use zipper_errors::AppError;

/// JSON 请求体
///
/// 与 `axum::Json` 相同，但解析失败时返回 Problem Details 格式的校验错误
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!(
                    status = %rejection.status(),
                    error = %rejection.body_text(),
                    "Rejected request body"
                );
                Err(AppError::validation(rejection_message(&rejection)))
            }
        }
    }
}

fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON".to_string(),
        _ => rejection.body_text(),
    }
}
