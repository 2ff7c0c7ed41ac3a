//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use tracing::error;

use crate::errors::AppError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 AppError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_app(err: &AppError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("{} {}", err.code(), err.format_simple());
    }
    error_response(status, ErrorCode::from(err), err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 AppError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<AppError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: AppError = e.into();
            error_from_app(&err)
        }
    }
}

/// JSON/Query 解析失败时也返回统一信封
pub fn payload_error_handler<E: std::fmt::Display>(err: E) -> actix_web::Error {
    let message = format!("Invalid payload: {}", err);
    actix_web::error::InternalError::from_response(
        message.clone(),
        error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message),
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_app_status() {
        let resp = error_from_app(&AppError::self_swipe("no"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = error_from_app(&AppError::database_operation("boom"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_api_result_ok() {
        let resp = api_result::<_, AppError>(Ok(42));
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
