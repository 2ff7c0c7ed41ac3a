//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::AppError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 用户错误
/// - 4000-4099: 上传错误
/// - 5000-5099: 滑动错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    FileTooLarge = 1011,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenExpired = 2001,
    TokenInvalid = 2002,
    MissingCredential = 2003,
    NotVerifiedOnly = 2004,

    // 用户错误 3000-3099
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    PasswordHashError = 3004,
    UserDatabaseError = 3005,

    // 上传错误 4000-4099
    InvalidMultipartData = 4002,
    FileReadError = 4003,
    FileMissing = 4004,
    InvalidFileType = 4005,
    InvalidFileName = 4006,

    // 滑动错误 5000-5099
    SelfSwipe = 5000,
    SwipeTargetNotFound = 5001,
}

impl From<&AppError> for ErrorCode {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Validation(_) => ErrorCode::BadRequest,
            AppError::Unauthorized(_) => ErrorCode::Unauthorized,
            AppError::Forbidden(_) => ErrorCode::Forbidden,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::DatabaseConfig(_) | AppError::Serialization(_) => {
                ErrorCode::InternalServerError
            }
            AppError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            AppError::DatabaseOperation(_) => ErrorCode::UserDatabaseError,
            AppError::FileOperation(_) => ErrorCode::FileReadError,
            AppError::FileTooLarge(_) => ErrorCode::FileTooLarge,
            AppError::AuthFailed(_) => ErrorCode::AuthFailed,
            AppError::TokenExpired(_) => ErrorCode::TokenExpired,
            AppError::Token(_) => ErrorCode::TokenInvalid,
            AppError::MissingCredential(_) => ErrorCode::MissingCredential,
            AppError::NotVerifiedOnly(_) => ErrorCode::NotVerifiedOnly,
            AppError::UserNotFound(_) => ErrorCode::UserNotFound,
            AppError::UserAlreadyExists(_) => ErrorCode::UserAlreadyExists,
            AppError::PasswordHash(_) => ErrorCode::PasswordHashError,
            AppError::Upload(_) => ErrorCode::InvalidMultipartData,
            AppError::FileMissing(_) => ErrorCode::FileMissing,
            AppError::InvalidFileType(_) => ErrorCode::InvalidFileType,
            AppError::InvalidFileName(_) => ErrorCode::InvalidFileName,
            AppError::SelfSwipe(_) => ErrorCode::SelfSwipe,
            AppError::SwipeTargetNotFound(_) => ErrorCode::SwipeTargetNotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
        assert_eq!(
            serde_json::to_string(&ErrorCode::UserAlreadyExists).unwrap(),
            "3001"
        );
        let code: ErrorCode = serde_json::from_str("5001").unwrap();
        assert_eq!(code, ErrorCode::SwipeTargetNotFound);
    }

    #[test]
    fn test_from_app_error() {
        assert_eq!(
            ErrorCode::from(&AppError::user_already_exists("x")),
            ErrorCode::UserAlreadyExists
        );
        assert_eq!(
            ErrorCode::from(&AppError::token("x")),
            ErrorCode::TokenInvalid
        );
        assert_eq!(
            ErrorCode::from(&AppError::invalid_file_type("x")),
            ErrorCode::InvalidFileType
        );
    }
}
