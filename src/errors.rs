use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum AppError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    UserAlreadyExists(String),
    Token(String),
    PasswordHash(String),
    Serialization(String),
    Upload(String),
    AuthFailed(String),
    MissingCredential(String),
    TokenExpired(String),
    NotVerifiedOnly(String),
    UserNotFound(String),
    InvalidFileType(String),
    InvalidFileName(String),
    FileMissing(String),
    FileTooLarge(String),
    SelfSwipe(String),
    SwipeTargetNotFound(String),
}

impl AppError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DatabaseConfig(_) => "E001",
            AppError::DatabaseConnection(_) => "E002",
            AppError::DatabaseOperation(_) => "E003",
            AppError::FileOperation(_) => "E004",
            AppError::Validation(_) => "E005",
            AppError::NotFound(_) => "E006",
            AppError::Unauthorized(_) => "E007",
            AppError::Forbidden(_) => "E008",
            AppError::UserAlreadyExists(_) => "E009",
            AppError::Token(_) => "E010",
            AppError::PasswordHash(_) => "E011",
            AppError::Serialization(_) => "E012",
            AppError::Upload(_) => "E013",
            AppError::AuthFailed(_) => "E014",
            AppError::MissingCredential(_) => "E015",
            AppError::TokenExpired(_) => "E016",
            AppError::NotVerifiedOnly(_) => "E017",
            AppError::UserNotFound(_) => "E018",
            AppError::InvalidFileType(_) => "E019",
            AppError::InvalidFileName(_) => "E020",
            AppError::FileMissing(_) => "E021",
            AppError::FileTooLarge(_) => "E022",
            AppError::SelfSwipe(_) => "E023",
            AppError::SwipeTargetNotFound(_) => "E024",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::DatabaseConfig(_) => "Database Configuration Error",
            AppError::DatabaseConnection(_) => "Database Connection Error",
            AppError::DatabaseOperation(_) => "Database Operation Error",
            AppError::FileOperation(_) => "File Operation Error",
            AppError::Validation(_) => "Validation Error",
            AppError::NotFound(_) => "Resource Not Found",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Forbidden(_) => "Forbidden",
            AppError::UserAlreadyExists(_) => "User Already Exists",
            AppError::Token(_) => "Token Error",
            AppError::PasswordHash(_) => "Password Hash Error",
            AppError::Serialization(_) => "Serialization Error",
            AppError::Upload(_) => "Upload Error",
            AppError::AuthFailed(_) => "Authentication Failed",
            AppError::MissingCredential(_) => "Missing Credential",
            AppError::TokenExpired(_) => "Token Expired",
            AppError::NotVerifiedOnly(_) => "Already Verified",
            AppError::UserNotFound(_) => "User Not Found",
            AppError::InvalidFileType(_) => "Invalid File Type",
            AppError::InvalidFileName(_) => "Invalid File Name",
            AppError::FileMissing(_) => "File Missing",
            AppError::FileTooLarge(_) => "File Too Large",
            AppError::SelfSwipe(_) => "Self Swipe",
            AppError::SwipeTargetNotFound(_) => "Swipe Target Not Found",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            AppError::DatabaseConfig(msg)
            | AppError::DatabaseConnection(msg)
            | AppError::DatabaseOperation(msg)
            | AppError::FileOperation(msg)
            | AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::UserAlreadyExists(msg)
            | AppError::Token(msg)
            | AppError::PasswordHash(msg)
            | AppError::Serialization(msg)
            | AppError::Upload(msg)
            | AppError::AuthFailed(msg)
            | AppError::MissingCredential(msg)
            | AppError::TokenExpired(msg)
            | AppError::NotVerifiedOnly(msg)
            | AppError::UserNotFound(msg)
            | AppError::InvalidFileType(msg)
            | AppError::InvalidFileName(msg)
            | AppError::FileMissing(msg)
            | AppError::FileTooLarge(msg)
            | AppError::SelfSwipe(msg)
            | AppError::SwipeTargetNotFound(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    ///
    /// 重复邮箱沿用旧前端约定返回 401。
    pub fn http_status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::Upload(_)
            | AppError::InvalidFileType(_)
            | AppError::InvalidFileName(_)
            | AppError::SelfSwipe(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_)
            | AppError::UserNotFound(_)
            | AppError::FileMissing(_)
            | AppError::SwipeTargetNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_)
            | AppError::Token(_)
            | AppError::TokenExpired(_)
            | AppError::AuthFailed(_)
            | AppError::MissingCredential(_)
            | AppError::UserAlreadyExists(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) | AppError::NotVerifiedOnly(_) => StatusCode::FORBIDDEN,
            AppError::FileTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseConfig(_)
            | AppError::DatabaseOperation(_)
            | AppError::FileOperation(_)
            | AppError::PasswordHash(_)
            | AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AppError {}

// 便捷的构造函数
impl AppError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        AppError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        AppError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        AppError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        AppError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn user_already_exists<T: Into<String>>(msg: T) -> Self {
        AppError::UserAlreadyExists(msg.into())
    }

    pub fn token<T: Into<String>>(msg: T) -> Self {
        AppError::Token(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        AppError::PasswordHash(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        AppError::Serialization(msg.into())
    }

    pub fn upload<T: Into<String>>(msg: T) -> Self {
        AppError::Upload(msg.into())
    }

    pub fn auth_failed<T: Into<String>>(msg: T) -> Self {
        AppError::AuthFailed(msg.into())
    }

    pub fn missing_credential<T: Into<String>>(msg: T) -> Self {
        AppError::MissingCredential(msg.into())
    }

    pub fn token_expired<T: Into<String>>(msg: T) -> Self {
        AppError::TokenExpired(msg.into())
    }

    pub fn not_verified_only<T: Into<String>>(msg: T) -> Self {
        AppError::NotVerifiedOnly(msg.into())
    }

    pub fn user_not_found<T: Into<String>>(msg: T) -> Self {
        AppError::UserNotFound(msg.into())
    }

    pub fn invalid_file_type<T: Into<String>>(msg: T) -> Self {
        AppError::InvalidFileType(msg.into())
    }

    pub fn invalid_file_name<T: Into<String>>(msg: T) -> Self {
        AppError::InvalidFileName(msg.into())
    }

    pub fn file_missing<T: Into<String>>(msg: T) -> Self {
        AppError::FileMissing(msg.into())
    }

    pub fn file_too_large<T: Into<String>>(msg: T) -> Self {
        AppError::FileTooLarge(msg.into())
    }

    pub fn self_swipe<T: Into<String>>(msg: T) -> Self {
        AppError::SelfSwipe(msg.into())
    }

    pub fn swipe_target_not_found<T: Into<String>>(msg: T) -> Self {
        AppError::SwipeTargetNotFound(msg.into())
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired("token expiré".to_string()),
            _ => AppError::Token("token invalide".to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
