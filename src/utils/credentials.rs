//! HTTP Basic 凭据解析

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::errors::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub email: String,
    pub password: String,
}

/// 解析 `Basic <base64(email:password)>`
///
/// 只在第一个 ':' 处切分，密码里可以包含 ':'。
pub fn parse_basic(raw: &str) -> Result<BasicCredentials> {
    let invalid = || AppError::missing_credential("Invalid or missing Basic credential");

    let (scheme, encoded) = raw.trim().split_once(' ').ok_or_else(invalid)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(invalid());
    }

    let decoded = STANDARD.decode(encoded.trim()).map_err(|_| invalid())?;
    let decoded = String::from_utf8(decoded).map_err(|_| invalid())?;

    let (email, password) = decoded.split_once(':').ok_or_else(invalid)?;
    if email.is_empty() {
        return Err(invalid());
    }

    Ok(BasicCredentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}
