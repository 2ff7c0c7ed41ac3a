use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::AUTHORIZATION,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{error, info, trace};

use crate::api::jwt::{Claims, JwtService};
use crate::api::services::helpers::error_from_app;
use crate::errors::AppError;
use crate::storage::Role;

const ALL_ROLES: &[Role] = &[Role::Admin, Role::Customer];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// 去掉 `Bearer ` 前缀（大小写不敏感），没有前缀时原样返回
pub fn strip_bearer(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
        _ => raw,
    }
}

/// 从 Authorization header 提取 Bearer token
pub fn bearer_from_header(headers: &actix_web::http::header::HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return None;
    }
    Some(token.trim().to_string())
}

/// Bearer token + 角色守卫
///
/// 验证通过后把 `Claims` 放进 request extensions，handler 用 `web::ReqData<Claims>` 取。
#[derive(Clone)]
pub struct BearerAuth {
    roles: &'static [Role],
    verified: Option<bool>,
}

impl BearerAuth {
    /// Admin 或 Customer
    pub fn any() -> Self {
        Self {
            roles: ALL_ROLES,
            verified: None,
        }
    }

    pub fn admin() -> Self {
        Self {
            roles: ADMIN_ONLY,
            verified: None,
        }
    }

    /// 额外要求 token 中的 verified 等于给定值
    pub fn with_verified(mut self, verified: bool) -> Self {
        self.verified = Some(verified);
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service: Rc::new(service),
            roles: self.roles,
            verified: self.verified,
        }))
    }
}

pub struct BearerAuthMiddleware<S> {
    service: Rc<S>,
    roles: &'static [Role],
    verified: Option<bool>,
}

impl<S> BearerAuthMiddleware<S> {
    fn check(&self, req: &ServiceRequest) -> Result<Claims, AppError> {
        let jwt = req
            .app_data::<web::Data<Arc<JwtService>>>()
            .ok_or_else(|| {
                error!("JwtService missing from app data");
                AppError::serialization("authentication is not configured")
            })?;

        let token = bearer_from_header(req.headers())
            .ok_or_else(|| AppError::unauthorized("Unauthorized: Invalid or missing token"))?;

        let claims = jwt.validate_access_token(&token).map_err(|e| {
            info!("Bearer token validation failed: {}", e);
            AppError::from(e)
        })?;

        if !self.roles.contains(&claims.role) {
            info!(
                "User {} with role {} refused on {}",
                claims.id,
                claims.role.as_ref(),
                req.path()
            );
            return Err(AppError::forbidden("Forbidden resource"));
        }

        if let Some(expected) = self.verified
            && claims.verified != expected
        {
            return Err(AppError::not_verified_only(if expected {
                "Account must be verified"
            } else {
                "Account already verified"
            }));
        }

        Ok(claims)
    }
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let checked = self.check(&req);

        Box::pin(async move {
            match checked {
                Ok(claims) => {
                    trace!("Bearer authentication successful for user {}", claims.id);
                    req.extensions_mut().insert(claims);
                    let response = srv.call(req).await?.map_into_left_body();
                    Ok(response)
                }
                Err(err) => {
                    let response = error_from_app(&err);
                    Ok(req.into_response(response.map_into_right_body()))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_bearer() {
        assert_eq!(strip_bearer("Bearer abc.def"), "abc.def");
        assert_eq!(strip_bearer("bearer  abc"), "abc");
        assert_eq!(strip_bearer("abc"), "abc");
    }

    #[test]
    fn test_bearer_from_header() {
        let mut headers = actix_web::http::header::HeaderMap::new();
        assert!(bearer_from_header(&headers).is_none());

        headers.insert(
            AUTHORIZATION,
            actix_web::http::header::HeaderValue::from_static("Basic xyz"),
        );
        assert!(bearer_from_header(&headers).is_none());

        headers.insert(
            AUTHORIZATION,
            actix_web::http::header::HeaderValue::from_static("Bearer tok"),
        );
        assert_eq!(bearer_from_header(&headers).as_deref(), Some("tok"));
    }
}
