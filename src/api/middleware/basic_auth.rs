//! HTTP Basic authentication for the admin surface
//!
//! Wraps `/translate` and `/api`. Credentials are injected at construction
//! time from `[admin]` configuration. An empty password disables the admin
//! surface entirely and every wrapped route answers 404.

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{AUTHORIZATION, CONTENT_TYPE, WWW_AUTHENTICATE},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, info, trace};

use crate::config::AdminConfig;

pub const BASIC_REALM: &str = "Basic realm=\"Admin Access\", charset=\"UTF-8\"";

/// Basic 认证失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// 没有 Authorization 头
    Missing,
    /// 不是 `Basic <base64>` 形式，或 base64 / UTF-8 解码失败
    Malformed,
    /// 用户名或密码不匹配
    BadCredentials,
}

impl AuthFailure {
    pub fn body(&self) -> &'static str {
        match self {
            AuthFailure::Missing => "Unauthorized",
            AuthFailure::Malformed => "Invalid authentication",
            AuthFailure::BadCredentials => "Invalid credentials",
        }
    }
}

/// 管理员凭据
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &AdminConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }

    pub fn is_enabled(&self) -> bool {
        !self.password.is_empty()
    }

    /// 常量时间比较用户名和密码
    fn matches(&self, username: &str, password: &str) -> bool {
        let user_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let pass_ok = self.password.as_bytes().ct_eq(password.as_bytes());
        (user_ok & pass_ok).into()
    }

    /// 校验 Authorization 头的值
    pub fn verify(&self, header: Option<&str>) -> Result<(), AuthFailure> {
        let header = header.ok_or(AuthFailure::Missing)?;

        let (scheme, encoded) = header
            .trim()
            .split_once(' ')
            .ok_or(AuthFailure::Malformed)?;
        let encoded = encoded.trim();
        if scheme != "Basic" || encoded.is_empty() {
            return Err(AuthFailure::Malformed);
        }

        let decoded = STANDARD
            .decode(encoded)
            .map_err(|_| AuthFailure::Malformed)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthFailure::Malformed)?;

        // 密码中允许出现 ':'
        let (username, password) = decoded.split_once(':').unwrap_or((decoded.as_str(), ""));

        if self.matches(username, password) {
            Ok(())
        } else {
            Err(AuthFailure::BadCredentials)
        }
    }
}

/// Basic authentication middleware
#[derive(Clone)]
pub struct BasicAuth {
    credentials: Arc<AdminCredentials>,
}

impl BasicAuth {
    pub fn new(credentials: AdminCredentials) -> Self {
        Self {
            credentials: Arc::new(credentials),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BasicAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BasicAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BasicAuthMiddleware {
            service: Rc::new(service),
            credentials: self.credentials.clone(),
        }))
    }
}

pub struct BasicAuthMiddleware<S> {
    service: Rc<S>,
    credentials: Arc<AdminCredentials>,
}

impl<S, B> BasicAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle requests when the admin password is not configured
    fn handle_disabled(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        debug!("Admin password not configured - returning 404");
        req.into_response(
            HttpResponse::NotFound()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .body("Not Found")
                .map_into_right_body(),
        )
    }

    fn handle_unauthorized(
        req: ServiceRequest,
        failure: AuthFailure,
    ) -> ServiceResponse<EitherBody<B>> {
        info!(
            "Admin authentication failed for {} {}: {:?}",
            req.method(),
            req.path(),
            failure
        );

        let mut builder = HttpResponse::Unauthorized();
        builder.insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"));
        if failure == AuthFailure::Missing {
            builder.insert_header((WWW_AUTHENTICATE, BASIC_REALM));
        }

        req.into_response(builder.body(failure.body()).map_into_right_body())
    }
}

impl<S, B> Service<ServiceRequest> for BasicAuthMiddleware<S>
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
        let credentials = self.credentials.clone();

        Box::pin(async move {
            if !credentials.is_enabled() {
                return Ok(Self::handle_disabled(req));
            }

            let header = req
                .headers()
                .get(AUTHORIZATION)
                .map(|h| h.to_str().unwrap_or_default().to_string());

            match credentials.verify(header.as_deref()) {
                Ok(()) => {
                    trace!("Basic authentication successful");
                    let response = srv.call(req).await?;
                    Ok(response.map_into_left_body())
                }
                Err(failure) => Ok(Self::handle_unauthorized(req, failure)),
            }
        })
    }
}
