//! Per-IP rate limiting middleware
//!
//! Runs before routing, so every route (redirects included) counts toward
//! the client's window.

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{CONTENT_TYPE, RETRY_AFTER},
};
use chrono::Utc;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::info;

use crate::services::RateLimiter;
use crate::utils::ClientIpResolver;

#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<RateLimiter>,
    resolver: Arc<ClientIpResolver>,
}

impl RateLimit {
    pub fn new(limiter: Arc<RateLimiter>, resolver: ClientIpResolver) -> Self {
        Self {
            limiter,
            resolver: Arc::new(resolver),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            resolver: self.resolver.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<RateLimiter>,
    resolver: Arc<ClientIpResolver>,
}

impl<S, B> RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    fn handle_limited(req: ServiceRequest, retry_after: u64) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::TooManyRequests()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .insert_header((RETRY_AFTER, retry_after.to_string()))
                .body("Too Many Requests")
                .map_into_right_body(),
        )
    }
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let client_ip = self.resolver.resolve(req.headers(), req.peer_addr());
        let allowed = self.limiter.allow(&client_ip, Utc::now());
        let retry_after = self.limiter.window_size_seconds();

        Box::pin(async move {
            if !allowed {
                info!("Rate limited {} on {} {}", client_ip, req.method(), req.path());
                return Ok(Self::handle_limited(req, retry_after));
            }

            let response = srv.call(req).await?;
            Ok(response.map_into_left_body())
        })
    }
}
