//! Rate limiting middleware for the auth scope.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;

use storefront_infra::IpRateLimiter;
use storefront_shared::response::{ApiResponse, CODE_RATE_LIMITED};

/// Rate limiting middleware factory, keyed on client IP.
pub struct RateLimitMiddleware {
    limiter: Arc<IpRateLimiter>,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<IpRateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service,
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: S,
    limiter: Arc<IpRateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let key = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();

        // The governor check is synchronous, so we can decide before
        // touching the inner service.
        let decision = self.limiter.check(&key);

        if !decision.allowed {
            tracing::warn!(client = %key, "Rate limit exceeded");

            let retry_secs = decision.retry_after.as_secs().max(1);
            let body = ApiResponse::error(
                CODE_RATE_LIMITED,
                format!("Too many requests. Try again in {retry_secs} seconds."),
            );
            let response = HttpResponse::TooManyRequests()
                .insert_header(("Retry-After", retry_secs.to_string()))
                .json(body);

            let (http_req, _payload) = req.into_parts();
            let srv_response = ServiceResponse::new(http_req, response);

            return Box::pin(async move { Ok(srv_response.map_into_right_body()) });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};
    use serde_json::Value;
    use std::time::Duration;

    use storefront_infra::RateLimitConfig;

    async fn ping() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn over_quota_request_gets_429_envelope() {
        let limiter = Arc::new(IpRateLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_secs(60),
        }));

        let app = test::init_service(
            App::new().service(
                web::scope("/auth")
                    .wrap(RateLimitMiddleware::new(limiter))
                    .route("/ping", web::get().to(ping)),
            ),
        )
        .await;

        let first = test::TestRequest::get().uri("/auth/ping").to_request();
        let resp = test::call_service(&app, first).await;
        assert_eq!(resp.status(), 200);

        let second = test::TestRequest::get().uri("/auth/ping").to_request();
        let resp = test::call_service(&app, second).await;
        assert_eq!(resp.status(), 429);

        let retry_after: u64 = resp
            .headers()
            .get("Retry-After")
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!(retry_after >= 1);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "RATE_LIMITED");
    }
}
