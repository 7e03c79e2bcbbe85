use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderValue},
    web, Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;

use crate::auth::{AuthError, Authenticator, Principal};

/// Runs the configured authenticator against the request headers.
/// Shared by the auth and admin middlewares.
pub async fn authenticate_request(req: &ServiceRequest) -> Result<Principal, AuthError> {
    let authenticator = req
        .app_data::<web::Data<Authenticator>>()
        .cloned()
        .ok_or(AuthError::Misconfigured)?;

    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    authenticator.authenticate(authorization.as_deref()).await
}

/// Authenticated responses must never be cached by intermediaries.
pub fn mark_no_store<B>(res: &mut ServiceResponse<B>) {
    let headers = res.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(header::VARY, HeaderValue::from_static("Authorization"));
}

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let principal = authenticate_request(&req).await?;
            req.extensions_mut().insert(principal);

            let mut res = service.call(req).await?;
            mark_no_store(&mut res);
            Ok(res)
        })
    }
}
