use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, ResponseError,
};
use base64::prelude::*;
use futures_util::future::LocalBoxFuture;
use log::warn;
use sqlx::SqlitePool;

use crate::{db, errors::AppError, utils};

/// Identity attached to request extensions after a successful Basic
/// Authentication handshake.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
}

/// Split a `Basic <base64>` header value into username and password. The
/// password may itself contain colons; only the first one separates.
pub fn parse_basic_auth(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64_STANDARD.decode(encoded.trim().as_bytes()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Global authentication gate. Every route, including the fallback 404
/// handler, sits behind this middleware.
pub struct BasicAuth {
    pool: SqlitePool,
}

impl BasicAuth {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BasicAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
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
            pool: self.pool.clone(),
        }))
    }
}

pub struct BasicAuthMiddleware<S> {
    service: Rc<S>,
    pool: SqlitePool,
}

impl<S, B> Service<ServiceRequest> for BasicAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let pool = self.pool.clone();

        Box::pin(async move {
            let header = match req.headers().get("Authorization") {
                Some(value) => value.to_str().ok().map(str::to_string),
                None => {
                    warn!(
                        "Rejected {} {}: missing Authorization header",
                        req.method(),
                        req.path()
                    );
                    return Ok(reject(req, AppError::MissingAuthorization));
                }
            };

            let Some((username, password)) = header.as_deref().and_then(parse_basic_auth) else {
                warn!(
                    "Rejected {} {}: malformed Basic credentials",
                    req.method(),
                    req.path()
                );
                return Ok(reject(req, AppError::InvalidCredentials));
            };

            let user = match db::find_user_by_username(&pool, &username).await {
                Ok(user) => user,
                Err(e) => {
                    log::error!("Credential lookup failed for {}: {}", username, e);
                    return Ok(reject(req, AppError::AuthStorage));
                }
            };

            match user {
                Some(user) if utils::verify_password(&password, &user.pwd_hash) => {
                    req.extensions_mut().insert(AuthenticatedUser {
                        id: user.id,
                        username: user.username,
                    });
                    service.call(req).await.map(|res| res.map_into_left_body())
                }
                // Unknown user and wrong password answer identically.
                _ => {
                    warn!("Rejected {} {}: invalid credentials", req.method(), req.path());
                    Ok(reject(req, AppError::InvalidCredentials))
                }
            }
        })
    }
}

fn reject<B>(req: ServiceRequest, err: AppError) -> ServiceResponse<EitherBody<B>> {
    let response = err.error_response();
    req.into_response(response).map_into_right_body()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_header() {
        // base64("user:pass")
        let (username, password) = parse_basic_auth("Basic dXNlcjpwYXNz").unwrap();
        assert_eq!(username, "user");
        assert_eq!(password, "pass");
    }

    #[test]
    fn keeps_colons_inside_password() {
        // base64("admin:p@ss:word")
        let (username, password) = parse_basic_auth("Basic YWRtaW46cEBzczp3b3Jk").unwrap();
        assert_eq!(username, "admin");
        assert_eq!(password, "p@ss:word");
    }

    #[test]
    fn rejects_missing_scheme() {
        assert!(parse_basic_auth("dXNlcjpwYXNz").is_none());
        assert!(parse_basic_auth("Bearer dXNlcjpwYXNz").is_none());
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(parse_basic_auth("Basic !!invalid!!").is_none());
    }

    #[test]
    fn rejects_credentials_without_colon() {
        // base64("userpass")
        assert!(parse_basic_auth("Basic dXNlcnBhc3M=").is_none());
    }
}
