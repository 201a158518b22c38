//! Bearer-token authentication gate.
//!
//! Every protected route passes through here. The revocation check runs
//! before signature/expiry verification, so a logged-out token is rejected
//! without being re-verified, and the two rejections stay distinguishable
//! to the client.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, HttpResponse,
};
use chrono::Utc;
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::{verify_access_token, SessionRegistry};
use crate::configuration::JwtSettings;

/// The verified token subject, injected into request extensions for
/// handlers behind the gate.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

impl AuthenticatedUser {
    pub fn username(&self) -> &str {
        &self.0
    }
}

/// Authentication gate for protected routes.
///
/// Extracts the bearer token from the Authorization header, rejects
/// revoked tokens, then validates signature and expiry.
pub struct AuthMiddleware {
    jwt_config: JwtSettings,
    registry: SessionRegistry,
}

impl AuthMiddleware {
    pub fn new(jwt_config: JwtSettings, registry: SessionRegistry) -> Self {
        Self {
            jwt_config,
            registry,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            jwt_config: self.jwt_config.clone(),
            registry: self.registry.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    jwt_config: JwtSettings,
    registry: SessionRegistry,
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
        let bearer_token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|token| token.to_string());

        let token = match bearer_token {
            Some(token) => token,
            None => {
                tracing::warn!("Missing or invalid Authorization header");
                let response = HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "Missing or invalid authorization header",
                    "code": "UNAUTHORIZED"
                }));
                return Box::pin(async move {
                    Err(actix_web::error::InternalError::from_response(
                        "Unauthorized",
                        response,
                    )
                    .into())
                });
            }
        };

        // Revocation first: a logged-out token stays rejected even while
        // its signature and expiry would still verify.
        if self.registry.is_revoked(&token) {
            tracing::warn!("Rejected revoked token");
            let response = HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Token has been logged out",
                "code": "TOKEN_REVOKED"
            }));
            return Box::pin(async move {
                Err(
                    actix_web::error::InternalError::from_response("Token revoked", response)
                        .into(),
                )
            });
        }

        match verify_access_token(&token, Utc::now(), &self.jwt_config) {
            Ok(claims) => {
                req.extensions_mut()
                    .insert(AuthenticatedUser(claims.sub.clone()));

                tracing::debug!(username = %claims.sub, "Token verified");

                let service = self.service.clone();
                Box::pin(async move { service.call(req).await })
            }
            Err(e) => {
                tracing::warn!("Token verification failed: {}", e);
                let response = HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "Invalid token",
                    "code": "TOKEN_INVALID"
                }));
                Box::pin(async move {
                    Err(
                        actix_web::error::InternalError::from_response("Invalid token", response)
                            .into(),
                    )
                })
            }
        }
    }
}
