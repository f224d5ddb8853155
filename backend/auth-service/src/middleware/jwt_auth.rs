/// JWT authentication middleware.
///
/// Runs once per inbound request: discovers a bearer token, validates it,
/// and installs the verified identity into the request extensions. It never
/// rejects a request itself; an empty context is the sole signal to
/// downstream policy that authentication did not succeed.
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::error::AppError;
use crate::models::Identity;
use crate::security::jwt;

/// The authenticated principal installed for the rest of request processing.
///
/// Carries the identity and its authority set; there is no credentials slot,
/// token-based auth carries no password.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub identity: Identity,
}

impl AuthenticatedUser {
    pub fn username(&self) -> &str {
        &self.identity.username
    }

    pub fn authorities(&self) -> &[String] {
        &self.identity.authorities
    }
}

/// Per-request authentication result, consumed by the middleware to decide
/// pass-through. Every variant forwards the request; only `Authenticated`
/// populates the context.
#[derive(Debug)]
pub enum AuthenticationOutcome {
    /// No token in the Authorization header or `token` query parameter.
    NoToken,
    /// A token was present but failed parsing or validation.
    InvalidToken,
    /// The token named a live, consistent identity.
    Authenticated(AuthenticatedUser),
}

/// Locate a token on the request: `Authorization: Bearer <token>` header
/// first, `token` query parameter as fallback. Header wins when both are
/// present.
fn find_token(req: &ServiceRequest) -> Option<String> {
    let header_token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned);

    header_token.or_else(|| query_token(req.query_string()))
}

fn query_token(query: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key != "token" {
            return None;
        }
        Some(
            urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_owned()),
        )
    })
}

/// Resolve a discovered token into an [`AuthenticationOutcome`].
///
/// All token failures are swallowed here: they are logged at debug level and
/// downgraded to `InvalidToken`, never surfaced to the caller.
pub fn authenticate(token: Option<&str>) -> AuthenticationOutcome {
    let token = match token {
        Some(token) => token,
        None => return AuthenticationOutcome::NoToken,
    };

    let claims = match jwt::parse(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(error = %err, "rejected bearer token");
            return AuthenticationOutcome::InvalidToken;
        }
    };

    let identity = claims.user.clone();
    if let Err(err) = jwt::check(&claims, &identity) {
        tracing::debug!(error = %err, "token failed validation");
        return AuthenticationOutcome::InvalidToken;
    }

    AuthenticationOutcome::Authenticated(AuthenticatedUser { identity })
}

/// JWT authentication middleware factory.
pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
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
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            // Read everything needed from the request before touching
            // extensions_mut(); no immutable borrow may be live at that point.
            let token = find_token(&req);

            if let AuthenticationOutcome::Authenticated(user) = authenticate(token.as_deref()) {
                // Idempotency guard: an upstream stage may already have
                // installed a principal; it is never overwritten.
                let occupied = req.extensions().get::<AuthenticatedUser>().is_some();
                if !occupied {
                    req.extensions_mut().insert(user);
                }
            }

            service.call(req).await
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => ready(Err(
                AppError::Authentication("authentication required".to_string()).into(),
            )),
        }
    }
}
