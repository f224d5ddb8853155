use actix_web::{HttpResponse, Responder};

use crate::middleware::AuthenticatedUser;

/// Echo of the authenticated principal.
///
/// The extractor answers 401 when the request context holds no principal;
/// the middleware itself never rejects.
pub async fn current_identity(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(user.identity)
}
