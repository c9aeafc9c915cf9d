//! Service Authentication Middleware

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Middleware state: the secret shared with the token issuer
#[derive(Clone)]
pub struct ServiceAuth {
    pub token_secret: [u8; 32],
}

/// Middleware that requires a valid service bearer token.
///
/// Applied only to privileged routes; the token is issued by the login
/// endpoint for the single trusted backend account.
pub async fn require_service_token(
    axum::extract::State(auth): axum::extract::State<ServiceAuth>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let subject = token.and_then(|token| platform::token::verify(token, &auth.token_secret));

    match subject {
        Some(_) => Ok(next.run(req).await),
        None => {
            tracing::debug!("Rejected request without valid service token");
            Err((StatusCode::UNAUTHORIZED, ()).into_response())
        }
    }
}
