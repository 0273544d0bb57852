use std::sync::Arc;

use auth::Claims;
use auth::SessionGuard;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

use crate::credential::models::CredentialId;
use crate::inbound::http::handlers::ApiError;

/// Response header carrying a replacement token when the presented one was close to expiry.
pub const RENEWED_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-renewed-token");

/// Extension type to store the authenticated session in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub credential_id: CredentialId,
    pub claims: Claims,
}

/// Middleware that validates bearer tokens, adds the session to request
/// extensions, and attaches a renewed token to the response when due.
pub async fn authorize_session(
    State(guard): State<Arc<SessionGuard>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = guard.authorize(bearer_token(&req)).map_err(|e| {
        tracing::warn!(kind = e.kind(), error = %e, "Session token rejected");
        ApiError::from(e)
    })?;

    let credential_id = CredentialId::from_string(&authorization.subject).map_err(|e| {
        tracing::warn!(error = %e, "Session token subject is not a credential id");
        ApiError::Forbidden("Invalid token".to_string())
    })?;

    req.extensions_mut().insert(AuthenticatedSession {
        credential_id,
        claims: authorization.claims,
    });

    let mut response = next.run(req).await;

    if let Some(renewed) = authorization.renewed {
        match HeaderValue::from_str(&renewed.token) {
            Ok(value) => {
                response.headers_mut().insert(RENEWED_TOKEN_HEADER, value);
            }
            Err(e) => tracing::warn!(error = %e, "Renewed token is not a valid header value"),
        }
    }

    Ok(response)
}

/// Token from `Authorization: Bearer <token>`; `None` for a missing, empty,
/// or non-bearer header. The scheme is matched case-insensitively.
fn bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use auth::ManualClock;
    use auth::SessionPolicy;
    use auth::TokenCodec;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::middleware;
    use axum::routing::get;
    use axum::Extension;
    use axum::Router;
    use chrono::Duration;
    use chrono::TimeZone;
    use chrono::Utc;
    use tower::ServiceExt;

    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    struct Harness {
        app: Router,
        codec: Arc<TokenCodec>,
        clock: Arc<ManualClock>,
    }

    fn harness() -> Harness {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        ));
        let codec = Arc::new(TokenCodec::with_clock(SECRET, clock.clone()));
        let guard = Arc::new(SessionGuard::new(codec.clone(), SessionPolicy::default()));

        let app = Router::new()
            .route(
                "/protected",
                get(|Extension(session): Extension<AuthenticatedSession>| async move {
                    session.credential_id.to_string()
                }),
            )
            .route_layer(middleware::from_fn_with_state(guard, authorize_session));

        Harness { app, codec, clock }
    }

    fn request(authorization: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/protected");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let h = harness();

        let response = h.app.oneshot(request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_unauthorized() {
        let h = harness();

        let response = h.app.oneshot(request(Some("Basic abc"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_is_forbidden() {
        let h = harness();

        let response = h
            .app
            .oneshot(request(Some("Bearer not.a.token")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_non_uuid_subject_is_forbidden() {
        let h = harness();
        let issued = h.codec.issue("user123", Duration::minutes(15)).unwrap();

        let response = h
            .app
            .oneshot(request(Some(&format!("Bearer {}", issued.token))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_valid_token_passes_without_renewal() {
        let h = harness();
        let id = CredentialId::new();
        let issued = h.codec.issue(&id.to_string(), Duration::minutes(15)).unwrap();

        let response = h
            .app
            .oneshot(request(Some(&format!("Bearer {}", issued.token))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(RENEWED_TOKEN_HEADER).is_none());
    }

    #[tokio::test]
    async fn test_bearer_scheme_is_case_insensitive() {
        let h = harness();
        let id = CredentialId::new();
        let issued = h.codec.issue(&id.to_string(), Duration::minutes(15)).unwrap();

        let response = h
            .app
            .oneshot(request(Some(&format!("bearer {}", issued.token))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_empty_bearer_token_is_unauthorized() {
        let h = harness();

        let response = h.app.oneshot(request(Some("Bearer   "))).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_near_expiry_token_gets_renewed_header() {
        let h = harness();
        let id = CredentialId::new();
        let issued = h.codec.issue(&id.to_string(), Duration::minutes(15)).unwrap();

        h.clock.advance(Duration::minutes(11));
        let response = h
            .app
            .oneshot(request(Some(&format!("Bearer {}", issued.token))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let renewed = response
            .headers()
            .get(RENEWED_TOKEN_HEADER)
            .expect("renewed token header")
            .to_str()
            .unwrap();
        let claims = h.codec.parse(renewed).unwrap();
        assert_eq!(claims.sub, id.to_string());
        assert!(claims.exp > issued.claims.exp);
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let h = harness();
        let issued = h
            .codec
            .issue(&CredentialId::new().to_string(), Duration::minutes(15))
            .unwrap();

        h.clock.advance(Duration::minutes(15) + Duration::seconds(1));
        let response = h
            .app
            .oneshot(request(Some(&format!("Bearer {}", issued.token))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(RENEWED_TOKEN_HEADER).is_none());
    }
}
