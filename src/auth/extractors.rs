use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;
use uuid::Uuid;

use crate::{auth::jwt::JwtKeys, error::AppError};

/// Verified identity of the caller, passed to every protected handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        authorize(&parts.headers, &keys).map(AuthUser)
    }
}

/// Absent or blank header is `MissingToken` (401); anything present that
/// does not verify is `InvalidToken` (400).
pub fn authorize(headers: &HeaderMap, keys: &JwtKeys) -> Result<Uuid, AppError> {
    let Some(raw) = headers.get(AUTHORIZATION) else {
        return Err(AppError::MissingToken);
    };
    if raw.as_bytes().iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::MissingToken);
    }

    let value = raw.to_str().map_err(|_| {
        warn!("authorization header is not valid ascii");
        AppError::InvalidToken
    })?;

    // Raw token is the native format; a Bearer prefix is tolerated.
    let value = value.trim();
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .unwrap_or(value)
        .trim();

    match keys.verify(token) {
        Ok(claims) => Ok(claims.sub),
        Err(e) => {
            warn!(error = %e, "invalid or expired token");
            Err(AppError::InvalidToken)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::http::{HeaderValue, Request};

    fn parts_with(header: Option<HeaderValue>) -> Parts {
        let mut req = Request::builder().uri("/api/projects");
        if let Some(v) = header {
            req = req.header(AUTHORIZATION, v);
        }
        req.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn no_header_is_access_denied() {
        let state = AppState::fake();
        let mut parts = parts_with(None);
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingToken));
    }

    #[tokio::test]
    async fn blank_header_is_access_denied() {
        let state = AppState::fake();
        let mut parts = parts_with(Some(HeaderValue::from_static("")));
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingToken));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let state = AppState::fake();
        let mut parts = parts_with(Some(HeaderValue::from_static("abc.def.ghi")));
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn non_ascii_header_is_invalid() {
        let state = AppState::fake();
        let value = HeaderValue::from_bytes(&[0xC3, 0xA9, b'x']).unwrap();
        let mut parts = parts_with(Some(value));
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn raw_and_bearer_tokens_are_accepted() {
        let state = AppState::fake();
        let user_id = Uuid::new_v4();
        let token = state.keys.sign(user_id).unwrap();

        let mut parts = parts_with(Some(HeaderValue::from_str(&token).unwrap()));
        let AuthUser(got) = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .expect("raw token");
        assert_eq!(got, user_id);

        let bearer = format!("Bearer {token}");
        let mut parts = parts_with(Some(HeaderValue::from_str(&bearer).unwrap()));
        let AuthUser(got) = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .expect("bearer token");
        assert_eq!(got, user_id);
    }
}
