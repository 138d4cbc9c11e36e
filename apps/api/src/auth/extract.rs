//! Request extractors that resolve the bearer session into a `Principal`.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use chrono::Utc;

use crate::auth::models::Principal;
use crate::auth::session::load_session;
use crate::errors::AppError;
use crate::state::AppState;

/// Any signed-in caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub principal: Principal,
    pub token: String,
}

/// A signed-in caller carrying the admin role claim.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Principal);

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let session = load_session(state.kv.as_ref(), token, Utc::now())
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthUser {
            principal: session.principal,
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser { principal, .. } = AuthUser::from_request_parts(parts, state).await?;
        if !principal.is_admin() {
            return Err(AppError::Forbidden);
        }
        Ok(AdminUser(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc123")), Some("abc123"));
        assert_eq!(bearer_token(&headers("bearer abc123")), Some("abc123"));
        assert_eq!(bearer_token(&headers("Basic abc123")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
