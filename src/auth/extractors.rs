use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::{jwt::JwtKeys, repo_types::User};
use crate::{error::AppError, state::AppState};

/// Header carrying the access token. Deliberately not `Authorization`.
pub const TOKEN_HEADER: &str = "x-access-tokens";

/// Any holder of a valid token whose user still exists.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// A `CurrentUser` whose admin flag is set.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(TOKEN_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                warn!("request without access token");
                AppError::unauthorized("A valid token is missing")
            })?;

        let public_id = JwtKeys::from_ref(state).verify(token).map_err(|_| {
            warn!("invalid or expired token");
            AppError::unauthorized("Token is invalid")
        })?;

        let user = User::find_by_public_id(&state.db, &public_id)
            .await?
            .ok_or_else(|| {
                warn!(public_id = %public_id, "token for unknown user");
                AppError::unauthorized("User not found")
            })?;

        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.admin {
            warn!(user_id = %user.public_id, "admin route denied");
            return Err(AppError::forbidden(
                "You do not have permission to access this resource",
            ));
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    fn parts_with_token(token: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(t) = token {
            builder = builder.header(TOKEN_HEADER, t);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let state = AppState::in_memory().await;
        let mut parts = parts_with_token(None);
        let err = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "A valid token is missing");
    }

    #[tokio::test]
    async fn token_for_deleted_user_is_unauthorized() {
        let state = AppState::in_memory().await;
        let token = JwtKeys::from_ref(&state).issue("no-such-user").unwrap();
        let mut parts = parts_with_token(Some(&token));
        let err = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "User not found");
    }

    #[tokio::test]
    async fn valid_token_resolves_user() {
        let state = AppState::in_memory().await;
        let user = User::create(&state.db, "carol", "hash", false).await.unwrap();
        let token = JwtKeys::from_ref(&state).issue(&user.public_id).unwrap();

        let mut parts = parts_with_token(Some(&token));
        let CurrentUser(resolved) = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn admin_gate_checks_flag_after_authentication() {
        let state = AppState::in_memory().await;
        let keys = JwtKeys::from_ref(&state);
        let plain = User::create(&state.db, "dave", "hash", false).await.unwrap();
        let admin = User::create(&state.db, "erin", "hash", true).await.unwrap();

        let mut parts = parts_with_token(Some(&keys.issue(&plain.public_id).unwrap()));
        let err = AdminUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let mut parts = parts_with_token(Some("garbage"));
        let err = AdminUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let mut parts = parts_with_token(Some(&keys.issue(&admin.public_id).unwrap()));
        let AdminUser(resolved) = AdminUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(resolved.admin);
    }
}
