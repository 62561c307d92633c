use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::{
    extract::WithRejection,
    headers::{authorization::Basic, Authorization},
    TypedHeader,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginResponse, PublicUser, RegisterRequest},
        extractors::CurrentUser,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo_types::User,
    },
    db::is_unique_violation,
    error::{required, AppError, AppResult},
    response::ApiResponse,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<PublicUser>>)> {
    let name = required(payload.name, "name")?;
    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::bad_request("password is required"))?;

    let hash = hash_password(&password)?;

    let mut tx = state.writer.begin().await?;
    if User::find_by_name(&mut *tx, &name).await?.is_some() {
        warn!(name = %name, "name already registered");
        return Err(AppError::conflict("User already exists"));
    }
    let user = User::create(&mut *tx, &name, &hash, payload.admin)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("User already exists")
            } else {
                e.into()
            }
        })?;
    tx.commit().await?;

    info!(user_id = %user.public_id, name = %user.name, admin = user.admin, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Registered successfully", user.into())),
    ))
}

#[instrument(skip(state, credentials))]
pub async fn login(
    State(state): State<AppState>,
    credentials: Option<TypedHeader<Authorization<Basic>>>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let Some(TypedHeader(Authorization(basic))) = credentials else {
        warn!("login without basic credentials");
        return Err(AppError::unauthorized("Could not verify"));
    };

    let name = basic.username().trim();
    let user = match User::find_by_name(&state.db, name).await? {
        Some(u) => u,
        None => {
            warn!(name = %name, "login unknown user");
            return Err(AppError::unauthorized("Could not verify"));
        }
    };

    if !verify_password(basic.password(), &user.password_hash) {
        warn!(user_id = %user.public_id, "login invalid password");
        return Err(AppError::unauthorized("Could not verify"));
    }

    let token = JwtKeys::from_ref(&state).issue(&user.public_id)?;

    info!(user_id = %user.public_id, name = %user.name, "user logged in");
    Ok(Json(ApiResponse::new(
        "Login successful",
        LoginResponse {
            token,
            admin: user.admin,
        },
    )))
}

#[instrument(skip_all)]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<ApiResponse<PublicUser>> {
    Json(ApiResponse::new("Current user", user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_hides_internal_fields() {
        let user = User {
            id: 7,
            public_id: "pub-7".into(),
            name: "trinity".into(),
            password_hash: "secret-hash".into(),
            admin: false,
        };
        let json = serde_json::to_string(&PublicUser::from(user)).unwrap();
        assert!(json.contains("pub-7"));
        assert!(!json.contains("secret-hash"));
    }
}
