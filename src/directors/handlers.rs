use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use tracing::{info, instrument, warn};

use crate::{
    auth::{AdminUser, CurrentUser},
    db::is_unique_violation,
    directors::{
        dto::{CreateDirectorRequest, DeletedMovies, UpdateDirectorRequest},
        repo,
        repo_types::Director,
    },
    error::{required, AppError, AppResult},
    movies::{repo as movies, repo_types::MovieDetails},
    response::ApiResponse,
    state::AppState,
};

type Id = WithRejection<Path<i64>, AppError>;
type Body<T> = WithRejection<Json<T>, AppError>;

pub fn director_routes() -> Router<AppState> {
    Router::new()
        .route("/Director", get(list_directors).post(create_director))
        .route(
            "/Director/:id",
            get(get_director)
                .put(update_director)
                .delete(delete_director),
        )
        .route(
            "/Director/:id/Movies",
            get(list_director_movies).delete(delete_director_movies),
        )
}

fn not_found() -> AppError {
    AppError::not_found("Director not found")
}

fn name_conflict(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        AppError::conflict("Director already exists")
    } else {
        e.into()
    }
}

#[instrument(skip_all)]
pub async fn list_directors(
    _user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Director>>>> {
    let directors = repo::list(&state.db).await?;
    Ok(Json(ApiResponse::new("Directors retrieved", directors)))
}

#[instrument(skip(_user, state))]
pub async fn get_director(
    _user: CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(id), _): Id,
) -> AppResult<Json<ApiResponse<Director>>> {
    let director = repo::find_by_id(&state.db, id).await?.ok_or_else(not_found)?;
    Ok(Json(ApiResponse::new("Director retrieved", director)))
}

#[instrument(skip(admin, state, payload), fields(user_id = %admin.0.public_id))]
pub async fn create_director(
    admin: AdminUser,
    State(state): State<AppState>,
    WithRejection(Json(payload), _): Body<CreateDirectorRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Director>>)> {
    let name = required(payload.name, "Director name")?;

    let mut tx = state.writer.begin().await?;
    if repo::name_taken(&mut *tx, &name).await? {
        warn!(name = %name, "director already exists");
        return Err(AppError::conflict("Director already exists"));
    }
    let director = repo::insert(&mut *tx, &name).await.map_err(name_conflict)?;
    tx.commit().await?;

    info!(director_id = director.id, name = %director.name, "director created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Director added successfully", director)),
    ))
}

#[instrument(skip(admin, state, payload), fields(user_id = %admin.0.public_id))]
pub async fn update_director(
    admin: AdminUser,
    State(state): State<AppState>,
    WithRejection(Path(id), _): Id,
    WithRejection(Json(payload), _): Body<UpdateDirectorRequest>,
) -> AppResult<Json<ApiResponse<Director>>> {
    let mut tx = state.writer.begin().await?;
    let current = repo::find_by_id(&mut *tx, id).await?.ok_or_else(not_found)?;

    let director = match payload.name {
        None => current,
        Some(name) => {
            let name = required(Some(name), "Director name")?;
            if name == current.name {
                current
            } else {
                if repo::name_taken(&mut *tx, &name).await? {
                    return Err(AppError::conflict("Director already exists"));
                }
                repo::rename(&mut *tx, id, &name).await.map_err(name_conflict)?
            }
        }
    };
    tx.commit().await?;

    info!(director_id = director.id, name = %director.name, "director updated");
    Ok(Json(ApiResponse::new(
        "Director updated successfully!",
        director,
    )))
}

/// Cascades: the director's movies are removed in the same transaction.
#[instrument(skip(admin, state), fields(user_id = %admin.0.public_id))]
pub async fn delete_director(
    admin: AdminUser,
    State(state): State<AppState>,
    WithRejection(Path(id), _): Id,
) -> AppResult<Json<ApiResponse<DeletedMovies>>> {
    let mut tx = state.writer.begin().await?;
    repo::find_by_id(&mut *tx, id).await?.ok_or_else(not_found)?;
    let deleted_movies = repo::delete_with_movies(&mut tx, id).await?;
    tx.commit().await?;

    info!(director_id = id, deleted_movies, "director deleted");
    let message = if deleted_movies > 0 {
        "Director had movies; director and movies deleted"
    } else {
        "Director deleted successfully!"
    };
    Ok(Json(ApiResponse::new(message, DeletedMovies { deleted_movies })))
}

#[instrument(skip(_user, state))]
pub async fn list_director_movies(
    _user: CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(id), _): Id,
) -> AppResult<Json<ApiResponse<Vec<MovieDetails>>>> {
    let mut conn = state.db.acquire().await?;
    repo::find_by_id(&mut *conn, id).await?.ok_or_else(not_found)?;
    let list = movies::list_by_director(&mut *conn, id).await?;
    Ok(Json(ApiResponse::new("Movies retrieved", list)))
}

#[instrument(skip(admin, state), fields(user_id = %admin.0.public_id))]
pub async fn delete_director_movies(
    admin: AdminUser,
    State(state): State<AppState>,
    WithRejection(Path(id), _): Id,
) -> AppResult<Json<ApiResponse<DeletedMovies>>> {
    let mut tx = state.writer.begin().await?;
    repo::find_by_id(&mut *tx, id).await?.ok_or_else(not_found)?;
    let deleted_movies = movies::delete_by_director(&mut *tx, id).await?;
    tx.commit().await?;

    info!(director_id = id, deleted_movies, "director's movies deleted");
    Ok(Json(ApiResponse::new(
        "Movies deleted successfully!",
        DeletedMovies { deleted_movies },
    )))
}
