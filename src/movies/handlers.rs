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
    directors::repo as directors,
    error::{required, AppError, AppResult},
    movies::{
        dto::{CreateMovieRequest, UpdateMovieRequest},
        repo,
        repo_types::{Movie, MovieDetails},
    },
    response::ApiResponse,
    state::AppState,
};

type Id = WithRejection<Path<i64>, AppError>;
type Body<T> = WithRejection<Json<T>, AppError>;

pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/Movie", get(list_movies).post(create_movie))
        .route(
            "/Movie/:id",
            get(get_movie).put(update_movie).delete(delete_movie),
        )
}

fn not_found() -> AppError {
    AppError::not_found("Movie not found")
}

fn director_not_found() -> AppError {
    AppError::not_found("Director not found")
}

fn title_conflict(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        AppError::conflict("Movie already exists")
    } else {
        e.into()
    }
}

#[instrument(skip_all)]
pub async fn list_movies(
    _user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<MovieDetails>>>> {
    let movies = repo::list(&state.db).await?;
    Ok(Json(ApiResponse::new("Movies retrieved", movies)))
}

#[instrument(skip(_user, state))]
pub async fn get_movie(
    _user: CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(id), _): Id,
) -> AppResult<Json<ApiResponse<MovieDetails>>> {
    let movie = repo::find_details(&state.db, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(ApiResponse::new("Movie retrieved", movie)))
}

#[instrument(skip(admin, state, payload), fields(user_id = %admin.0.public_id))]
pub async fn create_movie(
    admin: AdminUser,
    State(state): State<AppState>,
    WithRejection(Json(payload), _): Body<CreateMovieRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Movie>>)> {
    let title = required(payload.title, "Movie title")?;
    let director_id = payload
        .director_id
        .ok_or_else(|| AppError::bad_request("director_id is required"))?;

    let mut tx = state.writer.begin().await?;
    directors::find_by_id(&mut *tx, director_id)
        .await?
        .ok_or_else(director_not_found)?;
    if repo::title_taken(&mut *tx, &title).await? {
        warn!(title = %title, "movie already exists");
        return Err(AppError::conflict("Movie already exists"));
    }
    let movie = repo::insert(&mut *tx, &title, director_id)
        .await
        .map_err(title_conflict)?;
    tx.commit().await?;

    info!(movie_id = movie.id, director_id, title = %movie.title, "movie created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Movie added successfully", movie)),
    ))
}

/// Nothing is written unless every supplied field checks out.
#[instrument(skip(admin, state, payload), fields(user_id = %admin.0.public_id))]
pub async fn update_movie(
    admin: AdminUser,
    State(state): State<AppState>,
    WithRejection(Path(id), _): Id,
    WithRejection(Json(payload), _): Body<UpdateMovieRequest>,
) -> AppResult<Json<ApiResponse<Movie>>> {
    let mut tx = state.writer.begin().await?;
    let current = repo::find_by_id(&mut *tx, id).await?.ok_or_else(not_found)?;
    let mut next = current.clone();

    if let Some(title) = payload.title {
        next.title = required(Some(title), "Movie title")?;
    }
    if let Some(director_id) = payload.director_id {
        directors::find_by_id(&mut *tx, director_id)
            .await?
            .ok_or_else(|| {
                warn!(movie_id = id, director_id, "update to unknown director");
                director_not_found()
            })?;
        next.director_id = director_id;
    }
    if next.title != current.title && repo::title_taken(&mut *tx, &next.title).await? {
        return Err(AppError::conflict("Movie already exists"));
    }

    let movie = if next == current {
        current
    } else {
        repo::update(&mut *tx, &next).await.map_err(title_conflict)?
    };
    tx.commit().await?;

    info!(movie_id = movie.id, director_id = movie.director_id, "movie updated");
    Ok(Json(ApiResponse::new("Movie updated successfully!", movie)))
}

#[instrument(skip(admin, state), fields(user_id = %admin.0.public_id))]
pub async fn delete_movie(
    admin: AdminUser,
    State(state): State<AppState>,
    WithRejection(Path(id), _): Id,
) -> AppResult<Json<ApiResponse<()>>> {
    let mut tx = state.writer.begin().await?;
    repo::find_by_id(&mut *tx, id).await?.ok_or_else(not_found)?;
    repo::delete(&mut *tx, id).await?;
    tx.commit().await?;

    info!(movie_id = id, "movie deleted");
    Ok(Json(ApiResponse::message("Movie deleted successfully!")))
}
