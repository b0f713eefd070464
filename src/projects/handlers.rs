use axum::{
    extract::{Path, State},
    routing::{delete, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{dto::MessageResponse, extractors::AuthUser},
    error::AppError,
    projects::{
        dto::CreateProjectRequest,
        repo_types::Project,
        services::{create_project, delete_project, list_projects},
    },
    state::AppState,
};

pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", post(create).get(list))
        .route("/projects/:id", delete(remove))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<Json<Project>, AppError> {
    let project = create_project(&state, user_id, payload).await?;
    Ok(Json(project))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Project>>, AppError> {
    Ok(Json(list_projects(&state, user_id).await?))
}

// Always answers with the same message, whether or not a row was removed.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    delete_project(&state, user_id, &id).await?;
    Ok(Json(MessageResponse::new("Project deleted")))
}
