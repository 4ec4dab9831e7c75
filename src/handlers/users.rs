// src/handlers/users.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{Role, User},
};

fn ensure_admin(user: &User) -> Result<(), AppError> {
    if user.role != Role::Admin {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[schema(example = "Maria da Silva")]
    pub name: Option<String>,
    #[schema(example = "maria@pingdesk.com")]
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    // A senha só é trocada quando fornecida.
    pub password: Option<String>,
    pub role: Option<Role>,
}

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Lista de usuários (sem hashes de senha)", body = Vec<User>),
        (status = 403, description = "Apenas admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    ensure_admin(&user)?;

    let users = app_state.auth_service.list_users();
    Ok((StatusCode::OK, Json(users)))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 400, description = "Campos obrigatórios ausentes"),
        (status = 403, description = "Apenas admin"),
        (status = 409, description = "E-mail já está em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    ensure_admin(&user)?;

    let (Some(name), Some(email), Some(password), Some(role)) =
        (payload.name, payload.email, payload.password, payload.role)
    else {
        return Err(AppError::MissingFields("name, email, password, role"));
    };

    let created = app_state
        .auth_service
        .create_user(&name, &email, &password, role)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Usuário atualizado", body = User),
        (status = 400, description = "Campos obrigatórios ausentes"),
        (status = 403, description = "Apenas admin"),
        (status = 404, description = "Usuário não encontrado"),
        (status = 409, description = "E-mail já está em uso")
    ),
    params(
        ("id" = u64, Path, description = "ID do usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<u64>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    ensure_admin(&user)?;

    let (Some(name), Some(email), Some(role)) = (payload.name, payload.email, payload.role) else {
        return Err(AppError::MissingFields("name, email, role"));
    };

    let updated = app_state
        .auth_service
        .update_user(id, &name, &email, payload.password.as_deref(), role)
        .await?;

    Ok((StatusCode::OK, Json(updated)))
}

// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário excluído"),
        (status = 400, description = "Admin não pode excluir a si mesmo"),
        (status = 403, description = "Apenas admin"),
        (status = 404, description = "Usuário não encontrado")
    ),
    params(
        ("id" = u64, Path, description = "ID do usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    ensure_admin(&user)?;

    app_state.auth_service.delete_user(id, user.id)?;

    Ok((StatusCode::OK, Json(json!({ "message": "Usuário excluído com sucesso" }))))
}
