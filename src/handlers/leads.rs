// src/handlers/leads.rs

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
    models::{
        auth::{Role, User},
        crm::{Lead, NewLead},
    },
    services::access,
};

fn ensure_salesperson(user: &User) -> Result<(), AppError> {
    if user.role != Role::Salesperson {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

// Todos os campos do lead são opcionais; a qualificação vem depois.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    #[schema(example = "NetFibra")]
    pub provider: Option<String>,
    pub contact: Option<String>,
    pub website: Option<String>,
    #[schema(example = "SP")]
    pub state: Option<String>,
}

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    responses(
        (status = 200, description = "Leads visíveis ao chamador", body = Vec<Lead>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let leads = app_state.lead_service.list_visible(user.role, user.id);
    Ok((StatusCode::OK, Json(leads)))
}

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead criado", body = Lead),
        (status = 403, description = "Apenas vendedores criam leads")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    ensure_salesperson(&user)?;

    let lead = app_state.lead_service.create(NewLead {
        provider: payload.provider,
        contact: payload.contact,
        website: payload.website,
        state: payload.state,
        salesperson_id: user.id,
    });

    Ok((StatusCode::CREATED, Json(lead)))
}

// DELETE /api/leads/{id}
#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    tag = "Leads",
    responses(
        (status = 200, description = "Lead excluído"),
        (status = 403, description = "Apenas o vendedor dono"),
        (status = 404, description = "Lead não encontrado")
    ),
    params(
        ("id" = u64, Path, description = "ID do lead")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    ensure_salesperson(&user)?;

    let lead = app_state.lead_service.get(id)?;
    access::ensure_owner(&lead, user.id)?;

    app_state.lead_service.delete(id);

    Ok((StatusCode::OK, Json(json!({ "message": "Lead excluído com sucesso" }))))
}

// POST /api/leads/{id}/convert
#[utoipa::path(
    post,
    path = "/api/leads/{id}/convert",
    tag = "Leads",
    responses(
        (status = 200, description = "Lead convertido em proposta"),
        (status = 400, description = "Lead já foi convertido"),
        (status = 403, description = "Apenas o vendedor dono"),
        (status = 404, description = "Lead não encontrado")
    ),
    params(
        ("id" = u64, Path, description = "ID do lead")
    ),
    security(("api_jwt" = []))
)]
pub async fn convert_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    ensure_salesperson(&user)?;

    let lead = app_state.lead_service.get(id)?;
    access::ensure_owner(&lead, user.id)?;

    let proposal_id = app_state.lead_service.convert(id, user.id)?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Lead convertido em proposta com sucesso",
            "proposalId": proposal_id,
        })),
    ))
}
