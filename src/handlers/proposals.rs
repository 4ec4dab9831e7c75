// src/handlers/proposals.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::{Role, User},
        crm::{NewProposal, Proposal, ProposalPatch, ProposalStatus},
    },
    services::access,
};

// Propostas são criadas e mutadas apenas por vendedores; admin tem leitura
// total, mas nenhuma mutação direta.
fn ensure_salesperson(user: &User) -> Result<(), AppError> {
    if user.role != Role::Salesperson {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

// Verificação de borda: o status "concluido-sucesso" só é persistido com o
// plano fechado e o valor já presentes. O gerente de ciclo de vida não
// revalida isso.
fn ensure_plan_fields(
    status: ProposalStatus,
    plan_closed: Option<&String>,
    plan_value: Option<&Decimal>,
) -> Result<(), AppError> {
    if status == ProposalStatus::ConcluidoSucesso && (plan_closed.is_none() || plan_value.is_none())
    {
        return Err(AppError::MissingFields("planClosed, planValue"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposalPayload {
    #[schema(example = "Acme Telecom")]
    pub provider: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub responsible_name: Option<String>,
    pub status: Option<ProposalStatus>,
    #[schema(example = "Primeiro contato feito por telefone")]
    pub description: Option<String>,
    pub plan_closed: Option<String>,
    pub plan_value: Option<Decimal>,
}

// GET /api/proposals
#[utoipa::path(
    get,
    path = "/api/proposals",
    tag = "Proposals",
    responses(
        (status = 200, description = "Propostas visíveis ao chamador", body = Vec<Proposal>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_proposals(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let proposals = app_state.proposal_service.list_visible(user.role, user.id);
    Ok((StatusCode::OK, Json(proposals)))
}

// POST /api/proposals
#[utoipa::path(
    post,
    path = "/api/proposals",
    tag = "Proposals",
    request_body = CreateProposalPayload,
    responses(
        (status = 201, description = "Proposta criada", body = Proposal),
        (status = 400, description = "Campos obrigatórios ausentes"),
        (status = 403, description = "Apenas vendedores criam propostas")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_proposal(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateProposalPayload>,
) -> Result<impl IntoResponse, AppError> {
    ensure_salesperson(&user)?;

    let (Some(provider), Some(status), Some(description)) =
        (payload.provider, payload.status, payload.description)
    else {
        return Err(AppError::MissingFields("provider, status, description"));
    };

    ensure_plan_fields(status, payload.plan_closed.as_ref(), payload.plan_value.as_ref())?;

    let proposal = app_state.proposal_service.create(NewProposal {
        provider,
        whatsapp: payload.whatsapp,
        email: payload.email,
        responsible_name: payload.responsible_name,
        status,
        description,
        plan_closed: payload.plan_closed,
        plan_value: payload.plan_value,
        salesperson_id: user.id,
    });

    Ok((StatusCode::CREATED, Json(proposal)))
}

// GET /api/proposals/{id}
#[utoipa::path(
    get,
    path = "/api/proposals/{id}",
    tag = "Proposals",
    responses(
        (status = 200, description = "Proposta", body = Proposal),
        (status = 403, description = "Proposta de outro vendedor"),
        (status = 404, description = "Proposta não encontrada")
    ),
    params(
        ("id" = u64, Path, description = "ID da proposta")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_proposal(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    let proposal = app_state
        .proposal_service
        .get_visible(id, user.role, user.id)?;
    Ok((StatusCode::OK, Json(proposal)))
}

// PUT /api/proposals/{id}
#[utoipa::path(
    put,
    path = "/api/proposals/{id}",
    tag = "Proposals",
    request_body = ProposalPatch,
    responses(
        (status = 200, description = "Proposta atualizada", body = Proposal),
        (status = 400, description = "Plano ausente para concluido-sucesso"),
        (status = 403, description = "Apenas o vendedor dono"),
        (status = 404, description = "Proposta não encontrada")
    ),
    params(
        ("id" = u64, Path, description = "ID da proposta")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_proposal(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<u64>,
    Json(patch): Json<ProposalPatch>,
) -> Result<impl IntoResponse, AppError> {
    ensure_salesperson(&user)?;

    let current = app_state.proposal_service.get(id)?;
    access::ensure_owner(&current, user.id)?;

    // O status resultante decide se o plano é obrigatório; os campos do
    // plano podem vir do patch ou já estar na proposta.
    let target_status = patch.status.unwrap_or(current.status);
    ensure_plan_fields(
        target_status,
        patch.plan_closed.as_ref().or(current.plan_closed.as_ref()),
        patch.plan_value.as_ref().or(current.plan_value.as_ref()),
    )?;

    let updated = app_state.proposal_service.update(id, patch)?;
    Ok((StatusCode::OK, Json(updated)))
}

// DELETE /api/proposals/{id}
#[utoipa::path(
    delete,
    path = "/api/proposals/{id}",
    tag = "Proposals",
    responses(
        (status = 200, description = "Proposta excluída"),
        (status = 403, description = "Apenas o vendedor dono"),
        (status = 404, description = "Proposta não encontrada")
    ),
    params(
        ("id" = u64, Path, description = "ID da proposta")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_proposal(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    ensure_salesperson(&user)?;

    let proposal = app_state.proposal_service.get(id)?;
    access::ensure_owner(&proposal, user.id)?;

    app_state.proposal_service.delete(id);

    Ok((StatusCode::OK, Json(json!({ "message": "Proposta excluída com sucesso" }))))
}
