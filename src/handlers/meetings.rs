// src/handlers/meetings.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::Role,
        crm::{Meeting, MeetingType, NewMeeting},
        dashboard::UpcomingMeeting,
    },
    services::access,
};

// O mesmo corpo serve para criar e atualizar: a API exige todos os campos
// (menos as anotações) nas duas operações.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingPayload {
    pub proposal_id: Option<u64>,
    #[schema(value_type = Option<String>, format = Date, example = "2026-09-01")]
    pub date: Option<NaiveDate>,
    #[schema(example = "14:30")]
    pub time: Option<String>,
    #[serde(rename = "type")]
    pub meeting_type: Option<MeetingType>,
    pub contact: Option<String>,
    pub notes: Option<String>,
}

struct MeetingFields {
    proposal_id: u64,
    date: NaiveDate,
    time: String,
    meeting_type: MeetingType,
    contact: String,
    notes: Option<String>,
}

fn required_fields(payload: MeetingPayload) -> Result<MeetingFields, AppError> {
    let (Some(proposal_id), Some(date), Some(time), Some(meeting_type), Some(contact)) = (
        payload.proposal_id,
        payload.date,
        payload.time,
        payload.meeting_type,
        payload.contact,
    ) else {
        return Err(AppError::MissingFields("proposalId, date, time, type, contact"));
    };
    Ok(MeetingFields {
        proposal_id,
        date,
        time,
        meeting_type,
        contact,
        notes: payload.notes,
    })
}

// GET /api/meetings
#[utoipa::path(
    get,
    path = "/api/meetings",
    tag = "Meetings",
    responses(
        (status = 200, description = "Reuniões visíveis ao chamador", body = Vec<Meeting>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_meetings(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let meetings = app_state.meeting_service.list_visible(user.role, user.id);
    Ok((StatusCode::OK, Json(meetings)))
}

// POST /api/meetings
#[utoipa::path(
    post,
    path = "/api/meetings",
    tag = "Meetings",
    request_body = MeetingPayload,
    responses(
        (status = 201, description = "Reunião criada", body = Meeting),
        (status = 400, description = "Campos obrigatórios ausentes"),
        (status = 403, description = "Proposta de outro vendedor"),
        (status = 404, description = "Proposta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_meeting(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<MeetingPayload>,
) -> Result<impl IntoResponse, AppError> {
    let fields = required_fields(payload)?;

    // A reunião pertence ao dono da proposta, mesmo quando um admin a cria
    // em nome do vendedor.
    let proposal = app_state.proposal_service.get(fields.proposal_id)?;
    if user.role == Role::Salesperson {
        access::ensure_owner(&proposal, user.id)?;
    }

    let meeting = app_state.meeting_service.create(NewMeeting {
        proposal_id: fields.proposal_id,
        date: fields.date,
        time: fields.time,
        meeting_type: fields.meeting_type,
        contact: fields.contact,
        notes: fields.notes,
        salesperson_id: proposal.salesperson_id,
    });

    Ok((StatusCode::CREATED, Json(meeting)))
}

// GET /api/meetings/upcoming
#[utoipa::path(
    get,
    path = "/api/meetings/upcoming",
    tag = "Meetings",
    responses(
        (status = 200, description = "Até 5 reuniões dos próximos 7 dias", body = Vec<UpcomingMeeting>)
    ),
    security(("api_jwt" = []))
)]
pub async fn upcoming_meetings(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let today = Utc::now().date_naive();
    let upcoming = app_state.meeting_service.upcoming(user.role, user.id, today);
    Ok((StatusCode::OK, Json(upcoming)))
}

// PUT /api/meetings/{id}
#[utoipa::path(
    put,
    path = "/api/meetings/{id}",
    tag = "Meetings",
    request_body = MeetingPayload,
    responses(
        (status = 200, description = "Reunião atualizada", body = Meeting),
        (status = 400, description = "Campos obrigatórios ausentes"),
        (status = 403, description = "Reunião de outro vendedor"),
        (status = 404, description = "Reunião ou proposta não encontrada")
    ),
    params(
        ("id" = u64, Path, description = "ID da reunião")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_meeting(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<u64>,
    Json(payload): Json<MeetingPayload>,
) -> Result<impl IntoResponse, AppError> {
    let fields = required_fields(payload)?;

    let meeting = app_state.meeting_service.get(id)?;
    if user.role == Role::Salesperson {
        access::ensure_owner(&meeting, user.id)?;
    }

    // A proposta referenciada precisa existir; o dono da reunião não muda.
    app_state.proposal_service.get(fields.proposal_id)?;

    let updated = app_state.meeting_service.update(
        id,
        NewMeeting {
            proposal_id: fields.proposal_id,
            date: fields.date,
            time: fields.time,
            meeting_type: fields.meeting_type,
            contact: fields.contact,
            notes: fields.notes,
            salesperson_id: meeting.salesperson_id,
        },
    )?;

    Ok((StatusCode::OK, Json(updated)))
}

// DELETE /api/meetings/{id}
#[utoipa::path(
    delete,
    path = "/api/meetings/{id}",
    tag = "Meetings",
    responses(
        (status = 200, description = "Reunião excluída"),
        (status = 403, description = "Reunião de outro vendedor"),
        (status = 404, description = "Reunião não encontrada")
    ),
    params(
        ("id" = u64, Path, description = "ID da reunião")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_meeting(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, AppError> {
    let meeting = app_state.meeting_service.get(id)?;
    if user.role == Role::Salesperson {
        access::ensure_owner(&meeting, user.id)?;
    }

    app_state.meeting_service.delete(id);

    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}
