// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Proposals ---
        handlers::proposals::list_proposals,
        handlers::proposals::create_proposal,
        handlers::proposals::get_proposal,
        handlers::proposals::update_proposal,
        handlers::proposals::delete_proposal,

        // --- Leads ---
        handlers::leads::list_leads,
        handlers::leads::create_lead,
        handlers::leads::delete_lead,
        handlers::leads::convert_lead,

        // --- Meetings ---
        handlers::meetings::list_meetings,
        handlers::meetings::create_meeting,
        handlers::meetings::upcoming_meetings,
        handlers::meetings::update_meeting,
        handlers::meetings::delete_meeting,

        // --- Dashboard ---
        handlers::dashboard::get_stats,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- CRM ---
            models::crm::ProposalStatus,
            models::crm::DescriptionEntry,
            models::crm::Proposal,
            models::crm::ProposalPatch,
            models::crm::MeetingType,
            models::crm::Meeting,
            models::crm::Lead,

            // --- Dashboard ---
            models::dashboard::DashboardStats,
            models::dashboard::MonthlyStat,
            models::dashboard::UpcomingMeeting,

            // --- Payloads ---
            handlers::users::CreateUserPayload,
            handlers::users::UpdateUserPayload,
            handlers::proposals::CreateProposalPayload,
            handlers::leads::CreateLeadPayload,
            handlers::meetings::MeetingPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação"),
        (name = "Users", description = "Gestão de usuários (admin)"),
        (name = "Proposals", description = "Propostas e histórico de descrições"),
        (name = "Leads", description = "Leads e conversão em proposta"),
        (name = "Meetings", description = "Reuniões e agenda"),
        (name = "Dashboard", description = "Indicadores de vendas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
