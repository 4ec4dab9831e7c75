// src/config.rs

use std::{env, sync::Arc};

use anyhow::Context;

use crate::{
    db::{CrmRepository, Database, UserRepository},
    services::{
        auth::AuthService, dashboard_service::DashboardService, lead_service::LeadService,
        meeting_service::MeetingService, proposal_service::ProposalService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub proposal_service: ProposalService,
    pub lead_service: LeadService,
    pub meeting_service: MeetingService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    // Carrega as configurações do ambiente e monta o estado. Se a
    // configuração falhar, a aplicação não deve iniciar.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let admin_email =
            env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@pingdesk.com".to_owned());
        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_owned());

        let state = Self::build(jwt_secret);
        state
            .auth_service
            .bootstrap_admin(&admin_email, &admin_password)
            .await?;

        Ok(state)
    }

    // Monta o gráfico de dependências: um armazenamento por processo,
    // injetado explicitamente nos repositórios e serviços.
    pub fn build(jwt_secret: String) -> Self {
        let db = Arc::new(Database::new());
        let user_repo = UserRepository::new(db.clone());
        let crm_repo = CrmRepository::new(db);

        let auth_service = AuthService::new(user_repo, jwt_secret);
        let proposal_service = ProposalService::new(crm_repo.clone());
        let lead_service = LeadService::new(crm_repo.clone(), proposal_service.clone());
        let meeting_service = MeetingService::new(crm_repo.clone());
        let dashboard_service = DashboardService::new(crm_repo);

        Self {
            auth_service,
            proposal_service,
            lead_service,
            meeting_service,
            dashboard_service,
        }
    }
}
