// src/services/lead_service.rs

use crate::{
    common::error::AppError,
    db::CrmRepository,
    models::{
        auth::Role,
        crm::{Lead, NewLead, NewProposal, ProposalStatus},
    },
    services::proposal_service::ProposalService,
};

// Leads e a conversão de mão única lead → proposta.
#[derive(Clone)]
pub struct LeadService {
    repo: CrmRepository,
    proposals: ProposalService,
}

impl LeadService {
    pub fn new(repo: CrmRepository, proposals: ProposalService) -> Self {
        Self { repo, proposals }
    }

    pub fn list_visible(&self, role: Role, caller_id: u64) -> Vec<Lead> {
        match role {
            Role::Admin => self.repo.all_leads(),
            Role::Salesperson => self.repo.leads_by_salesperson(caller_id),
        }
    }

    pub fn get(&self, id: u64) -> Result<Lead, AppError> {
        self.repo.find_lead(id).ok_or(AppError::LeadNotFound)
    }

    pub fn create(&self, new: NewLead) -> Lead {
        self.repo.create_lead(new)
    }

    pub fn delete(&self, id: u64) -> bool {
        self.repo.delete_lead(id)
    }

    /// Converte o lead em proposta, no máximo uma vez.
    ///
    /// A proposta nasce em "inicio" com provider/contato herdados do lead e
    /// descrição gerada. Se outro chamador converter o mesmo lead no meio do
    /// caminho, a marcação falha, a proposta recém-criada é removida e o
    /// lead fica como estava.
    pub fn convert(&self, id: u64, caller_id: u64) -> Result<u64, AppError> {
        let lead = self.get(id)?;
        if lead.converted_to_proposal {
            return Err(AppError::LeadAlreadyConverted);
        }

        let description = format!(
            "Proposta criada a partir do lead. Site: {}, Estado: {}",
            lead.website.as_deref().unwrap_or("N/A"),
            lead.state.as_deref().unwrap_or("N/A"),
        );
        let proposal = self.proposals.create(NewProposal {
            provider: lead.provider.unwrap_or_else(|| "Provedor do Lead".to_owned()),
            whatsapp: lead.contact,
            email: None,
            responsible_name: None,
            status: ProposalStatus::Inicio,
            description,
            plan_closed: None,
            plan_value: None,
            salesperson_id: caller_id,
        });

        match self.repo.mark_lead_converted(id, proposal.id) {
            Ok(_) => Ok(proposal.id),
            Err(e) => {
                // Corrida perdida: desfaz a proposta órfã.
                self.proposals.delete(proposal.id);
                Err(e)
            }
        }
    }
}
