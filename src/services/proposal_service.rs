// src/services/proposal_service.rs

use crate::{
    common::error::AppError,
    db::CrmRepository,
    models::{
        auth::Role,
        crm::{NewProposal, Proposal, ProposalPatch},
    },
    services::access,
};

/// Ciclo de vida das propostas.
///
/// Invariantes mantidas aqui (via repositório, sob um único lock):
/// - `description_history` nasce com a entrada #1 e só cresce;
/// - uma entrada nova aparece se e somente se a descrição muda em um update,
///   carregando o status do patch ou, na ausência dele, o status vigente.
///
/// A exigência de `plan_closed`/`plan_value` para o status
/// "concluido-sucesso" é responsabilidade da borda HTTP, que a verifica
/// antes de a mutação chegar aqui.
#[derive(Clone)]
pub struct ProposalService {
    repo: CrmRepository,
}

impl ProposalService {
    pub fn new(repo: CrmRepository) -> Self {
        Self { repo }
    }

    pub fn list_visible(&self, role: Role, caller_id: u64) -> Vec<Proposal> {
        match role {
            Role::Admin => self.repo.all_proposals(),
            Role::Salesperson => self.repo.proposals_by_salesperson(caller_id),
        }
    }

    pub fn get(&self, id: u64) -> Result<Proposal, AppError> {
        self.repo.find_proposal(id).ok_or(AppError::ProposalNotFound)
    }

    pub fn get_visible(&self, id: u64, role: Role, caller_id: u64) -> Result<Proposal, AppError> {
        let proposal = self.get(id)?;
        access::ensure_visible(&proposal, role, caller_id)?;
        Ok(proposal)
    }

    pub fn create(&self, new: NewProposal) -> Proposal {
        self.repo.create_proposal(new)
    }

    pub fn update(&self, id: u64, patch: ProposalPatch) -> Result<Proposal, AppError> {
        self.repo
            .update_proposal(id, patch)
            .ok_or(AppError::ProposalNotFound)
    }

    // false para id inexistente, sem erro.
    pub fn delete(&self, id: u64) -> bool {
        self.repo.delete_proposal(id)
    }
}
