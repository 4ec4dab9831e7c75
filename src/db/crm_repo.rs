// src/db/crm_repo.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::store::Database,
    models::crm::{
        DescriptionEntry, Lead, Meeting, NewLead, NewMeeting, NewProposal, Proposal, ProposalPatch,
    },
};

// Repositório das coleções de CRM (propostas, reuniões e leads).
#[derive(Clone)]
pub struct CrmRepository {
    db: Arc<Database>,
}

impl CrmRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    // =========================================================================
    //  1. PROPOSTAS
    // =========================================================================

    pub fn all_proposals(&self) -> Vec<Proposal> {
        self.db.proposals.all()
    }

    pub fn find_proposal(&self, id: u64) -> Option<Proposal> {
        self.db.proposals.find(id)
    }

    pub fn proposals_by_salesperson(&self, salesperson_id: u64) -> Vec<Proposal> {
        self.db
            .proposals
            .filter(|p| p.salesperson_id == salesperson_id)
    }

    // Cria a proposta já com a entrada #1 do histórico, espelhando a
    // descrição e o status iniciais. O histórico nunca nasce vazio.
    pub fn create_proposal(&self, new: NewProposal) -> Proposal {
        self.db.proposals.insert(|id, now| Proposal {
            id,
            provider: new.provider,
            whatsapp: new.whatsapp,
            email: new.email,
            responsible_name: new.responsible_name,
            status: new.status,
            description: new.description.clone(),
            description_history: vec![DescriptionEntry {
                id: 1,
                description: new.description,
                status: new.status,
                timestamp: now,
            }],
            plan_closed: new.plan_closed,
            plan_value: new.plan_value,
            salesperson_id: new.salesperson_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Aplica um patch parcial sob um único lock.
    ///
    /// Regra do histórico: se o patch traz uma `description` diferente da
    /// armazenada, exatamente uma entrada nova é acrescentada, com o status
    /// do patch (se presente) ou o status vigente. Descrição igual não gera
    /// entrada. Entradas existentes nunca mudam.
    pub fn update_proposal(&self, id: u64, patch: ProposalPatch) -> Option<Proposal> {
        self.db.proposals.update_with(id, |proposal| {
            if let Some(description) = &patch.description {
                if *description != proposal.description {
                    let entry_status = patch.status.unwrap_or(proposal.status);
                    proposal.description_history.push(DescriptionEntry {
                        id: proposal.description_history.len() as u64 + 1,
                        description: description.clone(),
                        status: entry_status,
                        timestamp: chrono::Utc::now(),
                    });
                }
                proposal.description = description.clone();
            }
            if let Some(provider) = patch.provider {
                proposal.provider = provider;
            }
            if let Some(whatsapp) = patch.whatsapp {
                proposal.whatsapp = Some(whatsapp);
            }
            if let Some(email) = patch.email {
                proposal.email = Some(email);
            }
            if let Some(responsible_name) = patch.responsible_name {
                proposal.responsible_name = Some(responsible_name);
            }
            if let Some(status) = patch.status {
                proposal.status = status;
            }
            if let Some(plan_closed) = patch.plan_closed {
                proposal.plan_closed = Some(plan_closed);
            }
            if let Some(plan_value) = patch.plan_value {
                proposal.plan_value = Some(plan_value);
            }
        })
    }

    pub fn delete_proposal(&self, id: u64) -> bool {
        self.db.proposals.delete(id)
    }

    // =========================================================================
    //  2. REUNIÕES
    // =========================================================================

    pub fn all_meetings(&self) -> Vec<Meeting> {
        self.db.meetings.all()
    }

    pub fn find_meeting(&self, id: u64) -> Option<Meeting> {
        self.db.meetings.find(id)
    }

    pub fn meetings_by_salesperson(&self, salesperson_id: u64) -> Vec<Meeting> {
        self.db
            .meetings
            .filter(|m| m.salesperson_id == salesperson_id)
    }

    pub fn create_meeting(&self, new: NewMeeting) -> Meeting {
        self.db.meetings.insert(|id, now| Meeting {
            id,
            proposal_id: new.proposal_id,
            date: new.date,
            time: new.time,
            meeting_type: new.meeting_type,
            contact: new.contact,
            notes: new.notes,
            salesperson_id: new.salesperson_id,
            created_at: now,
            updated_at: now,
        })
    }

    // Substitui os campos editáveis; `salesperson_id` não muda em updates.
    pub fn update_meeting(&self, id: u64, fields: NewMeeting) -> Option<Meeting> {
        self.db.meetings.update_with(id, |meeting| {
            meeting.proposal_id = fields.proposal_id;
            meeting.date = fields.date;
            meeting.time = fields.time;
            meeting.meeting_type = fields.meeting_type;
            meeting.contact = fields.contact;
            meeting.notes = fields.notes.clone();
        })
    }

    pub fn delete_meeting(&self, id: u64) -> bool {
        self.db.meetings.delete(id)
    }

    // =========================================================================
    //  3. LEADS
    // =========================================================================

    pub fn all_leads(&self) -> Vec<Lead> {
        self.db.leads.all()
    }

    pub fn find_lead(&self, id: u64) -> Option<Lead> {
        self.db.leads.find(id)
    }

    pub fn leads_by_salesperson(&self, salesperson_id: u64) -> Vec<Lead> {
        self.db.leads.filter(|l| l.salesperson_id == salesperson_id)
    }

    pub fn create_lead(&self, new: NewLead) -> Lead {
        self.db.leads.insert(|id, now| Lead {
            id,
            provider: new.provider,
            contact: new.contact,
            website: new.website,
            state: new.state,
            salesperson_id: new.salesperson_id,
            converted_to_proposal: false,
            proposal_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Marca o lead como convertido, no máximo uma vez. A verificação e a
    /// escrita acontecem sob o mesmo lock; um segundo chamador concorrente
    /// recebe `LeadAlreadyConverted` e o lead permanece intacto.
    pub fn mark_lead_converted(&self, id: u64, proposal_id: u64) -> Result<Lead, AppError> {
        self.db
            .leads
            .try_update_with(id, |lead| {
                if lead.converted_to_proposal {
                    return Err(AppError::LeadAlreadyConverted);
                }
                lead.converted_to_proposal = true;
                lead.proposal_id = Some(proposal_id);
                Ok(())
            })
            .ok_or(AppError::LeadNotFound)?
    }

    pub fn delete_lead(&self, id: u64) -> bool {
        self.db.leads.delete(id)
    }
}
