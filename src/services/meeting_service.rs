// src/services/meeting_service.rs

use chrono::{Duration, NaiveDate};

use crate::{
    common::error::AppError,
    db::CrmRepository,
    models::{
        auth::Role,
        crm::{Meeting, NewMeeting},
        dashboard::UpcomingMeeting,
    },
};

#[derive(Clone)]
pub struct MeetingService {
    repo: CrmRepository,
}

impl MeetingService {
    pub fn new(repo: CrmRepository) -> Self {
        Self { repo }
    }

    pub fn list_visible(&self, role: Role, caller_id: u64) -> Vec<Meeting> {
        match role {
            Role::Admin => self.repo.all_meetings(),
            Role::Salesperson => self.repo.meetings_by_salesperson(caller_id),
        }
    }

    pub fn get(&self, id: u64) -> Result<Meeting, AppError> {
        self.repo.find_meeting(id).ok_or(AppError::MeetingNotFound)
    }

    pub fn create(&self, new: NewMeeting) -> Meeting {
        self.repo.create_meeting(new)
    }

    pub fn update(&self, id: u64, fields: NewMeeting) -> Result<Meeting, AppError> {
        self.repo
            .update_meeting(id, fields)
            .ok_or(AppError::MeetingNotFound)
    }

    pub fn delete(&self, id: u64) -> bool {
        self.repo.delete_meeting(id)
    }

    /// Reuniões visíveis nos próximos 7 dias (inclusive hoje), com o
    /// provedor da proposta associada, ordenadas por data e hora, no máximo 5.
    pub fn upcoming(&self, role: Role, caller_id: u64, today: NaiveDate) -> Vec<UpcomingMeeting> {
        let horizon = today + Duration::days(7);

        let mut upcoming: Vec<UpcomingMeeting> = self
            .list_visible(role, caller_id)
            .into_iter()
            .filter(|meeting| meeting.date >= today && meeting.date <= horizon)
            .map(|meeting| {
                let provider = self
                    .repo
                    .find_proposal(meeting.proposal_id)
                    .map(|p| p.provider)
                    .unwrap_or_else(|| "Provedor não encontrado".to_owned());
                UpcomingMeeting {
                    id: meeting.id,
                    date: meeting.date,
                    time: meeting.time,
                    meeting_type: meeting.meeting_type,
                    contact: meeting.contact,
                    notes: meeting.notes,
                    provider,
                    proposal_id: meeting.proposal_id,
                }
            })
            .collect();

        upcoming.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
        upcoming.truncate(5);
        upcoming
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::crm::{MeetingType, NewProposal, ProposalStatus};
    use std::sync::Arc;

    fn service() -> MeetingService {
        MeetingService::new(CrmRepository::new(Arc::new(Database::new())))
    }

    fn nova_reuniao(proposal_id: u64, date: NaiveDate, time: &str) -> NewMeeting {
        NewMeeting {
            proposal_id,
            date,
            time: time.to_owned(),
            meeting_type: MeetingType::Call,
            contact: "11 98888-0000".to_owned(),
            notes: None,
            salesperson_id: 1,
        }
    }

    #[test]
    fn upcoming_filtra_ordena_e_limita() {
        let service = service();
        let proposal = service.repo.create_proposal(NewProposal {
            provider: "Acme".to_owned(),
            whatsapp: None,
            email: None,
            responsible_name: None,
            status: ProposalStatus::Inicio,
            description: "primeiro contato".to_owned(),
            plan_closed: None,
            plan_value: None,
            salesperson_id: 1,
        });

        let today = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();

        // Fora da janela: ontem e daqui a 8 dias.
        service.create(nova_reuniao(proposal.id, today - Duration::days(1), "09:00"));
        service.create(nova_reuniao(proposal.id, today + Duration::days(8), "09:00"));
        // Dentro da janela, fora de ordem.
        service.create(nova_reuniao(proposal.id, today + Duration::days(2), "15:00"));
        service.create(nova_reuniao(proposal.id, today + Duration::days(2), "09:30"));
        service.create(nova_reuniao(proposal.id, today, "10:00"));

        let upcoming = service.upcoming(Role::Salesperson, 1, today);
        assert_eq!(upcoming.len(), 3);
        assert_eq!(upcoming[0].date, today);
        assert_eq!(upcoming[1].time, "09:30");
        assert_eq!(upcoming[2].time, "15:00");
        assert!(upcoming.iter().all(|m| m.provider == "Acme"));
    }

    #[test]
    fn upcoming_devolve_no_maximo_cinco() {
        let service = service();
        let today = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
        for i in 0..7 {
            service.create(nova_reuniao(1, today + Duration::days(i % 6), "10:00"));
        }
        assert_eq!(service.upcoming(Role::Admin, 0, today).len(), 5);
    }
}
