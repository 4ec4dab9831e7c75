// src/services/dashboard_service.rs

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;

use crate::{
    db::CrmRepository,
    models::{
        auth::Role,
        crm::{Proposal, ProposalStatus},
        dashboard::{DashboardStats, MonthlyStat},
    },
    services::access,
};

const MESES_PT: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

// Agregação do dashboard: contagens, receita de negócios fechados, comissão
// e rollup dos últimos 6 meses. Tudo é uma varredura única sobre o conjunto
// visível; nenhuma razão/percentual é calculada aqui (isso fica com o
// consumidor, que precisa guardar a divisão por zero).
#[derive(Clone)]
pub struct DashboardService {
    repo: CrmRepository,
}

impl DashboardService {
    pub fn new(repo: CrmRepository) -> Self {
        Self { repo }
    }

    pub fn compute_stats(&self, role: Role, caller_id: u64, now: DateTime<Utc>) -> DashboardStats {
        let visible = access::visible_set(role, caller_id, self.repo.all_proposals());

        // Comissão: 100% para admin, 80% para vendedor (divisão fixa).
        let share = match role {
            Role::Admin => Decimal::ONE,
            Role::Salesperson => Decimal::new(8, 1),
        };

        let total_proposals = visible.len() as u64;
        let closed_deals = visible.iter().filter(|p| is_closed(p)).count() as u64;
        let total_value: Decimal = visible
            .iter()
            .filter(|p| is_closed(p))
            .filter_map(|p| p.plan_value)
            .sum();
        let commission = total_value * share;

        // Últimos 6 meses-calendário terminando em `now`, do mais antigo
        // para o mais recente.
        let monthly_stats = (0..6)
            .rev()
            .map(|back| {
                let (year, month) = months_back(now.year(), now.month(), back);
                let in_month: Vec<&Proposal> = visible
                    .iter()
                    .filter(|p| p.created_at.year() == year && p.created_at.month() == month)
                    .collect();

                let month_value: Decimal = in_month
                    .iter()
                    .filter(|p| is_closed(p))
                    .filter_map(|p| p.plan_value)
                    .sum();

                MonthlyStat {
                    month: format!("{} de {}", MESES_PT[month as usize - 1], year),
                    proposals: in_month.len() as u64,
                    closed_deals: in_month.iter().filter(|p| is_closed(p)).count() as u64,
                    value: month_value * share,
                }
            })
            .collect();

        DashboardStats {
            total_proposals,
            closed_deals,
            total_value,
            commission,
            monthly_stats,
        }
    }
}

fn is_closed(proposal: &Proposal) -> bool {
    proposal.status == ProposalStatus::ConcluidoSucesso
}

// Recuo de meses-calendário sem depender do dia do mês.
fn months_back(year: i32, month: u32, back: u32) -> (i32, u32) {
    let total = year * 12 + month as i32 - 1 - back as i32;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}
