// src/models/dashboard.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::crm::MeetingType;

// Estatísticas agregadas sobre o conjunto de propostas visível ao chamador.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_proposals: u64,
    pub closed_deals: u64,
    pub total_value: Decimal,
    // 100% do valor para admin, 80% para vendedor.
    pub commission: Decimal,
    pub monthly_stats: Vec<MonthlyStat>,
}

// Um mês do rollup (últimos 6 meses, do mais antigo para o mais recente).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStat {
    pub month: String,
    pub proposals: u64,
    pub closed_deals: u64,
    pub value: Decimal,
}

// Reunião dos próximos 7 dias, já com o provedor da proposta associada.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingMeeting {
    pub id: u64,
    pub date: NaiveDate,
    pub time: String,
    #[serde(rename = "type")]
    pub meeting_type: MeetingType,
    pub contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub provider: String,
    pub proposal_id: u64,
}
