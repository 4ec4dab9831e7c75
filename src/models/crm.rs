// src/models/crm.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
//  PROPOSTAS
// =============================================================================

// O funil não impõe uma ordem entre os status: qualquer valor pode
// transicionar para qualquer outro. "concluido-sucesso" e
// "encerrado-falta-interesse" são finais apenas por convenção.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ProposalStatus {
    Inicio,
    Negociando,
    QuaseFechando,
    ConcluidoSucesso,
    EncerradoFaltaInteresse,
}

// Uma entrada do histórico de descrições. O histórico é somente-acréscimo:
// entradas nunca são editadas nem removidas.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionEntry {
    pub id: u64,
    pub description: String,
    pub status: ProposalStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: u64,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_name: Option<String>,
    pub status: ProposalStatus,
    pub description: String,
    pub description_history: Vec<DescriptionEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_closed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_value: Option<Decimal>,
    pub salesperson_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Campos de uma proposta nova, já validados na borda HTTP.
#[derive(Debug, Clone)]
pub struct NewProposal {
    pub provider: String,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub responsible_name: Option<String>,
    pub status: ProposalStatus,
    pub description: String,
    pub plan_closed: Option<String>,
    pub plan_value: Option<Decimal>,
    pub salesperson_id: u64,
}

// Atualização parcial de uma proposta. Campos ausentes ficam como estão;
// não há como "anular" um campo opcional por aqui (mesma semântica do
// espalhamento parcial da API original).
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposalPatch {
    pub provider: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub responsible_name: Option<String>,
    pub status: Option<ProposalStatus>,
    pub description: Option<String>,
    pub plan_closed: Option<String>,
    pub plan_value: Option<Decimal>,
}

// =============================================================================
//  REUNIÕES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MeetingType {
    Email,
    Call,
    Whatsapp,
    Video,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: u64,
    pub proposal_id: u64,
    pub date: NaiveDate,
    pub time: String,
    #[serde(rename = "type")]
    pub meeting_type: MeetingType,
    pub contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    // Copiado do dono da proposta no momento da criação; não rastreia quem
    // criou a reunião.
    pub salesperson_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMeeting {
    pub proposal_id: u64,
    pub date: NaiveDate,
    pub time: String,
    pub meeting_type: MeetingType,
    pub contact: String,
    pub notes: Option<String>,
    pub salesperson_id: u64,
}

// =============================================================================
//  LEADS
// =============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub salesperson_id: u64,
    // Vira true no máximo uma vez; depois disso proposal_id fica fixo.
    pub converted_to_proposal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLead {
    pub provider: Option<String>,
    pub contact: Option<String>,
    pub website: Option<String>,
    pub state: Option<String>,
    pub salesperson_id: u64,
}
