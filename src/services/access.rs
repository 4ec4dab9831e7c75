// src/services/access.rs

use crate::{
    common::error::AppError,
    models::{
        auth::Role,
        crm::{Lead, Meeting, Proposal},
    },
};

// Registro com dono: a política de visibilidade e de mutação é a mesma para
// propostas, reuniões e leads.
pub trait OwnedRecord {
    fn salesperson_id(&self) -> u64;
}

impl OwnedRecord for Proposal {
    fn salesperson_id(&self) -> u64 {
        self.salesperson_id
    }
}

impl OwnedRecord for Meeting {
    fn salesperson_id(&self) -> u64 {
        self.salesperson_id
    }
}

impl OwnedRecord for Lead {
    fn salesperson_id(&self) -> u64 {
        self.salesperson_id
    }
}

/// Admin enxerga tudo; vendedor só enxerga os próprios registros.
pub fn visible_set<T: OwnedRecord>(role: Role, caller_id: u64, records: Vec<T>) -> Vec<T> {
    match role {
        Role::Admin => records,
        Role::Salesperson => records
            .into_iter()
            .filter(|record| record.salesperson_id() == caller_id)
            .collect(),
    }
}

/// Um registro individual é visível para admin ou para o dono.
pub fn ensure_visible(record: &impl OwnedRecord, role: Role, caller_id: u64) -> Result<(), AppError> {
    if role == Role::Admin || record.salesperson_id() == caller_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Mutação exige ser o dono. Admin não recebe exceção aqui: quem chama
/// decide se o papel admin sequer chega até esta verificação.
pub fn ensure_owner(record: &impl OwnedRecord, caller_id: u64) -> Result<(), AppError> {
    if record.salesperson_id() == caller_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn lead(salesperson_id: u64) -> Lead {
        let now = Utc::now();
        Lead {
            id: 1,
            provider: None,
            contact: None,
            website: None,
            state: None,
            salesperson_id,
            converted_to_proposal: false,
            proposal_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn admin_enxerga_todos_os_registros() {
        let records = vec![lead(1), lead(2), lead(3)];
        let visible = visible_set(Role::Admin, 99, records);
        assert_eq!(visible.len(), 3);
    }

    #[test]
    fn vendedor_enxerga_apenas_os_proprios() {
        let records = vec![lead(1), lead(2), lead(1)];
        let visible = visible_set(Role::Salesperson, 1, records);
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|l| l.salesperson_id == 1));
    }

    #[test]
    fn mutacao_exige_ser_o_dono() {
        let record = lead(1);
        assert!(ensure_owner(&record, 1).is_ok());
        assert!(matches!(ensure_owner(&record, 2), Err(AppError::Forbidden)));
    }
}
