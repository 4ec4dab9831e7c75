// src/db/store.rs

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::models::{
    auth::User,
    crm::{Lead, Meeting, Proposal},
};

// Um registro armazenável: tem id numérico e timestamps de auditoria.
pub trait Entity: Clone {
    fn id(&self) -> u64;
    fn touch(&mut self, now: DateTime<Utc>);
}

struct TableInner<T> {
    rows: Vec<T>,
    next_id: u64,
}

/// Uma coleção em memória protegida por mutex.
///
/// O axum atende requisições em paralelo, então toda operação de
/// ler-modificar-escrever roda inteira dentro de uma única aquisição do
/// lock. O lock nunca atravessa um `.await`. Os ids são um contador
/// incremental com escopo da coleção.
pub struct Table<T: Entity> {
    inner: Mutex<TableInner<T>>,
}

impl<T: Entity> Table<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TableInner { rows: Vec::new(), next_id: 1 }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TableInner<T>> {
        // Nenhum closure de mutação entra em pânico de propósito; se entrar,
        // os dados continuam utilizáveis.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn all(&self) -> Vec<T> {
        self.lock().rows.clone()
    }

    pub fn find(&self, id: u64) -> Option<T> {
        self.lock().rows.iter().find(|row| row.id() == id).cloned()
    }

    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.lock().rows.iter().filter(|row| pred(row)).cloned().collect()
    }

    pub fn find_where(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.lock().rows.iter().find(|row| pred(row)).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().rows.is_empty()
    }

    /// Insere o registro construído por `build`, que recebe o id recém
    /// atribuído e o instante de criação.
    pub fn insert(&self, build: impl FnOnce(u64, DateTime<Utc>) -> T) -> T {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        let row = build(id, Utc::now());
        inner.rows.push(row.clone());
        row
    }

    /// Insere apenas se nenhuma linha satisfizer `conflict` (verificação e
    /// inserção sob o mesmo lock). Retorna `None` em caso de conflito.
    pub fn insert_unique(
        &self,
        conflict: impl Fn(&T) -> bool,
        build: impl FnOnce(u64, DateTime<Utc>) -> T,
    ) -> Option<T> {
        let mut inner = self.lock();
        if inner.rows.iter().any(|row| conflict(row)) {
            return None;
        }
        let id = inner.next_id;
        inner.next_id += 1;
        let row = build(id, Utc::now());
        inner.rows.push(row.clone());
        Some(row)
    }

    /// Aplica `apply` ao registro e atualiza `updated_at`. `None` se o id
    /// não existir.
    pub fn update_with(&self, id: u64, apply: impl FnOnce(&mut T)) -> Option<T> {
        let mut inner = self.lock();
        let row = inner.rows.iter_mut().find(|row| row.id() == id)?;
        apply(row);
        row.touch(Utc::now());
        Some(row.clone())
    }

    /// Variante condicional: `apply` pode recusar a mutação devolvendo `Err`,
    /// e nesse caso nada muda (nem o `updated_at`).
    pub fn try_update_with<E>(
        &self,
        id: u64,
        apply: impl FnOnce(&mut T) -> Result<(), E>,
    ) -> Option<Result<T, E>> {
        let mut inner = self.lock();
        let row = inner.rows.iter_mut().find(|row| row.id() == id)?;
        Some(match apply(row) {
            Ok(()) => {
                row.touch(Utc::now());
                Ok(row.clone())
            }
            Err(e) => Err(e),
        })
    }

    pub fn delete(&self, id: u64) -> bool {
        let mut inner = self.lock();
        let before = inner.rows.len();
        inner.rows.retain(|row| row.id() != id);
        inner.rows.len() < before
    }
}

impl Entity for User {
    fn id(&self) -> u64 {
        self.id
    }
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Entity for Proposal {
    fn id(&self) -> u64 {
        self.id
    }
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Entity for Meeting {
    fn id(&self) -> u64 {
        self.id
    }
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Entity for Lead {
    fn id(&self) -> u64 {
        self.id
    }
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// O armazenamento do processo: uma coleção por entidade, construído uma
/// única vez no `AppState` e injetado nos repositórios.
pub struct Database {
    pub users: Table<User>,
    pub proposals: Table<Proposal>,
    pub meetings: Table<Meeting>,
    pub leads: Table<Lead>,
}

impl Database {
    pub fn new() -> Self {
        Self {
            users: Table::new(),
            proposals: Table::new(),
            meetings: Table::new(),
            leads: Table::new(),
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
