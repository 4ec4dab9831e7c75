// src/db/user_repo.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::store::Database,
    models::auth::{Role, User},
};

// O repositório de usuários, responsável por todas as interações com a
// coleção 'users'. A unicidade de e-mail é garantida aqui, sob o lock da
// coleção.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<Database>,
}

impl UserRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn find_all(&self) -> Vec<User> {
        self.db.users.all()
    }

    pub fn find_by_id(&self, id: u64) -> Option<User> {
        self.db.users.find(id)
    }

    // Busca um usuário pelo seu e-mail (índice de unicidade)
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.db.users.find_where(|user| user.email == email)
    }

    pub fn is_empty(&self) -> bool {
        self.db.users.is_empty()
    }

    // Cria um novo usuário, com tratamento de erro específico para e-mails
    // duplicados.
    pub fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AppError> {
        self.db
            .users
            .insert_unique(
                |user| user.email == email,
                |id, now| User {
                    id,
                    name: name.to_owned(),
                    email: email.to_owned(),
                    password_hash: password_hash.to_owned(),
                    role,
                    created_at: now,
                    updated_at: now,
                },
            )
            .ok_or(AppError::EmailAlreadyExists)
    }

    // Atualiza nome/e-mail/papel; a senha só muda quando um novo hash é
    // fornecido.
    pub fn update_user(
        &self,
        id: u64,
        name: &str,
        email: &str,
        password_hash: Option<&str>,
        role: Role,
    ) -> Result<User, AppError> {
        // O novo e-mail não pode pertencer a outro usuário.
        if let Some(existing) = self.find_by_email(email) {
            if existing.id != id {
                return Err(AppError::EmailAlreadyExists);
            }
        }

        self.db
            .users
            .update_with(id, |user| {
                user.name = name.to_owned();
                user.email = email.to_owned();
                user.role = role;
                if let Some(hash) = password_hash {
                    user.password_hash = hash.to_owned();
                }
            })
            .ok_or(AppError::UserNotFound)
    }

    pub fn delete_user(&self, id: u64) -> bool {
        self.db.users.delete(id)
    }
}
