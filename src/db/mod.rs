pub mod crm_repo;
pub mod store;
pub mod user_repo;

pub use crm_repo::CrmRepository;
pub use store::Database;
pub use user_repo::UserRepository;
