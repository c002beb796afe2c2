pub mod masterdata_repo;
pub mod notification_repo;
pub mod profile_repo;
pub mod purchase_repo;
pub mod travel_repo;
pub mod user_repo;

pub use masterdata_repo::MasterDataRepository;
pub use notification_repo::NotificationRepository;
pub use profile_repo::ProfileRepository;
pub use purchase_repo::PurchaseRepository;
pub use travel_repo::{TravelRepository, TravelRequestFields};
pub use user_repo::UserRepository;

use crate::common::error::AppError;

// Converte violação de chave única em erro amigável; o resto segue como
// erro de banco.
pub(crate) fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or("desconhecida").to_string();
            if constraint == "users_email_key" {
                return AppError::EmailAlreadyExists;
            }
            return AppError::UniqueConstraintViolation(constraint);
        }
    }
    e.into()
}
