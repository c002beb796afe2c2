pub mod auth;
pub mod masterdata;
pub mod notifications;
pub mod profile;
pub mod purchases;
pub mod quotes;
pub mod travel;
