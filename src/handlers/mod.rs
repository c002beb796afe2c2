pub mod admin;
pub mod auth;
pub mod masterdata;
pub mod purchases;
pub mod quotes;
pub mod travel;
pub mod users;
