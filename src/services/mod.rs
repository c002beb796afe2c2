pub mod admin_service;
pub mod auth;
pub mod masterdata_service;
pub mod purchase_service;
pub mod quote_service;
pub mod travel_service;
