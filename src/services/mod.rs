pub mod admin_service;
pub mod auth_service;
pub mod contact_service;
pub mod hotel_service;
pub mod reservation_service;
