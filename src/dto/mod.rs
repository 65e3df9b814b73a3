pub mod auth;
pub mod contact;
pub mod hotels;
pub mod reservations;
