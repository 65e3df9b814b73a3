pub mod audit_logs;
pub mod contact_messages;
pub mod hotels;
pub mod reservations;
pub mod room_types;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use contact_messages::Entity as ContactMessages;
pub use hotels::Entity as Hotels;
pub use reservations::Entity as Reservations;
pub use room_types::Entity as RoomTypes;
pub use users::Entity as Users;
