use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Listing approval workflow. A hotel is publicly visible only when approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HotelStatus {
    Pending,
    Approved,
    Rejected,
}

impl HotelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HotelStatus::Pending => "pending",
            HotelStatus::Approved => "approved",
            HotelStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(HotelStatus::Pending),
            "approved" => Some(HotelStatus::Approved),
            "rejected" => Some(HotelStatus::Rejected),
            _ => None,
        }
    }
}

/// Reservation lifecycle. `completed` and `canceled_hotel_rejected` are valid
/// values no write path sets; they exist for forward compatibility with the
/// original domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Active,
    Canceled,
    Completed,
    CanceledHotelRemoved,
    CanceledHotelRejected,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Active => "active",
            ReservationStatus::Canceled => "canceled",
            ReservationStatus::Completed => "completed",
            ReservationStatus::CanceledHotelRemoved => "canceled_hotel_removed",
            ReservationStatus::CanceledHotelRejected => "canceled_hotel_rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(ReservationStatus::Active),
            "canceled" => Some(ReservationStatus::Canceled),
            "completed" => Some(ReservationStatus::Completed),
            "canceled_hotel_removed" => Some(ReservationStatus::CanceledHotelRemoved),
            "canceled_hotel_rejected" => Some(ReservationStatus::CanceledHotelRejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Hotel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub amenities: Vec<String>,
    pub status: HotelStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomType {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Minor currency units per night.
    pub nightly_price: i64,
    pub max_occupancy: i32,
    pub available_units: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub hotel_id: Option<Uuid>,
    pub room_type_id: Option<Uuid>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub room_count: i32,
    pub guest_count: i32,
    pub total_amount: i64,
    pub notes: Option<String>,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    pub status: ReservationStatus,
    /// Hotel name snapshot taken when the hotel is deleted, so the guest can
    /// still be told what was canceled.
    pub hotel_name_backup: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub reservation_id: Option<Uuid>,
    pub subject: String,
    pub body: String,
    pub status: String,
    pub reply: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotel_status_round_trips() {
        for status in [
            HotelStatus::Pending,
            HotelStatus::Approved,
            HotelStatus::Rejected,
        ] {
            assert_eq!(HotelStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(HotelStatus::parse("aprovado"), None);
    }

    #[test]
    fn reservation_status_round_trips() {
        for status in [
            ReservationStatus::Active,
            ReservationStatus::Canceled,
            ReservationStatus::Completed,
            ReservationStatus::CanceledHotelRemoved,
            ReservationStatus::CanceledHotelRejected,
        ] {
            assert_eq!(ReservationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReservationStatus::parse("ativa"), None);
    }
}
