use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Reservation;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservationRequest {
    pub hotel_id: Uuid,
    pub room_type_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub room_count: Option<i32>,
    pub guest_count: Option<i32>,
    pub notes: Option<String>,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReservationRequest {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub room_count: Option<i32>,
    pub guest_count: Option<i32>,
    pub notes: Option<String>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
}

/// Guest-facing reservation with display fields joined in. Placeholder labels
/// stand in for a hotel or room type that has since been deleted.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDetail {
    pub reservation: Reservation,
    pub hotel_name: String,
    pub hotel_location: String,
    pub hotel_image: String,
    pub room_type_name: String,
    pub room_type_description: String,
    pub nightly_price: i64,
    pub max_occupancy: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationList {
    pub items: Vec<ReservationDetail>,
}

/// Owner-facing view: the booking plus the guest's profile contact fields.
#[derive(Debug, Serialize, ToSchema)]
pub struct HotelReservation {
    pub reservation: Reservation,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub room_type_name: String,
    pub hotel_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HotelReservationList {
    pub items: Vec<HotelReservation>,
}
