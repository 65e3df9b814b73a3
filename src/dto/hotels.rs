use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Hotel, RoomType};

/// Room type as submitted by an owner. A present `id` means "update this
/// existing row in place"; absent means "create a new one".
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RoomTypeInput {
    pub id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub nightly_price: i64,
    pub max_occupancy: Option<i32>,
    pub available_units: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateHotelRequest {
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub room_types: Vec<RoomTypeInput>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateHotelRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub room_types: Option<Vec<RoomTypeInput>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HotelDetail {
    pub hotel: Hotel,
    pub owner_name: String,
    pub owner_email: String,
    pub room_types: Vec<RoomType>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OwnerHotel {
    pub hotel: Hotel,
    pub room_types: Vec<RoomType>,
    pub reservation_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HotelList {
    pub items: Vec<HotelDetail>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OwnerHotelList {
    pub items: Vec<OwnerHotel>,
}
