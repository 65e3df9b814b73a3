use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest},
        contact::{ContactMessageView, MessageList, SendMessageRequest},
        hotels::{
            CreateHotelRequest, HotelDetail, HotelList, OwnerHotel, OwnerHotelList, RoomTypeInput,
            UpdateHotelRequest,
        },
        reservations::{
            CreateReservationRequest, HotelReservation, HotelReservationList, ReservationDetail,
            ReservationList, UpdateReservationRequest,
        },
    },
    models::{ContactMessage, Hotel, HotelStatus, Reservation, ReservationStatus, RoomType, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, contact, health, hotels, params, reservations},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::get_profile,
        auth::update_profile,
        hotels::list_public_hotels,
        hotels::list_my_hotels,
        hotels::get_hotel,
        hotels::create_hotel,
        hotels::update_hotel,
        hotels::delete_hotel,
        hotels::list_hotel_reservations,
        reservations::list_my_reservations,
        reservations::get_reservation,
        reservations::create_reservation,
        reservations::update_reservation,
        reservations::cancel_reservation,
        contact::send_message,
        contact::list_my_messages,
        admin::list_all_hotels,
        admin::list_pending_hotels,
        admin::approve_hotel,
        admin::reprove_hotel,
        admin::delete_hotel,
        admin::list_users,
        admin::get_user,
        admin::update_user,
        admin::delete_user,
        admin::promote_user,
        admin::demote_user,
        admin::dashboard_stats
    ),
    components(
        schemas(
            User,
            Hotel,
            HotelStatus,
            RoomType,
            Reservation,
            ReservationStatus,
            ContactMessage,
            RegisterRequest,
            LoginRequest,
            UpdateProfileRequest,
            AuthResponse,
            RoomTypeInput,
            CreateHotelRequest,
            UpdateHotelRequest,
            HotelDetail,
            HotelList,
            OwnerHotel,
            OwnerHotelList,
            CreateReservationRequest,
            UpdateReservationRequest,
            ReservationDetail,
            ReservationList,
            HotelReservation,
            HotelReservationList,
            SendMessageRequest,
            ContactMessageView,
            MessageList,
            admin::AdminUpdateUserRequest,
            admin::UserWithStats,
            admin::UserList,
            admin::DashboardStats,
            params::Pagination,
            params::HotelListQuery,
            health::HealthData,
            Meta,
            ApiResponse<AuthResponse>,
            ApiResponse<User>,
            ApiResponse<Hotel>,
            ApiResponse<HotelDetail>,
            ApiResponse<HotelList>,
            ApiResponse<OwnerHotelList>,
            ApiResponse<ReservationDetail>,
            ApiResponse<ReservationList>,
            ApiResponse<HotelReservationList>,
            ApiResponse<ContactMessage>,
            ApiResponse<MessageList>,
            ApiResponse<admin::UserList>,
            ApiResponse<admin::DashboardStats>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication and profile endpoints"),
        (name = "Hotels", description = "Public catalog and owner listing endpoints"),
        (name = "Reservations", description = "Guest reservation endpoints"),
        (name = "Contact", description = "Guest to marketplace messaging"),
        (name = "Admin", description = "Moderation and user management endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
