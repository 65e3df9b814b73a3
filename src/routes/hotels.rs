use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::hotels::{CreateHotelRequest, HotelDetail, HotelList, OwnerHotelList, UpdateHotelRequest},
    dto::reservations::HotelReservationList,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::Pagination,
    services::hotel_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_public_hotels).post(create_hotel))
        .route("/meus-hoteis", get(list_my_hotels))
        .route(
            "/{id}",
            get(get_hotel).put(update_hotel).delete(delete_hotel),
        )
        .route("/{id}/reservations", get(list_hotel_reservations))
}

#[utoipa::path(
    get,
    path = "/api/hotels",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Approved hotels with room types", body = ApiResponse<HotelList>)
    ),
    tag = "Hotels"
)]
pub async fn list_public_hotels(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<HotelList>>> {
    let resp = hotel_service::list_public_hotels(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/hotels/meus-hoteis",
    responses(
        (status = 200, description = "Caller's hotels with reservation counts", body = ApiResponse<OwnerHotelList>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Hotels"
)]
pub async fn list_my_hotels(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OwnerHotelList>>> {
    let resp = hotel_service::list_my_hotels(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/hotels/{id}",
    params(
        ("id" = Uuid, Path, description = "Hotel ID")
    ),
    responses(
        (status = 200, description = "Hotel detail", body = ApiResponse<HotelDetail>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Hotels"
)]
pub async fn get_hotel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<HotelDetail>>> {
    let resp = hotel_service::get_hotel(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/hotels",
    request_body = CreateHotelRequest,
    responses(
        (status = 200, description = "Hotel created in pending state", body = ApiResponse<HotelDetail>),
        (status = 400, description = "Validation error"),
    ),
    security(("bearer_auth" = [])),
    tag = "Hotels"
)]
pub async fn create_hotel(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateHotelRequest>,
) -> AppResult<Json<ApiResponse<HotelDetail>>> {
    let resp = hotel_service::create_hotel(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/hotels/{id}",
    params(
        ("id" = Uuid, Path, description = "Hotel ID")
    ),
    request_body = UpdateHotelRequest,
    responses(
        (status = 200, description = "Hotel updated", body = ApiResponse<HotelDetail>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Hotels"
)]
pub async fn update_hotel(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateHotelRequest>,
) -> AppResult<Json<ApiResponse<HotelDetail>>> {
    let resp = hotel_service::update_hotel(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/hotels/{id}",
    params(
        ("id" = Uuid, Path, description = "Hotel ID")
    ),
    responses(
        (status = 200, description = "Hotel deleted, reservations soft-canceled"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Hotels"
)]
pub async fn delete_hotel(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = hotel_service::delete_hotel(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/hotels/{id}/reservations",
    params(
        ("id" = Uuid, Path, description = "Hotel ID")
    ),
    responses(
        (status = 200, description = "Reservations for an owned hotel", body = ApiResponse<HotelReservationList>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Hotels"
)]
pub async fn list_hotel_reservations(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<HotelReservationList>>> {
    let resp = hotel_service::list_hotel_reservations(&state, &user, id).await?;
    Ok(Json(resp))
}
