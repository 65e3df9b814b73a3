use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::reservations::{
        CreateReservationRequest, ReservationDetail, ReservationList, UpdateReservationRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::reservation_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_my_reservations).post(create_reservation))
        .route(
            "/{id}",
            get(get_reservation)
                .put(update_reservation)
                .delete(cancel_reservation),
        )
}

#[utoipa::path(
    get,
    path = "/api/reservations",
    responses(
        (status = 200, description = "Caller's reservations", body = ApiResponse<ReservationList>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Reservations"
)]
pub async fn list_my_reservations(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ReservationList>>> {
    let resp = reservation_service::list_my_reservations(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reservations/{id}",
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "One reservation", body = ApiResponse<ReservationDetail>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reservations"
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReservationDetail>>> {
    let resp = reservation_service::get_reservation(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 200, description = "Reservation created, inventory decremented", body = ApiResponse<ReservationDetail>),
        (status = 400, description = "Validation or capacity error"),
        (status = 404, description = "Hotel or room type not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reservations"
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateReservationRequest>,
) -> AppResult<Json<ApiResponse<ReservationDetail>>> {
    let resp = reservation_service::create_reservation(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/reservations/{id}",
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    request_body = UpdateReservationRequest,
    responses(
        (status = 200, description = "Reservation updated, total recomputed", body = ApiResponse<ReservationDetail>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reservations"
)]
pub async fn update_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReservationRequest>,
) -> AppResult<Json<ApiResponse<ReservationDetail>>> {
    let resp = reservation_service::update_reservation(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/reservations/{id}",
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation canceled, inventory restored"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reservations"
)]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = reservation_service::cancel_reservation(&state, &user, id).await?;
    Ok(Json(resp))
}
