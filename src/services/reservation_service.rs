use chrono::{NaiveDate, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::OrmConn,
    dto::reservations::{
        CreateReservationRequest, ReservationDetail, ReservationList, UpdateReservationRequest,
    },
    entity::{
        hotels::Entity as Hotels,
        reservations::{
            ActiveModel as ReservationActive, Column as ResCol, Entity as Reservations,
            Model as ReservationModel,
        },
        room_types::{Column as RoomCol, Entity as RoomTypes},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{HotelStatus, Reservation, ReservationStatus},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub(crate) const HOTEL_REMOVED_LABEL: &str = "Hotel removed";
pub(crate) const ROOM_TYPE_REMOVED_LABEL: &str = "Room type removed";

fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    // 1-night floor covers equal and inverted dates.
    (check_out - check_in).num_days().max(1)
}

pub(crate) fn compute_total(
    check_in: NaiveDate,
    check_out: NaiveDate,
    nightly_price: i64,
    room_count: i32,
) -> i64 {
    nights_between(check_in, check_out) * nightly_price * i64::from(room_count)
}

/// Guest-canceled rows are hidden; hotel-initiated cancellations stay visible
/// so the guest sees the notice.
pub async fn list_my_reservations(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ReservationList>> {
    let rows = Reservations::find()
        .filter(
            Condition::all()
                .add(ResCol::UserId.eq(user.user_id))
                .add(ResCol::Status.ne(ReservationStatus::Canceled.as_str())),
        )
        .order_by_desc(ResCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        items.push(reservation_detail(&state.orm, row).await?);
    }

    Ok(ApiResponse::success(
        "Reservations",
        ReservationList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_reservation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<ReservationDetail>> {
    let row = find_owned(&state.orm, user, id).await?;
    let detail = reservation_detail(&state.orm, row).await?;
    Ok(ApiResponse::success("Reservation", detail, None))
}

pub async fn create_reservation(
    state: &AppState,
    user: &AuthUser,
    payload: CreateReservationRequest,
) -> AppResult<ApiResponse<ReservationDetail>> {
    if payload.guest_name.trim().is_empty() || payload.guest_email.trim().is_empty() {
        return Err(AppError::Validation(
            "Guest name and email are required".into(),
        ));
    }
    let room_count = payload.room_count.unwrap_or(1);
    let guest_count = payload.guest_count.unwrap_or(1);
    if room_count < 1 {
        return Err(AppError::Validation("Room count must be at least 1".into()));
    }
    if guest_count < 1 {
        return Err(AppError::Validation(
            "Guest count must be at least 1".into(),
        ));
    }
    if payload.check_out <= payload.check_in {
        return Err(AppError::Validation(
            "Check-out must be after check-in".into(),
        ));
    }

    let txn = state.orm.begin().await?;

    let hotel = Hotels::find_by_id(payload.hotel_id).one(&txn).await?;
    let hotel = match hotel {
        Some(h) => h,
        None => return Err(AppError::NotFound),
    };
    if hotel.status != HotelStatus::Approved.as_str() {
        return Err(AppError::Validation(
            "This hotel has not been approved yet".into(),
        ));
    }

    // The row lock serializes concurrent bookings of the same room type, so
    // the capacity check and the decrement happen atomically and
    // available_units can never go negative.
    let room_type = RoomTypes::find()
        .filter(
            Condition::all()
                .add(RoomCol::Id.eq(payload.room_type_id))
                .add(RoomCol::HotelId.eq(hotel.id)),
        )
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let room_type = match room_type {
        Some(rt) => rt,
        None => return Err(AppError::NotFound),
    };

    if room_type.available_units < room_count {
        return Err(AppError::Capacity("Insufficient rooms available".into()));
    }

    let total = compute_total(
        payload.check_in,
        payload.check_out,
        room_type.nightly_price,
        room_count,
    );

    let reservation = ReservationActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        hotel_id: Set(Some(hotel.id)),
        room_type_id: Set(Some(room_type.id)),
        check_in: Set(payload.check_in),
        check_out: Set(payload.check_out),
        room_count: Set(room_count),
        guest_count: Set(guest_count),
        total_amount: Set(total),
        notes: Set(payload.notes),
        guest_name: Set(payload.guest_name.trim().to_string()),
        guest_email: Set(payload.guest_email.trim().to_string()),
        guest_phone: Set(payload.guest_phone),
        status: Set(ReservationStatus::Active.as_str().to_string()),
        hotel_name_backup: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    RoomTypes::update_many()
        .col_expr(
            RoomCol::AvailableUnits,
            Expr::col(RoomCol::AvailableUnits).sub(room_count),
        )
        .filter(RoomCol::Id.eq(room_type.id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "reservation_create",
        Some("reservations"),
        Some(serde_json::json!({ "reservation_id": reservation.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let detail = reservation_detail(&state.orm, reservation).await?;
    Ok(ApiResponse::success(
        "Reservation created",
        detail,
        Some(Meta::empty()),
    ))
}

/// Edits merge the supplied fields and recompute the total when dates or
/// room count changed. Capacity is not re-validated and inventory is not
/// adjusted for room-count edits, matching the behavior this system has
/// always had.
pub async fn update_reservation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateReservationRequest,
) -> AppResult<ApiResponse<ReservationDetail>> {
    let model = find_owned(&state.orm, user, id).await?;

    let pricing_changed =
        payload.check_in.is_some() || payload.check_out.is_some() || payload.room_count.is_some();

    let check_in = payload.check_in.unwrap_or(model.check_in);
    let check_out = payload.check_out.unwrap_or(model.check_out);
    let room_count = payload.room_count.unwrap_or(model.room_count);
    if room_count < 1 {
        return Err(AppError::Validation("Room count must be at least 1".into()));
    }

    let room_type_id = model.room_type_id;
    let mut active: ReservationActive = model.into();
    active.check_in = Set(check_in);
    active.check_out = Set(check_out);
    active.room_count = Set(room_count);
    if let Some(guest_count) = payload.guest_count {
        active.guest_count = Set(guest_count);
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }
    if let Some(guest_name) = payload.guest_name {
        active.guest_name = Set(guest_name);
    }
    if let Some(guest_email) = payload.guest_email {
        active.guest_email = Set(guest_email);
    }
    if let Some(guest_phone) = payload.guest_phone {
        active.guest_phone = Set(Some(guest_phone));
    }

    if pricing_changed {
        // Total stays unchanged when the room type no longer exists.
        if let Some(room_type_id) = room_type_id {
            if let Some(room_type) = RoomTypes::find_by_id(room_type_id).one(&state.orm).await? {
                active.total_amount = Set(compute_total(
                    check_in,
                    check_out,
                    room_type.nightly_price,
                    room_count,
                ));
            }
        }
    }

    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "reservation_update",
        Some("reservations"),
        Some(serde_json::json!({ "reservation_id": updated.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let detail = reservation_detail(&state.orm, updated).await?;
    Ok(ApiResponse::success(
        "Reservation updated",
        detail,
        Some(Meta::empty()),
    ))
}

/// Cancellation is a status transition, not a delete; the row stays for
/// auditability. Inventory is restored only for a currently active booking,
/// making repeated cancels harmless.
pub async fn cancel_reservation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = state.orm.begin().await?;

    // The row lock serializes concurrent cancels of the same reservation, so
    // only one of them observes the active status and restores inventory.
    let model = Reservations::find()
        .filter(
            Condition::all()
                .add(ResCol::Id.eq(id))
                .add(ResCol::UserId.eq(user.user_id)),
        )
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let model = match model {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };

    if model.status == ReservationStatus::Active.as_str() {
        if let Some(room_type_id) = model.room_type_id {
            RoomTypes::update_many()
                .col_expr(
                    RoomCol::AvailableUnits,
                    Expr::col(RoomCol::AvailableUnits).add(model.room_count),
                )
                .filter(RoomCol::Id.eq(room_type_id))
                .exec(&txn)
                .await?;
        }

        let mut active: ReservationActive = model.into();
        active.status = Set(ReservationStatus::Canceled.as_str().to_string());
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await?;
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "reservation_cancel",
        Some("reservations"),
        Some(serde_json::json!({ "reservation_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Reservation canceled",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn find_owned(conn: &OrmConn, user: &AuthUser, id: Uuid) -> AppResult<ReservationModel> {
    let row = Reservations::find()
        .filter(
            Condition::all()
                .add(ResCol::Id.eq(id))
                .add(ResCol::UserId.eq(user.user_id)),
        )
        .one(conn)
        .await?;
    match row {
        Some(r) => Ok(r),
        None => Err(AppError::NotFound),
    }
}

pub(crate) async fn reservation_detail(
    conn: &OrmConn,
    model: ReservationModel,
) -> AppResult<ReservationDetail> {
    let hotel = match model.hotel_id {
        Some(id) => Hotels::find_by_id(id).one(conn).await?,
        None => None,
    };
    let room_type = match model.room_type_id {
        Some(id) => RoomTypes::find_by_id(id).one(conn).await?,
        None => None,
    };

    let hotel_name = hotel
        .as_ref()
        .map(|h| h.name.clone())
        .or_else(|| model.hotel_name_backup.clone())
        .unwrap_or_else(|| HOTEL_REMOVED_LABEL.to_string());
    let hotel_location = hotel
        .as_ref()
        .and_then(|h| h.location.clone())
        .unwrap_or_default();
    let hotel_image = hotel
        .as_ref()
        .and_then(|h| h.image.clone())
        .unwrap_or_default();
    let room_type_name = room_type
        .as_ref()
        .map(|r| r.name.clone())
        .unwrap_or_else(|| ROOM_TYPE_REMOVED_LABEL.to_string());
    let room_type_description = room_type
        .as_ref()
        .and_then(|r| r.description.clone())
        .unwrap_or_default();
    let nightly_price = room_type.as_ref().map(|r| r.nightly_price).unwrap_or(0);
    let max_occupancy = room_type.as_ref().map(|r| r.max_occupancy).unwrap_or(0);

    Ok(ReservationDetail {
        reservation: reservation_from_entity(model),
        hotel_name,
        hotel_location,
        hotel_image,
        room_type_name,
        room_type_description,
        nightly_price,
        max_occupancy,
    })
}

pub(crate) fn reservation_from_entity(model: ReservationModel) -> Reservation {
    Reservation {
        id: model.id,
        user_id: model.user_id,
        hotel_id: model.hotel_id,
        room_type_id: model.room_type_id,
        check_in: model.check_in,
        check_out: model.check_out,
        room_count: model.room_count,
        guest_count: model.guest_count,
        total_amount: model.total_amount,
        notes: model.notes,
        guest_name: model.guest_name,
        guest_email: model.guest_email,
        guest_phone: model.guest_phone,
        status: ReservationStatus::parse(&model.status).unwrap_or(ReservationStatus::Active),
        hotel_name_backup: model.hotel_name_backup,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn total_multiplies_nights_price_and_rooms() {
        let total = compute_total(date("2026-03-10"), date("2026-03-12"), 10000, 1);
        assert_eq!(total, 20000);

        let total = compute_total(date("2026-03-10"), date("2026-03-13"), 10000, 2);
        assert_eq!(total, 60000);
    }

    #[test]
    fn total_floors_at_one_night() {
        // Same-day stay still bills one night.
        let total = compute_total(date("2026-03-10"), date("2026-03-10"), 15000, 1);
        assert_eq!(total, 15000);

        // Inverted dates floor to one night instead of going negative.
        let total = compute_total(date("2026-03-12"), date("2026-03-10"), 15000, 2);
        assert_eq!(total, 30000);
    }
}
