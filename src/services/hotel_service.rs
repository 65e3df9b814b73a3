use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::hotels::{
        CreateHotelRequest, HotelDetail, HotelList, OwnerHotel, OwnerHotelList, RoomTypeInput,
        UpdateHotelRequest,
    },
    dto::reservations::{HotelReservation, HotelReservationList},
    entity::{
        hotels::{ActiveModel as HotelActive, Column as HotelCol, Entity as Hotels, Model as HotelModel},
        reservations::{Column as ResCol, Entity as Reservations},
        room_types::{ActiveModel as RoomTypeActive, Column as RoomCol, Entity as RoomTypes, Model as RoomTypeModel},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Hotel, HotelStatus, ReservationStatus, RoomType},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::reservation_service::{ROOM_TYPE_REMOVED_LABEL, reservation_from_entity},
    state::AppState,
};

pub async fn list_public_hotels(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<HotelList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Hotels::find()
        .filter(HotelCol::Status.eq(HotelStatus::Approved.as_str()))
        .order_by_desc(HotelCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let hotels = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(hotels.len());
    for hotel in hotels {
        items.push(hotel_detail(&state.orm, hotel).await?);
    }

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Hotels", HotelList { items }, Some(meta)))
}

pub async fn list_my_hotels(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<OwnerHotelList>> {
    let hotels = Hotels::find()
        .filter(HotelCol::UserId.eq(user.user_id))
        .order_by_desc(HotelCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(hotels.len());
    for hotel in hotels {
        let room_types = room_types_for(&state.orm, hotel.id).await?;
        let reservation_count = Reservations::find()
            .filter(ResCol::HotelId.eq(hotel.id))
            .count(&state.orm)
            .await? as i64;
        items.push(OwnerHotel {
            hotel: hotel_from_entity(hotel),
            room_types,
            reservation_count,
        });
    }

    Ok(ApiResponse::success(
        "My hotels",
        OwnerHotelList { items },
        Some(Meta::empty()),
    ))
}

/// Detail view is reachable regardless of approval state; pending and
/// rejected listings stay viewable by direct link.
pub async fn get_hotel(state: &AppState, id: Uuid) -> AppResult<ApiResponse<HotelDetail>> {
    let hotel = Hotels::find_by_id(id).one(&state.orm).await?;
    let hotel = match hotel {
        Some(h) => h,
        None => return Err(AppError::NotFound),
    };

    let detail = hotel_detail(&state.orm, hotel).await?;
    Ok(ApiResponse::success("Hotel", detail, None))
}

pub async fn create_hotel(
    state: &AppState,
    user: &AuthUser,
    payload: CreateHotelRequest,
) -> AppResult<ApiResponse<HotelDetail>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Hotel name is required".into()));
    }
    validate_room_types(&payload.room_types)?;

    // Hotel plus room types commit or roll back together.
    let txn = state.orm.begin().await?;

    let hotel = HotelActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        name: Set(payload.name.trim().to_string()),
        location: Set(payload.location),
        description: Set(payload.description),
        image: Set(payload.image),
        amenities: Set(serde_json::json!(payload.amenities.unwrap_or_default())),
        status: Set(HotelStatus::Pending.as_str().to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    for input in &payload.room_types {
        insert_room_type(&txn, hotel.id, input).await?;
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "hotel_create",
        Some("hotels"),
        Some(serde_json::json!({ "hotel_id": hotel.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let detail = hotel_detail(&state.orm, hotel).await?;
    Ok(ApiResponse::success(
        "Hotel submitted, awaiting admin approval",
        detail,
        Some(Meta::empty()),
    ))
}

pub async fn update_hotel(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateHotelRequest,
) -> AppResult<ApiResponse<HotelDetail>> {
    let hotel = Hotels::find_by_id(id).one(&state.orm).await?;
    let hotel = match hotel {
        Some(h) => h,
        None => return Err(AppError::NotFound),
    };
    ensure_owner_or_admin(&state.orm, &hotel, user).await?;

    if let Some(inputs) = payload.room_types.as_deref() {
        validate_room_types(inputs)?;
    }

    let txn = state.orm.begin().await?;

    let mut active: HotelActive = hotel.into();
    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Hotel name is required".into()));
        }
        active.name = Set(name.trim().to_string());
    }
    if let Some(location) = payload.location {
        active.location = Set(Some(location));
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(image) = payload.image {
        active.image = Set(Some(image));
    }
    if let Some(amenities) = payload.amenities {
        active.amenities = Set(serde_json::json!(amenities));
    }
    active.updated_at = Set(Utc::now().into());
    let hotel = active.update(&txn).await?;

    if let Some(inputs) = payload.room_types {
        reconcile_room_types(&txn, hotel.id, &inputs).await?;
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "hotel_update",
        Some("hotels"),
        Some(serde_json::json!({ "hotel_id": hotel.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let detail = hotel_detail(&state.orm, hotel).await?;
    Ok(ApiResponse::success(
        "Hotel updated",
        detail,
        Some(Meta::empty()),
    ))
}

pub async fn delete_hotel(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let hotel = Hotels::find_by_id(id).one(&state.orm).await?;
    let hotel = match hotel {
        Some(h) => h,
        None => return Err(AppError::NotFound),
    };
    ensure_owner_or_admin(&state.orm, &hotel, user).await?;

    let txn = state.orm.begin().await?;

    // Room types go away; the FK nulls room_type_id on affected reservations.
    RoomTypes::delete_many()
        .filter(RoomCol::HotelId.eq(hotel.id))
        .exec(&txn)
        .await?;

    // Active reservations survive as hotel-initiated cancellations carrying
    // the hotel's name so guests can still be told what was canceled. Rows the
    // guest already canceled keep their status.
    Reservations::update_many()
        .col_expr(
            ResCol::Status,
            Expr::value(ReservationStatus::CanceledHotelRemoved.as_str()),
        )
        .col_expr(ResCol::HotelNameBackup, Expr::value(hotel.name.clone()))
        .col_expr(ResCol::UpdatedAt, Expr::current_timestamp().into())
        .filter(ResCol::HotelId.eq(hotel.id))
        .filter(ResCol::Status.eq(ReservationStatus::Active.as_str()))
        .exec(&txn)
        .await?;

    Hotels::delete_by_id(hotel.id).exec(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "hotel_delete",
        Some("hotels"),
        Some(serde_json::json!({ "hotel_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Hotel deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Owner-only view of everything booked at one hotel.
pub async fn list_hotel_reservations(
    state: &AppState,
    user: &AuthUser,
    hotel_id: Uuid,
) -> AppResult<ApiResponse<HotelReservationList>> {
    let hotel = Hotels::find_by_id(hotel_id).one(&state.orm).await?;
    let hotel = match hotel {
        Some(h) => h,
        None => return Err(AppError::NotFound),
    };
    if hotel.user_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    let rows = Reservations::find()
        .filter(ResCol::HotelId.eq(hotel.id))
        .order_by_desc(ResCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let guest = Users::find_by_id(row.user_id).one(&state.orm).await?;
        let (client_name, client_email, client_phone) = guest
            .map(|u| (u.name, u.email, u.phone.unwrap_or_default()))
            .unwrap_or_default();

        let room_type_name = match row.room_type_id {
            Some(id) => RoomTypes::find_by_id(id)
                .one(&state.orm)
                .await?
                .map(|m| m.name)
                .unwrap_or_else(|| ROOM_TYPE_REMOVED_LABEL.to_string()),
            None => ROOM_TYPE_REMOVED_LABEL.to_string(),
        };

        items.push(HotelReservation {
            reservation: reservation_from_entity(row),
            client_name,
            client_email,
            client_phone,
            room_type_name,
            hotel_name: hotel.name.clone(),
        });
    }

    Ok(ApiResponse::success(
        "Hotel reservations",
        HotelReservationList { items },
        Some(Meta::empty()),
    ))
}

async fn ensure_owner_or_admin(
    conn: &crate::db::OrmConn,
    hotel: &HotelModel,
    user: &AuthUser,
) -> Result<(), AppError> {
    if hotel.user_id == user.user_id {
        return Ok(());
    }
    let record = Users::find_by_id(user.user_id).one(conn).await?;
    match record {
        Some(u) if u.is_admin => Ok(()),
        _ => Err(AppError::Forbidden),
    }
}

fn validate_room_types(inputs: &[RoomTypeInput]) -> AppResult<()> {
    if inputs.is_empty() {
        return Err(AppError::Validation(
            "At least one room type is required".into(),
        ));
    }
    for (idx, input) in inputs.iter().enumerate() {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "Room type {}: name is required",
                idx + 1
            )));
        }
        if input.nightly_price < 0 {
            return Err(AppError::Validation(format!(
                "Room type {}: nightly price must not be negative",
                idx + 1
            )));
        }
        if input.available_units.unwrap_or(0) < 0 {
            return Err(AppError::Validation(format!(
                "Room type {}: available units must not be negative",
                idx + 1
            )));
        }
        if input.max_occupancy.unwrap_or(2) < 1 {
            return Err(AppError::Validation(format!(
                "Room type {}: occupancy must be at least 1",
                idx + 1
            )));
        }
    }
    Ok(())
}

async fn insert_room_type<C: ConnectionTrait>(
    conn: &C,
    hotel_id: Uuid,
    input: &RoomTypeInput,
) -> AppResult<RoomTypeModel> {
    let model = RoomTypeActive {
        id: Set(Uuid::new_v4()),
        hotel_id: Set(hotel_id),
        name: Set(input.name.trim().to_string()),
        description: Set(input.description.clone()),
        nightly_price: Set(input.nightly_price),
        max_occupancy: Set(input.max_occupancy.unwrap_or(2)),
        available_units: Set(input.available_units.unwrap_or(0)),
        created_at: NotSet,
    }
    .insert(conn)
    .await?;
    Ok(model)
}

/// Identity-preserving room-type reconciliation: inputs with a known id are
/// updated in place, the rest inserted, and rows the owner dropped deleted.
async fn reconcile_room_types<C: ConnectionTrait>(
    conn: &C,
    hotel_id: Uuid,
    inputs: &[RoomTypeInput],
) -> AppResult<()> {
    let existing = RoomTypes::find()
        .filter(RoomCol::HotelId.eq(hotel_id))
        .all(conn)
        .await?;

    let mut kept: Vec<Uuid> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let matched = input
            .id
            .and_then(|id| existing.iter().find(|m| m.id == id));
        match matched {
            Some(model) => {
                let mut row: RoomTypeActive = model.clone().into();
                row.name = Set(input.name.trim().to_string());
                row.description = Set(input.description.clone());
                row.nightly_price = Set(input.nightly_price);
                if let Some(occupancy) = input.max_occupancy {
                    row.max_occupancy = Set(occupancy);
                }
                if let Some(units) = input.available_units {
                    row.available_units = Set(units);
                }
                let updated = row.update(conn).await?;
                kept.push(updated.id);
            }
            None => {
                let inserted = insert_room_type(conn, hotel_id, input).await?;
                kept.push(inserted.id);
            }
        }
    }

    RoomTypes::delete_many()
        .filter(RoomCol::HotelId.eq(hotel_id))
        .filter(RoomCol::Id.is_not_in(kept))
        .exec(conn)
        .await?;

    Ok(())
}

async fn room_types_for(conn: &crate::db::OrmConn, hotel_id: Uuid) -> AppResult<Vec<RoomType>> {
    let rows = RoomTypes::find()
        .filter(RoomCol::HotelId.eq(hotel_id))
        .order_by_asc(RoomCol::NightlyPrice)
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(room_type_from_entity).collect())
}

pub(crate) async fn hotel_detail(
    conn: &crate::db::OrmConn,
    model: HotelModel,
) -> AppResult<HotelDetail> {
    let room_types = room_types_for(conn, model.id).await?;
    let owner = Users::find_by_id(model.user_id).one(conn).await?;
    let (owner_name, owner_email) = owner.map(|u| (u.name, u.email)).unwrap_or_default();
    Ok(HotelDetail {
        hotel: hotel_from_entity(model),
        owner_name,
        owner_email,
        room_types,
    })
}

pub(crate) fn hotel_from_entity(model: HotelModel) -> Hotel {
    let amenities = serde_json::from_value(model.amenities).unwrap_or_default();
    Hotel {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
        location: model.location,
        description: model.description,
        image: model.image,
        amenities,
        status: HotelStatus::parse(&model.status).unwrap_or(HotelStatus::Pending),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub(crate) fn room_type_from_entity(model: RoomTypeModel) -> RoomType {
    RoomType {
        id: model.id,
        hotel_id: model.hotel_id,
        name: model.name,
        description: model.description,
        nightly_price: model.nightly_price,
        max_occupancy: model.max_occupancy,
        available_units: model.available_units,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
