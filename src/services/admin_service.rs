use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::hotels::HotelList,
    entity::{
        hotels::{Column as HotelCol, Entity as Hotels},
        reservations::{Column as ResCol, Entity as Reservations},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Hotel, HotelStatus, ReservationStatus, User},
    response::{ApiResponse, Meta},
    routes::admin::{AdminUpdateUserRequest, DashboardStats, UserList, UserWithStats},
    routes::params::{HotelListQuery, Pagination},
    services::{auth_service, hotel_service},
    state::AppState,
};

pub async fn list_all_hotels(
    state: &AppState,
    user: &AuthUser,
    query: HotelListQuery,
) -> AppResult<ApiResponse<HotelList>> {
    ensure_admin(&state.orm, user).await?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        let status = HotelStatus::parse(status)
            .ok_or_else(|| AppError::Validation("Invalid hotel status filter".into()))?;
        condition = condition.add(HotelCol::Status.eq(status.as_str()));
    }

    // Grouped by approval state (alphabetical), newest within each group.
    let finder = Hotels::find()
        .filter(condition)
        .order_by_asc(HotelCol::Status)
        .order_by_desc(HotelCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let hotels = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(hotels.len());
    for hotel in hotels {
        items.push(hotel_service::hotel_detail(&state.orm, hotel).await?);
    }

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Hotels", HotelList { items }, Some(meta)))
}

pub async fn list_pending_hotels(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<HotelList>> {
    ensure_admin(&state.orm, user).await?;

    let hotels = Hotels::find()
        .filter(HotelCol::Status.eq(HotelStatus::Pending.as_str()))
        .order_by_desc(HotelCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(hotels.len());
    for hotel in hotels {
        items.push(hotel_service::hotel_detail(&state.orm, hotel).await?);
    }

    Ok(ApiResponse::success(
        "Pending hotels",
        HotelList { items },
        Some(Meta::empty()),
    ))
}

pub async fn approve_hotel(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Hotel>> {
    transition_hotel(state, user, id, HotelStatus::Approved, "hotel_approve").await
}

pub async fn reprove_hotel(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Hotel>> {
    transition_hotel(state, user, id, HotelStatus::Rejected, "hotel_reprove").await
}

/// Any state may move to any other by further admin action; no transition is
/// terminal.
async fn transition_hotel(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: HotelStatus,
    action: &str,
) -> AppResult<ApiResponse<Hotel>> {
    ensure_admin(&state.orm, user).await?;

    let hotel = Hotels::find_by_id(id).one(&state.orm).await?;
    let hotel = match hotel {
        Some(h) => h,
        None => return Err(AppError::NotFound),
    };

    let mut active: crate::entity::hotels::ActiveModel = hotel.into();
    active.status = Set(status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let hotel = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        action,
        Some("hotels"),
        Some(serde_json::json!({ "hotel_id": hotel.id, "status": hotel.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let message = match status {
        HotelStatus::Approved => "Hotel approved",
        HotelStatus::Rejected => "Hotel rejected",
        HotelStatus::Pending => "Hotel moved back to pending",
    };
    Ok(ApiResponse::success(
        message,
        hotel_service::hotel_from_entity(hotel),
        Some(Meta::empty()),
    ))
}

pub async fn delete_hotel(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(&state.orm, user).await?;
    // Same cascade as an owner deletion: room types removed, reservations
    // soft-canceled with the hotel name snapshot.
    hotel_service::delete_hotel(state, user, id).await
}

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(&state.orm, user).await?;
    let (page, limit, offset) = pagination.normalize();

    let finder = Users::find().order_by_desc(UserCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let users = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(users.len());
    for record in users {
        let hotel_count = Hotels::find()
            .filter(HotelCol::UserId.eq(record.id))
            .count(&state.orm)
            .await? as i64;
        let reservation_count = Reservations::find()
            .filter(ResCol::UserId.eq(record.id))
            .count(&state.orm)
            .await? as i64;
        items.push(UserWithStats {
            user: user_from_entity(record),
            hotel_count,
            reservation_count,
        });
    }

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn get_user(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ApiResponse<User>> {
    ensure_admin(&state.orm, user).await?;

    let record = Users::find_by_id(id).one(&state.orm).await?;
    let record = match record {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("User", user_from_entity(record), None))
}

pub async fn update_user(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: AdminUpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(&state.orm, user).await?;

    let record = Users::find_by_id(id).one(&state.orm).await?;
    let record = match record {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };

    let mut active: UserActive = record.clone().into();
    if let Some(email) = payload.email {
        let email = email.trim().to_lowercase();
        if email != record.email {
            let taken = Users::find()
                .filter(UserCol::Email.eq(email.clone()))
                .one(&state.orm)
                .await?;
            if taken.is_some() {
                return Err(AppError::Conflict("Email is already taken".into()));
            }
            active.email = Set(email);
        }
    }
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(address) = payload.address {
        active.address = Set(Some(address));
    }
    if let Some(is_admin) = payload.is_admin {
        active.is_admin = Set(is_admin);
    }
    if let Some(password) = payload.password.filter(|p| !p.is_empty()) {
        active.password_hash = Set(auth_service::hash_password(&password)?);
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "user_update",
        Some("users"),
        Some(serde_json::json!({ "target_user_id": updated.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "User updated",
        user_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_user(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(&state.orm, user).await?;
    if id == user.user_id {
        return Err(AppError::Forbidden);
    }

    let result = Users::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "user_delete",
        Some("users"),
        Some(serde_json::json!({ "target_user_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "User deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn promote_user(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<User>> {
    set_admin_flag(state, user, id, true, "user_promote").await
}

pub async fn demote_user(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<User>> {
    if id == user.user_id {
        return Err(AppError::Forbidden);
    }
    set_admin_flag(state, user, id, false, "user_demote").await
}

async fn set_admin_flag(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    is_admin: bool,
    action: &str,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(&state.orm, user).await?;

    let record = Users::find_by_id(id).one(&state.orm).await?;
    let record = match record {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };

    let mut active: UserActive = record.into();
    active.is_admin = Set(is_admin);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        action,
        Some("users"),
        Some(serde_json::json!({ "target_user_id": updated.id, "is_admin": is_admin })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let message = if is_admin {
        "User promoted to administrator"
    } else {
        "Administrator privileges removed"
    };
    Ok(ApiResponse::success(
        message,
        user_from_entity(updated),
        Some(Meta::empty()),
    ))
}

/// Aggregate counters, recomputed on every call.
pub async fn dashboard_stats(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<DashboardStats>> {
    ensure_admin(&state.orm, user).await?;

    let total_users = Users::find().count(&state.orm).await? as i64;
    let total_hotels = Hotels::find().count(&state.orm).await? as i64;
    let approved_hotels = Hotels::find()
        .filter(HotelCol::Status.eq(HotelStatus::Approved.as_str()))
        .count(&state.orm)
        .await? as i64;
    let pending_hotels = Hotels::find()
        .filter(HotelCol::Status.eq(HotelStatus::Pending.as_str()))
        .count(&state.orm)
        .await? as i64;
    let total_reservations = Reservations::find().count(&state.orm).await? as i64;
    let active_reservations = Reservations::find()
        .filter(ResCol::Status.eq(ReservationStatus::Active.as_str()))
        .count(&state.orm)
        .await? as i64;

    let stats = DashboardStats {
        total_users,
        total_hotels,
        approved_hotels,
        pending_hotels,
        total_reservations,
        active_reservations,
    };
    Ok(ApiResponse::success("Stats", stats, Some(Meta::empty())))
}

fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        name: model.name,
        phone: model.phone,
        address: model.address,
        is_admin: model.is_admin,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
