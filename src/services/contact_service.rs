use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::contact::{ContactMessageView, MessageList, SendMessageRequest},
    entity::{
        contact_messages::{
            ActiveModel as MessageActive, Column as MsgCol, Entity as ContactMessages,
            Model as MessageModel,
        },
        hotels::Entity as Hotels,
        reservations::Entity as Reservations,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::ContactMessage,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn send_message(
    state: &AppState,
    user: &AuthUser,
    payload: SendMessageRequest,
) -> AppResult<ApiResponse<ContactMessage>> {
    if payload.subject.trim().is_empty() || payload.body.trim().is_empty() {
        return Err(AppError::Validation(
            "Subject and message body are required".into(),
        ));
    }

    let message = MessageActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        reservation_id: Set(payload.reservation_id),
        subject: Set(payload.subject.trim().to_string()),
        body: Set(payload.body.trim().to_string()),
        status: Set("pending".to_string()),
        reply: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "contact_send",
        Some("contact_messages"),
        Some(serde_json::json!({ "message_id": message.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Message sent. An administrator will be in touch shortly.",
        message_from_entity(message),
        Some(Meta::empty()),
    ))
}

pub async fn list_my_messages(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<MessageList>> {
    let rows = ContactMessages::find()
        .filter(MsgCol::UserId.eq(user.user_id))
        .order_by_desc(MsgCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let hotel_name = match row.reservation_id {
            Some(reservation_id) => hotel_name_for(state, reservation_id).await?,
            None => None,
        };
        items.push(ContactMessageView {
            message: message_from_entity(row),
            hotel_name,
        });
    }

    Ok(ApiResponse::success(
        "Messages",
        MessageList { items },
        Some(Meta::empty()),
    ))
}

async fn hotel_name_for(state: &AppState, reservation_id: Uuid) -> AppResult<Option<String>> {
    let reservation = Reservations::find_by_id(reservation_id)
        .one(&state.orm)
        .await?;
    let Some(reservation) = reservation else {
        return Ok(None);
    };
    if let Some(hotel_id) = reservation.hotel_id {
        if let Some(hotel) = Hotels::find_by_id(hotel_id).one(&state.orm).await? {
            return Ok(Some(hotel.name));
        }
    }
    Ok(reservation.hotel_name_backup)
}

fn message_from_entity(model: MessageModel) -> ContactMessage {
    ContactMessage {
        id: model.id,
        user_id: model.user_id,
        reservation_id: model.reservation_id,
        subject: model.subject,
        body: model.body,
        status: model.status,
        reply: model.reply,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
