use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::contact::{MessageList, SendMessageRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::ContactMessage,
    response::ApiResponse,
    services::contact_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(send_message))
        .route("/minhas-mensagens", get(list_my_messages))
}

#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Message sent", body = ApiResponse<ContactMessage>),
        (status = 400, description = "Validation error"),
    ),
    security(("bearer_auth" = [])),
    tag = "Contact"
)]
pub async fn send_message(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SendMessageRequest>,
) -> AppResult<Json<ApiResponse<ContactMessage>>> {
    let resp = contact_service::send_message(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/contact/minhas-mensagens",
    responses(
        (status = 200, description = "Caller's messages", body = ApiResponse<MessageList>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Contact"
)]
pub async fn list_my_messages(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<MessageList>>> {
    let resp = contact_service::list_my_messages(&state, &user).await?;
    Ok(Json(resp))
}
