use crate::{middleware::jwt::authenticate, middleware::jwt::extract_token, state::AppState};
use axum::{
    Extension,
    extract::{
        Query,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use shared::{
    abstract_trait::{DynJwtService, DynNotifier, DynProfileService},
    domain::{
        event::{ADMIN_ORDERS_GROUP, SocketReply, reply_to_client, user_group},
        responses::Session,
    },
    errors::HttpError,
};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use utoipa_axum::router::OpenApiRouter;

#[derive(Debug, Default, Deserialize)]
pub struct SocketAuth {
    pub token: Option<String>,
}

/// Browsers cannot set headers on a WebSocket handshake, so the `token`
/// query parameter is checked before the cookie and the header.
fn socket_token(params: SocketAuth, cookie_jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    params
        .token
        .filter(|token| !token.trim().is_empty())
        .or_else(|| extract_token(cookie_jar, headers))
}

async fn socket_session(
    params: SocketAuth,
    cookie_jar: &CookieJar,
    headers: &HeaderMap,
    jwt: &DynJwtService,
    profile: &DynProfileService,
) -> Result<Session, HttpError> {
    let token = socket_token(params, cookie_jar, headers).ok_or_else(|| {
        HttpError::Unauthorized("You are not logged in, please provide token".to_string())
    })?;

    authenticate(jwt, profile, &token).await
}

async fn send_json<T: Serialize>(socket: &mut WebSocket, value: &T) -> Result<(), axum::Error> {
    let text = serde_json::to_string(value).map_err(axum::Error::new)?;
    socket.send(Message::Text(text.into())).await
}

async fn run_socket(
    mut socket: WebSocket,
    notifier: DynNotifier,
    group: String,
    user_id: i32,
    greeting: &'static str,
) {
    let mut events = notifier.subscribe(&group).await;

    info!("🔌 User {user_id} joined {group}");

    let hello = SocketReply::ConnectionEstablished {
        message: greeting.to_string(),
        user_id,
    };

    if send_json(&mut socket, &hello).await.is_ok() {
        loop {
            tokio::select! {
                incoming = socket.recv() => match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = reply_to_client(text.as_str()) {
                            if send_json(&mut socket, &reply).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                },
                event = events.recv() => match event {
                    Ok(event) => {
                        if send_json(&mut socket, &event).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Socket of user {user_id} lagged, {skipped} events skipped");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
    }

    drop(events);
    notifier.release(&group).await;

    debug!("🔌 User {user_id} left {group}");
}

pub async fn order_socket(
    ws: WebSocketUpgrade,
    Query(params): Query<SocketAuth>,
    cookie_jar: CookieJar,
    headers: HeaderMap,
    Extension(jwt): Extension<DynJwtService>,
    Extension(profile): Extension<DynProfileService>,
    Extension(notifier): Extension<DynNotifier>,
) -> Result<Response, HttpError> {
    let session = socket_session(params, &cookie_jar, &headers, &jwt, &profile).await?;
    let group = user_group(session.user_id);

    Ok(ws
        .on_upgrade(move |socket| {
            run_socket(
                socket,
                notifier,
                group,
                session.user_id,
                "Connected to order notifications",
            )
        })
        .into_response())
}

pub async fn admin_order_socket(
    ws: WebSocketUpgrade,
    Query(params): Query<SocketAuth>,
    cookie_jar: CookieJar,
    headers: HeaderMap,
    Extension(jwt): Extension<DynJwtService>,
    Extension(profile): Extension<DynProfileService>,
    Extension(notifier): Extension<DynNotifier>,
) -> Result<Response, HttpError> {
    let session = socket_session(params, &cookie_jar, &headers, &jwt, &profile).await?;

    if !session.is_admin() {
        return Err(HttpError::Forbidden(
            "Access denied. Required role: admin".to_string(),
        ));
    }

    Ok(ws
        .on_upgrade(move |socket| {
            run_socket(
                socket,
                notifier,
                ADMIN_ORDERS_GROUP.to_string(),
                session.user_id,
                "Connected to admin order notifications",
            )
        })
        .into_response())
}

pub fn websocket_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/ws/orders/", get(order_socket))
        .route("/ws/admin/orders/", get(admin_order_socket))
        .layer(Extension(app_state.di_container.notifier.clone()))
        .layer(Extension(app_state.di_container.profile_service.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header};
    use axum_extra::extract::cookie::Cookie;

    #[test]
    fn query_token_comes_first() {
        let jar = CookieJar::new().add(Cookie::new("token", "cookie-token"));
        let params = SocketAuth {
            token: Some("query-token".into()),
        };

        assert_eq!(
            socket_token(params, &jar, &HeaderMap::new()).as_deref(),
            Some("query-token")
        );
    }

    #[test]
    fn falls_back_to_cookie_then_header() {
        let jar = CookieJar::new().add(Cookie::new("token", "cookie-token"));
        assert_eq!(
            socket_token(SocketAuth { token: Some("  ".into()) }, &jar, &HeaderMap::new())
                .as_deref(),
            Some("cookie-token")
        );

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer header-token"),
        );
        assert_eq!(
            socket_token(SocketAuth::default(), &CookieJar::new(), &headers).as_deref(),
            Some("header-token")
        );
    }

    #[test]
    fn no_token_anywhere() {
        assert_eq!(
            socket_token(SocketAuth::default(), &CookieJar::new(), &HeaderMap::new()),
            None
        );
    }
}
