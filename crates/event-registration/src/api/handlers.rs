//! HTTP request handlers.

use super::types::{
    DateQuery, LoginRequest, LoginResponse, RegistrationRequest, TokenVerifyRequest,
    TokenVerifyResponse,
};
use super::AppState;
use crate::error::ApiError;
use crate::registration::client_ip;
use axum::{
    async_trait,
    body::{Body, Bytes},
    extract::{ConnectInfo, FromRequest, Query, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use registration_store::StoredRecord;
use serde::de::DeserializeOwned;
use std::net::SocketAddr;
use tracing::{debug, info};

/// Request body accepted as JSON or as a url-encoded form post.
///
/// A request without a `Content-Type` is read as JSON when it has a body and
/// as `T::default()` when it has none.
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        match content_type {
            Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
                let Form(body) = Form::<T>::from_request(req, state)
                    .await
                    .map_err(IntoResponse::into_response)?;
                Ok(Self(body))
            }
            Some(_) => {
                let Json(body) = Json::<T>::from_request(req, state)
                    .await
                    .map_err(IntoResponse::into_response)?;
                Ok(Self(body))
            }
            None => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(IntoResponse::into_response)?;
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Self(T::default()));
                }
                serde_json::from_slice(&bytes)
                    .map(Self)
                    .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()).into_response())
            }
        }
    }
}

/// Health check endpoint.
pub async fn health(headers: HeaderMap) -> (StatusCode, &'static str) {
    debug!(?headers, "Health check");
    (StatusCode::OK, "healthy!!!")
}

/// Store a registration with the caller's address.
pub async fn submit_registration(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    JsonOrForm(request): JsonOrForm<RegistrationRequest>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let ip = client_ip(&headers, connect_info.map(|ConnectInfo(addr)| addr));
    info!(ip = %ip, "Registration request received");

    state
        .registrations
        .submit(request.table_number, request.name, request.phone_number, ip)
        .await?;

    Ok((StatusCode::OK, "Registration successful"))
}

/// The most recent registration, as a one-element (or empty) array.
pub async fn latest_submission(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    let records = state.exports.latest(1).await?;
    debug!("Latest submission retrieved");
    Ok(Json(records))
}

/// Records for the admin page, optionally narrowed by `?date=`.
pub async fn admin_records(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    let records = state.exports.query(query.date.as_deref()).await?;
    info!(date = ?query.date, count = records.len(), "Admin records retrieved");
    Ok(Json(records))
}

/// CSV download of the admin records.
pub async fn download(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Response, ApiError> {
    let artifact = state.exports.export_csv(query.date.as_deref()).await?;

    let disposition = format!("attachment; filename=\"{}\"", artifact.download_name());
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|e| ApiError::FileIo(format!("Invalid download name: {}", e)))?;

    info!(date = ?query.date, file = %artifact.download_name(), "Sending export file");

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(artifact.into_stream()),
    )
        .into_response())
}

/// Admin login.
pub async fn login(
    State(state): State<AppState>,
    JsonOrForm(request): JsonOrForm<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let token = state.sessions.login(&request.username, &request.password)?;
    Ok(Json(LoginResponse {
        success: true,
        token,
    }))
}

/// Admin token verification.
pub async fn token_verify(
    State(state): State<AppState>,
    JsonOrForm(request): JsonOrForm<TokenVerifyRequest>,
) -> Result<Json<TokenVerifyResponse>, ApiError> {
    let claims = state.sessions.verify_token(&request.present_token)?;
    Ok(Json(TokenVerifyResponse {
        success: true,
        date: claims,
    }))
}
