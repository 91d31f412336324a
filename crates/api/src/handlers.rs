//! HTTP handlers for the account and request endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use helpdesk_users_core::{Identity, LoginRequest, RegisterRequest};
use serde::Deserialize;

use crate::response::{ApiError, AuthBody, MessageBody, RequestBody, RequestListBody};
use crate::AppState;

/// Request-creation payload
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateRequestBody {
    pub title: String,
    pub content: String,
    pub status: Option<String>,
}

/// Content-update payload
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateRequestBody {
    pub title: String,
    pub content: String,
}

/// Status-change payload
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusBody {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: Option<i64>,
}

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

async fn caller(state: &AppState, headers: &HeaderMap) -> Result<Identity, ApiError> {
    Ok(state.auth.authenticate(authorization(headers)).await?)
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload.map_err(ApiError::from_rejection)?;
    let outcome = state.auth.register(&req).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthBody {
            success: true,
            message: "Registration complete".to_string(),
            token: outcome.token,
            user_id: outcome.user_id,
            is_partner: None,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload.map_err(ApiError::from_rejection)?;
    let outcome = state.auth.login(&req).await?;

    Ok(Json(AuthBody {
        success: true,
        message: "Logged in".to_string(),
        token: outcome.token,
        user_id: outcome.user_id,
        is_partner: Some(outcome.is_partner),
    }))
}

pub async fn create_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateRequestBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = caller(&state, &headers).await?;
    let Json(body) = payload.map_err(ApiError::from_rejection)?;

    let request = state
        .requests
        .create(&identity, &body.title, &body.content, body.status.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RequestBody {
            success: true,
            message: Some("Request created".to_string()),
            request,
        }),
    ))
}

pub async fn get_single_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    caller(&state, &headers).await?;
    let request = state.requests.get(id).await?;

    Ok(Json(RequestBody {
        success: true,
        message: None,
        request,
    }))
}

/// Broad read: every request, no authentication. Kept deliberately open
/// for the public listing view.
pub async fn list_all_requests(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let requests = state.requests.list_all().await?;

    Ok(Json(RequestListBody {
        success: true,
        requests,
    }))
}

pub async fn list_my_requests(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<OwnerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = caller(&state, &headers).await?;
    let requests = state.requests.list_mine(&identity, query.user_id).await?;

    Ok(Json(RequestListBody {
        success: true,
        requests,
    }))
}

pub async fn update_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateRequestBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    caller(&state, &headers).await?;
    let Json(body) = payload.map_err(ApiError::from_rejection)?;

    let request = state
        .requests
        .update_content(id, &body.title, &body.content)
        .await?;

    Ok(Json(RequestBody {
        success: true,
        message: Some("Request updated".to_string()),
        request,
    }))
}

pub async fn delete_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = caller(&state, &headers).await?;
    state.requests.delete(&identity, id).await?;

    Ok(Json(MessageBody {
        success: true,
        message: "Request deleted".to_string(),
    }))
}

pub async fn delete_request_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = caller(&state, &headers).await?;
    state.requests.delete_as_admin(&identity, id).await?;

    Ok(Json(MessageBody {
        success: true,
        message: format!("Request {} deleted by administrator", id),
    }))
}

pub async fn update_request_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    payload: Result<Json<StatusBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = caller(&state, &headers).await?;
    let Json(body) = payload.map_err(ApiError::from_rejection)?;

    let request = state
        .requests
        .change_status(&identity, id, &body.status)
        .await?;

    Ok(Json(RequestBody {
        success: true,
        message: Some(format!("Request {} status set to \"{}\"", id, request.status)),
        request,
    }))
}

pub async fn list_requests_by_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(status): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = caller(&state, &headers).await?;
    let requests = state.requests.list_by_status(&identity, &status).await?;

    Ok(Json(RequestListBody {
        success: true,
        requests,
    }))
}
