//! Response envelope and error-to-status mapping

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use helpdesk_requests_core::SupportRequest;
use serde::Serialize;
use serde_json::json;
use tracing::error;

/// Successful register/login payload
#[derive(Debug, Serialize)]
pub struct AuthBody {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_partner: Option<bool>,
}

/// A single request, optionally with a message
#[derive(Debug, Serialize)]
pub struct RequestBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub request: SupportRequest,
}

/// A list of requests
#[derive(Debug, Serialize)]
pub struct RequestListBody {
    pub success: bool,
    pub requests: Vec<SupportRequest>,
}

/// Bare success/message payload
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub success: bool,
    pub message: String,
}

/// A failed operation, as status code plus the standard envelope.
///
/// Internal failures (storage, corrupt data, configuration) are logged in
/// full and surfaced to the caller with a generic message; nothing from
/// the storage layer or the signing setup leaks into responses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn internal(detail: impl std::fmt::Display) -> Self {
        error!(%detail, "internal error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        }
    }

    /// Map a body-extraction failure onto the envelope, keeping the
    /// framework's status (415 for a wrong Content-Type, 400 otherwise).
    pub fn from_rejection(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => Self {
                status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
                message: "Unsupported Media Type: application/json required".to_string(),
            },
            other => Self {
                status: StatusCode::BAD_REQUEST,
                message: format!("Malformed request body: {}", other.body_text()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

impl From<helpdesk_users_core::Error> for ApiError {
    fn from(e: helpdesk_users_core::Error) -> Self {
        use helpdesk_users_core::Error as E;

        let status = match &e {
            E::Validation(_) => StatusCode::BAD_REQUEST,
            E::Unauthorized | E::TokenInvalid | E::TokenExpired => StatusCode::UNAUTHORIZED,
            E::Forbidden => StatusCode::FORBIDDEN,
            E::NotFound(_) => StatusCode::NOT_FOUND,
            E::Conflict(_) => StatusCode::CONFLICT,
            E::Storage(_) | E::CorruptData(_) | E::Config(_) => {
                return ApiError::internal(e);
            }
        };

        ApiError {
            status,
            message: e.to_string(),
        }
    }
}

impl From<helpdesk_requests_core::Error> for ApiError {
    fn from(e: helpdesk_requests_core::Error) -> Self {
        use helpdesk_requests_core::Error as E;

        match e {
            E::Validation(m) => ApiError {
                status: StatusCode::BAD_REQUEST,
                message: m,
            },
            E::Forbidden => ApiError {
                status: StatusCode::FORBIDDEN,
                message: "Insufficient permissions".to_string(),
            },
            E::NotFound(what) => ApiError {
                status: StatusCode::NOT_FOUND,
                message: format!("{} not found", what),
            },
            E::Storage(_) => ApiError::internal(e),
            E::Auth(inner) => inner.into(),
        }
    }
}
