use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Identity Schemas ---

/// User
///
/// The signed-in user as carried by a session. Only the id is guaranteed; the
/// profile fields come from the identity provider and may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    // Avatar URL.
    pub image: Option<String>,
}

/// Session
///
/// Output schema of `GET /api/auth/session`: the resolved user plus the instant
/// the underlying token stops being accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Session {
    pub user: User,
    #[ts(type = "string")]
    pub expires: DateTime<Utc>,
}

// --- Response Envelope ---

/// ApiResponse
///
/// Generic JSON envelope for API endpoints. Absent fields are omitted entirely
/// rather than serialized as `null`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export, bound = "T: TS")]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub message: Option<String>,
}
