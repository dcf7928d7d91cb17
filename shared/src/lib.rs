//! Types shared between the slotcal frontend and backend.
//!
//! Everything that crosses the HTTP boundary lives here so both sides
//! serialize the same shapes, along with the availability validation core
//! used by the registration wizard.

use serde::{Deserialize, Serialize};

pub mod availability;

pub use availability::{AvailabilityError, NormalizedInterval, WeekdayInterval};

/// A registered user of the scheduling app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// URL handle, unique across the instance (lowercase letters, digits, hyphens)
    pub username: String,
    /// Display name shown on the scheduling page
    pub name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    /// Whether the user finished connecting their calendar provider
    pub calendar_connected: bool,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

/// Sign-in state as seen by the frontend.
///
/// The wizard never asks the auth provider directly; it reads this snapshot
/// and passes it into pages that need it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub signed_in: bool,
    pub username: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub calendar_connected: bool,
}

impl AuthSession {
    /// The signed-out placeholder returned before registration completes.
    pub fn signed_out() -> Self {
        Self {
            signed_in: false,
            username: None,
            name: None,
            avatar_url: None,
            calendar_connected: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterUserResponse {
    pub user: User,
    pub success_message: String,
}

/// Payload for saving a validated week of availability.
///
/// Wire shape: `{ "intervals": [{ "weekday": 1, "startTimeInMinutes": 480,
/// "endTimeInMinutes": 1080 }, ...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetTimeIntervalsRequest {
    pub intervals: Vec<NormalizedInterval>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetTimeIntervalsResponse {
    /// Number of interval rows stored for the user
    pub saved_count: usize,
    pub success_message: String,
}

/// Stored intervals for one user, weekday ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTimeIntervalsResponse {
    pub intervals: Vec<NormalizedInterval>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProfileResponse {
    pub user: User,
    pub success_message: String,
}

/// Log line forwarded from the frontend to the backend log stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRequest {
    pub level: String,
    pub message: String,
    pub component: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogResponse {
    pub success: bool,
}
