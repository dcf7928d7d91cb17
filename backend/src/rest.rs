//! HTTP endpoints for the registration flow.
//!
//! Handlers are a translation layer: they log the request, run basic input
//! checks, call a domain service and map the outcome to a status code. The
//! interval payload is revalidated here with the same shared rules the form
//! already ran, so a misbehaving client can't store an invalid week.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::availability::{self, DAYS_PER_WEEK};
use shared::{
    LogRequest, LogResponse, RegisterUserRequest, RegisterUserResponse, SetTimeIntervalsRequest,
    SetTimeIntervalsResponse, UpdateProfileRequest, UpdateProfileResponse,
};
use tracing::{debug, error, info, warn};

use crate::domain::{AvailabilityService, UserService};

/// Application state containing the UserService and AvailabilityService
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub availability_service: AvailabilityService,
}

impl AppState {
    pub fn new(user_service: UserService, availability_service: AvailabilityService) -> Self {
        Self {
            user_service,
            availability_service,
        }
    }
}

/// Axum handler function for POST /api/users
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> impl IntoResponse {
    info!("POST /api/users - username: {}", request.username);

    match state.user_service.register_user(request).await {
        Ok(user) => {
            let response = RegisterUserResponse {
                user,
                success_message: "Your account has been created!".to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Error registering user: {:?}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Axum handler function for GET /api/session
pub async fn get_session(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/session");

    match state.user_service.current_session().await {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(e) => {
            error!("Error reading session: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error reading session").into_response()
        }
    }
}

/// Axum handler function for POST /api/session/connect-calendar
pub async fn connect_calendar(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/session/connect-calendar");

    match state.user_service.connect_calendar().await {
        Ok(Some(session)) => (StatusCode::OK, Json(session)).into_response(),
        Ok(None) => (
            StatusCode::CONFLICT,
            "You need to create your account before connecting a calendar.",
        )
            .into_response(),
        Err(e) => {
            error!("Error connecting calendar: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error connecting calendar").into_response()
        }
    }
}

/// Axum handler function for POST /api/users/time-intervals
pub async fn set_time_intervals(
    State(state): State<AppState>,
    Json(request): Json<SetTimeIntervalsRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/users/time-intervals - {} intervals",
        request.intervals.len()
    );

    // Input checks before the domain layer: same rules the form ran
    if let Some(bad) = request
        .intervals
        .iter()
        .find(|i| usize::from(i.weekday) >= DAYS_PER_WEEK)
    {
        warn!("Rejecting interval with out-of-range weekday {}", bad.weekday);
        return (StatusCode::BAD_REQUEST, "Weekday must be between 0 and 6.").into_response();
    }
    if let Err(e) = availability::validate_normalized(&request.intervals) {
        warn!("Rejecting invalid interval payload: {}", e);
        return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
    }

    match state
        .availability_service
        .set_time_intervals(request.intervals)
        .await
    {
        Ok(Some(saved_count)) => {
            let response = SetTimeIntervalsResponse {
                saved_count,
                success_message: "Your availability has been saved!".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(None) => (
            StatusCode::CONFLICT,
            "You need to create your account before saving availability.",
        )
            .into_response(),
        Err(e) => {
            error!("Error storing time intervals: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error storing time intervals").into_response()
        }
    }
}

/// Axum handler function for PUT /api/users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Json(request): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    info!("PUT /api/users/profile");

    match state.user_service.update_profile(request).await {
        Ok(Some(user)) => {
            let response = UpdateProfileResponse {
                user,
                success_message: "Your profile is ready!".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, "No signed-in user.").into_response(),
        Err(e) => {
            error!("Error updating profile: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error updating profile").into_response()
        }
    }
}

/// Axum handler function for GET /api/users/:username/time-intervals
pub async fn get_user_time_intervals(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/time-intervals", username);

    match state
        .availability_service
        .intervals_for_username(&username)
        .await
    {
        Ok(Some(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "User not found.").into_response(),
        Err(e) => {
            error!("Error listing time intervals: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing time intervals").into_response()
        }
    }
}

/// Axum handler function for POST /api/logs. Forwards frontend log lines
/// into the backend log stream.
pub async fn log_message(Json(request): Json<LogRequest>) -> impl IntoResponse {
    let component = request.component.as_deref().unwrap_or("frontend");
    let message = format!("[{}] {}", component, request.message);

    match request.level.to_lowercase().as_str() {
        "debug" => debug!("{}", message),
        "info" => info!("{}", message),
        "warn" => warn!("{}", message),
        "error" => error!("{}", message),
        _ => info!("{}", message),
    }

    Json(LogResponse { success: true })
}
