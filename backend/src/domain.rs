use crate::db::DbConnection;
use anyhow::{bail, Result};
use shared::{
    AuthSession, NormalizedInterval, RegisterUserRequest, UpdateProfileRequest, User,
    UserTimeIntervalsResponse,
};
use tracing::info;

const MIN_USERNAME_LEN: usize = 3;

/// Account and session operations for the registration flow
#[derive(Clone)]
pub struct UserService {
    db: DbConnection,
}

impl UserService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Create a user and sign them in.
    ///
    /// The username is the URL handle other people use to book time, so it
    /// has to be unique and URL-safe.
    pub async fn register_user(&self, request: RegisterUserRequest) -> Result<User> {
        info!("Registering user: {}", request.username);

        validate_username(&request.username)?;

        if request.name.trim().is_empty() {
            bail!("Please provide your full name.");
        }

        if self.db.get_user_by_username(&request.username).await?.is_some() {
            bail!("This username is already taken.");
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: request.username,
            name: request.name.trim().to_string(),
            bio: None,
            avatar_url: None,
            calendar_connected: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        self.db.insert_user(&user).await?;
        self.db.set_active_user(&user.id).await?;

        Ok(user)
    }

    /// Snapshot of the signed-in state, as the frontend consumes it
    pub async fn current_session(&self) -> Result<AuthSession> {
        let Some(user_id) = self.db.active_user_id().await? else {
            return Ok(AuthSession::signed_out());
        };

        match self.db.get_user(&user_id).await? {
            Some(user) => Ok(session_for(&user)),
            None => Ok(AuthSession::signed_out()),
        }
    }

    /// Record a successful calendar provider connection for the signed-in
    /// user. Returns None when nobody is signed in.
    pub async fn connect_calendar(&self) -> Result<Option<AuthSession>> {
        let Some(user_id) = self.db.active_user_id().await? else {
            return Ok(None);
        };

        self.db.mark_calendar_connected(&user_id).await?;

        match self.db.get_user(&user_id).await? {
            Some(user) => {
                info!("Calendar connected for user: {}", user.username);
                Ok(Some(session_for(&user)))
            }
            None => Ok(None),
        }
    }

    /// Update the signed-in user's bio. Returns None when nobody is signed in.
    pub async fn update_profile(&self, request: UpdateProfileRequest) -> Result<Option<User>> {
        let Some(user_id) = self.db.active_user_id().await? else {
            return Ok(None);
        };

        self.db.update_user_bio(&user_id, &request.bio).await?;

        Ok(self.db.get_user(&user_id).await?)
    }
}

/// Stored weekly availability for registered users
#[derive(Clone)]
pub struct AvailabilityService {
    db: DbConnection,
}

impl AvailabilityService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Replace the signed-in user's availability with the submitted week.
    /// Returns None when nobody is signed in.
    pub async fn set_time_intervals(
        &self,
        intervals: Vec<NormalizedInterval>,
    ) -> Result<Option<usize>> {
        let Some(user_id) = self.db.active_user_id().await? else {
            return Ok(None);
        };

        let count = self.db.replace_time_intervals(&user_id, &intervals).await?;
        info!("Stored {} time intervals for user {}", count, user_id);

        Ok(Some(count))
    }

    /// Stored intervals for a user, looked up by username.
    /// Returns None when the user doesn't exist.
    pub async fn intervals_for_username(
        &self,
        username: &str,
    ) -> Result<Option<UserTimeIntervalsResponse>> {
        let Some(user) = self.db.get_user_by_username(username).await? else {
            return Ok(None);
        };

        let intervals = self.db.time_intervals_for_user(&user.id).await?;
        Ok(Some(UserTimeIntervalsResponse { intervals }))
    }
}

fn session_for(user: &User) -> AuthSession {
    AuthSession {
        signed_in: true,
        username: Some(user.username.clone()),
        name: Some(user.name.clone()),
        avatar_url: user.avatar_url.clone(),
        calendar_connected: user.calendar_connected,
    }
}

fn validate_username(username: &str) -> Result<()> {
    if username.len() < MIN_USERNAME_LEN {
        bail!("The username must be at least 3 characters long.");
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        bail!("The username may only contain lowercase letters, digits and hyphens.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_services() -> (UserService, AvailabilityService) {
        let db = DbConnection::init_test().await.expect("Failed to init test DB");
        (UserService::new(db.clone()), AvailabilityService::new(db))
    }

    fn register_request(username: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            username: username.to_string(),
            name: "Jane Doe".to_string(),
        }
    }

    fn one_hour_monday() -> Vec<NormalizedInterval> {
        vec![NormalizedInterval {
            weekday: 1,
            start_time_in_minutes: 480,
            end_time_in_minutes: 1080,
        }]
    }

    #[tokio::test]
    async fn test_register_signs_the_user_in() {
        let (users, _) = create_test_services().await;

        let user = users.register_user(register_request("jane-doe")).await.unwrap();
        assert_eq!(user.username, "jane-doe");
        assert!(!user.calendar_connected);

        let session = users.current_session().await.unwrap();
        assert!(session.signed_in);
        assert_eq!(session.username.as_deref(), Some("jane-doe"));
    }

    #[tokio::test]
    async fn test_register_rejects_short_usernames() {
        let (users, _) = create_test_services().await;

        let result = users.register_user(register_request("jd")).await;
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least 3 characters"));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_characters() {
        let (users, _) = create_test_services().await;

        for username in ["Jane", "jane doe", "jane.doe", "jané"] {
            let result = users.register_user(register_request(username)).await;
            assert!(result.is_err(), "expected {:?} to be rejected", username);
        }
    }

    #[tokio::test]
    async fn test_register_rejects_taken_usernames() {
        let (users, _) = create_test_services().await;

        users.register_user(register_request("jane-doe")).await.unwrap();
        let result = users.register_user(register_request("jane-doe")).await;

        assert!(result.unwrap_err().to_string().contains("already taken"));
    }

    #[tokio::test]
    async fn test_register_rejects_blank_names() {
        let (users, _) = create_test_services().await;

        let request = RegisterUserRequest {
            username: "jane-doe".to_string(),
            name: "   ".to_string(),
        };
        assert!(users.register_user(request).await.is_err());
    }

    #[tokio::test]
    async fn test_session_defaults_to_signed_out() {
        let (users, _) = create_test_services().await;

        let session = users.current_session().await.unwrap();
        assert_eq!(session, AuthSession::signed_out());
    }

    #[tokio::test]
    async fn test_connect_calendar_without_session() {
        let (users, _) = create_test_services().await;

        let result = users.connect_calendar().await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_connect_calendar_updates_the_session() {
        let (users, _) = create_test_services().await;
        users.register_user(register_request("jane-doe")).await.unwrap();

        let session = users.connect_calendar().await.unwrap().unwrap();
        assert!(session.calendar_connected);

        // The flag sticks across session reads
        let session = users.current_session().await.unwrap();
        assert!(session.calendar_connected);
    }

    #[tokio::test]
    async fn test_update_profile_without_session() {
        let (users, _) = create_test_services().await;

        let request = UpdateProfileRequest { bio: "Hello".to_string() };
        assert_eq!(users.update_profile(request).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_profile_sets_bio() {
        let (users, _) = create_test_services().await;
        users.register_user(register_request("jane-doe")).await.unwrap();

        let request = UpdateProfileRequest {
            bio: "I schedule things.".to_string(),
        };
        let user = users.update_profile(request).await.unwrap().unwrap();

        assert_eq!(user.bio.as_deref(), Some("I schedule things."));
    }

    #[tokio::test]
    async fn test_set_time_intervals_without_session() {
        let (_, availability) = create_test_services().await;

        let result = availability.set_time_intervals(one_hour_monday()).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_set_time_intervals_replaces_previous_week() {
        let (users, availability) = create_test_services().await;
        users.register_user(register_request("jane-doe")).await.unwrap();

        availability.set_time_intervals(one_hour_monday()).await.unwrap();

        let new_week = vec![
            NormalizedInterval {
                weekday: 3,
                start_time_in_minutes: 540,
                end_time_in_minutes: 720,
            },
            NormalizedInterval {
                weekday: 5,
                start_time_in_minutes: 600,
                end_time_in_minutes: 840,
            },
        ];
        let count = availability.set_time_intervals(new_week.clone()).await.unwrap();
        assert_eq!(count, Some(2));

        let stored = availability
            .intervals_for_username("jane-doe")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.intervals, new_week);
    }

    #[tokio::test]
    async fn test_intervals_for_unknown_username() {
        let (_, availability) = create_test_services().await;

        let result = availability.intervals_for_username("nobody").await.unwrap();
        assert_eq!(result, None);
    }
}
