use gloo::net::http::Request;
use shared::{
    AuthSession, RegisterUserRequest, RegisterUserResponse, SetTimeIntervalsRequest,
    SetTimeIntervalsResponse, UpdateProfileRequest, UpdateProfileResponse,
};

/// API client for communicating with the backend server
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self { base_url }
    }

    /// Get the current sign-in state
    pub async fn get_session(&self) -> Result<AuthSession, String> {
        let url = format!("{}/api/session", self.base_url);

        match Request::get(&url).send().await {
            Ok(response) => match response.json::<AuthSession>().await {
                Ok(data) => Ok(data),
                Err(e) => Err(format!("Failed to parse session: {}", e)),
            },
            Err(e) => Err(format!("Failed to fetch session: {}", e)),
        }
    }

    /// Create an account and sign in
    pub async fn register_user(
        &self,
        request: RegisterUserRequest,
    ) -> Result<RegisterUserResponse, String> {
        let url = format!("{}/api/users", self.base_url);

        match Request::post(&url)
            .json(&request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    match response.json::<RegisterUserResponse>().await {
                        Ok(data) => Ok(data),
                        Err(e) => Err(format!("Failed to parse response: {}", e)),
                    }
                } else {
                    let error_text = response.text().await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    Err(error_text)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Mark the signed-in user's calendar provider as connected
    pub async fn connect_calendar(&self) -> Result<AuthSession, String> {
        let url = format!("{}/api/session/connect-calendar", self.base_url);

        match Request::post(&url).send().await {
            Ok(response) => {
                if response.ok() {
                    match response.json::<AuthSession>().await {
                        Ok(data) => Ok(data),
                        Err(e) => Err(format!("Failed to parse response: {}", e)),
                    }
                } else {
                    let error_text = response.text().await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    Err(error_text)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Save the validated week of availability intervals
    pub async fn set_time_intervals(
        &self,
        request: SetTimeIntervalsRequest,
    ) -> Result<SetTimeIntervalsResponse, String> {
        let url = format!("{}/api/users/time-intervals", self.base_url);

        match Request::post(&url)
            .json(&request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    match response.json::<SetTimeIntervalsResponse>().await {
                        Ok(data) => Ok(data),
                        Err(e) => Err(format!("Failed to parse response: {}", e)),
                    }
                } else {
                    let error_text = response.text().await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    Err(error_text)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }

    /// Update the signed-in user's profile
    pub async fn update_profile(
        &self,
        request: UpdateProfileRequest,
    ) -> Result<UpdateProfileResponse, String> {
        let url = format!("{}/api/users/profile", self.base_url);

        match Request::put(&url)
            .json(&request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    match response.json::<UpdateProfileResponse>().await {
                        Ok(data) => Ok(data),
                        Err(e) => Err(format!("Failed to parse response: {}", e)),
                    }
                } else {
                    let error_text = response.text().await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    Err(error_text)
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
