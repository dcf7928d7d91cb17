use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, Level};

mod db;
mod domain;
mod rest;

use domain::{AvailabilityService, UserService};
use rest::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Setting up database");
    let db = db::DbConnection::init().await?;

    // Set up our application state
    let state = AppState::new(
        UserService::new(db.clone()),
        AvailabilityService::new(db),
    );

    // CORS setup to allow the frontend dev server to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // Set up our application routes
    let api_routes = Router::new()
        .route("/users", post(rest::register_user))
        .route("/users/time-intervals", post(rest::set_time_intervals))
        .route("/users/profile", put(rest::update_profile))
        .route(
            "/users/:username/time-intervals",
            get(rest::get_user_time_intervals),
        )
        .route("/session", get(rest::get_session))
        .route("/session/connect-calendar", post(rest::connect_calendar))
        .route("/logs", post(rest::log_message));

    // Define our main application router
    let app = Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(PathBuf::from("../frontend/dist")))
        .layer(cors)
        .with_state(state);

    // Start the server
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
