//! HTTP front end for campusrecords.
//!
//! An axum router over a shared [`DataStore`]. Pages are rendered with
//! askama; anything that matches no route is served from the static
//! directory, and what is not there gets the 404 page.

pub mod nav;
pub mod pages;

use std::path::Path;
use std::sync::Arc;

use axum::handler::HandlerWithoutStateExt;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::store::DataStore;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The initialized data store.
    pub store: Arc<DataStore>,
}

impl AppState {
    /// Wrap a store for sharing across handlers.
    #[must_use]
    pub fn new(store: Arc<DataStore>) -> Self {
        Self { store }
    }
}

/// Build the application router.
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let static_files = ServeDir::new(static_dir.as_ref())
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(pages::not_found.into_service());

    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/htmlDemo", get(pages::html_demo))
        .route("/students", get(pages::students))
        .route(
            "/students/add",
            get(pages::add_student_form).post(pages::add_student),
        )
        .route("/courses", get(pages::courses))
        .route("/course/:id", get(pages::course))
        .route("/student/update", post(pages::update_student))
        .route("/student/:studentNum", get(pages::student))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the address is invalid or cannot be bound.
pub async fn serve(config: &Config, store: Arc<DataStore>) -> Result<()> {
    let addr = config.bind_addr()?;
    let app = create_router(AppState::new(store), &config.server.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("server listening on port: {}", addr.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
