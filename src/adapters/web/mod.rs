//! Web server adapter.
//!
//! Axum server with an HTMX-based frontend: a query form that posts the
//! symbol/date/parameter selection and swaps the rendered chart report in.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;

pub struct AppState {
    pub data_port: Arc<dyn MarketDataPort + Send + Sync>,
    pub config: Arc<dyn ConfigPort + Send + Sync>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/chart", post(handlers::chart))
        .nest_service("/static", ServeDir::new("static"))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
