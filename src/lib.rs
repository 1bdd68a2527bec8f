//! CardPay API Library
//!
//! Validates card payments and charges them through an amount-tiered set of
//! payment gateways.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod models;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};

use crate::config::AppConfig;
use crate::services::payments::PaymentService;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub payments: Arc<PaymentService>,
}

impl AppState {
    pub fn new(config: AppConfig, payments: PaymentService) -> Self {
        Self {
            config: Arc::new(config),
            payments: Arc::new(payments),
        }
    }

    /// State wired to the simulated gateways and the system clock.
    pub fn from_config(config: AppConfig) -> Self {
        let payments = PaymentService::from_config(&config);
        Self::new(config, payments)
    }
}

/// Builds the CORS layer from configuration.
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins()
        .into_iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    } else if config.should_allow_permissive_cors() {
        ::tracing::info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if config.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        CorsLayer::permissive()
    } else {
        ::tracing::warn!("No CORS origins configured; cross-origin requests will be refused");
        CorsLayer::new()
    }
}

/// Full application router with its middleware stack.
///
/// Layers, outermost first: request id, HTTP trace, CORS, timeout, body limit.
pub fn build_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    Router::<AppState>::new()
        .merge(handlers::routes())
        .merge(openapi::swagger_ui())
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(cors_layer(&config))
        .layer(crate::tracing::configure_http_tracing())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}
