#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use cardpay_api::{
    build_router,
    config::AppConfig,
    services::{clock::FixedClock, gateways::GatewayRegistry, payments::PaymentService},
    AppState,
};
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;

/// The date every test request is processed on.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date")
}

/// Harness driving the full router in-process.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Simulated gateways that approve every attempt.
    pub fn new() -> Self {
        Self::with_gateways(GatewayRegistry::default())
    }

    pub fn with_gateways(gateways: GatewayRegistry) -> Self {
        let config = AppConfig::default();
        let payments = PaymentService::new(
            gateways,
            Arc::new(FixedClock(today())),
            config.latest_expiration_date,
        );
        let state = AppState::new(config, payments);
        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn get(&self, uri: &str) -> Response {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("failed to build request");
        self.send(request).await
    }

    /// Posts a URL-encoded form to `/`.
    pub async fn submit_form(&self, fields: &[(&str, &str)]) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(encode_form(fields)))
            .expect("failed to build request");
        self.send(request).await
    }

    pub async fn submit_json(&self, body: &Value) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/payments")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::to_vec(body).expect("failed to serialize json request body"),
            ))
            .expect("failed to build request");
        self.send(request).await
    }
}

/// A submission every validator accepts, for the given amount.
pub fn valid_form(amount: &'static str) -> Vec<(&'static str, &'static str)> {
    vec![
        ("CreditCardNumber", "4520850505051234"),
        ("CardHolder", "Andrew Jackson"),
        ("ExpirationDate", "2027-05-13"),
        ("SecurityCode", "123"),
        ("Amount", amount),
    ]
}

/// Replaces (or adds) one field of a submission.
pub fn with_field(
    mut fields: Vec<(&'static str, &'static str)>,
    name: &'static str,
    value: &'static str,
) -> Vec<(&'static str, &'static str)> {
    fields.retain(|(field, _)| *field != name);
    fields.push((name, value));
    fields
}

/// URL-encodes test values, which only ever contain alphanumerics, spaces,
/// dashes and points.
fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(name, value)| format!("{}={}", name, value.replace(' ', "+")))
        .collect::<Vec<_>>()
        .join("&")
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("body is not utf-8")
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body is not json")
}

pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}
