use axum::{
    extract::{rejection::FormRejection, rejection::JsonRejection, Form, Json, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tracing::{error, warn};

use crate::errors::ServiceError;
use crate::handlers::forms::{PaymentForm, PAYMENT_FORM_HTML};
use crate::models::payment::PaymentReceipt;
use crate::AppState;

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(render_form).post(submit_payment_form))
        .route("/api/v1/payments", post(submit_payment_json))
}

/// Serves the payment form.
pub async fn render_form() -> Html<&'static str> {
    Html(PAYMENT_FORM_HTML)
}

/// Processes a URL-encoded form submission.
///
/// Success is a plain-text confirmation naming the gateway that charged the
/// card.
pub async fn submit_payment_form(
    State(state): State<AppState>,
    form: Result<Form<PaymentForm>, FormRejection>,
) -> Response {
    let outcome = form
        .map_err(|rejection| ServiceError::MalformedForm(rejection.body_text()))
        .and_then(|Form(form)| process(&state, form));

    match outcome {
        Ok(receipt) => (StatusCode::OK, receipt.message).into_response(),
        Err(err) => failure(err),
    }
}

/// Process a card payment
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    request_body = PaymentForm,
    responses(
        (status = 200, description = "Payment processed", body = PaymentReceipt,
            headers(
                ("X-Request-Id" = String, description = "Unique request identifier"),
            )
        ),
        (status = 400, description = "The request is invalid", body = String, content_type = "text/plain"),
        (status = 500, description = "Internal server error, or the gateway gave up", body = String, content_type = "text/plain")
    ),
    tag = "Payments"
)]
pub async fn submit_payment_json(
    State(state): State<AppState>,
    payload: Result<Json<PaymentForm>, JsonRejection>,
) -> Response {
    let outcome = payload
        .map_err(|rejection| ServiceError::MalformedForm(rejection.body_text()))
        .and_then(|Json(form)| process(&state, form));

    match outcome {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(err) => failure(err),
    }
}

fn process(state: &AppState, form: PaymentForm) -> Result<PaymentReceipt, ServiceError> {
    let payments = &state.payments;
    let fields = form.coerce(payments.today(), payments.latest_expiration())?;
    payments.process_payment(&fields)
}

fn failure(err: ServiceError) -> Response {
    if err.is_client_error() {
        warn!(error = %err, "payment request rejected");
    } else {
        error!(error = %err, "payment request failed");
    }
    err.into_response()
}
