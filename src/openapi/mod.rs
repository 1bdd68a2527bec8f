use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CardPay API",
        version = "1.0.0",
        description = r#"
# CardPay

Accepts a card payment, validates it, and charges it through the gateway
selected by the amount:

- up to 20.00: `CheapPaymentGateway`, one attempt
- above 20.00 and below 501.00: `ExpensivePaymentGateway`, up to two attempts
- 501.00 and above: `PremiumPaymentGateway`, up to three attempts

Errors are plain text and deliberately coarse: `The request is invalid`,
`Internal server error`, or `Internal server error: PaymentProcessor Failed`.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Payments", description = "Payment processing endpoints"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::payments::submit_payment_json,
        crate::handlers::health::liveness_check,
    ),
    components(
        schemas(
            crate::handlers::forms::PaymentForm,
            crate::handlers::health::LivenessResponse,
            crate::models::payment::PaymentReceipt,
            crate::models::payment::Tier,
            crate::models::payment::GatewayKind,
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_payment_endpoint() {
        let json = serde_json::to_string_pretty(&ApiDocV1::openapi()).unwrap();
        assert!(json.contains("CardPay API"));
        assert!(json.contains("/api/v1/payments"));
        assert!(json.contains("CreditCardNumber"));
        assert!(json.contains("PremiumPaymentGateway"));
    }
}
