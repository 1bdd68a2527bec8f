use chrono::NaiveDate;
use std::sync::Arc;
use strum::Display;
use tracing::{debug, error, info, instrument};

use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::models::payment::{PaymentFields, PaymentReceipt, ValidatedPayment};
use crate::services::clock::{Clock, SystemClock};
use crate::services::gateways::GatewayRegistry;
use crate::services::retry::{with_retry, RetryConfig};
use crate::services::routing;
use crate::services::validation;

/// Where a payment is in its single pass through the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStage {
    Received,
    Validating,
    Routing,
    Attempting,
    Succeeded,
    Failed,
}

/// Validates a payment submission and charges it through the gateway its
/// amount tier selects.
///
/// Holds no per-request state: every call runs start to finish on the
/// caller's thread, and concurrent calls never observe each other.
#[derive(Clone)]
pub struct PaymentService {
    gateways: GatewayRegistry,
    clock: Arc<dyn Clock>,
    latest_expiration: NaiveDate,
}

impl PaymentService {
    pub fn new(
        gateways: GatewayRegistry,
        clock: Arc<dyn Clock>,
        latest_expiration: NaiveDate,
    ) -> Self {
        Self {
            gateways,
            clock,
            latest_expiration,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            GatewayRegistry::simulated(&config.simulation),
            Arc::new(SystemClock),
            config.latest_expiration_date,
        )
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn latest_expiration(&self) -> NaiveDate {
        self.latest_expiration
    }

    /// Runs the field validators. No gateway is touched.
    pub fn validate(&self, fields: &PaymentFields) -> Result<ValidatedPayment, ServiceError> {
        validation::validate_payment(fields, self.clock.today(), self.latest_expiration)
    }

    /// Validates, routes and charges a payment.
    ///
    /// Field rejections come back as client errors before any gateway is
    /// called. Once routed, the tier's gateway is retried up to its budget;
    /// there is no fallback to another tier.
    #[instrument(skip_all, fields(amount = %fields.amount))]
    pub fn process_payment(&self, fields: &PaymentFields) -> Result<PaymentReceipt, ServiceError> {
        transition(PaymentStage::Received);
        transition(PaymentStage::Validating);

        let payment = match self.validate(fields) {
            Ok(payment) => payment,
            Err(err) => {
                transition(PaymentStage::Failed);
                if !err.is_client_error() {
                    error!(error = %err, "validation fault");
                }
                return Err(err);
            }
        };

        self.charge(&payment)
    }

    /// Routes an already validated payment and runs the attempt loop.
    pub fn charge(&self, payment: &ValidatedPayment) -> Result<PaymentReceipt, ServiceError> {
        transition(PaymentStage::Routing);
        let policy = routing::route(payment.amount);
        debug!(
            tier = %policy.tier,
            gateway = %policy.gateway,
            max_attempts = policy.max_attempts,
            "payment routed"
        );

        transition(PaymentStage::Attempting);
        let gateway = self.gateways.get(policy.gateway);
        let outcome = with_retry(RetryConfig::new(policy.max_attempts), |attempt| {
            gateway.submit(payment, attempt).into_result(policy.gateway)
        });

        match outcome {
            Ok((message, attempts)) => {
                transition(PaymentStage::Succeeded);
                info!(gateway = %policy.gateway, attempts, "payment processed");
                Ok(PaymentReceipt {
                    tier: policy.tier,
                    gateway: policy.gateway,
                    attempts,
                    message,
                })
            }
            Err(exhausted) => {
                transition(PaymentStage::Failed);
                error!(
                    gateway = %policy.gateway,
                    attempts = exhausted.attempts,
                    last_error = ?exhausted.last_error,
                    "Could not process payment with {}",
                    policy.gateway
                );
                Err(ServiceError::PaymentProcessorFailed {
                    gateway: policy.gateway,
                    attempts: exhausted.attempts,
                })
            }
        }
    }
}

fn transition(stage: PaymentStage) {
    debug!(stage = %stage, "payment stage");
}
