//! Payment processing backends.
//!
//! The three backends are simulated: they approve every attempt unless told
//! to decline a number of leading attempts, which is how retry behaviour is
//! exercised without a card network.

use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::config::SimulationConfig;
use crate::models::payment::{GatewayKind, GatewayResult, ValidatedPayment};

/// A backend that can be asked to charge a validated payment.
pub trait PaymentGateway: Send + Sync {
    fn kind(&self) -> GatewayKind;

    /// Submits one attempt. `attempt` starts at 1 for every payment.
    fn submit(&self, payment: &ValidatedPayment, attempt: u32) -> GatewayResult;
}

/// A declined attempt, carried through the retry loop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{gateway} declined: {message}")]
pub struct GatewayDecline {
    pub gateway: GatewayKind,
    pub message: String,
}

impl GatewayResult {
    pub fn into_result(self, gateway: GatewayKind) -> Result<String, GatewayDecline> {
        if self.succeeded {
            Ok(self.message)
        } else {
            Err(GatewayDecline {
                gateway,
                message: self.message,
            })
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SimulatedGateway {
    kind: GatewayKind,
    failing_attempts: u32,
}

impl SimulatedGateway {
    pub fn new(kind: GatewayKind) -> Self {
        Self {
            kind,
            failing_attempts: 0,
        }
    }

    /// Declines the first `failing_attempts` attempts of every payment.
    pub fn failing_first(kind: GatewayKind, failing_attempts: u32) -> Self {
        Self {
            kind,
            failing_attempts,
        }
    }
}

impl PaymentGateway for SimulatedGateway {
    fn kind(&self) -> GatewayKind {
        self.kind
    }

    fn submit(&self, payment: &ValidatedPayment, attempt: u32) -> GatewayResult {
        if attempt <= self.failing_attempts {
            info!(gateway = %self.kind, attempt, "simulated decline");
            return GatewayResult::declined(format!("simulated decline on attempt {}", attempt));
        }

        let message = confirmation_message(self.kind, payment);
        info!(gateway = %self.kind, attempt, card = %payment.card_number.masked(), "{}", message);
        GatewayResult::approved(message)
    }
}

/// `Processed Payment of $1,234.50 for JOHN DOE with PremiumPaymentGateway, Card ending in 1234`
pub fn confirmation_message(gateway: GatewayKind, payment: &ValidatedPayment) -> String {
    format!(
        "Processed Payment of {} for {} with {}, Card ending in {}",
        format_currency(payment.amount),
        payment.card_holder,
        gateway,
        payment.card_number.last_four()
    )
}

/// Dollar amount with thousands separators and two decimals.
pub fn format_currency(amount: Decimal) -> String {
    let mut cents = amount.abs().round_dp(2);
    cents.rescale(2);
    let rendered = cents.to_string();
    let (whole, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}${}.{}", sign, grouped, fraction)
}

/// One gateway per tier.
#[derive(Clone)]
pub struct GatewayRegistry {
    cheap: Arc<dyn PaymentGateway>,
    expensive: Arc<dyn PaymentGateway>,
    premium: Arc<dyn PaymentGateway>,
}

impl GatewayRegistry {
    pub fn simulated(simulation: &SimulationConfig) -> Self {
        Self {
            cheap: Arc::new(SimulatedGateway::failing_first(
                GatewayKind::Cheap,
                simulation.cheap_failing_attempts,
            )),
            expensive: Arc::new(SimulatedGateway::failing_first(
                GatewayKind::Expensive,
                simulation.expensive_failing_attempts,
            )),
            premium: Arc::new(SimulatedGateway::failing_first(
                GatewayKind::Premium,
                simulation.premium_failing_attempts,
            )),
        }
    }

    /// Replaces the gateway registered for `gateway.kind()`.
    pub fn with_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        match gateway.kind() {
            GatewayKind::Cheap => self.cheap = gateway,
            GatewayKind::Expensive => self.expensive = gateway,
            GatewayKind::Premium => self.premium = gateway,
        }
        self
    }

    pub fn get(&self, kind: GatewayKind) -> &dyn PaymentGateway {
        match kind {
            GatewayKind::Cheap => self.cheap.as_ref(),
            GatewayKind::Expensive => self.expensive.as_ref(),
            GatewayKind::Premium => self.premium.as_ref(),
        }
    }
}

impl Default for GatewayRegistry {
    fn default() -> Self {
        Self::simulated(&SimulationConfig::default())
    }
}

impl fmt::Debug for GatewayRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayRegistry")
            .field("cheap", &self.cheap.kind())
            .field("expensive", &self.expensive.kind())
            .field("premium", &self.premium.kind())
            .finish()
    }
}
