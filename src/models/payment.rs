use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use strum::{Display, EnumIter};
use utoipa::ToSchema;

/// Submitted payment fields, listed in the order the core validates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum PaymentField {
    #[strum(serialize = "CreditCardNumber")]
    CardNumber,
    CardHolder,
    ExpirationDate,
    Amount,
    SecurityCode,
}

/// Payment fields after the form layer has coerced them into real types.
///
/// Nothing here has passed the business rules yet; see
/// [`crate::services::validation::validate_payment`].
#[derive(Clone, PartialEq)]
pub struct PaymentFields {
    pub card_number: String,
    pub card_holder: String,
    pub expiration_date: NaiveDate,
    /// Empty when the caller did not provide one.
    pub security_code: String,
    pub amount: Decimal,
}

impl fmt::Debug for PaymentFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentFields")
            .field("card_number", &mask_digits(&self.card_number))
            .field("card_holder", &self.card_holder)
            .field("expiration_date", &self.expiration_date)
            .field("security_code", &redact(&self.security_code))
            .field("amount", &self.amount)
            .finish()
    }
}

/// Card number that matched one of the accepted scheme patterns.
///
/// Only the validator constructs these, and `Debug` never prints more than
/// the last four digits.
#[derive(Clone, PartialEq, Eq)]
pub struct CardNumber(String);

impl CardNumber {
    pub(crate) fn from_validated(digits: String) -> Self {
        Self(digits)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn last_four(&self) -> &str {
        // digits only, so byte offsets are char offsets
        &self.0[self.0.len().saturating_sub(4)..]
    }

    pub fn masked(&self) -> String {
        mask_digits(&self.0)
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum CardScheme {
    Visa,
    Mastercard,
    #[strum(serialize = "American Express")]
    Amex,
    Discover,
}

/// A payment request that satisfied every field validator.
#[derive(Clone, PartialEq)]
pub struct ValidatedPayment {
    pub card_number: CardNumber,
    pub scheme: CardScheme,
    /// Upper-cased `FIRST LAST`.
    pub card_holder: String,
    pub expiration_date: NaiveDate,
    pub security_code: Option<String>,
    /// Always carries exactly two fractional digits.
    pub amount: Decimal,
}

impl fmt::Debug for ValidatedPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedPayment")
            .field("card_number", &self.card_number)
            .field("scheme", &self.scheme)
            .field("card_holder", &self.card_holder)
            .field("expiration_date", &self.expiration_date)
            .field("security_code", &self.security_code.as_deref().map(redact))
            .field("amount", &self.amount)
            .finish()
    }
}

/// Amount band that selects a gateway and its retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tier {
    Low,
    Mid,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter, ToSchema)]
pub enum GatewayKind {
    #[strum(serialize = "CheapPaymentGateway")]
    #[serde(rename = "CheapPaymentGateway")]
    Cheap,
    #[strum(serialize = "ExpensivePaymentGateway")]
    #[serde(rename = "ExpensivePaymentGateway")]
    Expensive,
    #[strum(serialize = "PremiumPaymentGateway")]
    #[serde(rename = "PremiumPaymentGateway")]
    Premium,
}

/// Outcome of a single gateway attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResult {
    pub succeeded: bool,
    pub message: String,
}

impl GatewayResult {
    pub fn approved(message: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            message: message.into(),
        }
    }

    pub fn declined(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            message: message.into(),
        }
    }
}

/// Final record of an accepted payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaymentReceipt {
    pub tier: Tier,
    pub gateway: GatewayKind,
    /// Attempts spent, including the successful one.
    pub attempts: u32,
    pub message: String,
}

fn mask_digits(digits: &str) -> String {
    let visible = digits.chars().count().min(4);
    let hidden = digits.chars().count() - visible;
    let tail: String = digits.chars().skip(hidden).collect();
    format!("{}{}", "*".repeat(hidden), tail)
}

fn redact(value: &str) -> &'static str {
    if value.trim().is_empty() {
        ""
    } else {
        "***"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_number_debug_shows_only_last_four() {
        let card = CardNumber::from_validated("4520850505051234".into());
        assert_eq!(format!("{:?}", card), "************1234");
        assert_eq!(card.last_four(), "1234");
    }

    #[test]
    fn payment_fields_debug_masks_sensitive_values() {
        let fields = PaymentFields {
            card_number: "4520850505051234".into(),
            card_holder: "Andrew Jackson".into(),
            expiration_date: NaiveDate::from_ymd_opt(2027, 5, 13).unwrap(),
            security_code: "123".into(),
            amount: Decimal::new(5050, 2),
        };
        let rendered = format!("{:?}", fields);
        assert!(!rendered.contains("4520850505051234"));
        assert!(!rendered.contains("123\""));
        assert!(rendered.contains("1234"));
    }

    #[test]
    fn gateway_names_render_as_processor_names() {
        assert_eq!(GatewayKind::Cheap.to_string(), "CheapPaymentGateway");
        assert_eq!(GatewayKind::Expensive.to_string(), "ExpensivePaymentGateway");
        assert_eq!(GatewayKind::Premium.to_string(), "PremiumPaymentGateway");
        assert_eq!(PaymentField::CardNumber.to_string(), "CreditCardNumber");
    }
}
