//! Field validators for a card payment submission.
//!
//! Each validator accepts one coerced field and either returns its normalized
//! form or a [`FieldRejection`]. Malformed input is never an error in the
//! `Err(ServiceError::InternalError)` sense; that variant is reserved for
//! faults the rules themselves cannot explain.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::errors::{FieldRejection, ServiceError};
use crate::models::payment::{
    CardNumber, CardScheme, PaymentField, PaymentFields, ValidatedPayment,
};

/// Lengths a card number may have once spaces are removed.
pub const CARD_NUMBER_LENGTHS: [usize; 3] = [13, 15, 16];

/// Shortest holder name worth matching: two letters, a space, two letters.
const MIN_CARD_HOLDER_LEN: usize = 5;

/// Fractional digits every accepted amount is quantized to.
pub const AMOUNT_SCALE: u32 = 2;

/// Significant digits available when quantizing an amount.
pub const AMOUNT_PRECISION: usize = 8;

pub const SECURITY_CODE_LEN: usize = 3;

static CARD_HOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2,24} [A-Z]{2,24}$").expect("card holder pattern compiles"));

static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{1,6}\.[0-9]{1,2}$").expect("amount pattern compiles"));

/// Removes spaces and checks length, digits and scheme prefix.
///
/// No checksum is computed; any number matching a scheme pattern is assumed
/// to be well formed.
pub fn validate_card_number(raw: &str) -> Result<(CardNumber, CardScheme), FieldRejection> {
    let digits: String = raw.trim().chars().filter(|c| *c != ' ').collect();

    if !CARD_NUMBER_LENGTHS.contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(FieldRejection::new(
            PaymentField::CardNumber,
            format!("expected 13, 15 or 16 digits, got {} characters", digits.len()),
        ));
    }

    let scheme = match_scheme(&digits).ok_or_else(|| {
        FieldRejection::new(PaymentField::CardNumber, "no card scheme matches prefix and length")
    })?;

    Ok((CardNumber::from_validated(digits), scheme))
}

fn match_scheme(digits: &str) -> Option<CardScheme> {
    match digits.len() {
        13 | 16 if digits.starts_with('4') => Some(CardScheme::Visa),
        16 if digits.starts_with('5') => Some(CardScheme::Mastercard),
        15 if digits.starts_with("34") || digits.starts_with("37") => Some(CardScheme::Amex),
        16 if digits.starts_with('6') => Some(CardScheme::Discover),
        _ => None,
    }
}

/// Upper-cases and trims the holder, then requires `FIRST LAST`.
pub fn validate_card_holder(raw: &str) -> Result<String, FieldRejection> {
    let holder = raw.trim().to_uppercase();

    if holder.chars().count() < MIN_CARD_HOLDER_LEN {
        return Err(FieldRejection::new(PaymentField::CardHolder, "name too short"));
    }
    if !CARD_HOLDER_RE.is_match(&holder) {
        return Err(FieldRejection::new(
            PaymentField::CardHolder,
            "expected two alphabetic names separated by one space",
        ));
    }

    Ok(holder)
}

/// Rejects dates before `today` or after `latest`.
pub fn validate_expiration_date(
    date: NaiveDate,
    today: NaiveDate,
    latest: NaiveDate,
) -> Result<NaiveDate, FieldRejection> {
    if date < today {
        return Err(FieldRejection::new(PaymentField::ExpirationDate, "card has expired"));
    }
    if date > latest {
        return Err(FieldRejection::new(
            PaymentField::ExpirationDate,
            format!("expiration later than {}", latest),
        ));
    }
    Ok(date)
}

/// Checks the amount's textual form and quantizes it to two decimals.
///
/// The amount must be unsigned and render as 1-6 integer digits, a point and
/// 1-2 fractional digits, so negatives (including `-0.00`), integers without
/// a point and over-precise values are all rejected.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, ServiceError> {
    // Display drops the sign of a negative zero, so check it separately.
    if amount.is_sign_negative() {
        return Err(FieldRejection::new(PaymentField::Amount, "amount is negative").into());
    }
    let rendered = amount.to_string();
    if !AMOUNT_RE.is_match(&rendered) {
        return Err(FieldRejection::new(
            PaymentField::Amount,
            format!("amount {} does not match the currency pattern", rendered),
        )
        .into());
    }
    quantize_amount(amount)
}

/// Rounds half-to-even at two decimals and pins the scale to exactly two.
///
/// Fails when the result needs more than [`AMOUNT_PRECISION`] significant
/// digits.
pub fn quantize_amount(amount: Decimal) -> Result<Decimal, ServiceError> {
    let mut quantized =
        amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointNearestEven);
    quantized.rescale(AMOUNT_SCALE);

    let significant = quantized.mantissa().unsigned_abs().to_string().len();
    if significant > AMOUNT_PRECISION {
        return Err(ServiceError::InternalError(format!(
            "amount needs {} significant digits, precision is {}",
            significant, AMOUNT_PRECISION
        )));
    }
    Ok(quantized)
}

/// Blank means "not provided"; anything else must be exactly three digits.
pub fn validate_security_code(raw: &str) -> Result<Option<String>, FieldRejection> {
    let code = raw.trim();
    if code.is_empty() {
        return Ok(None);
    }
    if code.len() != SECURITY_CODE_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldRejection::new(
            PaymentField::SecurityCode,
            "security code must be exactly 3 digits",
        ));
    }
    Ok(Some(code.to_string()))
}

/// Runs every validator in the fixed order card number, card holder,
/// expiration date, amount, security code. The first failure wins.
pub fn validate_payment(
    fields: &PaymentFields,
    today: NaiveDate,
    latest_expiration: NaiveDate,
) -> Result<ValidatedPayment, ServiceError> {
    let (card_number, scheme) = validate_card_number(&fields.card_number).map_err(reject)?;
    debug!(scheme = %scheme, card = %card_number.masked(), "card number accepted");

    let card_holder = validate_card_holder(&fields.card_holder).map_err(reject)?;
    let expiration_date =
        validate_expiration_date(fields.expiration_date, today, latest_expiration).map_err(reject)?;
    let amount = validate_amount(fields.amount).map_err(traced)?;
    let security_code = validate_security_code(&fields.security_code).map_err(reject)?;

    Ok(ValidatedPayment {
        card_number,
        scheme,
        card_holder,
        expiration_date,
        security_code,
        amount,
    })
}

fn reject(rejection: FieldRejection) -> ServiceError {
    traced(ServiceError::InvalidField(rejection))
}

fn traced(err: ServiceError) -> ServiceError {
    if let ServiceError::InvalidField(rejection) = &err {
        debug!(field = %rejection.field, reason = %rejection.reason, "field rejected");
    }
    err
}
