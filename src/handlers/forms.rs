//! The submission form: raw strings in, typed [`PaymentFields`] out.
//!
//! These checks mirror the constraints of the HTML form. They run before the
//! payment service sees anything, and any failure is a 400.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::errors::ServiceError;
use crate::models::payment::PaymentFields;

const EXPIRATION_DATE_FORMAT: &str = "%Y-%m-%d";
const MIN_CARD_DIGITS: usize = 13;
const MAX_CARD_DIGITS: usize = 16;

#[derive(Clone, Default, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "CreditCardNumber": "4520850505051234",
    "CardHolder": "Andrew Jackson",
    "ExpirationDate": "2027-05-13",
    "SecurityCode": "123",
    "Amount": "50.50"
}))]
pub struct PaymentForm {
    /// Card number; spaces are ignored
    #[serde(rename = "CreditCardNumber", default)]
    #[validate(custom = "validate_card_number_length")]
    pub credit_card_number: String,

    #[serde(rename = "CardHolder", default)]
    #[validate(length(min = 5, max = 49))]
    pub card_holder: String,

    /// `YYYY-MM-DD`
    #[serde(rename = "ExpirationDate", default)]
    #[validate(length(min = 1))]
    pub expiration_date: String,

    /// Optional; three characters when given
    #[serde(rename = "SecurityCode", default)]
    #[validate(custom = "validate_optional_security_code")]
    pub security_code: String,

    /// Decimal amount with a point, e.g. `50.50`
    #[serde(rename = "Amount", default)]
    #[validate(length(min = 1))]
    pub amount: String,
}

impl std::fmt::Debug for PaymentForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentForm")
            .field("card_holder", &self.card_holder)
            .field("expiration_date", &self.expiration_date)
            .field("amount", &self.amount)
            .finish_non_exhaustive()
    }
}

fn validate_card_number_length(value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().filter(|c| *c != ' ').count();
    if (MIN_CARD_DIGITS..=MAX_CARD_DIGITS).contains(&digits) {
        Ok(())
    } else {
        let mut err = ValidationError::new("length");
        err.message = Some("card number must be 13 to 16 characters".into());
        Err(err)
    }
}

fn validate_optional_security_code(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.chars().count() == 3 {
        Ok(())
    } else {
        let mut err = ValidationError::new("length");
        err.message = Some("security code must be 3 characters".into());
        Err(err)
    }
}

impl PaymentForm {
    /// Checks the form constraints and coerces the submission into typed
    /// fields. `today` and `latest` bound the expiration date.
    pub fn coerce(self, today: NaiveDate, latest: NaiveDate) -> Result<PaymentFields, ServiceError> {
        self.validate()?;

        let expiration_date =
            NaiveDate::parse_from_str(self.expiration_date.trim(), EXPIRATION_DATE_FORMAT)
                .map_err(|e| ServiceError::MalformedForm(format!("ExpirationDate: {}", e)))?;
        if expiration_date < today || expiration_date > latest {
            return Err(ServiceError::MalformedForm(format!(
                "ExpirationDate must be between {} and {}",
                today, latest
            )));
        }

        let amount = Decimal::from_str(self.amount.trim())
            .map_err(|e| ServiceError::MalformedForm(format!("Amount: {}", e)))?;

        Ok(PaymentFields {
            card_number: self.credit_card_number,
            card_holder: self.card_holder,
            expiration_date,
            security_code: self.security_code,
            amount,
        })
    }
}

/// Static HTML page served on `GET /`.
pub const PAYMENT_FORM_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Process Payment</title>
</head>
<body>
  <h1>Process Payment</h1>
  <form method="post" action="/">
    <label>Credit Card Number
      <input name="CreditCardNumber" required minlength="13" maxlength="19">
    </label>
    <label>Card Holder
      <input name="CardHolder" required minlength="5" maxlength="49">
    </label>
    <label>Expiration Date
      <input name="ExpirationDate" type="date" required>
    </label>
    <label>Security Code
      <input name="SecurityCode" minlength="3" maxlength="3">
    </label>
    <label>Amount
      <input name="Amount" required>
    </label>
    <button type="submit">Pay</button>
  </form>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;
    use rstest::{fixture, rstest};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[fixture]
    fn form() -> PaymentForm {
        PaymentForm {
            credit_card_number: "4520 8505 0505 1234".into(),
            card_holder: "Andrew Jackson".into(),
            expiration_date: "2027-05-13".into(),
            security_code: "123".into(),
            amount: "50.50".into(),
        }
    }

    fn coerce(form: PaymentForm) -> Result<PaymentFields, ServiceError> {
        form.coerce(date(2026, 10, 16), date(2030, 12, 31))
    }

    #[rstest]
    fn coerces_a_valid_submission(form: PaymentForm) {
        let fields = coerce(form).unwrap();
        assert_eq!(fields.card_number, "4520 8505 0505 1234");
        assert_eq!(fields.expiration_date, date(2027, 5, 13));
        assert_eq!(fields.amount, dec!(50.50));
        assert_eq!(fields.amount.to_string(), "50.50");
    }

    #[rstest]
    #[case::too_few_digits("452085050505")]
    #[case::too_many_digits("45208505050512345")]
    #[case::missing("")]
    fn rejects_card_number_length(mut form: PaymentForm, #[case] number: &str) {
        form.credit_card_number = number.into();
        assert_matches!(coerce(form), Err(ServiceError::MalformedForm(_)));
    }

    #[rstest]
    #[case::too_short("Ann")]
    #[case::too_long("ABCDEFGHIJKLMNOPQRSTUVWXY ABCDEFGHIJKLMNOPQRSTUVWX")]
    fn rejects_card_holder_length(mut form: PaymentForm, #[case] holder: &str) {
        form.card_holder = holder.into();
        assert_matches!(coerce(form), Err(ServiceError::MalformedForm(_)));
    }

    #[rstest]
    #[case::not_a_date("13/05/2027")]
    #[case::past("2026-10-15")]
    #[case::beyond_latest("2031-01-01")]
    #[case::missing("")]
    fn rejects_expiration_date(mut form: PaymentForm, #[case] expiration: &str) {
        form.expiration_date = expiration.into();
        assert_matches!(coerce(form), Err(ServiceError::MalformedForm(_)));
    }

    #[rstest]
    fn accepts_today_and_latest_as_expiration(mut form: PaymentForm) {
        form.expiration_date = "2026-10-16".into();
        assert!(coerce(form.clone()).is_ok());
        form.expiration_date = "2030-12-31".into();
        assert!(coerce(form).is_ok());
    }

    #[rstest]
    #[case::blank("", true)]
    #[case::whitespace("   ", true)]
    #[case::three("999", true)]
    #[case::two("12", false)]
    #[case::four("1234", false)]
    fn security_code_is_optional(mut form: PaymentForm, #[case] code: &str, #[case] ok: bool) {
        form.security_code = code.into();
        assert_eq!(coerce(form).is_ok(), ok);
    }

    #[rstest]
    #[case::words("fifty")]
    #[case::missing("")]
    fn rejects_unparseable_amount(mut form: PaymentForm, #[case] amount: &str) {
        form.amount = amount.into();
        assert_matches!(coerce(form), Err(ServiceError::MalformedForm(_)));
    }

    #[rstest]
    fn debug_output_omits_card_details(form: PaymentForm) {
        let rendered = format!("{:?}", form);
        assert!(!rendered.contains("4520"));
        assert!(!rendered.contains("security_code"));
    }

    #[test]
    fn deserializes_pascal_case_fields() {
        let form: PaymentForm = serde_json::from_value(serde_json::json!({
            "CreditCardNumber": "4520850505051234",
            "CardHolder": "Andrew Jackson",
            "ExpirationDate": "2027-05-13",
            "Amount": "20.00"
        }))
        .unwrap();
        assert_eq!(form.security_code, "");
        assert_eq!(form.amount, "20.00");
    }
}
