//! Property-based tests for payment routing and validation.
//!
//! These tests use proptest to verify invariants across a wide range of inputs,
//! helping to catch edge cases that unit tests might miss.

use cardpay_api::models::payment::{CardScheme, GatewayKind, Tier};
use cardpay_api::services::retry::{with_retry, RetryConfig};
use cardpay_api::services::routing::{route, HIGH_TIER_FLOOR, LOW_TIER_CEILING};
use cardpay_api::services::validation::{quantize_amount, validate_amount, validate_card_number};
use proptest::prelude::*;
use rust_decimal::Decimal;

// Strategies for generating test data
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn unmatched_prefix_card_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just('0'), Just('1'), Just('2'), Just('7'), Just('8'), Just('9')],
        13usize..=16,
    )
        .prop_flat_map(|(first, len)| {
            proptest::collection::vec(0u8..10, len - 1).prop_map(move |rest| {
                std::iter::once(first)
                    .chain(rest.into_iter().map(|d| char::from(b'0' + d)))
                    .collect()
            })
        })
}

// Property: every amount lands in exactly one tier, with that tier's gateway and budget
proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn tiers_partition_the_amount_range(amount in amount_strategy()) {
        let policy = route(amount);
        let expected = if amount <= LOW_TIER_CEILING {
            (Tier::Low, GatewayKind::Cheap, 1)
        } else if amount < HIGH_TIER_FLOOR {
            (Tier::Mid, GatewayKind::Expensive, 2)
        } else {
            (Tier::High, GatewayKind::Premium, 3)
        };
        prop_assert_eq!((policy.tier, policy.gateway, policy.max_attempts), expected);
    }

    #[test]
    fn well_formed_amounts_validate_to_two_places(amount in amount_strategy()) {
        prop_assume!(amount < Decimal::new(1_000_000, 0));
        let validated = validate_amount(amount);
        prop_assert!(validated.is_ok(), "rejected {}", amount);
        let validated = validated.unwrap();
        prop_assert_eq!(validated, amount);
        prop_assert_eq!(validated.scale(), 2);
    }
}

// Property: card numbers are only accepted with a scheme prefix
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn unmatched_prefixes_are_rejected(number in unmatched_prefix_card_strategy()) {
        prop_assert!(validate_card_number(&number).is_err(), "accepted {}", number);
    }

    #[test]
    fn sixteen_digit_fours_are_visa(rest in "[0-9]{15}") {
        let number = format!("4{}", rest);
        let (card, scheme) = validate_card_number(&number).unwrap();
        prop_assert_eq!(scheme, CardScheme::Visa);
        prop_assert_eq!(card.last_four(), &number[12..]);
    }

    #[test]
    fn spaces_never_change_the_outcome(rest in "[0-9]{15}", split in 1usize..15) {
        let number = format!("4{}", rest);
        let spaced = format!("{} {}", &number[..split], &number[split..]);
        prop_assert_eq!(
            validate_card_number(&number).map(|(card, _)| card.as_str().to_owned()),
            validate_card_number(&spaced).map(|(card, _)| card.as_str().to_owned())
        );
    }
}

// Property: quantization is idempotent and always yields two decimals
proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn quantization_is_idempotent(mantissa in 0i64..1_000_000_000, scale in 0u32..6) {
        let amount = Decimal::new(mantissa, scale);
        if let Ok(once) = quantize_amount(amount) {
            prop_assert_eq!(once.scale(), 2);
            let twice = quantize_amount(once).unwrap();
            prop_assert_eq!(twice, once);
            prop_assert_eq!(twice.to_string(), once.to_string());
        }
    }
}

// Property: the retry combinator spends exactly what the outcome requires
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn retry_spends_at_most_its_budget(budget in 0u32..6, failures in 0u32..8) {
        let mut calls = 0u32;
        let result = with_retry(RetryConfig::new(budget), |attempt| {
            calls += 1;
            if attempt <= failures { Err("declined") } else { Ok(attempt) }
        });

        if failures < budget {
            prop_assert_eq!(result, Ok((failures + 1, failures + 1)));
            prop_assert_eq!(calls, failures + 1);
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(result.unwrap_err().attempts, budget);
            prop_assert_eq!(calls, budget);
        }
    }
}
